use super::button::ElementButton;
use super::generic::Element;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopElementStyle {
    #[default]
    Large,
    Compact,
}

/// Vertical list of elements with an optional global button.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListTemplate {
    #[serde(default)]
    pub top_element_style: TopElementStyle,
    pub elements: Vec<Element>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<ElementButton>,
}

impl ListTemplate {
    pub fn new() -> Self {
        Self {
            top_element_style: TopElementStyle::default(),
            elements: Vec::new(),
            buttons: Vec::new(),
        }
    }

    pub fn use_compact_view(mut self) -> Self {
        self.top_element_style = TopElementStyle::Compact;
        self
    }

    pub fn add_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    pub fn add_elements(mut self, elements: impl IntoIterator<Item = Element>) -> Self {
        self.elements.extend(elements);
        self
    }

    /// Sets the single button shown below the list, replacing any previous one.
    pub fn add_global_button(mut self, button: ElementButton) -> Self {
        self.buttons = vec![button];
        self
    }
}

impl Default for ListTemplate {
    fn default() -> Self {
        Self::new()
    }
}
