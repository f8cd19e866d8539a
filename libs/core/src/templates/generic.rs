use super::button::{ElementButton, WebviewHeightRatio};
use serde::{Deserialize, Serialize};

/// Action fired when the element itself is tapped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultAction {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webview_height_ratio: Option<WebviewHeightRatio>,
}

impl DefaultAction {
    pub fn web_url(url: impl Into<String>) -> Self {
        Self {
            kind: "web_url".into(),
            url: url.into(),
            webview_height_ratio: None,
        }
    }
}

/// One card in a generic or list template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_action: Option<DefaultAction>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<ElementButton>,
}

impl Element {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            image_url: None,
            item_url: None,
            default_action: None,
            buttons: Vec::new(),
        }
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn item_url(mut self, url: impl Into<String>) -> Self {
        self.item_url = Some(url.into());
        self
    }

    pub fn default_action(mut self, action: DefaultAction) -> Self {
        self.default_action = Some(action);
        self
    }

    pub fn add_button(mut self, button: ElementButton) -> Self {
        self.buttons.push(button);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageAspectRatio {
    #[default]
    Horizontal,
    Square,
}

/// Horizontally scrollable carousel of elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericTemplate {
    #[serde(default)]
    pub image_aspect_ratio: ImageAspectRatio,
    pub elements: Vec<Element>,
}

impl GenericTemplate {
    pub fn new() -> Self {
        Self {
            image_aspect_ratio: ImageAspectRatio::default(),
            elements: Vec::new(),
        }
    }

    pub fn aspect_ratio(mut self, ratio: ImageAspectRatio) -> Self {
        self.image_aspect_ratio = ratio;
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
}

impl Default for GenericTemplate {
    fn default() -> Self {
        Self::new()
    }
}
