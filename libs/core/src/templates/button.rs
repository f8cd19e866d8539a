use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementButtonKind {
    WebUrl,
    Postback,
    PhoneNumber,
    ElementShare,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebviewHeightRatio {
    Compact,
    Tall,
    Full,
}

/// Button rendered inside a template.
///
/// ```
/// use gsm_core::templates::ElementButton;
///
/// let button = ElementButton::postback("Tell me more", "MORE");
/// let value = serde_json::to_value(&button).unwrap();
/// assert_eq!(value, serde_json::json!({
///     "type": "postback",
///     "title": "Tell me more",
///     "payload": "MORE"
/// }));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementButton {
    #[serde(rename = "type")]
    pub kind: ElementButtonKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webview_height_ratio: Option<WebviewHeightRatio>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messenger_extensions: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_url: Option<String>,
}

impl ElementButton {
    fn with_kind(kind: ElementButtonKind, title: Option<String>) -> Self {
        Self {
            kind,
            title,
            url: None,
            payload: None,
            webview_height_ratio: None,
            messenger_extensions: None,
            fallback_url: None,
        }
    }

    pub fn web_url(title: impl Into<String>, url: impl Into<String>) -> Self {
        let mut button = Self::with_kind(ElementButtonKind::WebUrl, Some(title.into()));
        button.url = Some(url.into());
        button
    }

    pub fn postback(title: impl Into<String>, payload: impl Into<String>) -> Self {
        let mut button = Self::with_kind(ElementButtonKind::Postback, Some(title.into()));
        button.payload = Some(payload.into());
        button
    }

    pub fn phone_number(title: impl Into<String>, number: impl Into<String>) -> Self {
        let mut button = Self::with_kind(ElementButtonKind::PhoneNumber, Some(title.into()));
        button.payload = Some(number.into());
        button
    }

    pub fn share() -> Self {
        Self::with_kind(ElementButtonKind::ElementShare, None)
    }

    pub fn height_ratio(mut self, ratio: WebviewHeightRatio) -> Self {
        self.webview_height_ratio = Some(ratio);
        self
    }

    /// Opens the URL with messenger extensions enabled, falling back to `fallback_url`.
    pub fn enable_extensions(mut self, fallback_url: Option<String>) -> Self {
        self.messenger_extensions = Some(true);
        self.fallback_url = fallback_url;
        self
    }
}

/// Text with up to three call-to-action buttons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonTemplate {
    pub text: String,
    #[serde(default)]
    pub buttons: Vec<ElementButton>,
}

impl ButtonTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            buttons: Vec::new(),
        }
    }

    pub fn add_button(mut self, button: ElementButton) -> Self {
        self.buttons.push(button);
        self
    }

    pub fn add_buttons(mut self, buttons: impl IntoIterator<Item = ElementButton>) -> Self {
        self.buttons.extend(buttons);
        self
    }
}
