use crate::attachments::{Attachment, AttachmentKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Normalized chat message extracted from a webhook entry.
///
/// Instances are immutable once built by a driver.
///
/// ```
/// use gsm_core::IncomingMessage;
/// use serde_json::json;
///
/// let msg = IncomingMessage::new("hi", "1", "2", json!({"message": {"text": "hi"}}));
/// assert_eq!(msg.text(), "hi");
/// assert_eq!(msg.sender(), "1");
/// assert_eq!(msg.recipient(), "2");
/// assert!(msg.attachments().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncomingMessage {
    text: String,
    sender: String,
    recipient: String,
    #[serde(default)]
    payload: Value,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<Attachment>,
}

impl IncomingMessage {
    pub fn new(
        text: impl Into<String>,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        payload: Value,
    ) -> Self {
        Self {
            text: text.into(),
            sender: sender.into(),
            recipient: recipient.into(),
            payload,
            attachments: Vec::new(),
        }
    }

    /// Placeholder used where an entry carries no chat text.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_attachments(mut self, attachments: Vec<Attachment>) -> Self {
        self.attachments = attachments;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    pub fn attachments_of(&self, kind: AttachmentKind) -> impl Iterator<Item = &Attachment> {
        self.attachments.iter().filter(move |a| a.kind() == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
            && self.sender.is_empty()
            && self.recipient.is_empty()
            && self.attachments.is_empty()
    }
}

/// Reply built by the conversation layer: text, optionally with one attachment.
///
/// ```
/// use gsm_core::{Attachment, Media, OutgoingMessage};
///
/// let out = OutgoingMessage::new("look")
///     .with_attachment(Attachment::Image(Media::new("https://example.com/a.png")));
/// assert_eq!(out.text, "look");
/// assert!(out.attachment.is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
}

impl OutgoingMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attachment: None,
        }
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }
}

/// A tappable choice offered with a [`Question`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Button {
    pub text: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub additional: Map<String, Value>,
}

impl Button {
    /// Creates a button whose value defaults to its label.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            value: text.clone(),
            text,
            image_url: None,
            additional: Map::new(),
        }
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Extra platform fields merged verbatim into the rendered button.
    pub fn additional_parameters(mut self, additional: Map<String, Value>) -> Self {
        self.additional = additional;
        self
    }
}

/// Prompt with preset answers.
///
/// ```
/// use gsm_core::{Button, Question};
///
/// let q = Question::new("Continue?")
///     .add_button(Button::new("Yes").value("y"))
///     .add_button(Button::new("No").value("n"));
/// assert_eq!(q.buttons.len(), 2);
/// assert_eq!(q.buttons[1].value, "n");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    #[serde(default)]
    pub buttons: Vec<Button>,
}

impl Question {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            buttons: Vec::new(),
        }
    }

    pub fn add_button(mut self, button: Button) -> Self {
        self.buttons.push(button);
        self
    }

    pub fn add_buttons(mut self, buttons: impl IntoIterator<Item = Button>) -> Self {
        self.buttons.extend(buttons);
        self
    }
}

/// Resolved reply to a [`Question`], derived from an [`IncomingMessage`].
///
/// Interactive answers come from tapping a quick reply or inline button; their
/// `value` carries the button payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Answer {
    text: String,
    value: String,
    interactive: bool,
    message: IncomingMessage,
}

impl Answer {
    pub fn new(text: impl Into<String>, message: IncomingMessage) -> Self {
        Self {
            text: text.into(),
            value: String::new(),
            interactive: false,
            message,
        }
    }

    pub fn interactive(mut self, value: impl Into<String>) -> Self {
        self.interactive = true;
        self.value = value.into();
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_interactive_reply(&self) -> bool {
        self.interactive
    }

    pub fn message(&self) -> &IncomingMessage {
        &self.message
    }
}

/// Profile of the sender; names stay `None` when the platform lookup fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachments::Media;
    use serde_json::json;

    #[test]
    fn empty_message_is_placeholder() {
        let msg = IncomingMessage::empty();
        assert!(msg.is_empty());
        assert_eq!(msg.payload(), &Value::Null);
    }

    #[test]
    fn attachment_message_is_not_empty() {
        let msg = IncomingMessage::new("", "", "", json!({})).with_attachments(vec![
            Attachment::Video(Media::new("https://cdn/v.mp4")),
        ]);
        assert!(!msg.is_empty());
        assert_eq!(msg.attachments_of(AttachmentKind::Video).count(), 1);
        assert_eq!(msg.attachments_of(AttachmentKind::Image).count(), 0);
    }

    #[test]
    fn button_value_defaults_to_text() {
        let button = Button::new("Maybe");
        assert_eq!(button.value, "Maybe");
        assert!(button.image_url.is_none());
    }

    #[test]
    fn interactive_answer_keeps_value_and_source() {
        let msg = IncomingMessage::new("Yes", "1", "2", json!({}));
        let answer = Answer::new("Yes", msg.clone()).interactive("y");
        assert!(answer.is_interactive_reply());
        assert_eq!(answer.value(), "y");
        assert_eq!(answer.text(), "Yes");
        assert_eq!(answer.message(), &msg);
    }
}
