use gsm_core::{Attachment, Button, DriverEvent, IncomingMessage, Question, Reply, deep_merge};
use serde_json::{Map, Value, json};

/// Renders `reply` as a Send API body.
///
/// The recipient is the event sender when an event is active, else the sender of
/// `matching`. `extra` is merged into the skeleton before the reply is applied and
/// `access_token` is written last so callers cannot override it.
pub(crate) fn build(
    reply: &Reply,
    matching: &IncomingMessage,
    event: Option<&DriverEvent>,
    extra: &Value,
    access_token: Option<&str>,
) -> Value {
    let recipient = event
        .and_then(DriverEvent::sender_id)
        .unwrap_or_else(|| matching.sender().to_string());

    let mut skeleton = json!({
        "recipient": {"id": recipient},
        "message": {"text": ""},
    });
    if extra.is_object() {
        deep_merge(&mut skeleton, extra);
    }
    let mut payload = match skeleton {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    match reply {
        Reply::Question(question) => {
            payload.insert("message".into(), quick_reply_message(question));
        }
        Reply::Template(template) => {
            payload.insert("message".into(), template.to_value());
        }
        Reply::Message(outgoing) => {
            let mut message = take_message(&mut payload);
            match outgoing.attachment.as_ref().and_then(attachment_body) {
                Some(attachment) => {
                    message.remove("text");
                    message.insert("attachment".into(), attachment);
                }
                None => {
                    message.insert("text".into(), Value::from(outgoing.text.as_str()));
                }
            }
            payload.insert("message".into(), Value::Object(message));
        }
        Reply::Text(text) => {
            let mut message = take_message(&mut payload);
            message.insert("text".into(), Value::from(text.as_str()));
            payload.insert("message".into(), Value::Object(message));
        }
    }

    match access_token {
        Some(token) => {
            payload.insert("access_token".into(), Value::from(token));
        }
        None => {
            payload.remove("access_token");
        }
    }
    Value::Object(payload)
}

/// Removes the message body, discarding anything that is not an object.
fn take_message(payload: &mut Map<String, Value>) -> Map<String, Value> {
    match payload.remove("message") {
        Some(Value::Object(message)) => message,
        _ => Map::new(),
    }
}

fn quick_reply_message(question: &Question) -> Value {
    let replies: Vec<Value> = question.buttons.iter().map(quick_reply).collect();
    json!({
        "text": question.text,
        "quick_replies": replies,
    })
}

fn quick_reply(button: &Button) -> Value {
    let mut reply = Map::new();
    reply.insert("content_type".into(), Value::from("text"));
    reply.insert("title".into(), Value::from(button.text.as_str()));
    reply.insert("payload".into(), Value::from(button.value.as_str()));
    if let Some(image_url) = &button.image_url {
        reply.insert("image_url".into(), Value::from(image_url.as_str()));
    }
    for (key, value) in &button.additional {
        reply.insert(key.clone(), value.clone());
    }
    Value::Object(reply)
}

/// Send API attachment for media Messenger accepts by URL.
fn attachment_body(attachment: &Attachment) -> Option<Value> {
    match attachment {
        Attachment::Image(media)
        | Attachment::Audio(media)
        | Attachment::Video(media)
        | Attachment::File(media) => Some(json!({
            "type": attachment.kind().as_str(),
            "payload": {"url": media.url},
        })),
        Attachment::Location(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gsm_core::templates::{ButtonTemplate, ElementButton, Template};
    use gsm_core::{Location, Media, OutgoingMessage};

    fn matching() -> IncomingMessage {
        IncomingMessage::new("hi", "1", "2", json!({}))
    }

    #[test]
    fn text_reply_targets_sender() {
        let payload = build(&Reply::from("hello"), &matching(), None, &json!({}), Some("tok"));
        assert_eq!(
            payload,
            json!({
                "recipient": {"id": "1"},
                "message": {"text": "hello"},
                "access_token": "tok"
            })
        );
    }

    #[test]
    fn question_renders_quick_replies() {
        let mut extra = Map::new();
        extra.insert("image_url".into(), json!("https://cdn/override.png"));
        let question = Question::new("Continue?")
            .add_button(Button::new("Yes").value("y").image("https://cdn/yes.png"))
            .add_button(Button::new("No").value("n").additional_parameters(extra));

        let payload = build(&question.into(), &matching(), None, &json!({}), Some("tok"));
        assert_eq!(
            payload["message"],
            json!({
                "text": "Continue?",
                "quick_replies": [
                    {"content_type": "text", "title": "Yes", "payload": "y", "image_url": "https://cdn/yes.png"},
                    {"content_type": "text", "title": "No", "payload": "n", "image_url": "https://cdn/override.png"}
                ]
            })
        );
    }

    #[test]
    fn template_is_used_verbatim() {
        let template = Template::from(
            ButtonTemplate::new("Pick").add_button(ElementButton::web_url("Docs", "https://d")),
        );
        let payload = build(
            &Reply::Template(template.clone()),
            &matching(),
            None,
            &json!({"message": {"metadata": "dropped"}}),
            Some("tok"),
        );
        assert_eq!(payload["message"], template.to_value());
    }

    #[test]
    fn supported_attachment_replaces_text() {
        let out = OutgoingMessage::new("caption")
            .with_attachment(Attachment::Video(Media::new("https://cdn/v.mp4")));
        let payload = build(&out.into(), &matching(), None, &json!({}), Some("tok"));
        assert_eq!(
            payload["message"],
            json!({"attachment": {"type": "video", "payload": {"url": "https://cdn/v.mp4"}}})
        );
    }

    #[test]
    fn location_falls_back_to_text() {
        let out = OutgoingMessage::new("We are here").with_attachment(Attachment::Location(
            Location {
                latitude: 1.0,
                longitude: 2.0,
                payload: Value::Null,
            },
        ));
        let payload = build(&out.into(), &matching(), None, &json!({}), Some("tok"));
        assert_eq!(payload["message"], json!({"text": "We are here"}));
    }

    #[test]
    fn event_sender_overrides_recipient() {
        let event = DriverEvent::from_field(
            "postback",
            json!({"sender": {"id": "99"}, "postback": {"payload": "GET_STARTED"}}),
        );
        let payload = build(
            &Reply::from("welcome"),
            &IncomingMessage::empty(),
            Some(&event),
            &json!({}),
            Some("tok"),
        );
        assert_eq!(payload["recipient"]["id"], "99");
    }

    #[test]
    fn extra_fields_merge_but_token_wins() {
        let extra = json!({
            "messaging_type": "RESPONSE",
            "message": {"metadata": "m"},
            "access_token": "spoofed"
        });
        let payload = build(&Reply::from("hi"), &matching(), None, &extra, Some("tok"));
        assert_eq!(payload["messaging_type"], "RESPONSE");
        assert_eq!(payload["message"], json!({"text": "hi", "metadata": "m"}));
        assert_eq!(payload["access_token"], "tok");

        let anonymous = build(&Reply::from("hi"), &matching(), None, &extra, None);
        assert!(anonymous.get("access_token").is_none());
    }

    #[test]
    fn non_object_message_override_is_replaced() {
        let payload = build(
            &Reply::from("hi"),
            &matching(),
            None,
            &json!({"message": "raw"}),
            Some("tok"),
        );
        assert_eq!(payload["message"], json!({"text": "hi"}));
    }
}
