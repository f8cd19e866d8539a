use super::update::id_at;
use gsm_core::{Attachment, Button, DriverEvent, IncomingMessage, Reply, deep_merge};
use serde_json::{Map, Value, json};

/// Renders `reply` as a Bot API call body; `method` selects the endpoint.
///
/// Templates have no Telegram counterpart and are sent as their fallback text.
pub(crate) fn build(
    reply: &Reply,
    matching: &IncomingMessage,
    event: Option<&DriverEvent>,
    extra: &Value,
) -> Value {
    let chat_id = event
        .map(|event| id_at(event.payload(), "/chat/id"))
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| matching.recipient().to_string());

    let mut skeleton = json!({
        "method": "sendMessage",
        "chat_id": chat_id,
    });
    if extra.is_object() {
        deep_merge(&mut skeleton, extra);
    }
    let mut payload = match skeleton {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    match reply {
        Reply::Text(text) => {
            payload.insert("text".into(), Value::from(text.as_str()));
        }
        Reply::Question(question) => {
            let rows: Vec<Value> = question
                .buttons
                .iter()
                .map(|button| json!([inline_button(button)]))
                .collect();
            payload.insert("text".into(), Value::from(question.text.as_str()));
            payload.insert("reply_markup".into(), json!({"inline_keyboard": rows}));
        }
        Reply::Template(template) => {
            payload.insert("text".into(), Value::from(template.fallback_text()));
        }
        Reply::Message(outgoing) => match &outgoing.attachment {
            Some(attachment) => {
                apply_attachment(&mut payload, attachment);
                if !outgoing.text.is_empty() && attachment.url().is_some() {
                    payload.insert("caption".into(), Value::from(outgoing.text.as_str()));
                }
            }
            None => {
                payload.insert("text".into(), Value::from(outgoing.text.as_str()));
            }
        },
    }
    Value::Object(payload)
}

fn inline_button(button: &Button) -> Value {
    let mut rendered = Map::new();
    rendered.insert("text".into(), Value::from(button.text.as_str()));
    rendered.insert("callback_data".into(), Value::from(button.value.as_str()));
    for (key, value) in &button.additional {
        rendered.insert(key.clone(), value.clone());
    }
    Value::Object(rendered)
}

fn apply_attachment(payload: &mut Map<String, Value>, attachment: &Attachment) {
    let (method, field, media) = match attachment {
        Attachment::Image(media) => ("sendPhoto", "photo", media),
        Attachment::Video(media) => ("sendVideo", "video", media),
        Attachment::Audio(media) => ("sendAudio", "audio", media),
        Attachment::File(media) => ("sendDocument", "document", media),
        Attachment::Location(location) => {
            payload.insert("method".into(), Value::from("sendLocation"));
            payload.insert("latitude".into(), Value::from(location.latitude));
            payload.insert("longitude".into(), Value::from(location.longitude));
            return;
        }
    };
    payload.insert("method".into(), Value::from(method));
    payload.insert(field.into(), Value::from(media.url.as_str()));
}
