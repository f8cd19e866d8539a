use gsm_core::events::json_id;
use gsm_core::{DriverError, DriverEvent, DriverResult, IncomingMessage, User, Webhook};
use security::SignatureScheme;
use serde_json::Value;

pub const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

const SERVICE_KEYS: [&str; 9] = [
    "new_chat_members",
    "left_chat_member",
    "new_chat_title",
    "new_chat_photo",
    "group_chat_created",
    "supergroup_chat_created",
    "channel_chat_created",
    "delete_chat_photo",
    "pinned_message",
];

pub(crate) fn message(payload: &Value) -> Option<&Value> {
    payload
        .get("message")
        .or_else(|| payload.get("edited_message"))
}

/// Non-empty chat text of the update's message.
pub(crate) fn text(payload: &Value) -> Option<&str> {
    message(payload)?
        .get("text")
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
}

pub(crate) fn callback_query(payload: &Value) -> Option<&Value> {
    payload.get("callback_query")
}

pub(crate) fn is_authentic(webhook: &Webhook, secret: Option<&str>) -> bool {
    let provided = webhook.header(SECRET_HEADER).unwrap_or_default();
    security::validate(
        SignatureScheme::SharedToken,
        secret,
        webhook.body(),
        provided,
    )
}

pub(crate) fn verify(
    webhook: &Webhook,
    secret: Option<&str>,
    driver: &'static str,
) -> DriverResult<()> {
    if is_authentic(webhook, secret) {
        Ok(())
    } else {
        Err(DriverError::AuthenticationFailed { driver })
    }
}

pub(crate) fn id_at(value: &Value, pointer: &str) -> String {
    value.pointer(pointer).and_then(json_id).unwrap_or_default()
}

/// Service message (member joined, title changed, ...) as a generic event.
pub(crate) fn service_event(payload: &Value) -> Option<DriverEvent> {
    let message = message(payload)?;
    let name = message
        .as_object()?
        .keys()
        .find(|key| SERVICE_KEYS.contains(&key.as_str()))?;
    Some(DriverEvent::Generic {
        name: name.clone(),
        payload: message.clone(),
    })
}

/// Sender profile as carried in the update; Telegram needs no lookup call.
pub(crate) fn user(matching: &IncomingMessage) -> User {
    let from = matching.payload().get("from");
    let field = |name: &str| {
        from.and_then(|f| f.get(name))
            .and_then(Value::as_str)
            .map(str::to_string)
    };
    User {
        id: matching.sender().to_string(),
        first_name: field("first_name"),
        last_name: field("last_name"),
        username: field("username"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn edited_messages_are_read_too() {
        let payload = json!({"edited_message": {"text": "fixed"}});
        assert_eq!(message(&payload).unwrap()["text"], "fixed");
    }

    #[test]
    fn blank_text_reads_as_absent() {
        assert_eq!(text(&json!({"message": {"text": "hi"}})), Some("hi"));
        assert_eq!(text(&json!({"message": {"text": ""}})), None);
        assert_eq!(text(&json!({"message": {"sticker": {}}})), None);
    }

    #[test]
    fn wrong_secret_is_an_authentication_failure() {
        let webhook = Webhook::decode(&gsm_core::IncomingRequest::new("{}")).unwrap();
        assert!(verify(&webhook, None, "Telegram").is_ok());
        assert!(matches!(
            verify(&webhook, Some("tok"), "Telegram"),
            Err(DriverError::AuthenticationFailed { driver: "Telegram" })
        ));
    }

    #[test]
    fn service_event_uses_first_service_key() {
        let payload: Value = serde_json::from_str(
            r#"{"message": {"chat": {"id": 5}, "new_chat_title": "t", "pinned_message": {}}}"#,
        )
        .unwrap();
        let event = service_event(&payload).unwrap();
        assert_eq!(event.name(), "new_chat_title");
        assert_eq!(event.payload()["chat"]["id"], 5);
        assert!(service_event(&json!({"message": {"text": "hi"}})).is_none());
    }

    #[test]
    fn user_is_read_from_sender_block() {
        let msg = IncomingMessage::new(
            "hi",
            "7",
            "7",
            json!({"from": {"id": 7, "first_name": "Ada", "username": "ada"}}),
        );
        let user = user(&msg);
        assert_eq!(user.id, "7");
        assert_eq!(user.first_name.as_deref(), Some("Ada"));
        assert_eq!(user.last_name, None);
        assert_eq!(user.username.as_deref(), Some("ada"));
    }
}
