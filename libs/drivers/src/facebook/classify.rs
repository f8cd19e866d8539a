use gsm_core::events::event_field;
use gsm_core::{DriverError, DriverEvent, DriverResult, Webhook};
use security::SignatureScheme;
use serde_json::Value;

pub const SIGNATURE_HEADER: &str = "x-hub-signature";

/// Messaging entries of the first page entry; missing or mistyped lists read as empty.
pub(crate) fn messaging_entries(webhook: &Webhook) -> &[Value] {
    webhook
        .payload()
        .pointer("/entry/0/messaging")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// `message.text` when present as a string, even if empty.
pub(crate) fn message_text(entry: &Value) -> Option<&str> {
    entry.pointer("/message/text").and_then(Value::as_str)
}

pub(crate) fn has_text(entry: &Value) -> bool {
    message_text(entry).is_some_and(|text| !text.is_empty())
}

pub(crate) fn is_authentic(webhook: &Webhook, app_secret: Option<&str>) -> bool {
    let provided = webhook.header(SIGNATURE_HEADER).unwrap_or_default();
    security::validate(
        SignatureScheme::HubSha1,
        app_secret,
        webhook.body(),
        provided,
    )
}

pub(crate) fn verify(
    webhook: &Webhook,
    app_secret: Option<&str>,
    driver: &'static str,
) -> DriverResult<()> {
    if is_authentic(webhook, app_secret) {
        Ok(())
    } else {
        Err(DriverError::AuthenticationFailed { driver })
    }
}

/// Event of the first entry carrying a non-envelope field.
pub(crate) fn first_event(entries: &[Value]) -> Option<DriverEvent> {
    entries.iter().find_map(|entry| {
        event_field(entry).map(|field| DriverEvent::from_field(field, entry.clone()))
    })
}
