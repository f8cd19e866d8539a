//! Telegram Bot API drivers.
//!
//! Updates are plain JSON without a signature; when a webhook secret is
//! configured Telegram echoes it in `X-Telegram-Bot-Api-Secret-Token`.

mod api;
mod media;
mod payload;
mod update;

pub use api::TelegramApi;
pub use media::TelegramMediaDriver;
pub use update::SECRET_HEADER;

use async_trait::async_trait;
use gsm_core::{
    Answer, Driver, DriverError, DriverEvent, HttpClient, IncomingMessage, RawResponse, Reply,
    TelegramConfig, User, Webhook, deep_merge,
};
use gsm_telemetry::{
    EVENTS_DETECTED, PAYLOADS_SENT, REQUESTS_MATCHED, TelemetryLabels, driver_span,
    record_counter,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::debug;

/// Text messages and inline-keyboard callbacks.
pub struct TelegramDriver {
    api: TelegramApi,
    webhook_secret: Option<String>,
}

impl TelegramDriver {
    pub const NAME: &'static str = "Telegram";

    pub fn new(config: TelegramConfig, http: Arc<dyn HttpClient>) -> Self {
        Self {
            api: TelegramApi::new(&config, http),
            webhook_secret: config.webhook_secret,
        }
    }

}

/// Checks the secret token; a mismatch is a non-match, never an error.
fn authenticate(webhook: &Webhook, secret: Option<&str>, driver: &'static str) -> bool {
    match update::verify(webhook, secret, driver) {
        Ok(()) => true,
        Err(err) => {
            debug!(driver, error = %err, "rejecting telegram update with wrong secret token");
            false
        }
    }
}

/// Callback queries and messages carrying non-empty text from a user.
fn is_text_update(payload: &Value) -> bool {
    if update::callback_query(payload).is_some() {
        return true;
    }
    update::text(payload).is_some()
        && update::message(payload).is_some_and(|message| message.get("from").is_some())
}

fn text_messages(payload: &Value) -> Vec<IncomingMessage> {
    if let Some(query) = update::callback_query(payload) {
        let data = query.get("data").and_then(Value::as_str).unwrap_or_default();
        return vec![IncomingMessage::new(
            data,
            update::id_at(query, "/from/id"),
            update::id_at(query, "/message/chat/id"),
            query.clone(),
        )];
    }
    match update::message(payload) {
        Some(message) => vec![IncomingMessage::new(
            message
                .get("text")
                .and_then(Value::as_str)
                .unwrap_or_default(),
            update::id_at(message, "/from/id"),
            update::id_at(message, "/chat/id"),
            message.clone(),
        )],
        None => vec![IncomingMessage::empty()],
    }
}

/// Calls `endpoint` with `chat_id` defaulting to the chat of `matching`.
async fn request(
    api: &TelegramApi,
    driver: &'static str,
    endpoint: &str,
    parameters: Value,
    matching: &IncomingMessage,
) -> Result<RawResponse, DriverError> {
    let mut body = json!({"method": endpoint, "chat_id": matching.recipient()});
    if parameters.is_object() {
        deep_merge(&mut body, &parameters);
    }
    // the endpoint argument names the method, callers cannot redirect it
    body["method"] = Value::from(endpoint);
    api.call(driver, body).await
}

async fn send(
    api: &TelegramApi,
    driver: &'static str,
    payload: Value,
) -> Result<RawResponse, DriverError> {
    let response = api.call(driver, payload).await?;
    record_counter(PAYLOADS_SENT, 1, &TelemetryLabels::new(driver));
    Ok(response)
}

async fn typing(
    api: &TelegramApi,
    driver: &'static str,
    matching: &IncomingMessage,
) -> Result<RawResponse, DriverError> {
    let body = json!({
        "method": "sendChatAction",
        "chat_id": matching.recipient(),
        "action": "typing",
    });
    api.call(driver, body).await
}

#[async_trait]
impl Driver for TelegramDriver {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn is_configured(&self) -> bool {
        self.api.is_configured()
    }

    fn matches_request(&self, webhook: &Webhook) -> bool {
        let _span = driver_span(Self::NAME, "classify").entered();
        if !is_text_update(webhook.payload())
            || !authenticate(webhook, self.webhook_secret.as_deref(), Self::NAME)
        {
            return false;
        }
        record_counter(REQUESTS_MATCHED, 1, &TelemetryLabels::new(Self::NAME));
        true
    }

    fn has_matching_event(&self, webhook: &Webhook) -> Option<DriverEvent> {
        let _span = driver_span(Self::NAME, "classify").entered();
        if !update::is_authentic(webhook, self.webhook_secret.as_deref()) {
            return None;
        }
        let event = update::service_event(webhook.payload())?;
        debug!(event = event.name(), "telegram service message detected");
        record_counter(
            EVENTS_DETECTED,
            1,
            &TelemetryLabels::new(Self::NAME).with("event", event.name()),
        );
        Some(event)
    }

    async fn get_messages(&self, webhook: &Webhook) -> Vec<IncomingMessage> {
        driver_span(Self::NAME, "extract").in_scope(|| text_messages(webhook.payload()))
    }

    fn get_conversation_answer(&self, message: &IncomingMessage) -> Answer {
        let answer = Answer::new(message.text(), message.clone());
        match message.payload().get("data").and_then(Value::as_str) {
            Some(data) => answer.interactive(data),
            None => answer,
        }
    }

    fn build_service_payload(
        &self,
        reply: &Reply,
        matching: &IncomingMessage,
        event: Option<&DriverEvent>,
        extra: &Value,
    ) -> Value {
        driver_span(Self::NAME, "build")
            .in_scope(|| payload::build(reply, matching, event, extra))
    }

    async fn send_payload(&self, payload: Value) -> Result<RawResponse, DriverError> {
        send(&self.api, Self::NAME, payload).await
    }

    async fn get_user(&self, matching: &IncomingMessage) -> User {
        update::user(matching)
    }

    async fn types(&self, matching: &IncomingMessage) -> Result<RawResponse, DriverError> {
        typing(&self.api, Self::NAME, matching).await
    }

    async fn send_request(
        &self,
        endpoint: &str,
        parameters: Value,
        matching: &IncomingMessage,
    ) -> Result<RawResponse, DriverError> {
        request(&self.api, Self::NAME, endpoint, parameters, matching).await
    }
}
