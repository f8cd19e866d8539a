//! Facebook Messenger driver.

mod classify;
mod extract;
mod payload;

pub use classify::SIGNATURE_HEADER;

use async_trait::async_trait;
use gsm_core::{
    Answer, Driver, DriverError, DriverEvent, FacebookConfig, HttpClient, IncomingMessage,
    RawResponse, Reply, User, Webhook, deep_merge,
};
use gsm_telemetry::{
    EVENTS_DETECTED, PAYLOADS_SENT, REQUESTS_MATCHED, TelemetryLabels, driver_span,
    record_counter,
};
use http::HeaderMap;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{Instrument, debug, warn};

const PROFILE_FIELDS: &str = "first_name,last_name";

#[derive(Debug, Default, Deserialize)]
struct Profile {
    first_name: Option<String>,
    last_name: Option<String>,
}

pub struct FacebookDriver {
    config: FacebookConfig,
    http: Arc<dyn HttpClient>,
}

impl FacebookDriver {
    pub const NAME: &'static str = "Facebook";

    pub fn new(config: FacebookConfig, http: Arc<dyn HttpClient>) -> Self {
        Self { config, http }
    }

    pub fn config(&self) -> &FacebookConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.graph_base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn token(&self) -> Result<&str, DriverError> {
        self.config
            .token
            .as_deref()
            .ok_or(DriverError::NotConfigured { driver: Self::NAME })
    }

    fn labels(&self) -> TelemetryLabels {
        TelemetryLabels::new(Self::NAME)
    }

    async fn post(&self, path: &str, body: &Value) -> Result<RawResponse, DriverError> {
        let url = self.endpoint(path);
        let response = self
            .http
            .post_json(&url, &HeaderMap::new(), body)
            .instrument(driver_span(Self::NAME, "send"))
            .await?;
        if !response.is_success() {
            warn!(status = %response.status, path, "graph api rejected request");
        }
        Ok(response)
    }
}

#[async_trait]
impl Driver for FacebookDriver {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn is_configured(&self) -> bool {
        self.config.token.is_some()
    }

    fn matches_request(&self, webhook: &Webhook) -> bool {
        let _span = driver_span(Self::NAME, "classify").entered();
        if !classify::messaging_entries(webhook)
            .iter()
            .any(classify::has_text)
        {
            return false;
        }
        if let Err(err) = classify::verify(webhook, self.config.app_secret.as_deref(), Self::NAME)
        {
            debug!(error = %err, "rejecting messenger webhook with invalid signature");
            return false;
        }
        record_counter(REQUESTS_MATCHED, 1, &self.labels());
        true
    }

    fn has_matching_event(&self, webhook: &Webhook) -> Option<DriverEvent> {
        let _span = driver_span(Self::NAME, "classify").entered();
        let event = classify::first_event(classify::messaging_entries(webhook))?;
        if !classify::is_authentic(webhook, self.config.app_secret.as_deref()) {
            debug!(event = event.name(), "ignoring unsigned messenger event");
            return None;
        }
        debug!(event = event.name(), "messenger event detected");
        record_counter(
            EVENTS_DETECTED,
            1,
            &self.labels().with("event", event.name()),
        );
        Some(event)
    }

    async fn get_messages(&self, webhook: &Webhook) -> Vec<IncomingMessage> {
        driver_span(Self::NAME, "extract")
            .in_scope(|| extract::messages(classify::messaging_entries(webhook)))
    }

    fn get_conversation_answer(&self, message: &IncomingMessage) -> Answer {
        extract::answer(message)
    }

    fn build_service_payload(
        &self,
        reply: &Reply,
        matching: &IncomingMessage,
        event: Option<&DriverEvent>,
        extra: &Value,
    ) -> Value {
        driver_span(Self::NAME, "build").in_scope(|| {
            payload::build(reply, matching, event, extra, self.config.token.as_deref())
        })
    }

    async fn send_payload(&self, payload: Value) -> Result<RawResponse, DriverError> {
        self.token()?;
        let response = self.post("me/messages", &payload).await?;
        record_counter(PAYLOADS_SENT, 1, &self.labels());
        Ok(response)
    }

    async fn get_user(&self, matching: &IncomingMessage) -> User {
        let mut user = User::new(matching.sender());
        let url = self.endpoint(matching.sender());
        let token = self.config.token.as_deref().unwrap_or_default();
        let query = [("fields", PROFILE_FIELDS), ("access_token", token)];

        let profile = match self.http.get(&url, &query).await {
            Ok(response) if response.is_success() => response.json::<Profile>(),
            Ok(response) => Err(anyhow::anyhow!("status {}", response.status)),
            Err(err) => Err(err),
        };
        match profile {
            Ok(profile) => {
                user.first_name = profile.first_name;
                user.last_name = profile.last_name;
            }
            Err(err) => {
                let err = DriverError::upstream(url, err);
                warn!(error = %err, "messenger profile lookup failed");
            }
        }
        user
    }

    async fn types(&self, matching: &IncomingMessage) -> Result<RawResponse, DriverError> {
        let body = json!({
            "recipient": {"id": matching.sender()},
            "access_token": self.token()?,
            "sender_action": "typing_on",
        });
        self.post("me/messages", &body).await
    }

    async fn send_request(
        &self,
        endpoint: &str,
        parameters: Value,
        _matching: &IncomingMessage,
    ) -> Result<RawResponse, DriverError> {
        let mut body = json!({"access_token": self.token()?});
        if parameters.is_object() {
            deep_merge(&mut body, &parameters);
        }
        self.post(endpoint, &body).await
    }
}
