use super::api::TelegramApi;
use super::{authenticate, payload, request, send, typing, update};
use async_trait::async_trait;
use gsm_core::{
    Answer, Attachment, AttachmentKind, Driver, DriverError, DriverEvent, HttpClient,
    IncomingMessage, Location, Media, RawResponse, Reply, TelegramConfig, User, Webhook,
};
use gsm_telemetry::{REQUESTS_MATCHED, TelemetryLabels, driver_span, record_counter};
use serde_json::Value;
use std::sync::Arc;
use tracing::{Instrument, warn};

/// Media updates of one kind: the message text is the kind's sentinel pattern and
/// the content is resolved into [`IncomingMessage::attachments`].
pub struct TelegramMediaDriver {
    kind: AttachmentKind,
    api: TelegramApi,
    webhook_secret: Option<String>,
}

impl TelegramMediaDriver {
    pub fn new(kind: AttachmentKind, config: &TelegramConfig, http: Arc<dyn HttpClient>) -> Self {
        Self {
            kind,
            api: TelegramApi::new(config, http),
            webhook_secret: config.webhook_secret.clone(),
        }
    }

    /// One driver per supported media kind.
    pub fn all(config: &TelegramConfig, http: Arc<dyn HttpClient>) -> Vec<Self> {
        [
            AttachmentKind::Image,
            AttachmentKind::Video,
            AttachmentKind::Audio,
            AttachmentKind::File,
            AttachmentKind::Location,
        ]
        .into_iter()
        .map(|kind| Self::new(kind, config, Arc::clone(&http)))
        .collect()
    }

    pub fn kind(&self) -> AttachmentKind {
        self.kind
    }

    /// Message keys holding this driver's media; voice notes count as audio.
    fn media_keys(&self) -> &'static [&'static str] {
        match self.kind {
            AttachmentKind::Image => &["photo"],
            AttachmentKind::Video => &["video"],
            AttachmentKind::Audio => &["audio", "voice"],
            AttachmentKind::File => &["document"],
            AttachmentKind::Location => &["location"],
        }
    }

    fn media_object<'a>(&self, message: &'a Value) -> Option<&'a Value> {
        let media = self.media_keys().iter().find_map(|key| message.get(key))?;
        match self.kind {
            // sizes are ordered smallest first
            AttachmentKind::Image => media.as_array()?.last(),
            _ => Some(media),
        }
    }

    async fn resolve(&self, message: &Value) -> Result<Vec<Attachment>, DriverError> {
        let media = self.media_object(message).ok_or_else(|| {
            DriverError::malformed(format!("{} update without media", self.name()))
        })?;

        if self.kind == AttachmentKind::Location {
            let coordinate = |name: &str| media.get(name).and_then(Value::as_f64);
            return match (coordinate("latitude"), coordinate("longitude")) {
                (Some(latitude), Some(longitude)) => Ok(vec![Attachment::Location(Location {
                    latitude,
                    longitude,
                    payload: media.clone(),
                })]),
                _ => Err(DriverError::malformed("location without coordinates")),
            };
        }

        let file_id = media
            .get("file_id")
            .and_then(Value::as_str)
            .ok_or_else(|| DriverError::malformed("media without file_id"))?;
        let url = self.api.file_url_for(self.name(), file_id).await?;
        Ok(Attachment::media(self.kind, Media::new(url).with_payload(media.clone()))
            .into_iter()
            .collect())
    }
}

#[async_trait]
impl Driver for TelegramMediaDriver {
    fn name(&self) -> &'static str {
        match self.kind {
            AttachmentKind::Image => "TelegramPhoto",
            AttachmentKind::Video => "TelegramVideo",
            AttachmentKind::Audio => "TelegramAudio",
            AttachmentKind::File => "TelegramFile",
            AttachmentKind::Location => "TelegramLocation",
        }
    }

    fn is_configured(&self) -> bool {
        self.api.is_configured()
    }

    fn matches_request(&self, webhook: &Webhook) -> bool {
        let _span = driver_span(self.name(), "classify").entered();
        let Some(message) = update::message(webhook.payload()) else {
            return false;
        };
        let has_media = self.media_keys().iter().any(|key| message.get(key).is_some());
        if message.get("from").is_none() || !has_media {
            return false;
        }
        if !authenticate(webhook, self.webhook_secret.as_deref(), self.name()) {
            return false;
        }
        record_counter(REQUESTS_MATCHED, 1, &TelemetryLabels::new(self.name()));
        true
    }

    /// Service messages are reported by [`TelegramDriver`](super::TelegramDriver).
    fn has_matching_event(&self, _webhook: &Webhook) -> Option<DriverEvent> {
        None
    }

    async fn get_messages(&self, webhook: &Webhook) -> Vec<IncomingMessage> {
        let Some(message) = update::message(webhook.payload()) else {
            return vec![IncomingMessage::empty()];
        };
        let attachments = match self
            .resolve(message)
            .instrument(driver_span(self.name(), "extract"))
            .await
        {
            Ok(attachments) => attachments,
            Err(err) => {
                warn!(driver = self.name(), error = %err, "telegram media could not be resolved");
                Vec::new()
            }
        };
        vec![
            IncomingMessage::new(
                self.kind.pattern(),
                update::id_at(message, "/from/id"),
                update::id_at(message, "/chat/id"),
                message.clone(),
            )
            .with_attachments(attachments),
        ]
    }

    fn get_conversation_answer(&self, message: &IncomingMessage) -> Answer {
        Answer::new(message.text(), message.clone())
    }

    fn build_service_payload(
        &self,
        reply: &Reply,
        matching: &IncomingMessage,
        event: Option<&DriverEvent>,
        extra: &Value,
    ) -> Value {
        payload::build(reply, matching, event, extra)
    }

    async fn send_payload(&self, payload: Value) -> Result<RawResponse, DriverError> {
        send(&self.api, self.name(), payload).await
    }

    async fn get_user(&self, matching: &IncomingMessage) -> User {
        update::user(matching)
    }

    async fn types(&self, matching: &IncomingMessage) -> Result<RawResponse, DriverError> {
        typing(&self.api, self.name(), matching).await
    }

    async fn send_request(
        &self,
        endpoint: &str,
        parameters: Value,
        matching: &IncomingMessage,
    ) -> Result<RawResponse, DriverError> {
        request(&self.api, self.name(), endpoint, parameters, matching).await
    }
}
