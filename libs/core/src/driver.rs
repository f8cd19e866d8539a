use crate::errors::DriverError;
use crate::events::DriverEvent;
use crate::http::RawResponse;
use crate::reply::Reply;
use crate::types::{Answer, IncomingMessage, User};
use crate::webhook::Webhook;
use async_trait::async_trait;
use serde_json::Value;

/// Where a driver stands relative to the webhook currently being handled.
///
/// `Unconfigured` drivers are never probed. A configured driver moves to `Matched`
/// when it claims the request's chat messages, or to `EventOnly` when it only
/// recognizes a platform event. Sending a reply ends the exchange in `Claimed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Unconfigured,
    Configured,
    Matched,
    EventOnly,
    Claimed,
}

/// Contract every platform adapter implements.
///
/// All classification methods are pure functions of the [`Webhook`]; drivers keep
/// only read-only configuration and may serve concurrent requests. `matches_request`
/// must be free of side effects so several drivers can be probed for one request.
#[async_trait]
pub trait Driver: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether the platform credentials needed to talk back are present.
    fn is_configured(&self) -> bool;

    /// True when the request is authentic and carries at least one chat message
    /// this driver understands.
    fn matches_request(&self, webhook: &Webhook) -> bool;

    /// First non-message event in the webhook, if any.
    fn has_matching_event(&self, webhook: &Webhook) -> Option<DriverEvent>;

    /// Messages of the webhook; never empty.
    async fn get_messages(&self, webhook: &Webhook) -> Vec<IncomingMessage>;

    fn get_conversation_answer(&self, message: &IncomingMessage) -> Answer;

    /// Whether the message was authored by a bot (and should be ignored).
    fn is_bot(&self, _webhook: &Webhook) -> bool {
        false
    }

    /// Converts a reply into the platform's wire payload.
    ///
    /// `event` is the event recognized for this exchange, if any; `extra` is deep
    /// merged into the payload skeleton before the reply is applied.
    fn build_service_payload(
        &self,
        reply: &Reply,
        matching: &IncomingMessage,
        event: Option<&DriverEvent>,
        extra: &Value,
    ) -> Value;

    async fn send_payload(&self, payload: Value) -> Result<RawResponse, DriverError>;

    /// Profile of the sender; lookup failures leave the optional fields empty.
    async fn get_user(&self, matching: &IncomingMessage) -> User;

    /// Shows a typing indicator to the sender.
    async fn types(&self, matching: &IncomingMessage) -> Result<RawResponse, DriverError>;

    /// Low-level call to a platform endpoint with driver credentials applied.
    async fn send_request(
        &self,
        endpoint: &str,
        parameters: Value,
        matching: &IncomingMessage,
    ) -> Result<RawResponse, DriverError>;
}
