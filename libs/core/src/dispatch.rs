use crate::driver::{Driver, DriverState};
use crate::errors::DriverError;
use crate::events::DriverEvent;
use crate::http::RawResponse;
use crate::reply::Reply;
use crate::types::{Answer, IncomingMessage, User};
use crate::webhook::{IncomingRequest, Webhook};
use serde_json::Value;
use std::sync::Arc;
use tracing::{Instrument, debug, info_span};

/// Probes registered drivers, in registration order, until one claims a webhook.
#[derive(Clone, Default)]
pub struct DriverDispatcher {
    drivers: Vec<Arc<dyn Driver>>,
}

impl DriverDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_driver(mut self, driver: Arc<dyn Driver>) -> Self {
        self.register(driver);
        self
    }

    pub fn register(&mut self, driver: Arc<dyn Driver>) {
        self.drivers.push(driver);
    }

    pub fn drivers(&self) -> impl Iterator<Item = &Arc<dyn Driver>> {
        self.drivers.iter()
    }

    pub fn state_of(driver: &dyn Driver) -> DriverState {
        if driver.is_configured() {
            DriverState::Configured
        } else {
            DriverState::Unconfigured
        }
    }

    /// Finds the driver responsible for `request`.
    ///
    /// Only an undecodable body is an error. `Ok(None)` means no configured driver
    /// recognized the request.
    pub async fn dispatch(
        &self,
        request: &IncomingRequest,
    ) -> Result<Option<Exchange>, DriverError> {
        let webhook = Webhook::decode(request)?;
        for driver in &self.drivers {
            let name = driver.name();
            if Self::state_of(driver.as_ref()) == DriverState::Unconfigured {
                debug!(driver = name, "skipping unconfigured driver");
                continue;
            }
            if driver.matches_request(&webhook) {
                let event = driver.has_matching_event(&webhook);
                let messages = driver
                    .get_messages(&webhook)
                    .instrument(info_span!("driver.messages", driver = name))
                    .await;
                debug!(
                    driver = name,
                    messages = messages.len(),
                    "driver matched request"
                );
                return Ok(Some(Exchange {
                    driver: Arc::clone(driver),
                    webhook,
                    state: DriverState::Matched,
                    messages,
                    event,
                }));
            }
            if let Some(event) = driver.has_matching_event(&webhook) {
                debug!(driver = name, event = event.name(), "driver matched event");
                return Ok(Some(Exchange {
                    driver: Arc::clone(driver),
                    webhook,
                    state: DriverState::EventOnly,
                    messages: Vec::new(),
                    event: Some(event),
                }));
            }
        }
        debug!("no driver matched request");
        Ok(None)
    }
}

/// One webhook claimed by a driver.
pub struct Exchange {
    driver: Arc<dyn Driver>,
    webhook: Webhook,
    state: DriverState,
    messages: Vec<IncomingMessage>,
    event: Option<DriverEvent>,
}

impl Exchange {
    pub fn driver(&self) -> &dyn Driver {
        self.driver.as_ref()
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn webhook(&self) -> &Webhook {
        &self.webhook
    }

    /// Extracted messages; empty for event-only exchanges.
    pub fn messages(&self) -> &[IncomingMessage] {
        &self.messages
    }

    pub fn event(&self) -> Option<&DriverEvent> {
        self.event.as_ref()
    }

    pub fn answer(&self, message: &IncomingMessage) -> Answer {
        self.driver.get_conversation_answer(message)
    }

    pub async fn user(&self, message: &IncomingMessage) -> User {
        self.driver.get_user(message).await
    }

    /// Builds the wire payload for a reply to `matching` without sending it.
    pub fn payload_for(&self, reply: &Reply, matching: &IncomingMessage, extra: &Value) -> Value {
        self.driver
            .build_service_payload(reply, matching, self.event.as_ref(), extra)
    }

    /// Replies to `matching` and marks the exchange as claimed.
    pub async fn reply_to(
        &mut self,
        matching: &IncomingMessage,
        reply: impl Into<Reply>,
        extra: &Value,
    ) -> Result<RawResponse, DriverError> {
        let payload = self.payload_for(&reply.into(), matching, extra);
        let response = self.driver.send_payload(payload).await?;
        self.state = DriverState::Claimed;
        Ok(response)
    }

    /// Replies to the first extracted message, or to the event sender when the
    /// exchange carries no message.
    pub async fn reply(
        &mut self,
        reply: impl Into<Reply>,
        extra: &Value,
    ) -> Result<RawResponse, DriverError> {
        let matching = self.messages.first().cloned().unwrap_or_default();
        self.reply_to(&matching, reply, extra).await
    }
}
