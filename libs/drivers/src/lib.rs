//! Platform drivers built on the [`gsm_core::Driver`] contract.
//!
//! * [`FacebookDriver`] handles Messenger webhooks signed with `X-Hub-Signature`.
//! * [`TelegramDriver`] handles text updates and callback queries.
//! * [`TelegramMediaDriver`] handles photo, video, audio, document and location
//!   updates, resolving file URLs through `getFile`.

use gsm_core::{DriverConfig, DriverDispatcher, HttpClient};
use std::sync::Arc;

pub mod facebook;
pub mod telegram;

pub use facebook::FacebookDriver;
pub use telegram::{TelegramDriver, TelegramMediaDriver};

/// Dispatcher probing every bundled driver: Facebook, Telegram text, then one
/// Telegram media driver per attachment kind.
pub fn default_dispatcher(config: &DriverConfig, http: Arc<dyn HttpClient>) -> DriverDispatcher {
    let mut dispatcher = DriverDispatcher::new()
        .with_driver(Arc::new(FacebookDriver::new(
            config.facebook.clone(),
            Arc::clone(&http),
        )))
        .with_driver(Arc::new(TelegramDriver::new(
            config.telegram.clone(),
            Arc::clone(&http),
        )));
    for driver in TelegramMediaDriver::all(&config.telegram, http) {
        dispatcher.register(Arc::new(driver));
    }
    dispatcher
}
