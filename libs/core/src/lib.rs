//! Greentic messaging driver core.
//!
//! Shared message model and the [`Driver`] contract that platform adapters implement:
//! request authentication, event classification, incoming-message extraction and
//! outgoing payload construction. The [`DriverDispatcher`] probes drivers until one
//! claims a webhook.
pub mod attachments;
pub mod config;
pub mod dispatch;
pub mod driver;
pub mod errors;
pub mod events;
pub mod http;
pub mod merge;
pub mod reply;
pub mod templates;
#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
pub mod types;
pub mod webhook;

pub use attachments::*;
pub use config::*;
pub use dispatch::*;
pub use driver::*;
pub use errors::*;
pub use events::DriverEvent;
pub use self::http::*;
pub use merge::*;
pub use reply::*;
pub use templates::Template;
pub use types::*;
pub use webhook::*;

/// Returns the semantic version advertised by this crate.
///
/// ```
/// assert_eq!(gsm_core::version(), env!("CARGO_PKG_VERSION"));
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
