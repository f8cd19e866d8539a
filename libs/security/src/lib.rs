//! Request authentication for inbound webhooks.
//!
//! Platforms sign the raw request body (or echo a shared token) and drivers check it
//! here before trusting the payload. Every comparison is constant time.

pub mod signature;

pub use signature::{SignatureScheme, sign, validate};
