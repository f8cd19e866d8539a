//! Lightweight helpers for driver telemetry.
//! Provides subscriber installation, span utilities and counters recorded through
//! the `metrics` facade.

use anyhow::Result;
use tracing::Span;

mod config;
mod context;
mod metrics;
mod tracing_init;

pub use config::TelemetryConfig;
pub use context::TelemetryLabels;
pub use metrics::{
    record_counter, record_histogram, set_metrics_enabled, telemetry_enabled, with_common_fields,
};
pub use tracing_init::init_telemetry;

pub const REQUESTS_MATCHED: &str = "driver_requests_matched";
pub const EVENTS_DETECTED: &str = "driver_events_detected";
pub const PAYLOADS_SENT: &str = "driver_payloads_sent";

/// Installs the shared subscriber configured from `RUST_LOG` and `LOG_FORMAT`.
pub fn install(service_name: &str) -> Result<()> {
    init_telemetry(TelemetryConfig::from_env(service_name))
}

/// Span wrapping one driver stage (`classify`, `extract`, `build`, `send`).
pub fn driver_span(driver: &str, stage: &'static str) -> Span {
    let span = tracing::info_span!(
        "driver",
        stage,
        driver = tracing::field::Empty,
        chat_id = tracing::field::Empty,
        msg_id = tracing::field::Empty,
    );
    with_common_fields(&span, driver, None, None);
    span
}
