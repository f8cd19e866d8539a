use crate::context::TelemetryLabels;
use ::metrics::Label;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::Span;

static METRICS_ENABLED: AtomicBool = AtomicBool::new(false);

pub fn set_metrics_enabled(enabled: bool) {
    METRICS_ENABLED.store(enabled, Ordering::SeqCst);
}

pub fn telemetry_enabled() -> bool {
    METRICS_ENABLED.load(Ordering::SeqCst)
}

pub fn with_common_fields(span: &Span, driver: &str, chat_id: Option<&str>, msg_id: Option<&str>) {
    span.record("driver", tracing::field::display(driver));
    if let Some(chat_id) = chat_id {
        span.record("chat_id", tracing::field::display(chat_id));
    }
    if let Some(msg_id) = msg_id {
        span.record("msg_id", tracing::field::display(msg_id));
    }
}

fn labels_of(labels: &TelemetryLabels) -> Vec<Label> {
    labels
        .tags()
        .into_iter()
        .map(|(key, value)| Label::new(key, value))
        .collect()
}

pub fn record_counter(name: &'static str, value: u64, labels: &TelemetryLabels) {
    if telemetry_enabled() {
        ::metrics::counter!(name, labels_of(labels)).increment(value);
    }
}

pub fn record_histogram(name: &'static str, value: f64, labels: &TelemetryLabels) {
    if telemetry_enabled() {
        ::metrics::histogram!(name, labels_of(labels)).record(value);
    }
}
