use thiserror::Error;

/// Failures surfaced by drivers and the dispatcher.
///
/// Classification and extraction never produce these; they degrade to placeholder
/// values instead. Only undecodable webhook bodies and outbound calls fail hard.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("driver {driver} is not configured")]
    NotConfigured { driver: &'static str },
    #[error("request signature rejected by {driver}")]
    AuthenticationFailed { driver: &'static str },
    #[error("malformed webhook payload: {message}")]
    MalformedPayload {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },
    #[error("upstream fetch from {url} failed: {reason}")]
    UpstreamFetchFailed { url: String, reason: String },
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

impl DriverError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedPayload {
            message: message.into(),
            source: None,
        }
    }

    pub fn upstream(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::UpstreamFetchFailed {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<serde_json::Error> for DriverError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedPayload {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

pub type DriverResult<T> = Result<T, DriverError>;
