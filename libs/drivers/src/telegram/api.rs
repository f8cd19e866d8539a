use gsm_core::{DriverError, HttpClient, RawResponse, TelegramConfig};
use gsm_telemetry::driver_span;
use http::HeaderMap;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{Instrument, warn};

const DEFAULT_METHOD: &str = "sendMessage";

#[derive(Debug, Clone, Deserialize)]
struct TelegramResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct TelegramFile {
    file_path: Option<String>,
}

/// Bot API access shared by the text and media drivers.
#[derive(Clone)]
pub struct TelegramApi {
    api_base: String,
    token: Option<String>,
    http: Arc<dyn HttpClient>,
}

impl TelegramApi {
    pub fn new(config: &TelegramConfig, http: Arc<dyn HttpClient>) -> Self {
        Self {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            http,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.token.is_some()
    }

    fn token(&self, driver: &'static str) -> Result<&str, DriverError> {
        self.token
            .as_deref()
            .ok_or(DriverError::NotConfigured { driver })
    }

    fn method_url(&self, token: &str, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, token, method)
    }

    fn file_url(&self, token: &str, file_path: &str) -> String {
        format!("{}/file/bot{}/{}", self.api_base, token, file_path)
    }

    /// Resolves a `file_id` to a download URL via `getFile`.
    pub async fn file_url_for(
        &self,
        driver: &'static str,
        file_id: &str,
    ) -> Result<String, DriverError> {
        let token = self.token(driver)?;
        // the bot token is part of the path, keep it out of errors
        let redacted = self.method_url("<token>", "getFile");
        let response = self
            .http
            .get(&self.method_url(token, "getFile"), &[("file_id", file_id)])
            .await
            .map_err(|err| DriverError::upstream(redacted.as_str(), err))?;
        let body: TelegramResponse<TelegramFile> = response
            .json()
            .map_err(|err| DriverError::upstream(redacted.as_str(), err))?;
        if !body.ok {
            let reason = body
                .description
                .unwrap_or_else(|| format!("status {}", response.status));
            return Err(DriverError::upstream(redacted, reason));
        }
        let file_path = body
            .result
            .and_then(|file| file.file_path)
            .ok_or_else(|| DriverError::upstream(redacted.as_str(), "missing file_path"))?;
        Ok(self.file_url(token, &file_path))
    }

    /// Posts `payload` to the Bot API method named by its `method` field.
    pub async fn call(
        &self,
        driver: &'static str,
        mut payload: Value,
    ) -> Result<RawResponse, DriverError> {
        let token = self.token(driver)?;
        let method = extract_method(&mut payload)?;
        let response = self
            .http
            .post_json(&self.method_url(token, &method), &HeaderMap::new(), &payload)
            .instrument(driver_span(driver, "send"))
            .await?;
        if !response.is_success() {
            warn!(status = %response.status, method = %method, "telegram api rejected request");
        }
        Ok(response)
    }
}

pub(crate) fn extract_method(payload: &mut Value) -> Result<String, DriverError> {
    let Some(obj) = payload.as_object_mut() else {
        return Err(DriverError::malformed("telegram payload must be an object"));
    };
    match obj.remove("method") {
        None => Ok(DEFAULT_METHOD.to_string()),
        Some(Value::String(method)) if !method.is_empty() => Ok(method),
        Some(_) => Err(DriverError::malformed(
            "telegram method must be a non-empty string",
        )),
    }
}
