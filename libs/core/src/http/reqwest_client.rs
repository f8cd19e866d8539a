use super::{HttpClient, RawRequest, RawResponse};
use anyhow::{Context, Result};
use async_trait::async_trait;
use http::Uri;
use std::time::Duration;

/// [`HttpClient`] backed by a shared `reqwest::Client`.
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestHttpClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: RawRequest) -> Result<RawResponse> {
        let (parts, body) = request.into_parts();
        let url = parts.uri.to_string();
        let origin = origin(&parts.uri);
        let res = self
            .client
            .request(parts.method, &url)
            .headers(parts.headers)
            .timeout(self.timeout)
            .body(body)
            .send()
            .await
            .with_context(|| format!("request to {origin}"))?;
        let status = res.status();
        let headers = res.headers().clone();
        let body = res
            .bytes()
            .await
            .with_context(|| format!("read response from {origin}"))?;
        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

/// Scheme and authority only; paths may embed credentials (Telegram bot tokens).
fn origin(uri: &Uri) -> String {
    match (uri.scheme_str(), uri.authority()) {
        (Some(scheme), Some(authority)) => format!("{scheme}://{authority}"),
        _ => "<relative url>".to_string(),
    }
}
