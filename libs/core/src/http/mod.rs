//! Outbound HTTP collaborator.
//!
//! Drivers only build requests; delivery goes through an [`HttpClient`] supplied by
//! the host. Retries and backoff belong to the client implementation.

mod reqwest_client;

pub use reqwest_client::ReqwestHttpClient;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue, Method, Request, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RawResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).context("decode response body")
    }
}

pub type RawRequest = Request<Bytes>;

#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, request: RawRequest) -> Result<RawResponse>;

    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<RawResponse> {
        let parsed = if query.is_empty() {
            url::Url::parse(url)
        } else {
            url::Url::parse_with_params(url, query)
        };
        // the url may embed credentials, so it stays out of the error
        let uri = parsed.context("invalid request url")?;
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri.as_str())
            .body(Bytes::new())?;
        self.execute(request).await
    }

    async fn post_json(&self, url: &str, headers: &HeaderMap, body: &Value) -> Result<RawResponse> {
        let mut request = Request::builder()
            .method(Method::POST)
            .uri(url)
            .body(Bytes::from(serde_json::to_vec(body)?))?;
        request.headers_mut().extend(headers.clone());
        request
            .headers_mut()
            .entry(CONTENT_TYPE)
            .or_insert(HeaderValue::from_static("application/json"));
        self.execute(request).await
    }
}
