//! In-memory collaborators for driver tests.

use crate::http::{HttpClient, RawRequest, RawResponse};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use bytes::Bytes;
use http::{Method, StatusCode};
use serde_json::Value;
use std::sync::Mutex;

/// Request captured by [`MockHttpClient`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub body: Value,
}

enum Route {
    Respond(StatusCode, Value),
    Fail(String),
}

/// Records every request and answers from routes matched by URL substring.
///
/// Unrouted requests get `200 {}`.
#[derive(Default)]
pub struct MockHttpClient {
    routes: Mutex<Vec<(String, Route)>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, url_fragment: &str, status: StatusCode, body: Value) -> Self {
        self.push(url_fragment, Route::Respond(status, body));
        self
    }

    pub fn fail(self, url_fragment: &str, reason: &str) -> Self {
        self.push(url_fragment, Route::Fail(reason.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn push(&self, url_fragment: &str, route: Route) {
        self.routes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((url_fragment.to_string(), route));
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn execute(&self, request: RawRequest) -> Result<RawResponse> {
        let (parts, body) = request.into_parts();
        let url = parts.uri.to_string();
        let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(RecordedRequest {
                method: parts.method,
                url: url.clone(),
                body,
            });

        let routes = self
            .routes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match routes.iter().find(|(fragment, _)| url.contains(fragment.as_str())) {
            Some((_, Route::Respond(status, body))) => Ok(RawResponse::new(
                *status,
                Bytes::from(serde_json::to_vec(body)?),
            )),
            Some((_, Route::Fail(reason))) => Err(anyhow!("{reason}")),
            None => Ok(RawResponse::new(StatusCode::OK, Bytes::from_static(b"{}"))),
        }
    }
}
