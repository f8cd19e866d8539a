use crate::errors::DriverError;
use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Request};
use serde_json::{Map, Value};

/// Raw webhook as handed over by the HTTP transport.
#[derive(Debug, Clone, Default)]
pub struct IncomingRequest {
    pub body: Bytes,
    pub headers: HeaderMap,
}

impl IncomingRequest {
    pub fn new(body: impl Into<Bytes>) -> Self {
        Self {
            body: body.into(),
            headers: HeaderMap::new(),
        }
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

impl From<Request<Bytes>> for IncomingRequest {
    fn from(request: Request<Bytes>) -> Self {
        let (parts, body) = request.into_parts();
        Self {
            body,
            headers: parts.headers,
        }
    }
}

/// Decoded, immutable view of one webhook call.
///
/// Built once per request and passed by reference to every driver that is probed,
/// so drivers never cache request state of their own.
#[derive(Debug, Clone)]
pub struct Webhook {
    body: Bytes,
    headers: HeaderMap,
    payload: Value,
}

impl Webhook {
    /// Decodes the JSON body. An empty body decodes to an empty object; anything
    /// that is not JSON is rejected.
    ///
    /// ```
    /// use gsm_core::{IncomingRequest, Webhook};
    ///
    /// let hook = Webhook::decode(&IncomingRequest::new(r#"{"entry":[]}"#)).unwrap();
    /// assert!(hook.payload()["entry"].is_array());
    /// assert!(Webhook::decode(&IncomingRequest::new("not json")).is_err());
    /// ```
    pub fn decode(request: &IncomingRequest) -> Result<Self, DriverError> {
        let payload = if request.body.iter().all(u8::is_ascii_whitespace) {
            Value::Object(Map::new())
        } else {
            serde_json::from_slice(&request.body)?
        };
        Ok(Self {
            body: request.body.clone(),
            headers: request.headers.clone(),
            payload,
        })
    }

    /// Unparsed body; signatures are computed over these exact bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Header value as text; missing or non-UTF-8 headers read as `None`.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}
