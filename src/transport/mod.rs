//! Transport layer: single request/response exchanges against the API.

pub mod headers;
pub mod http;

use async_trait::async_trait;
use reqwest::{Method, StatusCode};

use crate::error::Result;

pub use http::HttpTransport;

/// One outbound API call, described independently of the HTTP engine.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the API base, e.g. `/portfolios`.
    pub path: String,
    /// JSON body, if any.
    pub body: Option<serde_json::Value>,
    /// Form-encoded body, if any (the login flow).
    pub form: Option<Vec<(String, String)>>,
    /// Bearer credential attached at dispatch time; `None` when anonymous.
    pub bearer: Option<String>,
    /// Set once the request has been replayed after a renewal.
    pub retried: bool,
}

impl ApiRequest {
    /// A GET request for `path`.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// A POST request for `path`.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// A PUT request for `path`.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            form: None,
            bearer: None,
            retried: false,
        }
    }

    /// Attach a JSON body.
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach a form-encoded body.
    pub fn form(mut self, fields: Vec<(String, String)>) -> Self {
        self.form = Some(fields);
        self
    }

    /// Attach a session credential; `None` leaves the request anonymous.
    ///
    /// This is a pure snapshot of the session at call time. A stale credential
    /// is corrected by the renewal path, not by locking here.
    pub fn with_bearer(mut self, bearer: Option<String>) -> Self {
        self.bearer = bearer;
        self
    }

    /// Mark this request as having entered the renewal path once.
    pub(crate) fn mark_retried(mut self) -> Self {
        self.retried = true;
        self
    }
}

/// A completed request/response exchange.
#[derive(Debug, Clone)]
pub struct Exchange {
    /// HTTP status.
    pub status: StatusCode,
    /// Raw response body.
    pub body: String,
}

impl Exchange {
    /// Decode the body as JSON.
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Performs a single outbound request/response exchange.
///
/// The production implementation is [`HttpTransport`]; tests substitute
/// scripted fakes. Implementations own connection-level concerns (timeouts,
/// cookies) and must surface their own deadline as `Error::Timeout`, so a
/// hung renewal exchange cannot wedge the coordinator.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one exchange. `Err` is reserved for transport-level failures;
    /// any HTTP status, including failures, is a completed exchange.
    async fn exchange(&self, request: &ApiRequest) -> Result<Exchange>;
}
