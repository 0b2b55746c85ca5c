//! reqwest-backed transport with a cookie store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::Url;
use tracing::debug;

use crate::config;
use crate::error::{Error, Result};
use crate::transport::{headers, ApiRequest, Exchange, Transport};

/// Production transport: a pooled `reqwest` client with a cookie store.
///
/// The cookie store owns the HttpOnly renewal cookie and its CSRF twin as set
/// by the backend. When a request targets the renewal endpoint, this layer
/// mirrors the CSRF cookie into the double-submit header; the renewal cookie
/// itself rides along automatically.
pub struct HttpTransport {
    client: reqwest::Client,
    jar: Arc<Jar>,
    base_url: Url,
}

impl HttpTransport {
    /// Create a transport for the given API base URL with default timeouts.
    pub fn new(base_url: Url) -> Result<Self> {
        Self::with_timeouts(base_url, config::CONNECT_TIMEOUT, config::REQUEST_TIMEOUT)
    }

    /// Create a transport with explicit timeouts.
    pub fn with_timeouts(
        base_url: Url,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self> {
        let jar = Arc::new(Jar::default());
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .cookie_provider(Arc::clone(&jar))
            .build()?;

        Ok(Self {
            client,
            jar,
            base_url,
        })
    }

    fn request_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    /// Read the CSRF cookie value from the cookie store, if present.
    fn csrf_token(&self) -> Option<String> {
        let header = self.jar.cookies(&self.base_url)?;
        let raw = header.to_str().ok()?;
        raw.split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == config::CSRF_COOKIE)
            .map(|(_, value)| value.to_string())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn exchange(&self, request: &ApiRequest) -> Result<Exchange> {
        let url = self.request_url(&request.path);

        let hdrs = if request.path == config::REFRESH_PATH {
            match self.csrf_token() {
                Some(csrf) => headers::renewal_headers(request.bearer.as_deref(), &csrf),
                None => headers::api_headers(request.bearer.as_deref()),
            }
        } else {
            headers::api_headers(request.bearer.as_deref())
        };

        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .headers(hdrs);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(fields) = &request.form {
            builder = builder.form(fields);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout
            } else {
                Error::Network(e)
            }
        })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        debug!(
            status = status.as_u16(),
            path = request.path.as_str(),
            "Exchange complete"
        );

        Ok(Exchange { status, body })
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_url_joins_paths() {
        let transport =
            HttpTransport::new(Url::parse("http://localhost:8000/api/v1").unwrap()).unwrap();
        assert_eq!(
            transport.request_url("/portfolios"),
            "http://localhost:8000/api/v1/portfolios"
        );
    }

    #[test]
    fn test_request_url_tolerates_trailing_slash() {
        let transport =
            HttpTransport::new(Url::parse("http://localhost:8000/api/v1/").unwrap()).unwrap();
        assert_eq!(
            transport.request_url("/auth/refresh"),
            "http://localhost:8000/api/v1/auth/refresh"
        );
    }

    #[test]
    fn test_csrf_token_read_from_jar() {
        let base = Url::parse("http://localhost:8000/api/v1").unwrap();
        let transport = HttpTransport::new(base.clone()).unwrap();
        transport
            .jar
            .add_cookie_str("ta_csrf=csrf-value-1; Path=/", &base);
        transport
            .jar
            .add_cookie_str("other=x; Path=/", &base);
        assert_eq!(transport.csrf_token().as_deref(), Some("csrf-value-1"));
    }

    #[test]
    fn test_csrf_token_absent() {
        let transport =
            HttpTransport::new(Url::parse("http://localhost:8000/api/v1").unwrap()).unwrap();
        assert!(transport.csrf_token().is_none());
    }
}
