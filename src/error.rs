//! Error types for ta-client.

use thiserror::Error;

/// The main error type for ta-client.
#[derive(Debug, Error)]
pub enum Error {
    // ── Session ──────────────────────────────────────────────────────────────
    /// A 401 on an exempt or already-retried request, surfaced directly.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Error message from the API.
        message: String,
    },

    /// Session renewal failed; the session has been demoted to anonymous.
    #[error("Session renewal failed: {reason}")]
    RenewalFailed {
        /// Description of the renewal failure.
        reason: String,
    },

    // ── API ──────────────────────────────────────────────────────────────────
    /// API returned an error response.
    #[error("API error {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// A successful response whose body could not be decoded.
    #[error("Invalid response body: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    // ── Infrastructure ───────────────────────────────────────────────────────
    /// Network/HTTP error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Request timeout.
    #[error("Request timed out")]
    Timeout,

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns true if this error ended the current session.
    #[must_use]
    pub fn is_session_terminal(&self) -> bool {
        matches!(self, Error::RenewalFailed { .. })
    }

    /// Map a non-success exchange to the error surfaced to callers.
    ///
    /// Error bodies carry a `detail` field; fall back to the raw body when it
    /// is absent or not a string.
    pub(crate) fn from_response(status: reqwest::StatusCode, body: &str) -> Self {
        let message = detail_message(body);
        if status == reqwest::StatusCode::UNAUTHORIZED {
            Error::Unauthorized { message }
        } else {
            Error::Api {
                status: status.as_u16(),
                message,
            }
        }
    }
}

fn detail_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str().map(String::from)))
        .unwrap_or_else(|| body.to_string())
}

/// Convenience type alias.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_session_terminal() {
        assert!(Error::RenewalFailed { reason: "expired".into() }.is_session_terminal());

        assert!(!Error::Unauthorized { message: "nope".into() }.is_session_terminal());
        assert!(!Error::Timeout.is_session_terminal());
    }

    #[test]
    fn test_from_response_extracts_detail() {
        let err = Error::from_response(
            reqwest::StatusCode::CONFLICT,
            r#"{"detail": "Instrument with this ISIN already exists"}"#,
        );
        match err {
            Error::Api { status, message } => {
                assert_eq!(status, 409);
                assert_eq!(message, "Instrument with this ISIN already exists");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_from_response_unauthorized() {
        let err = Error::from_response(
            reqwest::StatusCode::UNAUTHORIZED,
            r#"{"detail": "Token invalid: could not decode"}"#,
        );
        assert!(matches!(err, Error::Unauthorized { .. }));
        assert!(err.to_string().contains("could not decode"));
    }

    #[test]
    fn test_from_response_raw_body_fallback() {
        let err = Error::from_response(reqwest::StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(err.to_string(), "API error 502: upstream down");
    }
}
