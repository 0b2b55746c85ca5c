//! Request header construction.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::config;

/// Build the standard headers for API requests.
///
/// Attaches the bearer credential when one is present; anonymous requests
/// carry no authorization header.
pub fn api_headers(bearer: Option<&str>) -> HeaderMap {
    let mut headers = HeaderMap::new();

    headers.insert(
        reqwest::header::ACCEPT,
        HeaderValue::from_static("application/json"),
    );

    headers.insert(
        reqwest::header::USER_AGENT,
        HeaderValue::from_static(config::USER_AGENT),
    );

    if let Some(token) = bearer {
        headers.insert(
            reqwest::header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token))
                .unwrap_or_else(|_| HeaderValue::from_static("Bearer invalid")),
        );
    }

    headers
}

/// Headers for the renewal endpoint: the standard set plus the CSRF
/// double-submit header mirroring the CSRF cookie value.
pub fn renewal_headers(bearer: Option<&str>, csrf_token: &str) -> HeaderMap {
    let mut headers = api_headers(bearer);

    headers.insert(
        HeaderName::from_static(config::CSRF_HEADER),
        HeaderValue::from_str(csrf_token).unwrap_or_else(|_| HeaderValue::from_static("")),
    );

    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_attached_when_present() {
        let headers = api_headers(Some("tok-123"));
        assert_eq!(
            headers.get(reqwest::header::AUTHORIZATION).unwrap(),
            "Bearer tok-123"
        );
    }

    #[test]
    fn test_anonymous_has_no_authorization() {
        let headers = api_headers(None);
        assert!(headers.get(reqwest::header::AUTHORIZATION).is_none());
        assert!(headers.get(reqwest::header::USER_AGENT).is_some());
    }

    #[test]
    fn test_renewal_headers_carry_csrf() {
        let headers = renewal_headers(None, "csrf-abc");
        assert_eq!(headers.get(config::CSRF_HEADER).unwrap(), "csrf-abc");
    }
}
