//! Configuration constants and endpoint paths for the Trading Assistant API.

use std::time::Duration;

/// Default API base URL (local development server).
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";

/// Connect timeout for HTTP requests.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for requests.
///
/// Renewal goes through the same transport, so this also bounds how long the
/// coordinator can sit in the renewing state.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent sent with every request.
pub const USER_AGENT: &str = "ta-client/0.1.0";

/// Password login endpoint (form-encoded OAuth2 password flow).
pub const LOGIN_PATH: &str = "/auth/login";

/// Session renewal endpoint (cookie-authenticated, CSRF double-submit).
pub const REFRESH_PATH: &str = "/auth/refresh";

/// Identity probe endpoint.
pub const ME_PATH: &str = "/auth/me";

/// Sign-out endpoint (clears the renewal cookies server-side).
pub const LOGOUT_PATH: &str = "/auth/logout";

/// CSRF twin cookie set by the backend alongside the renewal cookie.
pub const CSRF_COOKIE: &str = "ta_csrf";

/// CSRF double-submit header expected by the renewal endpoint.
pub const CSRF_HEADER: &str = "x-csrf-token";

/// Endpoints that must never trigger session renewal.
///
/// The login, renewal, and identity-probe endpoints are part of the
/// authentication flow itself; a 401 from any of them is surfaced directly
/// rather than recursing into renewal.
pub const RENEWAL_EXEMPT_PATHS: &[&str] = &[LOGIN_PATH, REFRESH_PATH, ME_PATH];

/// Returns true if the path must never trigger renewal.
pub fn is_renewal_exempt(path: &str) -> bool {
    RENEWAL_EXEMPT_PATHS.iter().any(|p| path.starts_with(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_flow_paths_exempt() {
        assert!(is_renewal_exempt(LOGIN_PATH));
        assert!(is_renewal_exempt(REFRESH_PATH));
        assert!(is_renewal_exempt(ME_PATH));
    }

    #[test]
    fn test_business_paths_not_exempt() {
        assert!(!is_renewal_exempt("/portfolios"));
        assert!(!is_renewal_exempt("/registry/instruments"));
        assert!(!is_renewal_exempt(LOGOUT_PATH));
    }

    #[test]
    fn test_exemption_covers_query_strings() {
        assert!(is_renewal_exempt("/auth/me?verbose=1"));
    }
}
