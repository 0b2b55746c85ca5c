//! Failure classification for completed exchanges.

use reqwest::StatusCode;

use crate::config;

/// What to do with a completed exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// 2xx; pass the result through unchanged.
    Success,
    /// Expired or invalid session on a renewable request; enter the renewal
    /// path.
    NeedsRenewal,
    /// An auth failure that must not trigger renewal: the endpoint is part of
    /// the authentication flow, or the request has already been replayed once.
    Exempt,
    /// Any other failure; propagate unchanged.
    Fatal,
}

/// Classify a completed exchange.
///
/// Renewal is triggered only by a 401 on a non-exempt path that has not been
/// retried. The exemption set and the retried-once bound together guarantee
/// the renewal cycle cannot recurse.
pub fn classify(status: StatusCode, path: &str, retried: bool) -> Disposition {
    if status.is_success() {
        return Disposition::Success;
    }
    if status != StatusCode::UNAUTHORIZED {
        return Disposition::Fatal;
    }
    if config::is_renewal_exempt(path) || retried {
        return Disposition::Exempt;
    }
    Disposition::NeedsRenewal
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_success_passthrough() {
        assert_eq!(
            classify(StatusCode::OK, "/portfolios", false),
            Disposition::Success
        );
        assert_eq!(
            classify(StatusCode::CREATED, "/registry/instruments", false),
            Disposition::Success
        );
    }

    #[test]
    fn test_expired_session_needs_renewal() {
        assert_eq!(
            classify(StatusCode::UNAUTHORIZED, "/portfolios", false),
            Disposition::NeedsRenewal
        );
    }

    #[test]
    fn test_auth_flow_endpoints_exempt() {
        assert_eq!(
            classify(StatusCode::UNAUTHORIZED, config::LOGIN_PATH, false),
            Disposition::Exempt
        );
        assert_eq!(
            classify(StatusCode::UNAUTHORIZED, config::REFRESH_PATH, false),
            Disposition::Exempt
        );
        assert_eq!(
            classify(StatusCode::UNAUTHORIZED, config::ME_PATH, false),
            Disposition::Exempt
        );
    }

    #[test]
    fn test_retried_request_exempt() {
        assert_eq!(
            classify(StatusCode::UNAUTHORIZED, "/portfolios", true),
            Disposition::Exempt
        );
    }

    #[test]
    fn test_other_failures_fatal() {
        assert_eq!(
            classify(StatusCode::FORBIDDEN, "/portfolios", false),
            Disposition::Fatal
        );
        assert_eq!(
            classify(StatusCode::CONFLICT, "/registry/instruments", false),
            Disposition::Fatal
        );
        assert_eq!(
            classify(StatusCode::INTERNAL_SERVER_ERROR, "/portfolios", false),
            Disposition::Fatal
        );
    }

    proptest! {
        // A retried request can never re-enter the renewal path.
        #[test]
        fn retried_never_needs_renewal(code in 100u16..600, path in "/[a-z/]{0,20}") {
            let status = StatusCode::from_u16(code).unwrap();
            prop_assert_ne!(classify(status, &path, true), Disposition::NeedsRenewal);
        }

        // Auth-flow endpoints can never trigger renewal, whatever the status.
        #[test]
        fn exempt_paths_never_need_renewal(code in 100u16..600, retried: bool) {
            let status = StatusCode::from_u16(code).unwrap();
            for path in config::RENEWAL_EXEMPT_PATHS {
                prop_assert_ne!(classify(status, path, retried), Disposition::NeedsRenewal);
            }
        }

        // Only a 401 can put a request into the renewal path.
        #[test]
        fn only_unauthorized_triggers_renewal(code in 100u16..600) {
            let status = StatusCode::from_u16(code).unwrap();
            if classify(status, "/portfolios", false) == Disposition::NeedsRenewal {
                prop_assert_eq!(status, StatusCode::UNAUTHORIZED);
            }
        }
    }
}
