//! Authentication wire types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Credentials for the password login flow.
///
/// Submitted form-encoded; the backend expects the OAuth2 password grant
/// field names (`username`, `password`), with the email as the username.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl LoginCredentials {
    /// Create login credentials.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Form fields in the shape the login endpoint expects.
    pub(crate) fn form_fields(&self) -> Vec<(String, String)> {
        vec![
            ("username".to_string(), self.email.clone()),
            ("password".to_string(), self.password.clone()),
        ]
    }
}

/// Token grant returned by the login and renewal endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    /// Bearer access token for subsequent requests.
    pub access_token: String,
    /// Always `bearer`.
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Access token lifetime in seconds.
    #[serde(default = "default_expires_in")]
    pub expires_in: i64,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

fn default_expires_in() -> i64 {
    900
}

/// The authenticated principal, as reported by the identity probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable account identifier.
    pub user_id: Uuid,
    /// Account email.
    pub email: String,
    /// Whether this account is the bootstrap administrator.
    #[serde(default)]
    pub is_bootstrap_admin: bool,
}

/// Acknowledgement returned by the sign-out endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct LogoutAck {
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_grant_defaults() {
        let grant: TokenGrant = serde_json::from_str(r#"{"access_token": "tok"}"#).unwrap();
        assert_eq!(grant.access_token, "tok");
        assert_eq!(grant.token_type, "bearer");
        assert_eq!(grant.expires_in, 900);
    }

    #[test]
    fn test_identity_round_trip() {
        let raw = r#"{"user_id": "6f0d7c2e-9f3a-4e58-8c7b-2c1d5a9e4b10", "email": "ops@example.com", "is_bootstrap_admin": true}"#;
        let identity: Identity = serde_json::from_str(raw).unwrap();
        assert_eq!(identity.email, "ops@example.com");
        assert!(identity.is_bootstrap_admin);
    }

    #[test]
    fn test_identity_admin_flag_defaults_false() {
        let raw = r#"{"user_id": "6f0d7c2e-9f3a-4e58-8c7b-2c1d5a9e4b10", "email": "ops@example.com"}"#;
        let identity: Identity = serde_json::from_str(raw).unwrap();
        assert!(!identity.is_bootstrap_admin);
    }

    #[test]
    fn test_login_form_fields() {
        let creds = LoginCredentials::new("ops@example.com", "hunter2hunter2");
        let fields = creds.form_fields();
        assert_eq!(fields[0], ("username".to_string(), "ops@example.com".to_string()));
        assert_eq!(fields[1].0, "password");
    }
}
