//! Identity records and auth payloads.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::types::{Email, Role, UserId};

/// The authenticated user's identity record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<UserId>,
    pub email: Email,
    #[serde(default)]
    pub role: Role,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

const fn default_active() -> bool {
    true
}

impl User {
    /// Whether this user may manage the catalog.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Body of `POST /auth/login` and `POST /auth/register`.
///
/// `Debug` is implemented manually to redact the password.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: Email,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Successful `POST /auth/login` response.
///
/// `Debug` is implemented manually to redact the token.
#[derive(Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: User,
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse")
            .field("access_token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_login_response() {
        let response: LoginResponse = serde_json::from_value(json!({
            "access_token": "abc.def.ghi",
            "token_type": "bearer",
            "user": {
                "id": 1,
                "email": "admin@example.com",
                "role": "ADMIN",
                "is_active": true,
                "created_at": "2025-01-01T00:00:00"
            }
        }))
        .unwrap();

        assert!(response.user.is_admin());
        assert_eq!(response.user.id, Some(UserId::new(1)));
    }

    #[test]
    fn test_minimal_identity_record() {
        let user: User =
            serde_json::from_value(json!({ "email": "ana@example.com", "role": "USER" })).unwrap();
        assert!(!user.is_admin());
        assert!(user.is_active);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let credentials = Credentials {
            email: Email::parse("ana@example.com").unwrap(),
            password: "hunter22".to_string(),
        };
        let output = format!("{credentials:?}");
        assert!(output.contains("[REDACTED]"));
        assert!(!output.contains("hunter22"));
    }
}
