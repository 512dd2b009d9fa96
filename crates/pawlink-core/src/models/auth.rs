//! Wire types for the authentication endpoints.

use serde::{Deserialize, Serialize};

use super::user::User;

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyEmailRequest {
    pub email: String,
    pub code: String,
}

/// Returned by login, signup, and email verification. Carries the token
/// pair that seeds the session.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub success: bool,
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Refresh reply. `refresh_token` is only present when the server rotates it.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Generic acknowledgment body some endpoints return alongside a status code.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_response_parses_backend_shape() {
        let json = r#"{
            "success": true,
            "access_token": "A1",
            "refresh_token": "R1",
            "user": {"id": 1, "name": "Ana Lima", "email": "ana@example.com", "role": "user"}
        }"#;
        let parsed: AuthResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.success);
        assert_eq!(parsed.access_token, "A1");
        assert_eq!(parsed.refresh_token, "R1");
        assert_eq!(parsed.user.name, "Ana Lima");
    }

    #[test]
    fn test_refresh_response_without_rotation() {
        let parsed: RefreshResponse = serde_json::from_str(r#"{"access_token": "A2"}"#).unwrap();
        assert_eq!(parsed.access_token, "A2");
        assert!(parsed.refresh_token.is_none());
    }

    #[test]
    fn test_refresh_request_wire_shape() {
        let body = RefreshRequest {
            refresh_token: "R1".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"refresh_token":"R1"}"#
        );
    }
}
