use serde::{Deserialize, Serialize};

use crate::auth::Role;

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RegistrationRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Error payload returned by the services on non-2xx responses.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_parses_role() {
        let parsed: LoginResponse =
            serde_json::from_str(r#"{"token":"a.b.c","role":"auctioneer"}"#).unwrap();
        assert_eq!(parsed.role, Role::Auctioneer);
        assert_eq!(parsed.token, "a.b.c");
    }

    #[test]
    fn test_registration_request_shape() {
        let body = serde_json::to_value(RegistrationRequest {
            username: "ann".to_string(),
            email: "ann@example.com".to_string(),
            password: "pw".to_string(),
            role: Role::Client,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "username": "ann",
                "email": "ann@example.com",
                "password": "pw",
                "role": "client"
            })
        );
    }

    #[test]
    fn test_error_body_tolerates_missing_message() {
        let parsed: ErrorBody = serde_json::from_str("{}").unwrap();
        assert!(parsed.message.is_none());
    }
}
