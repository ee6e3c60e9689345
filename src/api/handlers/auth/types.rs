//! Request/response types for auth endpoints (camelCase wire fields).

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::roles::Role;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    /// One of `resident`, `manager`, `staff`; validated in the handler so an
    /// unknown role yields a precise 400 instead of a generic decode failure.
    pub role: Option<String>,
    pub phone: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    pub refresh_token: Option<String>,
}

/// User shape returned by register/login; never includes the password hash.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub role: Role,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: AuthUser,
    pub access_token: String,
    pub refresh_token: String,
}

/// Response for a successful refresh rotation.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result};

    #[test]
    fn register_request_uses_camel_case() -> Result<()> {
        let request: RegisterRequest = serde_json::from_value(serde_json::json!({
            "email": "alice@example.com",
            "password": "Password1!",
            "fullName": "Alice",
            "role": "resident",
            "phone": "555-0100",
        }))?;
        assert_eq!(request.full_name.as_deref(), Some("Alice"));
        assert_eq!(request.role.as_deref(), Some("resident"));
        Ok(())
    }

    #[test]
    fn register_request_optionals_default_to_none() -> Result<()> {
        let request: RegisterRequest = serde_json::from_value(serde_json::json!({
            "email": "alice@example.com",
            "password": "Password1!",
        }))?;
        assert!(request.full_name.is_none());
        assert!(request.role.is_none());
        assert!(request.phone.is_none());
        Ok(())
    }

    #[test]
    fn auth_response_round_trips() -> Result<()> {
        let response = AuthResponse {
            user: AuthUser {
                id: "00000000-0000-0000-0000-000000000000".to_string(),
                email: "alice@example.com".to_string(),
                full_name: None,
                role: Role::Resident,
            },
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
        };
        let value = serde_json::to_value(&response)?;
        let token = value
            .get("accessToken")
            .and_then(serde_json::Value::as_str)
            .context("missing accessToken")?;
        assert_eq!(token, "access");
        assert_eq!(value["user"]["role"], serde_json::json!("resident"));
        let decoded: AuthResponse = serde_json::from_value(value)?;
        assert_eq!(decoded.refresh_token, "refresh");
        Ok(())
    }

    #[test]
    fn logout_request_tolerates_empty_body() -> Result<()> {
        let request: LogoutRequest = serde_json::from_value(serde_json::json!({}))?;
        assert!(request.refresh_token.is_none());
        Ok(())
    }
}
