//! Authenticated principal extraction and authorization helpers.
//!
//! The gate verifies the bearer access token by signature and expiry only and
//! never consults the store: access tokens are stateless and short-lived, so
//! revoking a refresh chain does not retro-invalidate ones already issued.

use axum::http::{HeaderMap, header::AUTHORIZATION};
use uuid::Uuid;

use super::roles::Role;
use super::state::AuthState;
use crate::api::error::Error;

/// Authenticated identity derived from a verified access token.
#[derive(Clone, Debug)]
pub struct Principal {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

/// Verify the `Authorization: Bearer` header into a principal.
///
/// # Errors
/// `Unauthenticated` when the header is missing or malformed,
/// `InvalidAccess` when the token fails verification.
pub fn require_auth(headers: &HeaderMap, state: &AuthState) -> Result<Principal, Error> {
    let token = extract_bearer_token(headers).ok_or(Error::Unauthenticated)?;
    let claims = state
        .codec()
        .verify_access(&token)
        .map_err(|_| Error::InvalidAccess)?;
    Ok(Principal {
        id: claims.sub,
        email: claims.email,
        role: claims.role,
    })
}

/// Exact-match role check; there is no hierarchy.
///
/// # Errors
/// `Forbidden` when the principal's role differs from the required one.
pub fn require_role(principal: &Principal, role: Role) -> Result<(), Error> {
    if principal.role == role {
        Ok(())
    } else {
        Err(Error::Forbidden)
    }
}

pub(crate) fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::auth::state::AuthConfig;
    use axum::http::HeaderValue;

    fn state() -> AuthState {
        AuthState::new(AuthConfig::new())
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        headers
    }

    #[test]
    fn require_auth_accepts_valid_token() {
        let state = state();
        let user_id = Uuid::new_v4();
        let token = state
            .codec()
            .issue_access(user_id, "alice@example.com", Role::Manager)
            .unwrap();

        let principal = require_auth(&bearer(&token), &state).unwrap();
        assert_eq!(principal.id, user_id);
        assert_eq!(principal.email, "alice@example.com");
        assert_eq!(principal.role, Role::Manager);
    }

    #[test]
    fn require_auth_missing_header_is_unauthenticated() {
        let err = require_auth(&HeaderMap::new(), &state()).unwrap_err();
        assert!(matches!(err, Error::Unauthenticated));
    }

    #[test]
    fn require_auth_malformed_header_is_unauthenticated() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        let err = require_auth(&headers, &state()).unwrap_err();
        assert!(matches!(err, Error::Unauthenticated));
    }

    #[test]
    fn require_auth_garbage_token_is_invalid() {
        let err = require_auth(&bearer("not-a-jwt"), &state()).unwrap_err();
        assert!(matches!(err, Error::InvalidAccess));
    }

    #[test]
    fn require_auth_rejects_refresh_token() {
        let state = state();
        let refresh = state
            .codec()
            .issue_refresh(Uuid::new_v4(), "a@example.com", Role::Resident)
            .unwrap();
        let err = require_auth(&bearer(&refresh), &state).unwrap_err();
        assert!(matches!(err, Error::InvalidAccess));
    }

    #[test]
    fn require_role_is_exact_match() {
        let principal = Principal {
            id: Uuid::new_v4(),
            email: "r@example.com".to_string(),
            role: Role::Resident,
        };
        assert!(require_role(&principal, Role::Resident).is_ok());
        let err = require_role(&principal, Role::Manager).unwrap_err();
        assert!(matches!(err, Error::Forbidden));
    }

    #[test]
    fn extract_bearer_token_handles_case_and_whitespace() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("bearer  abc "));
        assert_eq!(extract_bearer_token(&headers), Some("abc".to_string()));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(extract_bearer_token(&headers), None);
    }
}
