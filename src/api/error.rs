//! API error taxonomy and HTTP mapping.
//!
//! Every handler returns `Result<_, Error>`; the `IntoResponse` impl turns a
//! domain failure into the right status code with a safe `{"message"}` body.
//! Store and other unexpected failures convert into `Internal` via the `From`
//! impls below, which log the source chain server-side and never leak detail
//! to the caller.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed or missing input (400).
    #[error("{0}")]
    Validation(String),

    /// Duplicate unique key, currently only the user email (409).
    #[error("Email already in use")]
    Conflict,

    /// Unknown email or password mismatch on login (401). The two causes are
    /// indistinguishable on the wire.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Refresh token failed signature or embedded-expiry verification (401).
    #[error("Invalid refresh token")]
    InvalidCredential,

    /// No active fingerprint record matches the refresh token (401). Also the
    /// outcome for the loser of a concurrent rotation race.
    #[error("Refresh token not recognized")]
    Unrecognized,

    /// The matched fingerprint record is past its store-side expiry (401).
    #[error("Refresh token expired")]
    Expired,

    /// Missing or malformed `Authorization: Bearer` header (401).
    #[error("Missing authorization token")]
    Unauthenticated,

    /// Access token failed signature or expiry verification (401).
    #[error("Invalid or expired token")]
    InvalidAccess,

    /// Authenticated but the role does not match the required one (403).
    #[error("Forbidden: insufficient role")]
    Forbidden,

    /// Store or other unexpected failure (500).
    #[error("Server error")]
    Internal,
}

impl Error {
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Conflict => StatusCode::CONFLICT,
            Self::InvalidCredentials
            | Self::InvalidCredential
            | Self::Unrecognized
            | Self::Expired
            | Self::Unauthenticated
            | Self::InvalidAccess => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "message": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        error!("Database error: {err}");
        Self::Internal
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        error!("Internal error: {err:#}");
        Self::Internal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_message(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        value["message"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn validation_returns_400_with_message() {
        let response = Error::Validation("email and password required".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_message(response).await, "email and password required");
    }

    #[tokio::test]
    async fn conflict_returns_409() {
        let response = Error::Conflict.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(body_message(response).await, "Email already in use");
    }

    #[tokio::test]
    async fn refresh_failures_return_401() {
        for err in [Error::InvalidCredential, Error::Unrecognized, Error::Expired] {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[tokio::test]
    async fn forbidden_returns_403() {
        let response = Error::Forbidden.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_message(response).await, "Forbidden: insufficient role");
    }

    #[tokio::test]
    async fn internal_hides_detail() {
        let err = Error::from(sqlx::Error::RowNotFound);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_message(response).await, "Server error");
    }
}
