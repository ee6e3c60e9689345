//! Authenticated self-service profile endpoints.
//!
//! Flow Overview:
//! 1) Verify the bearer access token.
//! 2) Resolve the current user from the database.
//! 3) Apply allow-listed updates (full name, phone).

use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use super::auth::{AuthState, require_auth};
use crate::api::error::Error;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub role: String,
    pub created_at: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeUpdateRequest {
    pub full_name: Option<String>,
    pub phone: Option<String>,
}

#[utoipa::path(
    get,
    path = "/users/me",
    responses(
        (status = 200, description = "Authenticated user profile", body = MeResponse),
        (status = 401, description = "Missing or invalid access token"),
    ),
    tag = "me"
)]
pub async fn get_me(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> Result<impl IntoResponse, Error> {
    let principal = require_auth(&headers, &auth_state)?;

    // A token whose subject no longer exists is as good as invalid.
    let profile = fetch_profile(&pool, principal.id)
        .await?
        .ok_or(Error::InvalidAccess)?;
    Ok((StatusCode::OK, Json(profile)))
}

#[utoipa::path(
    put,
    path = "/users/me",
    request_body = MeUpdateRequest,
    responses(
        (status = 200, description = "Updated profile", body = MeResponse),
        (status = 400, description = "Missing payload"),
        (status = 401, description = "Missing or invalid access token"),
    ),
    tag = "me"
)]
pub async fn update_me(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<MeUpdateRequest>>,
) -> Result<impl IntoResponse, Error> {
    let principal = require_auth(&headers, &auth_state)?;

    let Some(Json(payload)) = payload else {
        return Err(Error::Validation("Missing payload".to_string()));
    };

    // Absent fields keep their prior value; an empty update is a no-op that
    // returns the current profile.
    let profile = update_profile(&pool, principal.id, payload.full_name, payload.phone)
        .await?
        .ok_or(Error::InvalidAccess)?;
    Ok((StatusCode::OK, Json(profile)))
}

async fn fetch_profile(pool: &PgPool, user_id: Uuid) -> Result<Option<MeResponse>, sqlx::Error> {
    let query = r#"
        SELECT
            id::text AS id,
            email,
            full_name,
            phone,
            role::text AS role,
            to_char(created_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at
        FROM users
        WHERE id = $1
        LIMIT 1
    "#;
    let row = sqlx::query(query)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|row| MeResponse {
        id: row.get("id"),
        email: row.get("email"),
        full_name: row.get("full_name"),
        phone: row.get("phone"),
        role: row.get("role"),
        created_at: row.get("created_at"),
    }))
}

async fn update_profile(
    pool: &PgPool,
    user_id: Uuid,
    full_name: Option<String>,
    phone: Option<String>,
) -> Result<Option<MeResponse>, sqlx::Error> {
    let query = r#"
        UPDATE users
        SET
            full_name = COALESCE($1, full_name),
            phone = COALESCE($2, phone)
        WHERE id = $3
        RETURNING
            id::text AS id,
            email,
            full_name,
            phone,
            role::text AS role,
            to_char(created_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at
    "#;
    let row = sqlx::query(query)
        .bind(full_name)
        .bind(phone)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|row| MeResponse {
        id: row.get("id"),
        email: row.get("email"),
        full_name: row.get("full_name"),
        phone: row.get("phone"),
        role: row.get("role"),
        created_at: row.get("created_at"),
    }))
}
