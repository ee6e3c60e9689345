//! Manager-only user management endpoints.

use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde::Serialize;
use sqlx::{PgPool, Row};
use std::sync::Arc;
use utoipa::ToSchema;

use super::auth::{AuthState, Role, require_auth, require_role};
use crate::api::error::Error;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub role: String,
    pub created_at: String,
}

#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "All users ordered by creation", body = [UserSummary]),
        (status = 401, description = "Missing or invalid access token"),
        (status = 403, description = "Caller is not a manager"),
    ),
    tag = "users"
)]
pub async fn list_users(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> Result<impl IntoResponse, Error> {
    let principal = require_auth(&headers, &auth_state)?;
    require_role(&principal, Role::Manager)?;

    let users = fetch_user_summaries(&pool).await?;
    Ok((StatusCode::OK, Json(users)))
}

async fn fetch_user_summaries(pool: &PgPool) -> Result<Vec<UserSummary>, sqlx::Error> {
    let query = r#"
        SELECT
            id::text AS id,
            email,
            full_name,
            role::text AS role,
            to_char(created_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at
        FROM users
        ORDER BY created_at
    "#;
    let rows = sqlx::query(query).fetch_all(pool).await?;
    Ok(rows
        .iter()
        .map(|row| UserSummary {
            id: row.get("id"),
            email: row.get("email"),
            full_name: row.get("full_name"),
            role: row.get("role"),
            created_at: row.get("created_at"),
        })
        .collect())
}
