//! Session endpoints: register, login, refresh rotation, logout.
//!
//! Each successful login or registration starts an independent refresh chain;
//! concurrent sessions per user are permitted by design. Refresh rotates the
//! chain atomically, which is the anti-replay mechanism: a captured refresh
//! token replayed after use finds its fingerprint already revoked.

use argon2::{
    Argon2, PasswordHasher, PasswordVerifier,
    password_hash::{PasswordHash, SaltString, rand_core::OsRng},
};
use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, error};

use super::{
    roles::Role,
    state::AuthState,
    storage::{
        SignupOutcome, find_active_by_fingerprint, find_user_by_email, insert_refresh_token,
        insert_user, revoke_by_fingerprint, rotate_refresh_token,
    },
    token::TokenCodec,
    types::{
        AuthResponse, AuthUser, LoginRequest, LogoutRequest, RefreshRequest, RegisterRequest,
        TokenPairResponse,
    },
    utils::{normalize_email, valid_email, valid_password},
};
use crate::api::error::Error;

#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created, session started", body = AuthResponse),
        (status = 400, description = "Missing or malformed fields"),
        (status = 409, description = "Email already in use"),
    ),
    tag = "auth"
)]
pub async fn register(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<RegisterRequest>>,
) -> Result<impl IntoResponse, Error> {
    let Some(Json(payload)) = payload else {
        return Err(Error::Validation("Missing payload".to_string()));
    };

    let email = normalize_email(&payload.email);
    if email.is_empty() || payload.password.is_empty() {
        return Err(Error::Validation("email and password required".to_string()));
    }
    if !valid_email(&email) {
        return Err(Error::Validation("Invalid email".to_string()));
    }
    if !valid_password(&payload.password) {
        return Err(Error::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }
    // Role is client-suppliable at registration and validated against the
    // closed set; deployments wanting invite-only managers gate this route.
    let role = match payload.role.as_deref() {
        None => Role::default(),
        Some(value) => Role::parse(value).ok_or_else(|| {
            Error::Validation("Invalid role: expected resident, manager or staff".to_string())
        })?,
    };

    let password_hash = hash_password(&payload.password)?;
    let full_name = payload.full_name.as_deref().map(str::trim);
    let phone = payload.phone.as_deref().map(str::trim);

    let user_id = match insert_user(&pool, &email, &password_hash, full_name, phone, role).await? {
        SignupOutcome::Created(id) => id,
        SignupOutcome::Conflict => return Err(Error::Conflict),
    };

    debug!("registered user {user_id} with role {role}");

    let (access_token, refresh_token) =
        start_refresh_chain(&pool, &auth_state, user_id, &email, role).await?;

    let response = AuthResponse {
        user: AuthUser {
            id: user_id.to_string(),
            email,
            full_name: full_name.map(ToString::to_string),
            role,
        },
        access_token,
        refresh_token,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session started", body = AuthResponse),
        (status = 400, description = "Missing fields"),
        (status = 401, description = "Invalid credentials"),
    ),
    tag = "auth"
)]
pub async fn login(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<LoginRequest>>,
) -> Result<impl IntoResponse, Error> {
    let Some(Json(payload)) = payload else {
        return Err(Error::Validation("Missing payload".to_string()));
    };

    let email = normalize_email(&payload.email);
    if email.is_empty() || payload.password.is_empty() {
        return Err(Error::Validation("email and password required".to_string()));
    }

    // Unknown email and password mismatch are indistinguishable on the wire.
    let user = find_user_by_email(&pool, &email)
        .await?
        .ok_or(Error::InvalidCredentials)?;
    if !verify_password(&user.password_hash, &payload.password) {
        return Err(Error::InvalidCredentials);
    }

    let role = Role::parse(&user.role)
        .ok_or_else(|| anyhow::anyhow!("unknown role in users table: {}", user.role))?;

    // Prior chains stay active; each login starts its own (multiple devices).
    let (access_token, refresh_token) =
        start_refresh_chain(&pool, &auth_state, user.id, &user.email, role).await?;

    let response = AuthResponse {
        user: AuthUser {
            id: user.id.to_string(),
            email: user.email,
            full_name: user.full_name,
            role,
        },
        access_token,
        refresh_token,
    };
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Tokens rotated", body = TokenPairResponse),
        (status = 400, description = "Missing refresh token"),
        (status = 401, description = "Invalid, unrecognized or expired refresh token"),
    ),
    tag = "auth"
)]
pub async fn refresh(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<RefreshRequest>>,
) -> Result<impl IntoResponse, Error> {
    let Some(Json(payload)) = payload else {
        return Err(Error::Validation("refreshToken required".to_string()));
    };
    if payload.refresh_token.is_empty() {
        return Err(Error::Validation("refreshToken required".to_string()));
    }

    let claims = auth_state
        .codec()
        .verify_refresh(&payload.refresh_token)
        .map_err(|_| Error::InvalidCredential)?;

    let fingerprint = TokenCodec::fingerprint(&payload.refresh_token);
    let record = find_active_by_fingerprint(&pool, &fingerprint)
        .await?
        .ok_or(Error::Unrecognized)?;
    // The store-side expiry is authoritative over the embedded claim.
    if record.expired {
        return Err(Error::Expired);
    }

    // Identity for the new pair comes from the verified token; role changes
    // propagate at the next login, not mid-chain.
    let new_refresh = auth_state
        .codec()
        .issue_refresh(claims.sub, &claims.email, claims.role)
        .map_err(|err| anyhow::anyhow!("failed to sign refresh token: {err}"))?;
    let new_fingerprint = TokenCodec::fingerprint(&new_refresh);

    let rotated = rotate_refresh_token(
        &pool,
        record.id,
        record.user_id,
        &new_fingerprint,
        auth_state.codec().refresh_ttl_seconds(),
    )
    .await?;
    if !rotated {
        // Lost a race against a concurrent refresh of the same token.
        return Err(Error::Unrecognized);
    }

    let access_token = auth_state
        .codec()
        .issue_access(claims.sub, &claims.email, claims.role)
        .map_err(|err| anyhow::anyhow!("failed to sign access token: {err}"))?;

    let response = TokenPairResponse {
        access_token,
        refresh_token: new_refresh,
    };
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    request_body = LogoutRequest,
    responses(
        (status = 204, description = "Session revoked (best-effort, always succeeds)"),
    ),
    tag = "auth"
)]
pub async fn logout(
    pool: Extension<PgPool>,
    payload: Option<Json<LogoutRequest>>,
) -> impl IntoResponse {
    // Fail-soft by contract: a missing body, a garbage token, or a token with
    // no matching record all end the same way. The raw string is fingerprinted
    // without verification; a forged token's fingerprint matches nothing.
    let token = payload
        .and_then(|Json(payload)| payload.refresh_token)
        .filter(|token| !token.is_empty());

    if let Some(token) = token {
        let fingerprint = TokenCodec::fingerprint(&token);
        if let Err(err) = revoke_by_fingerprint(&pool, &fingerprint).await {
            error!("Failed to revoke refresh token on logout: {err:#}");
        }
    }

    StatusCode::NO_CONTENT
}

/// Issue an access/refresh pair and persist the refresh fingerprint.
async fn start_refresh_chain(
    pool: &PgPool,
    auth_state: &AuthState,
    user_id: uuid::Uuid,
    email: &str,
    role: Role,
) -> Result<(String, String), Error> {
    let access_token = auth_state
        .codec()
        .issue_access(user_id, email, role)
        .map_err(|err| anyhow::anyhow!("failed to sign access token: {err}"))?;
    let refresh_token = auth_state
        .codec()
        .issue_refresh(user_id, email, role)
        .map_err(|err| anyhow::anyhow!("failed to sign refresh token: {err}"))?;

    let fingerprint = TokenCodec::fingerprint(&refresh_token);
    insert_refresh_token(
        pool,
        user_id,
        &fingerprint,
        auth_state.codec().refresh_ttl_seconds(),
    )
    .await?;

    Ok((access_token, refresh_token))
}

fn hash_password(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| anyhow::anyhow!("failed to hash password: {err}"))?;
    Ok(hash.to_string())
}

fn verify_password(hash: &str, password: &str) -> bool {
    PasswordHash::new(hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}
