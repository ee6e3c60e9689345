//! Database helpers for users and refresh-credential fingerprints.
//!
//! Refresh rows are append-only: rotation and logout revoke, nothing deletes.
//! Expired and revoked rows accumulate as an audit trail; there is no
//! background cleanup.

use anyhow::{Context, Result};
use sqlx::{PgPool, Row};
use tracing::Instrument;
use uuid::Uuid;

use super::roles::Role;
use super::utils::is_unique_violation;

/// Outcome when attempting to create a new user.
#[derive(Debug)]
pub(super) enum SignupOutcome {
    Created(Uuid),
    Conflict,
}

/// User fields needed for login and token issuance.
pub(super) struct UserRecord {
    pub(super) id: Uuid,
    pub(super) email: String,
    pub(super) password_hash: String,
    pub(super) full_name: Option<String>,
    pub(super) role: String,
}

/// Active fingerprint row. `expired` is computed store-side so the one clock
/// that rules expiry decisions is the database's.
pub(super) struct RefreshRecord {
    pub(super) id: Uuid,
    pub(super) user_id: Uuid,
    pub(super) expired: bool,
}

pub(super) async fn insert_user(
    pool: &PgPool,
    email: &str,
    password_hash: &str,
    full_name: Option<&str>,
    phone: Option<&str>,
    role: Role,
) -> Result<SignupOutcome> {
    let query = r"
        INSERT INTO users
            (email, password_hash, full_name, phone, role)
        VALUES ($1, $2, $3, $4, $5::user_role)
        RETURNING id
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .bind(password_hash)
        .bind(full_name)
        .bind(phone)
        .bind(role.as_str())
        .fetch_one(pool)
        .instrument(span)
        .await;

    match row {
        Ok(row) => Ok(SignupOutcome::Created(row.get("id"))),
        Err(err) if is_unique_violation(&err) => Ok(SignupOutcome::Conflict),
        Err(err) => Err(err).context("failed to insert user"),
    }
}

pub(super) async fn find_user_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRecord>> {
    let query = r"
        SELECT id, email, password_hash, full_name, role::text AS role
        FROM users
        WHERE email = $1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup user by email")?;

    Ok(row.map(|row| UserRecord {
        id: row.get("id"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        full_name: row.get("full_name"),
        role: row.get("role"),
    }))
}

/// Find the newest non-revoked record for a fingerprint. Callers distinguish
/// "no row" (unrecognized) from "row past expiry" via the `expired` flag.
pub(super) async fn find_active_by_fingerprint(
    pool: &PgPool,
    fingerprint: &[u8],
) -> Result<Option<RefreshRecord>> {
    let query = r"
        SELECT id, user_id, expires_at <= NOW() AS expired
        FROM refresh_tokens
        WHERE token_hash = $1
          AND NOT revoked
        ORDER BY created_at DESC
        LIMIT 1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(fingerprint)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup refresh token")?;

    Ok(row.map(|row| RefreshRecord {
        id: row.get("id"),
        user_id: row.get("user_id"),
        expired: row.get("expired"),
    }))
}

pub(super) async fn insert_refresh_token(
    pool: &PgPool,
    user_id: Uuid,
    fingerprint: &[u8],
    ttl_seconds: i64,
) -> Result<()> {
    let query = r"
        INSERT INTO refresh_tokens (user_id, token_hash, expires_at)
        VALUES ($1, $2, NOW() + ($3 * INTERVAL '1 second'))
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    sqlx::query(query)
        .bind(user_id)
        .bind(fingerprint)
        .bind(ttl_seconds)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to insert refresh token")?;
    Ok(())
}

/// Revoke every active record matching the fingerprint. Matching zero rows is
/// fine; logout is best-effort.
pub(super) async fn revoke_by_fingerprint(pool: &PgPool, fingerprint: &[u8]) -> Result<()> {
    let query = r"
        UPDATE refresh_tokens
        SET revoked = TRUE,
            revoked_at = NOW()
        WHERE token_hash = $1
          AND NOT revoked
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    sqlx::query(query)
        .bind(fingerprint)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to revoke refresh token")?;
    Ok(())
}

/// Atomically revoke the old record and insert its replacement.
///
/// The `NOT revoked` guard makes concurrent rotations of the same record race
/// safely: exactly one transaction claims it, the loser observes zero rows
/// and gets `false` back (the caller maps that to "not recognized").
pub(super) async fn rotate_refresh_token(
    pool: &PgPool,
    old_id: Uuid,
    user_id: Uuid,
    new_fingerprint: &[u8],
    ttl_seconds: i64,
) -> Result<bool> {
    let mut tx = pool.begin().await.context("begin rotate transaction")?;

    let query = r"
        UPDATE refresh_tokens
        SET revoked = TRUE,
            revoked_at = NOW()
        WHERE id = $1
          AND NOT revoked
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    let result = sqlx::query(query)
        .bind(old_id)
        .execute(&mut *tx)
        .instrument(span)
        .await
        .context("failed to revoke rotated refresh token")?;

    if result.rows_affected() == 0 {
        let _ = tx.rollback().await;
        return Ok(false);
    }

    let query = r"
        INSERT INTO refresh_tokens (user_id, token_hash, expires_at)
        VALUES ($1, $2, NOW() + ($3 * INTERVAL '1 second'))
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    sqlx::query(query)
        .bind(user_id)
        .bind(new_fingerprint)
        .bind(ttl_seconds)
        .execute(&mut *tx)
        .instrument(span)
        .await
        .context("failed to insert rotated refresh token")?;

    tx.commit().await.context("commit rotate transaction")?;
    Ok(true)
}
