//! # Domaro (Estate Management API)
//!
//! `domaro` is the backend for an estate-management application. It owns the
//! authentication and session core: registration, login, and a rotating
//! access/refresh token pair signed with distinct secrets.
//!
//! ## Sessions
//!
//! - **Access tokens** are short-lived JWTs (15 minutes by default) verified by
//!   signature and expiry only; the database is never consulted for them.
//! - **Refresh tokens** are long-lived JWTs (7 days by default) tracked
//!   server-side by a SHA-256 fingerprint. The raw token never touches the
//!   database.
//! - **Rotation:** every refresh exchange revokes the presented token's
//!   fingerprint and inserts the replacement in one transaction. A replayed
//!   refresh token finds its fingerprint already revoked and is rejected,
//!   so a stolen token can be used at most once.
//!
//! ## Authorization
//!
//! Users carry exactly one role (`resident`, `manager`, `staff`). Protected
//! endpoints require a bearer access token; role-gated endpoints compare the
//! token's role for exact equality, there is no hierarchy.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        // Should be a hex string (full SHA-1 is 40 chars, but could be short)
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }
}
