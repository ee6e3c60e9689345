//! Token codec: issue and verify the access/refresh JWT pair.
//!
//! Access and refresh tokens share the claim shape but are signed with
//! distinct secrets, so one can never be presented in place of the other.
//! Refresh tokens are additionally tracked server-side by a SHA-256
//! fingerprint of the raw string; the codec only computes the digest, the
//! storage layer owns the records.

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::Error as JwtError, get_current_timestamp,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::roles::Role;

/// Fallback lifetime when a TTL spec does not parse (policy, not an error).
const DEFAULT_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Closed claim set carried by both token kinds.
///
/// `jti` is a fresh UUID per issued token so two tokens minted within the
/// same second for the same user still fingerprint differently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
    pub jti: Uuid,
}

/// Signs and verifies the access/refresh pair with distinct keys.
pub struct TokenCodec {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl_seconds: i64,
    refresh_ttl_seconds: i64,
}

impl TokenCodec {
    #[must_use]
    pub fn new(
        access_secret: &SecretString,
        refresh_secret: &SecretString,
        access_ttl_spec: &str,
        refresh_ttl_spec: &str,
    ) -> Self {
        let access = access_secret.expose_secret().as_bytes();
        let refresh = refresh_secret.expose_secret().as_bytes();
        Self {
            access_encoding: EncodingKey::from_secret(access),
            access_decoding: DecodingKey::from_secret(access),
            refresh_encoding: EncodingKey::from_secret(refresh),
            refresh_decoding: DecodingKey::from_secret(refresh),
            access_ttl_seconds: ttl_seconds(access_ttl_spec),
            refresh_ttl_seconds: ttl_seconds(refresh_ttl_spec),
        }
    }

    /// Issue a short-lived access token for the given identity.
    ///
    /// # Errors
    /// Returns an error if JWT encoding fails.
    pub fn issue_access(&self, user_id: Uuid, email: &str, role: Role) -> Result<String, JwtError> {
        let claims = self.claims(user_id, email, role, self.access_ttl_seconds);
        encode(&Header::default(), &claims, &self.access_encoding)
    }

    /// Issue a long-lived refresh token for the given identity.
    ///
    /// # Errors
    /// Returns an error if JWT encoding fails.
    pub fn issue_refresh(
        &self,
        user_id: Uuid,
        email: &str,
        role: Role,
    ) -> Result<String, JwtError> {
        let claims = self.claims(user_id, email, role, self.refresh_ttl_seconds);
        encode(&Header::default(), &claims, &self.refresh_encoding)
    }

    /// Verify an access token's signature and expiry.
    ///
    /// # Errors
    /// Returns an error if the signature is invalid or the token is expired.
    pub fn verify_access(&self, token: &str) -> Result<Claims, JwtError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.access_decoding, &validation).map(|data| data.claims)
    }

    /// Verify a refresh token's signature and embedded expiry. The store-side
    /// expiry check is separate and authoritative.
    ///
    /// # Errors
    /// Returns an error if the signature is invalid or the token is expired.
    pub fn verify_refresh(&self, token: &str) -> Result<Claims, JwtError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.refresh_decoding, &validation).map(|data| data.claims)
    }

    /// One-way fingerprint of a raw token, the only form stored server-side.
    #[must_use]
    pub fn fingerprint(token: &str) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hasher.finalize().to_vec()
    }

    /// Refresh lifetime in seconds, used for the store-side expiry column.
    #[must_use]
    pub const fn refresh_ttl_seconds(&self) -> i64 {
        self.refresh_ttl_seconds
    }

    fn claims(&self, user_id: Uuid, email: &str, role: Role, ttl: i64) -> Claims {
        #[allow(clippy::cast_possible_wrap)]
        let now = get_current_timestamp() as i64;
        Claims {
            sub: user_id,
            email: email.to_string(),
            role,
            iat: now,
            exp: now + ttl,
            jti: Uuid::new_v4(),
        }
    }
}

/// Parse a TTL spec (`15m`, `12h`, `7d`) into seconds.
///
/// Anything else, including bare numbers and junk, yields the 7-day default.
#[must_use]
pub fn ttl_seconds(spec: &str) -> i64 {
    // Split on a char boundary; the unit may be any (multibyte) character.
    let mut chars = spec.trim().chars();
    let Some(unit) = chars.next_back() else {
        return DEFAULT_TTL_SECONDS;
    };
    let Ok(num) = chars.as_str().parse::<i64>() else {
        return DEFAULT_TTL_SECONDS;
    };
    if num <= 0 {
        return DEFAULT_TTL_SECONDS;
    }
    match unit {
        'd' => num * 24 * 60 * 60,
        'h' => num * 60 * 60,
        'm' => num * 60,
        _ => DEFAULT_TTL_SECONDS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::errors::ErrorKind;

    fn codec() -> TokenCodec {
        TokenCodec::new(
            &SecretString::from("access-secret"),
            &SecretString::from("refresh-secret"),
            "15m",
            "7d",
        )
    }

    #[test]
    fn ttl_seconds_parses_units() {
        assert_eq!(ttl_seconds("15m"), 15 * 60);
        assert_eq!(ttl_seconds("12h"), 12 * 60 * 60);
        assert_eq!(ttl_seconds("7d"), 7 * 24 * 60 * 60);
        assert_eq!(ttl_seconds("30d"), 30 * 24 * 60 * 60);
    }

    #[test]
    fn ttl_seconds_falls_back_to_seven_days() {
        assert_eq!(ttl_seconds(""), DEFAULT_TTL_SECONDS);
        assert_eq!(ttl_seconds("15"), DEFAULT_TTL_SECONDS);
        assert_eq!(ttl_seconds("15s"), DEFAULT_TTL_SECONDS);
        assert_eq!(ttl_seconds("junk"), DEFAULT_TTL_SECONDS);
        assert_eq!(ttl_seconds("-5m"), DEFAULT_TTL_SECONDS);
        // A multibyte unit must fall back, not panic on a byte split.
        assert_eq!(ttl_seconds("7д"), DEFAULT_TTL_SECONDS);
        assert_eq!(ttl_seconds("д"), DEFAULT_TTL_SECONDS);
    }

    #[test]
    fn access_token_round_trips() {
        let codec = codec();
        let user_id = Uuid::new_v4();
        let token = codec
            .issue_access(user_id, "alice@example.com", Role::Resident)
            .unwrap();
        let claims = codec.verify_access(&token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.role, Role::Resident);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_kinds_are_not_interchangeable() {
        let codec = codec();
        let user_id = Uuid::new_v4();
        let access = codec
            .issue_access(user_id, "a@example.com", Role::Staff)
            .unwrap();
        let refresh = codec
            .issue_refresh(user_id, "a@example.com", Role::Staff)
            .unwrap();
        assert!(codec.verify_refresh(&access).is_err());
        assert!(codec.verify_access(&refresh).is_err());
    }

    #[test]
    fn wrong_secret_fails_verification() {
        let codec = codec();
        let other = TokenCodec::new(
            &SecretString::from("other-access"),
            &SecretString::from("other-refresh"),
            "15m",
            "7d",
        );
        let token = codec
            .issue_access(Uuid::new_v4(), "a@example.com", Role::Manager)
            .unwrap();
        let err = other.verify_access(&token).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidSignature));
    }

    #[test]
    fn expired_access_token_is_rejected() {
        let codec = codec();
        // Past the default 60-second verification leeway.
        #[allow(clippy::cast_possible_wrap)]
        let now = get_current_timestamp() as i64;
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "a@example.com".to_string(),
            role: Role::Resident,
            iat: now - 600,
            exp: now - 120,
            jti: Uuid::new_v4(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"access-secret"),
        )
        .unwrap();
        let err = codec.verify_access(&token).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ExpiredSignature));
    }

    #[test]
    fn fingerprint_is_deterministic_and_distinct() {
        let first = TokenCodec::fingerprint("token");
        let second = TokenCodec::fingerprint("token");
        let other = TokenCodec::fingerprint("other");
        assert_eq!(first, second);
        assert_eq!(first.len(), 32);
        assert_ne!(first, other);
    }

    #[test]
    fn repeated_issue_yields_distinct_fingerprints() {
        let codec = codec();
        let user_id = Uuid::new_v4();
        let first = codec
            .issue_refresh(user_id, "a@example.com", Role::Resident)
            .unwrap();
        let second = codec
            .issue_refresh(user_id, "a@example.com", Role::Resident)
            .unwrap();
        // The per-token jti keeps same-second issues distinct.
        assert_ne!(
            TokenCodec::fingerprint(&first),
            TokenCodec::fingerprint(&second)
        );
    }
}
