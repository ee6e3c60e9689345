//! Auth configuration and shared state.

use secrecy::SecretString;

use super::token::TokenCodec;

const DEFAULT_ACCESS_TOKEN_SECRET: &str = "change_this_secret";
const DEFAULT_REFRESH_TOKEN_SECRET: &str = "change_this_refresh_secret";
const DEFAULT_ACCESS_TOKEN_TTL: &str = "15m";
const DEFAULT_REFRESH_TOKEN_TTL: &str = "7d";

/// Immutable token and CORS configuration, built once from CLI/env.
///
/// The development defaults are placeholders; deployments override them via
/// `DOMARO_ACCESS_TOKEN_SECRET` / `DOMARO_REFRESH_TOKEN_SECRET`.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    access_token_secret: SecretString,
    refresh_token_secret: SecretString,
    access_token_ttl: String,
    refresh_token_ttl: String,
    cors_origin: Option<String>,
}

impl AuthConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            access_token_secret: SecretString::from(DEFAULT_ACCESS_TOKEN_SECRET),
            refresh_token_secret: SecretString::from(DEFAULT_REFRESH_TOKEN_SECRET),
            access_token_ttl: DEFAULT_ACCESS_TOKEN_TTL.to_string(),
            refresh_token_ttl: DEFAULT_REFRESH_TOKEN_TTL.to_string(),
            cors_origin: None,
        }
    }

    #[must_use]
    pub fn with_access_token_secret(mut self, secret: SecretString) -> Self {
        self.access_token_secret = secret;
        self
    }

    #[must_use]
    pub fn with_refresh_token_secret(mut self, secret: SecretString) -> Self {
        self.refresh_token_secret = secret;
        self
    }

    #[must_use]
    pub fn with_access_token_ttl(mut self, ttl: String) -> Self {
        self.access_token_ttl = ttl;
        self
    }

    #[must_use]
    pub fn with_refresh_token_ttl(mut self, ttl: String) -> Self {
        self.refresh_token_ttl = ttl;
        self
    }

    #[must_use]
    pub fn with_cors_origin(mut self, origin: Option<String>) -> Self {
        self.cors_origin = origin;
        self
    }

    #[must_use]
    pub fn cors_origin(&self) -> Option<&str> {
        self.cors_origin.as_deref()
    }

    pub(super) fn access_token_secret(&self) -> &SecretString {
        &self.access_token_secret
    }

    pub(super) fn refresh_token_secret(&self) -> &SecretString {
        &self.refresh_token_secret
    }

    pub(super) fn access_token_ttl(&self) -> &str {
        &self.access_token_ttl
    }

    pub(super) fn refresh_token_ttl(&self) -> &str {
        &self.refresh_token_ttl
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared auth state: the configuration plus the codec built from it.
/// Handlers receive it as `Extension<Arc<AuthState>>`.
pub struct AuthState {
    config: AuthConfig,
    codec: TokenCodec,
}

impl AuthState {
    #[must_use]
    pub fn new(config: AuthConfig) -> Self {
        let codec = TokenCodec::new(
            config.access_token_secret(),
            config.refresh_token_secret(),
            config.access_token_ttl(),
            config.refresh_token_ttl(),
        );
        Self { config, codec }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }
}
