use crate::api::{self, handlers::auth::AuthConfig};
use anyhow::Result;
use secrecy::SecretString;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub access_token_secret: SecretString,
    pub refresh_token_secret: SecretString,
    pub access_token_ttl: String,
    pub refresh_token_ttl: String,
    pub cors_origin: Option<String>,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the database is unreachable or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let auth_config = AuthConfig::new()
        .with_access_token_secret(args.access_token_secret)
        .with_refresh_token_secret(args.refresh_token_secret)
        .with_access_token_ttl(args.access_token_ttl)
        .with_refresh_token_ttl(args.refresh_token_ttl)
        .with_cors_origin(args.cors_origin);

    api::new(args.port, args.dsn, auth_config).await
}
