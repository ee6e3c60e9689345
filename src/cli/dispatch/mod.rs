//! Map validated CLI matches to an action.

use crate::cli::actions::{Action, server::Args};
use crate::cli::commands::auth;
use anyhow::{Context, Result};
use secrecy::SecretString;

/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>("dsn")
        .cloned()
        .context("missing required argument: --dsn")?;

    let auth_opts = auth::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        dsn,
        access_token_secret: SecretString::from(auth_opts.access_token_secret),
        refresh_token_secret: SecretString::from(auth_opts.refresh_token_secret),
        access_token_ttl: auth_opts.access_token_ttl,
        refresh_token_ttl: auth_opts.refresh_token_ttl,
        cors_origin: auth_opts.cors_origin,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;
    use secrecy::ExposeSecret;

    #[test]
    fn handler_builds_server_action() {
        temp_env::with_vars(
            [
                ("DOMARO_ACCESS_TOKEN_SECRET", None::<&str>),
                ("DOMARO_REFRESH_TOKEN_SECRET", None::<&str>),
                ("DOMARO_ACCESS_TOKEN_TTL", None::<&str>),
                ("DOMARO_REFRESH_TOKEN_TTL", None::<&str>),
                ("DOMARO_CORS_ORIGIN", None::<&str>),
                ("DOMARO_PORT", None::<&str>),
            ],
            || {
                let matches = commands::new().get_matches_from(vec![
                    "domaro",
                    "--dsn",
                    "postgres://localhost/domaro",
                ]);
                let Action::Server(args) = handler(&matches).unwrap();
                assert_eq!(args.port, 8080);
                assert_eq!(args.dsn, "postgres://localhost/domaro");
                assert_eq!(
                    args.access_token_secret.expose_secret(),
                    "change_this_secret"
                );
                assert_eq!(args.access_token_ttl, "15m");
                assert_eq!(args.refresh_token_ttl, "7d");
                assert_eq!(args.cors_origin, None);
            },
        );
    }
}
