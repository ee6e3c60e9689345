use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};

pub const ARG_ACCESS_TOKEN_SECRET: &str = "access-token-secret";
pub const ARG_REFRESH_TOKEN_SECRET: &str = "refresh-token-secret";
pub const ARG_ACCESS_TOKEN_TTL: &str = "access-token-ttl";
pub const ARG_REFRESH_TOKEN_TTL: &str = "refresh-token-ttl";
pub const ARG_CORS_ORIGIN: &str = "cors-origin";

/// Token signing and CORS options, parsed from the command line
#[derive(Debug)]
pub struct Options {
    pub access_token_secret: String,
    pub refresh_token_secret: String,
    pub access_token_ttl: String,
    pub refresh_token_ttl: String,
    pub cors_origin: Option<String>,
}

impl Options {
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let access_token_secret = matches
            .get_one::<String>(ARG_ACCESS_TOKEN_SECRET)
            .context("access token secret required")?
            .to_string();

        let refresh_token_secret = matches
            .get_one::<String>(ARG_REFRESH_TOKEN_SECRET)
            .context("refresh token secret required")?
            .to_string();

        let access_token_ttl = matches
            .get_one::<String>(ARG_ACCESS_TOKEN_TTL)
            .context("access token TTL required")?
            .to_string();

        let refresh_token_ttl = matches
            .get_one::<String>(ARG_REFRESH_TOKEN_TTL)
            .context("refresh token TTL required")?
            .to_string();

        let cors_origin = matches.get_one::<String>(ARG_CORS_ORIGIN).cloned();

        Ok(Self {
            access_token_secret,
            refresh_token_secret,
            access_token_ttl,
            refresh_token_ttl,
            cors_origin,
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_ACCESS_TOKEN_SECRET)
                .long(ARG_ACCESS_TOKEN_SECRET)
                .help("Secret used to sign access tokens")
                .env("DOMARO_ACCESS_TOKEN_SECRET")
                .default_value("change_this_secret"),
        )
        .arg(
            Arg::new(ARG_REFRESH_TOKEN_SECRET)
                .long(ARG_REFRESH_TOKEN_SECRET)
                .help("Secret used to sign refresh tokens")
                .env("DOMARO_REFRESH_TOKEN_SECRET")
                .default_value("change_this_refresh_secret"),
        )
        .arg(
            Arg::new(ARG_ACCESS_TOKEN_TTL)
                .long(ARG_ACCESS_TOKEN_TTL)
                .help("Access token lifetime, e.g. 15m, 12h, 7d")
                .env("DOMARO_ACCESS_TOKEN_TTL")
                .default_value("15m"),
        )
        .arg(
            Arg::new(ARG_REFRESH_TOKEN_TTL)
                .long(ARG_REFRESH_TOKEN_TTL)
                .help("Refresh token lifetime, e.g. 15m, 12h, 7d")
                .env("DOMARO_REFRESH_TOKEN_TTL")
                .default_value("7d"),
        )
        .arg(
            Arg::new(ARG_CORS_ORIGIN)
                .long(ARG_CORS_ORIGIN)
                .help("Browser origin allowed by CORS, e.g. https://app.example.com (default: any)")
                .env("DOMARO_CORS_ORIGIN"),
        )
}
