use std::net::SocketAddr;

use anyhow::{Context, Result};

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3001";
const DEFAULT_TOKEN_TTL_DAYS: i64 = 90;

/// Process configuration, read from the environment (a `.env` file is loaded first by `main`).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_address: SocketAddr,
    pub token_ttl: time::Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt_secret = lookup("JWT_SECRET").context("JWT_SECRET must be set")?;
        if jwt_secret.is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }

        let bind_address = lookup("BIND_ADDRESS")
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_owned())
            .parse()
            .context("BIND_ADDRESS must be a socket address such as 127.0.0.1:3001")?;

        let token_ttl_days = match lookup("TOKEN_TTL_DAYS") {
            Some(days) => days
                .parse::<i64>()
                .context("TOKEN_TTL_DAYS must be a whole number of days")?,
            None => DEFAULT_TOKEN_TTL_DAYS,
        };
        if token_ttl_days <= 0 {
            anyhow::bail!("TOKEN_TTL_DAYS must be positive");
        }

        Ok(Config {
            database_url,
            jwt_secret,
            bind_address,
            token_ttl: time::Duration::days(token_ttl_days),
        })
    }
}
