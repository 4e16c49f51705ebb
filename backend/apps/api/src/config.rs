//! Server configuration, read once from the environment at startup.

use std::env;
use std::time::Duration;

use anyhow::{Context, bail};
use auth::AuthConfig;
use auth::application::config::MIN_TOKEN_SECRET_LEN;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_STORE_TIMEOUT_MS: u64 = 500;

#[derive(Debug)]
pub struct ServerConfig {
    pub database_url: String,
    pub redis_url: String,
    pub port: u16,
    pub database_max_connections: u32,
    pub auth: AuthConfig,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok(), cfg!(debug_assertions))
    }

    /// `allow_dev_secret`: fall back to a random signing secret when
    /// `JWT_SECRET` is unset.
    fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        allow_dev_secret: bool,
    ) -> anyhow::Result<Self> {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;
        let redis_url = lookup("REDIS_URL").context("REDIS_URL must be set")?;

        let port = parse_or(&lookup, "PORT", DEFAULT_PORT)?;
        let database_max_connections =
            parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        let store_timeout_ms =
            parse_or(&lookup, "RATE_LIMIT_STORE_TIMEOUT_MS", DEFAULT_STORE_TIMEOUT_MS)?;

        let auth = match lookup("JWT_SECRET").filter(|s| !s.is_empty()) {
            Some(secret) => {
                if secret.len() < MIN_TOKEN_SECRET_LEN {
                    bail!("JWT_SECRET must be at least {MIN_TOKEN_SECRET_LEN} bytes");
                }
                AuthConfig::new(secret.into_bytes())
            }
            None if allow_dev_secret => {
                tracing::warn!("JWT_SECRET not set, using a random development secret");
                AuthConfig::development()
            }
            None => bail!("JWT_SECRET must be set"),
        };

        let auth = match lookup("PASSWORD_PEPPER").filter(|s| !s.is_empty()) {
            Some(pepper) => auth.with_pepper(pepper.into_bytes()),
            None => auth,
        }
        .with_limiter_timeout(Duration::from_millis(store_timeout_ms));

        Ok(Self {
            database_url,
            redis_url,
            port,
            database_max_connections,
            auth,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} is not a valid value: {raw:?}")),
        None => Ok(default),
    }
}
