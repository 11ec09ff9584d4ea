//! Process configuration read from the environment.
//!
//! `main` loads an optional `.env` file with `dotenvy` before calling
//! [`Config::from_env`]. Empty variables are treated as unset.

use std::time::Duration;

pub const DEFAULT_APP_PORT: u16 = 8080;
pub const DEFAULT_APP_ENV: &str = "development";
pub const DEFAULT_DB_PORT: u16 = 5432;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_DB_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub app_port: u16,
    /// Identifier reported by the health check.
    pub app_env: String,
    pub database: DatabaseConfig,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub name: String,
    pub port: u16,
    pub max_connections: u32,
    /// Upper bound on waiting for a pooled connection, including the first
    /// connect at startup.
    pub connect_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(lookup);
        Ok(Self {
            app_port: env.parse("APP_PORT")?.unwrap_or(DEFAULT_APP_PORT),
            app_env: env
                .get("APP_ENV")
                .unwrap_or_else(|| DEFAULT_APP_ENV.to_string()),
            database: DatabaseConfig {
                host: env.required("DB_HOST")?,
                user: env.required("DB_USER")?,
                password: env.get("DB_PASSWORD").unwrap_or_default(),
                name: env.required("DB_NAME")?,
                port: env.parse("DB_PORT")?.unwrap_or(DEFAULT_DB_PORT),
                max_connections: env
                    .parse::<u32>("DB_MAX_CONNECTIONS")?
                    .filter(|&n| n > 0)
                    .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS),
                connect_timeout: env
                    .parse::<u64>("DB_CONNECT_TIMEOUT_SECS")?
                    .map(Duration::from_secs)
                    .unwrap_or(DEFAULT_DB_CONNECT_TIMEOUT),
            },
        })
    }
}

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.is_empty())
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.get(key).ok_or(ConfigError::Missing(key))
    }

    fn parse<T: std::str::FromStr>(&self, key: &'static str) -> Result<Option<T>, ConfigError> {
        self.get(key)
            .map(|value| {
                value
                    .parse()
                    .map_err(|_| ConfigError::Invalid { key, value })
            })
            .transpose()
    }
}
