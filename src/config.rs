use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while reading configuration from the environment
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Runtime mode of the service
///
/// Development mode adds diagnostic traces to error responses and enables
/// verbose HTTP logging; production mode never exposes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeMode {
    #[default]
    Development,
    Production,
}

impl RuntimeMode {
    pub fn is_production(&self) -> bool {
        matches!(self, RuntimeMode::Production)
    }

    /// Log filter used when `RUST_LOG` is not set
    pub fn default_log_filter(&self) -> &'static str {
        match self {
            RuntimeMode::Development => "info,user_management_api=debug,tower_http=debug",
            RuntimeMode::Production => "info",
        }
    }
}

impl FromStr for RuntimeMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(RuntimeMode::Development),
            "production" | "prod" => Ok(RuntimeMode::Production),
            _ => Err(()),
        }
    }
}

impl fmt::Display for RuntimeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeMode::Development => write!(f, "development"),
            RuntimeMode::Production => write!(f, "production"),
        }
    }
}

/// Service configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Listening port (`PORT`)
    pub port: u16,
    /// Runtime mode (`APP_ENV`)
    pub mode: RuntimeMode,
    /// PostgreSQL connection string (`DATABASE_URL`); the in-memory store is
    /// used when absent
    pub database_url: Option<String>,
    /// Pool size (`DATABASE_MAX_CONNECTIONS`)
    pub database_max_connections: u32,
    /// Upper bound for the list `limit` parameter (`MAX_PAGE_LIMIT`)
    pub max_page_limit: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            mode: RuntimeMode::Development,
            database_url: None,
            database_max_connections: 5,
            max_page_limit: 100,
        }
    }
}

impl Config {
    /// Reads configuration from process environment variables
    ///
    /// Call `dotenv::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mode = match get("APP_ENV") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                key: "APP_ENV",
                value,
            })?,
            None => defaults.mode,
        };

        Ok(Self {
            port: parse_or(get("PORT"), "PORT", defaults.port)?,
            mode,
            database_url: get("DATABASE_URL"),
            database_max_connections: parse_or(
                get("DATABASE_MAX_CONNECTIONS"),
                "DATABASE_MAX_CONNECTIONS",
                defaults.database_max_connections,
            )?,
            max_page_limit: positive(
                parse_or(get("MAX_PAGE_LIMIT"), "MAX_PAGE_LIMIT", defaults.max_page_limit)?,
                "MAX_PAGE_LIMIT",
            )?,
        })
    }
}

fn parse_or<T: FromStr>(
    value: Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        None => Ok(default),
    }
}

fn positive(value: u32, key: &'static str) -> Result<u32, ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        });
    }
    Ok(value)
}
