//! Server settings read from the process environment.

use std::num::ParseIntError;

use strip_ansi_escapes::strip;
use thiserror::Error;

pub const DATABASE_URL_ENV: &str = "DB_URL";
pub const DATABASE_URL_FALLBACK_ENV: &str = "DATABASE_URL";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const PORT_FALLBACK_ENV: &str = "BACKEND_PORT";
pub const CORS_ALLOWED_ORIGINS_ENV: &str = "CORS_ALLOWED_ORIGINS";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no database connection string; set DB_URL (or DATABASE_URL)")]
    MissingDatabaseUrl,
    #[error("invalid port '{value}': {source}")]
    InvalidPort {
        value: String,
        #[source]
        source: ParseIntError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Empty means any origin may call the API.
    pub cors_allowed_origins: Vec<String>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let database_url = non_empty(DATABASE_URL_ENV)
            .or_else(|| non_empty(DATABASE_URL_FALLBACK_ENV))
            .ok_or(ConfigError::MissingDatabaseUrl)?;

        let host = non_empty(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match non_empty(PORT_ENV).or_else(|| non_empty(PORT_FALLBACK_ENV)) {
            Some(raw) => parse_port(&raw)?,
            None => {
                tracing::info!("No PORT environment variable set, using {DEFAULT_PORT}");
                DEFAULT_PORT
            }
        };

        let cors_allowed_origins = non_empty(CORS_ALLOWED_ORIGINS_ENV)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            database_url,
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    // remove any ANSI codes some launchers wrap around the value
    let cleaned = String::from_utf8_lossy(&strip(raw.as_bytes())).trim().to_string();
    cleaned
        .parse::<u16>()
        .map_err(|source| ConfigError::InvalidPort {
            value: cleaned,
            source,
        })
}
