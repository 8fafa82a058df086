//! Application configuration loaded from environment variables.

use std::env;

use actix_web::cookie::SameSite;
use thiserror::Error;

use scribe_infra::DatabaseConfig;
use scribe_infra::session::DEFAULT_SESSION_TTL_SECS;

/// Shortest accepted `SESSION_SECRET`, in bytes.
pub const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },

    #[error("SESSION_SECRET must be at least {MIN_SECRET_LEN} bytes")]
    SecretTooShort,
}

/// Session cookie settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// `None` means a random key is generated at startup.
    pub secret: Option<String>,
    pub ttl_secs: i64,
    pub cookie_name: String,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: None,
            ttl_secs: DEFAULT_SESSION_TTL_SECS,
            cookie_name: "scribe.sid".to_string(),
            cookie_secure: false,
            same_site: SameSite::Lax,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `RUST_ENV=development` exposes internal error details in responses.
    pub development: bool,
    pub database: Option<DatabaseConfig>,
    pub redis_url: Option<String>,
    pub session: SessionConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database = match env::var("DATABASE_URL") {
            Ok(url) => {
                let mut config = DatabaseConfig::new(url);
                if let Some(max) = parse_var("DB_MAX_CONNECTIONS")? {
                    config.max_connections = max;
                }
                if let Some(min) = parse_var("DB_MIN_CONNECTIONS")? {
                    config.min_connections = min;
                }
                Some(config)
            }
            Err(_) => None,
        };

        let defaults = SessionConfig::default();
        let secret = env::var("SESSION_SECRET").ok();
        if secret.as_ref().is_some_and(|s| s.len() < MIN_SECRET_LEN) {
            return Err(ConfigError::SecretTooShort);
        }

        let session = SessionConfig {
            secret,
            ttl_secs: parse_var("SESSION_TTL_SECS")?
                .filter(|ttl: &i64| *ttl > 0)
                .unwrap_or(defaults.ttl_secs),
            cookie_name: env::var("SESSION_COOKIE_NAME").unwrap_or(defaults.cookie_name),
            cookie_secure: parse_var("SESSION_COOKIE_SECURE")?.unwrap_or(defaults.cookie_secure),
            same_site: match env::var("SESSION_COOKIE_SAME_SITE") {
                Ok(value) => parse_same_site(&value)?,
                Err(_) => defaults.same_site,
            },
        };

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT")?.unwrap_or(8080),
            development: env::var("RUST_ENV").is_ok_and(|v| v == "development"),
            database,
            redis_url: env::var("REDIS_URL").ok(),
            session,
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(None),
    }
}

fn parse_same_site(value: &str) -> Result<SameSite, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" => Ok(SameSite::None),
        _ => Err(ConfigError::Invalid {
            name: "SESSION_COOKIE_SAME_SITE",
            value: value.to_string(),
        }),
    }
}
