use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use site_content_core::EngineConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} must be a valid {expected}, got `{value}`")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server host to bind to.
    pub host: String,
    /// Server port to bind to.
    pub port: u16,
    /// PostgreSQL URL of the remote content table. Unset runs local-only.
    pub database_url: Option<String>,
    /// Maximum database connections in the pool.
    pub db_max_connections: u32,
    /// Directory backing the local content store.
    pub data_dir: PathBuf,
    /// Argon2id PHC hash of the shared admin password.
    pub admin_password_hash: String,
    /// Session signing secret.
    pub jwt_secret: String,
    /// Quiet period before a draft save runs.
    pub save_debounce: Duration,
    /// History snapshots kept.
    pub history_limit: usize,
    /// Event bus channel capacity.
    pub event_bus_capacity: usize,
    /// Largest accepted request body, in bytes (backup uploads).
    pub max_body_bytes: usize,
    /// Log level (e.g., "info", "debug", "trace").
    pub log_level: String,
}

impl AppConfig {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_var("PORT", "u16", 3030)?,
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", "u32", 5)?,
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data")),
            admin_password_hash: env::var("ADMIN_PASSWORD_HASH")
                .map_err(|_| ConfigError::Missing("ADMIN_PASSWORD_HASH"))?,
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "dev-secret-change-me-in-production".to_string()),
            save_debounce: Duration::from_millis(parse_var("SAVE_DEBOUNCE_MS", "u64", 1000)?),
            history_limit: parse_var("HISTORY_LIMIT", "usize", 3)?,
            event_bus_capacity: parse_var("EVENT_BUS_CAPACITY", "usize", 64)?,
            max_body_bytes: parse_var("MAX_BODY_BYTES", "usize", 10 * 1024 * 1024)?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Build the socket address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            debounce: self.save_debounce,
            history_limit: self.history_limit,
        }
    }
}

fn parse_var<T: FromStr>(
    name: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            expected,
            value,
        }),
        Err(_) => Ok(default),
    }
}
