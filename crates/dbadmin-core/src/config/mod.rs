//! Configuration types for the dbadmin server.
//!
//! Configuration is a single TOML file (`dbadmin.toml` by default) with four
//! sections: `[server]`, `[database]`, `[auth]` and `[logging]`. Every key has
//! a default, so an absent file is a valid configuration.

pub mod auth;
pub mod database;

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::net::SocketAddr;
use std::path::Path;

pub use auth::AuthConfig;
pub use database::DatabaseConfig;

/// Complete configuration loaded from file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Requests running longer than this are answered with 408.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Allow any origin, method and header.
    #[serde(default = "default_true")]
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            request_timeout_secs: default_request_timeout_secs(),
            cors_permissive: true,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("server.bind is not an address: {}", self.bind)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:6060".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_filter() -> String {
    "info".to_string()
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl AppConfig {
    /// Parse configuration from TOML content.
    ///
    /// The admin account table is always added to `database.hidden_tables`.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.validate()?;
        config.database.hide_table(&config.auth.admin_table);
        Ok(config)
    }

    /// Load configuration from `path`, falling back to defaults if the file does not exist,
    /// then apply the `DB_*` environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut config = match fs::read_to_string(path.as_ref()) {
            Ok(content) => Self::from_toml(&content)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Self::default(),
            Err(e) => return Err(e.into()),
        };
        config
            .database
            .apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.socket_addr()?;
        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "server.request_timeout_secs must be positive".into(),
            ));
        }
        if self.database.schema.is_empty() {
            return Err(ConfigError::Invalid("database.schema must not be empty".into()));
        }
        if self.database.max_page_size == 0 {
            return Err(ConfigError::Invalid(
                "database.max_page_size must be positive".into(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be positive".into(),
            ));
        }
        if self.auth.admin_table.is_empty() {
            return Err(ConfigError::Invalid("auth.admin_table must not be empty".into()));
        }
        if self.auth.token_ttl_hours == 0 {
            return Err(ConfigError::Invalid(
                "auth.token_ttl_hours must be positive".into(),
            ));
        }
        Ok(())
    }
}
