//! Administrator accounts and access token configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_ADMIN_TABLE: &str = "admin_schemas";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Table holding administrator accounts.
    #[serde(default = "default_admin_table")]
    pub admin_table: String,

    /// Lifetime of minted access tokens.
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: u64,

    /// Environment variable containing the token signing key (hex-encoded).
    #[serde(default = "default_private_key_env")]
    pub private_key_env: Option<String>,

    /// Path to the token signing key file.
    #[serde(default)]
    pub private_key_file: Option<PathBuf>,

    /// Keep `/register` open after the first administrator exists.
    #[serde(default)]
    pub allow_registration: bool,

    /// Administrator created at startup if missing.
    #[serde(default)]
    pub bootstrap_admin: Option<String>,

    /// Environment variable holding the bootstrap administrator's password.
    #[serde(default = "default_bootstrap_password_env")]
    pub bootstrap_password_env: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_table: default_admin_table(),
            token_ttl_hours: default_token_ttl_hours(),
            private_key_env: default_private_key_env(),
            private_key_file: None,
            allow_registration: false,
            bootstrap_admin: None,
            bootstrap_password_env: default_bootstrap_password_env(),
        }
    }
}

impl AuthConfig {
    /// Resolve the private key from environment or file.
    pub fn resolve_private_key(&self) -> Result<Option<String>, std::io::Error> {
        if let Some(env_var) = &self.private_key_env
            && let Ok(key) = std::env::var(env_var)
            && !key.trim().is_empty()
        {
            return Ok(Some(key.trim().to_string()));
        }

        if let Some(path) = &self.private_key_file
            && path.exists()
        {
            let key = std::fs::read_to_string(path)?;
            return Ok(Some(key.trim().to_string()));
        }

        Ok(None)
    }

    pub fn token_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.token_ttl_hours.saturating_mul(3600))
    }
}

fn default_admin_table() -> String {
    DEFAULT_ADMIN_TABLE.to_string()
}

fn default_token_ttl_hours() -> u64 {
    72
}

fn default_private_key_env() -> Option<String> {
    Some("DBADMIN_TOKEN_PRIVATE_KEY".to_string())
}

fn default_bootstrap_password_env() -> String {
    "DBADMIN_BOOTSTRAP_PASSWORD".to_string()
}
