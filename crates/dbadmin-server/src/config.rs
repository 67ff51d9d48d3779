//! Locating and loading the server configuration.

use dbadmin_core::AppConfig;
use std::{env, path::PathBuf};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "DBADMIN_CONFIG";

const DEFAULT_CONFIG_FILE: &str = "dbadmin.toml";

/// Load the configuration, then apply command-line overrides.
pub fn load_config(path: Option<PathBuf>, bind: Option<String>) -> anyhow::Result<AppConfig> {
    let path = config_path(path);
    let mut cfg = AppConfig::load(&path)?;
    if let Some(bind) = bind {
        cfg.server.bind = bind;
        cfg.validate()?;
    }
    tracing::debug!(path = %path.display(), "configuration loaded");
    Ok(cfg)
}

fn config_path(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(p) = explicit {
        return p;
    }
    if let Ok(p) = env::var(CONFIG_ENV) {
        return PathBuf::from(p);
    }
    PathBuf::from(DEFAULT_CONFIG_FILE)
}
