//! Configuration file resolution and loading
//!
//! Config file lookup priority:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. `<user config dir>/showrun/config.toml`
//! 4. `/etc/showrun/config.toml` (Linux only)
//!
//! A missing config file is not an error: callers fall back to built-in
//! defaults and log a warning, so a show machine always starts.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "SHOWRUN_CONFIG";

/// Locate the config file following the priority order above
///
/// Returns `None` when no candidate exists. An explicit CLI or env path is
/// returned even if it does not exist, so the load step can report it.
pub fn resolve_config_path(cli_arg: Option<&Path>, env_var_name: &str) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3/4: platform locations
    default_config_locations().into_iter().find(|p| p.exists())
}

/// Platform config file candidates, most specific first
pub fn default_config_locations() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("showrun").join("config.toml"));
    }
    if cfg!(target_os = "linux") {
        candidates.push(PathBuf::from("/etc/showrun/config.toml"));
    }
    candidates
}

/// Parse a TOML config file
pub fn load_toml_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Cannot read config {}: {}", path.display(), e))
    })?;
    let parsed = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Invalid config {}: {}", path.display(), e)))?;
    Ok(parsed)
}

/// Load config from the resolved path, or defaults when there is none
///
/// An explicitly named file that is missing or malformed is an error; only
/// the absence of any config file falls back to defaults.
pub fn load_or_default<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T> {
    match path {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            load_toml_file(path)
        }
        None => {
            warn!("No configuration file found, using built-in defaults");
            Ok(T::default())
        }
    }
}
