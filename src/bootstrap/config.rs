//! # Configuration Loader
//!
//! Reads the TOML file and maps it onto `AppConfig`. Pure data loading:
//! no validation and no business rules. The only policy here is that a
//! missing file means "run with system defaults".

use std::path::{Path, PathBuf};

use anyhow::Context;
use pc_core::config::AppConfig;

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid TOML.
pub fn load_config(config_path: PathBuf) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value)
}

/// Like [`load_config`], but an absent file yields the defaults rooted at
/// `data_dir`. A present but broken file is still an error.
pub fn load_config_or_default(config_path: &Path, data_dir: &Path) -> anyhow::Result<AppConfig> {
    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(AppConfig::with_system_defaults(data_dir.to_path_buf()));
    }
    load_config(config_path.to_path_buf())
}
