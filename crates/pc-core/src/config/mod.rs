//! # Pure Data Module - Data Transfer Objects Only
//!
//! Defines the configuration data structures and the TOML → DTO mapping.
//! Values are taken as facts: no validation and no policy. Empty strings
//! and zero durations are valid here; callers decide what they mean.

use std::path::PathBuf;

pub const DEFAULT_COMPLETION_REDIRECT_SECS: u64 = 5;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;
pub const PROGRESS_FILE_NAME: &str = "onboarding_progress.json";

/// Application configuration DTO (pure data, no logic)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Public origin of the web app; checkout success/cancel URLs are built
    /// from it.
    pub app_base_url: String,

    /// Countdown on the completion step for self-serve signups.
    pub completion_redirect_secs: u64,

    /// Backend base URL hosting the edge functions.
    pub api_base_url: String,

    /// Bearer token sent with every backend call (may be empty).
    pub api_key: String,

    pub request_timeout_secs: u64,

    /// Progress file path (path info only, no existence check)
    pub progress_file: PathBuf,
}

impl AppConfig {
    /// Create AppConfig from TOML value
    ///
    /// Missing keys map to empty values, except the two durations which
    /// fall back to their documented defaults.
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let get_str = |section: &str, key: &str| {
            toml_value
                .get(section)
                .and_then(|s| s.get(key))
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string()
        };
        let get_secs = |section: &str, key: &str, default: u64| {
            toml_value
                .get(section)
                .and_then(|s| s.get(key))
                .and_then(|v| v.as_integer())
                .map(|v| v.max(0) as u64)
                .unwrap_or(default)
        };

        Ok(Self {
            app_base_url: get_str("general", "app_base_url"),
            completion_redirect_secs: get_secs(
                "general",
                "completion_redirect_secs",
                DEFAULT_COMPLETION_REDIRECT_SECS,
            ),
            api_base_url: get_str("api", "base_url"),
            api_key: get_str("api", "api_key"),
            request_timeout_secs: get_secs(
                "api",
                "request_timeout_secs",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            ),
            progress_file: PathBuf::from(get_str("storage", "progress_file")),
        })
    }

    /// Create empty AppConfig (all empty/default values)
    pub fn empty() -> Self {
        Self {
            app_base_url: String::new(),
            completion_redirect_secs: DEFAULT_COMPLETION_REDIRECT_SECS,
            api_base_url: String::new(),
            api_key: String::new(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            progress_file: PathBuf::new(),
        }
    }

    /// Create AppConfig with system-default paths for production use
    ///
    /// `data_dir` is computed by the caller (see `AppDirsPort`).
    pub fn with_system_defaults(data_dir: PathBuf) -> Self {
        Self {
            progress_file: data_dir.join(PROGRESS_FILE_NAME),
            ..Self::empty()
        }
    }
}
