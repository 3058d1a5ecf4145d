//! # Dependency Injection
//!
//! The only place that depends on pc-infra and pc-app together. It builds
//! the concrete adapters and hands them to the orchestrator as ports.
//! Assembly only: no decisions about onboarding state are made here.

use std::sync::Arc;
use std::time::Duration;

use pc_app::{AppPaths, OnboardingDeps, OnboardingOrchestrator, OnboardingSettings};
use pc_core::config::AppConfig;
use pc_infra::connectors::EdgeFunctionConfig;
use pc_infra::{
    EdgeFunctionClient, FileProgressStore, HttpAuthorizationConnector, HttpCheckoutConnector,
    HttpTenantProvisioner, LogOnboardingEvents, SystemClock,
};

pub type WiringResult<T> = Result<T, WiringError>;

#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("HTTP client initialization failed: {0}")]
    HttpClientInit(String),
}

fn edge_function_config(config: &AppConfig) -> EdgeFunctionConfig {
    EdgeFunctionConfig {
        base_url: config.api_base_url.clone(),
        api_key: config.api_key.clone(),
        timeout: Duration::from_secs(config.request_timeout_secs),
    }
}

pub fn wire_dependencies(config: &AppConfig, paths: &AppPaths) -> WiringResult<OnboardingDeps> {
    let client = EdgeFunctionClient::new(edge_function_config(config))
        .map_err(|err| WiringError::HttpClientInit(format!("{err:#}")))?;
    let client = Arc::new(client);

    Ok(OnboardingDeps {
        progress_store: Arc::new(FileProgressStore::new(paths.progress_path.clone())),
        authorization: Arc::new(HttpAuthorizationConnector::new(client.clone())),
        checkout: Arc::new(HttpCheckoutConnector::new(client.clone())),
        provisioning: Arc::new(HttpTenantProvisioner::new(client)),
        events: Arc::new(LogOnboardingEvents),
        clock: Arc::new(SystemClock),
    })
}

pub fn wire_onboarding(
    config: &AppConfig,
    paths: &AppPaths,
) -> WiringResult<OnboardingOrchestrator> {
    if config.api_base_url.trim().is_empty() {
        tracing::warn!("api base_url is not configured; connector calls will fail");
    }
    let deps = wire_dependencies(config, paths)?;
    Ok(OnboardingOrchestrator::new(
        deps,
        OnboardingSettings::from_config(config),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pc_core::app_dirs::AppDirs;
    use tempfile::TempDir;

    #[test]
    fn edge_function_config_carries_timeout_and_key() {
        let config = AppConfig {
            api_base_url: "https://api.paychase.se".to_string(),
            api_key: "anon".to_string(),
            request_timeout_secs: 7,
            ..AppConfig::empty()
        };
        let edge = edge_function_config(&config);
        assert_eq!(edge.base_url, "https://api.paychase.se");
        assert_eq!(edge.api_key, "anon");
        assert_eq!(edge.timeout, Duration::from_secs(7));
    }

    #[tokio::test]
    async fn wired_orchestrator_starts_fresh_in_empty_data_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AppPaths::from_app_dirs(&AppDirs {
            app_data_root: temp_dir.path().to_path_buf(),
        });
        let config = AppConfig::with_system_defaults(temp_dir.path().to_path_buf());

        let orchestrator = wire_onboarding(&config, &paths).unwrap();
        let view = orchestrator.view().await;

        assert_eq!(view.current_step_index, 0);
        assert!(!paths.progress_path.exists());
    }
}
