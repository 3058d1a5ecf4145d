//! # Onboarding Dependencies
//!
//! Dependency grouping for `OnboardingOrchestrator` construction.
//!
//! **Note**: This is NOT a Builder pattern. No build steps, no default
//! values, no hidden logic. Just parameter grouping.

use std::sync::Arc;

use pc_core::ports::*;

/// Ports the orchestrator drives. All dependencies are required.
pub struct OnboardingDeps {
    pub progress_store: Arc<dyn ProgressStorePort>,
    pub authorization: Arc<dyn AuthorizationConnectorPort>,
    pub checkout: Arc<dyn CheckoutConnectorPort>,
    pub provisioning: Arc<dyn TenantProvisioningPort>,
    pub events: Arc<dyn OnboardingEventPort>,
    pub clock: Arc<dyn ClockPort>,
}

/// Values taken from `AppConfig` that shape orchestrator behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingSettings {
    pub app_base_url: String,
    pub completion_redirect_secs: u64,
}

/// Placeholder the checkout provider substitutes with the real session id.
pub const CHECKOUT_SESSION_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";
const ONBOARDING_PATH: &str = "onboarding";

impl OnboardingSettings {
    pub fn from_config(config: &pc_core::AppConfig) -> Self {
        Self {
            app_base_url: config.app_base_url.clone(),
            completion_redirect_secs: config.completion_redirect_secs,
        }
    }

    fn onboarding_url(&self) -> String {
        format!(
            "{}/{}",
            self.app_base_url.trim_end_matches('/'),
            ONBOARDING_PATH
        )
    }

    /// Where checkout sends the browser after payment.
    pub fn checkout_success_url(&self) -> String {
        format!(
            "{}?payment=success&session_id={}",
            self.onboarding_url(),
            CHECKOUT_SESSION_PLACEHOLDER
        )
    }

    pub fn checkout_cancel_url(&self) -> String {
        format!("{}?payment=cancelled", self.onboarding_url())
    }
}
