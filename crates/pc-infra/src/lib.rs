pub mod connectors;
pub mod fs;
pub mod onboarding;
pub mod time;

pub use connectors::{
    EdgeFunctionClient, HttpAuthorizationConnector, HttpCheckoutConnector,
    HttpTenantProvisioner,
};
pub use fs::DirsAppDirsAdapter;
pub use onboarding::{FileProgressStore, LogOnboardingEvents};
pub use time::SystemClock;
