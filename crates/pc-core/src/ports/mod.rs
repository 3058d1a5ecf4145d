//! Port interfaces for the application layer
//!
//! Ports define the contract between the onboarding use cases and the
//! infrastructure implementations (progress storage, backend connectors,
//! system directories). The core stays independent of HTTP clients and the
//! file system.

pub mod app_dirs;
pub mod authorization;
pub mod checkout;
mod clock;
pub mod errors;
pub mod onboarding_event;
pub mod progress_store;
pub mod provisioning;


pub use app_dirs::AppDirsPort;
pub use authorization::AuthorizationConnectorPort;
pub use checkout::{CheckoutConnectorPort, CheckoutRequest};
pub use clock::*;
pub use errors::{AppDirsError, ConnectorError, ProgressStoreError, ProvisioningError};
pub use onboarding_event::OnboardingEventPort;
pub use progress_store::ProgressStorePort;
pub use provisioning::{ProvisioningProof, ProvisioningRequest, TenantProvisioningPort};
