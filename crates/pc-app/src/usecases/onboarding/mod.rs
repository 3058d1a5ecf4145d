//! Onboarding use cases
//!
//! The orchestrator owns the workflow aggregate for one signup and drives the
//! progress store, the redirect connectors and tenant provisioning.

pub mod context;
pub mod orchestrator;
pub mod view;

pub use context::OnboardingContext;
pub use orchestrator::{OnboardingOrchestrator, TENANT_MISMATCH_CODE};
pub use view::OnboardingView;
