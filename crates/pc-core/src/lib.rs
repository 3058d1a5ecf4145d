//! # pc-core
//!
//! Core onboarding domain for Paychase: the step table, the persisted
//! workflow aggregate, the pure state machine and the ports the
//! application layer drives.
//!
//! This crate contains pure business logic without any infrastructure dependencies.

pub mod app_dirs;
pub mod config;
pub mod ids;
pub mod onboarding;
pub mod ports;
pub mod security;

pub use config::AppConfig;
pub use ids::{ProviderId, TenantId};
pub use onboarding::{
    CompletionBehavior, OnboardingError, OnboardingStep, SelectedPlan, WorkflowProgress,
};
pub use security::SecretString;
