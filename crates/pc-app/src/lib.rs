//! Paychase Application Orchestration Layer
//!
//! This crate contains the onboarding use cases and the orchestrator that
//! owns the workflow aggregate.

pub mod app_paths;
pub mod deps;
pub mod usecases;

pub use app_paths::AppPaths;
pub use deps::{OnboardingDeps, OnboardingSettings};
pub use usecases::onboarding::{OnboardingOrchestrator, OnboardingView};
