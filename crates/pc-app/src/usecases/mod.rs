pub mod onboarding;

pub use onboarding::{OnboardingContext, OnboardingOrchestrator, OnboardingView};
