//! Sensitive-value handling for the onboarding domain.

pub mod secret;

pub use secret::SecretString;
