//! Onboarding domain: step table, persisted aggregate and the pure state
//! machine that moves it.

pub mod completion;
pub mod error;
pub mod progress;
pub mod return_marker;
pub mod state_machine;
pub mod step;
pub mod validation;

pub use completion::CompletionBehavior;
pub use error::{OnboardingError, TransitionError};
pub use progress::{
    InvariantViolation, NotificationPreferences, PendingDeparture, SelectedPlan, SignupData,
    WorkflowProgress,
};
pub use return_marker::{ReturnMarker, ReturnPayload};
pub use state_machine::{OnboardingAction, OnboardingEvent, OnboardingStateMachine};
pub use step::{ConnectorKind, OnboardingStep, UnknownStep, STEP_TABLE};
pub use validation::{SignupForm, ValidatedSignup, MIN_CREDENTIAL_LEN};
