use serde::{Deserialize, Serialize};

use crate::onboarding::step::{ConnectorKind, OnboardingStep};

/// Rejected transition requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum TransitionError {
    #[error("step `{step}` has not been reached (current: `{current}`)")]
    StepNotReached {
        step: OnboardingStep,
        current: OnboardingStep,
    },
    #[error("step `{step}` cannot be skipped")]
    StepNotOptional { step: OnboardingStep },
    #[error("operation requires step `{expected}` but current step is `{current}`")]
    WrongStep {
        expected: OnboardingStep,
        current: OnboardingStep,
    },
    #[error("onboarding is complete")]
    AlreadyComplete,
    #[error("onboarding is not complete yet (current: `{current}`)")]
    NotComplete { current: OnboardingStep },
    #[error("no plan track selected that allows this operation")]
    PlanTrackMismatch,
    #[error("`{connector}` is not reached through a browser redirect")]
    NotARedirect { connector: ConnectorKind },
}

/// Errors surfaced to step renderers.
///
/// Every variant is serializable so the orchestrator can keep the last one
/// in its view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OnboardingError {
    /// User-supplied data failed local or remote validation.
    #[error("validation failed: {message}")]
    Validation {
        field: Option<String>,
        message: String,
    },
    /// A connector could not produce a redirect URL.
    #[error("{connector} connector unavailable: {reason}")]
    ConnectorUnavailable {
        connector: ConnectorKind,
        reason: String,
    },
    /// The external system redirected back with an error marker.
    #[error("{connector} returned error `{code}`")]
    ConnectorReturnedError {
        connector: ConnectorKind,
        code: String,
        description: Option<String>,
    },
    /// The progress store rejected a write; state reverted to the last
    /// persisted snapshot.
    #[error("progress store rejected write: {reason}")]
    PersistenceFailure { reason: String },
    #[error("invalid transition: {transition}")]
    InvalidTransition { transition: TransitionError },
}

impl OnboardingError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    pub fn unavailable(connector: ConnectorKind, reason: impl Into<String>) -> Self {
        Self::ConnectorUnavailable {
            connector,
            reason: reason.into(),
        }
    }

    /// Whether the renderer should offer a retry of the same operation.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectorUnavailable { .. }
                | Self::ConnectorReturnedError { .. }
                | Self::PersistenceFailure { .. }
        )
    }
}

impl From<TransitionError> for OnboardingError {
    fn from(transition: TransitionError) -> Self {
        Self::InvalidTransition { transition }
    }
}
