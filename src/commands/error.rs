use pc_core::onboarding::OnboardingError;
use serde_json::json;

/// Failure of a single CLI command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Onboarding(#[from] OnboardingError),
    #[error("failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

impl CommandError {
    /// 1 for retryable failures, 3 for ones the user has to correct.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Onboarding(err) if err.is_retryable() => 1,
            Self::Onboarding(_) => 3,
            Self::Output(_) => 1,
        }
    }

    /// Structured form written to stderr so scripts can branch on `kind`.
    pub fn to_json(&self) -> String {
        let value = match self {
            Self::Onboarding(err) => json!({
                "error": err,
                "message": err.to_string(),
                "retryable": err.is_retryable(),
            }),
            Self::Output(err) => json!({ "message": err.to_string() }),
        };
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pc_core::onboarding::ConnectorKind;

    #[test]
    fn validation_errors_are_not_retryable() {
        let err = CommandError::from(OnboardingError::validation("email", "bad"));
        assert_eq!(err.exit_code(), 3);
        let value: serde_json::Value = serde_json::from_str(&err.to_json()).unwrap();
        assert_eq!(value["error"]["kind"], "validation");
        assert_eq!(value["error"]["field"], "email");
        assert_eq!(value["retryable"], false);
    }

    #[test]
    fn connector_errors_are_retryable() {
        let err = CommandError::from(OnboardingError::unavailable(
            ConnectorKind::Checkout,
            "timeout",
        ));
        assert_eq!(err.exit_code(), 1);
    }
}
