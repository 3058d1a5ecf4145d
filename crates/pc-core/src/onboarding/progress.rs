//! Persisted onboarding aggregate.
//!
//! `WorkflowProgress` is the only unit of persistence: every mutation writes
//! the whole record.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::{ProviderId, TenantId};
use crate::onboarding::step::{ConnectorKind, OnboardingStep};

/// Organization details captured on the welcome step.
///
/// The optional credential from the signup form is intentionally not part of
/// this record; see `SignupForm`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupData {
    pub organization_name: String,
    pub registration_number: String,
    pub email: String,
}

impl fmt::Debug for SignupData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupData")
            .field("organization_name", &self.organization_name)
            .field("registration_number", &"[REDACTED]")
            .field("email", &redact_email(&self.email))
            .finish()
    }
}

fn redact_email(email: &str) -> String {
    match email.split_once('@') {
        Some((_, domain)) => format!("***@{domain}"),
        None => "[REDACTED]".to_string(),
    }
}

/// Mutually exclusive pricing tracks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "track", rename_all = "lowercase")]
pub enum SelectedPlan {
    /// Self-serve plan paid through the hosted checkout.
    B2c {
        #[serde(rename = "priceId")]
        price_id: String,
    },
    /// Invoiced business plan qualified by email verification.
    B2b,
}

impl SelectedPlan {
    pub fn requires_checkout(&self) -> bool {
        matches!(self, Self::B2c { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationPreferences {
    pub email_reminders: bool,
    pub sms_reminders: bool,
    pub payment_received: bool,
    pub weekly_summary: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            email_reminders: true,
            sms_reminders: false,
            payment_received: true,
            weekly_summary: true,
        }
    }
}

/// Record of a hand-over to an external system that has not come back yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingDeparture {
    pub connector: ConnectorKind,
    pub step: OnboardingStep,
    pub departed_at_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkflowProgress {
    pub current_step: OnboardingStep,
    pub completed_steps: BTreeSet<OnboardingStep>,
    pub tenant_id: Option<TenantId>,
    pub selected_plan: Option<SelectedPlan>,
    pub signup_data: Option<SignupData>,
    pub notification_preferences: NotificationPreferences,
    pub email_verified: bool,
    pub plan_selected: bool,
    pub external_system_connected: bool,
    pub integrations_configured: BTreeSet<ProviderId>,
    pub external_account_ref: Option<String>,
    pub pending_departure: Option<PendingDeparture>,
}

impl Default for WorkflowProgress {
    fn default() -> Self {
        Self {
            current_step: OnboardingStep::first(),
            completed_steps: BTreeSet::new(),
            tenant_id: None,
            selected_plan: None,
            signup_data: None,
            notification_preferences: NotificationPreferences::default(),
            email_verified: false,
            plan_selected: false,
            external_system_connected: false,
            integrations_configured: BTreeSet::new(),
            external_account_ref: None,
            pending_departure: None,
        }
    }
}

/// A loaded record that cannot be resumed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("terminal step recorded as completed")]
    TerminalMarkedCompleted,
    #[error("external system marked connected without a tenant")]
    ConnectedWithoutTenant,
    #[error("pending departure for `{step}` but current step is `{current}`")]
    DepartureStepMismatch {
        step: OnboardingStep,
        current: OnboardingStep,
    },
}

impl WorkflowProgress {
    pub fn is_completed(&self, step: OnboardingStep) -> bool {
        self.completed_steps.contains(&step)
    }

    pub fn is_finished(&self) -> bool {
        self.current_step.is_terminal()
    }

    /// Index of the current step; `Complete` maps to the table length.
    pub fn current_step_index(&self) -> usize {
        self.current_step.ordinal()
    }

    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if self.completed_steps.contains(&OnboardingStep::Complete) {
            return Err(InvariantViolation::TerminalMarkedCompleted);
        }
        if self.external_system_connected && self.tenant_id.is_none() {
            return Err(InvariantViolation::ConnectedWithoutTenant);
        }
        if let Some(pending) = &self.pending_departure {
            if pending.step != self.current_step {
                return Err(InvariantViolation::DepartureStepMismatch {
                    step: pending.step,
                    current: self.current_step,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_progress_starts_at_first_step() {
        let progress = WorkflowProgress::default();
        assert_eq!(progress.current_step, OnboardingStep::Welcome);
        assert!(progress.completed_steps.is_empty());
        assert!(progress.notification_preferences.email_reminders);
        assert!(!progress.notification_preferences.sms_reminders);
        assert!(progress.check_invariants().is_ok());
    }

    #[test]
    fn serialized_shape_uses_camel_case_keys() {
        let mut progress = WorkflowProgress::default();
        progress.current_step = OnboardingStep::Plan;
        progress.completed_steps.insert(OnboardingStep::Welcome);
        progress.selected_plan = Some(SelectedPlan::B2c {
            price_id: "price_x".to_string(),
        });

        let value = serde_json::to_value(&progress).unwrap();
        assert_eq!(value["currentStep"], "plan");
        assert_eq!(value["completedSteps"][0], "welcome");
        assert_eq!(value["selectedPlan"]["track"], "b2c");
        assert_eq!(value["selectedPlan"]["priceId"], "price_x");
        assert_eq!(value["externalSystemConnected"], false);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let progress: WorkflowProgress =
            serde_json::from_str(r#"{"currentStep":"fortnox","tenantId":"t-1"}"#).unwrap();
        assert_eq!(progress.current_step, OnboardingStep::Fortnox);
        assert_eq!(progress.tenant_id, Some(TenantId::from("t-1")));
        assert_eq!(
            progress.notification_preferences,
            NotificationPreferences::default()
        );
    }

    #[test]
    fn completed_step_after_current_is_resumable() {
        // go_back never un-completes
        let mut progress = WorkflowProgress::default();
        progress.current_step = OnboardingStep::Plan;
        progress.completed_steps.insert(OnboardingStep::Welcome);
        progress.completed_steps.insert(OnboardingStep::Plan);
        assert!(progress.check_invariants().is_ok());
    }

    #[test]
    fn inconsistent_records_are_violations() {
        let mut progress = WorkflowProgress::default();
        progress.completed_steps.insert(OnboardingStep::Complete);
        assert_eq!(
            progress.check_invariants(),
            Err(InvariantViolation::TerminalMarkedCompleted)
        );

        let mut progress = WorkflowProgress::default();
        progress.current_step = OnboardingStep::Integrations;
        progress.external_system_connected = true;
        assert_eq!(
            progress.check_invariants(),
            Err(InvariantViolation::ConnectedWithoutTenant)
        );

        let mut progress = WorkflowProgress::default();
        progress.current_step = OnboardingStep::Integrations;
        progress.pending_departure = Some(PendingDeparture {
            connector: ConnectorKind::Authorization,
            step: OnboardingStep::Fortnox,
            departed_at_ms: 1,
        });
        assert_eq!(
            progress.check_invariants(),
            Err(InvariantViolation::DepartureStepMismatch {
                step: OnboardingStep::Fortnox,
                current: OnboardingStep::Integrations,
            })
        );
    }

    #[test]
    fn signup_debug_output_is_redacted() {
        let data = SignupData {
            organization_name: "Acme AB".to_string(),
            registration_number: "556677-8899".to_string(),
            email: "ceo@acme.se".to_string(),
        };
        let rendered = format!("{data:?}");
        assert!(rendered.contains("Acme AB"));
        assert!(rendered.contains("***@acme.se"));
        assert!(!rendered.contains("556677"));
        assert!(!rendered.contains("ceo@"));
    }
}
