//! Onboarding state machine.
//!
//! Pure transition function over `WorkflowProgress`. Side effects (store
//! writes, connector calls) are described by `OnboardingAction` and carried
//! out by the orchestrator.

use tracing::debug;

use crate::ids::{ProviderId, TenantId};
use crate::onboarding::error::TransitionError;
use crate::onboarding::progress::{
    NotificationPreferences, PendingDeparture, SelectedPlan, SignupData, WorkflowProgress,
};
use crate::onboarding::step::{ConnectorKind, OnboardingStep};

/// Events that drive the onboarding flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OnboardingEvent {
    /// Complete `step` and move to the entry after it.
    Advance { step: OnboardingStep },
    /// Move past an optional `step` without completing it.
    Skip { step: OnboardingStep },
    /// Return to the preceding entry.
    Back,
    /// Drop everything, including the persisted record.
    Reset,
    SubmitSignup { data: SignupData },
    ChooseBusinessPlan,
    /// About to hand the browser to `connector`. `plan` is recorded for
    /// checkout departures.
    Depart {
        connector: ConnectorKind,
        plan: Option<SelectedPlan>,
        at_ms: i64,
    },
    /// Checkout came back with a success marker.
    PaymentConfirmed { tenant_id: Option<TenantId> },
    /// Business track qualified through email verification.
    EmailVerified { tenant_id: TenantId },
    /// Authorization came back with a success marker.
    ExternalSystemConnected { account_ref: String },
    /// The pending departure is over without success (error marker or plain
    /// return).
    ClearDeparture,
    ConfigureIntegration { provider: ProviderId },
    UpdateNotifications { preferences: NotificationPreferences },
}

impl OnboardingEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Advance { .. } => "advance",
            Self::Skip { .. } => "skip",
            Self::Back => "back",
            Self::Reset => "reset",
            Self::SubmitSignup { .. } => "submit_signup",
            Self::ChooseBusinessPlan => "choose_business_plan",
            Self::Depart { .. } => "depart",
            Self::PaymentConfirmed { .. } => "payment_confirmed",
            Self::EmailVerified { .. } => "email_verified",
            Self::ExternalSystemConnected { .. } => "external_system_connected",
            Self::ClearDeparture => "clear_departure",
            Self::ConfigureIntegration { .. } => "configure_integration",
            Self::UpdateNotifications { .. } => "update_notifications",
        }
    }
}

/// Side-effects produced by state transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingAction {
    /// Write the whole aggregate to the progress store.
    PersistProgress,
    /// Remove the persisted record.
    ClearProgress,
}

pub type TransitionResult = Result<(WorkflowProgress, Vec<OnboardingAction>), TransitionError>;

/// Pure onboarding state machine.
pub struct OnboardingStateMachine;

impl OnboardingStateMachine {
    pub fn transition(progress: WorkflowProgress, event: OnboardingEvent) -> TransitionResult {
        let event_name = event.name();
        let is_reset = matches!(event, OnboardingEvent::Reset);
        let next = Self::apply(progress.clone(), event)?;
        // Reset always clears the store, even from an already fresh state.
        if is_reset {
            return Ok((next, vec![OnboardingAction::ClearProgress]));
        }
        if next == progress {
            debug!(
                event = event_name,
                step = %progress.current_step,
                "onboarding transition left progress unchanged"
            );
            return Ok((next, Vec::new()));
        }
        Ok((next, vec![OnboardingAction::PersistProgress]))
    }

    fn apply(
        mut progress: WorkflowProgress,
        event: OnboardingEvent,
    ) -> Result<WorkflowProgress, TransitionError> {
        match event {
            OnboardingEvent::Advance { step } => Self::move_past(progress, step, true),
            OnboardingEvent::Skip { step } => {
                if !step.is_optional() {
                    return Err(TransitionError::StepNotOptional { step });
                }
                Self::move_past(progress, step, false)
            }
            OnboardingEvent::Back => {
                if let Some(previous) = progress.current_step.previous() {
                    progress.current_step = previous;
                    progress.pending_departure = None;
                }
                Ok(progress)
            }
            OnboardingEvent::Reset => Ok(WorkflowProgress::default()),
            OnboardingEvent::SubmitSignup { data } => {
                Self::require_step(&progress, OnboardingStep::Welcome)?;
                progress.signup_data = Some(data);
                Ok(progress)
            }
            OnboardingEvent::ChooseBusinessPlan => {
                Self::require_step(&progress, OnboardingStep::Plan)?;
                progress.selected_plan = Some(SelectedPlan::B2b);
                Ok(progress)
            }
            OnboardingEvent::Depart {
                connector,
                plan,
                at_ms,
            } => {
                let step = match connector {
                    ConnectorKind::Checkout => OnboardingStep::Plan,
                    ConnectorKind::Authorization => OnboardingStep::Fortnox,
                    ConnectorKind::Provisioning => {
                        return Err(TransitionError::NotARedirect { connector })
                    }
                };
                Self::require_step(&progress, step)?;
                if let Some(plan) = plan {
                    progress.selected_plan = Some(plan);
                }
                progress.pending_departure = Some(PendingDeparture {
                    connector,
                    step,
                    departed_at_ms: at_ms,
                });
                Ok(progress)
            }
            OnboardingEvent::PaymentConfirmed { tenant_id } => {
                Self::require_step(&progress, OnboardingStep::Plan)?;
                if !progress
                    .selected_plan
                    .as_ref()
                    .is_some_and(SelectedPlan::requires_checkout)
                {
                    return Err(TransitionError::PlanTrackMismatch);
                }
                progress.plan_selected = true;
                if progress.tenant_id.is_none() {
                    progress.tenant_id = tenant_id;
                }
                progress.pending_departure = None;
                Self::move_past(progress, OnboardingStep::Plan, true)
            }
            OnboardingEvent::EmailVerified { tenant_id } => {
                Self::require_step(&progress, OnboardingStep::Plan)?;
                if progress.selected_plan != Some(SelectedPlan::B2b) {
                    return Err(TransitionError::PlanTrackMismatch);
                }
                progress.email_verified = true;
                progress.plan_selected = true;
                progress.tenant_id = Some(tenant_id);
                Self::move_past(progress, OnboardingStep::Plan, true)
            }
            OnboardingEvent::ExternalSystemConnected { account_ref } => {
                Self::require_step(&progress, OnboardingStep::Fortnox)?;
                progress.external_system_connected = true;
                if progress.tenant_id.is_none() {
                    progress.tenant_id = Some(TenantId::from(account_ref.as_str()));
                }
                progress.external_account_ref = Some(account_ref);
                progress.pending_departure = None;
                Self::move_past(progress, OnboardingStep::Fortnox, true)
            }
            OnboardingEvent::ClearDeparture => {
                progress.pending_departure = None;
                Ok(progress)
            }
            OnboardingEvent::ConfigureIntegration { provider } => {
                Self::require_step(&progress, OnboardingStep::Integrations)?;
                progress.integrations_configured.insert(provider.normalized());
                Ok(progress)
            }
            OnboardingEvent::UpdateNotifications { preferences } => {
                Self::require_step(&progress, OnboardingStep::Notifications)?;
                progress.notification_preferences = preferences;
                Ok(progress)
            }
        }
    }

    /// Shared move for advance/skip. On the terminal state this is a no-op.
    fn move_past(
        mut progress: WorkflowProgress,
        step: OnboardingStep,
        complete: bool,
    ) -> Result<WorkflowProgress, TransitionError> {
        if progress.current_step.is_terminal() {
            return Ok(progress);
        }
        if step.is_terminal() {
            return Err(TransitionError::AlreadyComplete);
        }
        if step.ordinal() > progress.current_step.ordinal() {
            return Err(TransitionError::StepNotReached {
                step,
                current: progress.current_step,
            });
        }
        if complete {
            progress.completed_steps.insert(step);
        }
        progress.current_step = step.next();
        // A departure belongs to the step it left from.
        if progress
            .pending_departure
            .as_ref()
            .is_some_and(|pending| pending.step != progress.current_step)
        {
            progress.pending_departure = None;
        }
        Ok(progress)
    }

    fn require_step(
        progress: &WorkflowProgress,
        expected: OnboardingStep,
    ) -> Result<(), TransitionError> {
        if progress.current_step.is_terminal() {
            return Err(TransitionError::AlreadyComplete);
        }
        if progress.current_step != expected {
            return Err(TransitionError::WrongStep {
                expected,
                current: progress.current_step,
            });
        }
        Ok(())
    }
}
