//! Onboarding commands.
//!
//! Each command opens a `command.onboarding.*` span and delegates to the
//! orchestrator; output is the resulting view (or redirect URL) as JSON.

use pc_app::{OnboardingOrchestrator, OnboardingView};
use pc_core::onboarding::{NotificationPreferences, OnboardingError, SignupForm};
use pc_core::{ProviderId, SecretString};
use serde::Serialize;
use tracing::{info_span, Instrument};

use crate::cli::{NotificationArgs, OnboardingCommand, SignupArgs};
use crate::commands::CommandError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RedirectOutput {
    redirect_url: String,
}

fn render<T: Serialize>(value: &T) -> Result<String, CommandError> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn render_view(view: Result<OnboardingView, OnboardingError>) -> Result<String, CommandError> {
    render(&view?)
}

fn render_redirect(url: Result<String, OnboardingError>) -> Result<String, CommandError> {
    render(&RedirectOutput { redirect_url: url? })
}

impl From<SignupArgs> for SignupForm {
    fn from(args: SignupArgs) -> Self {
        SignupForm {
            organization_name: args.organization_name,
            registration_number: args.registration_number,
            email: args.email,
            credential: args.password.map(SecretString::new),
        }
    }
}

impl NotificationArgs {
    fn apply_to(&self, current: NotificationPreferences) -> NotificationPreferences {
        NotificationPreferences {
            email_reminders: self.email_reminders.unwrap_or(current.email_reminders),
            sms_reminders: self.sms_reminders.unwrap_or(current.sms_reminders),
            payment_received: self.payment_received.unwrap_or(current.payment_received),
            weekly_summary: self.weekly_summary.unwrap_or(current.weekly_summary),
        }
    }
}

pub async fn run(
    command: OnboardingCommand,
    orchestrator: &OnboardingOrchestrator,
) -> Result<String, CommandError> {
    match command {
        OnboardingCommand::Status { return_url } => {
            let span = info_span!("command.onboarding.status");
            async {
                match return_url {
                    Some(url) => render_view(orchestrator.reconcile_on_return(&url).await),
                    None => render(&orchestrator.view().await),
                }
            }
            .instrument(span)
            .await
        }
        OnboardingCommand::Signup(args) => {
            let span = info_span!("command.onboarding.signup");
            async { render_view(orchestrator.submit_signup(args.into()).await) }
                .instrument(span)
                .await
        }
        OnboardingCommand::Advance { step } => {
            let span = info_span!("command.onboarding.advance", %step);
            async { render_view(orchestrator.advance(step).await) }
                .instrument(span)
                .await
        }
        OnboardingCommand::Skip { step } => {
            let span = info_span!("command.onboarding.skip", %step);
            async { render_view(orchestrator.skip(step).await) }
                .instrument(span)
                .await
        }
        OnboardingCommand::Back => {
            let span = info_span!("command.onboarding.back");
            async { render_view(orchestrator.go_back().await) }
                .instrument(span)
                .await
        }
        OnboardingCommand::Reset => {
            let span = info_span!("command.onboarding.reset");
            async { render_view(orchestrator.reset().await) }
                .instrument(span)
                .await
        }
        OnboardingCommand::Finish => {
            let span = info_span!("command.onboarding.finish");
            async { render_view(orchestrator.finish().await) }
                .instrument(span)
                .await
        }
        OnboardingCommand::Checkout { plan_id } => {
            let span = info_span!("command.onboarding.checkout", plan_id = %plan_id);
            async { render_redirect(orchestrator.request_checkout(&plan_id).await) }
                .instrument(span)
                .await
        }
        OnboardingCommand::BusinessPlan => {
            let span = info_span!("command.onboarding.business_plan");
            async { render_view(orchestrator.choose_business_plan().await) }
                .instrument(span)
                .await
        }
        OnboardingCommand::VerifyEmail { code } => {
            let span = info_span!("command.onboarding.verify_email");
            async { render_view(orchestrator.verify_email(&code).await) }
                .instrument(span)
                .await
        }
        OnboardingCommand::Authorize => {
            let span = info_span!("command.onboarding.authorize");
            async { render_redirect(orchestrator.request_external_authorization().await) }
                .instrument(span)
                .await
        }
        OnboardingCommand::Integration { provider } => {
            let span = info_span!("command.onboarding.integration", provider = %provider);
            async {
                render_view(
                    orchestrator
                        .configure_integration(ProviderId::from(provider))
                        .await,
                )
            }
            .instrument(span)
            .await
        }
        OnboardingCommand::Notifications(args) => {
            let span = info_span!("command.onboarding.notifications");
            async {
                let current = orchestrator.view().await.progress.notification_preferences;
                render_view(
                    orchestrator
                        .update_notification_preferences(args.apply_to(current))
                        .await,
                )
            }
            .instrument(span)
            .await
        }
        OnboardingCommand::Reconcile { return_url } => {
            let span = info_span!("command.onboarding.reconcile");
            async { render_view(orchestrator.reconcile_on_return(&return_url).await) }
                .instrument(span)
                .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_args_only_override_given_flags() {
        let args = NotificationArgs {
            email_reminders: None,
            sms_reminders: Some(true),
            payment_received: Some(false),
            weekly_summary: None,
        };
        let current = NotificationPreferences::default();

        let updated = args.apply_to(current);

        assert_eq!(updated.email_reminders, current.email_reminders);
        assert!(updated.sms_reminders);
        assert!(!updated.payment_received);
        assert_eq!(updated.weekly_summary, current.weekly_summary);
    }

    #[test]
    fn signup_args_map_password_to_credential() {
        let form = SignupForm::from(SignupArgs {
            organization_name: "Acme AB".to_string(),
            registration_number: "556677-8899".to_string(),
            email: "ceo@acme.se".to_string(),
            password: Some("s3cretpass".to_string()),
        });
        assert_eq!(form.organization_name, "Acme AB");
        assert_eq!(form.credential.unwrap().expose(), "s3cretpass");
    }
}
