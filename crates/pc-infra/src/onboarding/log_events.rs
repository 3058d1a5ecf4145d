use async_trait::async_trait;
use pc_core::onboarding::WorkflowProgress;
use pc_core::ports::OnboardingEventPort;
use tracing::info;

/// Event sink for headless drivers: every committed change becomes a log
/// line instead of a UI refresh.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogOnboardingEvents;

#[async_trait]
impl OnboardingEventPort for LogOnboardingEvents {
    async fn emit_progress_changed(&self, progress: WorkflowProgress) {
        info!(
            current_step = %progress.current_step,
            completed = progress.completed_steps.len(),
            pending_departure = progress.pending_departure.is_some(),
            "onboarding progress changed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn emitting_without_subscriber_is_harmless() {
        LogOnboardingEvents
            .emit_progress_changed(WorkflowProgress::default())
            .await;
    }
}
