use crate::onboarding::WorkflowProgress;

/// Notifies step renderers after every committed mutation.
#[async_trait::async_trait]
pub trait OnboardingEventPort: Send + Sync {
    async fn emit_progress_changed(&self, progress: WorkflowProgress);
}
