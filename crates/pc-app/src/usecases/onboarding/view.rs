use pc_core::onboarding::{
    CompletionBehavior, OnboardingError, OnboardingStep, WorkflowProgress,
};
use serde::Serialize;

/// Read-only projection handed to step renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingView {
    pub progress: WorkflowProgress,
    pub current_step: OnboardingStep,
    /// `complete` reports `total_steps`.
    pub current_step_index: usize,
    pub total_steps: usize,
    pub percent_complete: u8,
    pub can_go_back: bool,
    pub can_skip: bool,
    pub completion_behavior: CompletionBehavior,
    pub last_error: Option<OnboardingError>,
}

impl OnboardingView {
    pub fn project(
        progress: WorkflowProgress,
        last_error: Option<OnboardingError>,
        completion_redirect_secs: u64,
    ) -> Self {
        let current_step = progress.current_step;
        let completion_behavior = CompletionBehavior::for_plan(
            progress.selected_plan.as_ref(),
            completion_redirect_secs,
        );
        Self {
            current_step,
            current_step_index: progress.current_step_index(),
            total_steps: OnboardingStep::total(),
            percent_complete: current_step.completion_percent(),
            can_go_back: current_step.previous().is_some(),
            can_skip: current_step.is_optional(),
            completion_behavior,
            last_error,
            progress,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.current_step.is_terminal()
    }
}
