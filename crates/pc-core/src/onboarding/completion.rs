use serde::{Deserialize, Serialize};

use crate::onboarding::progress::SelectedPlan;

/// What the `complete` step does once it is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CompletionBehavior {
    /// Forward to the dashboard after a countdown.
    AutoRedirect { after_secs: u64 },
    /// Stay on the summary until the user continues.
    Manual,
}

impl CompletionBehavior {
    /// Self-serve signups are sent on automatically; business signups get a
    /// summary to read first.
    pub fn for_plan(plan: Option<&SelectedPlan>, redirect_after_secs: u64) -> Self {
        match plan {
            Some(SelectedPlan::B2c { .. }) => Self::AutoRedirect {
                after_secs: redirect_after_secs,
            },
            Some(SelectedPlan::B2b) | None => Self::Manual,
        }
    }
}
