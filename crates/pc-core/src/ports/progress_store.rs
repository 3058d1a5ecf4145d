//! Onboarding progress store port
//!
//! This port defines the contract for persisting the onboarding aggregate
//! between page loads and across external redirects. Implementations are
//! provided by the infrastructure layer (e.g., file-based storage).

use async_trait::async_trait;

use crate::onboarding::WorkflowProgress;

#[async_trait]
pub trait ProgressStorePort: Send + Sync {
    /// Load the saved aggregate, `None` when nothing has been saved.
    ///
    /// An undecodable record is reported as
    /// [`ProgressStoreError::Corrupt`](crate::ports::ProgressStoreError::Corrupt).
    async fn load(&self) -> anyhow::Result<Option<WorkflowProgress>>;

    /// Replace the saved aggregate with `progress`.
    async fn save(&self, progress: &WorkflowProgress) -> anyhow::Result<()>;

    /// Remove the saved aggregate. Clearing an empty store is not an error.
    async fn clear(&self) -> anyhow::Result<()>;
}
