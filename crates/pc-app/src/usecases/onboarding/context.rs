use std::sync::Arc;

use pc_core::onboarding::{OnboardingError, WorkflowProgress};
use pc_core::SecretString;
use tokio::sync::Mutex;

/// Shared onboarding context containing the aggregate and the dispatch lock.
///
/// ## Lock Ordering
/// When acquiring more than one lock, acquire `dispatch_lock` first.
/// - `dispatch_lock`: serializes whole operations (load, connector calls,
///   transition, persistence) so no mutation happens while a connector call
///   is outstanding.
/// - `progress`, `last_error`, `credential`: short-lived data locks.
#[derive(Clone)]
pub struct OnboardingContext {
    /// Last persisted aggregate.
    progress: Arc<Mutex<WorkflowProgress>>,
    /// Most recent operation error, cleared by the next success.
    last_error: Arc<Mutex<Option<OnboardingError>>>,
    /// Signup credential. Memory only, never persisted.
    credential: Arc<Mutex<Option<SecretString>>>,
    dispatch_lock: Arc<Mutex<()>>,
}

impl OnboardingContext {
    pub fn new(initial: WorkflowProgress) -> Self {
        Self {
            progress: Arc::new(Mutex::new(initial)),
            last_error: Arc::new(Mutex::new(None)),
            credential: Arc::new(Mutex::new(None)),
            dispatch_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub async fn progress(&self) -> WorkflowProgress {
        self.progress.lock().await.clone()
    }

    /// Only call while holding the dispatch lock.
    pub async fn set_progress(&self, progress: WorkflowProgress) {
        *self.progress.lock().await = progress;
    }

    pub async fn last_error(&self) -> Option<OnboardingError> {
        self.last_error.lock().await.clone()
    }

    pub async fn set_last_error(&self, error: Option<OnboardingError>) {
        *self.last_error.lock().await = error;
    }

    pub async fn store_credential(&self, credential: Option<SecretString>) {
        *self.credential.lock().await = credential;
    }

    pub async fn drop_credential(&self) {
        self.credential.lock().await.take();
    }

    pub async fn credential(&self) -> tokio::sync::MutexGuard<'_, Option<SecretString>> {
        self.credential.lock().await
    }

    pub async fn acquire_dispatch_lock(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.dispatch_lock.lock().await
    }
}

impl Default for OnboardingContext {
    fn default() -> Self {
        Self::new(WorkflowProgress::default())
    }
}
