//! End-to-end onboarding flows over the real file-backed progress store.
//!
//! Every "page load" builds a fresh orchestrator over the same file, so the
//! only thing that survives a redirect is what was persisted.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use pc_app::{OnboardingDeps, OnboardingOrchestrator, OnboardingSettings};
use pc_core::onboarding::{
    ConnectorKind, OnboardingError, OnboardingStep, SelectedPlan, SignupForm, TransitionError,
    WorkflowProgress, STEP_TABLE,
};
use pc_core::ports::{
    AuthorizationConnectorPort, CheckoutConnectorPort, CheckoutRequest, ClockPort,
    ConnectorError, OnboardingEventPort, ProgressStorePort, ProvisioningError, ProvisioningProof,
    ProvisioningRequest, TenantProvisioningPort,
};
use pc_core::{ProviderId, SecretString, TenantId};
use pc_infra::FileProgressStore;

struct StaticAuthorization;

#[async_trait]
impl AuthorizationConnectorPort for StaticAuthorization {
    async fn begin_authorization(&self, tenant_id: &TenantId) -> Result<String, ConnectorError> {
        Ok(format!("https://apps.fortnox.se/oauth-v1/auth?state={tenant_id}"))
    }
}

#[derive(Default)]
struct RecordingCheckout {
    requests: Mutex<Vec<CheckoutRequest>>,
}

#[async_trait]
impl CheckoutConnectorPort for RecordingCheckout {
    async fn begin_checkout(&self, request: &CheckoutRequest) -> Result<String, ConnectorError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok("https://checkout.stripe.com/c/pay/cs_test_1".to_string())
    }
}

#[derive(Default)]
struct RecordingProvisioner {
    proofs: Mutex<Vec<ProvisioningProof>>,
}

#[async_trait]
impl TenantProvisioningPort for RecordingProvisioner {
    async fn provision_tenant(
        &self,
        request: ProvisioningRequest<'_>,
    ) -> Result<TenantId, ProvisioningError> {
        self.proofs.lock().unwrap().push(request.proof.clone());
        Ok(TenantId::from("tenant-42"))
    }
}

struct NoopEvents;

#[async_trait]
impl OnboardingEventPort for NoopEvents {
    async fn emit_progress_changed(&self, _progress: WorkflowProgress) {}
}

struct FixedClock;

impl ClockPort for FixedClock {
    fn now_ms(&self) -> i64 {
        42
    }
}

struct World {
    _dir: TempDir,
    path: PathBuf,
    checkout: Arc<RecordingCheckout>,
    provisioner: Arc<RecordingProvisioner>,
}

impl World {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("onboarding_progress.json");
        Self {
            _dir: dir,
            path,
            checkout: Arc::new(RecordingCheckout::default()),
            provisioner: Arc::new(RecordingProvisioner::default()),
        }
    }

    fn store(&self) -> FileProgressStore {
        FileProgressStore::new(self.path.clone())
    }

    /// A fresh orchestrator, as after a full page load.
    fn page_load(&self) -> OnboardingOrchestrator {
        OnboardingOrchestrator::new(
            OnboardingDeps {
                progress_store: Arc::new(self.store()),
                authorization: Arc::new(StaticAuthorization),
                checkout: self.checkout.clone(),
                provisioning: self.provisioner.clone(),
                events: Arc::new(NoopEvents),
                clock: Arc::new(FixedClock),
            },
            OnboardingSettings {
                app_base_url: "https://app.paychase.se".to_string(),
                completion_redirect_secs: 5,
            },
        )
    }

    async fn seed(&self, progress: &WorkflowProgress) {
        self.store().save(progress).await.unwrap();
    }

    async fn persisted(&self) -> Option<WorkflowProgress> {
        self.store().load().await.unwrap()
    }
}

fn file_exists(path: &Path) -> bool {
    path.exists()
}

fn signup_form() -> SignupForm {
    SignupForm {
        organization_name: "Acme AB".to_string(),
        registration_number: "556677-8899".to_string(),
        email: "ceo@acme.se".to_string(),
        credential: Some(SecretString::new("s3cretpass".to_string())),
    }
}

fn at_fortnox_with_tenant() -> WorkflowProgress {
    let mut progress = WorkflowProgress {
        current_step: OnboardingStep::Fortnox,
        tenant_id: Some(TenantId::from("tenant-42")),
        plan_selected: true,
        ..Default::default()
    };
    progress.completed_steps.insert(OnboardingStep::Welcome);
    progress.completed_steps.insert(OnboardingStep::Plan);
    progress
}

#[tokio::test]
async fn advance_and_skip_sequences_land_on_table_position() {
    for count in 0..=STEP_TABLE.len() + 1 {
        for use_skip in [false, true] {
            let world = World::new();
            let orchestrator = world.page_load();

            let mut view = orchestrator.view().await;
            for _ in 0..count {
                let step = view.current_step;
                view = if use_skip && step.is_optional() {
                    orchestrator.skip(step).await.unwrap()
                } else {
                    orchestrator.advance(step).await.unwrap()
                };
            }

            let expected = STEP_TABLE
                .get(count)
                .copied()
                .unwrap_or(OnboardingStep::Complete);
            assert_eq!(view.current_step, expected, "count={count} skip={use_skip}");
        }
    }
}

#[tokio::test]
async fn double_advance_does_not_duplicate_or_overshoot() {
    let world = World::new();
    let orchestrator = world.page_load();

    orchestrator.advance(OnboardingStep::Welcome).await.unwrap();
    let view = orchestrator.advance(OnboardingStep::Welcome).await.unwrap();

    assert_eq!(view.current_step, OnboardingStep::Plan);
    assert_eq!(view.progress.completed_steps.len(), 1);
}

#[tokio::test]
async fn go_back_on_first_step_writes_nothing() {
    let world = World::new();
    let orchestrator = world.page_load();

    let view = orchestrator.go_back().await.unwrap();

    assert_eq!(view.current_step, OnboardingStep::Welcome);
    assert!(!file_exists(&world.path));
}

#[tokio::test]
async fn reset_then_load_returns_none() {
    let world = World::new();
    let orchestrator = world.page_load();
    orchestrator.advance(OnboardingStep::Welcome).await.unwrap();
    assert!(world.persisted().await.is_some());

    orchestrator.reset().await.unwrap();

    assert!(world.persisted().await.is_none());
}

#[tokio::test]
async fn skip_fortnox_moves_on_without_completing_it() {
    let world = World::new();
    world.seed(&at_fortnox_with_tenant()).await;

    let view = world
        .page_load()
        .skip(OnboardingStep::Fortnox)
        .await
        .unwrap();

    assert_eq!(view.current_step, OnboardingStep::Integrations);
    assert!(!view.progress.is_completed(OnboardingStep::Fortnox));
}

#[tokio::test]
async fn skipping_a_required_step_is_rejected() {
    let world = World::new();

    let err = world
        .page_load()
        .skip(OnboardingStep::Welcome)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        OnboardingError::InvalidTransition {
            transition: TransitionError::StepNotOptional {
                step: OnboardingStep::Welcome
            }
        }
    );
}

#[tokio::test]
async fn checkout_round_trip_resumes_from_persisted_state() {
    let world = World::new();

    // First page load: fill in signup, move to plan, start checkout.
    let orchestrator = world.page_load();
    orchestrator.submit_signup(signup_form()).await.unwrap();
    let view = orchestrator.advance(OnboardingStep::Welcome).await.unwrap();
    assert_eq!(view.current_step, OnboardingStep::Plan);
    assert_eq!(
        view.progress.completed_steps,
        BTreeSet::from([OnboardingStep::Welcome])
    );

    let url = orchestrator.request_checkout("price_x").await.unwrap();
    assert_eq!(url, "https://checkout.stripe.com/c/pay/cs_test_1");
    let departed = world.persisted().await.unwrap();
    assert_eq!(
        departed.pending_departure.map(|pending| pending.connector),
        Some(ConnectorKind::Checkout)
    );
    drop(orchestrator);

    // Browser comes back on a brand-new page.
    let view = world
        .page_load()
        .reconcile_on_return(
            "https://app.paychase.se/onboarding?payment=success&session_id=cs_test_1",
        )
        .await
        .unwrap();

    assert!(view.progress.plan_selected);
    assert_eq!(view.current_step, OnboardingStep::Fortnox);
    assert_eq!(view.progress.tenant_id, Some(TenantId::from("tenant-42")));
    assert!(view.progress.pending_departure.is_none());
    assert_eq!(
        world.provisioner.proofs.lock().unwrap().as_slice(),
        &[ProvisioningProof::CompletedCheckout {
            session_id: Some("cs_test_1".to_string())
        }]
    );

    let request = world.checkout.requests.lock().unwrap()[0].clone();
    assert_eq!(request.signup.email, "ceo@acme.se");
    assert_eq!(
        request.cancel_url,
        "https://app.paychase.se/onboarding?payment=cancelled"
    );
}

#[tokio::test]
async fn reloading_the_same_success_url_is_idempotent() {
    let world = World::new();
    world.seed(&at_fortnox_with_tenant()).await;
    let url = "https://app.paychase.se/onboarding?fortnox=success&tenant=tenant-42";

    let first = world.page_load().reconcile_on_return(url).await.unwrap();
    let second = world.page_load().reconcile_on_return(url).await.unwrap();

    assert_eq!(first.current_step, OnboardingStep::Integrations);
    assert_eq!(second.progress, first.progress);
    assert_eq!(world.persisted().await, Some(first.progress));
}

#[tokio::test]
async fn authorization_success_marks_connected_and_moves_past_fortnox() {
    let world = World::new();
    world.seed(&at_fortnox_with_tenant()).await;

    let url = world
        .page_load()
        .request_external_authorization()
        .await
        .unwrap();
    assert!(url.contains("state=tenant-42"));

    let view = world
        .page_load()
        .reconcile_on_return("?fortnox=success&tenant=tenant-42")
        .await
        .unwrap();

    assert!(view.progress.external_system_connected);
    assert_eq!(view.progress.external_account_ref.as_deref(), Some("tenant-42"));
    assert!(view.progress.is_completed(OnboardingStep::Fortnox));
    assert_eq!(view.current_step, OnboardingStep::Integrations);
}

#[tokio::test]
async fn authorization_error_stays_on_fortnox_and_surfaces_error() {
    let world = World::new();
    world.seed(&at_fortnox_with_tenant()).await;
    world
        .page_load()
        .request_external_authorization()
        .await
        .unwrap();

    let orchestrator = world.page_load();
    let err = orchestrator
        .reconcile_on_return("?fortnox=error&error=access_denied&error_description=User+declined")
        .await
        .unwrap_err();

    assert_eq!(
        err,
        OnboardingError::ConnectorReturnedError {
            connector: ConnectorKind::Authorization,
            code: "access_denied".to_string(),
            description: Some("User declined".to_string()),
        }
    );
    let view = orchestrator.view().await;
    assert_eq!(view.current_step, OnboardingStep::Fortnox);
    assert!(!view.progress.external_system_connected);
    assert_eq!(view.last_error, Some(err));
    assert!(world.persisted().await.unwrap().pending_departure.is_none());
}

#[tokio::test]
async fn plain_reload_clears_pending_departure() {
    let world = World::new();
    world.seed(&at_fortnox_with_tenant()).await;
    world
        .page_load()
        .request_external_authorization()
        .await
        .unwrap();

    let view = world
        .page_load()
        .reconcile_on_return("https://app.paychase.se/onboarding")
        .await
        .unwrap();

    assert_eq!(view.current_step, OnboardingStep::Fortnox);
    assert!(view.progress.pending_departure.is_none());
}

#[tokio::test]
async fn business_track_completes_with_manual_completion() {
    let world = World::new();
    let orchestrator = world.page_load();

    orchestrator.submit_signup(signup_form()).await.unwrap();
    orchestrator.advance(OnboardingStep::Welcome).await.unwrap();
    orchestrator.choose_business_plan().await.unwrap();
    let view = orchestrator.verify_email("123456").await.unwrap();
    assert_eq!(view.current_step, OnboardingStep::Fortnox);
    assert!(view.progress.email_verified);

    orchestrator.skip(OnboardingStep::Fortnox).await.unwrap();
    orchestrator
        .configure_integration(ProviderId::from("Visma"))
        .await
        .unwrap();
    orchestrator
        .advance(OnboardingStep::Integrations)
        .await
        .unwrap();
    let view = orchestrator
        .advance(OnboardingStep::Notifications)
        .await
        .unwrap();

    assert!(view.is_finished());
    assert_eq!(view.current_step_index, view.total_steps);
    assert_eq!(
        view.completion_behavior,
        pc_core::CompletionBehavior::Manual
    );
    assert_eq!(view.progress.selected_plan, Some(SelectedPlan::B2b));
    assert!(view
        .progress
        .integrations_configured
        .contains(&ProviderId::from("visma")));

    let view = orchestrator.finish().await.unwrap();
    assert_eq!(view.progress, WorkflowProgress::default());
    assert!(world.persisted().await.is_none());
}

#[tokio::test]
async fn corrupt_progress_file_starts_fresh() {
    let world = World::new();
    tokio::fs::write(&world.path, "{not json").await.unwrap();

    let view = world.page_load().view().await;

    assert_eq!(view.progress, WorkflowProgress::default());
    assert!(!file_exists(&world.path));
}
