//! Onboarding orchestrator.
//!
//! This module coordinates the onboarding state machine with its side effects:
//! the progress store, the redirect connectors and tenant provisioning.
//! Every mutation is applied to a copy, persisted, and only then committed,
//! so a rejected write leaves the in-memory aggregate on the last persisted
//! snapshot.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, info_span, warn, Instrument};

use pc_core::onboarding::{
    ConnectorKind, NotificationPreferences, OnboardingAction, OnboardingError, OnboardingEvent,
    OnboardingStateMachine, OnboardingStep, ReturnMarker, ReturnPayload, SelectedPlan, SignupData,
    SignupForm, TransitionError, WorkflowProgress,
};
use pc_core::ports::{
    AuthorizationConnectorPort, CheckoutConnectorPort, CheckoutRequest, ClockPort,
    OnboardingEventPort, ProgressStoreError, ProgressStorePort, ProvisioningError,
    ProvisioningProof, ProvisioningRequest, TenantProvisioningPort,
};
use pc_core::{ProviderId, TenantId};

use crate::deps::{OnboardingDeps, OnboardingSettings};
use crate::usecases::onboarding::context::OnboardingContext;
use crate::usecases::onboarding::view::OnboardingView;

pub const TENANT_MISMATCH_CODE: &str = "tenant_mismatch";

/// Orchestrator that owns the onboarding aggregate and drives its side effects.
pub struct OnboardingOrchestrator {
    context: Arc<OnboardingContext>,
    loaded: AtomicBool,
    settings: OnboardingSettings,

    progress_store: Arc<dyn ProgressStorePort>,
    authorization: Arc<dyn AuthorizationConnectorPort>,
    checkout: Arc<dyn CheckoutConnectorPort>,
    provisioning: Arc<dyn TenantProvisioningPort>,
    events: Arc<dyn OnboardingEventPort>,
    clock: Arc<dyn ClockPort>,
}

impl OnboardingOrchestrator {
    pub fn new(deps: OnboardingDeps, settings: OnboardingSettings) -> Self {
        Self {
            context: OnboardingContext::default().arc(),
            loaded: AtomicBool::new(false),
            settings,
            progress_store: deps.progress_store,
            authorization: deps.authorization,
            checkout: deps.checkout,
            provisioning: deps.provisioning,
            events: deps.events,
            clock: deps.clock,
        }
    }

    /// Current read-only view. Loads the persisted aggregate on first use.
    pub async fn view(&self) -> OnboardingView {
        let _dispatch_guard = self.context.acquire_dispatch_lock().await;
        if let Err(err) = self.ensure_loaded().await {
            // Rendering still works from defaults; the error rides along.
            self.context.set_last_error(Some(err)).await;
        }
        self.build_view().await
    }

    pub async fn advance(&self, step: OnboardingStep) -> Result<OnboardingView, OnboardingError> {
        self.dispatch(OnboardingEvent::Advance { step }).await
    }

    pub async fn skip(&self, step: OnboardingStep) -> Result<OnboardingView, OnboardingError> {
        self.dispatch(OnboardingEvent::Skip { step }).await
    }

    pub async fn go_back(&self) -> Result<OnboardingView, OnboardingError> {
        self.dispatch(OnboardingEvent::Back).await
    }

    /// Clears the store and starts over. Also drops the in-memory credential.
    pub async fn reset(&self) -> Result<OnboardingView, OnboardingError> {
        self.dispatch(OnboardingEvent::Reset).await
    }

    pub async fn choose_business_plan(&self) -> Result<OnboardingView, OnboardingError> {
        self.dispatch(OnboardingEvent::ChooseBusinessPlan).await
    }

    pub async fn configure_integration(
        &self,
        provider: ProviderId,
    ) -> Result<OnboardingView, OnboardingError> {
        if provider.is_blank() {
            return self
                .fail_with(OnboardingError::validation(
                    "provider",
                    "integration provider is required",
                ))
                .await;
        }
        self.dispatch(OnboardingEvent::ConfigureIntegration { provider })
            .await
    }

    pub async fn update_notification_preferences(
        &self,
        preferences: NotificationPreferences,
    ) -> Result<OnboardingView, OnboardingError> {
        self.dispatch(OnboardingEvent::UpdateNotifications { preferences })
            .await
    }

    /// Validates the welcome form and stores the organization details.
    pub async fn submit_signup(&self, form: SignupForm) -> Result<OnboardingView, OnboardingError> {
        let span = info_span!("usecase.onboarding_orchestrator.submit_signup");
        async {
            let _dispatch_guard = self.context.acquire_dispatch_lock().await;
            if let Err(err) = self.ensure_loaded().await {
                return self.settle(Err(err)).await;
            }

            let result = async {
                let signup = form.validate()?;
                self.apply(OnboardingEvent::SubmitSignup { data: signup.data })
                    .await?;
                self.context.store_credential(signup.credential).await;
                Ok::<(), OnboardingError>(())
            }
            .await;

            self.settle(result).await?;
            Ok(self.build_view().await)
        }
        .instrument(span)
        .await
    }

    /// Leaves the terminal step and clears everything for the next signup.
    pub async fn finish(&self) -> Result<OnboardingView, OnboardingError> {
        let span = info_span!("usecase.onboarding_orchestrator.finish");
        async {
            let _dispatch_guard = self.context.acquire_dispatch_lock().await;
            if let Err(err) = self.ensure_loaded().await {
                return self.settle(Err(err)).await;
            }

            let current = self.context.progress().await.current_step;
            let result = if current.is_terminal() {
                self.apply(OnboardingEvent::Reset).await.map(|_| ())
            } else {
                Err(TransitionError::NotComplete { current }.into())
            };

            self.settle(result).await?;
            Ok(self.build_view().await)
        }
        .instrument(span)
        .await
    }

    /// Asks the authorization connector for a redirect URL.
    ///
    /// The departure is persisted before the URL is returned; the caller
    /// navigates away only on `Ok`.
    pub async fn request_external_authorization(&self) -> Result<String, OnboardingError> {
        let span = info_span!("usecase.onboarding_orchestrator.request_external_authorization");
        async {
            let _dispatch_guard = self.context.acquire_dispatch_lock().await;
            if let Err(err) = self.ensure_loaded().await {
                return self.settle(Err(err)).await;
            }

            let result = async {
                let progress = self.context.progress().await;
                if progress.current_step != OnboardingStep::Fortnox {
                    return Err(OnboardingError::unavailable(
                        ConnectorKind::Authorization,
                        format!(
                            "authorization is only available on the fortnox step (current: {})",
                            progress.current_step
                        ),
                    ));
                }
                let tenant_id = progress.tenant_id.clone().ok_or_else(|| {
                    OnboardingError::unavailable(
                        ConnectorKind::Authorization,
                        "no tenant has been provisioned yet",
                    )
                })?;

                let url = self
                    .authorization
                    .begin_authorization(&tenant_id)
                    .await
                    .map_err(|err| {
                        OnboardingError::unavailable(ConnectorKind::Authorization, err.to_string())
                    })?;

                self.apply(OnboardingEvent::Depart {
                    connector: ConnectorKind::Authorization,
                    plan: None,
                    at_ms: self.clock.now_ms(),
                })
                .await?;
                info!(tenant_id = %tenant_id, "departing to authorization connector");
                Ok::<String, OnboardingError>(url)
            }
            .await;

            self.settle(result).await
        }
        .instrument(span)
        .await
    }

    /// Asks the checkout connector for a payment session URL for `plan_id`.
    pub async fn request_checkout(&self, plan_id: &str) -> Result<String, OnboardingError> {
        let span = info_span!("usecase.onboarding_orchestrator.request_checkout", plan_id);
        async {
            let _dispatch_guard = self.context.acquire_dispatch_lock().await;
            if let Err(err) = self.ensure_loaded().await {
                return self.settle(Err(err)).await;
            }

            let result = async {
                let plan_id = plan_id.trim();
                if plan_id.is_empty() {
                    return Err(OnboardingError::validation("planId", "plan id is required"));
                }

                let progress = self.context.progress().await;
                if progress.current_step != OnboardingStep::Plan {
                    return Err(OnboardingError::unavailable(
                        ConnectorKind::Checkout,
                        format!(
                            "checkout is only available on the plan step (current: {})",
                            progress.current_step
                        ),
                    ));
                }
                let signup = progress.signup_data.clone().ok_or_else(|| {
                    OnboardingError::unavailable(
                        ConnectorKind::Checkout,
                        "signup details have not been submitted",
                    )
                })?;

                let request = CheckoutRequest {
                    signup,
                    plan_id: plan_id.to_string(),
                    success_url: self.settings.checkout_success_url(),
                    cancel_url: self.settings.checkout_cancel_url(),
                };
                let url = self.checkout.begin_checkout(&request).await.map_err(|err| {
                    OnboardingError::unavailable(ConnectorKind::Checkout, err.to_string())
                })?;

                self.apply(OnboardingEvent::Depart {
                    connector: ConnectorKind::Checkout,
                    plan: Some(SelectedPlan::B2c {
                        price_id: request.plan_id,
                    }),
                    at_ms: self.clock.now_ms(),
                })
                .await?;
                info!("departing to checkout connector");
                Ok::<String, OnboardingError>(url)
            }
            .await;

            self.settle(result).await
        }
        .instrument(span)
        .await
    }

    /// Qualifies the business track: provisions the tenant with the emailed
    /// code as proof and moves past `plan`.
    pub async fn verify_email(&self, code: &str) -> Result<OnboardingView, OnboardingError> {
        let span = info_span!("usecase.onboarding_orchestrator.verify_email");
        async {
            let _dispatch_guard = self.context.acquire_dispatch_lock().await;
            if let Err(err) = self.ensure_loaded().await {
                return self.settle(Err(err)).await;
            }

            let result = async {
                let code = code.trim();
                if code.is_empty() {
                    return Err(OnboardingError::validation(
                        "code",
                        "verification code is required",
                    ));
                }

                let progress = self.context.progress().await;
                if progress.current_step != OnboardingStep::Plan {
                    return Err(TransitionError::WrongStep {
                        expected: OnboardingStep::Plan,
                        current: progress.current_step,
                    }
                    .into());
                }
                if progress.selected_plan != Some(SelectedPlan::B2b) {
                    return Err(TransitionError::PlanTrackMismatch.into());
                }

                let tenant_id = self
                    .provision(
                        &progress,
                        ProvisioningProof::VerifiedEmail {
                            code: code.to_string(),
                        },
                    )
                    .await?;
                self.apply(OnboardingEvent::EmailVerified { tenant_id })
                    .await?;
                Ok::<(), OnboardingError>(())
            }
            .await;

            self.settle(result).await?;
            Ok(self.build_view().await)
        }
        .instrument(span)
        .await
    }

    /// Reconstructs the outcome of an external redirect from the persisted
    /// aggregate plus the URL the browser came back on. Safe to call on every
    /// mount and with the same URL more than once.
    pub async fn reconcile_on_return(
        &self,
        return_url: &str,
    ) -> Result<OnboardingView, OnboardingError> {
        let marker = ReturnMarker::from_return_url(return_url);
        let span = info_span!(
            "usecase.onboarding_orchestrator.reconcile_on_return",
            marker_step = ?marker.step()
        );
        async {
            let _dispatch_guard = self.context.acquire_dispatch_lock().await;
            if let Err(err) = self.ensure_loaded().await {
                return self.settle(Err(err)).await;
            }

            let result = self.reconcile(marker).await;
            self.settle(result).await?;
            Ok(self.build_view().await)
        }
        .instrument(span)
        .await
    }

    async fn reconcile(&self, marker: ReturnMarker) -> Result<(), OnboardingError> {
        let progress = self.context.progress().await;

        match marker {
            ReturnMarker::None => {
                if progress.pending_departure.is_some() {
                    info!(
                        step = %progress.current_step,
                        "returned without a connector marker; clearing pending departure"
                    );
                    self.apply(OnboardingEvent::ClearDeparture).await?;
                }
                Ok(())
            }
            // Without a pending departure this is the same URL seen again on
            // a later mount, e.g. after going back onto the completed step.
            ReturnMarker::Success { step, .. }
                if progress.is_completed(step) && progress.pending_departure.is_none() =>
            {
                debug!(step = %step, "success marker already reconciled");
                Ok(())
            }
            ReturnMarker::Success { step, .. } if step != progress.current_step => {
                warn!(
                    step = %step,
                    current = %progress.current_step,
                    "ignoring success marker for a step that is not current"
                );
                Ok(())
            }
            ReturnMarker::Success {
                payload: ReturnPayload::Payment { session_id },
                ..
            } => {
                let tenant_id = match &progress.tenant_id {
                    Some(existing) => existing.clone(),
                    None => {
                        if !progress
                            .selected_plan
                            .as_ref()
                            .is_some_and(SelectedPlan::requires_checkout)
                        {
                            return Err(TransitionError::PlanTrackMismatch.into());
                        }
                        self.provision(
                            &progress,
                            ProvisioningProof::CompletedCheckout { session_id },
                        )
                        .await?
                    }
                };
                self.apply(OnboardingEvent::PaymentConfirmed {
                    tenant_id: Some(tenant_id),
                })
                .await?;
                Ok(())
            }
            ReturnMarker::Success {
                payload: ReturnPayload::Authorization { account_ref },
                ..
            } => {
                if let Some(tenant_id) = &progress.tenant_id {
                    if tenant_id.inner() != &account_ref {
                        warn!(
                            tenant_id = %tenant_id,
                            returned = %account_ref,
                            "authorization returned for a different tenant"
                        );
                        self.apply(OnboardingEvent::ClearDeparture).await?;
                        return Err(OnboardingError::ConnectorReturnedError {
                            connector: ConnectorKind::Authorization,
                            code: TENANT_MISMATCH_CODE.to_string(),
                            description: Some(format!(
                                "authorization was granted for tenant `{account_ref}`"
                            )),
                        });
                    }
                }
                self.apply(OnboardingEvent::ExternalSystemConnected { account_ref })
                    .await?;
                Ok(())
            }
            ReturnMarker::Error { step, code, .. } if step != progress.current_step => {
                debug!(
                    step = %step,
                    current = %progress.current_step,
                    code = %code,
                    "ignoring error marker for a step that is not current"
                );
                if progress.pending_departure.is_some() {
                    self.apply(OnboardingEvent::ClearDeparture).await?;
                }
                Ok(())
            }
            ReturnMarker::Error {
                step,
                connector,
                code,
                description,
            } => {
                warn!(step = %step, connector = %connector, code = %code, "connector returned an error");
                self.apply(OnboardingEvent::ClearDeparture).await?;
                Err(OnboardingError::ConnectorReturnedError {
                    connector,
                    code,
                    description,
                })
            }
        }
    }

    async fn provision(
        &self,
        progress: &WorkflowProgress,
        proof: ProvisioningProof,
    ) -> Result<TenantId, OnboardingError> {
        let signup: &SignupData = progress.signup_data.as_ref().ok_or_else(|| {
            OnboardingError::unavailable(
                ConnectorKind::Provisioning,
                "signup details have not been submitted",
            )
        })?;

        let credential = self.context.credential().await;
        let tenant_id = self
            .provisioning
            .provision_tenant(ProvisioningRequest {
                signup,
                credential: credential.as_ref(),
                proof,
            })
            .await
            .map_err(|err| match err {
                ProvisioningError::Validation { field, message } => {
                    OnboardingError::Validation { field, message }
                }
                ProvisioningError::Unavailable(reason) => {
                    OnboardingError::unavailable(ConnectorKind::Provisioning, reason)
                }
            })?;

        info!(tenant_id = %tenant_id, "tenant provisioned for onboarding");
        Ok(tenant_id)
    }

    async fn dispatch(&self, event: OnboardingEvent) -> Result<OnboardingView, OnboardingError> {
        // Serialize whole operations; see `OnboardingContext`.
        let _dispatch_guard = self.context.acquire_dispatch_lock().await;

        let span = info_span!(
            "usecase.onboarding_orchestrator.dispatch",
            event = event.name()
        );
        async {
            if let Err(err) = self.ensure_loaded().await {
                return self.settle(Err(err)).await;
            }
            let result = self.apply(event).await.map(|_| ());
            self.settle(result).await?;
            Ok(self.build_view().await)
        }
        .instrument(span)
        .await
    }

    /// Transition, execute actions, then commit. Must run under the dispatch
    /// lock.
    async fn apply(&self, event: OnboardingEvent) -> Result<WorkflowProgress, OnboardingError> {
        let current = self.context.progress().await;
        let from = current.current_step;
        let event_name = event.name();

        let (next, actions) = OnboardingStateMachine::transition(current, event)?;
        if actions.is_empty() {
            return Ok(next);
        }

        self.execute_actions(&next, &actions).await?;
        info!(from = %from, to = %next.current_step, event = event_name, "onboarding step transition");
        self.commit_and_emit(next.clone()).await;
        Ok(next)
    }

    async fn execute_actions(
        &self,
        next: &WorkflowProgress,
        actions: &[OnboardingAction],
    ) -> Result<(), OnboardingError> {
        for action in actions {
            debug!(?action, "onboarding executing action");
            match action {
                OnboardingAction::PersistProgress => {
                    self.progress_store.save(next).await.map_err(|err| {
                        warn!(error = %err, "onboarding progress save failed; keeping last persisted state");
                        OnboardingError::PersistenceFailure {
                            reason: format!("{err:#}"),
                        }
                    })?;
                }
                OnboardingAction::ClearProgress => {
                    self.progress_store.clear().await.map_err(|err| {
                        warn!(error = %err, "onboarding progress clear failed");
                        OnboardingError::PersistenceFailure {
                            reason: format!("{err:#}"),
                        }
                    })?;
                    self.context.drop_credential().await;
                }
            }
        }
        Ok(())
    }

    async fn commit_and_emit(&self, progress: WorkflowProgress) {
        self.context.set_progress(progress.clone()).await;
        self.events.emit_progress_changed(progress).await;
    }

    /// Records the outcome as `last_error` (cleared on success).
    async fn settle<T>(&self, result: Result<T, OnboardingError>) -> Result<T, OnboardingError> {
        match &result {
            Ok(_) => self.context.set_last_error(None).await,
            Err(err) => {
                warn!(error = %err, "onboarding operation failed");
                self.context.set_last_error(Some(err.clone())).await;
            }
        }
        result
    }

    async fn fail_with(&self, error: OnboardingError) -> Result<OnboardingView, OnboardingError> {
        let _dispatch_guard = self.context.acquire_dispatch_lock().await;
        if let Err(err) = self.ensure_loaded().await {
            return self.settle(Err(err)).await;
        }
        self.settle(Err(error)).await
    }

    async fn build_view(&self) -> OnboardingView {
        OnboardingView::project(
            self.context.progress().await,
            self.context.last_error().await,
            self.settings.completion_redirect_secs,
        )
    }

    /// Loads the persisted aggregate exactly once. A record that fails to
    /// parse or violates the aggregate invariants is discarded. Any other
    /// load failure leaves the record in place and is retried by the next
    /// operation.
    async fn ensure_loaded(&self) -> Result<(), OnboardingError> {
        if self.loaded.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let restored = match self.progress_store.load().await {
            Ok(Some(progress)) => match progress.check_invariants() {
                Ok(()) => {
                    info!(step = %progress.current_step, "resuming onboarding progress");
                    Some(progress)
                }
                Err(violation) => {
                    warn!(%violation, "stored onboarding progress is inconsistent; starting fresh");
                    None
                }
            },
            Ok(None) => return Ok(()),
            Err(err) if err.downcast_ref::<ProgressStoreError>().is_some() => {
                warn!(error = %err, "stored onboarding progress is unreadable; starting fresh");
                None
            }
            Err(err) => {
                self.loaded.store(false, Ordering::SeqCst);
                let reason = format!("{err:#}");
                warn!(%reason, "failed to load onboarding progress; keeping the stored record");
                return Err(OnboardingError::PersistenceFailure { reason });
            }
        };

        match restored {
            Some(progress) => self.context.set_progress(progress).await,
            None => {
                if let Err(err) = self.progress_store.clear().await {
                    warn!(error = %err, "failed to clear unusable onboarding progress");
                }
            }
        }
        Ok(())
    }
}
