use async_trait::async_trait;

use crate::ids::TenantId;
use crate::onboarding::SignupData;
use crate::ports::errors::ProvisioningError;
use crate::security::SecretString;

/// Evidence that the organization qualified for a tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisioningProof {
    CompletedCheckout { session_id: Option<String> },
    VerifiedEmail { code: String },
}

#[derive(Debug)]
pub struct ProvisioningRequest<'a> {
    pub signup: &'a SignupData,
    pub credential: Option<&'a SecretString>,
    pub proof: ProvisioningProof,
}

#[async_trait]
pub trait TenantProvisioningPort: Send + Sync {
    async fn provision_tenant(
        &self,
        request: ProvisioningRequest<'_>,
    ) -> Result<TenantId, ProvisioningError>;
}
