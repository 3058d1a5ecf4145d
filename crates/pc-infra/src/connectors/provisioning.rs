use std::sync::Arc;

use async_trait::async_trait;
use pc_core::ports::{
    ProvisioningError, ProvisioningProof, ProvisioningRequest, TenantProvisioningPort,
};
use pc_core::TenantId;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::http::{EdgeCallError, EdgeFunctionClient};

const FUNCTION: &str = "provision-tenant";

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ProofBody<'a> {
    CompletedCheckout {
        #[serde(rename = "sessionId", skip_serializing_if = "Option::is_none")]
        session_id: Option<&'a str>,
    },
    VerifiedEmail {
        code: &'a str,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProvisionBody<'a> {
    organization_name: &'a str,
    registration_number: &'a str,
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
    proof: ProofBody<'a>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProvisionResponse {
    tenant_id: Option<String>,
}

impl From<EdgeCallError> for ProvisioningError {
    fn from(error: EdgeCallError) -> Self {
        match error {
            EdgeCallError::Status {
                status: 409 | 422,
                field,
                message,
            } => ProvisioningError::Validation { field, message },
            other => ProvisioningError::Unavailable(other.to_string()),
        }
    }
}

pub struct HttpTenantProvisioner {
    client: Arc<EdgeFunctionClient>,
}

impl HttpTenantProvisioner {
    pub fn new(client: Arc<EdgeFunctionClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TenantProvisioningPort for HttpTenantProvisioner {
    async fn provision_tenant(
        &self,
        request: ProvisioningRequest<'_>,
    ) -> Result<TenantId, ProvisioningError> {
        let proof = match &request.proof {
            ProvisioningProof::CompletedCheckout { session_id } => ProofBody::CompletedCheckout {
                session_id: session_id.as_deref(),
            },
            ProvisioningProof::VerifiedEmail { code } => ProofBody::VerifiedEmail { code },
        };
        let body = ProvisionBody {
            organization_name: &request.signup.organization_name,
            registration_number: &request.signup.registration_number,
            email: &request.signup.email,
            password: request.credential.map(|secret| secret.expose()),
            proof,
        };

        let response: ProvisionResponse = self.client.post_json(FUNCTION, &body).await?;
        let tenant_id = response
            .tenant_id
            .map(TenantId::from_string)
            .filter(|tenant_id| !tenant_id.is_blank())
            .ok_or_else(|| {
                ProvisioningError::Unavailable("response did not contain a tenant id".into())
            })?;

        info!(tenant_id = %tenant_id, "tenant provisioned");
        Ok(tenant_id)
    }
}
