use async_trait::async_trait;

use crate::onboarding::SignupData;
use crate::ports::errors::ConnectorError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub signup: SignupData,
    pub plan_id: String,
    pub success_url: String,
    pub cancel_url: String,
}

/// Creates a hosted payment session and returns its URL.
#[async_trait]
pub trait CheckoutConnectorPort: Send + Sync {
    async fn begin_checkout(&self, request: &CheckoutRequest) -> Result<String, ConnectorError>;
}
