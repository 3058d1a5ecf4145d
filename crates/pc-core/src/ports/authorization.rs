use async_trait::async_trait;

use crate::ids::TenantId;
use crate::ports::errors::ConnectorError;

/// Starts the accounting-system authorization handshake.
///
/// The returned URL leaves the application; the system comes back with a
/// `fortnox=success|error` marker on the return URL.
#[async_trait]
pub trait AuthorizationConnectorPort: Send + Sync {
    async fn begin_authorization(&self, tenant_id: &TenantId) -> Result<String, ConnectorError>;
}
