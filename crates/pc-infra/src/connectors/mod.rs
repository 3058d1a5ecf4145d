//! HTTP adapters for the backend edge functions that hand out redirect URLs
//! and provision tenants.

mod authorization;
mod checkout;
mod http;
mod provisioning;

pub use authorization::HttpAuthorizationConnector;
pub use checkout::HttpCheckoutConnector;
pub use http::{EdgeCallError, EdgeFunctionClient, EdgeFunctionConfig};
pub use provisioning::HttpTenantProvisioner;
