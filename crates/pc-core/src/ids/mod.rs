mod id_macro;
pub mod provider_id;
pub mod tenant_id;

pub use provider_id::ProviderId;
pub use tenant_id::TenantId;
