use serde::{Deserialize, Serialize};

use super::id_macro::impl_id;

/// Provisioned tenant (customer organization) identifier.
///
/// Opaque: issued by the provisioning backend and echoed back by the
/// authorization connector, never generated locally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(String);

impl_id!(TenantId);
