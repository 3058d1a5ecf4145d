use serde::{Deserialize, Serialize};

use super::id_macro::impl_id;

/// Identifier of an integration provider configured during onboarding
/// (e.g. `fortnox`, `visma`, `stripe`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(String);

impl_id!(ProviderId);

impl ProviderId {
    /// Lowercased, trimmed form used as the set key.
    pub fn normalized(&self) -> Self {
        Self(self.0.trim().to_ascii_lowercase())
    }
}
