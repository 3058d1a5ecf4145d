use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppDirsError {
    #[error("system data-local directory is unavailable")]
    DataLocalDirUnavailable,
}

/// Marks a stored record as unusable. Store adapters return it (wrapped in
/// `anyhow::Error`) only when the bytes were read but could not be decoded;
/// I/O failures are reported as plain errors so the record is kept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressStoreError {
    #[error("stored onboarding progress is corrupt: {0}")]
    Corrupt(String),
}

/// Failure to obtain a redirect URL from an external connector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectorError {
    /// Transport failure, timeout, or a server-side error.
    #[error("connector unavailable: {0}")]
    Unavailable(String),

    /// The connector answered but refused the request or sent nothing usable.
    #[error("connector rejected request: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProvisioningError {
    /// Remote validation, e.g. an organization number that is already
    /// registered.
    #[error("provisioning rejected: {message}")]
    Validation {
        field: Option<String>,
        message: String,
    },

    #[error("provisioning service unavailable: {0}")]
    Unavailable(String),
}
