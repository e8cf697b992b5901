//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use domain_provisioner_provider::ProviderError;

use crate::types::ProvisioningStep;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Site not found
    #[error("Site not found: {0}")]
    SiteNotFound(String),

    /// Site has no requested domain to provision
    #[error("Site {0} has no pending domain")]
    NoPendingDomain(String),

    /// Storage layer error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Messaging or alert channel error
    #[error("Messaging error: {0}")]
    MessagingError(String),

    /// Tunnel configuration could not be read, written or applied
    #[error("Tunnel config error: {0}")]
    TunnelConfig(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// A provisioning step hit a terminal error
    #[error("Provisioning step '{step}' failed: {detail}")]
    StepFailed {
        step: ProvisioningStep,
        detail: String,
    },

    /// Provider error (converting from library)
    #[error("{0}")]
    Provider(#[from] ProviderError),
}

impl CoreError {
    /// Whether it is expected behavior (user input, resource does not exist, etc.) is used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added. **
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::SiteNotFound(_) | Self::NoPendingDomain(_) | Self::ValidationError(_) => true,
            Self::Provider(e) => e.is_expected(),
            _ => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
