//! Error types for the bootstrap core

use crate::TypeName;
use metaboot_config::ConfigError;
use thiserror::Error;

/// Errors raised while bootstrapping the metadata model
///
/// Both bootstrap-specific variants describe defects in configuration or in
/// calling code. Nothing here is meant to be retried.
#[derive(Error, Debug)]
pub enum BootstrapError {
    /// A configured strategy selector did not match any registered implementation
    #[error("Unable to resolve {capability} strategy from selector [{selector}]")]
    UnknownStrategy {
        capability: &'static str,
        selector: String,
    },

    /// The same converter type was registered twice
    #[error("AttributeConverter class [{converter}] registered multiple times")]
    DuplicateConverter { converter: TypeName },

    /// Loading configuration values failed
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl BootstrapError {
    /// True for invariant violations that indicate a programming defect
    pub fn is_assertion_failure(&self) -> bool {
        matches!(self, BootstrapError::DuplicateConverter { .. })
    }
}

/// Result type for bootstrap operations
pub type BootstrapResult<T> = Result<T, BootstrapError>;
