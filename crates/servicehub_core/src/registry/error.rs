//! Registry failure taxonomy.

use crate::service::setup::BoxError;

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Registration and resolution errors.
///
/// The registry recovers nothing locally; every variant surfaces to the
/// immediate caller.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// No usable zero-argument constructor, or the constructor failed.
    #[error("failed to construct `{implementation}`: {source}")]
    Construction {
        implementation: String,
        #[source]
        source: BoxError,
    },

    #[error("`{contract}` is already registered")]
    DuplicateRegistration { contract: String },

    #[error("setup of `{implementation}` for `{contract}` failed: {source}")]
    Setup {
        contract: String,
        implementation: String,
        #[source]
        source: BoxError,
    },

    #[error("`{contract}` is not implemented or not initialized")]
    ServiceNotFound { contract: String },

    #[error("`{implementation}` does not implement `{contract}`")]
    NotImplemented {
        implementation: String,
        contract: String,
    },

    #[error("a process registry is already installed")]
    AlreadyInstalled,
}

impl RegistryError {
    pub(crate) fn not_found(contract: impl Into<String>) -> Self {
        Self::ServiceNotFound {
            contract: contract.into(),
        }
    }

    /// Builds a construction error for an implementation without a constructor.
    pub(crate) fn missing_constructor(implementation: impl Into<String>) -> Self {
        let implementation = implementation.into();
        let source = format!("no zero-argument constructor is known for `{implementation}`");
        Self::Construction {
            implementation,
            source: source.into(),
        }
    }
}
