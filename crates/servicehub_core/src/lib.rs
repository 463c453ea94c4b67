//! Core service registry for servicehub.
//! Maps service contracts to singleton implementations with ordered async setup.

pub mod bootstrap;
pub mod logging;
pub mod registry;
pub mod service;

pub use bootstrap::manifest::{BootstrapManifest, ManifestEntry, ManifestError};
pub use bootstrap::sequencer::{bootstrap, BootstrapError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use registry::catalog::{CatalogError, Implementation, ServiceCatalog};
pub use registry::entry::{RegistrationStage, ServiceSnapshot};
pub use registry::error::{RegistryError, RegistryResult};
pub use registry::key::ContractId;
pub use registry::process::{install, installed};
pub use registry::service_registry::ServiceRegistry;
pub use service::contract::{Implements, Provider, Service};
pub use service::setup::{AsyncSetup, BoxError, SetupHook, SyncSetup};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
