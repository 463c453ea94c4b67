//! The one registry installed for the process.
//!
//! Startup code builds a [`ServiceRegistry`] as a plain value, registers
//! everything, then installs it. The returned `&'static` handle is what gets
//! threaded through constructors afterwards; [`installed`] exists for late
//! readers such as debug inspectors.

use crate::registry::error::{RegistryError, RegistryResult};
use crate::registry::service_registry::ServiceRegistry;
use log::info;
use once_cell::sync::OnceCell;

static PROCESS_REGISTRY: OnceCell<ServiceRegistry> = OnceCell::new();

/// Installs `registry` as the process registry.
///
/// # Errors
/// - `AlreadyInstalled` when a registry was installed earlier; the installed
///   registry is left unchanged.
pub fn install(registry: ServiceRegistry) -> RegistryResult<&'static ServiceRegistry> {
    let handle = PROCESS_REGISTRY
        .try_insert(registry)
        .map_err(|_| RegistryError::AlreadyInstalled)?;
    info!(
        "event=registry_installed module=registry status=ok services={}",
        handle.len()
    );
    Ok(handle)
}

/// Returns the installed process registry, if any.
///
/// An inspector that finds nothing here shows no services; it never
/// registers services itself.
pub fn installed() -> Option<&'static ServiceRegistry> {
    PROCESS_REGISTRY.get()
}
