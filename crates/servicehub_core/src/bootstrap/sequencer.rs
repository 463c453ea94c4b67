//! Ordered registration driven by a manifest and a catalog.

use crate::bootstrap::manifest::{BootstrapManifest, ManifestError};
use crate::registry::catalog::{Implementation, ServiceCatalog};
use crate::registry::error::RegistryError;
use crate::registry::key::ContractId;
use crate::registry::service_registry::ServiceRegistry;
use log::{error, info};
use std::collections::HashSet;

/// Bootstrap failures.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error("bootstrap step {step} (`{contract}`) failed: {source}")]
    Registration {
        step: usize,
        contract: String,
        #[source]
        source: RegistryError,
    },
}

/// Registers every manifest entry in order.
///
/// Each entry names an implementation known to `catalog` and the contract it
/// should be stored under. Every entry is resolved through the catalog before
/// the first service is constructed, so a contract listed twice under
/// different spellings fails without running any constructor or hook.
/// Returns the registered contracts in order.
///
/// # Errors
/// - `Construction` when the catalog has no such implementation.
/// - `NotImplemented` when the implementation targets another contract.
/// - `DuplicateRegistration` when two entries resolve to one contract, or
///   the contract is already registered.
/// - Any other registration failure, unchanged.
pub async fn bootstrap(
    registry: &mut ServiceRegistry,
    catalog: &ServiceCatalog,
    manifest: &BootstrapManifest,
) -> Result<Vec<ContractId>, BootstrapError> {
    manifest.validate()?;

    let plan = resolve_plan(registry, catalog, manifest)?;
    let mut registered = Vec::with_capacity(plan.len());
    for (step, contract, implementation) in plan {
        registry
            .register_untyped(contract, implementation)
            .await
            .map_err(|source| {
                step_failed(step, contract.name(), implementation.name(), source)
            })?;
        info!(
            "event=bootstrap_step module=bootstrap status=ok step={} contract={} implementation={}",
            step,
            contract.name(),
            implementation.name()
        );
        registered.push(contract);
    }
    Ok(registered)
}

fn resolve_plan<'a>(
    registry: &ServiceRegistry,
    catalog: &'a ServiceCatalog,
    manifest: &BootstrapManifest,
) -> Result<Vec<(usize, ContractId, &'a Implementation)>, BootstrapError> {
    let mut seen = HashSet::new();
    let mut plan = Vec::with_capacity(manifest.services.len());
    for (step, entry) in manifest.services.iter().enumerate() {
        let contract_name = entry.contract.trim();
        let implementation_name = entry.implementation.trim();

        let implementation = catalog.get(implementation_name).ok_or_else(|| {
            step_failed(
                step,
                contract_name,
                implementation_name,
                RegistryError::missing_constructor(implementation_name),
            )
        })?;
        let contract = implementation.contract();
        if !contract.matches_name(contract_name) {
            return Err(step_failed(
                step,
                contract_name,
                implementation_name,
                RegistryError::NotImplemented {
                    implementation: implementation.name().to_string(),
                    contract: contract_name.to_string(),
                },
            ));
        }
        if !seen.insert(contract) || registry.get(&contract).is_some() {
            return Err(step_failed(
                step,
                contract_name,
                implementation_name,
                RegistryError::DuplicateRegistration {
                    contract: contract.name().to_string(),
                },
            ));
        }
        plan.push((step, contract, implementation));
    }
    Ok(plan)
}

fn step_failed(
    step: usize,
    contract: &str,
    implementation: &str,
    source: RegistryError,
) -> BootstrapError {
    error!(
        "event=bootstrap_step module=bootstrap status=error step={} contract={} implementation={} error={}",
        step, contract, implementation, source
    );
    BootstrapError::Registration {
        step,
        contract: contract.to_string(),
        source,
    }
}
