//! Registered entries and the construct-then-ready sequence.

use crate::registry::error::{RegistryError, RegistryResult};
use crate::registry::key::{short_type_name, ContractId};
use crate::service::contract::{Implements, Service};
use crate::service::setup::SetupHook;
use log::debug;
use serde::Serialize;
use std::any::{type_name, Any};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Lifecycle of one registration.
///
/// Transitions only move forward; a failed hook aborts the registration and
/// nothing is stored, so stored entries are always `Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStage {
    Unregistered,
    Constructing,
    Initializing,
    Ready,
}

impl RegistrationStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unregistered => "unregistered",
            Self::Constructing => "constructing",
            Self::Initializing => "initializing",
            Self::Ready => "ready",
        }
    }
}

/// One owning instance stored under its contract key.
///
/// `instance` holds the `Arc<C>` view and `service` the `Arc<dyn Service>`
/// view of the same allocation.
pub(crate) struct RegisteredEntry {
    pub(crate) contract: ContractId,
    pub(crate) implementation: &'static str,
    pub(crate) instance: Box<dyn Any + Send + Sync>,
    pub(crate) service: Arc<dyn Service>,
}

impl RegisteredEntry {
    pub(crate) fn downcast<C: ?Sized + 'static>(&self) -> Option<&Arc<C>> {
        self.instance.downcast_ref::<Arc<C>>()
    }

    pub(crate) fn snapshot(&self) -> ServiceSnapshot {
        ServiceSnapshot {
            contract: self.contract.name().to_string(),
            name: self.service.name().to_string(),
            implementation: self.implementation.to_string(),
            stage: RegistrationStage::Ready,
            debug_fields: self.service.debug_fields(),
        }
    }
}

/// Inspection view of one registered entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceSnapshot {
    pub contract: String,
    pub name: String,
    pub implementation: String,
    pub stage: RegistrationStage,
    pub debug_fields: BTreeMap<String, String>,
}

/// Builds one instance of `I` and drives its selected setup hook.
///
/// Returns the typed contract view and the entry to store.
pub(crate) async fn build_ready<C, I>() -> RegistryResult<(Arc<C>, RegisteredEntry)>
where
    C: Service + ?Sized,
    I: Implements<C>,
{
    let contract = ContractId::of::<C>();
    let implementation = short_type_name(type_name::<I>());

    log_stage(&contract, implementation, RegistrationStage::Constructing);
    let mut instance = I::construct().map_err(|source| RegistryError::Construction {
        implementation: implementation.to_string(),
        source,
    })?;

    let hook = instance.setup_hook();
    let hook_kind = hook.as_str();
    if !matches!(hook, SetupHook::Ready) {
        log_stage(&contract, implementation, RegistrationStage::Initializing);
    }
    hook.run().await.map_err(|source| RegistryError::Setup {
        contract: contract.name().to_string(),
        implementation: implementation.to_string(),
        source,
    })?;
    log_stage(&contract, implementation, RegistrationStage::Ready);

    let instance = Arc::new(instance);
    let service: Arc<dyn Service> = instance.clone();
    let typed: Arc<C> = <I as Implements<C>>::upcast(instance);
    let entry = RegisteredEntry {
        contract,
        implementation,
        instance: Box::new(Arc::clone(&typed)),
        service,
    };
    debug!(
        "event=service_built module=registry contract={} implementation={} hook={}",
        contract.name(),
        implementation,
        hook_kind
    );
    Ok((typed, entry))
}

fn log_stage(contract: &ContractId, implementation: &str, stage: RegistrationStage) {
    debug!(
        "event=service_stage module=registry contract={} implementation={} stage={}",
        contract.name(),
        implementation,
        stage.as_str()
    );
}
