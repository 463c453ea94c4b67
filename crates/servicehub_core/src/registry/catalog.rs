//! Explicit side list of known implementations.
//!
//! # Responsibility
//! - Describe implementations as runtime values so callers that only hold
//!   names (manifests, inspectors) can register them.
//! - Replace runtime type scanning with registration-time declarations.
//!
//! # Invariants
//! - Implementation names are unique within one catalog.

use crate::registry::entry::{build_ready, RegisteredEntry};
use crate::registry::error::RegistryResult;
use crate::registry::key::{short_type_name, ContractId};
use crate::service::contract::{Implements, Service};
use std::any::type_name;
use std::future::Future;
use std::pin::Pin;

type BuildFuture = Pin<Box<dyn Future<Output = RegistryResult<RegisteredEntry>> + Send>>;

/// Runtime identity of one implementation bound to one contract.
#[derive(Clone)]
pub struct Implementation {
    name: &'static str,
    type_name: &'static str,
    contract: ContractId,
    build: fn() -> BuildFuture,
}

impl Implementation {
    /// Describes `I` as an implementation of contract `C`.
    pub fn of<C, I>() -> Self
    where
        C: Service + ?Sized,
        I: Implements<C>,
    {
        Self {
            name: short_type_name(type_name::<I>()),
            type_name: type_name::<I>(),
            contract: ContractId::of::<C>(),
            build: build_erased::<C, I>,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn contract(&self) -> ContractId {
        self.contract
    }

    pub(crate) fn build(&self) -> BuildFuture {
        (self.build)()
    }
}

impl std::fmt::Debug for Implementation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Implementation")
            .field("name", &self.name)
            .field("contract", &self.contract.name())
            .finish()
    }
}

fn build_erased<C, I>() -> BuildFuture
where
    C: Service + ?Sized,
    I: Implements<C>,
{
    Box::pin(async move {
        let (_, entry) = build_ready::<C, I>().await?;
        Ok(entry)
    })
}

/// Catalog registration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("implementation already cataloged: {0}")]
    DuplicateImplementation(String),
}

/// Ordered list of implementations known to the process.
#[derive(Debug, Default, Clone)]
pub struct ServiceCatalog {
    entries: Vec<Implementation>,
}

impl ServiceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one implementation descriptor.
    pub fn add(&mut self, implementation: Implementation) -> Result<(), CatalogError> {
        if self.get(implementation.name()).is_some() {
            return Err(CatalogError::DuplicateImplementation(
                implementation.name().to_string(),
            ));
        }
        self.entries.push(implementation);
        Ok(())
    }

    /// Shorthand for `add(Implementation::of::<C, I>())`.
    pub fn with<C, I>(mut self) -> Result<Self, CatalogError>
    where
        C: Service + ?Sized,
        I: Implements<C>,
    {
        self.add(Implementation::of::<C, I>())?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up one implementation by short or fully-qualified name.
    pub fn get(&self, name: &str) -> Option<&Implementation> {
        let normalized = name.trim();
        if normalized.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|entry| entry.name == normalized || entry.type_name == normalized)
    }

    pub fn implementations(&self) -> impl Iterator<Item = &Implementation> {
        self.entries.iter()
    }

    /// Lists implementations declared for one contract.
    pub fn for_contract(&self, contract: &ContractId) -> Vec<&Implementation> {
        self.entries
            .iter()
            .filter(|entry| entry.contract == *contract)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{CatalogError, Implementation, ServiceCatalog};
    use crate::registry::key::ContractId;
    use crate::service::contract::{Provider, Service};
    use crate::service::setup::BoxError;

    trait Storage: Service {}

    struct MemoryStorage;

    impl Service for MemoryStorage {
        fn name(&self) -> &str {
            "MemoryStorage"
        }
    }

    impl Provider for MemoryStorage {
        fn construct() -> Result<Self, BoxError> {
            Ok(Self)
        }
    }

    impl Storage for MemoryStorage {}

    struct DiskStorage;

    impl Service for DiskStorage {
        fn name(&self) -> &str {
            "DiskStorage"
        }
    }

    impl Provider for DiskStorage {
        fn construct() -> Result<Self, BoxError> {
            Ok(Self)
        }
    }

    impl Storage for DiskStorage {}

    crate::implements!(MemoryStorage: dyn Storage);
    crate::implements!(DiskStorage: dyn Storage);

    #[test]
    fn describes_implementation_and_contract() {
        let implementation = Implementation::of::<dyn Storage, MemoryStorage>();
        assert_eq!(implementation.name(), "MemoryStorage");
        assert_eq!(implementation.contract(), ContractId::of::<dyn Storage>());
        assert!(implementation.type_name().ends_with("MemoryStorage"));
    }

    #[test]
    fn rejects_duplicate_implementation_name() {
        let mut catalog = ServiceCatalog::new();
        catalog
            .add(Implementation::of::<dyn Storage, MemoryStorage>())
            .expect("first add should succeed");
        let err = catalog
            .add(Implementation::of::<dyn Storage, MemoryStorage>())
            .expect_err("duplicate add must fail");
        assert_eq!(
            err,
            CatalogError::DuplicateImplementation("MemoryStorage".to_string())
        );
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn lists_implementations_by_contract_in_declaration_order() {
        let catalog = ServiceCatalog::new()
            .with::<dyn Storage, MemoryStorage>()
            .and_then(|catalog| catalog.with::<dyn Storage, DiskStorage>())
            .expect("catalog should build");

        let names: Vec<&str> = catalog
            .for_contract(&ContractId::of::<dyn Storage>())
            .into_iter()
            .map(|implementation| implementation.name())
            .collect();
        assert_eq!(names, vec!["MemoryStorage", "DiskStorage"]);
        assert!(catalog.get("  DiskStorage ").is_some());
        assert!(catalog.get("   ").is_none());
    }

    #[test]
    fn implementations_iterates_every_entry_in_declaration_order() {
        let mut catalog = ServiceCatalog::new();
        assert!(catalog.is_empty());
        catalog
            .add(Implementation::of::<dyn Storage, DiskStorage>())
            .expect("disk storage should be cataloged");
        catalog
            .add(Implementation::of::<dyn Storage, MemoryStorage>())
            .expect("memory storage should be cataloged");

        let listed: Vec<(&str, &str)> = catalog
            .implementations()
            .map(|implementation| (implementation.name(), implementation.contract().name()))
            .collect();
        assert_eq!(
            listed,
            vec![("DiskStorage", "Storage"), ("MemoryStorage", "Storage")]
        );
    }
}
