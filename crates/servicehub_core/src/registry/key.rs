//! Structural contract identity.

use std::any::{type_name, TypeId};
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

/// Runtime identity of a contract.
///
/// Keyed by `TypeId`, so two contracts that share a short name in different
/// modules never collide. The type name is kept for display only.
#[derive(Debug, Clone, Copy)]
pub struct ContractId {
    type_id: TypeId,
    type_name: &'static str,
}

impl ContractId {
    pub fn of<C: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<C>(),
            type_name: type_name::<C>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Fully-qualified type name, e.g. `dyn app::services::Logger`.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Short display name, e.g. `Logger`.
    pub fn name(&self) -> &'static str {
        short_type_name(self.type_name)
    }

    /// Matches either the short or the fully-qualified name.
    pub fn matches_name(&self, value: &str) -> bool {
        let normalized = value.trim();
        if normalized.is_empty() {
            return false;
        }
        normalized == self.name()
            || normalized == self.type_name
            || normalized == self.type_name.trim_start_matches("dyn ")
    }
}

impl PartialEq for ContractId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ContractId {}

impl Hash for ContractId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl Display for ContractId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Strips `dyn `, generic arguments and module path from a type name.
pub(crate) fn short_type_name(full: &'static str) -> &'static str {
    let base = full.trim_start_matches("dyn ");
    let base = match base.find('<') {
        Some(index) => &base[..index],
        None => base,
    };
    let base = base.split(" + ").next().unwrap_or(base);
    match base.rfind("::") {
        Some(index) => &base[index + 2..],
        None => base,
    }
}

#[cfg(test)]
mod tests {
    use super::{short_type_name, ContractId};

    mod billing {
        pub trait Ledger {}
    }

    mod audit {
        pub trait Ledger {}
    }

    #[test]
    fn short_name_strips_dyn_and_path() {
        assert_eq!(short_type_name("dyn app::services::Logger"), "Logger");
        assert_eq!(short_type_name("app::Cache<u32>"), "Cache");
        assert_eq!(short_type_name("dyn app::Clock + Send"), "Clock");
        assert_eq!(short_type_name("Plain"), "Plain");
    }

    #[test]
    fn same_short_name_in_different_modules_does_not_collide() {
        let billing = ContractId::of::<dyn billing::Ledger>();
        let audit = ContractId::of::<dyn audit::Ledger>();

        assert_eq!(billing.name(), audit.name());
        assert_ne!(billing, audit);
    }

    #[test]
    fn matches_short_and_qualified_names() {
        let id = ContractId::of::<dyn billing::Ledger>();
        assert!(id.matches_name("Ledger"));
        assert!(id.matches_name(" Ledger "));
        assert!(id.matches_name(id.type_name()));
        assert!(!id.matches_name("Journal"));
        assert!(!id.matches_name("   "));
    }
}
