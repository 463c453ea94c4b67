//! Contract-keyed singleton store.

use crate::registry::catalog::Implementation;
use crate::registry::entry::{build_ready, RegisteredEntry, ServiceSnapshot};
use crate::registry::error::{RegistryError, RegistryResult};
use crate::registry::key::ContractId;
use crate::service::contract::{Implements, Service};
use log::info;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

/// Process-scoped mapping from contract to its one ready instance.
///
/// Mutation takes `&mut self`, so registrations are sequenced by the single
/// flow that owns the registry during startup. Resolution takes `&self` and
/// never suspends.
#[derive(Default)]
pub struct ServiceRegistry {
    entries: Vec<RegisteredEntry>,
    index: HashMap<TypeId, usize>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs `I`, readies it, and stores it under contract `C`.
    ///
    /// Returns the stored instance so startup code can chain further setup.
    ///
    /// # Errors
    /// - `DuplicateRegistration` when `C` already has an entry; the existing
    ///   entry is untouched and `I` is never constructed.
    /// - `Construction` when the constructor fails.
    /// - `Setup` when the selected setup hook fails; nothing is stored.
    pub async fn register<C, I>(&mut self) -> RegistryResult<Arc<C>>
    where
        C: Service + ?Sized,
        I: Implements<C>,
    {
        let contract = ContractId::of::<C>();
        self.ensure_vacant(&contract)?;

        let (typed, entry) = build_ready::<C, I>().await?;
        self.insert(entry)?;
        Ok(typed)
    }

    /// Untyped counterpart of [`register`](Self::register) for callers that
    /// hold the contract and implementation as runtime values.
    ///
    /// # Errors
    /// - `NotImplemented` when `implementation` targets another contract.
    /// - Otherwise the same failures as `register`.
    pub async fn register_untyped(
        &mut self,
        contract: ContractId,
        implementation: &Implementation,
    ) -> RegistryResult<Arc<dyn Service>> {
        if implementation.contract() != contract {
            return Err(RegistryError::NotImplemented {
                implementation: implementation.name().to_string(),
                contract: contract.name().to_string(),
            });
        }
        self.ensure_vacant(&contract)?;

        let entry = implementation.build().await?;
        let service = Arc::clone(&entry.service);
        self.insert(entry)?;
        Ok(service)
    }

    /// Returns a shared handle to the instance registered for `C`.
    pub fn resolve<C>(&self) -> RegistryResult<Arc<C>>
    where
        C: Service + ?Sized,
    {
        let contract = ContractId::of::<C>();
        self.entry(&contract)
            .and_then(|entry| entry.downcast::<C>())
            .cloned()
            .ok_or_else(|| RegistryError::not_found(contract.name()))
    }

    /// Invokes `callback` with the instance registered for `C`.
    pub fn use_service<C, R>(&self, callback: impl FnOnce(&C) -> R) -> RegistryResult<R>
    where
        C: Service + ?Sized,
    {
        let service = self.resolve::<C>()?;
        Ok(callback(&*service))
    }

    /// Untyped counterpart of [`use_service`](Self::use_service).
    pub fn use_service_by_id<R>(
        &self,
        contract: &ContractId,
        callback: impl FnOnce(&dyn Service) -> R,
    ) -> RegistryResult<R> {
        let service = self
            .get(contract)
            .ok_or_else(|| RegistryError::not_found(contract.name()))?;
        Ok(callback(service.as_ref()))
    }

    /// Whether `C` has an entry.
    pub fn contains<C: Service + ?Sized>(&self) -> bool {
        self.index.contains_key(&TypeId::of::<C>())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered contract identities in registration order.
    pub fn contracts(&self) -> impl Iterator<Item = ContractId> + '_ {
        self.entries.iter().map(|entry| entry.contract)
    }

    /// Looks up one instance by contract identity.
    pub fn get(&self, contract: &ContractId) -> Option<Arc<dyn Service>> {
        self.entry(contract).map(|entry| Arc::clone(&entry.service))
    }

    /// Inspection view of every entry in registration order.
    pub fn snapshot(&self) -> Vec<ServiceSnapshot> {
        self.entries.iter().map(RegisteredEntry::snapshot).collect()
    }

    fn entry(&self, contract: &ContractId) -> Option<&RegisteredEntry> {
        self.index
            .get(&contract.type_id())
            .and_then(|position| self.entries.get(*position))
    }

    fn ensure_vacant(&self, contract: &ContractId) -> RegistryResult<()> {
        if self.index.contains_key(&contract.type_id()) {
            return Err(RegistryError::DuplicateRegistration {
                contract: contract.name().to_string(),
            });
        }
        Ok(())
    }

    fn insert(&mut self, entry: RegisteredEntry) -> RegistryResult<()> {
        let contract = entry.contract;
        self.ensure_vacant(&contract)?;

        info!(
            "event=service_registered module=registry contract={} implementation={} name={}",
            contract.name(),
            entry.implementation,
            entry.service.name()
        );
        self.index.insert(contract.type_id(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }
}

macro_rules! use_services_arity {
    ($(#[$doc:meta])* $method:ident => $($contract:ident : $binding:ident),+) => {
        impl ServiceRegistry {
            $(#[$doc])*
            pub fn $method<$($contract,)+ R>(
                &self,
                callback: impl FnOnce($(&$contract),+) -> R,
            ) -> RegistryResult<R>
            where
                $($contract: Service + ?Sized,)+
            {
                $(let $binding = self.resolve::<$contract>()?;)+
                Ok(callback($(&*$binding),+))
            }
        }
    };
}

use_services_arity!(
    /// Resolves two contracts left to right, then invokes `callback` once.
    ///
    /// Stops at the first unresolved contract without invoking `callback`.
    use_services2 => A: first, B: second
);
use_services_arity!(
    /// Three-contract form of [`use_services2`](Self::use_services2).
    use_services3 => A: first, B: second, C: third
);
use_services_arity!(
    /// Four-contract form of [`use_services2`](Self::use_services2).
    use_services4 => A: first, B: second, C: third, D: fourth
);

#[cfg(test)]
mod tests {
    use super::ServiceRegistry;
    use crate::registry::error::RegistryError;
    use crate::registry::key::ContractId;
    use crate::service::contract::{Provider, Service};
    use crate::service::setup::{BoxError, SetupHook, SyncSetup};
    use std::sync::atomic::{AtomicUsize, Ordering};

    trait Greeter: Service {
        fn greet(&self, who: &str) -> String;
    }

    trait Counter: Service {
        fn value(&self) -> usize;
    }

    struct PoliteGreeter;

    impl Service for PoliteGreeter {
        fn name(&self) -> &str {
            "PoliteGreeter"
        }
    }

    impl Provider for PoliteGreeter {
        fn construct() -> Result<Self, BoxError> {
            Ok(Self)
        }
    }

    impl Greeter for PoliteGreeter {
        fn greet(&self, who: &str) -> String {
            format!("hello, {who}")
        }
    }

    static COUNTER_SETUPS: AtomicUsize = AtomicUsize::new(0);

    struct SetupCounter {
        value: usize,
    }

    impl Service for SetupCounter {
        fn name(&self) -> &str {
            "SetupCounter"
        }
    }

    impl Provider for SetupCounter {
        fn construct() -> Result<Self, BoxError> {
            Ok(Self { value: 0 })
        }

        fn setup_hook(&mut self) -> SetupHook<'_> {
            SetupHook::Sync(self)
        }
    }

    impl SyncSetup for SetupCounter {
        fn setup(&mut self) -> Result<(), BoxError> {
            self.value = COUNTER_SETUPS.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(())
        }
    }

    impl Counter for SetupCounter {
        fn value(&self) -> usize {
            self.value
        }
    }

    crate::implements!(PoliteGreeter: dyn Greeter);
    crate::implements!(SetupCounter: dyn Counter);

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime should build")
            .block_on(future)
    }

    #[test]
    fn resolves_registered_contract_through_callback() {
        let mut registry = ServiceRegistry::new();
        block_on(registry.register::<dyn Greeter, PoliteGreeter>())
            .expect("greeter should register");

        let greeting = registry
            .use_service::<dyn Greeter, _>(|greeter| greeter.greet("core"))
            .expect("greeter should resolve");
        assert_eq!(greeting, "hello, core");
        assert!(registry.contains::<dyn Greeter>());
        assert!(!registry.contains::<dyn Counter>());
    }

    #[test]
    fn duplicate_registration_never_constructs_second_instance() {
        static CONSTRUCTIONS: AtomicUsize = AtomicUsize::new(0);

        trait Probe: Service {}

        struct CountedProbe;

        impl Service for CountedProbe {
            fn name(&self) -> &str {
                "CountedProbe"
            }
        }

        impl Provider for CountedProbe {
            fn construct() -> Result<Self, BoxError> {
                CONSTRUCTIONS.fetch_add(1, Ordering::SeqCst);
                Ok(Self)
            }
        }

        impl Probe for CountedProbe {}

        crate::implements!(CountedProbe: dyn Probe);

        let mut registry = ServiceRegistry::new();
        let first = block_on(registry.register::<dyn Probe, CountedProbe>())
            .expect("first registration should succeed");

        let err = block_on(registry.register::<dyn Probe, CountedProbe>())
            .err()
            .expect("duplicate registration must fail");
        assert!(matches!(err, RegistryError::DuplicateRegistration { .. }));
        assert_eq!(CONSTRUCTIONS.load(Ordering::SeqCst), 1);
        assert_eq!(registry.len(), 1);

        let resolved = registry
            .resolve::<dyn Probe>()
            .expect("first instance should stay resolvable");
        assert!(std::sync::Arc::ptr_eq(&first, &resolved));
    }

    #[test]
    fn unknown_contract_reports_short_name() {
        let registry = ServiceRegistry::new();
        let err = registry
            .use_service::<dyn Greeter, _>(|_| ())
            .expect_err("unregistered contract must fail");
        assert_eq!(
            err.to_string(),
            "`Greeter` is not implemented or not initialized"
        );

        let err = registry
            .use_service_by_id(&ContractId::of::<dyn Counter>(), |_| ())
            .expect_err("unregistered contract must fail by id");
        assert!(matches!(err, RegistryError::ServiceNotFound { .. }));
    }

    #[test]
    fn arity_four_resolves_in_order() {
        let mut registry = ServiceRegistry::new();
        block_on(registry.register::<dyn Greeter, PoliteGreeter>())
            .expect("greeter should register");
        block_on(registry.register::<dyn Counter, SetupCounter>())
            .expect("counter should register");

        let names = registry
            .use_services4::<dyn Greeter, dyn Counter, dyn Greeter, dyn Counter, _>(
                |a, b, c, d| {
                    [a.name(), b.name(), c.name(), d.name()]
                        .map(str::to_string)
                        .to_vec()
                },
            )
            .expect("all contracts should resolve");
        assert_eq!(
            names,
            vec!["PoliteGreeter", "SetupCounter", "PoliteGreeter", "SetupCounter"]
        );
    }
}
