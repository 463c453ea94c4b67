//! Contract-side traits.

use crate::service::setup::{BoxError, SetupHook};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Capability every registered service exposes.
///
/// Contracts are traits that extend `Service` and are addressed as
/// `dyn Trait` when registering or resolving.
pub trait Service: Send + Sync + 'static {
    /// Display identity used for diagnostics only; not a lookup key.
    fn name(&self) -> &str;

    /// Key/value details shown by debug front-ends for this service.
    fn debug_fields(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }
}

/// Implementation-side contract: how the registry builds and readies a type.
pub trait Provider: Service + Sized {
    /// Zero-argument constructor.
    fn construct() -> Result<Self, BoxError>;

    /// Declares which readiness capability the registry should drive.
    ///
    /// Defaults to `SetupHook::Ready` (usable right after construction).
    fn setup_hook(&mut self) -> SetupHook<'_> {
        SetupHook::Ready
    }
}

/// Links a concrete provider to one contract it satisfies.
///
/// Usually written through [`implements!`](crate::implements).
pub trait Implements<C: ?Sized>: Provider {
    fn upcast(self: Arc<Self>) -> Arc<C>;
}

/// Declares that a concrete provider satisfies one or more contracts.
///
/// ```ignore
/// implements!(ConsoleLogger: dyn Logger);
/// implements!(SystemClock: dyn Clock, dyn TimeSource);
/// ```
#[macro_export]
macro_rules! implements {
    ($implementation:ty: $($contract:ty),+ $(,)?) => {
        $(
            impl $crate::Implements<$contract> for $implementation {
                fn upcast(self: ::std::sync::Arc<Self>) -> ::std::sync::Arc<$contract> {
                    self
                }
            }
        )+
    };
}
