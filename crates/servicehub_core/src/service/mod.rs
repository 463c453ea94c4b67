//! Service contracts and implementation capabilities.
//!
//! # Responsibility
//! - Define the shape every service satisfies to live in the registry.
//! - Declare readiness hooks as explicit, opt-in capabilities.
//!
//! # Invariants
//! - Callers depend on a contract (`dyn Trait`), never on a concrete type.
//! - An implementation selects at most one setup hook.

pub mod contract;
pub mod setup;
