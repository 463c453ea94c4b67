//! Service registry.
//!
//! # Responsibility
//! - Map each contract to exactly one ready instance.
//! - Sequence construction and setup during the registration phase.
//! - Resolve one to four contracts into a single callback invocation.
//!
//! # Invariants
//! - At most one entry per contract key; duplicates fail, never overwrite.
//! - A failed constructor or setup hook leaves the registry unchanged.
//! - Entries are never removed.

pub mod catalog;
pub mod entry;
pub mod error;
pub mod key;
pub mod process;
pub mod service_registry;
