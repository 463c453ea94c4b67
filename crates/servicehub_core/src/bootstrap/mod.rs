//! Startup sequencing from a declarative manifest.
//!
//! # Responsibility
//! - Parse and validate the ordered list of contract/implementation pairs.
//! - Register each pair in order, awaiting every registration before the next.
//!
//! # Invariants
//! - The first failure aborts the sequence; earlier registrations stay.

pub mod manifest;
pub mod sequencer;
