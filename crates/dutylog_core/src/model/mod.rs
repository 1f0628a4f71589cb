//! Domain model for date-partitioned status records.
//!
//! # Responsibility
//! - Define the record book, its keys and the fixed status vocabulary.
//! - Keep mutation semantics (append, first-match edit/remove, cascade
//!   cleanup) in one place, independent of storage.
//!
//! # Invariants
//! - Dates and identities never map to empty containers.

pub mod date_key;
pub mod record;
pub mod status;
