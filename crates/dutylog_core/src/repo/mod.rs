//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the record store contract used by services.
//! - Keep document storage details out of service/business orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NoStudentSelected`,
//!   `RecordNotFound`) in addition to storage errors.

pub mod record_repo;
