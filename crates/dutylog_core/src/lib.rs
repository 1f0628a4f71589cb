//! Core domain logic for DutyLog, the school duty record book.
//! This crate is the single source of truth for record invariants.

pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod roster;
pub mod service;
pub mod storage;

pub use config::StoreConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::date_key::{DateKey, DateKeyError};
pub use model::record::{DayEntry, DayRecord, RecordBook, StatusList, StudentIdentity};
pub use model::status::{StatusLabel, UnknownStatusError};
pub use repo::record_repo::{JsonRecordRepository, RecordRepository, StoreError, StoreResult};
pub use roster::{format_identity, Roster, SchoolClass};
pub use service::record_service::{RecordService, ServiceError, ServiceResult, ValidationPolicy};
pub use storage::{load_records, save_records, StorageError, StorageResult};

/// Opens the records document named by `config` and wraps it in a service
/// over the built-in roster.
///
/// # Errors
/// - Returns `StoreError` when the document cannot be read or is corrupt.
pub fn open_service(config: &StoreConfig) -> StoreResult<RecordService<JsonRecordRepository>> {
    let repo = JsonRecordRepository::open(config.records_path())?;
    Ok(RecordService::new(repo, Roster::builtin()))
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
