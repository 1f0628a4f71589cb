//! Record repository contracts and JSON-file implementation.
//!
//! # Responsibility
//! - Own the in-memory record book and its durable document.
//! - Apply mark/edit/delete with the book's first-match semantics.
//!
//! # Invariants
//! - Every mutation is persisted before it becomes visible in memory; a
//!   failed save leaves the in-memory book at its pre-mutation value.
//! - Reads never write.
//! - Identities and statuses are opaque strings at this layer.

use crate::model::date_key::DateKey;
use crate::model::record::{DayEntry, DayRecord, RecordBook};
use crate::storage::{load_records, save_records, StorageError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub type StoreResult<T> = Result<T, StoreError>;

/// Repository error for record mutations and persistence.
#[derive(Debug)]
pub enum StoreError {
    /// Mutation attempted without a student identity.
    NoStudentSelected,
    /// Edit/delete target does not exist.
    RecordNotFound {
        date: DateKey,
        identity: String,
        status: String,
    },
    Storage(StorageError),
}

impl StoreError {
    /// Whether the error means the on-disk document could not be parsed.
    pub fn is_corrupt_storage(&self) -> bool {
        matches!(self, Self::Storage(StorageError::Corrupt { .. }))
    }

    /// Whether the error means a mutation was not durably committed.
    pub fn is_write_failure(&self) -> bool {
        matches!(self, Self::Storage(StorageError::Write { .. }))
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoStudentSelected => write!(f, "no student selected"),
            Self::RecordNotFound {
                date,
                identity,
                status,
            } => write!(
                f,
                "record not found: `{status}` for `{identity}` on {date}"
            ),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::NoStudentSelected | Self::RecordNotFound { .. } => None,
        }
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Repository interface for date-partitioned status records.
///
/// `occurrence` selects among equal statuses of one student on one day;
/// `0` is the first match in marking order.
pub trait RecordRepository {
    fn mark_status(&mut self, date: &DateKey, identity: &str, status: &str) -> StoreResult<()>;
    fn edit_status_at(
        &mut self,
        date: &DateKey,
        identity: &str,
        old_status: &str,
        occurrence: usize,
        new_status: &str,
    ) -> StoreResult<()>;
    fn delete_status_at(
        &mut self,
        date: &DateKey,
        identity: &str,
        status: &str,
        occurrence: usize,
    ) -> StoreResult<()>;
    fn get_day(&self, date: &DateKey) -> DayRecord;
    fn day_entries(&self, date: &DateKey) -> Vec<DayEntry>;
    fn dates(&self) -> Vec<DateKey>;
    fn save(&self) -> StoreResult<()>;

    /// Replaces the first occurrence of `old_status`.
    fn edit_status(
        &mut self,
        date: &DateKey,
        identity: &str,
        old_status: &str,
        new_status: &str,
    ) -> StoreResult<()> {
        self.edit_status_at(date, identity, old_status, 0, new_status)
    }

    /// Removes the first occurrence of `status`.
    fn delete_status(&mut self, date: &DateKey, identity: &str, status: &str) -> StoreResult<()> {
        self.delete_status_at(date, identity, status, 0)
    }
}

/// Record repository backed by one JSON document on disk.
pub struct JsonRecordRepository {
    path: PathBuf,
    book: RecordBook,
}

impl JsonRecordRepository {
    /// Loads the document at `path`, starting empty when it does not exist.
    ///
    /// # Errors
    /// - `StoreError::Storage(StorageError::Corrupt)` when the document cannot
    ///   be parsed. This is fatal for startup; nothing is recovered.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let book = load_records(&path)?;
        Ok(Self { path, book })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read-only view of the whole book.
    pub fn book(&self) -> &RecordBook {
        &self.book
    }

    /// Runs `mutate` on a copy of the book, persists the copy, then commits.
    fn commit<F>(&mut self, event: &str, date: &DateKey, mutate: F) -> StoreResult<()>
    where
        F: FnOnce(&mut RecordBook) -> StoreResult<()>,
    {
        let mut next = self.book.clone();
        if let Err(err) = mutate(&mut next) {
            info!("event={} module=repo status=rejected date={}", event, date);
            return Err(err);
        }

        if let Err(err) = save_records(&self.path, &next) {
            warn!(
                "event={} module=repo status=error error_code=not_committed date={}",
                event, date
            );
            return Err(err.into());
        }

        self.book = next;
        info!(
            "event={} module=repo status=ok date={} day_marks={}",
            event,
            date,
            self.book
                .day(date)
                .map(|day| day.values().map(Vec::len).sum::<usize>())
                .unwrap_or(0)
        );
        Ok(())
    }
}

impl RecordRepository for JsonRecordRepository {
    fn mark_status(&mut self, date: &DateKey, identity: &str, status: &str) -> StoreResult<()> {
        if identity.trim().is_empty() {
            return Err(StoreError::NoStudentSelected);
        }

        self.commit("record_mark", date, |book| {
            book.append(date, identity, status);
            Ok(())
        })
    }

    fn edit_status_at(
        &mut self,
        date: &DateKey,
        identity: &str,
        old_status: &str,
        occurrence: usize,
        new_status: &str,
    ) -> StoreResult<()> {
        self.commit("record_edit", date, |book| {
            if book.replace(date, identity, old_status, occurrence, new_status) {
                Ok(())
            } else {
                Err(not_found(date, identity, old_status))
            }
        })
    }

    fn delete_status_at(
        &mut self,
        date: &DateKey,
        identity: &str,
        status: &str,
        occurrence: usize,
    ) -> StoreResult<()> {
        self.commit("record_delete", date, |book| {
            if book.remove(date, identity, status, occurrence) {
                Ok(())
            } else {
                Err(not_found(date, identity, status))
            }
        })
    }

    fn get_day(&self, date: &DateKey) -> DayRecord {
        self.book.day(date).cloned().unwrap_or_default()
    }

    fn day_entries(&self, date: &DateKey) -> Vec<DayEntry> {
        self.book.entries(date)
    }

    fn dates(&self) -> Vec<DateKey> {
        self.book.dates().cloned().collect()
    }

    fn save(&self) -> StoreResult<()> {
        save_records(&self.path, &self.book)?;
        Ok(())
    }
}

fn not_found(date: &DateKey, identity: &str, status: &str) -> StoreError {
    StoreError::RecordNotFound {
        date: date.clone(),
        identity: identity.to_string(),
        status: status.to_string(),
    }
}
