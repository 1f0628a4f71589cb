//! Record use-case service.
//!
//! # Responsibility
//! - Provide typed mark/edit/delete/query entry points for front ends.
//! - Validate new marks against the status vocabulary and the roster.
//! - Resolve free-form student input to one roster identity.
//!
//! # Invariants
//! - Service APIs never bypass repository persistence contracts.
//! - New statuses always come from `StatusLabel`; free text cannot be
//!   introduced through this layer.
//! - Statuses being edited or deleted are not validated, so legacy free-text
//!   entries stay removable.

use crate::model::date_key::{DateKey, DateKeyError};
use crate::model::record::{DayEntry, DayRecord};
use crate::model::status::{StatusLabel, UnknownStatusError};
use crate::repo::record_repo::{RecordRepository, StoreError};
use crate::roster::Roster;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// How strictly new marks are checked against the roster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationPolicy {
    /// Identities must be listed in the roster.
    #[default]
    Strict,
    /// Any non-empty identity is accepted.
    Permissive,
}

/// Service error for record use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Status text does not name a known label.
    InvalidStatus(String),
    /// Identity is not on the roster.
    UnknownStudent(String),
    /// Student query matched more than one identity.
    AmbiguousStudent { query: String, matches: usize },
    InvalidDate(DateKeyError),
    /// Repository or storage failure.
    Store(StoreError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidStatus(value) => write!(f, "invalid status: `{value}`"),
            Self::UnknownStudent(value) => write!(f, "student not on roster: `{value}`"),
            Self::AmbiguousStudent { query, matches } => write!(
                f,
                "student query `{query}` matches {matches} students; be more specific"
            ),
            Self::InvalidDate(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidDate(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<DateKeyError> for ServiceError {
    fn from(value: DateKeyError) -> Self {
        Self::InvalidDate(value)
    }
}

impl From<UnknownStatusError> for ServiceError {
    fn from(value: UnknownStatusError) -> Self {
        Self::InvalidStatus(value.input)
    }
}

/// Use-case service wrapping a record repository and the roster.
pub struct RecordService<R: RecordRepository> {
    repo: R,
    roster: Roster,
    policy: ValidationPolicy,
}

impl<R: RecordRepository> RecordService<R> {
    /// Creates a service with strict roster validation.
    pub fn new(repo: R, roster: Roster) -> Self {
        Self {
            repo,
            roster,
            policy: ValidationPolicy::Strict,
        }
    }

    /// Replaces the validation policy.
    pub fn with_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn policy(&self) -> ValidationPolicy {
        self.policy
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Parses a `YYYY-MM-DD` date.
    pub fn parse_date(value: &str) -> ServiceResult<DateKey> {
        Ok(DateKey::parse(value)?)
    }

    /// Parses a status label or its ASCII code.
    pub fn parse_status(value: &str) -> ServiceResult<StatusLabel> {
        Ok(value.parse::<StatusLabel>()?)
    }

    /// Resolves student input to exactly one roster identity.
    ///
    /// # Contract
    /// - Blank input is `NoStudentSelected`.
    /// - An exact identity wins even if it is also a substring of others.
    /// - Otherwise the roster search must yield exactly one identity.
    pub fn resolve_student(&self, query: &str) -> ServiceResult<String> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(StoreError::NoStudentSelected.into());
        }
        if self.roster.contains(trimmed) {
            return Ok(trimmed.to_string());
        }

        let matches = self.roster.search(trimmed);
        match matches.as_slice() {
            [single] => Ok((*single).to_string()),
            [] if self.policy == ValidationPolicy::Permissive => Ok(trimmed.to_string()),
            [] => Err(ServiceError::UnknownStudent(trimmed.to_string())),
            many => Err(ServiceError::AmbiguousStudent {
                query: trimmed.to_string(),
                matches: many.len(),
            }),
        }
    }

    /// Appends `status` for the student on `date`.
    ///
    /// # Errors
    /// - `Store(NoStudentSelected)` for a blank identity.
    /// - `UnknownStudent` when strict and the identity is not on the roster.
    /// - `Store(Storage(Write))` when the mark could not be persisted.
    pub fn mark(&mut self, date: &DateKey, identity: &str, status: StatusLabel) -> ServiceResult<()> {
        if identity.trim().is_empty() {
            return Err(StoreError::NoStudentSelected.into());
        }
        self.check_identity(identity)?;
        self.repo.mark_status(date, identity, status.label())?;
        Ok(())
    }

    /// Replaces the first `old_status` of the student on `date` with `new_status`.
    pub fn edit(
        &mut self,
        date: &DateKey,
        identity: &str,
        old_status: &str,
        new_status: StatusLabel,
    ) -> ServiceResult<()> {
        self.edit_at(date, identity, old_status, 0, new_status)
    }

    /// Replaces the `occurrence`-th `old_status` of the student on `date`.
    pub fn edit_at(
        &mut self,
        date: &DateKey,
        identity: &str,
        old_status: &str,
        occurrence: usize,
        new_status: StatusLabel,
    ) -> ServiceResult<()> {
        self.repo
            .edit_status_at(date, identity, old_status, occurrence, new_status.label())?;
        Ok(())
    }

    /// Removes the first `status` of the student on `date`.
    pub fn delete(&mut self, date: &DateKey, identity: &str, status: &str) -> ServiceResult<()> {
        self.delete_at(date, identity, status, 0)
    }

    /// Removes the `occurrence`-th `status` of the student on `date`.
    pub fn delete_at(
        &mut self,
        date: &DateKey,
        identity: &str,
        status: &str,
        occurrence: usize,
    ) -> ServiceResult<()> {
        self.repo
            .delete_status_at(date, identity, status, occurrence)?;
        Ok(())
    }

    /// Edits exactly the row a front end rendered.
    pub fn edit_entry(&mut self, entry: &DayEntry, new_status: StatusLabel) -> ServiceResult<()> {
        self.edit_at(
            &entry.date,
            &entry.identity,
            &entry.status,
            entry.occurrence,
            new_status,
        )
    }

    /// Deletes exactly the row a front end rendered.
    pub fn delete_entry(&mut self, entry: &DayEntry) -> ServiceResult<()> {
        self.delete_at(&entry.date, &entry.identity, &entry.status, entry.occurrence)
    }

    /// Records of one day; empty when nothing was marked.
    pub fn day(&self, date: &DateKey) -> DayRecord {
        self.repo.get_day(date)
    }

    /// Rows of one day in render order.
    pub fn day_entries(&self, date: &DateKey) -> Vec<DayEntry> {
        self.repo.day_entries(date)
    }

    /// Dates holding at least one record, ascending.
    pub fn dates(&self) -> Vec<DateKey> {
        self.repo.dates()
    }

    fn check_identity(&self, identity: &str) -> ServiceResult<()> {
        if self.policy == ValidationPolicy::Strict && !self.roster.contains(identity) {
            info!("event=record_mark module=service status=rejected reason=unknown_student");
            return Err(ServiceError::UnknownStudent(identity.to_string()));
        }
        Ok(())
    }
}
