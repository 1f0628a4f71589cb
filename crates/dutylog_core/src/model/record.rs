//! Date-partitioned record book.
//!
//! # Responsibility
//! - Hold every status mark, keyed by date and then by student identity.
//! - Implement append / first-match replace / first-match remove semantics.
//!
//! # Invariants
//! - No date maps to an empty day record.
//! - No identity maps to an empty status list.
//! - Status lists keep marking order and may contain duplicates.
//!
//! # See also
//! - `repo::record_repo` for persistence around these mutations.

use crate::model::date_key::DateKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opaque `"<full name> (<class>)"` string produced by the roster.
pub type StudentIdentity = String;

/// Ordered statuses of one student on one day.
pub type StatusList = Vec<String>;

/// All records of one day keyed by student identity.
pub type DayRecord = BTreeMap<StudentIdentity, StatusList>;

/// One rendered row of a day: a single status occurrence of one student.
///
/// `occurrence` is the 0-based index of this status among equal statuses of
/// the same student that day, so two identical marks stay addressable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayEntry {
    pub date: DateKey,
    pub identity: StudentIdentity,
    pub status: String,
    pub occurrence: usize,
}

/// Full store state, serialized as the records document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordBook {
    days: BTreeMap<DateKey, DayRecord>,
}

impl RecordBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the book holds no records at all.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Returns the records of `date`, if any exist.
    pub fn day(&self, date: &DateKey) -> Option<&DayRecord> {
        self.days.get(date)
    }

    /// Dates that hold at least one record, ascending.
    pub fn dates(&self) -> impl Iterator<Item = &DateKey> {
        self.days.keys()
    }

    /// Total number of status marks across all dates.
    pub fn mark_count(&self) -> usize {
        self.days
            .values()
            .flat_map(|day| day.values())
            .map(Vec::len)
            .sum()
    }

    /// Flattens the day into rows: identities in key order, statuses in
    /// marking order.
    pub fn entries(&self, date: &DateKey) -> Vec<DayEntry> {
        let Some(day) = self.days.get(date) else {
            return Vec::new();
        };

        let mut entries = Vec::new();
        for (identity, statuses) in day {
            for (index, status) in statuses.iter().enumerate() {
                let occurrence = statuses[..index]
                    .iter()
                    .filter(|earlier| *earlier == status)
                    .count();
                entries.push(DayEntry {
                    date: date.clone(),
                    identity: identity.clone(),
                    status: status.clone(),
                    occurrence,
                });
            }
        }
        entries
    }

    /// Appends `status` for `(date, identity)`, creating containers as needed.
    ///
    /// Returns the new length of the student's status list.
    pub fn append(&mut self, date: &DateKey, identity: &str, status: &str) -> usize {
        let statuses = self
            .days
            .entry(date.clone())
            .or_default()
            .entry(identity.to_string())
            .or_default();
        statuses.push(status.to_string());
        statuses.len()
    }

    /// Replaces the `occurrence`-th match of `old` with `new`, in place.
    ///
    /// Returns `false` (and leaves the book untouched) when the date,
    /// identity or occurrence does not exist.
    pub fn replace(
        &mut self,
        date: &DateKey,
        identity: &str,
        old: &str,
        occurrence: usize,
        new: &str,
    ) -> bool {
        let Some(statuses) = self
            .days
            .get_mut(date)
            .and_then(|day| day.get_mut(identity))
        else {
            return false;
        };
        match position_of(statuses, old, occurrence) {
            Some(index) => {
                statuses[index] = new.to_string();
                true
            }
            None => false,
        }
    }

    /// Removes the `occurrence`-th match of `status`, then drops the student
    /// entry and the date entry if they became empty.
    ///
    /// Returns `false` (and leaves the book untouched) on a miss.
    pub fn remove(
        &mut self,
        date: &DateKey,
        identity: &str,
        status: &str,
        occurrence: usize,
    ) -> bool {
        let Some(day) = self.days.get_mut(date) else {
            return false;
        };
        let Some(statuses) = day.get_mut(identity) else {
            return false;
        };
        let Some(index) = position_of(statuses, status, occurrence) else {
            return false;
        };

        statuses.remove(index);
        if statuses.is_empty() {
            day.remove(identity);
        }
        if day.is_empty() {
            self.days.remove(date);
        }
        true
    }

    /// Drops empty status lists and empty days.
    ///
    /// Returns how many containers were removed.
    pub fn prune_empty(&mut self) -> usize {
        let mut pruned = 0;
        self.days.retain(|_, day| {
            let before = day.len();
            day.retain(|_, statuses| !statuses.is_empty());
            pruned += before - day.len();
            if day.is_empty() {
                pruned += 1;
                false
            } else {
                true
            }
        });
        pruned
    }

    /// Whether no date or identity maps to an empty container.
    pub fn is_normalized(&self) -> bool {
        self.days
            .values()
            .all(|day| !day.is_empty() && day.values().all(|statuses| !statuses.is_empty()))
    }
}

fn position_of(statuses: &[String], status: &str, occurrence: usize) -> Option<usize> {
    statuses
        .iter()
        .enumerate()
        .filter(|(_, value)| value.as_str() == status)
        .nth(occurrence)
        .map(|(index, _)| index)
}
