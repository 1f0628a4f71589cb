//! Calendar-date partition key.
//!
//! # Responsibility
//! - Represent the `YYYY-MM-DD` key under which a day's records are stored.
//! - Provide pure calendar navigation (previous/next day, arbitrary shift).
//!
//! # Invariants
//! - The inner string is always a zero-padded, calendar-valid ISO-8601 date
//!   with a four-digit year (0000..=9999).
//! - Deserialization accepts the exact key text only; surrounding whitespace
//!   is tolerated for typed input via [`DateKey::parse`] alone.
//! - Lexicographic order of keys equals chronological order.

use chrono::{Datelike, Duration, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";
const MIN_KEY_YEAR: i32 = 0;
const MAX_KEY_YEAR: i32 = 9999;

static DATE_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date key regex"));

/// Rejected date key input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateKeyError {
    /// Raw input that failed validation.
    pub input: String,
}

impl Display for DateKeyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid date `{}`; expected a calendar date as YYYY-MM-DD",
            self.input
        )
    }
}

impl Error for DateKeyError {}

/// ISO-8601 calendar date used as the sole partition key of the record book.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(String);

impl DateKey {
    /// Parses and validates a `YYYY-MM-DD` string, ignoring surrounding
    /// whitespace.
    ///
    /// # Errors
    /// - Returns [`DateKeyError`] when the shape is not zero-padded
    ///   `YYYY-MM-DD` or the date does not exist (e.g. `2023-02-30`).
    pub fn parse(value: &str) -> Result<Self, DateKeyError> {
        Self::parse_exact(value.trim()).map_err(|_| DateKeyError {
            input: value.to_string(),
        })
    }

    /// Like [`DateKey::parse`] but the input must be the key text verbatim.
    ///
    /// # Errors
    /// - Returns [`DateKeyError`] for any input that is not already a valid
    ///   key, including padded ones.
    pub fn parse_exact(value: &str) -> Result<Self, DateKeyError> {
        let invalid = || DateKeyError {
            input: value.to_string(),
        };
        if !DATE_KEY_RE.is_match(value) {
            return Err(invalid());
        }
        let date = NaiveDate::parse_from_str(value, DATE_KEY_FORMAT).map_err(|_| invalid())?;
        Self::from_naive(date).ok_or_else(invalid)
    }

    fn from_naive(date: NaiveDate) -> Option<Self> {
        if !(MIN_KEY_YEAR..=MAX_KEY_YEAR).contains(&date.year()) {
            return None;
        }
        Some(Self(date.format(DATE_KEY_FORMAT).to_string()))
    }

    /// Returns the key for the current local date.
    pub fn today() -> Self {
        let today = Local::now().date_naive();
        Self::from_naive(today).unwrap_or_else(|| Self(format!("{MAX_KEY_YEAR}-12-31")))
    }

    /// Returns the key `days` calendar days away (negative goes back).
    ///
    /// Results outside years 0000..=9999 saturate to the input.
    pub fn shifted(&self, days: i64) -> Self {
        let date = self.to_naive();
        Duration::try_days(days)
            .and_then(|delta| date.checked_add_signed(delta))
            .and_then(Self::from_naive)
            .unwrap_or_else(|| self.clone())
    }

    /// Key of the previous calendar day.
    pub fn prev_day(&self) -> Self {
        self.shifted(-1)
    }

    /// Key of the next calendar day.
    pub fn next_day(&self) -> Self {
        self.shifted(1)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Calendar date behind this key.
    pub fn to_naive(&self) -> NaiveDate {
        // Construction guarantees a valid date.
        NaiveDate::parse_from_str(&self.0, DATE_KEY_FORMAT).unwrap_or(NaiveDate::MIN)
    }
}

impl Display for DateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DateKey {
    type Err = DateKeyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse_exact(&raw).map_err(serde::de::Error::custom)
    }
}
