//! Fixed set of status labels offered for marking.
//!
//! # Invariants
//! - `label()` is the exact text persisted in the records document.
//! - Parsing accepts the persisted label or the variant name, so both
//!   existing data files and typed command input resolve to one variant.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Disciplinary/status tag attached to a student on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusLabel {
    /// Came without the entry pass.
    ForgotPass,
    /// Reported the entry pass as lost.
    LostPass,
    /// Arrived after the bell.
    Late,
    /// Came without indoor shoes.
    ForgotShoes,
}

/// Input that does not name any known status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatusError {
    pub input: String,
}

impl Display for UnknownStatusError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown status `{}`", self.input)
    }
}

impl Error for UnknownStatusError {}

impl StatusLabel {
    /// All labels in the order they are offered to the user.
    pub const ALL: [StatusLabel; 4] = [
        StatusLabel::ForgotPass,
        StatusLabel::LostPass,
        StatusLabel::Late,
        StatusLabel::ForgotShoes,
    ];

    /// Persisted/display text of this label.
    pub fn label(self) -> &'static str {
        match self {
            Self::ForgotPass => "Забыл пропуск",
            Self::LostPass => "Потерял пропуск",
            Self::Late => "Опоздал",
            Self::ForgotShoes => "Забыл сменную обувь",
        }
    }

    /// Stable ASCII name used on the command line.
    pub fn code(self) -> &'static str {
        match self {
            Self::ForgotPass => "forgot_pass",
            Self::LostPass => "lost_pass",
            Self::Late => "late",
            Self::ForgotShoes => "forgot_shoes",
        }
    }

    /// Resolves a persisted label back to its variant, if it is one.
    pub fn from_label(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.label() == value)
    }
}

impl Display for StatusLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StatusLabel {
    type Err = UnknownStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if let Some(status) = Self::from_label(trimmed) {
            return Ok(status);
        }
        // `ForgotShoes`, `forgot_shoes` and `forgot-shoes` all fold to one key.
        let folded = trimmed
            .chars()
            .filter(|ch| !matches!(ch, '_' | '-' | ' '))
            .collect::<String>()
            .to_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.code().replace('_', "") == folded)
            .ok_or_else(|| UnknownStatusError {
                input: value.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::StatusLabel;

    #[test]
    fn parses_persisted_labels_and_codes() {
        assert_eq!("Опоздал".parse::<StatusLabel>().unwrap(), StatusLabel::Late);
        assert_eq!(
            "ForgotShoes".parse::<StatusLabel>().unwrap(),
            StatusLabel::ForgotShoes
        );
        assert_eq!(
            " lost_pass ".parse::<StatusLabel>().unwrap(),
            StatusLabel::LostPass
        );
        assert_eq!(
            "forgot-pass".parse::<StatusLabel>().unwrap(),
            StatusLabel::ForgotPass
        );
    }

    #[test]
    fn rejects_free_text() {
        let err = "сбежал с урока".parse::<StatusLabel>().unwrap_err();
        assert!(err.to_string().contains("unknown status"));
    }

    #[test]
    fn labels_are_distinct() {
        for status in StatusLabel::ALL {
            assert_eq!(StatusLabel::from_label(status.label()), Some(status));
        }
    }
}
