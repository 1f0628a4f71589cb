//! JSON document storage for the record book.
//!
//! # Responsibility
//! - Load the records document from disk at startup.
//! - Rewrite the whole document after every committed mutation.
//!
//! # Invariants
//! - A document that cannot be parsed is never partially recovered.
//! - Saves replace the previous document in full; a failed save leaves the
//!   previous document in place.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod json_file;

pub use json_file::{load_records, save_records};

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug)]
pub enum StorageError {
    /// Document exists but is not a valid records document.
    Corrupt { path: PathBuf, message: String },
    /// Document or its directory could not be read or created.
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Document could not be written; the mutation is not committed.
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Corrupt { path, message } => write!(
                f,
                "records file `{}` is corrupt: {message}",
                path.display()
            ),
            Self::Read { path, source } => write!(
                f,
                "failed to read records file `{}`: {source}",
                path.display()
            ),
            Self::Write { path, source } => write!(
                f,
                "failed to write records file `{}`: {source}",
                path.display()
            ),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Corrupt { .. } => None,
            Self::Read { source, .. } => Some(source),
            Self::Write { source, .. } => Some(source),
        }
    }
}
