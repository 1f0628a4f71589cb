//! Records document load/save on the local file system.
//!
//! # Invariants
//! - Loading never writes the document itself; only its directory may be
//!   created.
//! - Saving goes through a sibling temp file and a rename, so readers see
//!   either the old or the new document.

use super::{StorageError, StorageResult};
use crate::model::record::RecordBook;
use log::{error, info, warn};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

const TEMP_SUFFIX: &str = "tmp";

/// Loads the record book stored at `path`.
///
/// Returns an empty book when the file does not exist yet, after creating
/// its parent directory.
///
/// # Errors
/// - [`StorageError::Read`] when the directory cannot be created or the file
///   cannot be read.
/// - [`StorageError::Corrupt`] when the content is not a
///   `{date: {identity: [status, ...]}}` document with valid date keys.
pub fn load_records(path: impl AsRef<Path>) -> StorageResult<RecordBook> {
    let path = path.as_ref();
    let started_at = Instant::now();
    info!("event=storage_load module=storage status=start");

    if let Some(dir) = parent_dir(path) {
        fs::create_dir_all(dir).map_err(|source| {
            error!(
                "event=storage_load module=storage status=error error_code=dir_create_failed error={}",
                source
            );
            StorageError::Read {
                path: dir.to_path_buf(),
                source,
            }
        })?;
    }

    if !path.exists() {
        info!(
            "event=storage_load module=storage status=ok mode=empty duration_ms={}",
            started_at.elapsed().as_millis()
        );
        return Ok(RecordBook::new());
    }

    let bytes = fs::read(path).map_err(|source| {
        error!(
            "event=storage_load module=storage status=error error_code=read_failed error={}",
            source
        );
        StorageError::Read {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let mut book: RecordBook = serde_json::from_slice(&bytes).map_err(|err| {
        error!(
            "event=storage_load module=storage status=error error_code=corrupt_document line={} column={}",
            err.line(),
            err.column()
        );
        StorageError::Corrupt {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    })?;

    let pruned = book.prune_empty();
    if pruned > 0 {
        warn!(
            "event=storage_load module=storage status=normalized pruned_containers={}",
            pruned
        );
    }

    info!(
        "event=storage_load module=storage status=ok mode=file dates={} marks={} duration_ms={}",
        book.dates().count(),
        book.mark_count(),
        started_at.elapsed().as_millis()
    );
    Ok(book)
}

/// Overwrites the document at `path` with the full record book.
///
/// # Errors
/// - [`StorageError::Write`] on any I/O failure. The previous document is
///   left in place.
pub fn save_records(path: impl AsRef<Path>, book: &RecordBook) -> StorageResult<()> {
    let path = path.as_ref();
    let started_at = Instant::now();

    match write_document(path, book) {
        Ok(bytes) => {
            info!(
                "event=storage_save module=storage status=ok dates={} bytes={} duration_ms={}",
                book.dates().count(),
                bytes,
                started_at.elapsed().as_millis()
            );
            Ok(())
        }
        Err(source) => {
            error!(
                "event=storage_save module=storage status=error error_code=write_failed duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                source
            );
            Err(StorageError::Write {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}

fn write_document(path: &Path, book: &RecordBook) -> std::io::Result<usize> {
    if let Some(dir) = parent_dir(path) {
        fs::create_dir_all(dir)?;
    }

    let mut payload = serde_json::to_vec_pretty(book).map_err(std::io::Error::from)?;
    payload.push(b'\n');

    let temp_path = temp_path_for(path);
    let written = File::create(&temp_path).and_then(|mut file| {
        file.write_all(&payload)?;
        file.sync_all()
    });
    if let Err(err) = written.and_then(|()| fs::rename(&temp_path, path)) {
        let _ = fs::remove_file(&temp_path);
        return Err(err);
    }

    Ok(payload.len())
}

fn parent_dir(path: &Path) -> Option<&Path> {
    path.parent().filter(|dir| !dir.as_os_str().is_empty())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".");
    name.push(TEMP_SUFFIX);
    path.with_file_name(name)
}
