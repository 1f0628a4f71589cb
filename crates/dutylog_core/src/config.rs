//! Store location configuration.
//!
//! # Responsibility
//! - Name where the records document lives.
//!
//! # Invariants
//! - Defaults match the historical layout: `data/records.json` relative to
//!   the working directory.

use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_RECORDS_FILE: &str = "records.json";

/// Location of the records document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    pub file_name: String,
}

impl StoreConfig {
    /// Uses `data_dir` with the default file name.
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            file_name: DEFAULT_RECORDS_FILE.to_string(),
        }
    }

    /// Full path of the records document.
    pub fn records_path(&self) -> PathBuf {
        self.data_dir.join(&self.file_name)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::in_dir(DEFAULT_DATA_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::StoreConfig;
    use std::path::Path;

    #[test]
    fn default_points_at_data_records_json() {
        assert_eq!(
            StoreConfig::default().records_path(),
            Path::new("data").join("records.json")
        );
    }

    #[test]
    fn in_dir_keeps_default_file_name() {
        let config = StoreConfig::in_dir("/var/lib/dutylog");
        assert_eq!(
            config.records_path(),
            Path::new("/var/lib/dutylog").join("records.json")
        );
    }
}
