//! JSON documents
//!
//! Export and import of the day board and the food library, plus the
//! lenient readers used when restoring stored state.

pub mod day;
mod lenient;
pub mod library;
pub mod migrations;

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;

pub use day::{export_day, export_day_at, import_day, restore_day, seed_day, DayDocument, ExportTotals, DAY_DOCUMENT_VERSION};
pub use library::{
    export_library, export_library_at, parse_library_items, restore_library, library_state, LibraryDocument,
    LIBRARY_DOCUMENT_VERSION, LIBRARY_FORMAT,
};

/// Why an import did not happen
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid file: {0}")]
    Schema(String),

    #[error("Could not read file: {0}")]
    Io(#[from] std::io::Error),

    /// No file was chosen; not an error worth reporting
    #[error("Import cancelled")]
    Cancelled,
}

impl ImportError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ImportError::Cancelled)
    }
}

/// Read the text of an import file; no path means the user picked nothing
pub fn read_import(path: Option<&Path>) -> Result<String, ImportError> {
    let Some(path) = path else {
        return Err(ImportError::Cancelled);
    };
    Ok(std::fs::read_to_string(path)?)
}

/// `exportedAt` stamp: RFC 3339, milliseconds, `Z` suffix
pub(crate) fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_no_path_is_cancelled() {
        let err = read_import(None).unwrap_err();
        assert!(err.is_cancelled());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_import(Some(&dir.path().join("nope.json"))).unwrap_err();
        assert!(matches!(err, ImportError::Io(_)));
        assert!(!err.is_cancelled());
    }

    #[test]
    fn test_timestamp_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap();
        assert_eq!(timestamp(at), "2024-03-01T08:30:00.000Z");
    }
}
