//! Flat-file persistence for the application tracker.
//!
//! One CSV file, header row, one data row per analyzed application.
//! Append-only at the record level: rows are never updated or deleted, but
//! each append rewrites the whole file (existing rows first, insertion
//! order preserved, no keys, no dedup). There is no inter-process locking;
//! the atomic temp-file swap only protects against torn writes.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::models::application::ApplicationRecord;

/// Declared column schema of the tracker file. Serde field names on
/// `ApplicationRecord` must stay in sync with this list.
pub const COLUMNS: [&str; 6] = [
    "Role",
    "Company",
    "Date Applied",
    "Expected Salary",
    "Status",
    "Fit Summary",
];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Tracker file header {found:?} does not match the declared schema {expected:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
}

/// CSV-backed store for `ApplicationRecord` rows.
pub struct TrackerStore {
    path: PathBuf,
}

impl TrackerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads every record, oldest first. A nonexistent or zero-length file
    /// is an empty table, not an error.
    pub fn load(&self) -> Result<Vec<ApplicationRecord>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if content.is_empty() {
            return Ok(Vec::new());
        }
        read_records(&content)
    }

    /// Appends records after the existing rows and rewrites the file,
    /// creating the parent directory if needed. Refuses to touch a file
    /// whose header disagrees with `COLUMNS`.
    pub fn append(&self, new_records: &[ApplicationRecord]) -> Result<(), StoreError> {
        let mut records = match fs::read_to_string(&self.path) {
            Ok(content) if !content.is_empty() => {
                validate_header(&content)?;
                read_records(&content)?
            }
            Ok(_) => Vec::new(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        records.extend_from_slice(new_records);

        let serialized = write_records(&records)?;

        let dir = self.path.parent().filter(|p| !p.as_os_str().is_empty());
        let dir = dir.unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(serialized.as_bytes())?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }

    /// Serializes records in the backing-file format, for the CSV download.
    pub fn export_csv(records: &[ApplicationRecord]) -> Result<String, StoreError> {
        write_records(records)
    }
}

fn validate_header(content: &str) -> Result<(), StoreError> {
    let mut reader = csv::Reader::from_reader(content.as_bytes());
    let headers = reader.headers()?;
    if headers.iter().ne(COLUMNS) {
        return Err(StoreError::SchemaMismatch {
            expected: COLUMNS.iter().map(|c| c.to_string()).collect(),
            found: headers.iter().map(str::to_string).collect(),
        });
    }
    Ok(())
}

fn read_records(content: &str) -> Result<Vec<ApplicationRecord>, StoreError> {
    let mut reader = csv::Reader::from_reader(content.as_bytes());
    reader
        .deserialize()
        .collect::<Result<Vec<_>, _>>()
        .map_err(Into::into)
}

fn write_records(records: &[ApplicationRecord]) -> Result<String, StoreError> {
    let mut bytes = Vec::new();
    {
        let mut writer = csv::Writer::from_writer(&mut bytes);
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;
    }
    String::from_utf8(bytes)
        .map_err(|e| StoreError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}
