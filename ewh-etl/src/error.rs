//! Error types for ewh-etl
//!
//! Per-record quality problems are not errors; they route rows to
//! quarantine. Only structural failures of a run surface here.

use crate::model::ProductKey;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// Input batch could not be obtained; the run aborts before any transform
    #[error("Source read error ({path}): {message}")]
    SourceRead { path: PathBuf, message: String },

    /// Quarantine sink rejected the invalid batch
    #[error("Quarantine write error ({destination}): {message}")]
    QuarantineWrite { destination: String, message: String },

    /// Storage sink rejected the dimension or fact batch
    ///
    /// `target` names the table being written, or the storage itself when
    /// the failure happened before any table write.
    #[error("Storage write error ({target}): {message}")]
    StorageWrite { target: String, message: String },

    /// A valid record's natural key did not resolve against the dimension
    /// built from the same batch
    #[error("Join miscalculation: order {order_id} has no dimension row for {key}")]
    JoinMiscalculation { order_id: i64, key: ProductKey },

    /// Database errors outside the storage write (e.g. reporting)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Delimited-text errors outside the pipeline sinks (e.g. sample generation)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    pub fn source_read(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        Error::SourceRead {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub fn quarantine_write(destination: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Error::QuarantineWrite {
            destination: destination.into(),
            message: err.to_string(),
        }
    }

    pub fn storage_write(target: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Error::StorageWrite {
            target: target.into(),
            message: err.to_string(),
        }
    }
}

/// Convenience Result type using ewh-etl Error
pub type Result<T> = std::result::Result<T, Error>;
