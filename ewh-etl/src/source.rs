//! Delimited-text record source
//!
//! Columns are matched by header name. An empty `customer_name` field, or one
//! holding a conventional null marker such as `NA` or `NULL`, reads as a
//! missing customer. Prices must be finite numbers; anything else makes the
//! whole source unreadable.

use crate::error::{Error, Result};
use crate::model::{Record, RecordBatch, RAW_COLUMNS};
use crate::pipeline::RecordSource;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Field values treated as missing, as produced by common spreadsheet and
/// dataframe exports
pub const NULL_TOKENS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_null_token(value: &str) -> bool {
    NULL_TOKENS.contains(&value)
}

/// Reads the raw batch from a CSV file with a header row
#[derive(Debug, Clone)]
pub struct CsvRecordSource {
    path: PathBuf,
    delimiter: u8,
}

impl CsvRecordSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            delimiter: b',',
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_records(&self) -> Result<RecordBatch> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(csv::Trim::Headers)
            .from_path(&self.path)
            .map_err(|e| Error::source_read(&self.path, e))?;

        let mut records = Vec::new();
        for (line, row) in reader.deserialize::<Record>().enumerate() {
            let mut record = row.map_err(|e| Error::source_read(&self.path, e))?;
            if record.customer_name.as_deref().is_some_and(is_null_token) {
                record.customer_name = None;
            }
            if !record.price.is_finite() {
                return Err(Error::source_read(
                    &self.path,
                    format!(
                        "row {} (order {}): price is not a finite number",
                        line + 1,
                        record.order_id
                    ),
                ));
            }
            records.push(record);
        }

        debug!("Parsed {} rows from {}", records.len(), self.path.display());
        Ok(RecordBatch::new(records))
    }
}

#[async_trait]
impl RecordSource for CsvRecordSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn read_batch(&self) -> Result<RecordBatch> {
        info!("Starting extraction from {}", self.path.display());
        self.read_records()
    }
}

/// Write records as CSV with the raw header, replacing any existing file
///
/// The header is written even for an empty batch.
pub fn write_records_csv(path: &Path, batch: &RecordBatch) -> std::result::Result<(), csv::Error> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    writer.write_record(RAW_COLUMNS)?;
    for record in batch {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
