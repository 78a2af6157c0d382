//! Quarantine side file

use crate::error::{Error, Result};
use crate::model::RecordBatch;
use crate::pipeline::QuarantineSink;
use crate::source::write_records_csv;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes quarantined records to a CSV file with the raw header
///
/// Each write replaces the previous file contents.
#[derive(Debug, Clone)]
pub struct CsvQuarantineSink {
    path: PathBuf,
}

impl CsvQuarantineSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl QuarantineSink for CsvQuarantineSink {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn write_quarantine(&self, invalid: &RecordBatch) -> Result<()> {
        write_records_csv(&self.path, invalid)
            .map_err(|e| Error::quarantine_write(self.describe(), e))?;
        debug!("Wrote {} quarantined rows to {}", invalid.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::RecordSource;
    use crate::quality::partition;
    use crate::sample::sample_records;
    use crate::source::CsvRecordSource;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_quarantine_file_is_reviewable_input() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("quarantine.csv");
        let (_, invalid) = partition(sample_records());

        CsvQuarantineSink::new(&path)
            .write_quarantine(&invalid)
            .await
            .unwrap();

        // The side file has the input shape and re-reads to the same rows
        let reread = CsvRecordSource::new(&path).read_batch().await.unwrap();
        assert_eq!(reread, invalid);
    }

    #[tokio::test]
    async fn test_write_replaces_previous_contents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("quarantine.csv");
        let sink = CsvQuarantineSink::new(&path);
        let (_, invalid) = partition(sample_records());

        sink.write_quarantine(&invalid).await.unwrap();
        let single = RecordBatch::new(vec![invalid.records()[0].clone()]);
        sink.write_quarantine(&single).await.unwrap();

        let reread = CsvRecordSource::new(&path).read_batch().await.unwrap();
        assert_eq!(reread.order_ids(), vec![103]);
    }

    #[tokio::test]
    async fn test_unwritable_destination_is_quarantine_error() {
        let temp_dir = TempDir::new().unwrap();
        // A directory cannot be opened as the output file
        let sink = CsvQuarantineSink::new(temp_dir.path());
        let (_, invalid) = partition(sample_records());

        let result = sink.write_quarantine(&invalid).await;
        assert!(matches!(result, Err(Error::QuarantineWrite { .. })));
    }
}
