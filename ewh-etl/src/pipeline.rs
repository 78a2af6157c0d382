//! Pipeline orchestration
//!
//! One run is a single sequential pass:
//! read → partition → quarantine → build dimension → build facts → store.
//!
//! The orchestrator only decides what flows where. Reading, persisting and
//! logging are delegated to the collaborator traits below.

use crate::dimension::build_dimension;
use crate::error::Result;
use crate::fact::build_facts;
use crate::model::{DimensionBatch, FactBatch, RecordBatch};
use crate::quality::{partition, IssueCounts};
use async_trait::async_trait;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

/// Supplies the raw batch for a run
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Human-readable location, for reports
    fn describe(&self) -> String;

    /// Read the whole batch. Failure is reported as [`crate::Error::SourceRead`].
    async fn read_batch(&self) -> Result<RecordBatch>;
}

/// Holds invalid records for human review
#[async_trait]
pub trait QuarantineSink: Send + Sync {
    fn describe(&self) -> String;

    /// Persist the invalid batch. Failure is reported as
    /// [`crate::Error::QuarantineWrite`].
    async fn write_quarantine(&self, invalid: &RecordBatch) -> Result<()>;
}

/// Persists the modeled star schema
#[async_trait]
pub trait StorageSink: Send + Sync {
    fn describe(&self) -> String;

    /// Replace the stored `dim_product` and `fact_sales` tables. Failure is
    /// reported as [`crate::Error::StorageWrite`].
    async fn replace_star_schema(&self, dimension: &DimensionBatch, facts: &FactBatch)
        -> Result<()>;
}

/// Per-phase progress of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseReport {
    Extracted { source: String, rows: usize },
    Partitioned { valid: usize, invalid: usize, issues: IssueCounts },
    Quarantined { destination: String, rows: usize },
    QuarantineSkipped,
    DimensionBuilt { rows: usize },
    FactsBuilt { rows: usize },
    Loaded { destination: String, dimension_rows: usize, fact_rows: usize },
}

/// Receives phase reports as the run progresses
pub trait PipelineObserver: Send + Sync {
    fn on_phase(&self, run_id: Uuid, report: &PhaseReport);
}

/// Observer that discards every report
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {
    fn on_phase(&self, _run_id: Uuid, _report: &PhaseReport) {}
}

/// Observer that turns reports into tracing events
///
/// The run id is carried by the enclosing `pipeline_run` span, not repeated
/// on each event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_phase(&self, _run_id: Uuid, report: &PhaseReport) {
        match report {
            PhaseReport::Extracted { source, rows } => {
                info!(rows, "Extracted {} rows from {}", rows, source);
            }
            PhaseReport::Partitioned { valid, invalid, issues } => {
                info!(valid, invalid, "Partitioned batch: {} valid, {} invalid", valid, invalid);
                if *invalid > 0 {
                    warn!(
                        missing_customer = issues.missing_customer,
                        non_positive_price = issues.non_positive_price,
                        "Found {} rows failing quality rules",
                        invalid
                    );
                }
            }
            PhaseReport::Quarantined { destination, rows } => {
                warn!(rows, "Quarantined {} bad rows to {}", rows, destination);
            }
            PhaseReport::QuarantineSkipped => {
                info!("No rows to quarantine");
            }
            PhaseReport::DimensionBuilt { rows } => {
                info!(rows, "Built dim_product with {} rows", rows);
            }
            PhaseReport::FactsBuilt { rows } => {
                info!(rows, "Transformed data: {} clean rows ready for loading", rows);
            }
            PhaseReport::Loaded { destination, dimension_rows, fact_rows } => {
                info!(
                    dimension_rows,
                    fact_rows,
                    "Loaded dim_product ({}) and fact_sales ({}) into {}",
                    dimension_rows,
                    fact_rows,
                    destination
                );
            }
        }
    }
}

/// Counts produced by a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub extracted: usize,
    pub valid: usize,
    pub quarantined: usize,
    pub dimension_rows: usize,
    pub fact_rows: usize,
}

static NOOP_OBSERVER: NoopObserver = NoopObserver;

/// Sequences partition, modeling and persistence for one batch
pub struct Pipeline<'a> {
    source: &'a dyn RecordSource,
    quarantine: &'a dyn QuarantineSink,
    storage: &'a dyn StorageSink,
    observer: &'a dyn PipelineObserver,
    run_id: Uuid,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        source: &'a dyn RecordSource,
        quarantine: &'a dyn QuarantineSink,
        storage: &'a dyn StorageSink,
    ) -> Self {
        Self {
            source,
            quarantine,
            storage,
            observer: &NOOP_OBSERVER,
            run_id: Uuid::new_v4(),
        }
    }

    pub fn with_observer(mut self, observer: &'a dyn PipelineObserver) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_run_id(mut self, run_id: Uuid) -> Self {
        self.run_id = run_id;
        self
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Execute the run inside a `pipeline_run` span tagged with the run id
    ///
    /// A source failure aborts before anything is written. Sink failures are
    /// returned as-is; a quarantine file written before a failed storage
    /// write is not removed.
    pub async fn run(&self) -> Result<RunSummary> {
        let span = info_span!("pipeline_run", run_id = %self.run_id);
        self.run_phases().instrument(span).await
    }

    async fn run_phases(&self) -> Result<RunSummary> {
        let raw = self.source.read_batch().await?;
        let extracted = raw.len();
        self.report(PhaseReport::Extracted {
            source: self.source.describe(),
            rows: extracted,
        });

        let (valid, invalid) = partition(raw);
        self.report(PhaseReport::Partitioned {
            valid: valid.len(),
            invalid: invalid.len(),
            issues: IssueCounts::tally(&invalid),
        });

        if invalid.is_empty() {
            self.report(PhaseReport::QuarantineSkipped);
        } else {
            self.quarantine.write_quarantine(&invalid).await?;
            self.report(PhaseReport::Quarantined {
                destination: self.quarantine.describe(),
                rows: invalid.len(),
            });
        }

        let dimension = build_dimension(&valid);
        self.report(PhaseReport::DimensionBuilt {
            rows: dimension.len(),
        });

        let facts = build_facts(&valid, &dimension)?;
        self.report(PhaseReport::FactsBuilt { rows: facts.len() });

        self.storage.replace_star_schema(&dimension, &facts).await?;
        self.report(PhaseReport::Loaded {
            destination: self.storage.describe(),
            dimension_rows: dimension.len(),
            fact_rows: facts.len(),
        });

        Ok(RunSummary {
            run_id: self.run_id,
            extracted,
            valid: valid.len(),
            quarantined: invalid.len(),
            dimension_rows: dimension.len(),
            fact_rows: facts.len(),
        })
    }

    fn report(&self, report: PhaseReport) {
        self.observer.on_phase(self.run_id, &report);
    }
}
