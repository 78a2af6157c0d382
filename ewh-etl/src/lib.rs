//! ewh-etl library - sales star schema pipeline
//!
//! Partitions a raw batch of sales records into valid and quarantined rows,
//! derives the `dim_product` dimension with surrogate keys, builds the
//! `fact_sales` table, and persists both to the SQLite warehouse.

pub mod dimension;
pub mod error;
pub mod fact;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod quality;
pub mod report;
pub mod sample;
pub mod sink;
pub mod source;

pub use error::{Error, Result};
pub use model::{DimensionBatch, DimensionRow, FactBatch, FactRow, ProductKey, Record, RecordBatch};
pub use pipeline::{Pipeline, PipelineObserver, RunSummary, TracingObserver};
