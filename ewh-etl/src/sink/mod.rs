//! Pipeline output sinks

pub mod quarantine;
pub mod warehouse;

pub use quarantine::CsvQuarantineSink;
pub use warehouse::SqliteWarehouse;
