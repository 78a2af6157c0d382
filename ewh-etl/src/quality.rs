//! Data-quality partitioning
//!
//! A record is invalid iff its customer name is missing or its price is not
//! positive. The rule looks at one record at a time.

use crate::model::{Record, RecordBatch};
use std::fmt;

/// Reason a record is routed to quarantine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QualityIssue {
    MissingCustomer,
    NonPositivePrice,
}

impl fmt::Display for QualityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityIssue::MissingCustomer => write!(f, "missing customer_name"),
            QualityIssue::NonPositivePrice => write!(f, "price <= 0"),
        }
    }
}

/// All quality issues of one record (empty when valid)
pub fn assess(record: &Record) -> Vec<QualityIssue> {
    let mut issues = Vec::new();
    if record.customer_name.is_none() {
        issues.push(QualityIssue::MissingCustomer);
    }
    if record.price <= 0.0 {
        issues.push(QualityIssue::NonPositivePrice);
    }
    issues
}

pub fn is_valid(record: &Record) -> bool {
    assess(record).is_empty()
}

/// Split a batch into `(valid, invalid)`, preserving relative order
///
/// Every input record lands in exactly one output, unmodified.
pub fn partition(batch: RecordBatch) -> (RecordBatch, RecordBatch) {
    let (valid, invalid): (Vec<Record>, Vec<Record>) = batch.into_iter().partition(is_valid);
    (RecordBatch::new(valid), RecordBatch::new(invalid))
}

/// Per-issue counts over a batch
///
/// A record with both issues counts toward both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IssueCounts {
    pub missing_customer: usize,
    pub non_positive_price: usize,
}

impl IssueCounts {
    pub fn tally(batch: &RecordBatch) -> Self {
        let mut counts = Self::default();
        for issue in batch.iter().flat_map(assess) {
            match issue {
                QualityIssue::MissingCustomer => counts.missing_customer += 1,
                QualityIssue::NonPositivePrice => counts.non_positive_price += 1,
            }
        }
        counts
    }
}
