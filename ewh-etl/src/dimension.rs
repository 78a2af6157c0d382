//! Product dimension derivation

use crate::model::{DimensionBatch, RecordBatch};

/// Derive the deduplicated product dimension from the valid batch
///
/// One row per distinct `(product, category, price)` tuple, in first-seen
/// order, with `product_id = 1 + position`.
pub fn build_dimension(valid: &RecordBatch) -> DimensionBatch {
    DimensionBatch::from_keys(valid.iter().map(|r| r.product_key()))
}
