//! Sales fact construction
//!
//! Each valid record joins the dimension on the full natural key. The
//! dimension is derived from the same batch, so a miss is an internal
//! defect and fails the run instead of dropping the row.

use crate::error::{Error, Result};
use crate::model::{DimensionBatch, FactBatch, FactRow, RecordBatch};

/// Build one fact row per valid record
///
/// `total_amount` is the record's own `price × quantity`.
pub fn build_facts(valid: &RecordBatch, dimension: &DimensionBatch) -> Result<FactBatch> {
    let rows = valid
        .iter()
        .map(|record| {
            let key = record.product_key();
            let product_id = dimension
                .lookup(&key)
                .ok_or_else(|| Error::JoinMiscalculation {
                    order_id: record.order_id,
                    key,
                })?;

            Ok(FactRow {
                order_id: record.order_id,
                transaction_date: record.transaction_date.clone(),
                customer_name: record.customer_name.clone(),
                product_id,
                quantity: record.quantity,
                total_amount: record.total_amount(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(FactBatch::new(rows))
}
