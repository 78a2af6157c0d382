//! Sample transactional data
//!
//! Six demo orders, two of which fail the quality rules (order 103 has a
//! negative price, order 105 has no customer).

use crate::error::Result;
use crate::model::{Record, RecordBatch};
use std::path::Path;
use tracing::info;

/// Convenience constructor for a raw record
pub fn record(
    order_id: i64,
    customer_name: Option<&str>,
    product: &str,
    category: &str,
    price: f64,
    quantity: i64,
    transaction_date: &str,
) -> Record {
    Record {
        order_id,
        customer_name: customer_name.map(str::to_string),
        product: product.to_string(),
        category: category.to_string(),
        price,
        quantity,
        transaction_date: transaction_date.to_string(),
    }
}

pub fn sample_records() -> RecordBatch {
    RecordBatch::new(vec![
        record(101, Some("Alice"), "Laptop", "Electronics", 1200.0, 1, "2023-10-01"),
        record(102, Some("Bob"), "Mouse", "Accessories", 25.0, 2, "2023-10-01"),
        record(103, Some("Charlie"), "Keyboard", "Accessories", -50.0, 1, "2023-10-01"),
        record(104, Some("David"), "Monitor", "Electronics", 300.0, 2, "2023-10-02"),
        record(105, None, "Mouse", "Accessories", 25.0, 5, "2023-10-02"),
        record(106, Some("Frank"), "Laptop", "Electronics", 1200.0, 1, "2023-10-02"),
    ])
}

/// Write the sample orders as the raw CSV input file
pub fn write_sample_csv(path: &Path) -> Result<usize> {
    let batch = sample_records();
    crate::source::write_records_csv(path, &batch)?;
    info!("Generated sample raw data file: {} ({} rows)", path.display(), batch.len());
    Ok(batch.len())
}
