//! Typed batches flowing between pipeline stages
//!
//! Every batch is an immutable, ordered value. Stages borrow their inputs and
//! return new batches.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Column order of the raw input (and of quarantine files)
pub const RAW_COLUMNS: [&str; 7] = [
    "order_id",
    "customer_name",
    "product",
    "category",
    "price",
    "quantity",
    "transaction_date",
];

/// One row of the raw transactional input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub order_id: i64,
    pub customer_name: Option<String>,
    pub product: String,
    pub category: String,
    pub price: f64,
    pub quantity: i64,
    pub transaction_date: String,
}

impl Record {
    /// Natural key of the product this record sold
    pub fn product_key(&self) -> ProductKey {
        ProductKey::new(self.product.clone(), self.category.clone(), self.price)
    }

    /// `price × quantity` from this record's own price
    pub fn total_amount(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

/// Composite natural key of a product dimension row
///
/// Equality compares `price` numerically (`0.0 == -0.0`). NaN prices compare
/// equal to each other so a key always matches itself.
#[derive(Debug, Clone)]
pub struct ProductKey {
    pub product: String,
    pub category: String,
    pub price: f64,
}

impl ProductKey {
    pub fn new(product: impl Into<String>, category: impl Into<String>, price: f64) -> Self {
        Self {
            product: product.into(),
            category: category.into(),
            price,
        }
    }

    fn price_bits(&self) -> u64 {
        if self.price == 0.0 {
            0.0f64.to_bits()
        } else if self.price.is_nan() {
            f64::NAN.to_bits()
        } else {
            self.price.to_bits()
        }
    }
}

impl PartialEq for ProductKey {
    fn eq(&self, other: &Self) -> bool {
        self.product == other.product
            && self.category == other.category
            && self.price_bits() == other.price_bits()
    }
}

impl Eq for ProductKey {}

impl Hash for ProductKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.product.hash(state);
        self.category.hash(state);
        self.price_bits().hash(state);
    }
}

impl fmt::Display for ProductKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.product, self.category, self.price)
    }
}

/// Ordered batch of raw (or quarantined) records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordBatch {
    records: Vec<Record>,
}

impl RecordBatch {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn order_ids(&self) -> Vec<i64> {
        self.records.iter().map(|r| r.order_id).collect()
    }
}

impl From<Vec<Record>> for RecordBatch {
    fn from(records: Vec<Record>) -> Self {
        Self::new(records)
    }
}

impl FromIterator<Record> for RecordBatch {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for RecordBatch {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a RecordBatch {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Row of the `dim_product` table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionRow {
    pub product: String,
    pub category: String,
    pub price: f64,
    pub product_id: i64,
}

impl DimensionRow {
    pub fn key(&self) -> ProductKey {
        ProductKey::new(self.product.clone(), self.category.clone(), self.price)
    }
}

/// Deduplicated product dimension with a natural-key index
#[derive(Debug, Clone, Default)]
pub struct DimensionBatch {
    rows: Vec<DimensionRow>,
    index: HashMap<ProductKey, i64>,
}

impl DimensionBatch {
    /// Assign dense 1-based surrogate keys to `keys` in the order given
    ///
    /// Repeated keys keep their first assignment and do not consume an id.
    pub fn from_keys<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = ProductKey>,
    {
        let mut batch = Self::default();
        for key in keys {
            if batch.index.contains_key(&key) {
                continue;
            }
            let product_id = batch.rows.len() as i64 + 1;
            batch.rows.push(DimensionRow {
                product: key.product.clone(),
                category: key.category.clone(),
                price: key.price,
                product_id,
            });
            batch.index.insert(key, product_id);
        }
        batch
    }

    /// Surrogate key for a natural key, if present
    pub fn lookup(&self, key: &ProductKey) -> Option<i64> {
        self.index.get(key).copied()
    }

    pub fn contains_id(&self, product_id: i64) -> bool {
        product_id >= 1 && (product_id as usize) <= self.rows.len()
    }

    pub fn rows(&self) -> &[DimensionRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl PartialEq for DimensionBatch {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows
    }
}

/// Row of the `fact_sales` table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactRow {
    pub order_id: i64,
    pub transaction_date: String,
    pub customer_name: Option<String>,
    pub product_id: i64,
    pub quantity: i64,
    pub total_amount: f64,
}

/// Ordered sales fact batch, one row per valid record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FactBatch {
    rows: Vec<FactRow>,
}

impl FactBatch {
    pub fn new(rows: Vec<FactRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[FactRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
