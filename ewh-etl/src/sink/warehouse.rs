//! SQLite star schema storage
//!
//! Both tables are replaced inside one transaction: a failed run leaves the
//! previously stored tables untouched.

use crate::error::{Error, Result};
use crate::model::{DimensionBatch, FactBatch};
use crate::pipeline::StorageSink;
use async_trait::async_trait;
use ewh_common::db::{
    init_warehouse, insert_statement, recreate_star_schema, DIM_PRODUCT_COLUMNS,
    DIM_PRODUCT_TABLE, FACT_SALES_COLUMNS, FACT_SALES_TABLE,
};
use sqlx::SqlitePool;
use std::path::PathBuf;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Storage sink writing `dim_product` and `fact_sales` to SQLite
///
/// A sink created with [`SqliteWarehouse::at_path`] opens (and creates) the
/// database on its first write, so a run that fails before loading leaves
/// no database file behind.
#[derive(Debug)]
pub struct SqliteWarehouse {
    db_path: Option<PathBuf>,
    pool: OnceCell<SqlitePool>,
    label: String,
}

impl SqliteWarehouse {
    /// Sink over an already open pool
    pub fn with_pool(pool: SqlitePool, label: impl Into<String>) -> Self {
        Self {
            db_path: None,
            pool: OnceCell::new_with(Some(pool)),
            label: label.into(),
        }
    }

    /// Sink over a database file opened on first write
    pub fn at_path(db_path: impl Into<PathBuf>) -> Self {
        let db_path = db_path.into();
        Self {
            label: db_path.display().to_string(),
            db_path: Some(db_path),
            pool: OnceCell::new(),
        }
    }

    async fn pool(&self) -> Result<&SqlitePool> {
        self.pool
            .get_or_try_init(|| async {
                match &self.db_path {
                    Some(path) => init_warehouse(path)
                        .await
                        .map_err(|e| Error::storage_write(&self.label, e)),
                    None => Err(Error::storage_write(&self.label, "no database configured")),
                }
            })
            .await
    }

    /// Close the pool if it was ever opened
    pub async fn close(&self) {
        if let Some(pool) = self.pool.get() {
            pool.close().await;
        }
    }
}

#[async_trait]
impl StorageSink for SqliteWarehouse {
    fn describe(&self) -> String {
        self.label.clone()
    }

    async fn replace_star_schema(
        &self,
        dimension: &DimensionBatch,
        facts: &FactBatch,
    ) -> Result<()> {
        info!("Starting loading phase into {}", self.label);

        let mut tx = self
            .pool()
            .await?
            .begin()
            .await
            .map_err(|e| Error::storage_write(&self.label, e))?;

        recreate_star_schema(&mut tx)
            .await
            .map_err(|e| Error::storage_write(&self.label, e))?;

        let insert_dim = insert_statement(DIM_PRODUCT_TABLE, &DIM_PRODUCT_COLUMNS);
        for row in dimension.rows() {
            sqlx::query(&insert_dim)
                .bind(&row.product)
                .bind(&row.category)
                .bind(row.price)
                .bind(row.product_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| Error::storage_write(DIM_PRODUCT_TABLE, e))?;
        }
        debug!("Staged {} rows for {}", dimension.len(), DIM_PRODUCT_TABLE);

        let insert_fact = insert_statement(FACT_SALES_TABLE, &FACT_SALES_COLUMNS);
        for row in facts.rows() {
            sqlx::query(&insert_fact)
                .bind(row.order_id)
                .bind(&row.transaction_date)
                .bind(&row.customer_name)
                .bind(row.product_id)
                .bind(row.quantity)
                .bind(row.total_amount)
                .execute(&mut *tx)
                .await
                .map_err(|e| Error::storage_write(FACT_SALES_TABLE, e))?;
        }
        debug!("Staged {} rows for {}", facts.len(), FACT_SALES_TABLE);

        tx.commit()
            .await
            .map_err(|e| Error::storage_write(&self.label, e))?;

        info!("Loaded '{}' and '{}' tables", DIM_PRODUCT_TABLE, FACT_SALES_TABLE);
        Ok(())
    }
}
