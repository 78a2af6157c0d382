//! Star schema table definitions
//!
//! `fact_sales.product_id` references `dim_product.product_id`. With foreign
//! keys enabled, tables must be dropped fact-first and created
//! dimension-first.

use crate::Result;
use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};

pub const DIM_PRODUCT_TABLE: &str = "dim_product";
pub const FACT_SALES_TABLE: &str = "fact_sales";

/// Column order of `dim_product`
pub const DIM_PRODUCT_COLUMNS: [&str; 4] = ["product", "category", "price", "product_id"];

/// Column order of `fact_sales`
pub const FACT_SALES_COLUMNS: [&str; 6] = [
    "order_id",
    "transaction_date",
    "customer_name",
    "product_id",
    "quantity",
    "total_amount",
];

pub const CREATE_DIM_PRODUCT: &str = r#"
    CREATE TABLE dim_product (
        product TEXT NOT NULL,
        category TEXT NOT NULL,
        price REAL NOT NULL,
        product_id INTEGER PRIMARY KEY,
        UNIQUE (product, category, price)
    )
"#;

pub const CREATE_FACT_SALES: &str = r#"
    CREATE TABLE fact_sales (
        order_id INTEGER NOT NULL,
        transaction_date TEXT NOT NULL,
        customer_name TEXT,
        product_id INTEGER NOT NULL REFERENCES dim_product(product_id),
        quantity INTEGER NOT NULL,
        total_amount REAL NOT NULL
    )
"#;

/// Drop and recreate both star schema tables
///
/// Intended to run inside a transaction owned by the caller.
pub async fn recreate_star_schema(conn: &mut SqliteConnection) -> Result<()> {
    sqlx::query("DROP TABLE IF EXISTS fact_sales")
        .execute(&mut *conn)
        .await?;
    sqlx::query("DROP TABLE IF EXISTS dim_product")
        .execute(&mut *conn)
        .await?;
    sqlx::query(CREATE_DIM_PRODUCT).execute(&mut *conn).await?;
    sqlx::query(CREATE_FACT_SALES).execute(&mut *conn).await?;
    Ok(())
}

/// Parameterized `INSERT` for `table`, binding `columns` in order
pub fn insert_statement(table: &str, columns: &[&str]) -> String {
    let placeholders = vec!["?"; columns.len()].join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        columns.join(", "),
        placeholders
    )
}

/// Table metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableInfo {
    /// Table name
    pub name: String,
    /// Number of rows in table
    pub row_count: i64,
}

/// List user tables with row counts, alphabetically
pub async fn list_tables(pool: &SqlitePool) -> Result<Vec<TableInfo>> {
    let tables = sqlx::query_as::<_, (String,)>(
        r#"
        SELECT name
        FROM sqlite_master
        WHERE type = 'table'
          AND name NOT LIKE 'sqlite_%'
        ORDER BY name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut table_infos = Vec::with_capacity(tables.len());

    for (table_name,) in tables {
        let row_count: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM \"{}\"", table_name))
                .fetch_one(pool)
                .await?;

        table_infos.push(TableInfo {
            name: table_name,
            row_count,
        });
    }

    Ok(table_infos)
}
