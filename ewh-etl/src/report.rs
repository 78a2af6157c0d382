//! Revenue-by-category reporting query
//!
//! Joins `fact_sales` to `dim_product` on the surrogate key, so the totals
//! only add up when the fact rows were keyed correctly.

use crate::error::Result;
use serde::Serialize;
use sqlx::SqlitePool;
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRevenue {
    pub category: String,
    pub total_revenue: f64,
}

/// Total revenue per category, ordered by category name
pub async fn revenue_by_category(pool: &SqlitePool) -> Result<Vec<CategoryRevenue>> {
    let rows = sqlx::query_as::<_, (String, f64)>(
        r#"
        SELECT p.category, SUM(f.total_amount) AS total_revenue
        FROM fact_sales f
        JOIN dim_product p ON f.product_id = p.product_id
        GROUP BY p.category
        ORDER BY p.category
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(category, total_revenue)| CategoryRevenue {
            category,
            total_revenue,
        })
        .collect())
}

/// Render the report as an aligned text table
pub fn format_report(rows: &[CategoryRevenue]) -> String {
    let width = rows
        .iter()
        .map(|r| r.category.len())
        .chain(std::iter::once("category".len()))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    let _ = writeln!(out, "{:<width$}  {:>14}", "category", "total_revenue", width = width);
    for row in rows {
        let _ = writeln!(
            out,
            "{:<width$}  {:>14.2}",
            row.category,
            row.total_revenue,
            width = width
        );
    }
    out
}
