//! Tests for warehouse initialization and star schema DDL

use ewh_common::db::{
    init_warehouse, insert_statement, list_tables, open_warehouse_readonly,
    recreate_star_schema, DIM_PRODUCT_COLUMNS, DIM_PRODUCT_TABLE, FACT_SALES_COLUMNS,
    FACT_SALES_TABLE,
};
use ewh_common::Error;
use tempfile::TempDir;

#[tokio::test]
async fn test_warehouse_created_when_missing() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("nested").join("warehouse.db");

    let pool = init_warehouse(&db_path).await;
    assert!(pool.is_ok(), "Warehouse initialization failed: {:?}", pool.err());
    assert!(db_path.exists(), "Warehouse file was not created");
}

#[tokio::test]
async fn test_warehouse_opens_existing() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("warehouse.db");

    let pool1 = init_warehouse(&db_path).await.unwrap();
    pool1.close().await;

    let pool2 = init_warehouse(&db_path).await;
    assert!(pool2.is_ok(), "Failed to open existing warehouse: {:?}", pool2.err());
}

#[tokio::test]
async fn test_readonly_requires_existing_file() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("absent.db");

    let result = open_warehouse_readonly(&db_path).await;
    assert!(matches!(result, Err(Error::NotFound(_))));
    assert!(!db_path.exists(), "Read-only open must not create the file");
}

#[tokio::test]
async fn test_readonly_rejects_writes() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("warehouse.db");

    let pool = init_warehouse(&db_path).await.unwrap();
    pool.close().await;

    let ro = open_warehouse_readonly(&db_path).await.unwrap();
    let result = sqlx::query("CREATE TABLE _test_write (id INTEGER)")
        .execute(&ro)
        .await;
    assert!(result.is_err(), "Write operation should fail in read-only mode");
}

#[tokio::test]
async fn test_recreate_star_schema_replaces_tables() {
    let temp_dir = TempDir::new().unwrap();
    let pool = init_warehouse(&temp_dir.path().join("warehouse.db"))
        .await
        .unwrap();

    let mut conn = pool.acquire().await.unwrap();
    recreate_star_schema(&mut conn).await.unwrap();

    sqlx::query("INSERT INTO dim_product VALUES ('Laptop', 'Electronics', 1200.0, 1)")
        .execute(&mut *conn)
        .await
        .unwrap();
    sqlx::query("INSERT INTO fact_sales VALUES (101, '2023-10-01', 'Alice', 1, 1, 1200.0)")
        .execute(&mut *conn)
        .await
        .unwrap();

    // Second recreation must succeed despite the foreign key and start empty
    recreate_star_schema(&mut conn).await.unwrap();
    drop(conn);

    let tables = list_tables(&pool).await.unwrap();
    let names: Vec<&str> = tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec![DIM_PRODUCT_TABLE, FACT_SALES_TABLE]);
    assert!(tables.iter().all(|t| t.row_count == 0));
}

#[tokio::test]
async fn test_fact_requires_known_product() {
    let temp_dir = TempDir::new().unwrap();
    let pool = init_warehouse(&temp_dir.path().join("warehouse.db"))
        .await
        .unwrap();

    let mut conn = pool.acquire().await.unwrap();
    recreate_star_schema(&mut conn).await.unwrap();

    let orphan = sqlx::query("INSERT INTO fact_sales VALUES (101, '2023-10-01', 'Alice', 99, 1, 1.0)")
        .execute(&mut *conn)
        .await;
    assert!(orphan.is_err(), "Foreign key should reject unknown product_id");
}

#[tokio::test]
async fn test_insert_statements_match_schema() {
    let temp_dir = TempDir::new().unwrap();
    let pool = init_warehouse(&temp_dir.path().join("warehouse.db"))
        .await
        .unwrap();

    let mut conn = pool.acquire().await.unwrap();
    recreate_star_schema(&mut conn).await.unwrap();

    sqlx::query(&insert_statement(DIM_PRODUCT_TABLE, &DIM_PRODUCT_COLUMNS))
        .bind("Laptop")
        .bind("Electronics")
        .bind(1200.0_f64)
        .bind(1_i64)
        .execute(&mut *conn)
        .await
        .unwrap();
    sqlx::query(&insert_statement(FACT_SALES_TABLE, &FACT_SALES_COLUMNS))
        .bind(101_i64)
        .bind("2023-10-01")
        .bind("Alice")
        .bind(1_i64)
        .bind(1_i64)
        .bind(1200.0_f64)
        .execute(&mut *conn)
        .await
        .unwrap();

    let (product, total): (String, f64) = sqlx::query_as(
        "SELECT d.product, f.total_amount FROM fact_sales f JOIN dim_product d USING (product_id)",
    )
    .fetch_one(&mut *conn)
    .await
    .unwrap();
    assert_eq!(product, "Laptop");
    assert_eq!(total, 1200.0);
}
