//! Tests for catalog database provisioning and read-only access

use catalog_common::db::schema::catalog_table_names;
use catalog_common::db::{connect_readonly, open_catalog, CatalogSeeder, RecordSeed};
use tempfile::TempDir;

#[tokio::test]
async fn test_catalog_creation_when_missing() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("nested").join("catalog.db");

    let pool = open_catalog(&db_path).await;
    assert!(pool.is_ok(), "Catalog initialization failed: {:?}", pool.err());
    assert!(db_path.exists(), "Catalog file was not created");
}

#[tokio::test]
async fn test_catalog_opens_existing() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("catalog.db");

    let pool1 = open_catalog(&db_path).await.unwrap();
    drop(pool1);

    // Schema creation is idempotent
    let pool2 = open_catalog(&db_path).await;
    assert!(pool2.is_ok(), "Failed to reopen catalog: {:?}", pool2.err());
}

#[tokio::test]
async fn test_all_tables_created() {
    let dir = TempDir::new().unwrap();
    let pool = open_catalog(&dir.path().join("catalog.db")).await.unwrap();

    for table in catalog_table_names() {
        let exists: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(table)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(exists, 1, "table {} missing", table);
    }
}

#[tokio::test]
async fn test_readonly_connection_rejects_writes() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("catalog.db");

    let pool = open_catalog(&db_path).await.unwrap();
    let seeder = CatalogSeeder::new(&pool);
    seeder.insert_root().await.unwrap();
    seeder
        .insert_record(&RecordSeed::new(2).title("Letters"))
        .await
        .unwrap();
    pool.close().await;

    let readonly = connect_readonly(&db_path).await.unwrap();

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM information_object")
        .fetch_one(&readonly)
        .await
        .unwrap();
    assert_eq!(count, 2);

    let write = sqlx::query("CREATE TABLE _write_check (id INTEGER)")
        .execute(&readonly)
        .await;
    assert!(write.is_err(), "Write operation should fail in read-only mode");
}
