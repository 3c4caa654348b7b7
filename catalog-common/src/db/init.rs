//! Database connections
//!
//! The catalog is owned by the surrounding archive application; these crates only
//! read it. `connect_readonly` is what the browse service uses. `open_catalog` and
//! `open_in_memory` provision a writable catalog with the expected schema, which is
//! what tests and local development need.

use crate::db::schema::create_catalog_schema;
use crate::{Error, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

/// Connect to an existing catalog in read-only mode
pub async fn connect_readonly(db_path: &Path) -> Result<SqlitePool> {
    if !db_path.exists() {
        return Err(Error::NotFound(format!(
            "Catalog database not found: {}",
            db_path.display()
        )));
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .read_only(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(options)
        .await?;

    info!("Connected to catalog (read-only): {}", db_path.display());
    Ok(pool)
}

/// Open (creating if needed) a writable catalog and ensure the schema exists
pub async fn open_catalog(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new catalog: {}", db_path.display());
    } else {
        info!("Opened existing catalog: {}", db_path.display());
    }

    create_catalog_schema(&pool).await?;
    Ok(pool)
}

/// Open a private in-memory catalog with the schema created
///
/// The pool holds exactly one connection that never expires: every SQLite
/// in-memory connection is its own database.
pub async fn open_in_memory() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    create_catalog_schema(&pool).await?;
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_catalog_has_schema() {
        let pool = open_in_memory().await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM information_object")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_connect_readonly_missing_file() {
        let result = connect_readonly(Path::new("/nonexistent/catalog.db")).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }
}
