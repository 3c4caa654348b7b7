//! Catalog schema
//!
//! Mirrors the subset of the archive application's tables that the facet engine
//! and the fuzzy vocabulary read. All statements are idempotent.

use crate::Result;
use sqlx::SqlitePool;
use tracing::debug;

/// Core catalog tables, in creation order
const CATALOG_TABLES: &[(&str, &str)] = &[
    (
        "information_object",
        r#"
        CREATE TABLE IF NOT EXISTS information_object (
            id INTEGER PRIMARY KEY,
            parent_id INTEGER,
            identifier TEXT,
            level_of_description_id INTEGER,
            repository_id INTEGER
        )
        "#,
    ),
    (
        "information_object_i18n",
        r#"
        CREATE TABLE IF NOT EXISTS information_object_i18n (
            id INTEGER NOT NULL,
            culture TEXT NOT NULL DEFAULT 'en',
            title TEXT,
            scope_and_content TEXT,
            extent_and_medium TEXT,
            archival_history TEXT,
            acquisition TEXT,
            PRIMARY KEY (id, culture)
        )
        "#,
    ),
    (
        "display_object_config",
        r#"
        CREATE TABLE IF NOT EXISTS display_object_config (
            object_id INTEGER PRIMARY KEY,
            object_type TEXT
        )
        "#,
    ),
    (
        "status",
        r#"
        CREATE TABLE IF NOT EXISTS status (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            object_id INTEGER NOT NULL,
            type_id INTEGER NOT NULL,
            status_id INTEGER NOT NULL
        )
        "#,
    ),
    (
        "event",
        r#"
        CREATE TABLE IF NOT EXISTS event (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            object_id INTEGER NOT NULL,
            actor_id INTEGER,
            start_date TEXT,
            end_date TEXT
        )
        "#,
    ),
    (
        "actor_i18n",
        r#"
        CREATE TABLE IF NOT EXISTS actor_i18n (
            id INTEGER NOT NULL,
            culture TEXT NOT NULL DEFAULT 'en',
            authorized_form_of_name TEXT,
            PRIMARY KEY (id, culture)
        )
        "#,
    ),
    (
        "repository",
        r#"
        CREATE TABLE IF NOT EXISTS repository (
            id INTEGER PRIMARY KEY
        )
        "#,
    ),
    (
        "term",
        r#"
        CREATE TABLE IF NOT EXISTS term (
            id INTEGER PRIMARY KEY,
            taxonomy_id INTEGER NOT NULL
        )
        "#,
    ),
    (
        "term_i18n",
        r#"
        CREATE TABLE IF NOT EXISTS term_i18n (
            id INTEGER NOT NULL,
            culture TEXT NOT NULL DEFAULT 'en',
            name TEXT,
            PRIMARY KEY (id, culture)
        )
        "#,
    ),
    (
        "object_term_relation",
        r#"
        CREATE TABLE IF NOT EXISTS object_term_relation (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            object_id INTEGER NOT NULL,
            term_id INTEGER NOT NULL
        )
        "#,
    ),
    (
        "digital_object",
        r#"
        CREATE TABLE IF NOT EXISTS digital_object (
            id INTEGER PRIMARY KEY,
            object_id INTEGER,
            parent_id INTEGER,
            mime_type TEXT
        )
        "#,
    ),
    (
        "display_facet_cache",
        r#"
        CREATE TABLE IF NOT EXISTS display_facet_cache (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            facet_type TEXT NOT NULL,
            term_id INTEGER,
            term_name TEXT,
            count INTEGER NOT NULL DEFAULT 0
        )
        "#,
    ),
];

const CATALOG_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_io_parent ON information_object(parent_id)",
    "CREATE INDEX IF NOT EXISTS idx_status_object ON status(object_id, type_id)",
    "CREATE INDEX IF NOT EXISTS idx_event_object ON event(object_id)",
    "CREATE INDEX IF NOT EXISTS idx_otr_object ON object_term_relation(object_id)",
    "CREATE INDEX IF NOT EXISTS idx_otr_term ON object_term_relation(term_id)",
    "CREATE INDEX IF NOT EXISTS idx_digital_object_object ON digital_object(object_id)",
    "CREATE INDEX IF NOT EXISTS idx_facet_cache_type ON display_facet_cache(facet_type)",
];

/// Create every core catalog table and its indexes
///
/// The thesaurus table belongs to an optional companion plugin and is created
/// separately by [`create_thesaurus_table`].
pub async fn create_catalog_schema(pool: &SqlitePool) -> Result<()> {
    for (name, ddl) in CATALOG_TABLES {
        sqlx::query(ddl).execute(pool).await?;
        debug!(table = name, "Ensured catalog table");
    }

    for ddl in CATALOG_INDEXES {
        sqlx::query(ddl).execute(pool).await?;
    }

    Ok(())
}

/// Create the controlled-vocabulary (thesaurus) table
pub async fn create_thesaurus_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS thesaurus_term (
            id INTEGER PRIMARY KEY,
            term TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Names of the core tables
pub fn catalog_table_names() -> impl Iterator<Item = &'static str> {
    CATALOG_TABLES.iter().map(|(name, _)| *name)
}
