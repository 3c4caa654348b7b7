//! Catalog seeding
//!
//! Writes catalog rows in the shape the archive application stores them. Used to
//! build fixture catalogs for tests and to provision development databases.

use crate::catalog::{
    PUBLICATION_STATUS_PUBLISHED_ID, PUBLICATION_STATUS_TYPE_ID, ROOT_OBJECT_ID,
};
use crate::db::schema::create_thesaurus_table;
use crate::Result;
use sqlx::SqlitePool;

/// One archival description to insert
#[derive(Debug, Clone)]
pub struct RecordSeed {
    pub id: i64,
    pub parent_id: i64,
    pub identifier: Option<String>,
    pub level_id: Option<i64>,
    pub repository_id: Option<i64>,
    pub title: Option<String>,
    pub scope_and_content: Option<String>,
    pub extent_and_medium: Option<String>,
    pub archival_history: Option<String>,
    pub acquisition: Option<String>,
    pub object_type: Option<String>,
    pub published: bool,
}

impl RecordSeed {
    /// A published top-level record with no metadata
    pub fn new(id: i64) -> Self {
        Self {
            id,
            parent_id: ROOT_OBJECT_ID,
            identifier: None,
            level_id: None,
            repository_id: None,
            title: None,
            scope_and_content: None,
            extent_and_medium: None,
            archival_history: None,
            acquisition: None,
            object_type: None,
            published: true,
        }
    }

    pub fn parent(mut self, parent_id: i64) -> Self {
        self.parent_id = parent_id;
        self
    }

    pub fn identifier(mut self, identifier: &str) -> Self {
        self.identifier = Some(identifier.to_string());
        self
    }

    pub fn level(mut self, level_id: i64) -> Self {
        self.level_id = Some(level_id);
        self
    }

    pub fn repository(mut self, repository_id: i64) -> Self {
        self.repository_id = Some(repository_id);
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn scope_and_content(mut self, text: &str) -> Self {
        self.scope_and_content = Some(text.to_string());
        self
    }

    pub fn extent_and_medium(mut self, text: &str) -> Self {
        self.extent_and_medium = Some(text.to_string());
        self
    }

    pub fn archival_history(mut self, text: &str) -> Self {
        self.archival_history = Some(text.to_string());
        self
    }

    pub fn acquisition(mut self, text: &str) -> Self {
        self.acquisition = Some(text.to_string());
        self
    }

    pub fn object_type(mut self, object_type: &str) -> Self {
        self.object_type = Some(object_type.to_string());
        self
    }

    pub fn unpublished(mut self) -> Self {
        self.published = false;
        self
    }
}

/// Inserts catalog rows through a shared pool
#[derive(Debug, Clone)]
pub struct CatalogSeeder {
    pool: SqlitePool,
    culture: String,
}

impl CatalogSeeder {
    pub fn new(pool: &SqlitePool) -> Self {
        Self {
            pool: pool.clone(),
            culture: crate::catalog::DEFAULT_CULTURE.to_string(),
        }
    }

    /// Insert the sentinel root record
    pub async fn insert_root(&self) -> Result<()> {
        sqlx::query("INSERT OR IGNORE INTO information_object (id, parent_id) VALUES (?, NULL)")
            .bind(ROOT_OBJECT_ID)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn insert_record(&self, record: &RecordSeed) -> Result<()> {
        sqlx::query(
            "INSERT INTO information_object
                (id, parent_id, identifier, level_of_description_id, repository_id)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(record.id)
        .bind(record.parent_id)
        .bind(&record.identifier)
        .bind(record.level_id)
        .bind(record.repository_id)
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "INSERT INTO information_object_i18n
                (id, culture, title, scope_and_content, extent_and_medium, archival_history, acquisition)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(record.id)
        .bind(&self.culture)
        .bind(&record.title)
        .bind(&record.scope_and_content)
        .bind(&record.extent_and_medium)
        .bind(&record.archival_history)
        .bind(&record.acquisition)
        .execute(&self.pool)
        .await?;

        if let Some(object_type) = &record.object_type {
            sqlx::query("INSERT INTO display_object_config (object_id, object_type) VALUES (?, ?)")
                .bind(record.id)
                .bind(object_type)
                .execute(&self.pool)
                .await?;
        }

        if record.published {
            sqlx::query("INSERT INTO status (object_id, type_id, status_id) VALUES (?, ?, ?)")
                .bind(record.id)
                .bind(PUBLICATION_STATUS_TYPE_ID)
                .bind(PUBLICATION_STATUS_PUBLISHED_ID)
                .execute(&self.pool)
                .await?;
        }

        Ok(())
    }

    /// Insert an authority record (creator) name
    pub async fn insert_actor(&self, id: i64, name: &str) -> Result<()> {
        sqlx::query("INSERT INTO actor_i18n (id, culture, authorized_form_of_name) VALUES (?, ?, ?)")
            .bind(id)
            .bind(&self.culture)
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Insert a repository; repositories are actors and carry their name in `actor_i18n`
    pub async fn insert_repository(&self, id: i64, name: &str) -> Result<()> {
        sqlx::query("INSERT INTO repository (id) VALUES (?)")
            .bind(id)
            .execute(&self.pool)
            .await?;
        self.insert_actor(id, name).await
    }

    pub async fn insert_term(&self, id: i64, taxonomy_id: i64, name: &str) -> Result<()> {
        sqlx::query("INSERT INTO term (id, taxonomy_id) VALUES (?, ?)")
            .bind(id)
            .bind(taxonomy_id)
            .execute(&self.pool)
            .await?;
        sqlx::query("INSERT INTO term_i18n (id, culture, name) VALUES (?, ?, ?)")
            .bind(id)
            .bind(&self.culture)
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Link a creator to a record through an undated event
    pub async fn add_creator(&self, object_id: i64, actor_id: i64) -> Result<()> {
        self.add_event(object_id, Some(actor_id), None, None).await
    }

    /// Insert an event; dates are ISO `YYYY-MM-DD` text
    pub async fn add_event(
        &self,
        object_id: i64,
        actor_id: Option<i64>,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<()> {
        sqlx::query("INSERT INTO event (object_id, actor_id, start_date, end_date) VALUES (?, ?, ?, ?)")
            .bind(object_id)
            .bind(actor_id)
            .bind(start_date)
            .bind(end_date)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn add_term(&self, object_id: i64, term_id: i64) -> Result<()> {
        sqlx::query("INSERT INTO object_term_relation (object_id, term_id) VALUES (?, ?)")
            .bind(object_id)
            .bind(term_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Attach a digital object; `parent_id` is set for derivatives (thumbnails, references)
    pub async fn add_digital_object(
        &self,
        id: i64,
        object_id: i64,
        parent_id: Option<i64>,
        mime_type: &str,
    ) -> Result<()> {
        sqlx::query("INSERT INTO digital_object (id, object_id, parent_id, mime_type) VALUES (?, ?, ?, ?)")
            .bind(id)
            .bind(object_id)
            .bind(parent_id)
            .bind(mime_type)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn add_facet_cache(
        &self,
        facet_type: &str,
        term_id: Option<i64>,
        term_name: &str,
        count: i64,
    ) -> Result<()> {
        sqlx::query("INSERT INTO display_facet_cache (facet_type, term_id, term_name, count) VALUES (?, ?, ?, ?)")
            .bind(facet_type)
            .bind(term_id)
            .bind(term_name)
            .bind(count)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Insert a thesaurus term, creating the companion table on first use
    pub async fn add_thesaurus_term(&self, id: i64, term: &str) -> Result<()> {
        create_thesaurus_table(&self.pool).await?;
        sqlx::query("INSERT INTO thesaurus_term (id, term) VALUES (?, ?)")
            .bind(id)
            .bind(term)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
