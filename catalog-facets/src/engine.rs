//! Facet count orchestration
//!
//! Runs the per-dimension count queries against the catalog. Dimensions are
//! independent read-only queries, so [`FacetEngine::compute_all`] issues all eight
//! concurrently and records each success or failure on its own.

use crate::dimension::{FacetDimension, ValueKind};
use crate::filters::FilterSet;
use crate::query::{build_query, FacetQuery, SqlValue};
use crate::result::{rank_entries, FacetEntry, FacetFailure, FacetList, FacetRail, FacetValue, RailSource};
use catalog_common::config::FacetSettings;
use catalog_common::Result;
use futures::future::join_all;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::time::Instant;
use tracing::{debug, warn};

/// Suffix of facet-cache rows computed over unpublished records too
const AUTHENTICATED_CACHE_SUFFIX: &str = "_all";

/// Disjunctive facet counter over one catalog
#[derive(Debug, Clone)]
pub struct FacetEngine {
    pool: SqlitePool,
    settings: FacetSettings,
}

impl FacetEngine {
    pub fn new(pool: SqlitePool, settings: FacetSettings) -> Self {
        Self { pool, settings }
    }

    pub fn settings(&self) -> &FacetSettings {
        &self.settings
    }

    /// Counts for one dimension under every active filter except its own
    pub async fn compute_facet_counts(
        &self,
        filters: &FilterSet,
        dimension: FacetDimension,
    ) -> Result<Vec<FacetEntry>> {
        let started = Instant::now();
        let query = FacetQuery::new(filters, dimension, self.settings.limit, &self.settings.culture);
        let (sql, binds) = query.to_sql();
        debug!(dimension = %dimension, sql = %sql, binds = binds.len(), "Facet count query");

        let rows = self.fetch_rows(&sql, &binds).await?;
        let entries = rows
            .iter()
            .map(|row| decode_entry(row, dimension))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            dimension = %dimension,
            values = entries.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Facet counts computed"
        );
        Ok(entries)
    }

    /// Counts for a dimension given by name; unknown names yield no entries
    pub async fn counts_by_name(&self, filters: &FilterSet, name: &str) -> Result<Vec<FacetEntry>> {
        match FacetDimension::parse(name) {
            Some(dimension) => self.compute_facet_counts(filters, dimension).await,
            None => {
                debug!(dimension = name, "Unknown facet dimension");
                Ok(Vec::new())
            }
        }
    }

    /// Dynamic counts for all eight dimensions, computed concurrently
    pub async fn compute_all(&self, filters: &FilterSet) -> FacetRail {
        let futures = FacetDimension::ALL.into_iter().map(|dimension| async move {
            (dimension, self.compute_facet_counts(filters, dimension).await)
        });

        let mut rail = FacetRail::default();
        for (dimension, outcome) in join_all(futures).await {
            match outcome {
                Ok(entries) => rail.facets.push(FacetList {
                    dimension,
                    source: RailSource::Dynamic,
                    entries,
                }),
                Err(e) => {
                    warn!(dimension = %dimension, error = %e, "Facet count failed");
                    rail.failures.push(FacetFailure {
                        dimension,
                        error: e.to_string(),
                    });
                }
            }
        }
        rail
    }

    /// Pre-computed counts for one dimension from `display_facet_cache`
    ///
    /// Empty when the cache has no rows for the dimension. Rows with a zero count
    /// are skipped.
    pub async fn cached_counts(
        &self,
        dimension: FacetDimension,
        authenticated: bool,
    ) -> Result<Vec<FacetEntry>> {
        let facet_type = if authenticated {
            format!("{}{}", dimension.as_str(), AUTHENTICATED_CACHE_SUFFIX)
        } else {
            dimension.as_str().to_string()
        };

        let rows = sqlx::query(
            "SELECT term_id, term_name, count FROM display_facet_cache
             WHERE facet_type = ? AND count > 0
             ORDER BY count DESC, term_name ASC
             LIMIT ?",
        )
        .bind(&facet_type)
        .bind(self.settings.limit as i64)
        .fetch_all(&self.pool)
        .await?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in &rows {
            let term_id: Option<i64> = row.try_get("term_id")?;
            let name: Option<String> = row.try_get("term_name")?;
            let count: i64 = row.try_get("count")?;
            let label = name.unwrap_or_default();

            // Key dimensions cache their key as the name
            let value = match (dimension.value_kind(), term_id) {
                (ValueKind::Id, Some(id)) => FacetValue::Id(id),
                (ValueKind::Id, None) => continue,
                (ValueKind::Key, _) => FacetValue::Key(label.clone()),
            };
            entries.push(FacetEntry { value, label, count });
        }

        rank_entries(&mut entries, self.settings.limit);
        Ok(entries)
    }

    /// Facet rail for a browse request
    ///
    /// Unfiltered requests read each dimension from the facet cache, falling back to
    /// the dynamic query when the cache is empty or unavailable for that dimension.
    /// Any narrowing filter makes every dimension dynamic.
    pub async fn browse_rail(&self, filters: &FilterSet) -> FacetRail {
        if !filters.is_unfiltered() {
            return self.compute_all(filters).await;
        }

        let futures = FacetDimension::ALL.into_iter().map(|dimension| async move {
            (dimension, self.cached_or_dynamic(filters, dimension).await)
        });

        let mut rail = FacetRail::default();
        for (dimension, outcome) in join_all(futures).await {
            match outcome {
                Ok(list) => rail.facets.push(list),
                Err(e) => {
                    warn!(dimension = %dimension, error = %e, "Facet count failed");
                    rail.failures.push(FacetFailure {
                        dimension,
                        error: e.to_string(),
                    });
                }
            }
        }
        rail
    }

    async fn cached_or_dynamic(
        &self,
        filters: &FilterSet,
        dimension: FacetDimension,
    ) -> Result<FacetList> {
        match self.cached_counts(dimension, filters.is_authenticated).await {
            Ok(entries) if !entries.is_empty() => {
                return Ok(FacetList {
                    dimension,
                    source: RailSource::Cached,
                    entries,
                })
            }
            Ok(_) => debug!(dimension = %dimension, "Facet cache empty, computing dynamically"),
            Err(e) => debug!(dimension = %dimension, error = %e, "Facet cache unavailable"),
        }

        let entries = self.compute_facet_counts(filters, dimension).await?;
        Ok(FacetList {
            dimension,
            source: RailSource::Dynamic,
            entries,
        })
    }

    /// Number of distinct records matching every active filter
    pub async fn count_records(&self, filters: &FilterSet) -> Result<i64> {
        let (sql, binds) = build_query(filters, None, &self.settings.culture).count_sql();
        debug!(sql = %sql, "Record count query");

        let rows = self.fetch_rows(&sql, &binds).await?;
        match rows.first() {
            Some(row) => Ok(row.try_get("hit_count")?),
            None => Ok(0),
        }
    }

    async fn fetch_rows(&self, sql: &str, binds: &[SqlValue]) -> Result<Vec<SqliteRow>> {
        let mut query = sqlx::query(sql);
        for value in binds {
            query = match value {
                SqlValue::Int(v) => query.bind(*v),
                SqlValue::Text(s) => query.bind(s.as_str()),
            };
        }
        Ok(query.fetch_all(&self.pool).await?)
    }
}

fn decode_entry(row: &SqliteRow, dimension: FacetDimension) -> Result<FacetEntry> {
    let count: i64 = row.try_get("hit_count")?;
    let label: Option<String> = row.try_get("label")?;

    let value = match dimension.value_kind() {
        ValueKind::Id => FacetValue::Id(row.try_get("value_id")?),
        ValueKind::Key => FacetValue::Key(row.try_get("value_id")?),
    };

    let label = label.unwrap_or_else(|| value.to_string());
    Ok(FacetEntry { value, label, count })
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_common::db::{open_in_memory, CatalogSeeder, RecordSeed};

    async fn engine_with_records() -> FacetEngine {
        let pool = open_in_memory().await.unwrap();
        let seeder = CatalogSeeder::new(&pool);
        seeder.insert_root().await.unwrap();
        seeder.insert_actor(100, "Ada Archivist").await.unwrap();
        for id in 2..=4 {
            seeder
                .insert_record(&RecordSeed::new(id).title("Letter"))
                .await
                .unwrap();
            seeder.add_creator(id, 100).await.unwrap();
        }
        FacetEngine::new(pool, FacetSettings::default())
    }

    #[tokio::test]
    async fn test_unknown_dimension_name_is_empty() {
        let engine = engine_with_records().await;
        let entries = engine
            .counts_by_name(&FilterSet::default(), "colour")
            .await
            .unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_count_records_excludes_root() {
        let engine = engine_with_records().await;
        assert_eq!(engine.count_records(&FilterSet::default()).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_creator_counts() {
        let engine = engine_with_records().await;
        let entries = engine
            .compute_facet_counts(&FilterSet::default(), FacetDimension::Creator)
            .await
            .unwrap();
        assert_eq!(
            entries,
            vec![FacetEntry {
                value: FacetValue::Id(100),
                label: "Ada Archivist".to_string(),
                count: 3,
            }]
        );
    }
}
