//! Vocabulary loading from the catalog
//!
//! Each source is an independent bulk read. All reads run concurrently and are
//! merged only after every one has finished, in the fixed [`VocabularySource::ALL`]
//! order. A source that cannot be read (table not installed, query failure) is
//! skipped; the rest of the vocabulary is still built.

use crate::vocabulary::Vocabulary;
use catalog_common::catalog::taxonomy;
use catalog_common::config::FuzzySettings;
use catalog_common::Result;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Where vocabulary terms come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VocabularySource {
    /// Term names from the pre-computed facet cache
    FacetCache,
    /// Thesaurus companion table (optional)
    Thesaurus,
    /// Subject, place and genre labels
    TaxonomyTerms,
    /// Authorised names of creators and repositories
    ActorNames,
    /// Sample of record titles, split into words
    RecordTitles,
}

impl VocabularySource {
    /// Every source, in merge order
    pub const ALL: [VocabularySource; 5] = [
        VocabularySource::FacetCache,
        VocabularySource::Thesaurus,
        VocabularySource::TaxonomyTerms,
        VocabularySource::ActorNames,
        VocabularySource::RecordTitles,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VocabularySource::FacetCache => "facet_cache",
            VocabularySource::Thesaurus => "thesaurus",
            VocabularySource::TaxonomyTerms => "taxonomy_terms",
            VocabularySource::ActorNames => "actor_names",
            VocabularySource::RecordTitles => "record_titles",
        }
    }

    /// Read the raw terms of this source
    pub async fn read(&self, pool: &SqlitePool, settings: &FuzzySettings) -> Result<Vec<String>> {
        let terms: Vec<String> = match self {
            VocabularySource::FacetCache => {
                sqlx::query_scalar(
                    "SELECT DISTINCT term_name FROM display_facet_cache
                     WHERE term_name IS NOT NULL AND term_name <> ''
                     ORDER BY term_name",
                )
                .fetch_all(pool)
                .await?
            }
            VocabularySource::Thesaurus => {
                sqlx::query_scalar(
                    "SELECT term FROM thesaurus_term
                     WHERE term IS NOT NULL AND term <> ''
                     ORDER BY id",
                )
                .fetch_all(pool)
                .await?
            }
            VocabularySource::TaxonomyTerms => {
                let faceted = taxonomy::FACETED;
                sqlx::query_scalar(
                    "SELECT ti.name FROM term t
                     JOIN term_i18n ti ON t.id = ti.id AND ti.culture = ?
                     WHERE t.taxonomy_id IN (?, ?, ?) AND ti.name IS NOT NULL
                     ORDER BY t.id",
                )
                .bind(&settings.culture)
                .bind(faceted[0])
                .bind(faceted[1])
                .bind(faceted[2])
                .fetch_all(pool)
                .await?
            }
            VocabularySource::ActorNames => {
                sqlx::query_scalar(
                    "SELECT authorized_form_of_name FROM actor_i18n
                     WHERE culture = ? AND authorized_form_of_name IS NOT NULL
                     ORDER BY id",
                )
                .bind(&settings.culture)
                .fetch_all(pool)
                .await?
            }
            VocabularySource::RecordTitles => {
                sqlx::query_scalar(
                    "SELECT title FROM information_object_i18n
                     WHERE culture = ? AND title IS NOT NULL
                     ORDER BY id
                     LIMIT ?",
                )
                .bind(&settings.culture)
                .bind(settings.title_sample_limit)
                .fetch_all(pool)
                .await?
            }
        };
        Ok(terms)
    }

    fn merge_into(&self, vocabulary: &mut Vocabulary, terms: &[String], min_word_length: usize) {
        for term in terms {
            match self {
                // Titles are sentences; only their words are useful
                VocabularySource::RecordTitles => vocabulary.add_words(term, min_word_length),
                _ => vocabulary.add_term(term, min_word_length),
            }
        }
    }
}

/// Build the vocabulary from every available source
pub async fn load_vocabulary(pool: &SqlitePool, settings: &FuzzySettings) -> Vocabulary {
    let started = Instant::now();

    let reads = VocabularySource::ALL
        .into_iter()
        .map(|source| async move { (source, source.read(pool, settings).await) });
    let results = join_all(reads).await;

    let mut vocabulary = Vocabulary::new();
    let mut skipped = 0usize;

    for (source, result) in results {
        match result {
            Ok(terms) => {
                let before = vocabulary.len();
                source.merge_into(&mut vocabulary, &terms, settings.min_word_length);
                debug!(
                    source = source.as_str(),
                    rows = terms.len(),
                    added = vocabulary.len() - before,
                    "Vocabulary source loaded"
                );
            }
            Err(e) if e.is_missing_table() => {
                skipped += 1;
                warn!(source = source.as_str(), "Vocabulary source not installed, skipping");
            }
            Err(e) => {
                skipped += 1;
                warn!(source = source.as_str(), error = %e, "Vocabulary source failed, skipping");
            }
        }
    }

    info!(
        words = vocabulary.len(),
        skipped_sources = skipped,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Fuzzy vocabulary built"
    );
    vocabulary
}
