//! Fuzzy query correction service

use crate::correction::CorrectionResult;
use crate::corrector::Corrector;
use crate::loader::load_vocabulary;
use crate::vocabulary::Vocabulary;
use catalog_common::config::FuzzySettings;
use sqlx::SqlitePool;
use tokio::sync::OnceCell;
use tracing::debug;

/// Query correction against the catalog's vocabulary
///
/// The vocabulary and its phonetic index are built on the first correction and
/// kept for the lifetime of the instance. Construct a new service to reload.
#[derive(Debug)]
pub struct FuzzySearchService {
    pool: Option<SqlitePool>,
    settings: FuzzySettings,
    corrector: OnceCell<Corrector>,
}

impl FuzzySearchService {
    /// Service that loads its vocabulary from the catalog on first use
    pub fn new(pool: SqlitePool, settings: FuzzySettings) -> Self {
        Self {
            pool: Some(pool),
            settings,
            corrector: OnceCell::new(),
        }
    }

    /// Service over a vocabulary built elsewhere
    pub fn with_vocabulary(vocabulary: Vocabulary, settings: FuzzySettings) -> Self {
        Self {
            pool: None,
            settings,
            corrector: OnceCell::from(Corrector::new(vocabulary)),
        }
    }

    pub fn settings(&self) -> &FuzzySettings {
        &self.settings
    }

    /// True once the vocabulary has been built
    pub fn is_initialized(&self) -> bool {
        self.corrector.initialized()
    }

    async fn corrector(&self) -> &Corrector {
        self.corrector
            .get_or_init(|| async {
                let vocabulary = match &self.pool {
                    Some(pool) => load_vocabulary(pool, &self.settings).await,
                    None => Vocabulary::new(),
                };
                Corrector::new(vocabulary)
            })
            .await
    }

    /// Number of vocabulary entries, building the vocabulary if needed
    pub async fn vocabulary_size(&self) -> usize {
        self.corrector().await.vocabulary().len()
    }

    /// Correct a raw user query
    ///
    /// Blank queries, and every query while correction is disabled, come back
    /// unchanged without touching the vocabulary.
    pub async fn correct_query(&self, raw_query: &str) -> CorrectionResult {
        let query = raw_query.trim();
        if query.is_empty() || !self.settings.enabled {
            return CorrectionResult::unchanged(raw_query);
        }

        let mut result = self.corrector().await.correct(query, &self.settings);
        result.original = raw_query.to_string();
        debug!(
            query = query,
            corrected = ?result.corrected,
            confidence = result.confidence,
            "Query correction"
        );
        result
    }
}
