//! # Catalog Fuzzy
//!
//! Typo correction for catalog search queries. Each query token is matched
//! against a vocabulary drawn from the catalog (facet terms, thesaurus, taxonomy
//! labels, creator names and record titles), first by edit distance and then by
//! Soundex and Metaphone codes.

pub mod correction;
pub mod corrector;
pub mod index;
pub mod loader;
pub mod phonetic;
pub mod service;
pub mod vocabulary;

pub use correction::{CorrectionOutcome, CorrectionResult, MatchMethod, TokenCorrection};
pub use corrector::Corrector;
pub use loader::{load_vocabulary, VocabularySource};
pub use phonetic::{metaphone, soundex, PhoneticAlgorithm};
pub use service::FuzzySearchService;
pub use vocabulary::Vocabulary;
