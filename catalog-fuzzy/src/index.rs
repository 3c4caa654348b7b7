//! Phonetic lookup tables over a vocabulary

use crate::phonetic::PhoneticAlgorithm;
use crate::vocabulary::Vocabulary;
use std::collections::HashMap;

/// Soundex and Metaphone codes mapped to the normalized words sharing them
///
/// Phrases are left out; only single words have a meaningful code.
#[derive(Debug, Clone, Default)]
pub struct PhoneticIndex {
    soundex: HashMap<String, Vec<String>>,
    metaphone: HashMap<String, Vec<String>>,
}

impl PhoneticIndex {
    pub fn build(vocabulary: &Vocabulary) -> Self {
        let mut index = Self::default();
        for word in vocabulary.single_words() {
            if let Some(code) = PhoneticAlgorithm::Soundex.encode(&word.normalized) {
                index.soundex.entry(code).or_default().push(word.normalized.clone());
            }
            if let Some(code) = PhoneticAlgorithm::Metaphone.encode(&word.normalized) {
                index.metaphone.entry(code).or_default().push(word.normalized.clone());
            }
        }
        index
    }

    /// Words sharing `code` under `algorithm`, in vocabulary order
    pub fn candidates(&self, algorithm: PhoneticAlgorithm, code: &str) -> &[String] {
        let table = match algorithm {
            PhoneticAlgorithm::Soundex => &self.soundex,
            PhoneticAlgorithm::Metaphone => &self.metaphone,
        };
        table.get(code).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct codes per algorithm
    pub fn code_counts(&self) -> (usize, usize) {
        (self.soundex.len(), self.metaphone.len())
    }
}
