//! Correction vocabulary
//!
//! Maps normalized (trimmed, lower-cased) terms to the display form they were
//! first seen with. Insertion order is kept so that equally good candidates are
//! always resolved the same way.

use std::collections::HashMap;

/// One vocabulary term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabularyWord {
    pub normalized: String,
    pub display: String,
}

impl VocabularyWord {
    /// Whitespace-free entries take part in fuzzy matching; phrases only match exactly
    pub fn is_single_word(&self) -> bool {
        !self.normalized.contains(' ')
    }
}

/// Deduplicated set of known terms
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    words: Vec<VocabularyWord>,
    positions: HashMap<String, usize>,
}

/// Lower-case and collapse whitespace
pub fn normalize(term: &str) -> String {
    term.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Words of `text` with at least `min_length` characters
///
/// Splits on anything but letters, digits and apostrophes; purely numeric words
/// are dropped.
pub fn split_words(text: &str, min_length: usize) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|word| word.trim_matches('\''))
        .filter(move |word| word.chars().count() >= min_length)
        .filter(|word| !word.chars().all(|c| c.is_ascii_digit()))
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Vocabulary of the given terms, phrases contributing their words too
    pub fn from_terms<I, S>(terms: I, min_word_length: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vocabulary = Self::new();
        for term in terms {
            vocabulary.add_term(term.as_ref(), min_word_length);
        }
        vocabulary
    }

    /// Insert one entry; returns false if its normalized form was already known
    pub fn insert(&mut self, display: &str) -> bool {
        let normalized = normalize(display);
        if normalized.is_empty() || self.positions.contains_key(&normalized) {
            return false;
        }

        self.positions.insert(normalized.clone(), self.words.len());
        self.words.push(VocabularyWord {
            normalized,
            display: display.split_whitespace().collect::<Vec<_>>().join(" "),
        });
        true
    }

    /// Insert a source term: the whole phrase, then each of its words
    pub fn add_term(&mut self, term: &str, min_word_length: usize) {
        self.insert(term);
        if term.split_whitespace().nth(1).is_some() || term.contains(['-', '/', ',']) {
            self.add_words(term, min_word_length);
        }
    }

    /// Insert only the individual words of `text`
    pub fn add_words(&mut self, text: &str, min_word_length: usize) {
        for word in split_words(text, min_word_length) {
            self.insert(word);
        }
    }

    pub fn contains(&self, normalized: &str) -> bool {
        self.positions.contains_key(normalized)
    }

    /// Display form of a normalized term
    pub fn display(&self, normalized: &str) -> Option<&str> {
        self.positions
            .get(normalized)
            .map(|&i| self.words[i].display.as_str())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VocabularyWord> {
        self.words.iter()
    }

    pub fn single_words(&self) -> impl Iterator<Item = &VocabularyWord> {
        self.words.iter().filter(|w| w.is_single_word())
    }
}
