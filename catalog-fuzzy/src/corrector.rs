//! Token-level query correction
//!
//! Each whitespace token is tried, in order, as an exact vocabulary hit, an
//! edit-distance match, a Soundex match and a Metaphone match. Edit distance
//! goes first: it ranks near-miss typos precisely, and the phonetic keys only
//! pick up misspellings that change the letters but keep the sound.

use crate::correction::{dominant_method, CorrectionResult, MatchMethod, TokenCorrection};
use crate::index::PhoneticIndex;
use crate::phonetic::PhoneticAlgorithm;
use crate::vocabulary::Vocabulary;
use catalog_common::config::FuzzySettings;

/// Largest edit distance accepted for a token of `length` characters
pub fn max_edit_distance(length: usize) -> usize {
    if length <= 5 {
        2
    } else {
        3
    }
}

/// Tokens never corrected: two characters or fewer, or all digits
pub fn is_passthrough_token(token: &str) -> bool {
    token.chars().count() <= 2 || token.chars().all(|c| c.is_ascii_digit())
}

/// Closest single word to `token` within [`max_edit_distance`]
///
/// `token` is normalized. Equal distances keep the earlier vocabulary word.
pub fn closest_by_edit_distance<'v>(
    token: &str,
    vocabulary: &'v Vocabulary,
) -> Option<(&'v str, usize)> {
    let length = token.chars().count();
    let max_distance = max_edit_distance(length);
    let mut best: Option<(&str, usize)> = None;

    for word in vocabulary.single_words() {
        // Length difference alone is a lower bound on the distance
        if word.normalized.chars().count().abs_diff(length) > max_distance {
            continue;
        }
        let distance = strsim::levenshtein(token, &word.normalized);
        if distance == 0 || distance > max_distance {
            continue;
        }
        if best.map_or(true, |(_, closest)| distance < closest) {
            best = Some((word.normalized.as_str(), distance));
        }
    }
    best
}

/// Sound-alike word of `token` under `algorithm`, closest by edit distance
pub fn closest_phonetic<'i>(
    token: &str,
    algorithm: PhoneticAlgorithm,
    index: &'i PhoneticIndex,
) -> Option<&'i str> {
    let code = algorithm.encode(token)?;
    index
        .candidates(algorithm, &code)
        .iter()
        .filter(|candidate| candidate.as_str() != token)
        .min_by_key(|candidate| strsim::levenshtein(token, candidate))
        .map(String::as_str)
}

/// Vocabulary with its phonetic index, ready to correct queries
#[derive(Debug, Clone, Default)]
pub struct Corrector {
    vocabulary: Vocabulary,
    phonetic: PhoneticIndex,
}

impl Corrector {
    pub fn new(vocabulary: Vocabulary) -> Self {
        let phonetic = PhoneticIndex::build(&vocabulary);
        Self {
            vocabulary,
            phonetic,
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Correct every token of `query`
    ///
    /// Overall confidence averages over evaluated tokens: exact hits count 1.0,
    /// corrections their own confidence, unmatched tokens nothing. Tokens passed
    /// through untouched are not evaluated.
    pub fn correct(&self, query: &str, settings: &FuzzySettings) -> CorrectionResult {
        let mut output: Vec<String> = Vec::new();
        let mut corrections = Vec::new();
        let mut total = 0.0;
        let mut evaluated = 0usize;

        for token in query.split_whitespace() {
            if is_passthrough_token(token) {
                output.push(token.to_string());
                continue;
            }
            evaluated += 1;

            let normalized = token.to_lowercase();
            if self.vocabulary.contains(&normalized) {
                total += 1.0;
                output.push(token.to_string());
                continue;
            }

            match self.best_match(token, &normalized, settings) {
                Some(correction) => {
                    total += correction.confidence;
                    output.push(correction.suggestion.clone());
                    corrections.push(correction);
                }
                None => output.push(token.to_string()),
            }
        }

        let confidence = if evaluated == 0 {
            0.0
        } else {
            round2(total / evaluated as f64)
        };
        let corrected = (!corrections.is_empty()).then(|| output.join(" "));
        let method = dominant_method(&corrections);

        CorrectionResult {
            original: query.to_string(),
            corrected,
            confidence,
            corrections,
            method,
        }
    }

    fn best_match(
        &self,
        token: &str,
        normalized: &str,
        settings: &FuzzySettings,
    ) -> Option<TokenCorrection> {
        if let Some((word, distance)) = closest_by_edit_distance(normalized, &self.vocabulary) {
            let length = normalized.chars().count() as f64;
            let confidence =
                (1.0 - distance as f64 / length).max(settings.min_levenshtein_confidence);
            return Some(self.token_correction(
                token,
                word,
                confidence,
                MatchMethod::Levenshtein,
                Some(distance),
            ));
        }

        let phonetic = [
            (PhoneticAlgorithm::Soundex, MatchMethod::Soundex, settings.soundex_confidence),
            (PhoneticAlgorithm::Metaphone, MatchMethod::Metaphone, settings.metaphone_confidence),
        ];
        phonetic.into_iter().find_map(|(algorithm, method, confidence)| {
            closest_phonetic(normalized, algorithm, &self.phonetic)
                .map(|word| self.token_correction(token, word, confidence, method, None))
        })
    }

    fn token_correction(
        &self,
        token: &str,
        word: &str,
        confidence: f64,
        method: MatchMethod,
        distance: Option<usize>,
    ) -> TokenCorrection {
        let suggestion = self.vocabulary.display(word).unwrap_or(word).to_string();
        TokenCorrection {
            original: token.to_string(),
            suggestion,
            confidence,
            method,
            distance,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corrector(terms: &[&str]) -> Corrector {
        Corrector::new(Vocabulary::from_terms(terms.iter().copied(), 3))
    }

    #[test]
    fn test_max_edit_distance_by_length() {
        assert_eq!(max_edit_distance(3), 2);
        assert_eq!(max_edit_distance(5), 2);
        assert_eq!(max_edit_distance(6), 3);
    }

    #[test]
    fn test_passthrough_tokens() {
        assert!(is_passthrough_token("of"));
        assert!(is_passthrough_token("a"));
        assert!(is_passthrough_token("1914"));
        assert!(!is_passthrough_token("war"));
        assert!(!is_passthrough_token("1914s"));
    }

    #[test]
    fn test_edit_distance_prefers_closest_then_first() {
        let vocabulary = Vocabulary::from_terms(["cart", "card", "chart"], 3);
        // "cars" is one edit from both "cart" and "card"
        assert_eq!(closest_by_edit_distance("cars", &vocabulary), Some(("cart", 1)));
        assert_eq!(closest_by_edit_distance("chart", &vocabulary), Some(("cart", 1)));
    }

    #[test]
    fn test_edit_distance_respects_maximum() {
        let vocabulary = Vocabulary::from_terms(["photographer"], 3);
        assert_eq!(closest_by_edit_distance("fotograph", &vocabulary), None);
    }

    #[test]
    fn test_edit_distance_skips_phrases() {
        let vocabulary = Vocabulary::from_terms(["new york"], 3);
        assert_eq!(closest_by_edit_distance("new yrk", &vocabulary), None);
    }

    #[test]
    fn test_levenshtein_correction() {
        let result = corrector(&["archive"]).correct("arhive", &FuzzySettings::default());

        assert_eq!(result.corrected.as_deref(), Some("archive"));
        assert_eq!(result.method, Some(MatchMethod::Levenshtein));
        assert_eq!(result.confidence, 0.83);
        assert_eq!(result.corrections[0].distance, Some(1));
    }

    #[test]
    fn test_soundex_fallback() {
        let result = corrector(&["Bryce"]).correct("burks", &FuzzySettings::default());

        assert_eq!(result.corrected.as_deref(), Some("Bryce"));
        assert_eq!(result.method, Some(MatchMethod::Soundex));
        assert_eq!(result.confidence, 0.6);
        assert_eq!(result.corrections[0].distance, None);
    }

    #[test]
    fn test_metaphone_fallback() {
        let result = corrector(&["knight"]).correct("nite", &FuzzySettings::default());

        assert_eq!(result.corrected.as_deref(), Some("knight"));
        assert_eq!(result.method, Some(MatchMethod::Metaphone));
        assert_eq!(result.confidence, 0.5);
    }

    #[test]
    fn test_unmatched_token_lowers_confidence() {
        let result = corrector(&["archive", "maps"]).correct("arhive zzzzzz", &FuzzySettings::default());

        assert_eq!(result.corrected.as_deref(), Some("archive zzzzzz"));
        // (0.8333 + 0.0) / 2
        assert_eq!(result.confidence, 0.42);
    }

    #[test]
    fn test_exact_tokens_keep_user_casing() {
        let result = corrector(&["archive", "maps"]).correct("MAPS arhive", &FuzzySettings::default());

        assert_eq!(result.corrected.as_deref(), Some("MAPS archive"));
        // (1.0 + 0.8333) / 2
        assert_eq!(result.confidence, 0.92);
    }

    #[test]
    fn test_only_passthrough_tokens() {
        let result = corrector(&["archive"]).correct("of 42", &FuzzySettings::default());
        assert_eq!(result.corrected, None);
        assert_eq!(result.confidence, 0.0);
        assert!(result.corrections.is_empty());
    }

    #[test]
    fn test_confidence_floor() {
        let settings = FuzzySettings {
            min_levenshtein_confidence: 0.4,
            ..FuzzySettings::default()
        };
        // distance 2 over 3 characters: 1 - 2/3 is below the floor
        let result = corrector(&["bat"]).correct("dot", &settings);
        assert_eq!(result.corrections[0].confidence, 0.4);
    }
}
