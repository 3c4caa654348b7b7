//! Correction results

use serde::{Deserialize, Serialize};

/// How a token's replacement was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMethod {
    Levenshtein,
    Soundex,
    Metaphone,
}

impl MatchMethod {
    /// Precedence when methods are used equally often
    pub const PRECEDENCE: [MatchMethod; 3] = [
        MatchMethod::Levenshtein,
        MatchMethod::Soundex,
        MatchMethod::Metaphone,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMethod::Levenshtein => "levenshtein",
            MatchMethod::Soundex => "soundex",
            MatchMethod::Metaphone => "metaphone",
        }
    }
}

/// One replaced token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenCorrection {
    pub original: String,
    pub suggestion: String,
    pub confidence: f64,
    pub method: MatchMethod,
    /// Edit distance, for edit-distance matches only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<usize>,
}

/// Result of correcting a whole query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionResult {
    pub original: String,
    /// Corrected query, only when at least one token changed
    pub corrected: Option<String>,
    /// Mean confidence over evaluated tokens, two decimals
    pub confidence: f64,
    pub corrections: Vec<TokenCorrection>,
    /// Most frequent method among the corrections
    pub method: Option<MatchMethod>,
}

/// What a caller should do with a correction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "query", rename_all = "snake_case")]
pub enum CorrectionOutcome {
    /// Nothing to correct
    Unchanged,
    /// Confident enough to search for the corrected query instead
    AutoCorrected(String),
    /// Offer the corrected query as a suggestion
    DidYouMean(String),
}

impl CorrectionResult {
    /// A result that leaves the query as it is
    pub fn unchanged(original: &str) -> Self {
        Self {
            original: original.to_string(),
            corrected: None,
            confidence: 0.0,
            corrections: Vec::new(),
            method: None,
        }
    }

    pub fn is_corrected(&self) -> bool {
        self.corrected.is_some()
    }

    /// Auto-correct at or above `threshold`, otherwise suggest
    pub fn outcome(&self, threshold: f64) -> CorrectionOutcome {
        match &self.corrected {
            None => CorrectionOutcome::Unchanged,
            Some(query) if self.confidence >= threshold => {
                CorrectionOutcome::AutoCorrected(query.clone())
            }
            Some(query) => CorrectionOutcome::DidYouMean(query.clone()),
        }
    }
}

/// Most frequent method; ties go to the earlier entry of [`MatchMethod::PRECEDENCE`]
pub(crate) fn dominant_method(corrections: &[TokenCorrection]) -> Option<MatchMethod> {
    let mut best: Option<(MatchMethod, usize)> = None;
    for method in MatchMethod::PRECEDENCE {
        let uses = corrections.iter().filter(|c| c.method == method).count();
        if uses > 0 && best.map_or(true, |(_, most)| uses > most) {
            best = Some((method, uses));
        }
    }
    best.map(|(method, _)| method)
}
