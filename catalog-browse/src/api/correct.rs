//! Query correction endpoint

use axum::{
    extract::{Query, State},
    Json,
};
use catalog_fuzzy::{CorrectionOutcome, CorrectionResult};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Query parameters for correction
#[derive(Debug, Deserialize)]
pub struct CorrectQuery {
    #[serde(default)]
    pub q: String,
}

/// Correction with the outcome the configured threshold gives it
#[derive(Debug, Serialize)]
pub struct CorrectResponse {
    #[serde(flatten)]
    pub result: CorrectionResult,
    pub outcome: CorrectionOutcome,
}

/// GET /api/correct?q=...
///
/// Never fails: an empty query or an empty vocabulary leaves the query unchanged.
pub async fn correct_query(
    State(state): State<AppState>,
    Query(query): Query<CorrectQuery>,
) -> Json<CorrectResponse> {
    let result = state.fuzzy.correct_query(&query.q).await;
    let outcome = result.outcome(state.fuzzy.settings().auto_correct_threshold);
    Json(CorrectResponse { result, outcome })
}
