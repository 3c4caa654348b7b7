//! Combined browse flow
//!
//! Corrects the free-text query, then computes the facet rail and the total hit
//! count under the effective filters.

use axum::{
    extract::{Query, State},
    Json,
};
use catalog_facets::FacetRail;
use catalog_fuzzy::{CorrectionOutcome, CorrectionResult};
use serde::Serialize;
use tracing::info;

use super::params::split_query_terms;
use super::{ApiError, BrowseParams};
use crate::AppState;

/// Browse response
#[derive(Debug, Serialize)]
pub struct BrowseResponse {
    /// Query the counts were computed for
    pub query: Option<String>,
    /// Correction attempted on the submitted query
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correction: Option<CorrectionResult>,
    pub outcome: CorrectionOutcome,
    /// Records matching every active filter
    pub total: i64,
    pub facets: FacetRail,
}

/// GET /api/browse?<filters>&noCorrect=1
///
/// Auto-corrections replace the query before counting; weaker corrections are
/// returned as a suggestion and the submitted query is counted as is. With
/// `semantic=1` any word of the effective query matches.
pub async fn browse(
    State(state): State<AppState>,
    Query(params): Query<BrowseParams>,
) -> Result<Json<BrowseResponse>, ApiError> {
    let mut filters = params.to_filter_set(state.is_authenticated())?;

    let mut correction = None;
    let mut outcome = CorrectionOutcome::Unchanged;
    if !params.skip_correction()? {
        if let Some(query) = filters.query.clone() {
            let result = state.fuzzy.correct_query(&query).await;
            outcome = result.outcome(state.fuzzy.settings().auto_correct_threshold);
            if let CorrectionOutcome::AutoCorrected(corrected) = &outcome {
                info!("Auto-corrected query '{}' to '{}'", query, corrected);
                filters.query = Some(corrected.clone());
                if filters.query_terms.is_some() {
                    filters.query_terms = Some(split_query_terms(corrected));
                }
            }
            correction = Some(result);
        }
    }

    let (facets, total) = tokio::join!(
        state.facets.browse_rail(&filters),
        state.facets.count_records(&filters),
    );

    Ok(Json(BrowseResponse {
        query: filters.query,
        correction,
        outcome,
        total: total?,
        facets,
    }))
}
