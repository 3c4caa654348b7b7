//! Facet count endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use catalog_facets::{FacetDimension, FacetEntry, FacetRail};
use serde::Serialize;

use super::{ApiError, BrowseParams};
use crate::AppState;

/// One dimension's counts
#[derive(Debug, Serialize)]
pub struct FacetListResponse {
    pub dimension: String,
    pub entries: Vec<FacetEntry>,
}

/// GET /api/facets?<filters>
///
/// All eight facet lists. Unfiltered requests may be served from the facet cache.
pub async fn get_facet_rail(
    State(state): State<AppState>,
    Query(params): Query<BrowseParams>,
) -> Result<Json<FacetRail>, ApiError> {
    let filters = params.to_filter_set(state.is_authenticated())?;
    Ok(Json(state.facets.browse_rail(&filters).await))
}

/// GET /api/facets/:dimension?<filters>
///
/// Counts for one dimension under every other active filter. An unknown
/// dimension yields an empty list.
pub async fn get_facet_list(
    State(state): State<AppState>,
    Path(dimension): Path<String>,
    Query(params): Query<BrowseParams>,
) -> Result<Json<FacetListResponse>, ApiError> {
    let filters = params.to_filter_set(state.is_authenticated())?;
    let entries = state.facets.counts_by_name(&filters, &dimension).await?;

    let dimension = FacetDimension::parse(&dimension)
        .map(|d| d.as_str().to_string())
        .unwrap_or(dimension);

    Ok(Json(FacetListResponse { dimension, entries }))
}
