//! catalog-browse library - read-only browse service
//!
//! Exposes the facet count engine and the fuzzy query correction service over HTTP.

use std::sync::Arc;

use axum::Router;
use catalog_common::config::CatalogConfig;
use catalog_facets::FacetEngine;
use catalog_fuzzy::FuzzySearchService;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;

pub mod api;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub facets: FacetEngine,
    /// Holds the vocabulary once built, so it is shared rather than cloned
    pub fuzzy: Arc<FuzzySearchService>,
    pub config: Arc<CatalogConfig>,
}

impl AppState {
    /// Create application state from a read-only catalog pool and configuration
    pub fn new(db: SqlitePool, config: CatalogConfig) -> Self {
        let facets = FacetEngine::new(db.clone(), config.facets.clone());
        let fuzzy = Arc::new(FuzzySearchService::new(db, config.fuzzy.clone()));
        Self {
            facets,
            fuzzy,
            config: Arc::new(config),
        }
    }

    /// Visibility of unpublished records for every request
    pub fn is_authenticated(&self) -> bool {
        self.config.browse.assume_authenticated
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    let api = Router::new()
        .route("/api/facets", get(api::get_facet_rail))
        .route("/api/facets/:dimension", get(api::get_facet_list))
        .route("/api/correct", get(api::correct_query))
        .route("/api/browse", get(api::browse));

    Router::new()
        .merge(api)
        .merge(api::health_routes())
        .with_state(state)
        .layer(CorsLayer::permissive())
}
