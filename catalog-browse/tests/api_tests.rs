//! Integration tests for catalog-browse API endpoints
//!
//! Tests cover:
//! - Health endpoint
//! - Facet rail and single-dimension counts, with parameter validation
//! - Query correction
//! - Combined browse flow (auto-correct, did-you-mean, correction disabled)
//! - Top-level default, facet cache use and word-by-word (semantic) queries
//! - Visibility of unpublished records

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use catalog_browse::{build_router, AppState};
use catalog_common::catalog::taxonomy;
use catalog_common::config::CatalogConfig;
use catalog_common::db::{open_in_memory, CatalogSeeder, RecordSeed};
use serde_json::Value;
use sqlx::SqlitePool;
use tower::util::ServiceExt; // for `oneshot` method

const FONDS: i64 = 200;
const PHOTOGRAPHS: i64 = 300;

/// Test helper: Three records at the fonds level, one unpublished
///
/// | id | title               | creator | subject     | type    | digital    |
/// |----|---------------------|---------|-------------|---------|------------|
/// | 2  | Harbour photographs | Ada     | Photographs | archive | image/jpeg |
/// | 3  | Lighthouse keepers  |         | Photographs | museum  |            |
/// | 4  | Draft notes         |         |             |         | (unpub.)   |
async fn setup_test_db() -> SqlitePool {
    let pool = open_in_memory().await.expect("Should open catalog");
    let s = CatalogSeeder::new(&pool);

    s.insert_root().await.unwrap();
    s.insert_actor(100, "Ada Lovelace").await.unwrap();
    s.insert_repository(500, "Harbour Archive").await.unwrap();
    s.insert_term(FONDS, 34, "Fonds").await.unwrap();
    s.insert_term(PHOTOGRAPHS, taxonomy::SUBJECT, "Photographs").await.unwrap();

    s.insert_record(
        &RecordSeed::new(2)
            .title("Harbour photographs")
            .level(FONDS)
            .repository(500)
            .object_type("archive"),
    )
    .await
    .unwrap();
    s.insert_record(
        &RecordSeed::new(3)
            .title("Lighthouse keepers")
            .level(FONDS)
            .object_type("museum"),
    )
    .await
    .unwrap();
    s.insert_record(&RecordSeed::new(4).title("Draft notes").level(FONDS).unpublished())
        .await
        .unwrap();

    s.add_creator(2, 100).await.unwrap();
    s.add_term(2, PHOTOGRAPHS).await.unwrap();
    s.add_term(3, PHOTOGRAPHS).await.unwrap();
    s.add_digital_object(10, 2, None, "image/jpeg").await.unwrap();

    pool
}

/// Test helper: Create app over the test catalog
fn setup_app(db: SqlitePool, config: CatalogConfig) -> axum::Router {
    build_router(AppState::new(db, config))
}

async fn default_app() -> axum::Router {
    setup_app(setup_test_db().await, CatalogConfig::default())
}

fn test_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app.oneshot(test_request(uri)).await.unwrap();
    let status = response.status();
    (status, extract_json(response.into_body()).await)
}

/// Facet list of one dimension from a serialized rail
fn rail_entries<'a>(rail: &'a Value, dimension: &str) -> &'a Vec<Value> {
    rail["facets"]
        .as_array()
        .unwrap()
        .iter()
        .find(|list| list["dimension"] == dimension)
        .unwrap_or_else(|| panic!("no {} list", dimension))["entries"]
        .as_array()
        .unwrap()
}

fn level_list(rail: &Value) -> &Value {
    rail["facets"]
        .as_array()
        .unwrap()
        .iter()
        .find(|list| list["dimension"] == "level")
        .expect("level list")
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (status, body) = get_json(default_app().await, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "catalog-browse");
    assert!(body["version"].is_string());
}

// =============================================================================
// Facets
// =============================================================================

#[tokio::test]
async fn test_facet_rail_unfiltered() {
    let (status, body) = get_json(default_app().await, "/api/facets").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["facets"].as_array().unwrap().len(), 8);
    assert!(body["failures"].as_array().unwrap().is_empty());

    // Top-level browsing is counted live; record 4 is unpublished
    let level = rail_entries(&body, "level");
    assert_eq!(level.len(), 1);
    assert_eq!(level[0]["value"], FONDS);
    assert_eq!(level[0]["label"], "Fonds");
    assert_eq!(level[0]["count"], 2);

    let media = rail_entries(&body, "media_type");
    assert_eq!(media[0]["value"], "image");
    assert_eq!(media[0]["count"], 1);
}

#[tokio::test]
async fn test_facet_rail_applies_other_filters() {
    let (status, body) = get_json(default_app().await, "/api/facets?creator=100").await;
    assert_eq!(status, StatusCode::OK);

    let subject = rail_entries(&body, "subject");
    assert_eq!(subject[0]["value"], PHOTOGRAPHS);
    assert_eq!(subject[0]["count"], 1);

    // The creator list ignores its own selection
    let creator = rail_entries(&body, "creator");
    assert_eq!(creator[0]["label"], "Ada Lovelace");
    assert_eq!(creator[0]["count"], 1);
}

#[tokio::test]
async fn test_single_facet_ignores_own_selection() {
    let (status, body) =
        get_json(default_app().await, "/api/facets/glam_type?type=museum").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dimension"], "glam_type");

    let entries = body["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["value"], "archive");
    assert_eq!(entries[1]["value"], "museum");
}

#[tokio::test]
async fn test_single_facet_alias_and_unknown() {
    let (status, body) = get_json(default_app().await, "/api/facets/collection-type").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dimension"], "glam_type");

    let (status, body) = get_json(default_app().await, "/api/facets/colour").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dimension"], "colour");
    assert!(body["entries"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_parameters_rejected() {
    for uri in [
        "/api/facets?creator=abc",
        "/api/facets/subject?startDate=yesterday",
        "/api/browse?hasDigital=perhaps",
    ] {
        let (status, body) = get_json(default_app().await, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn test_unpublished_visible_when_authenticated() {
    let mut config = CatalogConfig::default();
    config.browse.assume_authenticated = true;
    let app = setup_app(setup_test_db().await, config);

    let (_, body) = get_json(app, "/api/facets/level").await;
    assert_eq!(body["entries"][0]["count"], 3);
}

#[tokio::test]
async fn test_top_level_browsing_by_default() {
    let pool = setup_test_db().await;
    let s = CatalogSeeder::new(&pool);
    s.insert_record(&RecordSeed::new(5).parent(2).title("Harbour plates").level(FONDS))
        .await
        .unwrap();
    s.add_facet_cache("level", Some(FONDS), "Fonds", 9).await.unwrap();

    let app = || setup_app(pool.clone(), CatalogConfig::default());

    let (_, body) = get_json(app(), "/api/facets/level").await;
    assert_eq!(body["entries"][0]["count"], 2);

    for uri in ["/api/facets/level?topLevel=0", "/api/facets/level?topLevelOnly=0"] {
        let (_, body) = get_json(app(), uri).await;
        assert_eq!(body["entries"][0]["count"], 3, "{}", uri);
    }

    let (_, body) = get_json(app(), "/api/facets/level?parent=2").await;
    assert_eq!(body["entries"][0]["count"], 1);

    // The facet cache counts the whole tree and only serves whole-tree browsing
    let (_, body) = get_json(app(), "/api/facets").await;
    let level = level_list(&body);
    assert_eq!(level["source"], "dynamic");
    assert_eq!(level["entries"][0]["count"], 2);

    let (_, body) = get_json(app(), "/api/facets?topLevel=0").await;
    let level = level_list(&body);
    assert_eq!(level["source"], "cached");
    assert_eq!(level["entries"][0]["count"], 9);
}

#[tokio::test]
async fn test_semantic_query_matches_any_word() {
    let (_, body) = get_json(
        default_app().await,
        "/api/facets/glam_type?query=harbour%20keepers",
    )
    .await;
    assert!(body["entries"].as_array().unwrap().is_empty());

    let (_, body) = get_json(
        default_app().await,
        "/api/facets/glam_type?query=harbour%20keepers&semantic=1",
    )
    .await;
    let entries = body["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["count"], 1);
    assert_eq!(entries[1]["count"], 1);

    let (_, body) = get_json(
        default_app().await,
        "/api/browse?query=harbour%20keepers&noCorrect=1",
    )
    .await;
    assert_eq!(body["total"], 0);

    let (_, body) = get_json(
        default_app().await,
        "/api/browse?query=harbour%20keepers&noCorrect=1&semantic=1",
    )
    .await;
    assert_eq!(body["total"], 2);
}

#[tokio::test]
async fn test_semantic_query_uses_corrected_words() {
    let (status, body) = get_json(
        default_app().await,
        "/api/browse?query=harbour%20keeprs&semantic=1",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"]["kind"], "auto_corrected");
    assert_eq!(body["query"], "harbour keepers");
    assert_eq!(body["total"], 2);
}

// =============================================================================
// Correction
// =============================================================================

#[tokio::test]
async fn test_correct_endpoint() {
    let (status, body) = get_json(default_app().await, "/api/correct?q=lighthouse%20keeprs").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["original"], "lighthouse keeprs");
    assert_eq!(body["corrected"], "lighthouse keepers");
    assert_eq!(body["method"], "levenshtein");
    assert_eq!(body["outcome"]["kind"], "auto_corrected");
    assert_eq!(body["corrections"][0]["suggestion"], "keepers");
}

#[tokio::test]
async fn test_correct_empty_query() {
    let (status, body) = get_json(default_app().await, "/api/correct").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["corrected"].is_null());
    assert_eq!(body["outcome"]["kind"], "unchanged");
}

// =============================================================================
// Browse
// =============================================================================

#[tokio::test]
async fn test_browse_auto_corrects_query() {
    let (status, body) =
        get_json(default_app().await, "/api/browse?query=lighthouse%20keeprs").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query"], "lighthouse keepers");
    assert_eq!(body["outcome"]["kind"], "auto_corrected");
    assert_eq!(body["total"], 1);
    assert_eq!(rail_entries(&body["facets"], "glam_type")[0]["value"], "museum");
}

#[tokio::test]
async fn test_browse_suggests_weak_correction() {
    // One edit over nine characters stays below the auto-correct threshold
    let (status, body) = get_json(default_app().await, "/api/browse?query=lighthous").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query"], "lighthous");
    assert_eq!(body["outcome"]["kind"], "did_you_mean");
    assert_eq!(body["outcome"]["query"], "Lighthouse");
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn test_browse_without_correction() {
    let (status, body) = get_json(
        default_app().await,
        "/api/browse?query=lighthouse%20keeprs&noCorrect=1",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query"], "lighthouse keeprs");
    assert!(body.get("correction").is_none());
    assert_eq!(body["outcome"]["kind"], "unchanged");
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn test_browse_without_query() {
    let (status, body) = get_json(default_app().await, "/api/browse?hasDigital=1").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["query"].is_null());
    assert_eq!(body["total"], 1);
    assert_eq!(rail_entries(&body["facets"], "repository")[0]["label"], "Harbour Archive");
}
