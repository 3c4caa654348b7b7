//! Fixed identifiers of the archive catalog schema

/// Sentinel root of the information-object tree; never a real record
pub const ROOT_OBJECT_ID: i64 = 1;

/// `status.type_id` of publication-status rows
pub const PUBLICATION_STATUS_TYPE_ID: i64 = 158;

/// `status.status_id` meaning "published"
pub const PUBLICATION_STATUS_PUBLISHED_ID: i64 = 160;

/// Culture used for labels when none is configured
pub const DEFAULT_CULTURE: &str = "en";

/// Taxonomy ids partitioning controlled terms into classes
pub mod taxonomy {
    pub const SUBJECT: i64 = 35;
    pub const PLACE: i64 = 42;
    pub const GENRE: i64 = 78;

    /// Taxonomies whose labels feed facets and the fuzzy vocabulary
    pub const FACETED: [i64; 3] = [SUBJECT, PLACE, GENRE];
}
