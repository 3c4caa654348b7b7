//! Facet dimensions

use catalog_common::catalog::taxonomy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the eight classification axes a browse request can be narrowed by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetDimension {
    Creator,
    Subject,
    Place,
    Genre,
    Level,
    MediaType,
    Repository,
    /// Collection type (GLAM sector: archive, library, museum, gallery, ...)
    GlamType,
}

/// How a dimension identifies its values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Numeric row id (actor, term, repository)
    Id,
    /// Free string key (object type, mime-type prefix)
    Key,
}

impl FacetDimension {
    /// Every dimension, in rail display order
    pub const ALL: [FacetDimension; 8] = [
        FacetDimension::GlamType,
        FacetDimension::Level,
        FacetDimension::Repository,
        FacetDimension::Creator,
        FacetDimension::Subject,
        FacetDimension::Place,
        FacetDimension::Genre,
        FacetDimension::MediaType,
    ];

    /// Canonical name, also used as the facet-cache `facet_type`
    pub fn as_str(&self) -> &'static str {
        match self {
            FacetDimension::Creator => "creator",
            FacetDimension::Subject => "subject",
            FacetDimension::Place => "place",
            FacetDimension::Genre => "genre",
            FacetDimension::Level => "level",
            FacetDimension::MediaType => "media_type",
            FacetDimension::Repository => "repository",
            FacetDimension::GlamType => "glam_type",
        }
    }

    /// Parse a dimension name; unknown names yield `None`
    pub fn parse(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "creator" => Some(FacetDimension::Creator),
            "subject" => Some(FacetDimension::Subject),
            "place" => Some(FacetDimension::Place),
            "genre" => Some(FacetDimension::Genre),
            "level" => Some(FacetDimension::Level),
            "media_type" | "mediatype" | "media" => Some(FacetDimension::MediaType),
            "repository" | "repo" => Some(FacetDimension::Repository),
            "glam_type" | "collection_type" | "collectiontype" | "type" => {
                Some(FacetDimension::GlamType)
            }
            _ => None,
        }
    }

    pub fn value_kind(&self) -> ValueKind {
        match self {
            FacetDimension::MediaType | FacetDimension::GlamType => ValueKind::Key,
            _ => ValueKind::Id,
        }
    }

    /// Taxonomy restricting term-based dimensions
    pub fn taxonomy_id(&self) -> Option<i64> {
        match self {
            FacetDimension::Subject => Some(taxonomy::SUBJECT),
            FacetDimension::Place => Some(taxonomy::PLACE),
            FacetDimension::Genre => Some(taxonomy::GENRE),
            _ => None,
        }
    }
}

impl fmt::Display for FacetDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
