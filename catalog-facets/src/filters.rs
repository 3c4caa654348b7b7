//! Active search state for one browse request

use crate::dimension::FacetDimension;
use crate::result::FacetValue;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How a requested date range is matched against record event dates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeType {
    /// Record interval overlaps the requested interval; open bounds match anything
    #[default]
    Inclusive,
    /// Record interval lies entirely within the requested interval
    Exact,
}

impl RangeType {
    /// Parse a request value; anything but `exact` is inclusive
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("exact") {
            RangeType::Exact
        } else {
            RangeType::Inclusive
        }
    }
}

/// Snapshot of every active filter
///
/// Read-only for a facet pass: per-dimension queries skip a predicate instead of
/// editing the set. Empty or whitespace-only strings count as unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSet {
    // Structural
    pub is_authenticated: bool,
    pub parent_id: Option<i64>,
    /// Restrict to children of the root; ignored when `parent_id` is set
    pub top_level_only: bool,
    pub has_digital_object: bool,

    // Facet ids
    pub creator: Option<i64>,
    pub subject: Option<i64>,
    pub place: Option<i64>,
    pub genre: Option<i64>,
    pub level: Option<i64>,
    /// Mime-type prefix such as `image` or `audio`
    pub media_type: Option<String>,
    pub repository: Option<i64>,
    pub collection_type: Option<String>,

    // Free text
    pub query: Option<String>,
    /// Pre-tokenized query (e.g. synonym-expanded); any term may match
    pub query_terms: Option<Vec<String>>,
    pub title: Option<String>,
    pub identifier: Option<String>,
    pub reference_code: Option<String>,
    pub scope_and_content: Option<String>,
    pub extent_and_medium: Option<String>,
    pub archival_history: Option<String>,
    pub acquisition: Option<String>,
    pub creator_search: Option<String>,
    pub subject_search: Option<String>,
    pub place_search: Option<String>,
    pub genre_search: Option<String>,

    // Dates
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub range_type: RangeType,
}

/// Trimmed value of an optional text filter, `None` when blank
pub(crate) fn text(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl FilterSet {
    /// True if any of the eight facet-id filters is set
    pub fn has_active_facet_filters(&self) -> bool {
        FacetDimension::ALL
            .iter()
            .any(|dimension| self.facet_filter(*dimension).is_some())
    }

    /// The active filter value of one dimension
    pub fn facet_filter(&self, dimension: FacetDimension) -> Option<FacetValue> {
        match dimension {
            FacetDimension::Creator => self.creator.map(FacetValue::Id),
            FacetDimension::Subject => self.subject.map(FacetValue::Id),
            FacetDimension::Place => self.place.map(FacetValue::Id),
            FacetDimension::Genre => self.genre.map(FacetValue::Id),
            FacetDimension::Level => self.level.map(FacetValue::Id),
            FacetDimension::Repository => self.repository.map(FacetValue::Id),
            FacetDimension::MediaType => {
                text(&self.media_type).map(|v| FacetValue::Key(v.to_string()))
            }
            FacetDimension::GlamType => {
                text(&self.collection_type).map(|v| FacetValue::Key(v.to_string()))
            }
        }
    }

    /// Free-text filters that are always applied
    pub fn has_text_filters(&self) -> bool {
        let has_terms = self
            .query_terms
            .as_ref()
            .is_some_and(|terms| terms.iter().any(|t| !t.trim().is_empty()));

        has_terms
            || [
                &self.query,
                &self.title,
                &self.identifier,
                &self.reference_code,
                &self.scope_and_content,
                &self.extent_and_medium,
                &self.archival_history,
                &self.acquisition,
                &self.creator_search,
                &self.subject_search,
                &self.place_search,
                &self.genre_search,
            ]
            .into_iter()
            .any(|value| text(value).is_some())
    }

    pub fn has_date_filters(&self) -> bool {
        self.start_date.is_some() || self.end_date.is_some()
    }

    /// No facet, text, date or structural narrowing is active
    ///
    /// Only such requests may be served from the pre-computed facet cache, which
    /// counts over the whole tree.
    pub fn is_unfiltered(&self) -> bool {
        !self.has_active_facet_filters()
            && !self.has_text_filters()
            && !self.has_date_filters()
            && self.parent_id.is_none()
            && !self.top_level_only
            && !self.has_digital_object
    }

    /// Copy of this set with one dimension's filter replaced
    ///
    /// A value of the wrong kind for the dimension clears that filter.
    pub fn with_facet(&self, dimension: FacetDimension, value: &FacetValue) -> FilterSet {
        let mut next = self.clone();
        let id = value.as_id();
        let key = value.as_key().map(str::to_string);
        match dimension {
            FacetDimension::Creator => next.creator = id,
            FacetDimension::Subject => next.subject = id,
            FacetDimension::Place => next.place = id,
            FacetDimension::Genre => next.genre = id,
            FacetDimension::Level => next.level = id,
            FacetDimension::Repository => next.repository = id,
            FacetDimension::MediaType => next.media_type = key,
            FacetDimension::GlamType => next.collection_type = key,
        }
        next
    }

    /// Search terms of the combined query filter
    ///
    /// Uses `query_terms` when present, otherwise the whole query as one term.
    pub fn search_terms(&self) -> Vec<String> {
        if text(&self.query).is_none() {
            return Vec::new();
        }

        if let Some(terms) = &self.query_terms {
            let terms: Vec<String> = terms
                .iter()
                .map(|t| t.trim())
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
            if !terms.is_empty() {
                return terms;
            }
        }

        text(&self.query).map(|q| vec![q.to_string()]).unwrap_or_default()
    }
}
