//! Browse request parameters
//!
//! Every parameter arrives as text. Blank values count as unset; ids, flags and
//! dates that do not parse are rejected with 400. Browsing is top-level only
//! unless `parent` or `topLevel` says otherwise.

use catalog_facets::{FilterSet, RangeType};
use chrono::NaiveDate;
use serde::Deserialize;

use super::ApiError;

/// Filter parameters shared by the facet and browse endpoints
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseParams {
    // Structural
    pub parent: Option<String>,
    #[serde(alias = "topLevelOnly")]
    pub top_level: Option<String>,
    pub has_digital: Option<String>,

    // Facet ids
    pub creator: Option<String>,
    pub subject: Option<String>,
    pub place: Option<String>,
    pub genre: Option<String>,
    pub level: Option<String>,
    pub media: Option<String>,
    pub repo: Option<String>,
    #[serde(rename = "type")]
    pub collection_type: Option<String>,

    // Free text
    pub query: Option<String>,
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
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub range_type: Option<String>,

    /// Match any whitespace-separated word of `query` instead of the whole phrase
    pub semantic: Option<String>,

    /// Skip query correction on /api/browse
    pub no_correct: Option<String>,
}

impl BrowseParams {
    /// Convert to a filter set with the given visibility
    pub fn to_filter_set(&self, is_authenticated: bool) -> Result<FilterSet, ApiError> {
        let parent_id = parse_id("parent", &self.parent)?;
        let top_level_only = match non_blank(&self.top_level) {
            Some(_) => parse_flag("topLevel", &self.top_level)?,
            None => parent_id.is_none(),
        };
        let query = non_blank(&self.query);
        let query_terms = if self.is_semantic()? {
            query.as_deref().map(split_query_terms)
        } else {
            None
        };

        Ok(FilterSet {
            is_authenticated,
            parent_id,
            top_level_only,
            has_digital_object: parse_flag("hasDigital", &self.has_digital)?,

            creator: parse_id("creator", &self.creator)?,
            subject: parse_id("subject", &self.subject)?,
            place: parse_id("place", &self.place)?,
            genre: parse_id("genre", &self.genre)?,
            level: parse_id("level", &self.level)?,
            media_type: non_blank(&self.media),
            repository: parse_id("repo", &self.repo)?,
            collection_type: non_blank(&self.collection_type),

            query,
            query_terms,
            title: non_blank(&self.title),
            identifier: non_blank(&self.identifier),
            reference_code: non_blank(&self.reference_code),
            scope_and_content: non_blank(&self.scope_and_content),
            extent_and_medium: non_blank(&self.extent_and_medium),
            archival_history: non_blank(&self.archival_history),
            acquisition: non_blank(&self.acquisition),
            creator_search: non_blank(&self.creator_search),
            subject_search: non_blank(&self.subject_search),
            place_search: non_blank(&self.place_search),
            genre_search: non_blank(&self.genre_search),

            start_date: parse_date("startDate", &self.start_date)?,
            end_date: parse_date("endDate", &self.end_date)?,
            range_type: self
                .range_type
                .as_deref()
                .map(RangeType::parse)
                .unwrap_or_default(),
        })
    }

    pub fn skip_correction(&self) -> Result<bool, ApiError> {
        parse_flag("noCorrect", &self.no_correct)
    }

    pub fn is_semantic(&self) -> Result<bool, ApiError> {
        parse_flag("semantic", &self.semantic)
    }
}

/// Distinct whitespace-separated words of a query, in order
pub fn split_query_terms(query: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for word in query.split_whitespace() {
        if !terms.iter().any(|t| t == word) {
            terms.push(word.to_string());
        }
    }
    terms
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_id(name: &str, value: &Option<String>) -> Result<Option<i64>, ApiError> {
    non_blank(value)
        .map(|v| {
            v.parse::<i64>().map_err(|_| {
                ApiError::InvalidInput(format!("{} must be a numeric id, got '{}'", name, v))
            })
        })
        .transpose()
}

fn parse_flag(name: &str, value: &Option<String>) -> Result<bool, ApiError> {
    match non_blank(value).map(|v| v.to_ascii_lowercase()).as_deref() {
        None | Some("0") | Some("false") | Some("no") | Some("off") => Ok(false),
        Some("1") | Some("true") | Some("yes") | Some("on") => Ok(true),
        Some(other) => Err(ApiError::InvalidInput(format!(
            "{} must be a boolean, got '{}'",
            name, other
        ))),
    }
}

fn parse_date(name: &str, value: &Option<String>) -> Result<Option<NaiveDate>, ApiError> {
    non_blank(value)
        .map(|v| {
            NaiveDate::parse_from_str(&v, "%Y-%m-%d").map_err(|_| {
                ApiError::InvalidInput(format!("{} must be YYYY-MM-DD, got '{}'", name, v))
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &str) -> BrowseParams {
        serde_json::from_value(serde_json::Value::Object(
            pairs
                .split('&')
                .filter_map(|pair| pair.split_once('='))
                .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
                .collect(),
        ))
        .unwrap()
    }

    #[test]
    fn test_empty_params_browse_top_level() {
        let filters = BrowseParams::default().to_filter_set(false).unwrap();
        assert!(filters.top_level_only);
        assert!(!filters.has_active_facet_filters());
        assert!(!filters.has_text_filters());
        assert!(!filters.is_authenticated);
    }

    #[test]
    fn test_top_level_default_and_override() {
        assert!(!params("parent=2").to_filter_set(false).unwrap().top_level_only);
        assert!(!params("topLevel=0").to_filter_set(false).unwrap().top_level_only);
        assert!(params("topLevel=1").to_filter_set(false).unwrap().top_level_only);

        let whole_tree = params("topLevelOnly=0").to_filter_set(false).unwrap();
        assert!(!whole_tree.top_level_only);
        assert!(whole_tree.is_unfiltered());
    }

    #[test]
    fn test_semantic_splits_query() {
        let filters = params("query=harbour  keepers harbour&semantic=1")
            .to_filter_set(false)
            .unwrap();
        assert_eq!(
            filters.query_terms,
            Some(vec!["harbour".to_string(), "keepers".to_string()])
        );

        let filters = params("query=harbour keepers").to_filter_set(false).unwrap();
        assert_eq!(filters.query_terms, None);

        let filters = params("semantic=1").to_filter_set(false).unwrap();
        assert_eq!(filters.query_terms, None);
    }

    #[test]
    fn test_camel_case_names() {
        let filters = params(
            "creator=7&repo=3&type=museum&media=image&topLevel=1&referenceCode=F1&rangeType=exact",
        )
        .to_filter_set(true)
        .unwrap();

        assert_eq!(filters.creator, Some(7));
        assert_eq!(filters.repository, Some(3));
        assert_eq!(filters.collection_type.as_deref(), Some("museum"));
        assert_eq!(filters.media_type.as_deref(), Some("image"));
        assert!(filters.top_level_only);
        assert_eq!(filters.reference_code.as_deref(), Some("F1"));
        assert_eq!(filters.range_type, RangeType::Exact);
        assert!(filters.is_authenticated);
    }

    #[test]
    fn test_blank_values_are_unset() {
        let filters = params("creator=&query= &startDate=&topLevel=0")
            .to_filter_set(false)
            .unwrap();
        assert_eq!(filters.creator, None);
        assert!(filters.is_unfiltered());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            params("subject=abc").to_filter_set(false),
            Err(ApiError::InvalidInput(_))
        ));
        assert!(matches!(
            params("startDate=1914-13-01").to_filter_set(false),
            Err(ApiError::InvalidInput(_))
        ));
        assert!(matches!(
            params("hasDigital=maybe").to_filter_set(false),
            Err(ApiError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_dates_parse() {
        let filters = params("startDate=1914-07-28&endDate=1918-11-11")
            .to_filter_set(false)
            .unwrap();
        assert_eq!(filters.start_date, NaiveDate::from_ymd_opt(1914, 7, 28));
        assert_eq!(filters.end_date, NaiveDate::from_ymd_opt(1918, 11, 11));
        assert_eq!(filters.range_type, RangeType::Inclusive);
    }
}
