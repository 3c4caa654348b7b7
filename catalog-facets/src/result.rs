//! Facet count results

use crate::dimension::FacetDimension;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one facet value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FacetValue {
    Id(i64),
    Key(String),
}

impl FacetValue {
    pub fn as_id(&self) -> Option<i64> {
        match self {
            FacetValue::Id(id) => Some(*id),
            FacetValue::Key(_) => None,
        }
    }

    pub fn as_key(&self) -> Option<&str> {
        match self {
            FacetValue::Key(key) => Some(key),
            FacetValue::Id(_) => None,
        }
    }
}

impl fmt::Display for FacetValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacetValue::Id(id) => write!(f, "{}", id),
            FacetValue::Key(key) => f.write_str(key),
        }
    }
}

/// One facet value with the number of distinct records it would select
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetEntry {
    pub value: FacetValue,
    pub label: String,
    pub count: i64,
}

/// Where a facet list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RailSource {
    /// Computed against the live catalog with disjunctive filtering
    Dynamic,
    /// Read from the pre-computed facet cache
    Cached,
}

/// Counts for one dimension, ordered by count descending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetList {
    pub dimension: FacetDimension,
    pub source: RailSource,
    pub entries: Vec<FacetEntry>,
}

/// A dimension whose count query failed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetFailure {
    pub dimension: FacetDimension,
    pub error: String,
}

/// Facet lists for every dimension of a browse request
///
/// Dimensions fail independently: a failed count query appears in `failures` and
/// leaves the other lists intact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacetRail {
    pub facets: Vec<FacetList>,
    pub failures: Vec<FacetFailure>,
}

impl FacetRail {
    pub fn get(&self, dimension: FacetDimension) -> Option<&FacetList> {
        self.facets.iter().find(|list| list.dimension == dimension)
    }

    /// Entries of one dimension, empty when absent or failed
    pub fn entries(&self, dimension: FacetDimension) -> &[FacetEntry] {
        self.get(dimension)
            .map(|list| list.entries.as_slice())
            .unwrap_or(&[])
    }
}

/// Sort by count descending, then label, then value, and cap the length
pub(crate) fn rank_entries(entries: &mut Vec<FacetEntry>, limit: usize) {
    entries.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.label.cmp(&b.label))
            .then_with(|| a.value.to_string().cmp(&b.value.to_string()))
    });
    entries.truncate(limit);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64, label: &str, count: i64) -> FacetEntry {
        FacetEntry {
            value: FacetValue::Id(id),
            label: label.to_string(),
            count,
        }
    }

    #[test]
    fn test_rank_entries_orders_and_caps() {
        let mut entries = vec![
            entry(1, "Beta", 3),
            entry(2, "Alpha", 3),
            entry(3, "Gamma", 9),
            entry(4, "Delta", 1),
        ];
        rank_entries(&mut entries, 3);

        let labels: Vec<&str> = entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["Gamma", "Alpha", "Beta"]);
    }

    #[test]
    fn test_facet_value_serializes_untagged() {
        let id = serde_json::to_value(FacetValue::Id(42)).unwrap();
        assert_eq!(id, serde_json::json!(42));

        let key = serde_json::to_value(FacetValue::Key("image".to_string())).unwrap();
        assert_eq!(key, serde_json::json!("image"));
    }

    #[test]
    fn test_rail_entries_for_missing_dimension_is_empty() {
        let rail = FacetRail::default();
        assert!(rail.entries(FacetDimension::Creator).is_empty());
    }
}
