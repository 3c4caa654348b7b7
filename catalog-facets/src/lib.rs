//! # Catalog Facets
//!
//! Disjunctive facet counting over the archival catalog. Each of the eight facet
//! dimensions is counted under every active filter except its own selection, so
//! the count next to an unselected value equals the result size after selecting it.
//!
//! - [`FilterSet`]: immutable snapshot of a request's filters
//! - [`build_query`]: pure predicate builder with one optional excluded dimension
//! - [`FacetEngine`]: runs the count queries, singly or for the whole rail

pub mod dimension;
pub mod engine;
pub mod filters;
pub mod query;
pub mod result;

pub use dimension::{FacetDimension, ValueKind};
pub use engine::FacetEngine;
pub use filters::{FilterSet, RangeType};
pub use query::{build_query, FacetQuery, FilterQuery, Fragment, SqlValue};
pub use result::{FacetEntry, FacetFailure, FacetList, FacetRail, FacetValue, RailSource};
