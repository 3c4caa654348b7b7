//! HTTP API handlers for catalog-browse

pub mod browse;
pub mod correct;
pub mod error;
pub mod facets;
pub mod health;
pub mod params;

pub use browse::browse;
pub use correct::correct_query;
pub use error::ApiError;
pub use facets::{get_facet_list, get_facet_rail};
pub use health::health_routes;
pub use params::BrowseParams;
