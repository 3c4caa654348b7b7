//! Catalog database access

pub mod init;
pub mod schema;
pub mod seed;

pub use init::{connect_readonly, open_catalog, open_in_memory};
pub use schema::{create_catalog_schema, create_thesaurus_table};
pub use seed::{CatalogSeeder, RecordSeed};
