//! # Catalog Common Library
//!
//! Shared code for the catalog search crates:
//! - Error type
//! - Configuration loading and path resolution
//! - Catalog database connections, schema and seeding
//! - Fixed identifiers of the catalog schema

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
