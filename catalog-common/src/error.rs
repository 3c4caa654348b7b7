//! Common error types for the catalog search crates

use thiserror::Error;

/// Common result type for catalog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types shared by the facet engine, the fuzzy service and the browse service
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),
}

impl Error {
    /// True when the error means a table the query touched does not exist.
    ///
    /// Optional companion tables (thesaurus, facet cache) may be absent from a catalog;
    /// callers use this to tell "source not installed" apart from a broken connection.
    pub fn is_missing_table(&self) -> bool {
        match self {
            Error::Database(sqlx::Error::Database(db_err)) => {
                db_err.message().contains("no such table")
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NotFound("catalog.db".to_string());
        assert_eq!(err.to_string(), "Not found: catalog.db");

        let err = Error::Config("missing port".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing port");
    }

    #[test]
    fn test_non_database_error_is_not_missing_table() {
        assert!(!Error::NotFound("x".to_string()).is_missing_table());
    }
}
