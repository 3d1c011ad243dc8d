//! Error types for the skillpath_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for skillpath_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Exercise catalog validation error
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),

    /// Product snapshot failed validation at load time
    #[error("Product validation error: {0}")]
    ProductValidation(String),

    /// Unparseable query input (sort key, category id)
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<crate::graph::GraphError> for Error {
    fn from(err: crate::graph::GraphError) -> Self {
        Error::CatalogValidation(err.to_string())
    }
}
