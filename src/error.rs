// Error types shared by the storage backends and the application layer.
// The binary and UI work with `anyhow::Result`; everything below them
// returns `CatalogError` so callers can match on the failure kind.

use thiserror::Error;

/// Failures raised by the catalog library.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// IO errors while reading or writing the backing file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encode errors (decode errors are tolerated and logged)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV encode/decode errors that cannot be skipped
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A record with this title is already stored
    #[error("Movie {0} already exists!")]
    DuplicateTitle(String),

    /// User supplied values outside the accepted ranges
    #[error("{0}")]
    Validation(String),

    /// The website template could not be used
    #[error("Template error: {0}")]
    Template(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

impl CatalogError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn template(msg: impl Into<String>) -> Self {
        Self::Template(msg.into())
    }
}
