//! Catalog error types.
//!
//! Every failure mode has a named variant. None of them is fatal to a load:
//! callers log the diagnostic and skip the offending file or record.

use thiserror::Error;

/// A single catalog file could not be ingested.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A single raw product could not be coerced into a normalized record.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("unparsable price {raw:?} for product {id}")]
    UnparsablePrice { id: String, raw: String },
}
