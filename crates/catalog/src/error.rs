//! Error types for the catalog crate.
//!
//! Rust error handling concepts demonstrated:
//! - thiserror for defining custom error types
//! - `#[from]` and `#[source]` to chain underlying errors
//! - Error messages with context (which seed record failed and why)

use thiserror::Error;

use crate::schema::ValidationError;
use crate::types::MovieId;

/// Errors that can occur while building the catalog from seed data
///
/// Validation failures of *requests* are not represented here: those are
/// routine outcomes reported as [`ValidationError`] directly to the caller.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Seed file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Seed file is not valid JSON
    #[error("Malformed seed data: {0}")]
    Json(#[from] serde_json::Error),

    /// Seed file is valid JSON but not an array of records
    #[error("Seed data must be a JSON array of movies")]
    NotAnArray,

    /// A seed record failed schema validation
    #[error("Invalid movie at index {index}: {source}")]
    InvalidRecord {
        index: usize,
        #[source]
        source: ValidationError,
    },

    /// A seed record has a missing or non-UUID id
    #[error("Invalid id at index {index}: {value}")]
    InvalidId { index: usize, value: String },

    /// Two records share the same id
    #[error("Duplicate movie id: {0}")]
    DuplicateId(MovieId),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;
