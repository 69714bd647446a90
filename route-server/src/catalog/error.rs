//! Catalog error types.

use crate::domain::{GeometryError, LineId};

/// Errors that can occur when loading catalog assets.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Asset server returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Local asset could not be read
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },

    /// Asset is not the JSON we expect
    #[error("JSON parse error in {path}: {message}")]
    Json { path: String, message: String },

    /// Line payload decoded but is not a usable line
    #[error("line {id} has invalid geometry: {source}")]
    InvalidGeometry { id: LineId, source: GeometryError },

    /// Line payload is not a GeoJSON feature collection
    #[error("line {id} is not valid GeoJSON: {message}")]
    InvalidPayload { id: LineId, message: String },

    /// Asset or line does not exist
    #[error("not found: {0}")]
    NotFound(String),
}
