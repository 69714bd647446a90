//! Domain error types.
//!
//! These errors represent malformed geometry. They are distinct from
//! transport and decoding errors raised by the catalog layer.

/// A line or polygon that cannot take part in matching.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    /// Not enough vertices, empty ring, non-finite coordinate, ...
    #[error("invalid geometry: {0}")]
    InvalidGeometry(&'static str),
}
