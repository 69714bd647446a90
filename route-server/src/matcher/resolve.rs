//! Turning an origin or destination into a single query point.

use std::fmt;

use serde::Serialize;

use crate::domain::{GeoPoint, Region};
use crate::geometry::polygon_centroid;

/// Which end of the journey a location belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Origin,
    Destination,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Origin => f.write_str("origin"),
            Endpoint::Destination => f.write_str("destination"),
        }
    }
}

/// An origin or destination that could not be turned into a query point.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionFailure {
    /// Nothing was selected for this endpoint.
    #[error("{0} not set")]
    Missing(Endpoint),

    /// A neighborhood name that is not in the directory.
    #[error("unknown {endpoint} neighborhood: {name}")]
    UnknownRegion { endpoint: Endpoint, name: String },

    /// A map point outside the valid coordinate ranges.
    #[error("{0} point has invalid coordinates")]
    InvalidPoint(Endpoint),
}

impl ResolutionFailure {
    /// The endpoint that failed to resolve.
    pub fn endpoint(&self) -> Endpoint {
        match self {
            ResolutionFailure::Missing(endpoint) | ResolutionFailure::InvalidPoint(endpoint) => {
                *endpoint
            }
            ResolutionFailure::UnknownRegion { endpoint, .. } => *endpoint,
        }
    }
}

/// Resolve a region to the point used for proximity tests.
///
/// A polygon resolves to its centroid, a point to itself.
pub fn resolve_location(
    endpoint: Endpoint,
    region: Option<&Region>,
) -> Result<GeoPoint, ResolutionFailure> {
    match region {
        None => Err(ResolutionFailure::Missing(endpoint)),
        Some(Region::Polygon(polygon)) => Ok(polygon_centroid(polygon)),
        Some(Region::Point(point)) if point.is_valid() => Ok(*point),
        Some(Region::Point(_)) => Err(ResolutionFailure::InvalidPoint(endpoint)),
    }
}
