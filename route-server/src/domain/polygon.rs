//! Neighborhood boundaries and query regions.

use super::{GeoPoint, GeometryError};

/// A boundary made of one or more rings.
///
/// Multiple rings describe a multi-part boundary; every ring is treated as
/// one part of the union. Rings may be closed (first point repeated at the
/// end) as they are in GeoJSON, or open.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    rings: Vec<Vec<GeoPoint>>,
}

impl Polygon {
    /// Build a polygon, rejecting empty or degenerate rings.
    pub fn new(rings: Vec<Vec<GeoPoint>>) -> Result<Self, GeometryError> {
        if rings.is_empty() {
            return Err(GeometryError::InvalidGeometry("polygon has no rings"));
        }
        for ring in &rings {
            if ring.len() < 3 {
                return Err(GeometryError::InvalidGeometry(
                    "polygon ring needs at least 3 points",
                ));
            }
            if !ring.iter().all(GeoPoint::is_valid) {
                return Err(GeometryError::InvalidGeometry(
                    "polygon has an out-of-range coordinate",
                ));
            }
        }
        Ok(Self { rings })
    }

    /// Single-ring convenience constructor.
    pub fn from_ring(ring: Vec<GeoPoint>) -> Result<Self, GeometryError> {
        Self::new(vec![ring])
    }

    pub fn rings(&self) -> &[Vec<GeoPoint>] {
        &self.rings
    }
}

/// What a rider picked as origin or destination.
#[derive(Debug, Clone, PartialEq)]
pub enum Region {
    /// A neighborhood boundary.
    Polygon(Polygon),
    /// A point picked on the map.
    Point(GeoPoint),
}

impl From<Polygon> for Region {
    fn from(polygon: Polygon) -> Self {
        Region::Polygon(polygon)
    }
}

impl From<GeoPoint> for Region {
    fn from(point: GeoPoint) -> Self {
        Region::Point(point)
    }
}
