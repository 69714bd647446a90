//! Directed polyline type.

use serde::Serialize;

use super::{GeoPoint, GeometryError};

/// An ordered sequence of at least two points.
///
/// The order is meaningful: index 0 is the notional start of the line and
/// the last index its notional end. The matcher uses vertex indices as a
/// one-dimensional proxy for position along the direction of travel.
///
/// # Examples
///
/// ```
/// use route_server::domain::{GeoPoint, Polyline};
///
/// let line = Polyline::new(vec![
///     GeoPoint::new(2.93, -75.29),
///     GeoPoint::new(2.94, -75.28),
/// ])
/// .unwrap();
/// assert_eq!(line.len(), 2);
///
/// // A single point is not a line
/// assert!(Polyline::new(vec![GeoPoint::new(2.93, -75.29)]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Polyline(Vec<GeoPoint>);

impl Polyline {
    /// Build a polyline, rejecting degenerate or non-finite input.
    pub fn new(points: Vec<GeoPoint>) -> Result<Self, GeometryError> {
        if points.len() < 2 {
            return Err(GeometryError::InvalidGeometry(
                "polyline needs at least 2 points",
            ));
        }
        if !points.iter().all(GeoPoint::is_valid) {
            return Err(GeometryError::InvalidGeometry(
                "polyline has an out-of-range coordinate",
            ));
        }
        Ok(Self(points))
    }

    /// All vertices in travel order.
    pub fn points(&self) -> &[GeoPoint] {
        &self.0
    }

    /// Number of vertices (always at least 2).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; present for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consecutive vertex pairs.
    pub fn segments(&self) -> impl Iterator<Item = (GeoPoint, GeoPoint)> + '_ {
        self.0.windows(2).map(|w| (w[0], w[1]))
    }
}
