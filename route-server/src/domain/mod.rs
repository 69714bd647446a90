//! Domain types for the transit route matcher.
//!
//! This module contains the validated geometric model: points, directed
//! polylines, neighborhood polygons and the transit lines built from them.
//! All types enforce their invariants at construction time, so the matching
//! engine can rely on a polyline having at least two vertices and a polygon
//! ring having at least three.

mod error;
mod line;
mod point;
mod polygon;
mod polyline;

pub use error::GeometryError;
pub use line::{InvalidLineId, LineEntry, LineId, TransitLine};
pub use point::GeoPoint;
pub use polygon::{Polygon, Region};
pub use polyline::Polyline;
