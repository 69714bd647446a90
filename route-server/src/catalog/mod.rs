//! Catalog of transit lines, neighborhoods and stops.
//!
//! Assets are GeoJSON files laid out as:
//!
//! ```text
//! routes/index.json        {"lines": [{"id": "...", "name": "..."}]}
//! routes/{id}.geojson      one line, LineString or MultiLineString features
//! routes/stops.geojson     stops, Point features (optional)
//! neighborhoods.geojson    neighborhood boundaries, Polygon features
//! ```
//!
//! The same layout can live in a local directory or behind an HTTP base URL.
//! Decoding and validation happen here; the matcher only ever sees
//! validated domain types.

mod client;
mod convert;
mod error;
mod geojson;
mod source;
mod store;

pub use client::{HttpCatalog, HttpCatalogConfig};
pub use convert::{line_from_collection, neighborhoods_from_collection, stops_from_collection};
pub use error::CatalogError;
pub use geojson::{Feature, FeatureCollection, Geometry, Position};
pub use source::AssetSource;
pub use store::{Catalog, LINE_INDEX_PATH, NEIGHBORHOODS_PATH, STOPS_PATH, line_path};
