//! Conversion from GeoJSON assets to domain types.

use tracing::warn;

use crate::domain::{GeoPoint, GeometryError, LineEntry, Polygon, Polyline, TransitLine};
use crate::regions::Neighborhood;
use crate::stops::Stop;

use super::geojson::{Feature, FeatureCollection, Geometry, Position};

/// Property keys holding a feature's display name.
const NAME_KEYS: &[&str] = &["name", "nombre", "NOMBRE", "Name"];

/// Property keys holding a neighborhood's district.
const DISTRICT_KEYS: &[&str] = &["district_id", "district", "comuna", "COMUNA"];

fn to_point(position: &Position) -> Result<GeoPoint, GeometryError> {
    match position.as_slice() {
        [lon, lat, ..] => Ok(GeoPoint::from_lon_lat(*lon, *lat)),
        _ => Err(GeometryError::InvalidGeometry(
            "position needs longitude and latitude",
        )),
    }
}

fn to_points(positions: &[Position]) -> Result<Vec<GeoPoint>, GeometryError> {
    positions.iter().map(to_point).collect()
}

/// Build a transit line from its GeoJSON document.
///
/// The coordinates of every line part of every feature are concatenated in
/// document order. The description comes from the first feature that has
/// one.
pub fn line_from_collection(
    entry: &LineEntry,
    collection: &FeatureCollection,
) -> Result<TransitLine, GeometryError> {
    let mut points = Vec::new();

    for feature in &collection.features {
        match &feature.geometry {
            Some(Geometry::LineString { coordinates }) => {
                points.extend(to_points(coordinates)?);
            }
            Some(Geometry::MultiLineString { coordinates }) => {
                for part in coordinates {
                    points.extend(to_points(part)?);
                }
            }
            _ => {}
        }
    }

    let polyline = Polyline::new(points)?;
    let description = collection
        .features
        .iter()
        .find_map(|f| f.property(&["description", "descripcion"]));

    let mut line = TransitLine::new(entry.id.clone(), entry.name.clone(), polyline);
    line.description = description;
    Ok(line)
}

fn neighborhood_from_feature(
    index: usize,
    feature: &Feature,
) -> Option<Result<Neighborhood, GeometryError>> {
    // Only exterior rings are kept; every exterior ring is one part.
    let rings = match feature.geometry.as_ref()? {
        Geometry::Polygon { coordinates } => coordinates.first().into_iter().collect::<Vec<_>>(),
        Geometry::MultiPolygon { coordinates } => {
            coordinates.iter().filter_map(|p| p.first()).collect()
        }
        _ => return None,
    };

    let name = feature
        .property(NAME_KEYS)
        .unwrap_or_else(|| format!("Neighborhood {}", index + 1));

    let polygon = rings
        .into_iter()
        .map(|ring| to_points(ring))
        .collect::<Result<Vec<_>, _>>()
        .and_then(Polygon::new);

    Some(polygon.map(|polygon| Neighborhood {
        name,
        district_id: feature.property(DISTRICT_KEYS),
        polygon,
    }))
}

/// Build the neighborhood list from its GeoJSON document.
///
/// Features without polygon geometry are ignored; features with invalid
/// polygons are skipped with a warning.
pub fn neighborhoods_from_collection(collection: &FeatureCollection) -> Vec<Neighborhood> {
    collection
        .features
        .iter()
        .enumerate()
        .filter_map(|(index, feature)| match neighborhood_from_feature(index, feature)? {
            Ok(neighborhood) => Some(neighborhood),
            Err(e) => {
                warn!(feature = index, error = %e, "skipping neighborhood");
                None
            }
        })
        .collect()
}

/// Build the stop list from its GeoJSON document.
pub fn stops_from_collection(collection: &FeatureCollection) -> Vec<Stop> {
    let mut stops = Vec::new();

    for (index, feature) in collection.features.iter().enumerate() {
        let positions: Vec<&Position> = match &feature.geometry {
            Some(Geometry::Point { coordinates }) => vec![coordinates],
            Some(Geometry::MultiPoint { coordinates }) => coordinates.iter().collect(),
            _ => continue,
        };
        let name = feature
            .property(NAME_KEYS)
            .unwrap_or_else(|| format!("Stop {}", index + 1));

        for position in positions {
            match to_point(position) {
                Ok(location) if location.is_valid() => stops.push(Stop {
                    name: name.clone(),
                    location,
                }),
                _ => warn!(feature = index, "skipping stop with invalid position"),
            }
        }
    }

    stops
}
