//! GeoJSON wire types.
//!
//! Only the subset used by the catalog assets is modelled: feature
//! collections whose features carry point, line or polygon geometry.
//! Positions are `[longitude, latitude]`, optionally followed by altitude.

use serde::Deserialize;
use serde_json::{Map, Value};

/// A GeoJSON position: `[lon, lat]` or `[lon, lat, alt]`.
pub type Position = Vec<f64>;

/// Top-level GeoJSON object.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn is_feature_collection(&self) -> bool {
        self.kind == "FeatureCollection"
    }
}

/// A single feature.
#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

impl Feature {
    /// First property among `keys` that is a non-empty string or a number.
    pub fn property(&self, keys: &[&str]) -> Option<String> {
        let properties = self.properties.as_ref()?;
        keys.iter().find_map(|key| match properties.get(*key)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }
}

/// Geometry object, tagged by `type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Position },
    MultiPoint { coordinates: Vec<Position> },
    LineString { coordinates: Vec<Position> },
    MultiLineString { coordinates: Vec<Vec<Position>> },
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    /// GeometryCollection and anything else we do not use.
    #[serde(other)]
    Unsupported,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_line_collection() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {"name": "Ruta 106", "description": "Centro"},
                "geometry": {"type": "LineString", "coordinates": [[-75.28, 2.93], [-75.27, 2.94, 440.0]]}
            }]
        }"#;
        let fc: FeatureCollection = serde_json::from_str(json).unwrap();
        assert!(fc.is_feature_collection());
        assert_eq!(fc.features.len(), 1);
        assert_eq!(fc.features[0].property(&["name"]).as_deref(), Some("Ruta 106"));
        match &fc.features[0].geometry {
            Some(Geometry::LineString { coordinates }) => {
                assert_eq!(coordinates.len(), 2);
                assert_eq!(coordinates[1].len(), 3);
            }
            other => panic!("unexpected geometry: {other:?}"),
        }
    }

    #[test]
    fn unknown_geometry_is_unsupported() {
        let json = r#"{"type": "GeometryCollection", "geometries": []}"#;
        let g: Geometry = serde_json::from_str(json).unwrap();
        assert!(matches!(g, Geometry::Unsupported));
    }

    #[test]
    fn null_geometry_and_properties() {
        let json = r#"{"type": "Feature", "properties": null, "geometry": null}"#;
        let f: Feature = serde_json::from_str(json).unwrap();
        assert!(f.geometry.is_none());
        assert!(f.property(&["name"]).is_none());
    }

    #[test]
    fn property_fallbacks() {
        let json = r#"{"type": "Feature", "properties": {"name": "  ", "NOMBRE": "Quebraditas", "COMUNA": 4}, "geometry": null}"#;
        let f: Feature = serde_json::from_str(json).unwrap();
        assert_eq!(f.property(&["name", "NOMBRE"]).as_deref(), Some("Quebraditas"));
        assert_eq!(f.property(&["district_id", "COMUNA"]).as_deref(), Some("4"));
    }

    #[test]
    fn other_kinds_are_not_collections() {
        let fc: FeatureCollection = serde_json::from_str(r#"{"type": "Feature"}"#).unwrap();
        assert!(!fc.is_feature_collection());
    }
}
