//! Stops served by transit lines.
//!
//! Stop assets are not tied to a line, so a line's stops are the ones lying
//! close to its polyline.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::{GeoPoint, Polyline};
use crate::geometry::{distance_point_to_line, nearest_vertex_index};

/// A named boarding point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stop {
    pub name: String,
    pub location: GeoPoint,
}

/// Immutable collection of every known stop.
#[derive(Debug, Clone, Default)]
pub struct StopDirectory {
    stops: Arc<Vec<Stop>>,
}

impl StopDirectory {
    pub fn new(stops: Vec<Stop>) -> Self {
        Self {
            stops: Arc::new(stops),
        }
    }

    /// Stops within `max_distance_m` of `line`, in travel order.
    ///
    /// Travel order is the order of each stop's nearest vertex along the
    /// polyline; stops sharing a vertex are ordered by distance to the line.
    pub fn along(&self, line: &Polyline, max_distance_m: f64) -> Vec<&Stop> {
        let mut hits: Vec<(usize, f64, &Stop)> = self
            .stops
            .iter()
            .filter_map(|stop| {
                let distance = distance_point_to_line(stop.location, line);
                (distance <= max_distance_m)
                    .then(|| (nearest_vertex_index(line, stop.location), distance, stop))
            })
            .collect();
        hits.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)));
        hits.into_iter().map(|(_, _, stop)| stop).collect()
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(name: &str, lat: f64, lon: f64) -> Stop {
        Stop {
            name: name.to_string(),
            location: GeoPoint::new(lat, lon),
        }
    }

    /// Runs east along the equator-ish parallel 2.93.
    fn line() -> Polyline {
        Polyline::new(vec![
            GeoPoint::new(2.93, -75.30),
            GeoPoint::new(2.93, -75.29),
            GeoPoint::new(2.93, -75.28),
        ])
        .unwrap()
    }

    #[test]
    fn stops_in_travel_order() {
        let stops = StopDirectory::new(vec![
            stop("Final", 2.9301, -75.2801),
            stop("Inicio", 2.9301, -75.2999),
            stop("Medio", 2.9299, -75.2902),
            stop("Lejos", 2.95, -75.29),
        ]);
        let names: Vec<&str> = stops
            .along(&line(), 40.0)
            .into_iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, ["Inicio", "Medio", "Final"]);
    }

    #[test]
    fn same_vertex_sorted_by_distance() {
        let stops = StopDirectory::new(vec![
            stop("B", 2.9302, -75.29),
            stop("A", 2.9301, -75.29),
        ]);
        let along = stops.along(&line(), 40.0);
        assert_eq!(along[0].name, "A");
        assert_eq!(along[1].name, "B");
    }

    #[test]
    fn empty_directory() {
        let stops = StopDirectory::default();
        assert!(stops.is_empty());
        assert!(stops.along(&line(), 1000.0).is_empty());
    }
}
