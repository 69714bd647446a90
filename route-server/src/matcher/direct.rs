//! Direct-match evaluation of a single line.

use std::sync::Arc;

use crate::domain::{GeoPoint, TransitLine};
use crate::geometry::{distance_point_to_line, nearest_vertex_index};

use super::config::MatchConfig;

/// How a line relates to the current origin and destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Near both endpoints and running origin-to-destination.
    Direct,
    /// Near the origin only; a candidate first leg.
    OriginOnly,
    /// Near the destination only; a candidate second leg.
    DestinationOnly,
    /// Near neither endpoint, or near both but running the wrong way.
    Discarded,
}

/// Measurements of one line against the current query points.
#[derive(Debug, Clone)]
pub struct MatchCandidate {
    pub line: Arc<TransitLine>,
    pub distance_to_origin: f64,
    pub distance_to_destination: f64,
    pub nearest_index_to_origin: usize,
    pub nearest_index_to_destination: usize,
}

impl MatchCandidate {
    /// Measure `line` against the origin and destination.
    pub fn measure(line: Arc<TransitLine>, origin: GeoPoint, destination: GeoPoint) -> Self {
        let polyline = &line.polyline;
        Self {
            distance_to_origin: distance_point_to_line(origin, polyline),
            distance_to_destination: distance_point_to_line(destination, polyline),
            nearest_index_to_origin: nearest_vertex_index(polyline, origin),
            nearest_index_to_destination: nearest_vertex_index(polyline, destination),
            line,
        }
    }

    pub fn near_origin(&self, config: &MatchConfig) -> bool {
        self.distance_to_origin <= config.proximity_threshold_m
    }

    pub fn near_destination(&self, config: &MatchConfig) -> bool {
        self.distance_to_destination <= config.proximity_threshold_m
    }

    /// Whether the line reaches the origin after the destination in vertex
    /// order.
    ///
    /// Line assets are authored destination-first: a later vertex is an
    /// earlier point along the rider's direction of travel.
    pub fn correct_orientation(&self) -> bool {
        self.nearest_index_to_origin > self.nearest_index_to_destination
    }

    pub fn classify(&self, config: &MatchConfig) -> Classification {
        match (self.near_origin(config), self.near_destination(config)) {
            (true, true) if self.correct_orientation() => Classification::Direct,
            (true, false) => Classification::OriginOnly,
            (false, true) => Classification::DestinationOnly,
            _ => Classification::Discarded,
        }
    }
}
