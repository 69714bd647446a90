//! Two-line transfer search.
//!
//! Brute force over every (first line, second line, vertex, vertex) tuple in
//! a fixed order; the first tuple that satisfies the distance and
//! orientation checks wins. Catalogs are tens of lines with a few hundred
//! vertices each, so no spatial index is used.

use serde::Serialize;

use crate::domain::GeoPoint;
use crate::geometry::distance_point_to_point;

use super::config::MatchConfig;
use super::direct::MatchCandidate;

/// Where a rider changes from the first line to the second.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferPoint {
    /// Vertex index on the first line.
    pub from_index: usize,
    /// Vertex index on the second line.
    pub to_index: usize,
    pub from_point: GeoPoint,
    pub to_point: GeoPoint,
    /// Distance between the two vertices in meters.
    pub distance_m: f64,
}

/// A viable two-leg combination.
#[derive(Debug, Clone)]
pub struct Transfer<'a> {
    pub first: &'a MatchCandidate,
    pub second: &'a MatchCandidate,
    pub point: TransferPoint,
}

/// Find the first viable transfer between an origin-only line and a
/// destination-only line.
///
/// A tuple `(a, b, i, j)` is viable when vertex `i` of `a` and vertex `j` of
/// `b` are within the transfer threshold, the origin lies after `i` on `a`
/// and `j` lies after the destination on `b` (in vertex order). Vertices
/// failing the orientation check can never be accepted, so they are skipped
/// without changing which tuple is found first.
pub fn find_transfer<'a>(
    origin_only: &'a [MatchCandidate],
    destination_only: &'a [MatchCandidate],
    config: &MatchConfig,
) -> Option<Transfer<'a>> {
    for first in origin_only {
        let first_points = first.line.polyline.points();
        let boardable = &first_points[..first.nearest_index_to_origin.min(first_points.len())];

        for second in destination_only {
            let second_points = second.line.polyline.points();
            let j_start = second.nearest_index_to_destination + 1;

            for (i, from_point) in boardable.iter().enumerate() {
                for (j, to_point) in second_points.iter().enumerate().skip(j_start) {
                    let distance = distance_point_to_point(*from_point, *to_point);
                    if distance <= config.transfer_threshold_m {
                        return Some(Transfer {
                            first,
                            second,
                            point: TransferPoint {
                                from_index: i,
                                to_index: j,
                                from_point: *from_point,
                                to_point: *to_point,
                                distance_m: distance,
                            },
                        });
                    }
                }
            }
        }
    }

    None
}
