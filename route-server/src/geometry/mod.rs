//! Geometry primitives used by the matcher.
//!
//! All distances are in meters. Point-to-point distance is the haversine
//! great-circle distance; point-to-line distance projects onto each segment
//! in a local equirectangular frame centred on the query point and measures
//! the closest point back with the haversine, so both primitives share the
//! same metric and can be compared against the same thresholds.
//!
//! The frame is adequate at city scale. Lines crossing the antimeridian are
//! not supported.

use crate::domain::{GeoPoint, Polygon, Polyline};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two points, in meters.
pub fn distance_point_to_point(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lon = (b.lon - a.lon).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().min(1.0).asin();

    EARTH_RADIUS_M * c
}

/// Distance from `point` to the segment `a`-`b`, in meters.
pub fn distance_point_to_segment(point: GeoPoint, a: GeoPoint, b: GeoPoint) -> f64 {
    let frame = LocalFrame::centred_on(point);
    let (ax, ay) = frame.project(a);
    let (bx, by) = frame.project(b);

    let (dx, dy) = (bx - ax, by - ay);
    let len2 = dx * dx + dy * dy;
    if len2 == 0.0 {
        return distance_point_to_point(point, a);
    }

    let to_a = distance_point_to_point(point, a);
    let to_b = distance_point_to_point(point, b);

    // The query point is the frame origin.
    let t = (-(ax * dx + ay * dy) / len2).clamp(0.0, 1.0);
    if t == 0.0 || t == 1.0 {
        return to_a.min(to_b);
    }

    // The frame is only locally exact; never report more than an endpoint.
    let closest = frame.unproject(ax + t * dx, ay + t * dy);
    distance_point_to_point(point, closest).min(to_a).min(to_b)
}

/// Minimum distance from `point` to any segment of `line`, in meters.
pub fn distance_point_to_line(point: GeoPoint, line: &Polyline) -> f64 {
    line.segments()
        .map(|(a, b)| distance_point_to_segment(point, a, b))
        .fold(f64::INFINITY, f64::min)
}

/// Index of the vertex of `line` closest to `point`.
///
/// Ties resolve to the lowest index.
pub fn nearest_vertex_index(line: &Polyline, point: GeoPoint) -> usize {
    let mut best_index = 0;
    let mut best_distance = f64::INFINITY;

    for (index, vertex) in line.points().iter().enumerate() {
        let distance = distance_point_to_point(point, *vertex);
        if distance < best_distance {
            best_index = index;
            best_distance = distance;
        }
    }

    best_index
}

/// Area-weighted centroid of a polygon.
///
/// Every ring counts as one part of a union and is weighted by its absolute
/// area. If the total area is zero (all rings collinear) the mean of the
/// distinct vertices is returned instead.
pub fn polygon_centroid(polygon: &Polygon) -> GeoPoint {
    let rings = polygon.rings();
    // Work relative to one vertex to keep the cross products well conditioned.
    let origin = rings[0][0];

    let mut weighted_x = 0.0;
    let mut weighted_y = 0.0;
    let mut total_area = 0.0;

    for ring in rings {
        let mut twice_area = 0.0;
        let mut cx = 0.0;
        let mut cy = 0.0;

        for (i, p) in ring.iter().enumerate() {
            let q = ring[(i + 1) % ring.len()];
            let (x0, y0) = (p.lon - origin.lon, p.lat - origin.lat);
            let (x1, y1) = (q.lon - origin.lon, q.lat - origin.lat);
            let cross = x0 * y1 - x1 * y0;
            twice_area += cross;
            cx += (x0 + x1) * cross;
            cy += (y0 + y1) * cross;
        }

        if twice_area == 0.0 {
            continue;
        }

        let area = (twice_area / 2.0).abs();
        weighted_x += area * cx / (3.0 * twice_area);
        weighted_y += area * cy / (3.0 * twice_area);
        total_area += area;
    }

    if total_area == 0.0 {
        return vertex_mean(polygon);
    }

    GeoPoint::new(
        origin.lat + weighted_y / total_area,
        origin.lon + weighted_x / total_area,
    )
}

/// Mean of all vertices, ignoring the closing duplicate of closed rings.
fn vertex_mean(polygon: &Polygon) -> GeoPoint {
    let mut lat = 0.0;
    let mut lon = 0.0;
    let mut count = 0usize;

    for ring in polygon.rings() {
        let open = match (ring.first(), ring.last()) {
            (Some(first), Some(last)) if ring.len() > 1 && first == last => {
                &ring[..ring.len() - 1]
            }
            _ => &ring[..],
        };
        for p in open {
            lat += p.lat;
            lon += p.lon;
            count += 1;
        }
    }

    let n = count.max(1) as f64;
    GeoPoint::new(lat / n, lon / n)
}

/// Equirectangular projection around a reference point, in meters.
struct LocalFrame {
    origin: GeoPoint,
    meters_per_rad_lon: f64,
}

impl LocalFrame {
    fn centred_on(origin: GeoPoint) -> Self {
        let cos_lat = origin.lat.to_radians().cos().max(1e-12);
        Self {
            origin,
            meters_per_rad_lon: EARTH_RADIUS_M * cos_lat,
        }
    }

    fn project(&self, p: GeoPoint) -> (f64, f64) {
        let x = (p.lon - self.origin.lon).to_radians() * self.meters_per_rad_lon;
        let y = (p.lat - self.origin.lat).to_radians() * EARTH_RADIUS_M;
        (x, y)
    }

    fn unproject(&self, x: f64, y: f64) -> GeoPoint {
        GeoPoint::new(
            self.origin.lat + (y / EARTH_RADIUS_M).to_degrees(),
            self.origin.lon + (x / self.meters_per_rad_lon).to_degrees(),
        )
    }
}
