//! Scenario tests for the matching engine.

use super::*;
use crate::catalog::CatalogError;
use crate::domain::{GeoPoint, LineEntry, LineId, Polygon, Polyline, Region, TransitLine};
use std::sync::Arc;
use std::sync::Mutex;
use tokio::sync::Notify;

// About 111 m per 0.001° near the equator, so 0.01° is about 1.1 km.

fn id(s: &str) -> LineId {
    LineId::parse(s).unwrap()
}

fn pt(lat: f64, lon: f64) -> GeoPoint {
    GeoPoint::new(lat, lon)
}

fn make_line(name: &str, points: &[(f64, f64)]) -> TransitLine {
    let polyline = Polyline::new(points.iter().map(|&(lat, lon)| pt(lat, lon)).collect()).unwrap();
    TransitLine::new(id(name), format!("Ruta {name}"), polyline)
        .with_description(format!("Recorrido {name}"))
}

enum MockLine {
    Valid(TransitLine),
    /// Payload with a single coordinate.
    Degenerate(GeoPoint),
    /// Payload is not line GeoJSON.
    Garbled,
    /// Fetch fails.
    Unreachable,
}

/// In-memory line catalog.
struct MockCatalog {
    entries: Vec<(LineEntry, MockLine)>,
    fail_listing: bool,
    /// When set, listing waits for a notification.
    gate: Option<Arc<Notify>>,
    load_calls: Mutex<usize>,
}

impl MockCatalog {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            fail_listing: false,
            gate: None,
            load_calls: Mutex::new(0),
        }
    }

    fn with_line(mut self, line: TransitLine) -> Self {
        let entry = LineEntry::new(line.id.clone(), line.name.clone());
        self.entries.push((entry, MockLine::Valid(line)));
        self
    }

    fn with_degenerate(mut self, name: &str, at: GeoPoint) -> Self {
        self.entries
            .push((LineEntry::new(id(name), name), MockLine::Degenerate(at)));
        self
    }

    fn with_garbled(mut self, name: &str) -> Self {
        self.entries
            .push((LineEntry::new(id(name), name), MockLine::Garbled));
        self
    }

    fn with_unreachable(mut self, name: &str) -> Self {
        self.entries
            .push((LineEntry::new(id(name), name), MockLine::Unreachable));
        self
    }

    fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    fn load_call_count(&self) -> usize {
        *self.load_calls.lock().unwrap()
    }
}

impl LineCatalog for MockCatalog {
    async fn list_lines(&self) -> Result<Vec<LineEntry>, CatalogError> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.fail_listing {
            return Err(CatalogError::Api {
                status: 503,
                message: "Service Unavailable".into(),
            });
        }
        Ok(self.entries.iter().map(|(e, _)| e.clone()).collect())
    }

    async fn load_line(&self, entry: &LineEntry) -> Result<TransitLine, CatalogError> {
        *self.load_calls.lock().unwrap() += 1;
        let (_, line) = self
            .entries
            .iter()
            .find(|(e, _)| e.id == entry.id)
            .ok_or_else(|| CatalogError::NotFound(entry.id.to_string()))?;

        match line {
            MockLine::Valid(line) => Ok(line.clone()),
            MockLine::Degenerate(at) => Polyline::new(vec![*at])
                .map(|polyline| TransitLine::new(entry.id.clone(), entry.name.clone(), polyline))
                .map_err(|source| CatalogError::InvalidGeometry {
                    id: entry.id.clone(),
                    source,
                }),
            MockLine::Garbled => Err(CatalogError::InvalidPayload {
                id: entry.id.clone(),
                message: "expected a FeatureCollection, got Feature".into(),
            }),
            MockLine::Unreachable => Err(CatalogError::Io {
                path: format!("routes/{}.geojson", entry.id),
                message: "connection reset".into(),
            }),
        }
    }
}

/// Origin in the east, destination in the north-west.
const ORIGIN: GeoPoint = GeoPoint::new(0.0, 0.03);
const DESTINATION: GeoPoint = GeoPoint::new(0.03, 0.0);

/// Serves both endpoints, authored destination first.
fn direct_line(name: &str) -> TransitLine {
    make_line(
        name,
        &[(0.03, 0.0), (0.02, 0.01), (0.01, 0.02), (0.0, 0.03)],
    )
}

/// Runs west to east along the equator, ending at the origin.
fn origin_line() -> TransitLine {
    make_line("A", &[(0.0, 0.0), (0.0, 0.01), (0.0, 0.02), (0.0, 0.03)])
}

/// Runs north to south along lon 0, starting at the destination.
fn destination_line() -> TransitLine {
    make_line("B", &[(0.03, 0.0), (0.02, 0.0), (0.01, 0.0), (0.0, 0.001)])
}

/// Nowhere near either endpoint.
fn far_line() -> TransitLine {
    make_line("lejos", &[(1.0, 1.0), (1.01, 1.01)])
}

async fn run(catalog: &MockCatalog) -> Result<MatchOutcome, MatchError> {
    let config = MatchConfig::default();
    Matcher::new(catalog, &config)
        .find_route_between(ORIGIN, DESTINATION)
        .await
}

#[tokio::test]
async fn direct_line_found() {
    let catalog = MockCatalog::new()
        .with_line(far_line())
        .with_line(direct_line("directa"));

    let outcome = run(&catalog).await.unwrap();

    assert_eq!(outcome.result, MatchResult::Direct(id("directa")));
    assert_eq!(outcome.lines.len(), 1);
    assert!(outcome.transfer.is_none());
    assert_eq!(outcome.stats.lines_listed, 2);

    let report = MatchReport::from_outcome(&outcome);
    assert_eq!(report.notice.unwrap().message, "Recorrido directa");
}

#[tokio::test]
async fn first_direct_line_in_catalog_order_wins() {
    let catalog = MockCatalog::new()
        .with_line(direct_line("primera"))
        .with_line(direct_line("segunda"));

    let outcome = run(&catalog).await.unwrap();

    assert_eq!(outcome.result, MatchResult::Direct(id("primera")));
    assert_eq!(outcome.stats.lines_evaluated, 1);
    // Every line is fetched even though the first one matches.
    assert_eq!(catalog.load_call_count(), 2);
}

#[tokio::test]
async fn combined_route_found() {
    let catalog = MockCatalog::new()
        .with_line(origin_line())
        .with_line(far_line())
        .with_line(destination_line());

    let outcome = run(&catalog).await.unwrap();

    assert_eq!(outcome.result, MatchResult::Combined(id("A"), id("B")));
    assert_eq!(outcome.stats.origin_only, 1);
    assert_eq!(outcome.stats.destination_only, 1);

    let transfer = outcome.transfer.clone().unwrap();
    assert_eq!(transfer.from_index, 0);
    assert_eq!(transfer.to_index, 3);
    assert!(transfer.distance_m <= 500.0);

    let report = MatchReport::from_outcome(&outcome);
    let message = report.notice.unwrap().message;
    assert!(message.contains("Ride Ruta A and transfer to Ruta B"));
    assert!(message.contains("Recorrido A"));
    assert!(message.contains("Recorrido B"));
}

#[tokio::test]
async fn direct_line_preferred_over_combined() {
    let catalog = MockCatalog::new()
        .with_line(origin_line())
        .with_line(destination_line())
        .with_line(direct_line("directa"));

    let outcome = run(&catalog).await.unwrap();
    assert_eq!(outcome.result, MatchResult::Direct(id("directa")));
}

#[tokio::test]
async fn nothing_nearby_is_no_match() {
    let catalog = MockCatalog::new().with_line(far_line());

    let outcome = run(&catalog).await.unwrap();

    assert_eq!(outcome.result, MatchResult::NoMatch);
    assert!(outcome.lines.is_empty());
    assert!(MatchReport::from_outcome(&outcome).requires_attention());
}

#[tokio::test]
async fn empty_catalog_is_no_match() {
    let catalog = MockCatalog::new();

    let outcome = run(&catalog).await.unwrap();

    assert_eq!(outcome.result, MatchResult::NoMatch);
    assert_eq!(outcome.stats.lines_listed, 0);
}

#[tokio::test]
async fn wrong_direction_line_is_not_a_transfer_leg() {
    // Near both endpoints but running origin-first, so it is discarded
    // outright rather than offered as either leg.
    let reversed = make_line("reversa", &[(0.0, 0.03), (0.01, 0.02), (0.02, 0.01), (0.03, 0.0)]);
    let catalog = MockCatalog::new()
        .with_line(reversed)
        .with_line(origin_line());

    let outcome = run(&catalog).await.unwrap();

    assert_eq!(outcome.result, MatchResult::NoMatch);
    assert_eq!(outcome.stats.origin_only, 1);
    assert_eq!(outcome.stats.destination_only, 0);
}

#[tokio::test]
async fn same_region_for_both_endpoints_is_no_match() {
    let neighborhood = Region::Polygon(
        Polygon::from_ring(vec![
            pt(-0.001, 0.029),
            pt(-0.001, 0.031),
            pt(0.001, 0.031),
            pt(0.001, 0.029),
        ])
        .unwrap(),
    );
    let catalog = MockCatalog::new()
        .with_line(direct_line("directa"))
        .with_line(origin_line());
    let config = MatchConfig::default();

    let outcome = Matcher::new(&catalog, &config)
        .find_route(Some(&neighborhood), Some(&neighborhood))
        .await
        .unwrap();

    assert_eq!(outcome.origin, outcome.destination);
    assert_eq!(outcome.result, MatchResult::NoMatch);
}

#[tokio::test]
async fn degenerate_line_is_skipped() {
    let catalog = MockCatalog::new()
        .with_degenerate("rota", ORIGIN)
        .with_line(direct_line("directa"));

    let outcome = run(&catalog).await.unwrap();

    assert_eq!(outcome.result, MatchResult::Direct(id("directa")));
    assert_eq!(outcome.stats.invalid_lines, vec![id("rota")]);
    assert_eq!(outcome.stats.lines_listed, 2);
}

#[tokio::test]
async fn garbled_line_is_skipped() {
    let catalog = MockCatalog::new()
        .with_garbled("mala")
        .with_line(direct_line("buena"));

    let outcome = run(&catalog).await.unwrap();

    assert_eq!(outcome.result, MatchResult::Direct(id("buena")));
    assert_eq!(outcome.stats.invalid_lines, vec![id("mala")]);
}

#[tokio::test]
async fn all_lines_degenerate_is_no_match() {
    let catalog = MockCatalog::new()
        .with_degenerate("rota1", ORIGIN)
        .with_degenerate("rota2", DESTINATION);

    let outcome = run(&catalog).await.unwrap();

    assert_eq!(outcome.result, MatchResult::NoMatch);
    assert_eq!(outcome.stats.lines_evaluated, 0);
    assert_eq!(outcome.stats.invalid_lines.len(), 2);
    let notice = MatchReport::from_outcome(&outcome).notice.unwrap();
    assert!(notice.message.contains("invalid geometry"));
}

#[tokio::test]
async fn listing_failure_is_transport_error() {
    let mut catalog = MockCatalog::new().with_line(direct_line("directa"));
    catalog.fail_listing = true;

    let err = run(&catalog).await.unwrap_err();

    assert!(matches!(&err, MatchError::Transport { what, .. } if what == "line catalog"));
    assert!(err.to_string().contains("503"));
    assert_eq!(catalog.load_call_count(), 0);
}

#[tokio::test]
async fn line_fetch_failure_aborts_run() {
    // The direct line would match, but no result is produced from a
    // partially loaded catalog.
    let catalog = MockCatalog::new()
        .with_line(direct_line("directa"))
        .with_unreachable("caida");

    let err = run(&catalog).await.unwrap_err();

    assert!(matches!(&err, MatchError::Transport { what, .. } if what == "line caida"));
}

#[tokio::test]
async fn repeated_runs_agree() {
    let catalog = MockCatalog::new()
        .with_line(origin_line())
        .with_line(destination_line())
        .with_line(far_line());

    let first = run(&catalog).await.unwrap();
    let second = run(&catalog).await.unwrap();

    assert_eq!(first.result, second.result);
    assert_eq!(first.transfer, second.transfer);
    assert_eq!(first.stats, second.stats);
}

#[tokio::test]
async fn missing_endpoint_fails_resolution() {
    let catalog = MockCatalog::new().with_line(direct_line("directa"));
    let config = MatchConfig::default();
    let destination = Region::Point(DESTINATION);

    let err = Matcher::new(&catalog, &config)
        .find_route(None, Some(&destination))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        MatchError::Resolution(ResolutionFailure::Missing(Endpoint::Origin))
    ));
    assert_eq!(catalog.load_call_count(), 0);
}

#[tokio::test]
async fn invalid_point_fails_resolution() {
    let catalog = MockCatalog::new();
    let config = MatchConfig::default();
    let origin = Region::Point(ORIGIN);
    let destination = Region::Point(pt(95.0, 0.0));

    let err = Matcher::new(&catalog, &config)
        .find_route(Some(&origin), Some(&destination))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "destination point has invalid coordinates");
}

#[tokio::test]
async fn newer_run_supersedes_older() {
    let gate = Arc::new(Notify::new());
    let slow_catalog = MockCatalog::new()
        .with_line(direct_line("lenta"))
        .gated(Arc::clone(&gate));
    let fast_catalog = MockCatalog::new().with_line(direct_line("rapida"));
    let config = MatchConfig::default();
    let session = MatchSession::new();

    let origin = Region::Point(ORIGIN);
    let destination = Region::Point(DESTINATION);

    let slow = Matcher::new(&slow_catalog, &config);
    let fast = Matcher::new(&fast_catalog, &config);

    let (older, newer) = tokio::join!(
        session.run(slow.find_route(Some(&origin), Some(&destination))),
        async {
            let outcome = session
                .run(fast.find_route(Some(&origin), Some(&destination)))
                .await;
            gate.notify_one();
            outcome
        }
    );

    assert!(matches!(older, Err(MatchError::Superseded)));
    assert_eq!(newer.unwrap().result, MatchResult::Direct(id("rapida")));
}

#[tokio::test]
async fn lower_threshold_loses_direct_match() {
    // The destination is about 157 m off this line.
    let line = make_line("cerca", &[(0.031, 0.001), (0.0, 0.03)]);
    let catalog = MockCatalog::new().with_line(line);

    let outcome = run(&catalog).await.unwrap();
    assert_eq!(outcome.result, MatchResult::Direct(id("cerca")));

    let strict = MatchConfig::default().with_proximity(100.0);
    let outcome = Matcher::new(&catalog, &strict)
        .find_route_between(ORIGIN, DESTINATION)
        .await
        .unwrap();
    assert_eq!(outcome.result, MatchResult::NoMatch);
}
