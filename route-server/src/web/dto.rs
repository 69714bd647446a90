//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{GeoPoint, LineEntry, LineId, Region, TransitLine};
use crate::matcher::{
    Endpoint, LineSummary, MatchReport, MatchResult, MatchStats, Notice, ResolutionFailure,
    TransferPoint,
};
use crate::regions::{RegionDirectory, RegionEntry};
use crate::stops::Stop;

/// An origin or destination as chosen by the user.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSpec {
    /// A neighborhood picked by name
    Neighborhood(String),

    /// A point picked on the map
    Point(GeoPoint),
}

impl LocationSpec {
    /// Look the location up, yielding a matchable region.
    pub async fn to_region(
        &self,
        endpoint: Endpoint,
        regions: &RegionDirectory,
    ) -> Result<Region, ResolutionFailure> {
        match self {
            LocationSpec::Point(point) => Ok(Region::Point(*point)),
            LocationSpec::Neighborhood(name) => regions
                .get(name)
                .await
                .map(|n| n.region())
                .ok_or_else(|| ResolutionFailure::UnknownRegion {
                    endpoint,
                    name: name.clone(),
                }),
        }
    }
}

/// Resolve an optional location spec. A missing spec stays missing so the
/// matcher reports it.
pub async fn resolve_spec(
    endpoint: Endpoint,
    spec: Option<&LocationSpec>,
    regions: &RegionDirectory,
) -> Result<Option<Region>, ResolutionFailure> {
    match spec {
        Some(spec) => spec.to_region(endpoint, regions).await.map(Some),
        None => Ok(None),
    }
}

/// Request to match a route.
#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    /// Client session; a newer request on the same session supersedes this one
    pub session: Option<String>,

    pub origin: Option<LocationSpec>,

    pub destination: Option<LocationSpec>,
}

/// Route found by a match.
#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultDto {
    Direct { line: LineId },
    Combined { first: LineId, second: LineId },
    NoMatch,
}

impl From<&MatchResult> for ResultDto {
    fn from(result: &MatchResult) -> Self {
        match result {
            MatchResult::Direct(line) => ResultDto::Direct { line: line.clone() },
            MatchResult::Combined(first, second) => ResultDto::Combined {
                first: first.clone(),
                second: second.clone(),
            },
            MatchResult::NoMatch => ResultDto::NoMatch,
        }
    }
}

/// Response for a match.
#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub result: ResultDto,

    /// Matched lines in riding order
    pub lines: Vec<LineSummary>,

    /// Where to change lines, for combined routes
    pub transfer: Option<TransferPoint>,

    /// Resolved origin query point
    pub origin: GeoPoint,

    /// Resolved destination query point
    pub destination: GeoPoint,

    /// Message for the user; always present when nothing matched
    pub notice: Option<Notice>,

    /// Whether the notice must be shown as an alert
    pub requires_attention: bool,

    pub stats: MatchStats,
}

impl From<MatchReport> for MatchResponse {
    fn from(report: MatchReport) -> Self {
        Self {
            result: ResultDto::from(&report.result),
            requires_attention: report.requires_attention(),
            lines: report.lines,
            transfer: report.transfer,
            origin: report.origin,
            destination: report.destination,
            notice: report.notice,
            stats: report.stats,
        }
    }
}

/// Response listing the catalog.
#[derive(Debug, Serialize)]
pub struct LinesResponse {
    pub lines: Vec<LineEntry>,
}

/// One line with its geometry.
#[derive(Debug, Serialize)]
pub struct LineDetailResponse {
    pub id: LineId,
    pub name: String,
    pub description: Option<String>,

    /// Polyline vertices in file order
    pub coordinates: Vec<GeoPoint>,

    /// Stops served, in travel order
    pub stops: Vec<Stop>,
}

impl LineDetailResponse {
    pub fn new(line: TransitLine, stops: Vec<Stop>) -> Self {
        Self {
            coordinates: line.polyline.points().to_vec(),
            id: line.id,
            name: line.name,
            description: line.description,
            stops,
        }
    }
}

/// Query for neighborhood search.
#[derive(Debug, Deserialize)]
pub struct RegionSearchRequest {
    /// Search text (empty lists everything)
    #[serde(default)]
    pub q: String,

    /// Maximum results
    pub limit: Option<usize>,
}

/// Response for neighborhood search.
#[derive(Debug, Serialize)]
pub struct RegionSearchResponse {
    pub regions: Vec<RegionEntry>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,

    /// Which endpoint failed to resolve, if that was the problem
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<Endpoint>,
}
