//! Match outcomes and the report handed to the presentation layer.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::{GeoPoint, LineId, TransitLine};

use super::transfer::TransferPoint;

/// Outcome of one matching run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    /// One line serves both origin and destination.
    Direct(LineId),
    /// Ride the first line, then transfer to the second.
    Combined(LineId, LineId),
    /// No direct line and no viable transfer.
    NoMatch,
}

impl MatchResult {
    pub fn is_match(&self) -> bool {
        !matches!(self, MatchResult::NoMatch)
    }

    /// Line ids in riding order.
    pub fn line_ids(&self) -> Vec<&LineId> {
        match self {
            MatchResult::Direct(id) => vec![id],
            MatchResult::Combined(first, second) => vec![first, second],
            MatchResult::NoMatch => Vec::new(),
        }
    }
}

/// Counters describing how a run went.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchStats {
    /// Lines in the catalog listing.
    pub lines_listed: usize,
    /// Lines measured against the query points.
    pub lines_evaluated: usize,
    /// Lines excluded because their geometry was invalid.
    pub invalid_lines: Vec<LineId>,
    /// Size of the near-origin-only set.
    pub origin_only: usize,
    /// Size of the near-destination-only set.
    pub destination_only: usize,
}

/// Everything the engine knows after a run.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub result: MatchResult,
    /// Matched lines in riding order (empty on `NoMatch`).
    pub lines: Vec<Arc<TransitLine>>,
    /// Transfer details for `Combined`.
    pub transfer: Option<TransferPoint>,
    /// Resolved origin query point.
    pub origin: GeoPoint,
    /// Resolved destination query point.
    pub destination: GeoPoint,
    pub stats: MatchStats,
}

/// Shown in place of a missing line description.
const NO_DESCRIPTION: &str = "Not available";

/// How prominently a notice should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Warning,
}

/// User-facing message accompanying a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Summary of a matched line for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSummary {
    pub id: LineId,
    pub name: String,
    pub description: Option<String>,
    /// Names of stops served by the line, in travel order.
    pub stops: Vec<String>,
}

impl LineSummary {
    pub fn from_line(line: &TransitLine) -> Self {
        Self {
            id: line.id.clone(),
            name: line.name.clone(),
            description: line.description.clone(),
            stops: Vec::new(),
        }
    }
}

/// The packaged result of a run, ready for the presentation layer.
#[derive(Debug, Clone)]
pub struct MatchReport {
    pub result: MatchResult,
    pub lines: Vec<LineSummary>,
    pub transfer: Option<TransferPoint>,
    pub origin: GeoPoint,
    pub destination: GeoPoint,
    /// Info for a match, a warning on `NoMatch`.
    pub notice: Option<Notice>,
    pub stats: MatchStats,
}

impl MatchReport {
    /// Package an outcome.
    pub fn from_outcome(outcome: &MatchOutcome) -> Self {
        let lines: Vec<LineSummary> = outcome
            .lines
            .iter()
            .map(|line| LineSummary::from_line(line))
            .collect();

        let notice = match (&outcome.result, lines.as_slice()) {
            (MatchResult::Direct(_), [line]) => Some(Notice {
                level: NoticeLevel::Info,
                message: describe(line).to_string(),
            }),
            (MatchResult::Combined(..), [first, second]) => Some(Notice {
                level: NoticeLevel::Info,
                message: transfer_message(first, second, outcome.transfer.as_ref()),
            }),
            (MatchResult::NoMatch, _) => Some(no_match_notice(&outcome.stats)),
            _ => None,
        };

        Self {
            result: outcome.result.clone(),
            lines,
            transfer: outcome.transfer.clone(),
            origin: outcome.origin,
            destination: outcome.destination,
            notice,
            stats: outcome.stats.clone(),
        }
    }

    /// Whether the caller must alert the user.
    pub fn requires_attention(&self) -> bool {
        self.notice
            .as_ref()
            .is_some_and(|n| n.level == NoticeLevel::Warning)
    }
}

fn describe(line: &LineSummary) -> &str {
    line.description.as_deref().unwrap_or(NO_DESCRIPTION)
}

fn transfer_message(
    first: &LineSummary,
    second: &LineSummary,
    transfer: Option<&TransferPoint>,
) -> String {
    let mut message = format!(
        "No direct route found, take a combined route.\nRide {} and transfer to {}",
        first.name, second.name
    );
    if let Some(t) = transfer {
        message.push_str(&format!(" (about {:.0} m apart)", t.distance_m));
    }
    message.push('.');
    for line in [first, second] {
        message.push_str(&format!(
            "\nDescription of {}:\n{}",
            line.name,
            describe(line)
        ));
    }
    message
}

fn no_match_notice(stats: &MatchStats) -> Notice {
    let message = if stats.lines_evaluated == 0 && stats.lines_listed > 0 {
        "No route could be evaluated: every line in the catalog has invalid geometry.".to_string()
    } else {
        "No direct or combined route connects the selected origin and destination.".to_string()
    };
    Notice {
        level: NoticeLevel::Warning,
        message,
    }
}
