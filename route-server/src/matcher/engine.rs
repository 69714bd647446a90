//! The route matching engine.
//!
//! Loads every catalog line, measures each against the resolved origin and
//! destination, and returns the first direct line in catalog order. When no
//! line is direct, the lines near only one endpoint feed the transfer search.

use std::future::Future;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::catalog::CatalogError;
use crate::domain::{GeoPoint, LineEntry, Region, TransitLine};

use super::config::MatchConfig;
use super::direct::{Classification, MatchCandidate};
use super::resolve::{Endpoint, ResolutionFailure, resolve_location};
use super::result::{MatchOutcome, MatchResult, MatchStats};
use super::transfer::find_transfer;

/// Error from a matching run.
///
/// `NoMatch` is not an error; it is a [`MatchResult`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum MatchError {
    /// Origin or destination could not be resolved.
    #[error(transparent)]
    Resolution(#[from] ResolutionFailure),

    /// The catalog or a line's geometry could not be fetched.
    #[error("failed to load {what}: {message}")]
    Transport { what: String, message: String },

    /// A newer run started on the same session before this one finished.
    #[error("match run was superseded by a newer request")]
    Superseded,
}

/// Source of transit lines for the engine.
///
/// This abstraction allows the engine to be tested with in-memory lines.
pub trait LineCatalog {
    /// List every line in catalog order.
    fn list_lines(&self) -> impl Future<Output = Result<Vec<LineEntry>, CatalogError>> + Send;

    /// Fetch one line's geometry.
    ///
    /// Payloads with fewer than two coordinates fail with
    /// [`CatalogError::InvalidGeometry`]; payloads that are not line GeoJSON
    /// at all fail with [`CatalogError::InvalidPayload`].
    fn load_line(
        &self,
        entry: &LineEntry,
    ) -> impl Future<Output = Result<TransitLine, CatalogError>> + Send;
}

/// Route matcher over a line catalog.
pub struct Matcher<'a, C: LineCatalog> {
    catalog: &'a C,
    config: &'a MatchConfig,
}

impl<'a, C: LineCatalog + Sync> Matcher<'a, C> {
    /// Create a new matcher.
    pub fn new(catalog: &'a C, config: &'a MatchConfig) -> Self {
        Self { catalog, config }
    }

    /// Resolve both regions and find a route between them.
    pub async fn find_route(
        &self,
        origin: Option<&Region>,
        destination: Option<&Region>,
    ) -> Result<MatchOutcome, MatchError> {
        let origin = resolve_location(Endpoint::Origin, origin)?;
        let destination = resolve_location(Endpoint::Destination, destination)?;
        self.find_route_between(origin, destination).await
    }

    /// Find a route between two resolved query points.
    pub async fn find_route_between(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
    ) -> Result<MatchOutcome, MatchError> {
        let entries = self
            .catalog
            .list_lines()
            .await
            .map_err(|e| MatchError::Transport {
                what: "line catalog".to_string(),
                message: e.to_string(),
            })?;

        let (lines, mut stats) = self.load_all(&entries).await?;
        stats.lines_listed = entries.len();

        let outcome = match_lines(&lines, origin, destination, self.config, stats);
        if outcome.result.is_match() {
            let lines = outcome.result.line_ids();
            info!(%origin, %destination, ?lines, "route found");
        } else {
            warn!(%origin, %destination, "no route found");
        }
        Ok(outcome)
    }

    /// Fetch every line, waiting for all fetches before returning.
    ///
    /// Lines come back in catalog order regardless of completion order.
    /// An invalid payload or geometry excludes that line; any other failure
    /// aborts the run.
    async fn load_all(
        &self,
        entries: &[LineEntry],
    ) -> Result<(Vec<Arc<TransitLine>>, MatchStats), MatchError> {
        let results = join_all(entries.iter().map(|e| self.catalog.load_line(e))).await;

        let mut lines = Vec::with_capacity(entries.len());
        let mut stats = MatchStats::default();

        for (entry, result) in entries.iter().zip(results) {
            match result {
                Ok(line) => lines.push(Arc::new(line)),
                Err(CatalogError::InvalidGeometry { id, source }) => {
                    warn!(line = %id, error = %source, "skipping line with invalid geometry");
                    stats.invalid_lines.push(id);
                }
                Err(CatalogError::InvalidPayload { id, message }) => {
                    warn!(line = %id, error = %message, "skipping line with invalid payload");
                    stats.invalid_lines.push(id);
                }
                Err(e) => {
                    return Err(MatchError::Transport {
                        what: format!("line {}", entry.id),
                        message: e.to_string(),
                    });
                }
            }
        }

        Ok((lines, stats))
    }
}

/// Match already-loaded lines against two query points.
///
/// Lines are evaluated in slice order; the first direct line wins. Only if
/// none is direct does the transfer search run, over the complete
/// near-origin-only and near-destination-only sets.
pub fn match_lines(
    lines: &[Arc<TransitLine>],
    origin: GeoPoint,
    destination: GeoPoint,
    config: &MatchConfig,
    mut stats: MatchStats,
) -> MatchOutcome {
    let mut origin_only = Vec::new();
    let mut destination_only = Vec::new();

    for line in lines {
        let candidate = MatchCandidate::measure(Arc::clone(line), origin, destination);
        stats.lines_evaluated += 1;

        let classification = candidate.classify(config);
        debug!(
            line = %line.id,
            to_origin = candidate.distance_to_origin,
            to_destination = candidate.distance_to_destination,
            ?classification,
            "evaluated line"
        );

        match classification {
            Classification::Direct => {
                return MatchOutcome {
                    result: MatchResult::Direct(line.id.clone()),
                    lines: vec![Arc::clone(line)],
                    transfer: None,
                    origin,
                    destination,
                    stats,
                };
            }
            Classification::OriginOnly => origin_only.push(candidate),
            Classification::DestinationOnly => destination_only.push(candidate),
            Classification::Discarded => {}
        }
    }

    stats.origin_only = origin_only.len();
    stats.destination_only = destination_only.len();

    match find_transfer(&origin_only, &destination_only, config) {
        Some(transfer) => MatchOutcome {
            result: MatchResult::Combined(
                transfer.first.line.id.clone(),
                transfer.second.line.id.clone(),
            ),
            lines: vec![
                Arc::clone(&transfer.first.line),
                Arc::clone(&transfer.second.line),
            ],
            transfer: Some(transfer.point),
            origin,
            destination,
            stats,
        },
        None => MatchOutcome {
            result: MatchResult::NoMatch,
            lines: Vec::new(),
            transfer: None,
            origin,
            destination,
            stats,
        },
    }
}
