//! Route matching engine.
//!
//! Answers: "which transit line, or which pair of lines with one transfer,
//! takes me from this origin to this destination?"
//!
//! Origins and destinations are neighborhood polygons or map points and are
//! resolved to a single query point each. Every catalog line is then tested
//! for proximity to both points and for travel direction; if none serves
//! both, pairs of lines are searched for a nearby transfer point.

mod config;
mod direct;
mod engine;
mod resolve;
mod result;
mod session;
mod transfer;

#[cfg(test)]
mod engine_tests;

pub use config::{
    DEFAULT_PROXIMITY_METERS, DEFAULT_STOP_SNAP_METERS, DEFAULT_TRANSFER_METERS, MatchConfig,
};
pub use direct::{Classification, MatchCandidate};
pub use engine::{LineCatalog, MatchError, Matcher, match_lines};
pub use resolve::{Endpoint, ResolutionFailure, resolve_location};
pub use result::{
    LineSummary, MatchOutcome, MatchReport, MatchResult, MatchStats, Notice, NoticeLevel,
};
pub use session::{MatchSession, RunTicket};
pub use transfer::{Transfer, TransferPoint, find_transfer};
