//! Discarding results of superseded runs.

use std::sync::atomic::{AtomicU64, Ordering};

use std::future::Future;

use super::engine::MatchError;

/// Tracks the latest matching run for one client.
///
/// Every run takes a ticket when it starts. A run whose ticket is no longer
/// the latest when it finishes is reported as superseded instead of being
/// emitted, so a slow earlier query can never overwrite a fresher one.
#[derive(Debug, Default)]
pub struct MatchSession {
    generation: AtomicU64,
}

/// Ticket identifying one run within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunTicket(u64);

impl MatchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a run, invalidating any run still in flight.
    pub fn begin(&self) -> RunTicket {
        RunTicket(self.generation.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Whether `ticket` belongs to the most recently started run.
    pub fn is_current(&self, ticket: RunTicket) -> bool {
        self.generation.load(Ordering::Acquire) == ticket.0
    }

    /// Run `work` as the session's latest run.
    ///
    /// The ticket is taken before `work` is first polled, so everything the
    /// run does (including endpoint lookup) counts as part of it.
    pub async fn run<T, F>(&self, work: F) -> Result<T, MatchError>
    where
        F: Future<Output = Result<T, MatchError>>,
    {
        let ticket = self.begin();
        let result = work.await;
        self.finish(ticket, result)
    }

    /// Pass `result` through if `ticket` is still current.
    pub fn finish<T>(
        &self,
        ticket: RunTicket,
        result: Result<T, MatchError>,
    ) -> Result<T, MatchError> {
        if self.is_current(ticket) {
            result
        } else {
            tracing::debug!(ticket = ticket.0, "discarding superseded match run");
            Err(MatchError::Superseded)
        }
    }
}
