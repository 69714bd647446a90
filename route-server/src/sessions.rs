//! Per-client match sessions.
//!
//! Each client names a session in its match requests. Runs on the same
//! session supersede each other; runs on different sessions are
//! independent. Idle sessions expire.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::matcher::MatchSession;

/// Session used when a request does not name one.
pub const ANONYMOUS_SESSION: &str = "anonymous";

/// Configuration for the session registry.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Sessions unused for this long are dropped.
    pub idle_ttl: Duration,

    /// Maximum number of live sessions.
    pub max_capacity: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_ttl: Duration::from_secs(30 * 60),
            max_capacity: 10_000,
        }
    }
}

/// Registry of live match sessions, keyed by client-chosen id.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: MokaCache<String, Arc<MatchSession>>,
}

impl SessionRegistry {
    pub fn new(config: &SessionConfig) -> Self {
        let sessions = MokaCache::builder()
            .time_to_idle(config.idle_ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { sessions }
    }

    /// The session for `id`, created on first use.
    pub async fn get_or_create(&self, id: Option<&str>) -> Arc<MatchSession> {
        let key = match id.map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => ANONYMOUS_SESSION.to_string(),
        };
        self.sessions
            .get_with(key, async { Arc::new(MatchSession::new()) })
            .await
    }

    /// Number of live sessions (approximate, for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.sessions.entry_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn same_id_same_session() {
        let registry = SessionRegistry::new(&SessionConfig::default());
        let a = registry.get_or_create(Some("tab-1")).await;
        let b = registry.get_or_create(Some("tab-1")).await;
        let c = registry.get_or_create(Some("tab-2")).await;

        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
    }

    #[tokio::test]
    async fn missing_id_is_anonymous() {
        let registry = SessionRegistry::new(&SessionConfig::default());
        let a = registry.get_or_create(None).await;
        let b = registry.get_or_create(Some("  ")).await;
        let c = registry.get_or_create(Some(ANONYMOUS_SESSION)).await;

        assert!(Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&a, &c));
    }

    #[tokio::test]
    async fn sessions_supersede_independently() {
        let registry = SessionRegistry::new(&SessionConfig::default());
        let a = registry.get_or_create(Some("a")).await;
        let b = registry.get_or_create(Some("b")).await;

        let ticket_a = a.begin();
        let _ticket_b = b.begin();
        assert!(a.is_current(ticket_a));

        let _newer_a = registry.get_or_create(Some("a")).await.begin();
        assert!(!a.is_current(ticket_a));
    }
}
