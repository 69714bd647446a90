//! Application state for the web layer.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::matcher::MatchConfig;
use crate::regions::RegionDirectory;
use crate::sessions::SessionRegistry;
use crate::stops::StopDirectory;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Line, neighborhood and stop assets
    pub catalog: Arc<Catalog>,

    /// Neighborhood lookup
    pub regions: RegionDirectory,

    /// Stops shown along matched lines
    pub stops: StopDirectory,

    /// Per-client match sessions
    pub sessions: SessionRegistry,

    /// Matching thresholds
    pub config: Arc<MatchConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        catalog: Catalog,
        regions: RegionDirectory,
        stops: StopDirectory,
        sessions: SessionRegistry,
        config: MatchConfig,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            regions,
            stops,
            sessions,
            config: Arc::new(config),
        }
    }
}
