//! Matching configuration.

/// Default distance within which a query point counts as served by a line.
pub const DEFAULT_PROXIMITY_METERS: f64 = 400.0;

/// Default distance within which two lines' vertices allow a transfer.
pub const DEFAULT_TRANSFER_METERS: f64 = 500.0;

/// Default distance within which a stop counts as served by a line.
pub const DEFAULT_STOP_SNAP_METERS: f64 = 40.0;

/// Thresholds used by the route matcher.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchConfig {
    /// Maximum distance (meters) from an origin or destination to a line
    /// for the line to count as near that endpoint. Inclusive.
    pub proximity_threshold_m: f64,

    /// Maximum distance (meters) between a vertex of the first line and a
    /// vertex of the second for a transfer between them. Inclusive.
    pub transfer_threshold_m: f64,

    /// Maximum distance (meters) from a stop to a line for the stop to be
    /// listed as served by that line.
    pub stop_snap_m: f64,
}

impl MatchConfig {
    /// Create a new configuration with the given thresholds.
    pub fn new(proximity_threshold_m: f64, transfer_threshold_m: f64, stop_snap_m: f64) -> Self {
        Self {
            proximity_threshold_m,
            transfer_threshold_m,
            stop_snap_m,
        }
    }

    /// Replace the proximity threshold.
    pub fn with_proximity(mut self, meters: f64) -> Self {
        self.proximity_threshold_m = meters;
        self
    }

    /// Replace the transfer threshold.
    pub fn with_transfer(mut self, meters: f64) -> Self {
        self.transfer_threshold_m = meters;
        self
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            proximity_threshold_m: DEFAULT_PROXIMITY_METERS,
            transfer_threshold_m: DEFAULT_TRANSFER_METERS,
            stop_snap_m: DEFAULT_STOP_SNAP_METERS,
        }
    }
}
