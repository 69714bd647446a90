//! Server configuration from the environment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;

use crate::catalog::HttpCatalogConfig;
use crate::matcher::MatchConfig;
use crate::sessions::SessionConfig;

/// Default local asset directory.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Default listen address.
pub const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 3000);

/// Where catalog assets come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetLocation {
    Directory(PathBuf),
    Http(HttpCatalogConfig),
}

/// Everything needed to start the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub assets: AssetLocation,
    pub bind_addr: SocketAddr,
    pub matching: MatchConfig,
    pub sessions: SessionConfig,
}

impl ServerConfig {
    /// Read configuration from process environment variables.
    ///
    /// - `ROUTES_BASE_URL`: fetch assets over HTTP from this base URL
    /// - `ROUTES_MAX_CONCURRENT`, `ROUTES_TIMEOUT_SECS`: limits for those fetches
    /// - `ROUTES_DATA_DIR`: otherwise, read assets from this directory
    /// - `BIND_ADDR`: listen address
    /// - `PROXIMITY_METERS`, `TRANSFER_METERS`: matching thresholds
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`.
    ///
    /// Values that fail to parse fall back to their defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let assets = match lookup("ROUTES_BASE_URL").filter(|u| !u.trim().is_empty()) {
            Some(url) => {
                let http = HttpCatalogConfig::new(url.trim());
                let max_concurrent = parse_or(&lookup, "ROUTES_MAX_CONCURRENT", http.max_concurrent);
                let timeout_secs = parse_or(&lookup, "ROUTES_TIMEOUT_SECS", http.timeout_secs);
                AssetLocation::Http(
                    http.with_max_concurrent(max_concurrent)
                        .with_timeout(timeout_secs),
                )
            }
            None => AssetLocation::Directory(PathBuf::from(
                lookup("ROUTES_DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()),
            )),
        };

        let bind_addr = parse_or(&lookup, "BIND_ADDR", DEFAULT_BIND_ADDR);

        let defaults = MatchConfig::default();
        let proximity = parse_or(&lookup, "PROXIMITY_METERS", defaults.proximity_threshold_m);
        let transfer = parse_or(&lookup, "TRANSFER_METERS", defaults.transfer_threshold_m);

        let proximity = positive_or(proximity, defaults.proximity_threshold_m);
        let transfer = positive_or(transfer, defaults.transfer_threshold_m);

        Self {
            assets,
            bind_addr,
            matching: defaults.with_proximity(proximity).with_transfer(transfer),
            sessions: SessionConfig::default(),
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "ignoring unparseable setting");
            default
        }),
    }
}

fn positive_or(value: f64, default: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        warn!(value, "threshold must be a positive distance");
        default
    }
}
