use std::time::Duration;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use route_server::catalog::{Catalog, HttpCatalog};
use route_server::config::{AssetLocation, ServerConfig};
use route_server::regions::RegionDirectory;
use route_server::sessions::SessionRegistry;
use route_server::stops::StopDirectory;
use route_server::web::{AppState, create_router};

/// How often to refresh neighborhood boundaries (24 hours).
const REGION_REFRESH_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("route_server=info,tower_http=info")),
        )
        .init();

    let config = ServerConfig::from_env();

    // Create the catalog
    let catalog = match &config.assets {
        AssetLocation::Http(http) => {
            info!(url = %http.base_url, "reading assets over HTTP");
            let client =
                HttpCatalog::new(http.clone()).expect("Failed to create HTTP catalog client");
            Catalog::http(client)
        }
        AssetLocation::Directory(dir) => {
            info!(dir = %dir.display(), "reading assets from directory");
            Catalog::directory(dir)
        }
    };

    // Fetch neighborhoods (fail fast if unavailable)
    let regions = RegionDirectory::load(catalog.clone())
        .await
        .expect("Failed to load neighborhoods");
    if regions.is_empty().await {
        warn!("no usable neighborhoods; only map points can be matched");
    } else {
        info!(count = regions.len().await, "loaded neighborhoods");
    }

    let stops = match catalog.list_stops().await {
        Ok(stops) => StopDirectory::new(stops),
        Err(e) => {
            warn!(error = %e, "failed to load stops; lines will be shown without stops");
            StopDirectory::default()
        }
    };
    info!(count = stops.len(), "loaded stops");

    // Spawn background task to refresh neighborhoods daily
    let regions_refresh = regions.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(REGION_REFRESH_INTERVAL);
        interval.tick().await; // First tick is immediate, skip it
        loop {
            interval.tick().await;
            match regions_refresh.refresh().await {
                Ok(count) => info!(count, "refreshed neighborhoods"),
                Err(e) => error!(error = %e, "failed to refresh neighborhoods"),
            }
        }
    });

    let assets_dir = catalog.source().directory().map(|d| d.to_path_buf());
    let state = AppState::new(
        catalog,
        regions,
        stops,
        SessionRegistry::new(&config.sessions),
        config.matching.clone(),
    );
    let app = create_router(state, assets_dir.as_deref());

    let addr = config.bind_addr;
    info!("Route matcher listening on http://{addr}");
    info!("  GET  /health           - Health check");
    info!("  GET  /api/lines        - Line catalog");
    info!("  GET  /api/lines/:id    - One line with stops");
    info!("  GET  /api/regions?q=   - Neighborhood search");
    info!("  POST /api/match        - Match a route");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app).await.expect("Server error");
}
