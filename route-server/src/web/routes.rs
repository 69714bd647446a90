//! HTTP route handlers.

use std::path::Path;

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Path as UrlPath, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::catalog::CatalogError;
use crate::domain::LineId;
use crate::matcher::{Endpoint, MatchError, MatchOutcome, MatchReport, Matcher};
use crate::stops::StopDirectory;

use super::dto::*;
use super::state::AppState;

/// Default and maximum neighborhood search results.
const DEFAULT_REGION_LIMIT: usize = 20;
const MAX_REGION_LIMIT: usize = 200;

/// Create the application router.
///
/// `assets_dir`, when given, is served under `/assets` so map clients can
/// draw the same GeoJSON the matcher reads.
pub fn create_router(state: AppState, assets_dir: Option<&Path>) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .route("/api/lines", get(list_lines))
        .route("/api/lines/:id", get(line_detail))
        .route("/api/regions", get(search_regions))
        .route("/api/match", post(match_route));

    let router = match assets_dir {
        Some(dir) => router.nest_service("/assets", ServeDir::new(dir)),
        None => router,
    };

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// List every line in the catalog.
async fn list_lines(State(state): State<AppState>) -> Result<Json<LinesResponse>, AppError> {
    let lines = state.catalog.list_lines().await?;
    Ok(Json(LinesResponse { lines }))
}

/// Fetch one line with its geometry and stops.
async fn line_detail(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<String>,
) -> Result<Json<LineDetailResponse>, AppError> {
    let id = LineId::parse(&id).map_err(|e| AppError::BadRequest {
        message: e.to_string(),
        endpoint: None,
    })?;

    let line = state.catalog.find_line(&id).await?;
    let stops = state
        .stops
        .along(&line.polyline, state.config.stop_snap_m)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(LineDetailResponse::new(line, stops)))
}

/// Search neighborhoods by name.
async fn search_regions(
    State(state): State<AppState>,
    Query(req): Query<RegionSearchRequest>,
) -> Json<RegionSearchResponse> {
    let limit = req
        .limit
        .unwrap_or(DEFAULT_REGION_LIMIT)
        .min(MAX_REGION_LIMIT);
    let regions = state.regions.search(&req.q, limit).await;
    Json(RegionSearchResponse { regions })
}

/// Find a direct or combined route between two locations.
async fn match_route(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<MatchResponse>, AppError> {
    // Parse JSON manually so we can log the body on failure
    let req: MatchRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, body = %String::from_utf8_lossy(&body), "invalid match request");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
            endpoint: None,
        }
    })?;

    let session = state.sessions.get_or_create(req.session.as_deref()).await;
    let outcome = session.run(find_route(&state, &req)).await?;

    let report = report_with_stops(&outcome, &state.stops, state.config.stop_snap_m);
    Ok(Json(MatchResponse::from(report)))
}

/// Resolve both endpoints and run the matcher.
async fn find_route(state: &AppState, req: &MatchRequest) -> Result<MatchOutcome, MatchError> {
    let origin = resolve_spec(Endpoint::Origin, req.origin.as_ref(), &state.regions).await?;
    let destination =
        resolve_spec(Endpoint::Destination, req.destination.as_ref(), &state.regions).await?;

    Matcher::new(state.catalog.as_ref(), &state.config)
        .find_route(origin.as_ref(), destination.as_ref())
        .await
}

/// Package an outcome, listing each matched line's stops.
fn report_with_stops(outcome: &MatchOutcome, stops: &StopDirectory, snap_m: f64) -> MatchReport {
    let mut report = MatchReport::from_outcome(outcome);
    for (summary, line) in report.lines.iter_mut().zip(&outcome.lines) {
        summary.stops = stops
            .along(&line.polyline, snap_m)
            .into_iter()
            .map(|s| s.name.clone())
            .collect();
    }
    report
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest {
        message: String,
        endpoint: Option<Endpoint>,
    },
    NotFound {
        message: String,
    },
    Conflict {
        message: String,
    },
    BadGateway {
        message: String,
    },
}

impl From<MatchError> for AppError {
    fn from(e: MatchError) -> Self {
        match e {
            MatchError::Resolution(failure) => AppError::BadRequest {
                endpoint: Some(failure.endpoint()),
                message: failure.to_string(),
            },
            MatchError::Transport { .. } => AppError::BadGateway {
                message: e.to_string(),
            },
            MatchError::Superseded => AppError::Conflict {
                message: e.to_string(),
            },
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::NotFound(_) => AppError::NotFound {
                message: e.to_string(),
            },
            _ => AppError::BadGateway {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message, endpoint) = match self {
            AppError::BadRequest { message, endpoint } => {
                (StatusCode::BAD_REQUEST, message, endpoint)
            }
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message, None),
            AppError::Conflict { message } => (StatusCode::CONFLICT, message, None),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message, None),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse {
            error: message,
            endpoint,
        });
        (status, body).into_response()
    }
}
