pub mod error;
pub mod incidents;
pub mod scoring;
pub mod upstream;

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tower_http::cors::CorsLayer;

use crate::error::RouteApiError;
use crate::incidents::IncidentStore;
use crate::scoring::score_route;
use crate::upstream::DirectionsClient;
use shared::{HeatPoint, IncidentRecord, RouteData};

#[derive(Clone)]
pub struct AppState {
    pub incidents: Arc<IncidentStore>,
    pub directions: Arc<DirectionsClient>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/route", get(route_handler))
        .route("/incidents", get(incidents_handler))
        .route("/safety-data", get(safety_data_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct RouteQuery {
    #[serde(default)]
    start: String,
    #[serde(default)]
    end: String,
}

async fn route_handler(
    State(state): State<AppState>,
    Query(query): Query<RouteQuery>,
) -> Result<Json<RouteData>, RouteApiError> {
    let start = query.start.trim();
    let end = query.end.trim();
    if start.is_empty() || end.is_empty() {
        return Err(RouteApiError::MissingLocations);
    }

    let origin = state
        .directions
        .resolve(start)
        .await?
        .ok_or(RouteApiError::Unresolvable)?;
    let destination = state
        .directions
        .resolve(end)
        .await?
        .ok_or(RouteApiError::Unresolvable)?;

    let walk = state
        .directions
        .walking_route(origin, destination)
        .await?
        .ok_or(RouteApiError::NoRoute)?;

    let score = score_route(&walk.coordinates, state.incidents.all());
    tracing::debug!(
        points = walk.coordinates.len(),
        safety_score = score.safety_score,
        "scored route from {start} to {end}"
    );

    Ok(Json(RouteData {
        coordinates: walk.coordinates,
        segment_scores: score.segment_scores,
        safety_score: score.safety_score,
        distance: walk.distance,
        duration: walk.duration,
    }))
}

async fn incidents_handler(State(state): State<AppState>) -> Json<Vec<IncidentRecord>> {
    Json(state.incidents.all().to_vec())
}

async fn safety_data_handler(State(state): State<AppState>) -> Json<Vec<HeatPoint>> {
    Json(state.incidents.heat_points())
}
