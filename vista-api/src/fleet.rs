use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use vista_catalog::{Aircraft, AircraftCategory, Yacht, YachtSize};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AircraftQuery {
    pub category: Option<AircraftCategory>,
}

#[derive(Debug, Deserialize)]
pub struct YachtQuery {
    pub size: Option<YachtSize>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/fleet/aircraft", get(list_aircraft))
        .route("/v1/fleet/yachts", get(list_yachts))
}

/// GET /v1/fleet/aircraft?category=
pub async fn list_aircraft(
    State(state): State<AppState>,
    Query(query): Query<AircraftQuery>,
) -> Result<Json<Vec<Aircraft>>, AppError> {
    Ok(Json(state.fleet.list_aircraft(query.category).await?))
}

/// GET /v1/fleet/yachts?size=
pub async fn list_yachts(
    State(state): State<AppState>,
    Query(query): Query<YachtQuery>,
) -> Result<Json<Vec<Yacht>>, AppError> {
    Ok(Json(state.fleet.list_yachts(query.size).await?))
}
