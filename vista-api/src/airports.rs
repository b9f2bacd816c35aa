use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use vista_core::Airport;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AirportSearchQuery {
    #[serde(default)]
    pub search: String,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/airports", get(search_airports))
}

/// GET /v1/airports?search=
pub async fn search_airports(
    State(state): State<AppState>,
    Query(query): Query<AirportSearchQuery>,
) -> Result<Json<Vec<Airport>>, AppError> {
    let airports = state.airports.search(&query.search).await?;
    Ok(Json(airports))
}
