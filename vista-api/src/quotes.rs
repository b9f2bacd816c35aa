use axum::{extract::State, routing::post, Extension, Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use vista_catalog::{AddOns, CharterQuote, CharterQuoteOptions, FlightQuote, FlightQuoteOptions, QuickEstimate};
use vista_core::{Airport, DateRange, IataCode};

use crate::error::AppError;
use crate::middleware::StaffClaims;
use crate::state::AppState;

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct QuickQuoteRequest {
    pub origin: String,
    pub destination: String,
    pub aircraft_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct RouteQuoteRequest {
    pub origin: String,
    pub destination: String,
    pub aircraft_id: Uuid,
    pub passengers: u32,
    #[serde(default)]
    pub round_trip: bool,
    #[serde(default)]
    pub add_ons: AddOns,
    #[serde(default)]
    pub discount_pct: f64,
    pub commission_pct: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct CharterQuoteRequest {
    pub yacht_id: Uuid,
    pub charter_start: NaiveDate,
    pub charter_end: NaiveDate,
    pub guests: u32,
    #[serde(default)]
    pub add_ons: AddOns,
    #[serde(default)]
    pub discount_pct: f64,
    pub commission_pct: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct RouteQuoteResponse {
    pub origin_airport: Airport,
    pub destination_airport: Airport,
    pub aircraft_name: String,
    pub quoted_by: String,
    pub quote: FlightQuote,
}

// ============================================================================
// Handlers
// ============================================================================

/// Public estimate route. The detailed quotes are mounted with the staff routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/quick-quote", post(quick_quote))
}

/// POST /v1/quick-quote
pub async fn quick_quote(
    State(state): State<AppState>,
    Json(req): Json<QuickQuoteRequest>,
) -> Result<Json<QuickEstimate>, AppError> {
    let origin = resolve_airport(&state, &req.origin).await?;
    let destination = resolve_airport(&state, &req.destination).await?;
    let aircraft = state.fleet.get_aircraft(req.aircraft_id).await?;

    let estimate = state.quoter.quick_estimate(&origin, &destination, &aircraft)?;
    Ok(Json(estimate))
}

/// POST /v1/admin/route-quote
pub async fn route_quote(
    State(state): State<AppState>,
    Extension(claims): Extension<StaffClaims>,
    Json(req): Json<RouteQuoteRequest>,
) -> Result<Json<RouteQuoteResponse>, AppError> {
    let origin = resolve_airport(&state, &req.origin).await?;
    let destination = resolve_airport(&state, &req.destination).await?;
    let aircraft = state.fleet.get_aircraft(req.aircraft_id).await?;

    let options = FlightQuoteOptions {
        passengers: req.passengers,
        round_trip: req.round_trip,
        add_ons: req.add_ons,
        discount_pct: req.discount_pct,
        commission_pct: req.commission_pct,
    };
    // One snapshot per quote
    let commission = state.commission.snapshot();
    let quote = state
        .quoter
        .quote_flight(&origin, &destination, &aircraft, &options, &commission)?;

    tracing::info!(
        origin = %origin.code,
        destination = %destination.code,
        grand_total_cents = quote.breakdown.grand_total_cents,
        by = %claims.email,
        "Route quote computed"
    );

    Ok(Json(RouteQuoteResponse {
        origin_airport: origin,
        destination_airport: destination,
        aircraft_name: aircraft.name,
        quoted_by: claims.email,
        quote,
    }))
}

/// POST /v1/admin/charter-quote
pub async fn charter_quote(
    State(state): State<AppState>,
    Json(req): Json<CharterQuoteRequest>,
) -> Result<Json<CharterQuote>, AppError> {
    let yacht = state.fleet.get_yacht(req.yacht_id).await?;
    let window = DateRange::new(req.charter_start, req.charter_end)?;

    let options = CharterQuoteOptions {
        guests: req.guests,
        add_ons: req.add_ons,
        discount_pct: req.discount_pct,
        commission_pct: req.commission_pct,
    };
    let commission = state.commission.snapshot();
    let quote = state.quoter.quote_charter(&yacht, &window, &options, &commission)?;

    Ok(Json(quote))
}

async fn resolve_airport(state: &AppState, raw: &str) -> Result<Airport, AppError> {
    let code = IataCode::parse(raw).map_err(|e| AppError::ValidationError(e.to_string()))?;
    state
        .airports
        .find_by_code(&code)
        .await?
        .ok_or_else(|| AppError::NotFoundError(format!("Airport {} not found", code)))
}
