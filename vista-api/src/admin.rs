use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use vista_catalog::CommissionSetting;
use vista_reservation::{NotificationAudit, Reservation, ReservationKind, StaffUpdate, StaffUpdateOutcome};
use vista_shared::models::events::{CommissionRateChangedEvent, DomainEvent};

use crate::error::AppError;
use crate::middleware::{require_admin, staff_auth_middleware, StaffClaims};
use crate::quotes;
use crate::state::AppState;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SetCommissionRequest {
    pub rate_pct: f64,
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CommissionOverview {
    pub current: CommissionSetting,
    pub owner_share_pct: f64,
    pub history: Vec<CommissionSetting>,
}

// ============================================================================
// Routes
// ============================================================================

/// Staff-only surface. Every route sits behind the bearer-token middleware.
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/v1/admin/reservations/{kind}/{reference}",
            get(get_reservation).patch(update_reservation).delete(delete_reservation),
        )
        .route("/v1/admin/route-quote", post(quotes::route_quote))
        .route("/v1/admin/charter-quote", post(quotes::charter_quote))
        .route("/v1/admin/commission", get(get_commission).post(set_commission))
        .route("/v1/admin/notifications", get(list_notifications))
        .route_layer(axum::middleware::from_fn_with_state(state, staff_auth_middleware))
}

// ============================================================================
// Reservations
// ============================================================================

/// GET /v1/admin/reservations/{kind}/{reference}
pub async fn get_reservation(
    State(state): State<AppState>,
    Path((kind, reference)): Path<(String, Uuid)>,
) -> Result<Json<Reservation>, AppError> {
    let kind: ReservationKind = kind.parse()?;
    let reservation = state.desk.registry().get_by_reference(kind, reference).await?;
    Ok(Json(reservation))
}

/// PATCH /v1/admin/reservations/{kind}/{reference}
pub async fn update_reservation(
    State(state): State<AppState>,
    Extension(claims): Extension<StaffClaims>,
    Path((kind, reference)): Path<(String, Uuid)>,
    Json(mut update): Json<StaffUpdate>,
) -> Result<Json<StaffUpdateOutcome>, AppError> {
    let kind: ReservationKind = kind.parse()?;
    // The acting staff member always comes from the token.
    update.actor = claims.email;

    let outcome = state.desk.apply_staff_update(kind, reference, update).await?;
    Ok(Json(outcome))
}

/// DELETE /v1/admin/reservations/{kind}/{reference}
pub async fn delete_reservation(
    State(state): State<AppState>,
    Extension(claims): Extension<StaffClaims>,
    Path((kind, reference)): Path<(String, Uuid)>,
) -> Result<StatusCode, AppError> {
    let kind: ReservationKind = kind.parse()?;
    state.desk.delete(kind, reference).await?;

    tracing::info!(%reference, %kind, by = %claims.email, "Reservation deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Commission
// ============================================================================

/// GET /v1/admin/commission
pub async fn get_commission(State(state): State<AppState>) -> Json<CommissionOverview> {
    Json(CommissionOverview {
        current: state.commission.current(),
        owner_share_pct: state.commission.owner_share_pct(),
        history: state.commission.history(),
    })
}

/// POST /v1/admin/commission
pub async fn set_commission(
    State(state): State<AppState>,
    Extension(claims): Extension<StaffClaims>,
    Json(req): Json<SetCommissionRequest>,
) -> Result<Json<CommissionSetting>, AppError> {
    require_admin(&claims)?;

    let setting = state.commission.set_rate(req.rate_pct, &claims.email, req.note)?;
    state.events.publish(DomainEvent::CommissionRateChanged(CommissionRateChangedEvent {
        version: setting.version,
        rate_pct: setting.rate_pct,
        set_by: setting.set_by.clone(),
        timestamp: Utc::now().timestamp(),
    }));

    Ok(Json(setting))
}

// ============================================================================
// Notifications
// ============================================================================

/// GET /v1/admin/notifications
pub async fn list_notifications(State(state): State<AppState>) -> Json<Vec<NotificationAudit>> {
    Json(state.desk.dispatcher().audit_log().await)
}
