use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use vista_reservation::{Reservation, ReservationKind, Submission, TrackingError, TrackingView};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub reference: Uuid,
    pub message: String,
    pub reservation: Reservation,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/reservations", post(submit_reservation))
        .route("/v1/reservations/{kind}", get(list_by_email))
        .route("/v1/reservations/{kind}/track/{reference}", get(track_reservation))
}

/// POST /v1/reservations
pub async fn submit_reservation(
    State(state): State<AppState>,
    Json(submission): Json<Submission>,
) -> Result<(StatusCode, Json<SubmissionResponse>), AppError> {
    let receipt = state.desk.submit(submission).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmissionResponse {
            reference: receipt.reference,
            message: receipt.message,
            reservation: receipt.reservation,
        }),
    ))
}

/// GET /v1/reservations/{kind}/track/{reference}
///
/// Every failure, including a malformed kind or reference, reads as not found.
pub async fn track_reservation(
    State(state): State<AppState>,
    Path((kind, reference)): Path<(String, String)>,
) -> Result<Json<TrackingView>, AppError> {
    let kind: ReservationKind = kind.parse().map_err(|_| TrackingError::NotFound)?;
    let reference = Uuid::parse_str(reference.trim()).map_err(|_| TrackingError::NotFound)?;

    let view = state.tracker.by_reference(kind, reference).await?;
    Ok(Json(view))
}

/// GET /v1/reservations/{kind}?email=
pub async fn list_by_email(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Vec<TrackingView>>, AppError> {
    let kind: ReservationKind = kind.parse()?;
    let email = query
        .email
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| AppError::ValidationError("email query parameter is required".to_string()))?;

    let views = state.tracker.by_email(kind, &email).await?;
    Ok(Json(views))
}
