use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use vista_catalog::{AssetError, PricingError, QuoteError};
use vista_core::{DirectoryError, ScheduleError};
use vista_reservation::models::UnknownKind;
use vista_reservation::{ChangeError, LifecycleError, ReservationError, TrackingError};

#[derive(Debug)]
pub enum AppError {
    AuthenticationError(String),
    AuthorizationError(String),
    ValidationError(String),
    NotFoundError(String),
    ConflictError(String),
    InternalServerError(String),
    Anyhow(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::AuthenticationError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::AuthorizationError(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, msg),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Anyhow(err)
    }
}

impl From<ReservationError> for AppError {
    fn from(err: ReservationError) -> Self {
        match err {
            ReservationError::Validation(e) => AppError::ValidationError(e.to_string()),
            ReservationError::Change(ChangeError::EmptyUpdate)
            | ReservationError::Change(ChangeError::NoChange)
            | ReservationError::Change(ChangeError::BreakdownMismatch { .. }) => AppError::ValidationError(err.to_string()),
            ReservationError::Change(ChangeError::Lifecycle(ref e)) => match e {
                LifecycleError::StatusNotAllowed { .. } | LifecycleError::InvalidPrice(_) => {
                    AppError::ValidationError(e.to_string())
                }
                LifecycleError::InvalidTransition { .. } | LifecycleError::PriceRule(_) => {
                    AppError::ConflictError(e.to_string())
                }
            },
            ReservationError::NotFound { .. } => AppError::NotFoundError(err.to_string()),
            ReservationError::Conflict { .. } | ReservationError::DeleteNotSupported(_) => {
                AppError::ConflictError(err.to_string())
            }
            ReservationError::DuplicateReference(_) | ReservationError::Storage(_) => {
                AppError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<QuoteError> for AppError {
    fn from(err: QuoteError) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<PricingError> for AppError {
    fn from(err: PricingError) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<AssetError> for AppError {
    fn from(err: AssetError) -> Self {
        match err {
            AssetError::NotFound(_) => AppError::NotFoundError(err.to_string()),
            AssetError::Unavailable(_) => AppError::InternalServerError(err.to_string()),
        }
    }
}

impl From<DirectoryError> for AppError {
    fn from(err: DirectoryError) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

impl From<UnknownKind> for AppError {
    fn from(err: UnknownKind) -> Self {
        AppError::NotFoundError(err.to_string())
    }
}

impl From<TrackingError> for AppError {
    fn from(err: TrackingError) -> Self {
        AppError::NotFoundError(err.to_string())
    }
}
