//! API error responses
//!
//! Every failure leaves the API as `{"error": "<message>"}`. Storage
//! failures are logged with their cause and collapsed to a generic 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Error payload
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

/// Handler error: a status code and a caller-safe message
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(entity: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("{} not found", entity))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound { entity, .. } => Self::not_found(entity),
            DomainError::InvalidState(msg) | DomainError::Validation(msg) => Self::bad_request(msg),
            DomainError::Conflict(msg) => Self::conflict(msg),
            DomainError::Storage(cause) => {
                tracing::error!(error = %cause, "Storage failure");
                Self::internal()
            }
        }
    }
}

impl From<sea_orm::DbErr> for ApiError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::from(e).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

/// `{message}` payload for deletes
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_status_codes() {
        let cases = [
            (DomainError::not_found("Room", "x"), StatusCode::NOT_FOUND, "Room not found"),
            (
                DomainError::InvalidState("Reservation must be confirmed to check in".into()),
                StatusCode::BAD_REQUEST,
                "Reservation must be confirmed to check in",
            ),
            (
                DomainError::Validation("At least one adult is required".into()),
                StatusCode::BAD_REQUEST,
                "At least one adult is required",
            ),
            (
                DomainError::Conflict("Room number 101 is taken".into()),
                StatusCode::CONFLICT,
                "Room number 101 is taken",
            ),
        ];
        for (err, status, message) in cases {
            let api = ApiError::from(err);
            assert_eq!(api.status, status);
            assert_eq!(api.message, message);
        }
    }

    #[test]
    fn storage_cause_is_not_exposed() {
        let api = ApiError::from(DomainError::Storage("disk I/O error at /var/db".into()));
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.message, "Internal server error");
    }
}
