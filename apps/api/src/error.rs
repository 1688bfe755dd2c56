//! Error types for the API layer.
//!
//! `ApiError` bridges domain errors and HTTP responses via axum's
//! `IntoResponse`. The JSON body is `{"code": ..., "message": ...}`.
//!
//! ## Status Mapping
//! ```text
//! CoreError::EmptyOrder / TooManyTickets     → 422 EMPTY_ORDER / VALIDATION_ERROR
//! CoreError::RailcarOutOfRange / SeatOutOf.. → 422 SEAT_RANGE
//! CoreError::InvalidSchedule                 → 422 SCHEDULE_ERROR
//! CoreError::Validation                      → 422 VALIDATION_ERROR
//! DbError::NotFound                          → 404 NOT_FOUND
//! DbError::SeatTaken                         → 409 SEAT_TAKEN
//! DbError::UniqueViolation                   → 409 CONFLICT
//! DbError::ForeignKeyViolation               → 422 VALIDATION_ERROR
//! anything else                              → 500 INTERNAL_SERVER_ERROR
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;

use nova_core::CoreError;
use nova_db::DbError;

/// Application error type for API handlers.
#[derive(Debug)]
pub struct ApiError {
    /// HTTP status code
    status: StatusCode,
    /// Error code (for client error handling)
    code: String,
    /// Error message (user-facing)
    message: String,
}

impl ApiError {
    /// Create a new application error.
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create a 400 Bad Request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    /// Create a 401 Unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
    }

    /// Create a 403 Forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, "FORBIDDEN", message)
    }

    /// Create a 404 Not Found error.
    pub fn not_found(resource: impl fmt::Display, id: impl fmt::Display) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{resource} with id {id} not found"),
        )
    }

    /// Create a 409 Conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, "CONFLICT", message)
    }

    /// Create a 422 Unprocessable Entity error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "VALIDATION_ERROR",
            message,
        )
    }

    /// Create a 500 Internal Server Error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_SERVER_ERROR",
            message,
        )
    }

    /// The HTTP status this error renders as.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The machine-readable error code.
    pub fn code(&self) -> &str {
        &self.code
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    /// Error code (for client error handling).
    code: String,
    /// Human-readable error message.
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(
                status = %self.status,
                code = %self.code,
                message = %self.message,
                "Internal server error"
            );
        }

        let body = ErrorResponse {
            code: self.code,
            message: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}

/// Map domain-rule failures onto 422 with a family-specific code.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::EmptyOrder => "EMPTY_ORDER",
            CoreError::RailcarOutOfRange { .. } | CoreError::SeatOutOfRange { .. } => "SEAT_RANGE",
            CoreError::InvalidSchedule(_) => "SCHEDULE_ERROR",
            CoreError::TooManyTickets { .. } | CoreError::Validation(_) => "VALIDATION_ERROR",
        };
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, code, err.to_string())
    }
}

/// Map storage failures onto HTTP statuses.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => {
                Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
            }
            DbError::SeatTaken { .. } => {
                Self::new(StatusCode::CONFLICT, "SEAT_TAKEN", err.to_string())
            }
            DbError::UniqueViolation { .. } => Self::conflict(err.to_string()),
            DbError::ForeignKeyViolation { .. } => Self::validation(err.to_string()),
            DbError::Core(core) => core.into(),
            // Pool/connection/query failures are not the client's fault
            other => Self::internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nova_core::ValidationError;

    #[test]
    fn test_display() {
        let err = ApiError::bad_request("Invalid input");
        assert_eq!(err.to_string(), "[BAD_REQUEST] Invalid input");
    }

    #[test]
    fn test_seat_taken_maps_to_conflict() {
        let err: ApiError = DbError::SeatTaken {
            trip_id: "trip-1".to_string(),
            railcar: 2,
            seat: 14,
        }
        .into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.code(), "SEAT_TAKEN");
    }

    #[test]
    fn test_seat_range_maps_to_unprocessable() {
        let err: ApiError = DbError::Core(CoreError::RailcarOutOfRange { railcar: 6, max: 5 }).into();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code(), "SEAT_RANGE");
    }

    #[test]
    fn test_empty_order_maps_to_unprocessable() {
        let err: ApiError = CoreError::EmptyOrder.into();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code(), "EMPTY_ORDER");
    }

    #[test]
    fn test_validation_maps_to_unprocessable() {
        let err: ApiError = CoreError::Validation(ValidationError::SourceEqualsDestination).into();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err: ApiError = DbError::not_found("Trip", "x").into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
