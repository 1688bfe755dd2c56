//! # Error Types
//!
//! Domain-specific error types for nova-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  nova-core errors (this file)                                          │
//! │  ├── CoreError        - Domain rule violations                         │
//! │  └── ValidationError  - Field-level constraint failures                │
//! │                                                                         │
//! │  nova-db errors (separate crate)                                       │
//! │  └── DbError          - Storage failures, seat conflicts               │
//! │                                                                         │
//! │  API errors (in app)                                                   │
//! │  └── ApiError         - HTTP status + JSON body                        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (offending value, allowed range)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Schedule Violations
// =============================================================================

/// The two ways a trip schedule can be invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScheduleViolation {
    /// Arrival must be strictly after departure.
    #[error("arrival time must be after departure time")]
    ArrivalNotAfterDeparture,

    /// A trip cannot be created with a departure in the past.
    #[error("departure time must be in the future")]
    DepartureNotInFuture,
}

// =============================================================================
// Core Error
// =============================================================================

/// Domain rule violations.
///
/// These errors represent business rule failures detected before any row
/// is written. Range errors name the offending value and the valid range
/// so the caller can correct the request.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An order must contain at least one ticket.
    #[error("An order must contain at least one ticket")]
    EmptyOrder,

    /// An order may not exceed the per-order ticket cap.
    #[error("An order cannot contain more than {max} tickets")]
    TooManyTickets { max: usize },

    /// Requested railcar is outside the train's geometry.
    ///
    /// ## When This Occurs
    /// - Ticket request names railcar 6 on a 5-railcar train
    /// - Railcar 0 or negative
    #[error("Railcar number must be in available range from 1 to {max}, not {railcar}")]
    RailcarOutOfRange { railcar: i64, max: i64 },

    /// Requested seat is outside the railcar's geometry.
    #[error("Seat number must be in available range from 1 to {max}, not {seat}")]
    SeatOutOfRange { seat: i64, max: i64 },

    /// Trip schedule is inconsistent or in the past.
    #[error("Invalid schedule: {0}")]
    InvalidSchedule(#[from] ScheduleViolation),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Field-level constraint failures.
///
/// These occur when input doesn't meet basic requirements, before any
/// domain rule runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., malformed email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A route cannot start and end at the same station.
    #[error("Source and destination cannot be the same")]
    SourceEqualsDestination,

    /// Duplicate value (e.g., duplicate station name).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_range_messages() {
        let err = CoreError::RailcarOutOfRange { railcar: 6, max: 5 };
        assert_eq!(
            err.to_string(),
            "Railcar number must be in available range from 1 to 5, not 6"
        );

        let err = CoreError::SeatOutOfRange { seat: 0, max: 20 };
        assert_eq!(
            err.to_string(),
            "Seat number must be in available range from 1 to 20, not 0"
        );
    }

    #[test]
    fn test_schedule_messages() {
        let err = CoreError::InvalidSchedule(ScheduleViolation::ArrivalNotAfterDeparture);
        assert_eq!(
            err.to_string(),
            "Invalid schedule: arrival time must be after departure time"
        );

        let err = CoreError::InvalidSchedule(ScheduleViolation::DepartureNotInFuture);
        assert_eq!(
            err.to_string(),
            "Invalid schedule: departure time must be in the future"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::MustBePositive {
            field: "distance".to_string(),
        };
        assert_eq!(err.to_string(), "distance must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::SourceEqualsDestination;
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
