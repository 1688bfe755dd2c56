//! # Validation Module
//!
//! Pure validation for NovaRail domain rules.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP (axum)                                                  │
//! │  ├── Type validation (JSON deserialization)                            │
//! │  └── Authentication / authorization                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (pure functions)                                 │
//! │  ├── Field constraints (required, length, positive)                    │
//! │  ├── Schedule rules (arrival after departure, future departure)        │
//! │  └── Seat bounds (railcar/seat inside train geometry)                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  ├── UNIQUE (trip, railcar, seat) ← only concurrency-safe layer        │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function here is deterministic and store-free: the schedule check
//! takes `now` as a parameter instead of reading the clock, so the rules
//! unit-test without fixtures or sleeps.
//!
//! ## Usage
//! ```rust
//! use chrono::{Duration, Utc};
//! use nova_core::validation::{validate_distance, validate_schedule};
//!
//! let now = Utc::now();
//! validate_schedule(now + Duration::hours(1), now + Duration::hours(5), now).unwrap();
//! validate_distance(540).unwrap();
//! ```

use chrono::{DateTime, Utc};

use crate::error::{CoreError, ScheduleViolation, ValidationError};
use crate::types::{TicketRequest, Train};
use crate::{MAX_NAME_LEN, MAX_TICKETS_PER_ORDER};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a display name (station, train, train type, crew names).
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most [`MAX_NAME_LEN`] characters
///
/// ## Example
/// ```rust
/// use nova_core::validation::validate_name;
///
/// assert!(validate_name("name", "Kyiv-Pasazhyrskyi").is_ok());
/// assert!(validate_name("name", "   ").is_err());
/// ```
pub fn validate_name(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates an email address.
///
/// ## Rules
/// - Must not be empty
/// - Must contain exactly one '@' with text on both sides
///
/// Deliberately shallow: the mail system is the real validator, this only
/// rejects obviously broken input.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    let mut parts = email.split('@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");
    if local.is_empty() || domain.is_empty() || parts.next().is_some() {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "expected a single user@domain address".to_string(),
        });
    }

    Ok(())
}

/// Validates a registration password.
///
/// ## Rules
/// - At least 8 characters (hash input, no upper bound enforced here)
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.len() < 8 {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: 8,
        });
    }

    Ok(())
}

// =============================================================================
// Reference Data Validators
// =============================================================================

/// Validates route fields before creation.
///
/// ## Rules
/// - `source != destination`
/// - `distance >= 1`
pub fn validate_route(source_id: &str, destination_id: &str, distance: i64) -> ValidationResult<()> {
    if source_id == destination_id {
        return Err(ValidationError::SourceEqualsDestination);
    }

    if distance < 1 {
        return Err(ValidationError::MustBePositive {
            field: "distance".to_string(),
        });
    }

    Ok(())
}

/// Validates a route distance on its own (used by update paths and tests).
pub fn validate_distance(distance: i64) -> ValidationResult<()> {
    if distance < 1 {
        return Err(ValidationError::MustBePositive {
            field: "distance".to_string(),
        });
    }

    Ok(())
}

/// Validates train geometry before creation.
///
/// ## Rules
/// - `railcar_num >= 1`
/// - `seats_in_railcar >= 1`
///
/// Capacity is derived from these two numbers, so validating them here is
/// what makes [`Train::capacity`] total.
pub fn validate_train_geometry(railcar_num: i64, seats_in_railcar: i64) -> ValidationResult<()> {
    if railcar_num < 1 {
        return Err(ValidationError::MustBePositive {
            field: "railcar_num".to_string(),
        });
    }

    if seats_in_railcar < 1 {
        return Err(ValidationError::MustBePositive {
            field: "seats_in_railcar".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Schedule Validators
// =============================================================================

/// Validates a trip schedule against a caller-supplied clock.
///
/// ## Rules
/// - `arrival > departure` (strict)
/// - `departure > now` (strict)
///
/// ## Arguments
/// * `departure` - scheduled departure time
/// * `arrival` - scheduled arrival time
/// * `now` - the current instant; passed in so the rule is testable
///   without a real clock
pub fn validate_schedule(
    departure: DateTime<Utc>,
    arrival: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), CoreError> {
    if arrival <= departure {
        return Err(ScheduleViolation::ArrivalNotAfterDeparture.into());
    }

    if departure <= now {
        return Err(ScheduleViolation::DepartureNotInFuture.into());
    }

    Ok(())
}

// =============================================================================
// Seat Validators (placement engine)
// =============================================================================

/// Validates one requested seat against a train's geometry.
///
/// ## Rules
/// - `1 <= railcar <= train.railcar_num`
/// - `1 <= seat <= train.seats_in_railcar`
///
/// Errors name the offending value and the valid range; the placement
/// engine surfaces them verbatim.
pub fn validate_seat_assignment(train: &Train, railcar: i64, seat: i64) -> Result<(), CoreError> {
    if !(1..=train.railcar_num).contains(&railcar) {
        return Err(CoreError::RailcarOutOfRange {
            railcar,
            max: train.railcar_num,
        });
    }

    if !(1..=train.seats_in_railcar).contains(&seat) {
        return Err(CoreError::SeatOutOfRange {
            seat,
            max: train.seats_in_railcar,
        });
    }

    Ok(())
}

/// Validates the shape of an order's ticket request list.
///
/// ## Rules
/// - Must not be empty
/// - Must not exceed [`MAX_TICKETS_PER_ORDER`]
///
/// Per-seat bounds run later, once each trip's train is resolved;
/// duplicate seats inside one request are left to the storage-level
/// unique index, which rejects them exactly like a concurrent conflict.
pub fn validate_ticket_requests(requests: &[TicketRequest]) -> Result<(), CoreError> {
    if requests.is_empty() {
        return Err(CoreError::EmptyOrder);
    }

    if requests.len() > MAX_TICKETS_PER_ORDER {
        return Err(CoreError::TooManyTickets {
            max: MAX_TICKETS_PER_ORDER,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
