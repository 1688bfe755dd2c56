//! # nova-core: Pure Domain Logic for NovaRail
//!
//! This crate is the **heart** of the NovaRail ticketing back-end. It
//! contains the domain types and rules as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        NovaRail Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/api (axum)                              │   │
//! │  │    stations ─ routes ─ trains ─ trips ─ orders handlers        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ nova-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐      ┌───────────┐      ┌───────────┐          │   │
//! │  │   │   types   │      │ validation│      │   error   │          │   │
//! │  │   │  Station  │      │ schedule  │      │ CoreError │          │   │
//! │  │   │   Trip    │      │   seats   │      │ Validation│          │   │
//! │  │   │  Ticket   │      │  fields   │      │   Error   │          │   │
//! │  │   └───────────┘      └───────────┘      └───────────┘          │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    nova-db (Database Layer)                     │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Station, Route, Train, Trip, Order, Ticket, ...)
//! - [`error`] - Domain error types
//! - [`validation`] - Schedule, seat, and field validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Explicit Errors**: All errors are typed, never strings or panics
//! 4. **Validation before persistence**: every rule here runs (and is
//!    testable) without a live store; the storage layer only adds the
//!    constraints that genuinely need it (seat uniqueness under
//!    concurrency)
//!
//! ## Example Usage
//!
//! ```rust
//! use nova_core::{Train, validation};
//!
//! let train = Train {
//!     id: "t-1".into(),
//!     name: "Intercity 87".into(),
//!     railcar_num: 4,
//!     seats_in_railcar: 20,
//!     train_type_id: "tt-1".into(),
//! };
//!
//! // Capacity is derived from geometry, never stored
//! assert_eq!(train.capacity(), 80);
//!
//! // Seat assignments validate against the same geometry
//! assert!(validation::validate_seat_assignment(&train, 4, 20).is_ok());
//! assert!(validation::validate_seat_assignment(&train, 5, 1).is_err());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use nova_core::Train` instead of
// `use nova_core::types::Train`

pub use error::{CoreError, ScheduleViolation, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length for entity names (stations, trains, crew, train types).
///
/// Matches the column width the schema allows; validation rejects longer
/// values before they ever reach the store.
pub const MAX_NAME_LEN: usize = 255;

/// Maximum tickets allowed in a single order.
///
/// ## Business Reason
/// Bounds the size of the placement transaction and keeps a single
/// buyer from sweeping a whole trip in one call.
pub const MAX_TICKETS_PER_ORDER: usize = 50;
