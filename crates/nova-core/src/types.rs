//! # Domain Types
//!
//! Core domain types used throughout NovaRail.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Reference data (admin-managed)                                        │
//! │                                                                         │
//! │  ┌──────────┐    ┌──────────┐    ┌───────────┐    ┌──────────┐         │
//! │  │ Station  │◄───┤  Route   │    │ TrainType │◄───┤  Train   │         │
//! │  │ name     │ 2x │ distance │    │ name      │    │ railcars │         │
//! │  │ lat/lon  │    └────┬─────┘    └───────────┘    │ seats    │         │
//! │  └──────────┘         │                           └────┬─────┘         │
//! │                       │         ┌──────────┐           │               │
//! │                       └────────►│   Trip   │◄──────────┘               │
//! │                 ┌──────────┐ N:M│ departure│                           │
//! │                 │   Crew   │◄──►│ arrival  │                           │
//! │                 └──────────┘    └────┬─────┘                           │
//! │                                      │                                 │
//! │  Purchases (user-created, atomic)    │                                 │
//! │                                      │                                 │
//! │  ┌──────────┐    ┌──────────┐        │                                 │
//! │  │  Order   │◄───┤  Ticket  │────────┘                                 │
//! │  │ created  │ 1:N│ railcar  │   UNIQUE (trip, railcar, seat)           │
//! │  │ user ref │    │ seat     │                                          │
//! │  └──────────┘    └──────────┘                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every entity is keyed by a UUID v4 string, immutable once assigned.
//! Structs in this module are row-shaped: they mirror one table each, and
//! derive `sqlx::FromRow` when the `sqlx` feature is enabled (nova-db
//! turns it on). Cross-entity views are composed in the API layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// User
// =============================================================================

/// An account that can authenticate and place orders.
///
/// `is_staff` gates every write on reference data and trips.
/// The password is stored only as an Argon2 hash and is never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Reference Data
// =============================================================================

/// A railway station with geographic coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Station {
    pub id: String,
    /// Unique display name ("Kyiv-Pasazhyrskyi").
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// A directed connection between two stations.
///
/// Invariant: `source_id != destination_id`, `distance >= 1` km.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Route {
    pub id: String,
    pub source_id: String,
    pub destination_id: String,
    /// Distance in kilometers.
    pub distance: i64,
}

/// A category of train ("Intercity", "Night express").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TrainType {
    pub id: String,
    pub name: String,
}

/// A physical train: N railcars of M seats each.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Train {
    pub id: String,
    pub name: String,
    /// Number of railcars, numbered 1..=railcar_num.
    pub railcar_num: i64,
    /// Seats per railcar, numbered 1..=seats_in_railcar.
    pub seats_in_railcar: i64,
    pub train_type_id: String,
}

impl Train {
    /// Total sellable seats: `railcar_num * seats_in_railcar`.
    ///
    /// Derived, never stored. Inputs are validated >= 1 at creation, so
    /// there is no error path here.
    #[inline]
    pub fn capacity(&self) -> i64 {
        self.railcar_num * self.seats_in_railcar
    }
}

/// A crew member assignable to trips.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Crew {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
}

impl Crew {
    /// Display name used by trip listings.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// =============================================================================
// Trips
// =============================================================================

/// A scheduled journey along a route, assigned to a train.
///
/// Crew assignments live in a join table and are loaded separately; the
/// struct mirrors the `trips` row only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Trip {
    pub id: String,
    pub route_id: String,
    pub train_id: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
}

// =============================================================================
// Orders & Tickets
// =============================================================================

/// A purchase transaction grouping one or more tickets.
///
/// Two states only: absent and persisted. `created_at` is assigned by the
/// placement engine at persistence time, never by the caller, and the
/// record is immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

/// One reserved seat on one trip, owned by exactly one order.
///
/// `(trip_id, railcar, seat)` is unique storage-wide; tickets are created
/// only inside `place_order`, never on their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Ticket {
    pub id: String,
    pub trip_id: String,
    pub order_id: String,
    pub railcar: i64,
    pub seat: i64,
}

/// A requested seat within `place_order`, before any id exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRequest {
    pub trip_id: String,
    pub railcar: i64,
    pub seat: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn train(railcars: i64, seats: i64) -> Train {
        Train {
            id: "t-1".to_string(),
            name: "Test".to_string(),
            railcar_num: railcars,
            seats_in_railcar: seats,
            train_type_id: "tt-1".to_string(),
        }
    }

    #[test]
    fn test_capacity() {
        assert_eq!(train(4, 20).capacity(), 80);
        assert_eq!(train(1, 1).capacity(), 1);
        assert_eq!(train(12, 54).capacity(), 648);
    }

    #[test]
    fn test_crew_full_name() {
        let crew = Crew {
            id: "c-1".to_string(),
            first_name: "Olena".to_string(),
            last_name: "Shevchenko".to_string(),
        };
        assert_eq!(crew.full_name(), "Olena Shevchenko");
    }
}
