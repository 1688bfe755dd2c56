//! # nova-db: Database Layer for NovaRail
//!
//! This crate provides database access for the NovaRail ticketing system.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        NovaRail Data Flow                               │
//! │                                                                         │
//! │  API handler (POST /orders)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     nova-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (trip, order, │    │  (embedded)  │  │   │
//! │  │   │               │    │  station, ...)│    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ OrderRepo is  │    │ 001_init.sql │  │   │
//! │  │   │ WAL + FK ON   │    │ the placement │    │ 002_idx.sql  │  │   │
//! │  │   │               │    │ engine        │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (or :memory: in tests)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (station, route, train,
//!   crew, trip, order, user)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use nova_db::{Database, DbConfig};
//!
//! let config = DbConfig::new("path/to/nova.db");
//! let db = Database::new(config).await?;
//!
//! let trips = db.trips().list(Some("Kyiv"), None, 20, 0).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::crew::CrewRepository;
pub use repository::order::OrderRepository;
pub use repository::route::RouteRepository;
pub use repository::station::StationRepository;
pub use repository::train::{TrainRepository, TrainTypeRepository};
pub use repository::trip::{NewTrip, TripRepository};
pub use repository::user::UserRepository;
