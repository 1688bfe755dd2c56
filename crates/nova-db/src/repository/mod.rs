//! # Repository Module
//!
//! Database repository implementations for NovaRail.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  API handler                                                           │
//! │       │                                                                 │
//! │       │  db.routes().list(Some("Kyiv"), None, 20, 0)                   │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  RouteRepository                                                       │
//! │  ├── list(&self, source, destination, limit, offset)                   │
//! │  ├── count(&self, source, destination)                                 │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── insert(&self, source_id, destination_id, distance)                │
//! │  └── delete(&self, id)                                                 │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Optional list filters are bound as `Option<String>` against
//! `(?N IS NULL OR column LIKE '%' || ?N || '%')` clauses, which keeps
//! every query a single static statement. Each list operation's ordering
//! is fixed and documented on the method.
//!
//! ## Available Repositories
//!
//! - [`station::StationRepository`] - Station CRUD, name filter
//! - [`route::RouteRepository`] - Route CRUD, endpoint filters
//! - [`train::TrainTypeRepository`] / [`train::TrainRepository`] - Fleet data
//! - [`crew::CrewRepository`] - Crew CRUD, name filters
//! - [`trip::TripRepository`] - Trip creation (schedule validation) and search
//! - [`order::OrderRepository`] - The order/ticket placement engine
//! - [`user::UserRepository`] - Accounts for authentication

pub mod crew;
pub mod order;
pub mod route;
pub mod station;
pub mod train;
pub mod trip;
pub mod user;
