//! # NovaRail API
//!
//! Axum REST server over nova-core and nova-db.
//!
//! ## Surface
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Routes                                        │
//! │                                                                         │
//! │  /api/railway-station                                                  │
//! │  ├── /stations      GET (open)  POST (staff)                           │
//! │  ├── /stations/:id  GET (open)  DELETE (staff)                         │
//! │  ├── /routes        GET ?source=&destination=   POST (staff)           │
//! │  ├── /train-types   GET ?name=                  POST (staff)           │
//! │  ├── /trains        GET ?train_type=            POST (staff)           │
//! │  ├── /crews         GET ?first_name=&last_name= POST (staff)           │
//! │  ├── /trips         GET ?route=&departure_time= POST (staff)           │
//! │  ├── /orders        GET (own)   POST (authenticated, atomic)           │
//! │  └── /tickets       GET (own)                                          │
//! │                                                                         │
//! │  /api/user                                                             │
//! │  ├── /register      POST                                               │
//! │  ├── /login         POST → {access, refresh}                           │
//! │  └── /refresh       POST                                               │
//! │                                                                         │
//! │  /health            GET                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod pagination;
pub mod policy;
pub mod state;

pub use config::ApiConfig;
pub use state::AppState;

use handlers::{crews, orders, routes, stations, tickets, train_types, trains, trips, users};

/// Builds the application router with all routes and middleware.
pub fn router(state: Arc<AppState>) -> Router {
    let railway = Router::new()
        .route("/stations", get(stations::list).post(stations::create))
        .route(
            "/stations/:id",
            get(stations::retrieve).delete(stations::destroy),
        )
        .route("/routes", get(routes::list).post(routes::create))
        .route(
            "/routes/:id",
            get(routes::retrieve).delete(routes::destroy),
        )
        .route(
            "/train-types",
            get(train_types::list).post(train_types::create),
        )
        .route(
            "/train-types/:id",
            get(train_types::retrieve).delete(train_types::destroy),
        )
        .route("/trains", get(trains::list).post(trains::create))
        .route(
            "/trains/:id",
            get(trains::retrieve).delete(trains::destroy),
        )
        .route("/crews", get(crews::list).post(crews::create))
        .route("/crews/:id", get(crews::retrieve).delete(crews::destroy))
        .route("/trips", get(trips::list).post(trips::create))
        .route("/trips/:id", get(trips::retrieve).delete(trips::destroy))
        .route("/orders", get(orders::list).post(orders::create))
        .route("/orders/:id", get(orders::retrieve))
        .route("/tickets", get(tickets::list));

    let user = Router::new()
        .route("/register", post(users::register))
        .route("/login", post(users::login))
        .route("/refresh", post(users::refresh));

    Router::new()
        .route("/health", get(health))
        .nest("/api/railway-station", railway)
        .nest("/api/user", user)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check response body.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    database: bool,
}

/// `GET /health`.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let database = state.db.health_check().await;

    Json(HealthResponse {
        status: if database { "ok" } else { "degraded" },
        database,
    })
}
