//! End-to-end tests for the REST surface.
//!
//! Each test spins up the full router over an in-memory database and
//! drives it through HTTP, the same way a client would.

use std::sync::Arc;

use axum_test::TestServer;
use chrono::{Duration, Utc};
use http::header::AUTHORIZATION;
use http::{HeaderValue, StatusCode};
use serde_json::{json, Value};

use nova_api::auth::hash_password;
use nova_api::{router, ApiConfig, AppState};
use nova_db::{Database, DbConfig};

const RAILWAY: &str = "/api/railway-station";

async fn setup() -> (TestServer, Arc<AppState>) {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let state = Arc::new(AppState::new(db, ApiConfig::for_tests()));
    let server = TestServer::new(router(state.clone())).unwrap();
    (server, state)
}

/// Provisions a staff account directly (staff is created out of band,
/// never through /register) and returns a Bearer header value for it.
async fn staff_auth(state: &AppState) -> HeaderValue {
    let hash = hash_password("admin-password").unwrap();
    let user = state
        .db
        .users()
        .insert("admin@example.com", &hash, "Ada", "Admin", true)
        .await
        .unwrap();
    let token = state
        .jwt
        .generate_access_token(&user.id, &user.email, true)
        .unwrap();
    bearer(&token)
}

fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {token}")).unwrap()
}

/// Registers and logs in a regular rider through the HTTP flow.
async fn rider_auth(server: &TestServer, email: &str) -> HeaderValue {
    let response = server
        .post("/api/user/register")
        .json(&json!({
            "email": email,
            "password": "rider-password",
            "first_name": "Nadia",
            "last_name": "Koval",
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let response = server
        .post("/api/user/login")
        .json(&json!({ "email": email, "password": "rider-password" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let tokens: Value = response.json();
    bearer(tokens["access"].as_str().unwrap())
}

/// Seeds Kyiv-Lviv reference data through the staff API and returns the
/// created trip id. The train has 5 railcars of 20 seats.
async fn seed_trip(server: &TestServer, staff: &HeaderValue) -> String {
    let kyiv: Value = server
        .post(&format!("{RAILWAY}/stations"))
        .add_header(AUTHORIZATION, staff.clone())
        .json(&json!({ "name": "Kyiv", "latitude": 50.4501, "longitude": 30.5234 }))
        .await
        .json();
    let lviv: Value = server
        .post(&format!("{RAILWAY}/stations"))
        .add_header(AUTHORIZATION, staff.clone())
        .json(&json!({ "name": "Lviv", "latitude": 49.8397, "longitude": 24.0297 }))
        .await
        .json();

    let route: Value = server
        .post(&format!("{RAILWAY}/routes"))
        .add_header(AUTHORIZATION, staff.clone())
        .json(&json!({
            "source": kyiv["id"],
            "destination": lviv["id"],
            "distance": 540,
        }))
        .await
        .json();

    let train_type: Value = server
        .post(&format!("{RAILWAY}/train-types"))
        .add_header(AUTHORIZATION, staff.clone())
        .json(&json!({ "name": "Intercity" }))
        .await
        .json();

    let train: Value = server
        .post(&format!("{RAILWAY}/trains"))
        .add_header(AUTHORIZATION, staff.clone())
        .json(&json!({
            "name": "IC-01",
            "railcar_num": 5,
            "seats_in_railcar": 20,
            "train_type": train_type["id"],
        }))
        .await
        .json();

    let departure = Utc::now() + Duration::days(2);
    let arrival = departure + Duration::hours(5);

    let response = server
        .post(&format!("{RAILWAY}/trips"))
        .add_header(AUTHORIZATION, staff.clone())
        .json(&json!({
            "route": route["id"],
            "train": train["id"],
            "crew": [],
            "departure_time": departure.to_rfc3339(),
            "arrival_time": arrival.to_rfc3339(),
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let trip: Value = response.json();
    trip["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let (server, _state) = setup().await;

    let response = server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], true);
}

#[tokio::test]
async fn test_reference_data_access_policy() {
    let (server, state) = setup().await;
    let staff = staff_auth(&state).await;

    // Anonymous read is open
    let response = server.get(&format!("{RAILWAY}/stations")).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    // Anonymous write is rejected with 401
    let response = server
        .post(&format!("{RAILWAY}/stations"))
        .json(&json!({ "name": "Kyiv", "latitude": 50.45, "longitude": 30.52 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    // A regular rider gets 403
    let rider = rider_auth(&server, "rider@example.com").await;
    let response = server
        .post(&format!("{RAILWAY}/stations"))
        .add_header(AUTHORIZATION, rider)
        .json(&json!({ "name": "Kyiv", "latitude": 50.45, "longitude": 30.52 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    // Staff succeeds
    let response = server
        .post(&format!("{RAILWAY}/stations"))
        .add_header(AUTHORIZATION, staff)
        .json(&json!({ "name": "Kyiv", "latitude": 50.45, "longitude": 30.52 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_route_filtering() {
    let (server, state) = setup().await;
    let staff = staff_auth(&state).await;
    seed_trip(&server, &staff).await;

    // Filter by source returns exactly the Kyiv route
    let response = server
        .get(&format!("{RAILWAY}/routes"))
        .add_query_param("source", "Kyiv")
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let page: Value = response.json();
    assert_eq!(page["count"], 1);
    assert_eq!(page["results"][0]["source"], "Kyiv");
    assert_eq!(page["results"][0]["destination"], "Lviv");
    assert_eq!(page["results"][0]["distance"], 540);

    // A non-matching source returns nothing
    let page: Value = server
        .get(&format!("{RAILWAY}/routes"))
        .add_query_param("source", "Odesa")
        .await
        .json();
    assert_eq!(page["count"], 0);
}

#[tokio::test]
async fn test_trip_listing_and_detail() {
    let (server, state) = setup().await;
    let staff = staff_auth(&state).await;
    let trip_id = seed_trip(&server, &staff).await;

    let page: Value = server
        .get(&format!("{RAILWAY}/trips"))
        .add_query_param("route", "Lviv")
        .await
        .json();
    assert_eq!(page["count"], 1);
    assert_eq!(page["results"][0]["route"], "Kyiv - Lviv");
    assert_eq!(page["results"][0]["train"], "IC-01 (Intercity)");

    let detail: Value = server.get(&format!("{RAILWAY}/trips/{trip_id}")).await.json();
    assert_eq!(detail["route"]["source"], "Kyiv");
    assert_eq!(detail["train"]["capacity"], 100);

    // Unknown id is a 404
    let response = server.get(&format!("{RAILWAY}/trips/nope")).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_past_departure_rejected() {
    let (server, state) = setup().await;
    let staff = staff_auth(&state).await;
    let trip_id = seed_trip(&server, &staff).await;

    // Re-use the seeded reference data through the trip detail
    let detail: Value = server.get(&format!("{RAILWAY}/trips/{trip_id}")).await.json();
    let route_id = detail["route"]["id"].as_str().unwrap();
    let train_id = detail["train"]["id"].as_str().unwrap();

    let departure = Utc::now() - Duration::hours(3);
    let response = server
        .post(&format!("{RAILWAY}/trips"))
        .add_header(AUTHORIZATION, staff)
        .json(&json!({
            "route": route_id,
            "train": train_id,
            "crew": [],
            "departure_time": departure.to_rfc3339(),
            "arrival_time": (departure + Duration::hours(5)).to_rfc3339(),
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["code"], "SCHEDULE_ERROR");
}

#[tokio::test]
async fn test_order_placement_flow() {
    let (server, state) = setup().await;
    let staff = staff_auth(&state).await;
    let trip_id = seed_trip(&server, &staff).await;
    let rider = rider_auth(&server, "rider@example.com").await;

    // Placing an order requires authentication
    let response = server
        .post(&format!("{RAILWAY}/orders"))
        .json(&json!({ "tickets": [{ "trip": trip_id, "railcar": 1, "seat": 1 }] }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    // A valid two-ticket order commits atomically
    let response = server
        .post(&format!("{RAILWAY}/orders"))
        .add_header(AUTHORIZATION, rider.clone())
        .json(&json!({ "tickets": [
            { "trip": trip_id, "railcar": 1, "seat": 1 },
            { "trip": trip_id, "railcar": 1, "seat": 2 },
        ]}))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let order: Value = response.json();
    assert!(order["created_at"].is_string());
    assert_eq!(order["tickets"].as_array().unwrap().len(), 2);
    assert_eq!(order["tickets"][0]["trip"]["route"], "Kyiv - Lviv");
    assert_eq!(order["tickets"][0]["trip"]["train"], "IC-01");
    assert_eq!(order["tickets"][0]["trip"]["train_type"], "Intercity");

    // The same seat again conflicts
    let response = server
        .post(&format!("{RAILWAY}/orders"))
        .add_header(AUTHORIZATION, rider.clone())
        .json(&json!({ "tickets": [{ "trip": trip_id, "railcar": 1, "seat": 1 }] }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["code"], "SEAT_TAKEN");

    // Out-of-range railcar fails the whole order, valid tickets included
    let response = server
        .post(&format!("{RAILWAY}/orders"))
        .add_header(AUTHORIZATION, rider.clone())
        .json(&json!({ "tickets": [
            { "trip": trip_id, "railcar": 2, "seat": 1 },
            { "trip": trip_id, "railcar": 6, "seat": 1 },
        ]}))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["code"], "SEAT_RANGE");

    // An empty order is rejected
    let response = server
        .post(&format!("{RAILWAY}/orders"))
        .add_header(AUTHORIZATION, rider.clone())
        .json(&json!({ "tickets": [] }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["code"], "EMPTY_ORDER");

    // The rider still has exactly one order (the atomic failures left
    // nothing behind), with both tickets
    let page: Value = server
        .get(&format!("{RAILWAY}/orders"))
        .add_header(AUTHORIZATION, rider.clone())
        .await
        .json();
    assert_eq!(page["count"], 1);
    assert_eq!(page["results"][0]["tickets"].as_array().unwrap().len(), 2);

    // Another rider sees none of it
    let other = rider_auth(&server, "other@example.com").await;
    let page: Value = server
        .get(&format!("{RAILWAY}/orders"))
        .add_header(AUTHORIZATION, other.clone())
        .await
        .json();
    assert_eq!(page["count"], 0);

    // The ticket listing is scoped the same way
    let page: Value = server
        .get(&format!("{RAILWAY}/tickets"))
        .add_header(AUTHORIZATION, rider)
        .await
        .json();
    assert_eq!(page["count"], 2);
    let page: Value = server
        .get(&format!("{RAILWAY}/tickets"))
        .add_header(AUTHORIZATION, other)
        .await
        .json();
    assert_eq!(page["count"], 0);
}

#[tokio::test]
async fn test_pagination_envelope() {
    let (server, state) = setup().await;
    let staff = staff_auth(&state).await;

    for name in ["Kyiv", "Lviv", "Odesa"] {
        let response = server
            .post(&format!("{RAILWAY}/stations"))
            .add_header(AUTHORIZATION, staff.clone())
            .json(&json!({ "name": name, "latitude": 0.0, "longitude": 0.0 }))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
    }

    let page: Value = server
        .get(&format!("{RAILWAY}/stations"))
        .add_query_param("page_size", "2")
        .await
        .json();
    assert_eq!(page["count"], 3);
    assert_eq!(page["page"], 1);
    assert_eq!(page["page_size"], 2);
    assert_eq!(page["results"].as_array().unwrap().len(), 2);

    let page: Value = server
        .get(&format!("{RAILWAY}/stations"))
        .add_query_param("page", "2")
        .add_query_param("page_size", "2")
        .await
        .json();
    assert_eq!(page["results"].as_array().unwrap().len(), 1);

    // Oversized page_size is clamped to the configured maximum, not an error
    let response = server
        .get(&format!("{RAILWAY}/stations"))
        .add_query_param("page_size", "100000")
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let page: Value = response.json();
    assert_eq!(page["page_size"], 100);
}

#[tokio::test]
async fn test_token_refresh() {
    let (server, _state) = setup().await;
    rider_auth(&server, "rider@example.com").await;

    let tokens: Value = server
        .post("/api/user/login")
        .json(&json!({ "email": "rider@example.com", "password": "rider-password" }))
        .await
        .json();

    // The refresh token cannot be used as an access token
    let response = server
        .get(&format!("{RAILWAY}/orders"))
        .add_header(AUTHORIZATION, bearer(tokens["refresh"].as_str().unwrap()))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    // But it mints a fresh pair
    let response = server
        .post("/api/user/refresh")
        .json(&json!({ "refresh": tokens["refresh"] }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let fresh: Value = response.json();
    let response = server
        .get(&format!("{RAILWAY}/orders"))
        .add_header(AUTHORIZATION, bearer(fresh["access"].as_str().unwrap()))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_failures() {
    let (server, _state) = setup().await;
    rider_auth(&server, "rider@example.com").await;

    // Wrong password and unknown account answer identically
    let response = server
        .post("/api/user/login")
        .json(&json!({ "email": "rider@example.com", "password": "wrong" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = server
        .post("/api/user/login")
        .json(&json!({ "email": "ghost@example.com", "password": "whatever" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    // Duplicate registration conflicts
    let response = server
        .post("/api/user/register")
        .json(&json!({ "email": "rider@example.com", "password": "rider-password" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}
