//! Trip endpoints.
//!
//! Three explicit views, built by composition:
//! - [`TripListView`] - display strings for route/train, formatted times
//! - [`TripDetailView`] - embedded route and train views, raw timestamps
//! - [`TripSummary`] - the compact form nested under order tickets

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use nova_core::Trip;
use nova_db::NewTrip;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::handlers::routes::RouteListView;
use crate::handlers::trains::{train_view, TrainView};
use crate::handlers::RefCache;
use crate::pagination::{Page, PageParams, PageWindow};
use crate::policy::{authorize, Action, Identity, Resource};
use crate::state::AppState;

/// Display format for timestamps in list and summary views.
const LIST_TIME_FORMAT: &str = "%Y-%m-%d, %H:%M";

// =============================================================================
// View Models
// =============================================================================

/// List view: references flattened to display strings.
#[derive(Debug, Serialize)]
pub struct TripListView {
    pub id: String,
    /// "Source - Destination"
    pub route: String,
    /// "Train name (type)"
    pub train: String,
    /// Crew full names, last name order.
    pub crew: Vec<String>,
    pub departure_time: String,
    pub arrival_time: String,
}

/// Detail view: embedded route and train, raw timestamps.
#[derive(Debug, Serialize)]
pub struct TripDetailView {
    pub id: String,
    pub route: RouteListView,
    pub train: TrainView,
    pub crew: Vec<String>,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
}

/// Compact trip form nested under an order's tickets.
#[derive(Debug, Serialize)]
pub struct TripSummary {
    pub id: String,
    /// "Source - Destination"
    pub route: String,
    pub train: String,
    pub train_type: String,
    pub departure_time: String,
    pub arrival_time: String,
}

async fn route_display(
    state: &AppState,
    cache: &mut RefCache,
    route_id: &str,
) -> Result<String, ApiError> {
    let route = cache.route(&state.db, route_id).await?;
    let source = cache.station(&state.db, &route.source_id).await?;
    let destination = cache.station(&state.db, &route.destination_id).await?;
    Ok(format!("{} - {}", source.name, destination.name))
}

async fn list_view(
    state: &AppState,
    cache: &mut RefCache,
    trip: Trip,
) -> Result<TripListView, ApiError> {
    let route = route_display(state, cache, &trip.route_id).await?;

    let train = cache.train(&state.db, &trip.train_id).await?;
    let train_type = cache.train_type(&state.db, &train.train_type_id).await?;

    let crew = state
        .db
        .trips()
        .crew_for_trip(&trip.id)
        .await?
        .into_iter()
        .map(|member| member.full_name())
        .collect();

    Ok(TripListView {
        id: trip.id,
        route,
        train: format!("{} ({})", train.name, train_type.name),
        crew,
        departure_time: trip.departure_time.format(LIST_TIME_FORMAT).to_string(),
        arrival_time: trip.arrival_time.format(LIST_TIME_FORMAT).to_string(),
    })
}

async fn detail_view(
    state: &AppState,
    cache: &mut RefCache,
    trip: Trip,
) -> Result<TripDetailView, ApiError> {
    let route = cache.route(&state.db, &trip.route_id).await?;
    let source = cache.station(&state.db, &route.source_id).await?;
    let destination = cache.station(&state.db, &route.destination_id).await?;

    let train = cache.train(&state.db, &trip.train_id).await?;
    let train = train_view(state, cache, train).await?;

    let crew = state
        .db
        .trips()
        .crew_for_trip(&trip.id)
        .await?
        .into_iter()
        .map(|member| member.full_name())
        .collect();

    Ok(TripDetailView {
        id: trip.id,
        route: RouteListView {
            id: route.id,
            source: source.name,
            destination: destination.name,
            distance: route.distance,
        },
        train,
        crew,
        departure_time: trip.departure_time,
        arrival_time: trip.arrival_time,
    })
}

/// Builds the compact summary for one trip id (used by order views).
pub(crate) async fn trip_summary(
    state: &AppState,
    cache: &mut RefCache,
    trip_id: &str,
) -> Result<TripSummary, ApiError> {
    let trip = cache.trip(&state.db, trip_id).await?;
    let route = route_display(state, cache, &trip.route_id).await?;

    let train = cache.train(&state.db, &trip.train_id).await?;
    let train_type = cache.train_type(&state.db, &train.train_type_id).await?;

    Ok(TripSummary {
        id: trip.id,
        route,
        train: train.name,
        train_type: train_type.name,
        departure_time: trip.departure_time.format(LIST_TIME_FORMAT).to_string(),
        arrival_time: trip.arrival_time.format(LIST_TIME_FORMAT).to_string(),
    })
}

// =============================================================================
// Handlers
// =============================================================================

/// Query parameters for `GET /trips`.
#[derive(Debug, Default, Deserialize)]
pub struct TripFilter {
    /// Case-insensitive substring matched against the source OR
    /// destination station name.
    pub route: Option<String>,
    /// Exact departure calendar date, `YYYY-MM-DD`.
    pub departure_time: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Body for `POST /trips`.
#[derive(Debug, Deserialize)]
pub struct CreateTrip {
    pub route: String,
    pub train: String,
    #[serde(default)]
    pub crew: Vec<String>,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
}

/// `GET /trips` - list, filterable by `route` and `departure_time`
/// (date), ordered by departure time, newest first.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<TripFilter>,
) -> Result<Json<Page<TripListView>>, ApiError> {
    authorize(&Identity::Anonymous, Action::List, Resource::Trips)?;

    let window = PageWindow::resolve(
        PageParams {
            page: filter.page,
            page_size: filter.page_size,
        },
        &state.config,
    );
    let route = filter.route.as_deref();

    let departure_date = filter
        .departure_time
        .as_deref()
        .map(|raw| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| ApiError::bad_request("departure_time must be YYYY-MM-DD"))
        })
        .transpose()?;

    let trips = state
        .db
        .trips()
        .list(route, departure_date, window.limit(), window.offset())
        .await?;
    let count = state.db.trips().count(route, departure_date).await?;

    let mut cache = RefCache::new();
    let mut views = Vec::with_capacity(trips.len());
    for trip in trips {
        views.push(list_view(&state, &mut cache, trip).await?);
    }

    Ok(Json(Page::new(count, window, views)))
}

/// `GET /trips/{id}`.
pub async fn retrieve(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TripDetailView>, ApiError> {
    authorize(&Identity::Anonymous, Action::Retrieve, Resource::Trips)?;

    let trip = state
        .db
        .trips()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Trip", &id))?;

    let mut cache = RefCache::new();
    let view = detail_view(&state, &mut cache, trip).await?;

    Ok(Json(view))
}

/// `POST /trips` - staff only.
pub async fn create(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(body): Json<CreateTrip>,
) -> Result<(StatusCode, Json<TripDetailView>), ApiError> {
    authorize(
        &Identity::user(&user.id, user.is_staff),
        Action::Create,
        Resource::Trips,
    )?;

    let trip = state
        .db
        .trips()
        .create(NewTrip {
            route_id: body.route,
            train_id: body.train,
            crew_ids: body.crew,
            departure_time: body.departure_time,
            arrival_time: body.arrival_time,
        })
        .await?;

    let mut cache = RefCache::new();
    let view = detail_view(&state, &mut cache, trip).await?;

    Ok((StatusCode::CREATED, Json(view)))
}

/// `DELETE /trips/{id}` - staff only.
pub async fn destroy(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    authorize(
        &Identity::user(&user.id, user.is_staff),
        Action::Delete,
        Resource::Trips,
    )?;

    state.db.trips().delete(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}
