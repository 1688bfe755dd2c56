//! Route endpoints.
//!
//! List views show station names; the detail view embeds the full
//! stations (list view extended by composition).

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use nova_core::{Route, Station};

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::handlers::RefCache;
use crate::pagination::{Page, PageParams, PageWindow};
use crate::policy::{authorize, Action, Identity, Resource};
use crate::state::AppState;

// =============================================================================
// View Models
// =============================================================================

/// List view: station references flattened to their names.
#[derive(Debug, Serialize)]
pub struct RouteListView {
    pub id: String,
    pub source: String,
    pub destination: String,
    pub distance: i64,
}

/// Detail view: the list view's fields with the stations embedded.
#[derive(Debug, Serialize)]
pub struct RouteDetailView {
    pub id: String,
    pub source: Station,
    pub destination: Station,
    pub distance: i64,
}

async fn list_view(
    state: &AppState,
    cache: &mut RefCache,
    route: Route,
) -> Result<RouteListView, ApiError> {
    let source = cache.station(&state.db, &route.source_id).await?;
    let destination = cache.station(&state.db, &route.destination_id).await?;

    Ok(RouteListView {
        id: route.id,
        source: source.name,
        destination: destination.name,
        distance: route.distance,
    })
}

async fn detail_view(
    state: &AppState,
    cache: &mut RefCache,
    route: Route,
) -> Result<RouteDetailView, ApiError> {
    let source = cache.station(&state.db, &route.source_id).await?;
    let destination = cache.station(&state.db, &route.destination_id).await?;

    Ok(RouteDetailView {
        id: route.id,
        source,
        destination,
        distance: route.distance,
    })
}

// =============================================================================
// Handlers
// =============================================================================

/// Query parameters for `GET /routes`.
#[derive(Debug, Default, Deserialize)]
pub struct RouteFilter {
    /// Case-insensitive source station name substring.
    pub source: Option<String>,
    /// Case-insensitive destination station name substring.
    pub destination: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Body for `POST /routes`.
#[derive(Debug, Deserialize)]
pub struct CreateRoute {
    pub source: String,
    pub destination: String,
    pub distance: i64,
}

/// `GET /routes` - list, filterable by `source`/`destination`, ordered by
/// source then destination name.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<RouteFilter>,
) -> Result<Json<Page<RouteListView>>, ApiError> {
    authorize(&Identity::Anonymous, Action::List, Resource::Routes)?;

    let window = PageWindow::resolve(
        PageParams {
            page: filter.page,
            page_size: filter.page_size,
        },
        &state.config,
    );
    let source = filter.source.as_deref();
    let destination = filter.destination.as_deref();

    let routes = state
        .db
        .routes()
        .list(source, destination, window.limit(), window.offset())
        .await?;
    let count = state.db.routes().count(source, destination).await?;

    let mut cache = RefCache::new();
    let mut views = Vec::with_capacity(routes.len());
    for route in routes {
        views.push(list_view(&state, &mut cache, route).await?);
    }

    Ok(Json(Page::new(count, window, views)))
}

/// `GET /routes/{id}`.
pub async fn retrieve(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<RouteDetailView>, ApiError> {
    authorize(&Identity::Anonymous, Action::Retrieve, Resource::Routes)?;

    let route = state
        .db
        .routes()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Route", &id))?;

    let mut cache = RefCache::new();
    let view = detail_view(&state, &mut cache, route).await?;

    Ok(Json(view))
}

/// `POST /routes` - staff only.
pub async fn create(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(body): Json<CreateRoute>,
) -> Result<(StatusCode, Json<RouteListView>), ApiError> {
    authorize(
        &Identity::user(&user.id, user.is_staff),
        Action::Create,
        Resource::Routes,
    )?;

    let route = state
        .db
        .routes()
        .insert(&body.source, &body.destination, body.distance)
        .await?;

    let mut cache = RefCache::new();
    let view = list_view(&state, &mut cache, route).await?;

    Ok((StatusCode::CREATED, Json(view)))
}

/// `DELETE /routes/{id}` - staff only.
pub async fn destroy(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    authorize(
        &Identity::user(&user.id, user.is_staff),
        Action::Delete,
        Resource::Routes,
    )?;

    state.db.routes().delete(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}
