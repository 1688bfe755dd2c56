//! Station endpoints.
//!
//! Stations serialize as-is; there is no separate list/detail view.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use nova_core::Station;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::pagination::{Page, PageParams, PageWindow};
use crate::policy::{authorize, Action, Identity, Resource};
use crate::state::AppState;

/// Query parameters for `GET /stations`.
#[derive(Debug, Default, Deserialize)]
pub struct StationFilter {
    /// Case-insensitive name substring.
    pub name: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Body for `POST /stations`.
#[derive(Debug, Deserialize)]
pub struct CreateStation {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// `GET /stations` - list, filterable by `name`, ordered by name.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<StationFilter>,
) -> Result<Json<Page<Station>>, ApiError> {
    authorize(&Identity::Anonymous, Action::List, Resource::Stations)?;

    let window = PageWindow::resolve(
        PageParams {
            page: filter.page,
            page_size: filter.page_size,
        },
        &state.config,
    );
    let name = filter.name.as_deref();

    let stations = state
        .db
        .stations()
        .list(name, window.limit(), window.offset())
        .await?;
    let count = state.db.stations().count(name).await?;

    Ok(Json(Page::new(count, window, stations)))
}

/// `GET /stations/{id}`.
pub async fn retrieve(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Station>, ApiError> {
    authorize(&Identity::Anonymous, Action::Retrieve, Resource::Stations)?;

    let station = state
        .db
        .stations()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Station", &id))?;

    Ok(Json(station))
}

/// `POST /stations` - staff only.
pub async fn create(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(body): Json<CreateStation>,
) -> Result<(StatusCode, Json<Station>), ApiError> {
    authorize(
        &Identity::user(&user.id, user.is_staff),
        Action::Create,
        Resource::Stations,
    )?;

    let station = state
        .db
        .stations()
        .insert(&body.name, body.latitude, body.longitude)
        .await?;

    Ok((StatusCode::CREATED, Json(station)))
}

/// `DELETE /stations/{id}` - staff only.
pub async fn destroy(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    authorize(
        &Identity::user(&user.id, user.is_staff),
        Action::Delete,
        Resource::Stations,
    )?;

    state.db.stations().delete(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}
