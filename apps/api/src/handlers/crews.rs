//! Crew endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use nova_core::Crew;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::pagination::{Page, PageParams, PageWindow};
use crate::policy::{authorize, Action, Identity, Resource};
use crate::state::AppState;

/// Crew view: raw names plus the derived `full_name`.
#[derive(Debug, Serialize)]
pub struct CrewView {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
}

impl From<Crew> for CrewView {
    fn from(crew: Crew) -> Self {
        CrewView {
            full_name: crew.full_name(),
            id: crew.id,
            first_name: crew.first_name,
            last_name: crew.last_name,
        }
    }
}

/// Query parameters for `GET /crews`.
#[derive(Debug, Default, Deserialize)]
pub struct CrewFilter {
    /// Case-insensitive first name substring.
    pub first_name: Option<String>,
    /// Case-insensitive last name substring.
    pub last_name: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Body for `POST /crews`.
#[derive(Debug, Deserialize)]
pub struct CreateCrew {
    pub first_name: String,
    pub last_name: String,
}

/// `GET /crews` - list, filterable by `first_name`/`last_name`, ordered
/// by last name then first name.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<CrewFilter>,
) -> Result<Json<Page<CrewView>>, ApiError> {
    authorize(&Identity::Anonymous, Action::List, Resource::Crews)?;

    let window = PageWindow::resolve(
        PageParams {
            page: filter.page,
            page_size: filter.page_size,
        },
        &state.config,
    );
    let first_name = filter.first_name.as_deref();
    let last_name = filter.last_name.as_deref();

    let crew = state
        .db
        .crews()
        .list(first_name, last_name, window.limit(), window.offset())
        .await?;
    let count = state.db.crews().count(first_name, last_name).await?;

    let views = crew.into_iter().map(CrewView::from).collect();

    Ok(Json(Page::new(count, window, views)))
}

/// `GET /crews/{id}`.
pub async fn retrieve(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CrewView>, ApiError> {
    authorize(&Identity::Anonymous, Action::Retrieve, Resource::Crews)?;

    let crew = state
        .db
        .crews()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Crew", &id))?;

    Ok(Json(CrewView::from(crew)))
}

/// `POST /crews` - staff only.
pub async fn create(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(body): Json<CreateCrew>,
) -> Result<(StatusCode, Json<CrewView>), ApiError> {
    authorize(
        &Identity::user(&user.id, user.is_staff),
        Action::Create,
        Resource::Crews,
    )?;

    let crew = state
        .db
        .crews()
        .insert(&body.first_name, &body.last_name)
        .await?;

    Ok((StatusCode::CREATED, Json(CrewView::from(crew))))
}

/// `DELETE /crews/{id}` - staff only.
pub async fn destroy(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    authorize(
        &Identity::user(&user.id, user.is_staff),
        Action::Delete,
        Resource::Crews,
    )?;

    state.db.crews().delete(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}
