//! Train type endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use nova_core::TrainType;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::pagination::{Page, PageParams, PageWindow};
use crate::policy::{authorize, Action, Identity, Resource};
use crate::state::AppState;

/// Query parameters for `GET /train-types`.
#[derive(Debug, Default, Deserialize)]
pub struct TrainTypeFilter {
    /// Case-insensitive name substring.
    pub name: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Body for `POST /train-types`.
#[derive(Debug, Deserialize)]
pub struct CreateTrainType {
    pub name: String,
}

/// `GET /train-types` - list, filterable by `name`, ordered by name.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<TrainTypeFilter>,
) -> Result<Json<Page<TrainType>>, ApiError> {
    authorize(&Identity::Anonymous, Action::List, Resource::TrainTypes)?;

    let window = PageWindow::resolve(
        PageParams {
            page: filter.page,
            page_size: filter.page_size,
        },
        &state.config,
    );
    let name = filter.name.as_deref();

    let types = state
        .db
        .train_types()
        .list(name, window.limit(), window.offset())
        .await?;
    let count = state.db.train_types().count(name).await?;

    Ok(Json(Page::new(count, window, types)))
}

/// `GET /train-types/{id}`.
pub async fn retrieve(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TrainType>, ApiError> {
    authorize(&Identity::Anonymous, Action::Retrieve, Resource::TrainTypes)?;

    let train_type = state
        .db
        .train_types()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("TrainType", &id))?;

    Ok(Json(train_type))
}

/// `POST /train-types` - staff only.
pub async fn create(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(body): Json<CreateTrainType>,
) -> Result<(StatusCode, Json<TrainType>), ApiError> {
    authorize(
        &Identity::user(&user.id, user.is_staff),
        Action::Create,
        Resource::TrainTypes,
    )?;

    let train_type = state.db.train_types().insert(&body.name).await?;

    Ok((StatusCode::CREATED, Json(train_type)))
}

/// `DELETE /train-types/{id}` - staff only.
pub async fn destroy(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    authorize(
        &Identity::user(&user.id, user.is_staff),
        Action::Delete,
        Resource::TrainTypes,
    )?;

    state.db.train_types().delete(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}
