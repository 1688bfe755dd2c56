//! Train endpoints.
//!
//! The view carries the type name and the derived capacity; list and
//! detail share it.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use nova_core::Train;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::handlers::RefCache;
use crate::pagination::{Page, PageParams, PageWindow};
use crate::policy::{authorize, Action, Identity, Resource};
use crate::state::AppState;

// =============================================================================
// View Models
// =============================================================================

/// Train view: type reference flattened to its name, capacity included.
#[derive(Debug, Serialize)]
pub struct TrainView {
    pub id: String,
    pub name: String,
    pub railcar_num: i64,
    pub seats_in_railcar: i64,
    pub train_type: String,
    pub capacity: i64,
}

pub(crate) async fn train_view(
    state: &AppState,
    cache: &mut RefCache,
    train: Train,
) -> Result<TrainView, ApiError> {
    let train_type = cache.train_type(&state.db, &train.train_type_id).await?;

    Ok(TrainView {
        capacity: train.capacity(),
        id: train.id,
        name: train.name,
        railcar_num: train.railcar_num,
        seats_in_railcar: train.seats_in_railcar,
        train_type: train_type.name,
    })
}

// =============================================================================
// Handlers
// =============================================================================

/// Query parameters for `GET /trains`.
#[derive(Debug, Default, Deserialize)]
pub struct TrainFilter {
    /// Case-insensitive train type name substring.
    pub train_type: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Body for `POST /trains`.
#[derive(Debug, Deserialize)]
pub struct CreateTrain {
    pub name: String,
    pub railcar_num: i64,
    pub seats_in_railcar: i64,
    pub train_type: String,
}

/// `GET /trains` - list, filterable by `train_type`, ordered by name.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<TrainFilter>,
) -> Result<Json<Page<TrainView>>, ApiError> {
    authorize(&Identity::Anonymous, Action::List, Resource::Trains)?;

    let window = PageWindow::resolve(
        PageParams {
            page: filter.page,
            page_size: filter.page_size,
        },
        &state.config,
    );
    let train_type = filter.train_type.as_deref();

    let trains = state
        .db
        .trains()
        .list(train_type, window.limit(), window.offset())
        .await?;
    let count = state.db.trains().count(train_type).await?;

    let mut cache = RefCache::new();
    let mut views = Vec::with_capacity(trains.len());
    for train in trains {
        views.push(train_view(&state, &mut cache, train).await?);
    }

    Ok(Json(Page::new(count, window, views)))
}

/// `GET /trains/{id}`.
pub async fn retrieve(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TrainView>, ApiError> {
    authorize(&Identity::Anonymous, Action::Retrieve, Resource::Trains)?;

    let train = state
        .db
        .trains()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Train", &id))?;

    let mut cache = RefCache::new();
    let view = train_view(&state, &mut cache, train).await?;

    Ok(Json(view))
}

/// `POST /trains` - staff only.
pub async fn create(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(body): Json<CreateTrain>,
) -> Result<(StatusCode, Json<TrainView>), ApiError> {
    authorize(
        &Identity::user(&user.id, user.is_staff),
        Action::Create,
        Resource::Trains,
    )?;

    let train = state
        .db
        .trains()
        .insert(
            &body.name,
            body.railcar_num,
            body.seats_in_railcar,
            &body.train_type,
        )
        .await?;

    let mut cache = RefCache::new();
    let view = train_view(&state, &mut cache, train).await?;

    Ok((StatusCode::CREATED, Json(view)))
}

/// `DELETE /trains/{id}` - staff only.
pub async fn destroy(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    authorize(
        &Identity::user(&user.id, user.is_staff),
        Action::Delete,
        Resource::Trains,
    )?;

    state.db.trains().delete(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}
