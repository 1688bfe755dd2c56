//! Order endpoints - the HTTP face of the placement engine.
//!
//! `POST /orders` body:
//!
//! ```json
//! { "tickets": [ { "trip": "<trip-id>", "railcar": 2, "seat": 14 } ] }
//! ```
//!
//! The whole order commits or nothing does; see
//! `nova_db::OrderRepository::place_order` for the guarantees.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use nova_core::{Order, Ticket, TicketRequest};

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::handlers::trips::{trip_summary, TripSummary};
use crate::handlers::RefCache;
use crate::pagination::{Page, PageParams, PageWindow};
use crate::policy::{authorize, Action, Identity, Resource};
use crate::state::AppState;

// =============================================================================
// View Models
// =============================================================================

/// One ticket nested under an order, with its trip summarized.
#[derive(Debug, Serialize)]
pub struct TicketView {
    pub id: String,
    pub railcar: i64,
    pub seat: i64,
    pub trip: TripSummary,
}

/// An order with all of its tickets.
#[derive(Debug, Serialize)]
pub struct OrderView {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub tickets: Vec<TicketView>,
}

pub(crate) async fn ticket_view(
    state: &AppState,
    cache: &mut RefCache,
    ticket: Ticket,
) -> Result<TicketView, ApiError> {
    let trip = trip_summary(state, cache, &ticket.trip_id).await?;

    Ok(TicketView {
        id: ticket.id,
        railcar: ticket.railcar,
        seat: ticket.seat,
        trip,
    })
}

async fn order_view(
    state: &AppState,
    cache: &mut RefCache,
    order: Order,
    tickets: Vec<Ticket>,
) -> Result<OrderView, ApiError> {
    let mut ticket_views = Vec::with_capacity(tickets.len());
    for ticket in tickets {
        ticket_views.push(ticket_view(state, cache, ticket).await?);
    }

    Ok(OrderView {
        id: order.id,
        created_at: order.created_at,
        tickets: ticket_views,
    })
}

// =============================================================================
// Handlers
// =============================================================================

/// One requested seat in `POST /orders`.
#[derive(Debug, Deserialize)]
pub struct TicketRequestBody {
    pub trip: String,
    pub railcar: i64,
    pub seat: i64,
}

/// Body for `POST /orders`.
#[derive(Debug, Deserialize)]
pub struct CreateOrder {
    pub tickets: Vec<TicketRequestBody>,
}

/// `GET /orders` - the caller's own orders, newest first.
pub async fn list(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<OrderView>>, ApiError> {
    authorize(
        &Identity::user(&user.id, user.is_staff),
        Action::List,
        Resource::Orders,
    )?;

    let window = PageWindow::resolve(params, &state.config);

    let orders = state
        .db
        .orders()
        .list_for_user(&user.id, window.limit(), window.offset())
        .await?;
    let count = state.db.orders().count_for_user(&user.id).await?;

    let mut cache = RefCache::new();
    let mut views = Vec::with_capacity(orders.len());
    for order in orders {
        let tickets = state.db.orders().tickets_for_order(&order.id).await?;
        views.push(order_view(&state, &mut cache, order, tickets).await?);
    }

    Ok(Json(Page::new(count, window, views)))
}

/// `GET /orders/{id}` - only the owner sees it; anyone else gets 404.
pub async fn retrieve(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<OrderView>, ApiError> {
    authorize(
        &Identity::user(&user.id, user.is_staff),
        Action::Retrieve,
        Resource::Orders,
    )?;

    let order = state
        .db
        .orders()
        .get_for_user(&id, &user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order", &id))?;

    let tickets = state.db.orders().tickets_for_order(&order.id).await?;

    let mut cache = RefCache::new();
    let view = order_view(&state, &mut cache, order, tickets).await?;

    Ok(Json(view))
}

/// `POST /orders` - place an order; all tickets commit atomically.
pub async fn create(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(body): Json<CreateOrder>,
) -> Result<(StatusCode, Json<OrderView>), ApiError> {
    authorize(
        &Identity::user(&user.id, user.is_staff),
        Action::Create,
        Resource::Orders,
    )?;

    let requests: Vec<TicketRequest> = body
        .tickets
        .into_iter()
        .map(|ticket| TicketRequest {
            trip_id: ticket.trip,
            railcar: ticket.railcar,
            seat: ticket.seat,
        })
        .collect();

    let (order, tickets) = state.db.orders().place_order(&user.id, &requests).await?;

    let mut cache = RefCache::new();
    let view = order_view(&state, &mut cache, order, tickets).await?;

    Ok((StatusCode::CREATED, Json(view)))
}
