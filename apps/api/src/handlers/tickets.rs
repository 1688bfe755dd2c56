//! Ticket endpoints.
//!
//! Read-only: tickets come into existence only inside `POST /orders`, so
//! there is no create path here. The listing is scoped to the caller.

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::handlers::orders::{ticket_view, TicketView};
use crate::handlers::RefCache;
use crate::pagination::{Page, PageParams, PageWindow};
use crate::policy::{authorize, Action, Identity, Resource};
use crate::state::AppState;

/// `GET /tickets` - the caller's own tickets across all orders, ordered
/// by railcar then seat.
pub async fn list(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<TicketView>>, ApiError> {
    authorize(
        &Identity::user(&user.id, user.is_staff),
        Action::List,
        Resource::Tickets,
    )?;

    let window = PageWindow::resolve(params, &state.config);

    let tickets = state
        .db
        .orders()
        .tickets_for_user(&user.id, window.limit(), window.offset())
        .await?;
    let count = state.db.orders().count_tickets_for_user(&user.id).await?;

    let mut cache = RefCache::new();
    let mut views = Vec::with_capacity(tickets.len());
    for ticket in tickets {
        views.push(ticket_view(&state, &mut cache, ticket).await?);
    }

    Ok(Json(Page::new(count, window, views)))
}
