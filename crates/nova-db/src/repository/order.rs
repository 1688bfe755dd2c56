//! # Order Repository - the placement engine
//!
//! Atomic creation of an order together with all of its tickets.
//!
//! ## Placement Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     place_order() guarantees                            │
//! │                                                                         │
//! │  requests: [{trip, railcar, seat}, ...]                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Shape check (nova-core): empty → EmptyOrder, > cap → TooManyTickets   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN TRANSACTION                                                     │
//! │       │                                                                 │
//! │       ├── Per request: resolve trip's train → NotFound on bad trip     │
//! │       │   then bounds check (nova-core):                               │
//! │       │     railcar ∉ 1..=railcar_num      → RailcarOutOfRange         │
//! │       │     seat    ∉ 1..=seats_in_railcar → SeatOutOfRange            │
//! │       │                                                                 │
//! │       ├── INSERT order (created_at assigned here, not by caller)       │
//! │       │                                                                 │
//! │       ├── INSERT ticket × N                                            │
//! │       │     UNIQUE (trip, railcar, seat) rejected → SeatTaken          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  COMMIT ── any error path above drops the transaction instead:         │
//! │            no order row, no ticket row, no observable effect           │
//! │                                                                         │
//! │  Two concurrent placements of the same seat: the UNIQUE index          │
//! │  guarantees exactly one commits and the other gets SeatTaken.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use nova_core::{validation, Order, Ticket, TicketRequest, Train};

/// Repository for order and ticket database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Places an order: validates every requested seat and persists the
    /// order with all of its tickets in a single transaction.
    ///
    /// ## Arguments
    /// * `user_id` - the authenticated buyer
    /// * `requests` - ordered, non-empty seat requests
    ///
    /// ## Returns
    /// The persisted order and its tickets (in request order), with
    /// `created_at` assigned at persistence time.
    ///
    /// ## Errors
    /// * `Core(EmptyOrder)` - empty request list
    /// * `NotFound` - a request names a trip that does not exist
    /// * `Core(RailcarOutOfRange / SeatOutOfRange)` - seat outside the
    ///   trip's train geometry
    /// * `SeatTaken` - the seat was already sold (possibly by a
    ///   concurrent placement); resubmitting with another seat is the
    ///   caller's decision
    ///
    /// On any error the transaction is dropped: no partial order is ever
    /// visible.
    pub async fn place_order(
        &self,
        user_id: &str,
        requests: &[TicketRequest],
    ) -> DbResult<(Order, Vec<Ticket>)> {
        validation::validate_ticket_requests(requests)?;

        let mut tx = self.pool.begin().await?;

        // Resolve and bounds-check every request before writing anything.
        // The lookups run inside the transaction so the train geometry
        // seen here is the one the tickets are written against.
        for request in requests {
            let train = sqlx::query_as::<_, Train>(
                r#"
                SELECT tr.id, tr.name, tr.railcar_num, tr.seats_in_railcar, tr.train_type_id
                FROM trains tr
                JOIN trips t ON t.train_id = tr.id
                WHERE t.id = ?1
                "#,
            )
            .bind(&request.trip_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::not_found("Trip", &request.trip_id))?;

            validation::validate_seat_assignment(&train, request.railcar, request.seat)?;
        }

        let order = Order {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            created_at: Utc::now(),
        };

        debug!(id = %order.id, user_id = %user_id, tickets = requests.len(), "Inserting order");

        sqlx::query("INSERT INTO orders (id, user_id, created_at) VALUES (?1, ?2, ?3)")
            .bind(&order.id)
            .bind(&order.user_id)
            .bind(order.created_at)
            .execute(&mut *tx)
            .await?;

        let mut tickets = Vec::with_capacity(requests.len());
        for request in requests {
            let ticket = Ticket {
                id: Uuid::new_v4().to_string(),
                trip_id: request.trip_id.clone(),
                order_id: order.id.clone(),
                railcar: request.railcar,
                seat: request.seat,
            };

            sqlx::query(
                r#"
                INSERT INTO tickets (id, trip_id, order_id, railcar, seat)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(&ticket.id)
            .bind(&ticket.trip_id)
            .bind(&ticket.order_id)
            .bind(ticket.railcar)
            .bind(ticket.seat)
            .execute(&mut *tx)
            .await
            .map_err(|e| match DbError::from(e) {
                // The unique index arbitrates seat ownership; translate
                // its violation into the domain conflict, with the
                // request values the raw sqlx error cannot carry.
                err if err.is_unique_violation_on("tickets.") => DbError::SeatTaken {
                    trip_id: request.trip_id.clone(),
                    railcar: request.railcar,
                    seat: request.seat,
                },
                err => err,
            })?;

            tickets.push(ticket);
        }

        tx.commit().await?;

        info!(order_id = %order.id, tickets = tickets.len(), "Order placed");

        Ok((order, tickets))
    }

    /// Lists a user's own orders.
    ///
    /// Ordering: by created_at, newest first.
    pub async fn list_for_user(
        &self,
        user_id: &str,
        limit: i64,
        offset: i64,
    ) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, user_id, created_at
            FROM orders
            WHERE user_id = ?1
            ORDER BY created_at DESC, id
            LIMIT ?2 OFFSET ?3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Counts a user's own orders.
    pub async fn count_for_user(&self, user_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE user_id = ?1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Gets an order if (and only if) it belongs to the given user.
    ///
    /// Ownership is part of the query, not an afterthought: another
    /// user's order id behaves exactly like a missing one.
    pub async fn get_for_user(&self, order_id: &str, user_id: &str) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            "SELECT id, user_id, created_at FROM orders WHERE id = ?1 AND user_id = ?2",
        )
        .bind(order_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Gets the tickets of one order.
    ///
    /// Ordering: by railcar, then seat.
    pub async fn tickets_for_order(&self, order_id: &str) -> DbResult<Vec<Ticket>> {
        let tickets = sqlx::query_as::<_, Ticket>(
            r#"
            SELECT id, trip_id, order_id, railcar, seat
            FROM tickets
            WHERE order_id = ?1
            ORDER BY railcar, seat
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tickets)
    }

    /// Lists a user's tickets across all of their orders.
    ///
    /// Ordering: by railcar, then seat (within the page window).
    pub async fn tickets_for_user(
        &self,
        user_id: &str,
        limit: i64,
        offset: i64,
    ) -> DbResult<Vec<Ticket>> {
        let tickets = sqlx::query_as::<_, Ticket>(
            r#"
            SELECT t.id, t.trip_id, t.order_id, t.railcar, t.seat
            FROM tickets t
            JOIN orders o ON o.id = t.order_id
            WHERE o.user_id = ?1
            ORDER BY t.railcar, t.seat
            LIMIT ?2 OFFSET ?3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(tickets)
    }

    /// Counts a user's tickets across all of their orders.
    pub async fn count_tickets_for_user(&self, user_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM tickets t
            JOIN orders o ON o.id = t.order_id
            WHERE o.user_id = ?1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Counts tickets sold for one trip (capacity bookkeeping).
    pub async fn count_tickets_for_trip(&self, trip_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tickets WHERE trip_id = ?1")
            .bind(trip_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
