//! # Trip Repository
//!
//! Database operations for scheduled trips.
//!
//! ## Trip Creation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       create() flow                                     │
//! │                                                                         │
//! │  NewTrip { route, train, crew, departure, arrival }                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Resolve route / train / every crew id  → NotFound on a bad ref        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  nova_core::validation::validate_schedule(departure, arrival, now)     │
//! │       │    arrival <= departure  → InvalidSchedule                     │
//! │       │    departure <= now      → InvalidSchedule                     │
//! │       ▼                                                                 │
//! │  BEGIN; INSERT trip; INSERT trip_crew × N; COMMIT                      │
//! │       (crew associations land with the trip or not at all)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use nova_core::{validation, Crew, Trip};

/// Input record for trip creation.
#[derive(Debug, Clone)]
pub struct NewTrip {
    pub route_id: String,
    pub train_id: String,
    pub crew_ids: Vec<String>,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
}

/// Repository for trip database operations.
#[derive(Debug, Clone)]
pub struct TripRepository {
    pool: SqlitePool,
}

impl TripRepository {
    /// Creates a new TripRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TripRepository { pool }
    }

    /// Lists trips with optional filters.
    ///
    /// ## Filters
    /// * `route` - case-insensitive substring matched against the source
    ///   OR destination station name
    /// * `departure_date` - exact calendar date of departure (the
    ///   time-of-day is ignored)
    ///
    /// Ordering: by departure_time, newest first.
    pub async fn list(
        &self,
        route: Option<&str>,
        departure_date: Option<NaiveDate>,
        limit: i64,
        offset: i64,
    ) -> DbResult<Vec<Trip>> {
        debug!(route = ?route, departure_date = ?departure_date, limit, offset, "Listing trips");

        let date = departure_date.map(|d| d.format("%Y-%m-%d").to_string());

        // Timestamps are stored as ISO-8601 text, so the calendar date is
        // the first 10 characters.
        let trips = sqlx::query_as::<_, Trip>(
            r#"
            SELECT t.id, t.route_id, t.train_id, t.departure_time, t.arrival_time
            FROM trips t
            JOIN routes r ON r.id = t.route_id
            JOIN stations s ON s.id = r.source_id
            JOIN stations d ON d.id = r.destination_id
            WHERE (?1 IS NULL
                   OR s.name LIKE '%' || ?1 || '%'
                   OR d.name LIKE '%' || ?1 || '%')
              AND (?2 IS NULL OR substr(t.departure_time, 1, 10) = ?2)
            ORDER BY t.departure_time DESC
            LIMIT ?3 OFFSET ?4
            "#,
        )
        .bind(route)
        .bind(date)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(trips)
    }

    /// Counts trips matching the same filters as [`list`](Self::list).
    pub async fn count(
        &self,
        route: Option<&str>,
        departure_date: Option<NaiveDate>,
    ) -> DbResult<i64> {
        let date = departure_date.map(|d| d.format("%Y-%m-%d").to_string());

        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM trips t
            JOIN routes r ON r.id = t.route_id
            JOIN stations s ON s.id = r.source_id
            JOIN stations d ON d.id = r.destination_id
            WHERE (?1 IS NULL
                   OR s.name LIKE '%' || ?1 || '%'
                   OR d.name LIKE '%' || ?1 || '%')
              AND (?2 IS NULL OR substr(t.departure_time, 1, 10) = ?2)
            "#,
        )
        .bind(route)
        .bind(date)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Gets a trip by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Trip>> {
        let trip = sqlx::query_as::<_, Trip>(
            r#"
            SELECT id, route_id, train_id, departure_time, arrival_time
            FROM trips
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(trip)
    }

    /// Gets the crew assigned to a trip.
    ///
    /// Ordering: by last name, then first name.
    pub async fn crew_for_trip(&self, trip_id: &str) -> DbResult<Vec<Crew>> {
        let crew = sqlx::query_as::<_, Crew>(
            r#"
            SELECT c.id, c.first_name, c.last_name
            FROM crew_members c
            JOIN trip_crew tc ON tc.crew_id = c.id
            WHERE tc.trip_id = ?1
            ORDER BY c.last_name, c.first_name
            "#,
        )
        .bind(trip_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(crew)
    }

    /// Creates a new trip with its crew associations.
    ///
    /// Referenced entities are resolved first (bad reference → NotFound),
    /// then the schedule is validated against the current clock, then the
    /// trip row and its crew rows are written in one transaction.
    pub async fn create(&self, new_trip: NewTrip) -> DbResult<Trip> {
        let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM routes WHERE id = ?1")
            .bind(&new_trip.route_id)
            .fetch_one(&self.pool)
            .await?;
        if exists == 0 {
            return Err(DbError::not_found("Route", &new_trip.route_id));
        }

        let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM trains WHERE id = ?1")
            .bind(&new_trip.train_id)
            .fetch_one(&self.pool)
            .await?;
        if exists == 0 {
            return Err(DbError::not_found("Train", &new_trip.train_id));
        }

        for crew_id in &new_trip.crew_ids {
            let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM crew_members WHERE id = ?1")
                .bind(crew_id)
                .fetch_one(&self.pool)
                .await?;
            if exists == 0 {
                return Err(DbError::not_found("Crew", crew_id));
            }
        }

        validation::validate_schedule(
            new_trip.departure_time,
            new_trip.arrival_time,
            Utc::now(),
        )?;

        let trip = Trip {
            id: Uuid::new_v4().to_string(),
            route_id: new_trip.route_id,
            train_id: new_trip.train_id,
            departure_time: new_trip.departure_time,
            arrival_time: new_trip.arrival_time,
        };

        debug!(
            id = %trip.id,
            route_id = %trip.route_id,
            departure = %trip.departure_time,
            "Inserting trip"
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO trips (id, route_id, train_id, departure_time, arrival_time)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&trip.id)
        .bind(&trip.route_id)
        .bind(&trip.train_id)
        .bind(trip.departure_time)
        .bind(trip.arrival_time)
        .execute(&mut *tx)
        .await?;

        for crew_id in &new_trip.crew_ids {
            sqlx::query("INSERT INTO trip_crew (trip_id, crew_id) VALUES (?1, ?2)")
                .bind(&trip.id)
                .bind(crew_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(trip)
    }

    /// Deletes a trip by ID (crew associations cascade).
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM trips WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Trip", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::{Duration, Timelike};
    use nova_core::{CoreError, ScheduleViolation};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    struct Fixture {
        route_id: String,
        train_id: String,
        crew_ids: Vec<String>,
    }

    async fn seed(db: &Database) -> Fixture {
        let kyiv = db.stations().insert("Kyiv", 50.45, 30.52).await.unwrap();
        let lviv = db.stations().insert("Lviv", 49.84, 24.03).await.unwrap();
        let route = db.routes().insert(&kyiv.id, &lviv.id, 540).await.unwrap();

        let tt = db.train_types().insert("Intercity").await.unwrap();
        let train = db.trains().insert("IC-01", 4, 20, &tt.id).await.unwrap();

        let c1 = db.crews().insert("Olena", "Shevchenko").await.unwrap();
        let c2 = db.crews().insert("Ivan", "Franko").await.unwrap();

        Fixture {
            route_id: route.id,
            train_id: train.id,
            crew_ids: vec![c1.id, c2.id],
        }
    }

    fn departure(days: i64) -> chrono::DateTime<Utc> {
        (Utc::now() + Duration::days(days)).with_nanosecond(0).unwrap()
    }

    #[tokio::test]
    async fn test_create_round_trip() {
        let db = test_db().await;
        let fx = seed(&db).await;

        let dep = departure(2);
        let arr = dep + Duration::hours(5);

        let trip = db
            .trips()
            .create(NewTrip {
                route_id: fx.route_id.clone(),
                train_id: fx.train_id.clone(),
                crew_ids: fx.crew_ids.clone(),
                departure_time: dep,
                arrival_time: arr,
            })
            .await
            .unwrap();

        let found = db.trips().get_by_id(&trip.id).await.unwrap().unwrap();
        assert_eq!(found.route_id, fx.route_id);
        assert_eq!(found.train_id, fx.train_id);
        assert_eq!(found.departure_time, dep);
        assert_eq!(found.arrival_time, arr);

        let crew = db.trips().crew_for_trip(&trip.id).await.unwrap();
        assert_eq!(crew.len(), 2);
        // ordered by last name: Franko before Shevchenko
        assert_eq!(crew[0].last_name, "Franko");
    }

    #[tokio::test]
    async fn test_past_departure_rejected() {
        let db = test_db().await;
        let fx = seed(&db).await;

        let dep = Utc::now() - Duration::hours(1);
        let err = db
            .trips()
            .create(NewTrip {
                route_id: fx.route_id.clone(),
                train_id: fx.train_id.clone(),
                crew_ids: vec![],
                departure_time: dep,
                arrival_time: dep + Duration::hours(5),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DbError::Core(CoreError::InvalidSchedule(
                ScheduleViolation::DepartureNotInFuture
            ))
        ));

        // nothing persisted
        assert_eq!(db.trips().count(None, None).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_arrival_before_departure_rejected() {
        let db = test_db().await;
        let fx = seed(&db).await;

        let dep = departure(2);
        let err = db
            .trips()
            .create(NewTrip {
                route_id: fx.route_id,
                train_id: fx.train_id,
                crew_ids: vec![],
                departure_time: dep,
                arrival_time: dep - Duration::hours(1),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DbError::Core(CoreError::InvalidSchedule(
                ScheduleViolation::ArrivalNotAfterDeparture
            ))
        ));
    }

    #[tokio::test]
    async fn test_unknown_crew_rejected() {
        let db = test_db().await;
        let fx = seed(&db).await;

        let dep = departure(2);
        let err = db
            .trips()
            .create(NewTrip {
                route_id: fx.route_id,
                train_id: fx.train_id,
                crew_ids: vec!["no-such-crew".to_string()],
                departure_time: dep,
                arrival_time: dep + Duration::hours(5),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::NotFound { .. }));
        assert_eq!(db.trips().count(None, None).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_filters() {
        let db = test_db().await;
        let fx = seed(&db).await;

        let odesa = db.stations().insert("Odesa", 46.48, 30.72).await.unwrap();
        let kharkiv = db.stations().insert("Kharkiv", 49.99, 36.23).await.unwrap();
        let other_route = db.routes().insert(&odesa.id, &kharkiv.id, 830).await.unwrap();

        let dep_a = departure(2);
        let dep_b = departure(3);

        let kyiv_trip = db
            .trips()
            .create(NewTrip {
                route_id: fx.route_id.clone(),
                train_id: fx.train_id.clone(),
                crew_ids: vec![],
                departure_time: dep_a,
                arrival_time: dep_a + Duration::hours(5),
            })
            .await
            .unwrap();

        let odesa_trip = db
            .trips()
            .create(NewTrip {
                route_id: other_route.id.clone(),
                train_id: fx.train_id.clone(),
                crew_ids: vec![],
                departure_time: dep_b,
                arrival_time: dep_b + Duration::hours(9),
            })
            .await
            .unwrap();

        // route filter matches source or destination substring
        let hits = db.trips().list(Some("Lviv"), None, 20, 0).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, kyiv_trip.id);

        let hits = db.trips().list(Some("Odesa"), None, 20, 0).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, odesa_trip.id);

        // date filter ignores the time of day
        let hits = db
            .trips()
            .list(None, Some(dep_b.date_naive()), 20, 0)
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, odesa_trip.id);

        // newest departure first
        let all = db.trips().list(None, None, 20, 0).await.unwrap();
        assert_eq!(all[0].id, odesa_trip.id);
        assert_eq!(all[1].id, kyiv_trip.id);

        assert_eq!(db.trips().count(Some("Kyiv"), None).await.unwrap(), 1);
    }
}
