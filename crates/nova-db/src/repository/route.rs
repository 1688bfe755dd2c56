//! # Route Repository
//!
//! Database operations for routes between stations.

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use nova_core::{validation, CoreError, Route};

/// Repository for route database operations.
#[derive(Debug, Clone)]
pub struct RouteRepository {
    pool: SqlitePool,
}

impl RouteRepository {
    /// Creates a new RouteRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RouteRepository { pool }
    }

    /// Lists routes, optionally filtered by source and/or destination
    /// station name substrings (case-insensitive).
    ///
    /// Ordering: by source station name, then destination station name.
    pub async fn list(
        &self,
        source: Option<&str>,
        destination: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> DbResult<Vec<Route>> {
        debug!(source = ?source, destination = ?destination, limit, offset, "Listing routes");

        let routes = sqlx::query_as::<_, Route>(
            r#"
            SELECT r.id, r.source_id, r.destination_id, r.distance
            FROM routes r
            JOIN stations s ON s.id = r.source_id
            JOIN stations d ON d.id = r.destination_id
            WHERE (?1 IS NULL OR s.name LIKE '%' || ?1 || '%')
              AND (?2 IS NULL OR d.name LIKE '%' || ?2 || '%')
            ORDER BY s.name, d.name
            LIMIT ?3 OFFSET ?4
            "#,
        )
        .bind(source)
        .bind(destination)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(routes)
    }

    /// Counts routes matching the same filter as [`list`](Self::list).
    pub async fn count(&self, source: Option<&str>, destination: Option<&str>) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM routes r
            JOIN stations s ON s.id = r.source_id
            JOIN stations d ON d.id = r.destination_id
            WHERE (?1 IS NULL OR s.name LIKE '%' || ?1 || '%')
              AND (?2 IS NULL OR d.name LIKE '%' || ?2 || '%')
            "#,
        )
        .bind(source)
        .bind(destination)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Gets a route by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Route>> {
        let route = sqlx::query_as::<_, Route>(
            "SELECT id, source_id, destination_id, distance FROM routes WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(route)
    }

    /// Creates a new route.
    ///
    /// Both stations must exist (checked before the domain rules so a bad
    /// reference surfaces as NotFound, not a constraint failure).
    pub async fn insert(
        &self,
        source_id: &str,
        destination_id: &str,
        distance: i64,
    ) -> DbResult<Route> {
        for station_id in [source_id, destination_id] {
            let exists: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM stations WHERE id = ?1")
                    .bind(station_id)
                    .fetch_one(&self.pool)
                    .await?;
            if exists == 0 {
                return Err(DbError::not_found("Station", station_id));
            }
        }

        validation::validate_route(source_id, destination_id, distance)
            .map_err(CoreError::from)?;

        let route = Route {
            id: Uuid::new_v4().to_string(),
            source_id: source_id.to_string(),
            destination_id: destination_id.to_string(),
            distance,
        };

        debug!(id = %route.id, source = %source_id, destination = %destination_id, "Inserting route");

        sqlx::query(
            "INSERT INTO routes (id, source_id, destination_id, distance) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&route.id)
        .bind(&route.source_id)
        .bind(&route.destination_id)
        .bind(route.distance)
        .execute(&self.pool)
        .await?;

        Ok(route)
    }

    /// Deletes a route by ID.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM routes WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Route", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};
    use crate::DbError;
    use nova_core::CoreError;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_filter_by_source() {
        let db = test_db().await;

        let kyiv = db.stations().insert("Kyiv", 50.45, 30.52).await.unwrap();
        let lviv = db.stations().insert("Lviv", 49.84, 24.03).await.unwrap();
        let odesa = db.stations().insert("Odesa", 46.48, 30.72).await.unwrap();

        let kyiv_lviv = db.routes().insert(&kyiv.id, &lviv.id, 540).await.unwrap();
        db.routes().insert(&odesa.id, &lviv.id, 790).await.unwrap();

        // source=Kyiv returns exactly the Kyiv-Lviv route
        let hits = db.routes().list(Some("Kyiv"), None, 20, 0).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, kyiv_lviv.id);
        assert_eq!(hits[0].distance, 540);

        // destination filter
        let hits = db.routes().list(None, Some("Lviv"), 20, 0).await.unwrap();
        assert_eq!(hits.len(), 2);

        assert_eq!(db.routes().count(Some("Kyiv"), None).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_same_endpoints_rejected() {
        let db = test_db().await;

        let kyiv = db.stations().insert("Kyiv", 50.45, 30.52).await.unwrap();
        let err = db.routes().insert(&kyiv.id, &kyiv.id, 10).await.unwrap_err();

        assert!(matches!(
            err,
            DbError::Core(CoreError::Validation(
                nova_core::ValidationError::SourceEqualsDestination
            ))
        ));
    }

    #[tokio::test]
    async fn test_zero_distance_rejected() {
        let db = test_db().await;

        let kyiv = db.stations().insert("Kyiv", 50.45, 30.52).await.unwrap();
        let lviv = db.stations().insert("Lviv", 49.84, 24.03).await.unwrap();

        let err = db.routes().insert(&kyiv.id, &lviv.id, 0).await.unwrap_err();
        assert!(matches!(err, DbError::Core(_)));
    }

    #[tokio::test]
    async fn test_missing_station_is_not_found() {
        let db = test_db().await;

        let kyiv = db.stations().insert("Kyiv", 50.45, 30.52).await.unwrap();
        let err = db
            .routes()
            .insert(&kyiv.id, "no-such-station", 100)
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
