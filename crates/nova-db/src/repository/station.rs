//! # Station Repository
//!
//! Database operations for stations.

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use nova_core::{validation, CoreError, Station};

/// Repository for station database operations.
#[derive(Debug, Clone)]
pub struct StationRepository {
    pool: SqlitePool,
}

impl StationRepository {
    /// Creates a new StationRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StationRepository { pool }
    }

    /// Lists stations, optionally filtered by a name substring
    /// (case-insensitive).
    ///
    /// Ordering: by name, ascending.
    pub async fn list(
        &self,
        name: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> DbResult<Vec<Station>> {
        debug!(name = ?name, limit, offset, "Listing stations");

        let stations = sqlx::query_as::<_, Station>(
            r#"
            SELECT id, name, latitude, longitude
            FROM stations
            WHERE (?1 IS NULL OR name LIKE '%' || ?1 || '%')
            ORDER BY name
            LIMIT ?2 OFFSET ?3
            "#,
        )
        .bind(name)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(stations)
    }

    /// Counts stations matching the same filter as [`list`](Self::list).
    pub async fn count(&self, name: Option<&str>) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM stations
            WHERE (?1 IS NULL OR name LIKE '%' || ?1 || '%')
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Gets a station by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Station>> {
        let station = sqlx::query_as::<_, Station>(
            "SELECT id, name, latitude, longitude FROM stations WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(station)
    }

    /// Creates a new station.
    ///
    /// Validates the name before the write; the UNIQUE index on `name`
    /// turns duplicate inserts into `DbError::UniqueViolation`.
    pub async fn insert(&self, name: &str, latitude: f64, longitude: f64) -> DbResult<Station> {
        validation::validate_name("name", name).map_err(CoreError::from)?;

        let station = Station {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            latitude,
            longitude,
        };

        debug!(id = %station.id, name = %station.name, "Inserting station");

        sqlx::query(
            "INSERT INTO stations (id, name, latitude, longitude) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&station.id)
        .bind(&station.name)
        .bind(station.latitude)
        .bind(station.longitude)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            err if err.is_unique_violation_on("stations.name") => {
                DbError::duplicate("station name", &station.name)
            }
            err => err,
        })?;

        Ok(station)
    }

    /// Deletes a station by ID.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM stations WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Station", id));
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

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;

        let station = db.stations().insert("Kyiv", 50.4501, 30.5234).await.unwrap();
        let found = db.stations().get_by_id(&station.id).await.unwrap().unwrap();

        assert_eq!(found.name, "Kyiv");
        assert_eq!(found.latitude, 50.4501);
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let db = test_db().await;

        db.stations().insert("Lviv", 49.84, 24.03).await.unwrap();
        let err = db.stations().insert("Lviv", 49.84, 24.03).await.unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_empty_name_rejected() {
        let db = test_db().await;

        let err = db.stations().insert("  ", 0.0, 0.0).await.unwrap_err();
        assert!(matches!(err, DbError::Core(_)));
    }

    #[tokio::test]
    async fn test_list_filter_and_order() {
        let db = test_db().await;
        let repo = db.stations();

        repo.insert("Kyiv", 50.45, 30.52).await.unwrap();
        repo.insert("Kharkiv", 49.99, 36.23).await.unwrap();
        repo.insert("Odesa", 46.48, 30.72).await.unwrap();

        // Substring filter matches both Kyiv and Kharkiv
        let hits = repo.list(Some("kiv"), 20, 0).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Kharkiv");

        // No filter: everything, ordered by name
        let all = repo.list(None, 20, 0).await.unwrap();
        let names: Vec<_> = all.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Kharkiv", "Kyiv", "Odesa"]);

        assert_eq!(repo.count(None).await.unwrap(), 3);
        assert_eq!(repo.count(Some("yiv")).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = test_db().await;

        let station = db.stations().insert("Dnipro", 48.46, 35.04).await.unwrap();
        db.stations().delete(&station.id).await.unwrap();

        assert!(db.stations().get_by_id(&station.id).await.unwrap().is_none());
        assert!(matches!(
            db.stations().delete(&station.id).await.unwrap_err(),
            DbError::NotFound { .. }
        ));
    }
}
