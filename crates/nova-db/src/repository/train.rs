//! # Train & Train Type Repositories
//!
//! Database operations for the rolling stock reference data.
//!
//! Train capacity is never stored: it is derived from
//! `railcar_num * seats_in_railcar` by [`nova_core::Train::capacity`],
//! so the geometry columns are the single source of truth the placement
//! engine validates seats against.

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use nova_core::{validation, CoreError, Train, TrainType};

// =============================================================================
// Train Types
// =============================================================================

/// Repository for train type database operations.
#[derive(Debug, Clone)]
pub struct TrainTypeRepository {
    pool: SqlitePool,
}

impl TrainTypeRepository {
    /// Creates a new TrainTypeRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TrainTypeRepository { pool }
    }

    /// Lists train types, optionally filtered by a name substring.
    ///
    /// Ordering: by name, ascending.
    pub async fn list(
        &self,
        name: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> DbResult<Vec<TrainType>> {
        let types = sqlx::query_as::<_, TrainType>(
            r#"
            SELECT id, name
            FROM train_types
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

        Ok(types)
    }

    /// Counts train types matching the same filter as [`list`](Self::list).
    pub async fn count(&self, name: Option<&str>) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM train_types WHERE (?1 IS NULL OR name LIKE '%' || ?1 || '%')",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Gets a train type by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<TrainType>> {
        let train_type =
            sqlx::query_as::<_, TrainType>("SELECT id, name FROM train_types WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(train_type)
    }

    /// Creates a new train type.
    pub async fn insert(&self, name: &str) -> DbResult<TrainType> {
        validation::validate_name("name", name).map_err(CoreError::from)?;

        let train_type = TrainType {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
        };

        debug!(id = %train_type.id, name = %train_type.name, "Inserting train type");

        sqlx::query("INSERT INTO train_types (id, name) VALUES (?1, ?2)")
            .bind(&train_type.id)
            .bind(&train_type.name)
            .execute(&self.pool)
            .await
            .map_err(|e| match DbError::from(e) {
                err if err.is_unique_violation_on("train_types.name") => {
                    DbError::duplicate("train type name", &train_type.name)
                }
                err => err,
            })?;

        Ok(train_type)
    }

    /// Deletes a train type by ID.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM train_types WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("TrainType", id));
        }

        Ok(())
    }
}

// =============================================================================
// Trains
// =============================================================================

/// Repository for train database operations.
#[derive(Debug, Clone)]
pub struct TrainRepository {
    pool: SqlitePool,
}

impl TrainRepository {
    /// Creates a new TrainRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TrainRepository { pool }
    }

    /// Lists trains, optionally filtered by a train type name substring.
    ///
    /// Ordering: by train name, ascending.
    pub async fn list(
        &self,
        train_type: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> DbResult<Vec<Train>> {
        debug!(train_type = ?train_type, limit, offset, "Listing trains");

        let trains = sqlx::query_as::<_, Train>(
            r#"
            SELECT t.id, t.name, t.railcar_num, t.seats_in_railcar, t.train_type_id
            FROM trains t
            JOIN train_types tt ON tt.id = t.train_type_id
            WHERE (?1 IS NULL OR tt.name LIKE '%' || ?1 || '%')
            ORDER BY t.name
            LIMIT ?2 OFFSET ?3
            "#,
        )
        .bind(train_type)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(trains)
    }

    /// Counts trains matching the same filter as [`list`](Self::list).
    pub async fn count(&self, train_type: Option<&str>) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM trains t
            JOIN train_types tt ON tt.id = t.train_type_id
            WHERE (?1 IS NULL OR tt.name LIKE '%' || ?1 || '%')
            "#,
        )
        .bind(train_type)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Gets a train by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Train>> {
        let train = sqlx::query_as::<_, Train>(
            r#"
            SELECT id, name, railcar_num, seats_in_railcar, train_type_id
            FROM trains
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(train)
    }

    /// Creates a new train.
    ///
    /// Geometry (railcar count, seats per railcar) is validated >= 1 here;
    /// everything downstream (capacity, seat bounds) relies on it.
    pub async fn insert(
        &self,
        name: &str,
        railcar_num: i64,
        seats_in_railcar: i64,
        train_type_id: &str,
    ) -> DbResult<Train> {
        validation::validate_name("name", name).map_err(CoreError::from)?;
        validation::validate_train_geometry(railcar_num, seats_in_railcar)
            .map_err(CoreError::from)?;

        let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM train_types WHERE id = ?1")
            .bind(train_type_id)
            .fetch_one(&self.pool)
            .await?;
        if exists == 0 {
            return Err(DbError::not_found("TrainType", train_type_id));
        }

        let train = Train {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            railcar_num,
            seats_in_railcar,
            train_type_id: train_type_id.to_string(),
        };

        debug!(id = %train.id, name = %train.name, capacity = train.capacity(), "Inserting train");

        sqlx::query(
            r#"
            INSERT INTO trains (id, name, railcar_num, seats_in_railcar, train_type_id)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&train.id)
        .bind(&train.name)
        .bind(train.railcar_num)
        .bind(train.seats_in_railcar)
        .bind(&train.train_type_id)
        .execute(&self.pool)
        .await?;

        Ok(train)
    }

    /// Deletes a train by ID.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM trains WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Train", id));
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
    async fn test_train_insert_and_capacity() {
        let db = test_db().await;

        let intercity = db.train_types().insert("Intercity").await.unwrap();
        let train = db
            .trains()
            .insert("Hyundai Rotem", 4, 20, &intercity.id)
            .await
            .unwrap();

        assert_eq!(train.capacity(), 80);

        let found = db.trains().get_by_id(&train.id).await.unwrap().unwrap();
        assert_eq!(found.railcar_num, 4);
        assert_eq!(found.seats_in_railcar, 20);
    }

    #[tokio::test]
    async fn test_invalid_geometry_rejected() {
        let db = test_db().await;

        let tt = db.train_types().insert("Night express").await.unwrap();

        assert!(db.trains().insert("Bad", 0, 20, &tt.id).await.is_err());
        assert!(db.trains().insert("Bad", 4, 0, &tt.id).await.is_err());
        assert!(db.trains().insert("Bad", -1, 20, &tt.id).await.is_err());
    }

    #[tokio::test]
    async fn test_filter_by_train_type() {
        let db = test_db().await;

        let intercity = db.train_types().insert("Intercity").await.unwrap();
        let night = db.train_types().insert("Night express").await.unwrap();

        db.trains().insert("IC-01", 6, 40, &intercity.id).await.unwrap();
        db.trains().insert("NX-07", 12, 36, &night.id).await.unwrap();

        let hits = db.trains().list(Some("Night"), 20, 0).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "NX-07");

        assert_eq!(db.trains().count(None).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_type_name_rejected() {
        let db = test_db().await;

        db.train_types().insert("Intercity").await.unwrap();
        let err = db.train_types().insert("Intercity").await.unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }
}
