//! # Crew Repository
//!
//! Database operations for crew members.

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use nova_core::{validation, CoreError, Crew};

/// Repository for crew database operations.
#[derive(Debug, Clone)]
pub struct CrewRepository {
    pool: SqlitePool,
}

impl CrewRepository {
    /// Creates a new CrewRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CrewRepository { pool }
    }

    /// Lists crew members, optionally filtered by first and/or last name
    /// substrings (case-insensitive).
    ///
    /// Ordering: by last name, then first name.
    pub async fn list(
        &self,
        first_name: Option<&str>,
        last_name: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> DbResult<Vec<Crew>> {
        debug!(first_name = ?first_name, last_name = ?last_name, limit, offset, "Listing crew");

        let crew = sqlx::query_as::<_, Crew>(
            r#"
            SELECT id, first_name, last_name
            FROM crew_members
            WHERE (?1 IS NULL OR first_name LIKE '%' || ?1 || '%')
              AND (?2 IS NULL OR last_name LIKE '%' || ?2 || '%')
            ORDER BY last_name, first_name
            LIMIT ?3 OFFSET ?4
            "#,
        )
        .bind(first_name)
        .bind(last_name)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(crew)
    }

    /// Counts crew members matching the same filter as [`list`](Self::list).
    pub async fn count(&self, first_name: Option<&str>, last_name: Option<&str>) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM crew_members
            WHERE (?1 IS NULL OR first_name LIKE '%' || ?1 || '%')
              AND (?2 IS NULL OR last_name LIKE '%' || ?2 || '%')
            "#,
        )
        .bind(first_name)
        .bind(last_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Gets a crew member by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Crew>> {
        let crew = sqlx::query_as::<_, Crew>(
            "SELECT id, first_name, last_name FROM crew_members WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(crew)
    }

    /// Creates a new crew member.
    pub async fn insert(&self, first_name: &str, last_name: &str) -> DbResult<Crew> {
        validation::validate_name("first_name", first_name).map_err(CoreError::from)?;
        validation::validate_name("last_name", last_name).map_err(CoreError::from)?;

        let crew = Crew {
            id: Uuid::new_v4().to_string(),
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
        };

        debug!(id = %crew.id, name = %crew.full_name(), "Inserting crew member");

        sqlx::query("INSERT INTO crew_members (id, first_name, last_name) VALUES (?1, ?2, ?3)")
            .bind(&crew.id)
            .bind(&crew.first_name)
            .bind(&crew.last_name)
            .execute(&self.pool)
            .await?;

        Ok(crew)
    }

    /// Deletes a crew member by ID.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM crew_members WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Crew", id));
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

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_filters() {
        let db = test_db().await;
        let repo = db.crews();

        repo.insert("Olena", "Shevchenko").await.unwrap();
        repo.insert("Taras", "Shevchenko").await.unwrap();
        repo.insert("Ivan", "Franko").await.unwrap();

        let hits = repo.list(None, Some("Shev"), 20, 0).await.unwrap();
        assert_eq!(hits.len(), 2);
        // last name ties break on first name
        assert_eq!(hits[0].first_name, "Olena");

        let hits = repo.list(Some("Ivan"), None, 20, 0).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].full_name(), "Ivan Franko");

        let hits = repo.list(Some("Taras"), Some("Franko"), 20, 0).await.unwrap();
        assert!(hits.is_empty());

        assert_eq!(repo.count(None, Some("Shev")).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_blank_names_rejected() {
        let db = test_db().await;

        assert!(db.crews().insert("", "Shevchenko").await.is_err());
        assert!(db.crews().insert("Olena", "   ").await.is_err());
    }
}
