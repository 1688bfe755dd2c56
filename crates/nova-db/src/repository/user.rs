//! # User Repository
//!
//! Database operations for accounts.
//!
//! Password hashing happens in the API layer (Argon2); this repository
//! only ever sees and stores the hash string.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use nova_core::{validation, CoreError, User};

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Gets a user by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, first_name, last_name, is_staff, created_at
            FROM users
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets a user by email (login lookup).
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, first_name, last_name, is_staff, created_at
            FROM users
            WHERE email = ?1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Creates a new user with an already-hashed password.
    ///
    /// The UNIQUE index on `email` turns duplicate registrations into
    /// `DbError::UniqueViolation`.
    pub async fn insert(
        &self,
        email: &str,
        password_hash: &str,
        first_name: &str,
        last_name: &str,
        is_staff: bool,
    ) -> DbResult<User> {
        validation::validate_email(email).map_err(CoreError::from)?;

        let user = User {
            id: Uuid::new_v4().to_string(),
            email: email.trim().to_string(),
            password_hash: password_hash.to_string(),
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            is_staff,
            created_at: Utc::now(),
        };

        debug!(id = %user.id, email = %user.email, "Inserting user");

        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, first_name, last_name, is_staff, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.is_staff)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            err if err.is_unique_violation_on("users.email") => {
                DbError::duplicate("email", &user.email)
            }
            err => err,
        })?;

        Ok(user)
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
    async fn test_insert_and_lookup() {
        let db = test_db().await;

        let user = db
            .users()
            .insert("rider@example.com", "argon2-hash", "Nadia", "Koval", false)
            .await
            .unwrap();

        let by_email = db
            .users()
            .get_by_email("rider@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, user.id);
        assert!(!by_email.is_staff);

        let by_id = db.users().get_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "rider@example.com");
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let db = test_db().await;

        db.users()
            .insert("rider@example.com", "h1", "", "", false)
            .await
            .unwrap();
        let err = db
            .users()
            .insert("rider@example.com", "h2", "", "", false)
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_malformed_email_rejected() {
        let db = test_db().await;

        assert!(db.users().insert("not-an-email", "h", "", "", false).await.is_err());
    }
}
