//! # User Repository
//!
//! Minimal principal directory for movement attribution.
//!
//! Authentication and token issuance live outside this system; the ledger
//! only needs to (a) stamp an acting principal's id onto a movement and
//! (b) resolve that id to a username for the dashboard feed.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use stockbook_core::User;

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

    /// Inserts a new user with a generated id.
    ///
    /// ## Returns
    /// * `Ok(User)` - Inserted user
    /// * `Err(DbError::UniqueViolation)` - Username already exists
    pub async fn insert(&self, username: &str) -> DbResult<User> {
        let user = User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            created_at: Utc::now(),
        };

        debug!(username = %user.username, "Inserting user");

        sqlx::query("INSERT INTO users (id, username, created_at) VALUES (?1, ?2, ?3)")
            .bind(&user.id)
            .bind(&user.username)
            .bind(user.created_at)
            .execute(&self.pool)
            .await?;

        Ok(user)
    }

    /// Gets a user by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<User>> {
        let user =
            sqlx::query_as::<_, User>("SELECT id, username, created_at FROM users WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(user)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let user = db.users().insert("warehouse-admin").await.unwrap();
        let fetched = db.users().get_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(fetched.username, "warehouse-admin");

        assert!(db.users().get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        db.users().insert("cashier").await.unwrap();
        assert!(db.users().insert("cashier").await.is_err());
    }
}
