use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use std::str::FromStr;
use std::time::Duration;

use super::types::DatabaseError;

// ============================================================================
// Database
// ============================================================================

/// Handle to the SQLite database whose tables are checked for collisions.
///
/// The schema belongs to the caller; nothing is created or migrated here.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open a connection pool to `path` (`":memory:"` for a private in-memory
    /// database), creating the file if needed.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InstanceLocked` if the database is locked
    /// (SQLITE_BUSY, SQLITE_LOCKED, SQLITE_CANTOPEN).
    /// Returns `DatabaseError::Other` for other database errors.
    pub async fn open(path: &str) -> Result<Self, DatabaseError> {
        let url = format!("sqlite:{}?mode=rwc", path);

        // busy_timeout=5000: wait up to 5 seconds for locks before SQLITE_BUSY.
        // pragma() applies it to every pooled connection.
        let options = SqliteConnectOptions::from_str(&url)
            .map_err(DatabaseError::from_sqlx)?
            .pragma("busy_timeout", "5000");

        // An in-memory database exists per connection, so it must not be
        // spread across a pool.
        let max_connections = if path == ":memory:" { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await
            .map_err(DatabaseError::from_sqlx)?;

        tracing::debug!(path = %path, max_connections, "Opened database");
        Ok(Self { pool })
    }

    /// The underlying pool, for callers that run their own statements.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
