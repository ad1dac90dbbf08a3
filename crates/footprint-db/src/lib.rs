//! Footprint Database Layer
//!
//! Provides `SQLite` database access for scan history, catalog sync and
//! search credentials. Uses `SQLx` with embedded, versioned migrations.
//!
//! # Architecture
//!
//! - **Migrations**: SQL migrations are embedded and versioned using `SQLx`
//! - **Connection Pooling**: Configurable connection pool with automatic cleanup
//! - **Append-only history**: scans and their result rows are never rewritten,
//!   only superseded by later scans
//! - **Idempotent catalog sync**: surface definitions upsert by key
//!
//! # Example
//!
//! ```ignore
//! use footprint_db::Database;
//!
//! let db = Database::new("footprint.db").await?;
//! db.run_migrations().await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod credentials;
pub mod error;
pub mod migrations;
pub mod scan_results;
pub mod scans;
pub mod surfaces;

// Re-export commonly used types
pub use credentials::DbCredentialProvider;
pub use error::{DatabaseError, Result};
pub use scan_results::ScanResultRow;
pub use scans::Scan;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;

/// High-level database interface with pooling and migrations.
#[derive(Debug, Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Open (or create) a database at the given path.
    ///
    /// # Errors
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            DatabaseError::Open("invalid database path: not valid UTF-8".to_string())
        })?;

        let connect_options = SqliteConnectOptions::from_str(path_str)
            .map_err(|e| DatabaseError::Open(format!("invalid connection string: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await
            .map_err(|e| DatabaseError::Open(format!("failed to initialize pool: {e}")))?;

        tracing::info!("Database pool created at {}", path_str);

        Ok(Self { pool })
    }

    /// Open an in-memory database (tests and ephemeral runs).
    ///
    /// # Errors
    /// Returns `DatabaseError` if the pool cannot be created.
    pub async fn in_memory() -> Result<Self> {
        Self::new(":memory:").await
    }

    /// Run all pending database migrations.
    ///
    /// This should be called after creating a new database instance to
    /// ensure the schema is up to date.
    ///
    /// # Errors
    /// Returns `DatabaseError::Migration` if any migration fails.
    pub async fn run_migrations(&self) -> Result<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// Get the current schema version.
    ///
    /// Returns the number of applied migrations.
    ///
    /// # Errors
    /// Returns `DatabaseError` if the version cannot be queried.
    pub async fn get_schema_version(&self) -> Result<i64> {
        migrations::get_schema_version(&self.pool).await
    }

    /// Get a reference to the underlying connection pool.
    ///
    /// This allows direct access to the `SQLx` pool for custom queries.
    #[must_use]
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Close the database connection gracefully.
    pub async fn close(self) {
        self.pool.close().await;
        tracing::info!("Database pool closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn create_test_database() -> Database {
        let db = Database::in_memory().await.expect("create database");
        db.run_migrations().await.expect("run migrations");
        db
    }

    #[tokio::test]
    async fn test_database_creation() {
        let db = Database::in_memory().await.expect("create database");
        sqlx::query("SELECT 1")
            .execute(db.pool())
            .await
            .expect("database is usable");
    }

    #[tokio::test]
    async fn test_database_migrations() {
        let db = Database::in_memory().await.expect("create database");

        let version_before = db.get_schema_version().await.expect("get version");
        assert_eq!(version_before, 0);

        db.run_migrations().await.expect("run migrations");

        let version_after = db.get_schema_version().await.expect("get version");
        assert_eq!(version_after, 3);
    }

    #[tokio::test]
    async fn test_database_schema() {
        let db = create_test_database().await;

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name != '_sqlx_migrations' ORDER BY name"
        )
        .fetch_all(db.pool())
        .await
        .expect("query tables");

        assert_eq!(
            tables,
            vec!["scan_results", "scans", "search_credentials", "surfaces"]
        );
    }

    #[tokio::test]
    async fn test_database_close() {
        let db = create_test_database().await;
        db.close().await; // Should not panic
    }
}
