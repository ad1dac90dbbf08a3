//! Search-API credential storage and the database-backed credential provider.
//!
//! Absence of credentials is a reportable "unconfigured" condition, never an
//! error and never a silent empty result.

use crate::error::Result;
use async_trait::async_trait;
use chrono::Utc;
use footprint_probe::{CredentialProvider, ProbeError, SearchCredentials};
use sqlx::{Pool, Row, Sqlite};
use tracing::debug;

/// Store (or replace) credentials for a provider.
///
/// # Errors
/// Returns `DatabaseError` if the upsert fails.
pub async fn set_search_credentials(
    pool: &Pool<Sqlite>,
    provider: &str,
    api_key: &str,
) -> Result<()> {
    let id = uuid::Uuid::new_v4().to_string();
    let updated_at = Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO search_credentials (id, provider, api_key, active, updated_at)
         VALUES (?, ?, ?, 1, ?)
         ON CONFLICT(provider) DO UPDATE SET
             api_key = excluded.api_key,
             active = 1,
             updated_at = excluded.updated_at",
    )
    .bind(&id)
    .bind(provider)
    .bind(api_key)
    .bind(&updated_at)
    .execute(pool)
    .await?;

    debug!(provider, "stored search credentials");
    Ok(())
}

/// Deactivate a provider's credentials without deleting them.
///
/// # Errors
/// Returns `DatabaseError` if the update fails.
pub async fn deactivate_search_credentials(pool: &Pool<Sqlite>, provider: &str) -> Result<()> {
    sqlx::query("UPDATE search_credentials SET active = 0 WHERE provider = ?")
        .bind(provider)
        .execute(pool)
        .await?;
    Ok(())
}

/// The active search credentials, if any.
///
/// # Errors
/// Returns `DatabaseError` if the query fails.
pub async fn get_active_search_credentials(
    pool: &Pool<Sqlite>,
) -> Result<Option<SearchCredentials>> {
    let row = sqlx::query(
        "SELECT api_key FROM search_credentials WHERE active = 1 ORDER BY updated_at DESC LIMIT 1",
    )
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| SearchCredentials {
        api_key: r.get("api_key"),
    }))
}

/// Database-backed implementation of the probe crate's credential seam.
#[derive(Debug, Clone)]
pub struct DbCredentialProvider {
    pool: Pool<Sqlite>,
}

impl DbCredentialProvider {
    /// Create a provider reading from the given pool.
    #[must_use]
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialProvider for DbCredentialProvider {
    async fn search_credentials(
        &self,
    ) -> std::result::Result<Option<SearchCredentials>, ProbeError> {
        get_active_search_credentials(&self.pool)
            .await
            .map_err(|e| ProbeError::Credentials(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn setup_test_db() -> Database {
        let db = Database::in_memory().await.expect("create test database");
        db.run_migrations().await.expect("run migrations");
        db
    }

    #[tokio::test]
    async fn test_no_credentials_is_none() {
        let db = setup_test_db().await;
        let credentials = get_active_search_credentials(db.pool())
            .await
            .expect("query credentials");
        assert!(credentials.is_none());
    }

    #[tokio::test]
    async fn test_set_and_get_credentials() {
        let db = setup_test_db().await;

        set_search_credentials(db.pool(), "serper", "key-1")
            .await
            .expect("store credentials");

        let credentials = get_active_search_credentials(db.pool())
            .await
            .expect("query credentials")
            .expect("credentials configured");
        assert_eq!(credentials.api_key, "key-1");

        // Upsert replaces the key for the same provider
        set_search_credentials(db.pool(), "serper", "key-2")
            .await
            .expect("replace credentials");

        let credentials = get_active_search_credentials(db.pool())
            .await
            .expect("query credentials")
            .expect("credentials configured");
        assert_eq!(credentials.api_key, "key-2");
    }

    #[tokio::test]
    async fn test_deactivated_credentials_are_unconfigured() {
        let db = setup_test_db().await;

        set_search_credentials(db.pool(), "serper", "key-1")
            .await
            .expect("store credentials");
        deactivate_search_credentials(db.pool(), "serper")
            .await
            .expect("deactivate credentials");

        let credentials = get_active_search_credentials(db.pool())
            .await
            .expect("query credentials");
        assert!(credentials.is_none());
    }

    #[tokio::test]
    async fn test_db_credential_provider() {
        let db = setup_test_db().await;
        let provider = DbCredentialProvider::new(db.pool().clone());

        assert!(provider
            .search_credentials()
            .await
            .expect("lookup credentials")
            .is_none());

        set_search_credentials(db.pool(), "serper", "key-1")
            .await
            .expect("store credentials");

        let credentials = provider
            .search_credentials()
            .await
            .expect("lookup credentials")
            .expect("configured");
        assert_eq!(credentials.api_key, "key-1");
    }
}
