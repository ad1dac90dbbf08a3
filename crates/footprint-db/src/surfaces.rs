//! Catalog sync: upsert-by-key persistence of surface definitions.
//!
//! The catalog itself is immutable at runtime; this table exists so
//! operators and reporting queries can see what a deployment audits.
//! Syncing twice is a no-op apart from `updated_at`.

use crate::error::{DatabaseError, Result};
use chrono::Utc;
use footprint_catalog::SurfaceCatalog;
use sqlx::{Pool, Sqlite};
use tracing::info;

/// Upsert every catalog surface into the `surfaces` table.
///
/// Returns the number of surfaces synced.
///
/// # Errors
/// Returns `DatabaseError` if a definition cannot be serialized or written.
pub async fn sync_catalog(pool: &Pool<Sqlite>, catalog: &SurfaceCatalog) -> Result<u64> {
    let now = Utc::now().to_rfc3339();
    let mut synced = 0u64;

    for definition in catalog.list() {
        let payload = serde_json::to_string(definition)
            .map_err(|e| DatabaseError::Serialization(e.to_string()))?;

        sqlx::query(
            "INSERT INTO surfaces (key, label, category, base_points, tier, definition, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET
                 label = excluded.label,
                 category = excluded.category,
                 base_points = excluded.base_points,
                 tier = excluded.tier,
                 definition = excluded.definition,
                 updated_at = excluded.updated_at",
        )
        .bind(definition.key.as_str())
        .bind(&definition.label)
        .bind(category_str(definition))
        .bind(i64::from(definition.base_points))
        .bind(tier_str(definition))
        .bind(&payload)
        .bind(&now)
        .execute(pool)
        .await?;

        synced += 1;
    }

    info!(count = synced, "synced surface catalog");
    Ok(synced)
}

/// Number of surface rows currently synced.
///
/// # Errors
/// Returns `DatabaseError` if the query fails.
pub async fn count(pool: &Pool<Sqlite>) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM surfaces")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

fn category_str(definition: &footprint_catalog::SurfaceDefinition) -> String {
    serde_json::to_string(&definition.category)
        .expect("SurfaceCategory serialization never fails")
        .trim_matches('"')
        .to_string()
}

fn tier_str(definition: &footprint_catalog::SurfaceDefinition) -> String {
    serde_json::to_string(&definition.default_tier)
        .expect("RelevanceTier serialization never fails")
        .trim_matches('"')
        .to_string()
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
    async fn test_sync_catalog() {
        let db = setup_test_db().await;
        let catalog = SurfaceCatalog::builtin();

        let synced = sync_catalog(db.pool(), &catalog).await.expect("sync catalog");
        assert_eq!(synced as usize, catalog.len());
        assert_eq!(count(db.pool()).await.expect("count") as usize, catalog.len());
    }

    #[tokio::test]
    async fn test_sync_catalog_idempotent() {
        let db = setup_test_db().await;
        let catalog = SurfaceCatalog::builtin();

        sync_catalog(db.pool(), &catalog).await.expect("first sync");
        sync_catalog(db.pool(), &catalog).await.expect("second sync");

        // Upsert-by-key: row count is stable across repeated syncs
        assert_eq!(count(db.pool()).await.expect("count") as usize, catalog.len());
    }

    #[tokio::test]
    async fn test_synced_rows_carry_points() {
        let db = setup_test_db().await;
        let catalog = SurfaceCatalog::builtin();
        sync_catalog(db.pool(), &catalog).await.expect("sync catalog");

        let points: i64 = sqlx::query_scalar("SELECT base_points FROM surfaces WHERE key = ?")
            .bind("linkedin")
            .fetch_one(db.pool())
            .await
            .expect("query linkedin points");

        assert_eq!(points, 10);
    }
}
