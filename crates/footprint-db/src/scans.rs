//! Scan row management: one row per audit run.

use crate::error::{DatabaseError, Result};
use chrono::{DateTime, Utc};
use footprint_core::{ScanId, ScanMode, ScanStatus};
use serde::{Deserialize, Serialize};
use sqlx::{Pool, Row, Sqlite};

/// A persisted audit run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scan {
    /// Unique scan identifier
    pub id: String,
    /// Target domain audited
    pub target: String,
    /// Evidence-gathering mode
    pub mode: ScanMode,
    /// Lifecycle status
    pub status: ScanStatus,
    /// When the scan started
    pub started_at: DateTime<Utc>,
    /// When the scan completed or failed
    pub completed_at: Option<DateTime<Utc>>,
    /// Error message when the scan failed
    pub error_message: Option<String>,
    /// JSON summary written at completion
    pub summary: Option<serde_json::Value>,
}

/// Create a new running scan.
///
/// # Errors
/// Returns `DatabaseError` if the insert fails.
pub async fn create_scan(pool: &Pool<Sqlite>, target: &str, mode: ScanMode) -> Result<Scan> {
    let id = ScanId::generate();
    let started_at = Utc::now();
    let status = ScanStatus::Running;

    sqlx::query(
        "INSERT INTO scans (id, target, mode, status, started_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(id.as_str())
    .bind(target)
    .bind(mode.to_string())
    .bind(status.to_string())
    .bind(started_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(Scan {
        id: id.as_str().to_string(),
        target: target.to_string(),
        mode,
        status,
        started_at,
        completed_at: None,
        error_message: None,
        summary: None,
    })
}

/// Mark a scan as completed with its summary.
///
/// # Errors
/// Returns `DatabaseError` if the scan doesn't exist or the update fails.
pub async fn complete_scan(
    pool: &Pool<Sqlite>,
    scan_id: &ScanId,
    summary: &serde_json::Value,
) -> Result<()> {
    let result = sqlx::query(
        "UPDATE scans SET status = ?, completed_at = ?, summary = ? WHERE id = ?",
    )
    .bind(ScanStatus::Completed.to_string())
    .bind(Utc::now().to_rfc3339())
    .bind(summary.to_string())
    .bind(scan_id.as_str())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFoundWithMessage(format!(
            "scan '{scan_id}' not found"
        )));
    }

    Ok(())
}

/// Mark a scan as failed.
///
/// # Errors
/// Returns `DatabaseError` if the scan doesn't exist or the update fails.
pub async fn fail_scan(pool: &Pool<Sqlite>, scan_id: &ScanId, error_message: &str) -> Result<()> {
    let result = sqlx::query(
        "UPDATE scans SET status = ?, completed_at = ?, error_message = ? WHERE id = ?",
    )
    .bind(ScanStatus::Failed.to_string())
    .bind(Utc::now().to_rfc3339())
    .bind(error_message)
    .bind(scan_id.as_str())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFoundWithMessage(format!(
            "scan '{scan_id}' not found"
        )));
    }

    Ok(())
}

/// Fetch a scan by id.
///
/// # Errors
/// Returns `DatabaseError` if the query fails or a stored value is invalid.
pub async fn get_scan(pool: &Pool<Sqlite>, scan_id: &ScanId) -> Result<Option<Scan>> {
    let row = sqlx::query(
        "SELECT id, target, mode, status, started_at, completed_at, error_message, summary
         FROM scans WHERE id = ?",
    )
    .bind(scan_id.as_str())
    .fetch_optional(pool)
    .await?;

    row.map(|r| scan_from_row(&r)).transpose()
}

/// All scans for a target, most recent first.
///
/// # Errors
/// Returns `DatabaseError` if the query fails or a stored value is invalid.
pub async fn get_scans_for_target(pool: &Pool<Sqlite>, target: &str) -> Result<Vec<Scan>> {
    let rows = sqlx::query(
        "SELECT id, target, mode, status, started_at, completed_at, error_message, summary
         FROM scans WHERE target = ? ORDER BY started_at DESC",
    )
    .bind(target)
    .fetch_all(pool)
    .await?;

    rows.iter().map(scan_from_row).collect()
}

fn scan_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Scan> {
    let mode_str: String = row.try_get("mode")?;
    let status_str: String = row.try_get("status")?;
    let started_at_str: String = row.try_get("started_at")?;
    let completed_at_str: Option<String> = row.try_get("completed_at")?;
    let summary_str: Option<String> = row.try_get("summary")?;

    let mode = mode_str
        .parse::<ScanMode>()
        .map_err(|e| DatabaseError::Decode(format!("invalid mode in scans table: {e}")))?;
    let status = status_str
        .parse::<ScanStatus>()
        .map_err(|e| DatabaseError::Decode(format!("invalid status in scans table: {e}")))?;

    let started_at = parse_timestamp(&started_at_str)?;
    let completed_at = completed_at_str.as_deref().map(parse_timestamp).transpose()?;

    let summary = summary_str
        .as_deref()
        .map(serde_json::from_str)
        .transpose()
        .map_err(|e| DatabaseError::Decode(format!("invalid summary JSON: {e}")))?;

    Ok(Scan {
        id: row.try_get("id")?,
        target: row.try_get("target")?,
        mode,
        status,
        started_at,
        completed_at,
        error_message: row.try_get("error_message")?,
        summary,
    })
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DatabaseError::Decode(format!("invalid timestamp '{s}': {e}")))
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
    async fn test_create_scan() {
        let db = setup_test_db().await;

        let scan = create_scan(db.pool(), "example.com", ScanMode::CrawlOnly)
            .await
            .expect("create scan");

        assert_eq!(scan.target, "example.com");
        assert_eq!(scan.status, ScanStatus::Running);
        assert!(scan.completed_at.is_none());
    }

    #[tokio::test]
    async fn test_complete_scan_with_summary() {
        let db = setup_test_db().await;

        let scan = create_scan(db.pool(), "example.com", ScanMode::CrawlOnly)
            .await
            .expect("create scan");
        let scan_id = ScanId::new(scan.id.clone()).expect("valid scan id");

        let summary = serde_json::json!({"total_surfaces": 17, "present": 4});
        complete_scan(db.pool(), &scan_id, &summary)
            .await
            .expect("complete scan");

        let stored = get_scan(db.pool(), &scan_id)
            .await
            .expect("get scan")
            .expect("scan exists");

        assert_eq!(stored.status, ScanStatus::Completed);
        assert!(stored.completed_at.is_some());
        assert_eq!(stored.summary.expect("summary")["present"], 4);
    }

    #[tokio::test]
    async fn test_fail_scan() {
        let db = setup_test_db().await;

        let scan = create_scan(db.pool(), "example.com", ScanMode::CrawlPlusProvider)
            .await
            .expect("create scan");
        let scan_id = ScanId::new(scan.id).expect("valid scan id");

        fail_scan(db.pool(), &scan_id, "catalog load failed")
            .await
            .expect("fail scan");

        let stored = get_scan(db.pool(), &scan_id)
            .await
            .expect("get scan")
            .expect("scan exists");

        assert_eq!(stored.status, ScanStatus::Failed);
        assert_eq!(stored.error_message.as_deref(), Some("catalog load failed"));
    }

    #[tokio::test]
    async fn test_complete_missing_scan() {
        let db = setup_test_db().await;
        let missing = ScanId::generate();

        let result = complete_scan(db.pool(), &missing, &serde_json::json!({})).await;
        assert!(matches!(
            result,
            Err(DatabaseError::NotFoundWithMessage(_))
        ));
    }

    #[tokio::test]
    async fn test_scans_for_target_ordered() {
        let db = setup_test_db().await;

        create_scan(db.pool(), "example.com", ScanMode::CrawlOnly)
            .await
            .expect("create scan 1");
        create_scan(db.pool(), "example.com", ScanMode::CrawlOnly)
            .await
            .expect("create scan 2");
        create_scan(db.pool(), "other.com", ScanMode::CrawlOnly)
            .await
            .expect("create scan 3");

        let scans = get_scans_for_target(db.pool(), "example.com")
            .await
            .expect("get scans");
        assert_eq!(scans.len(), 2);
    }
}
