//! Per-surface scan result rows.
//!
//! One row per (scan, surface), inserted at triage time with the surface
//! identity denormalized so later catalog edits never rewrite history.
//! Statuses move forward only: finalization touches rows still in `queued`
//! and nothing else.

use crate::error::{DatabaseError, Result};
use chrono::Utc;
use footprint_catalog::SurfaceDefinition;
use footprint_core::{ScanId, ScanResultStatus};
use serde::{Deserialize, Serialize};
use sqlx::{Pool, Row, Sqlite};

/// A persisted per-surface result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResultRow {
    /// Unique row identifier
    pub id: String,
    /// Parent scan
    pub scan_id: String,
    /// Surface key (snapshot)
    pub surface_key: String,
    /// Surface label (snapshot)
    pub surface_label: String,
    /// Category (snapshot, kebab-case)
    pub category: String,
    /// Base points (snapshot)
    pub base_points: i64,
    /// Default relevance tier (snapshot, kebab-case)
    pub tier: String,
    /// Current status in the 8-value state machine
    pub status: ScanResultStatus,
    /// Classification confidence in [0,1]
    pub confidence: f64,
    /// Structured evidence payload (JSON)
    pub evidence: Option<serde_json::Value>,
    /// When the row was created (RFC3339)
    pub created_at: String,
    /// When the surface was actually checked (RFC3339)
    pub checked_at: Option<String>,
}

/// Insert a result row at triage time with the surface identity snapshot.
///
/// # Errors
/// Returns `DatabaseError` if the insert fails (including a duplicate
/// (scan, surface) pair: exactly one row per surface per scan).
pub async fn insert_result(
    pool: &Pool<Sqlite>,
    scan_id: &ScanId,
    definition: &SurfaceDefinition,
    status: ScanResultStatus,
) -> Result<String> {
    let id = uuid::Uuid::new_v4().to_string();
    let created_at = Utc::now().to_rfc3339();

    let category = serde_json::to_string(&definition.category)
        .expect("SurfaceCategory serialization never fails")
        .trim_matches('"')
        .to_string();
    let tier = serde_json::to_string(&definition.default_tier)
        .expect("RelevanceTier serialization never fails")
        .trim_matches('"')
        .to_string();

    sqlx::query(
        "INSERT INTO scan_results
             (id, scan_id, surface_key, surface_label, category, base_points, tier, status, confidence, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0, ?)",
    )
    .bind(&id)
    .bind(scan_id.as_str())
    .bind(definition.key.as_str())
    .bind(&definition.label)
    .bind(&category)
    .bind(i64::from(definition.base_points))
    .bind(&tier)
    .bind(status.to_string())
    .bind(&created_at)
    .execute(pool)
    .await?;

    Ok(id)
}

/// Finalize a queued row with its probed outcome.
///
/// Forward-only: the update is restricted to rows still in `queued`, so a
/// terminal status can never regress within a scan. Returns `false` when
/// the row was already terminal (logged by the caller, not an error).
///
/// # Errors
/// Returns `DatabaseError` if the update itself fails.
pub async fn finalize_result(
    pool: &Pool<Sqlite>,
    scan_id: &ScanId,
    surface_key: &str,
    status: ScanResultStatus,
    confidence: f64,
    evidence: &serde_json::Value,
) -> Result<bool> {
    let checked_at = Utc::now().to_rfc3339();

    let result = sqlx::query(
        "UPDATE scan_results
         SET status = ?, confidence = ?, evidence = ?, checked_at = ?
         WHERE scan_id = ? AND surface_key = ? AND status = 'queued'",
    )
    .bind(status.to_string())
    .bind(confidence)
    .bind(evidence.to_string())
    .bind(&checked_at)
    .bind(scan_id.as_str())
    .bind(surface_key)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// All result rows for a scan, in insertion order.
///
/// # Errors
/// Returns `DatabaseError` if the query fails or a stored value is invalid.
pub async fn get_by_scan(pool: &Pool<Sqlite>, scan_id: &ScanId) -> Result<Vec<ScanResultRow>> {
    let rows = sqlx::query(
        "SELECT id, scan_id, surface_key, surface_label, category, base_points, tier,
                status, confidence, evidence, created_at, checked_at
         FROM scan_results WHERE scan_id = ? ORDER BY rowid",
    )
    .bind(scan_id.as_str())
    .fetch_all(pool)
    .await?;

    rows.iter().map(row_from_sqlite).collect()
}

/// Count rows for a scan that have not reached a terminal status.
///
/// # Errors
/// Returns `DatabaseError` if the query fails.
pub async fn count_open(pool: &Pool<Sqlite>, scan_id: &ScanId) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM scan_results WHERE scan_id = ? AND status = 'queued'",
    )
    .bind(scan_id.as_str())
    .fetch_one(pool)
    .await?;
    Ok(count)
}

fn row_from_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<ScanResultRow> {
    let status_str: String = row.try_get("status")?;
    let status = status_str
        .parse::<ScanResultStatus>()
        .map_err(|e| DatabaseError::Decode(format!("invalid status in scan_results: {e}")))?;

    let evidence_str: Option<String> = row.try_get("evidence")?;
    let evidence = evidence_str
        .as_deref()
        .map(serde_json::from_str)
        .transpose()
        .map_err(|e| DatabaseError::Decode(format!("invalid evidence JSON: {e}")))?;

    Ok(ScanResultRow {
        id: row.try_get("id")?,
        scan_id: row.try_get("scan_id")?,
        surface_key: row.try_get("surface_key")?,
        surface_label: row.try_get("surface_label")?,
        category: row.try_get("category")?,
        base_points: row.try_get("base_points")?,
        tier: row.try_get("tier")?,
        status,
        confidence: row.try_get("confidence")?,
        evidence,
        created_at: row.try_get("created_at")?,
        checked_at: row.try_get("checked_at")?,
    })
}
