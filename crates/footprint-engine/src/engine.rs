//! The outward-facing audit engine.

use crate::error::{EngineError, Result};
use crate::producer::{DeterministicProfileProducer, ProfileProducer};
use footprint_catalog::SurfaceCatalog;
use footprint_core::{AppConfig, BusinessProfile, ScanId, ScanMode, SurfaceEvidence, SurfaceKey};
use footprint_db::{scan_results, surfaces, Database, DbCredentialProvider};
use footprint_probe::ProberSet;
use footprint_scanner::{EvidencePayload, ScanOrchestrator, SurfaceOutcome};
use footprint_score::{compute_score, FootprintScore};
use std::sync::Arc;
use tracing::{info, warn};

/// Central entry point for running and scoring presence audits.
#[derive(Clone)]
pub struct FootprintEngine {
    catalog: Arc<SurfaceCatalog>,
    db: Database,
    orchestrator: ScanOrchestrator,
    producer: Arc<dyn ProfileProducer>,
}

impl FootprintEngine {
    /// Build an engine with network-backed probes and database-backed
    /// search credentials.
    pub fn new(config: &AppConfig, db: Database) -> Result<Self> {
        let catalog = Arc::new(SurfaceCatalog::builtin());
        let credentials = Arc::new(DbCredentialProvider::new(db.pool().clone()));
        let probers = ProberSet::from_config(&config.scanning, &config.search, credentials)?;

        Ok(Self::with_probers(config, catalog, db, probers))
    }

    /// Build an engine with explicit collaborators (tests, embedders).
    #[must_use]
    pub fn with_probers(
        config: &AppConfig,
        catalog: Arc<SurfaceCatalog>,
        db: Database,
        probers: ProberSet,
    ) -> Self {
        let orchestrator = ScanOrchestrator::new(
            catalog.clone(),
            probers,
            db.clone(),
            config.scanning.clone(),
        );
        let producer = Arc::new(DeterministicProfileProducer::new(catalog.clone()));

        Self {
            catalog,
            db,
            orchestrator,
            producer,
        }
    }

    /// Replace the profile producer (e.g. with an LLM-backed one).
    #[must_use]
    pub fn with_profile_producer(mut self, producer: Arc<dyn ProfileProducer>) -> Self {
        self.producer = producer;
        self
    }

    /// Run migrations and sync the catalog into the database.
    ///
    /// Call once at startup; safe to call again (both steps are
    /// idempotent).
    pub async fn initialize(&self) -> Result<()> {
        self.db.run_migrations().await?;
        let synced = surfaces::sync_catalog(self.db.pool(), &self.catalog).await?;
        info!(surfaces = synced, "engine initialized");
        Ok(())
    }

    /// The catalog this engine audits against.
    #[must_use]
    pub fn catalog(&self) -> &Arc<SurfaceCatalog> {
        &self.catalog
    }

    /// Start a scan in the background and return its id immediately.
    pub async fn run_scan(&self, target: &str, mode: ScanMode) -> Result<ScanId> {
        let profile = self.producer.produce(target)?;
        let scan_id = self.orchestrator.start_scan(target, mode, &profile).await?;
        Ok(scan_id)
    }

    /// Run a scan to completion and return its per-surface outcomes.
    pub async fn execute_scan(
        &self,
        target: &str,
        mode: ScanMode,
    ) -> Result<(ScanId, Vec<SurfaceOutcome>)> {
        let profile = self.producer.produce(target)?;
        let result = self.orchestrator.execute_scan(target, mode, &profile).await?;
        Ok(result)
    }

    /// Request cancellation of a running scan.
    #[must_use]
    pub fn cancel_scan(&self, scan_id: &ScanId) -> bool {
        self.orchestrator.cancel_scan(scan_id)
    }

    /// Recompute the score for a persisted scan.
    ///
    /// Always computed fresh from the stored evidence and the given profile
    /// weights; nothing is cached.
    pub async fn score_scan(
        &self,
        scan_id: &ScanId,
        profile: &BusinessProfile,
    ) -> Result<FootprintScore> {
        let rows = scan_results::get_by_scan(self.db.pool(), scan_id).await?;
        if rows.is_empty() {
            return Err(EngineError::ScanNotFound(scan_id.to_string()));
        }

        let evidence: Vec<SurfaceEvidence> = rows
            .iter()
            .map(|row| {
                // Prefer the rich persisted payload; fall back to the row's
                // own status/confidence for rows that never probed
                if let Some(payload) = &row.evidence {
                    match serde_json::from_value::<EvidencePayload>(payload.clone()) {
                        Ok(payload) => return payload.evidence,
                        Err(e) => {
                            warn!(
                                surface = %row.surface_key,
                                error = %e,
                                "unreadable evidence payload; using row status"
                            );
                        }
                    }
                }
                evidence_from_row(row)
            })
            .collect();

        Ok(compute_score(&self.catalog, profile, &evidence))
    }

    /// Score an in-memory evidence set (no persistence involved).
    #[must_use]
    pub fn score_evidence(
        &self,
        evidence: &[SurfaceEvidence],
        profile: &BusinessProfile,
    ) -> FootprintScore {
        compute_score(&self.catalog, profile, evidence)
    }

    /// The ranked remediation actions for a score, capped at `limit`.
    #[must_use]
    pub fn top_recommendations(&self, score: &FootprintScore, limit: usize) -> Vec<String> {
        let opportunities = footprint_score::top_opportunities(score, &self.catalog, limit);
        footprint_score::recommendations(&opportunities)
    }
}

/// Rebuild minimal evidence from a result row's denormalized fields.
fn evidence_from_row(row: &scan_results::ScanResultRow) -> SurfaceEvidence {
    let surface = SurfaceKey::new(row.surface_key.clone())
        .unwrap_or_else(|_| SurfaceKey::new("unknown-surface").expect("static key is valid"));

    SurfaceEvidence::new(
        surface,
        row.status.to_classified(),
        row.confidence,
        Vec::new(),
        Vec::new(),
        None,
        None,
    )
}
