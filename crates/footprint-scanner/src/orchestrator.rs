//! Scan orchestrator for coordinating surface probes.
//!
//! This module provides the `ScanOrchestrator` which manages the execution
//! of a scan across the surface catalog: static triage, batched probing,
//! evidence classification, result persistence and the run summary.

use crate::classifier;
use crate::error::{Result, ScanError};
use crate::query_builder;
use footprint_catalog::{DetectionMethod, SurfaceCatalog, SurfaceDefinition};
use footprint_core::{
    BusinessProfile, ProbeKind, ScanId, ScanMode, ScanResultStatus, ScanningConfig,
    SurfaceEvidence,
};
use footprint_db::{scan_results, scans, Database};
use footprint_probe::{ProbeErrorCode, ProbeEvidence, ProbeFailure, ProberSet};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Grace added on top of a probe's own timeout before the orchestrator
/// cancels it and records an error.
const PROBE_GRACE_SECS: u64 = 5;

/// Result of handling a single surface within a scan.
#[derive(Debug, Clone)]
pub struct SurfaceOutcome {
    /// Surface key
    pub surface_key: String,
    /// Terminal status the surface reached
    pub status: ScanResultStatus,
    /// Classification confidence
    pub confidence: f64,
    /// Error message, if the surface failed
    pub error: Option<String>,
}

/// The structured evidence payload persisted per result row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidencePayload {
    /// Classified evidence
    pub evidence: SurfaceEvidence,
    /// The raw probe envelope, when a probe actually ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probe: Option<ProbeEvidence>,
}

/// A scan that has been created and triaged but not yet probed.
struct PreparedScan {
    scan_id: ScanId,
    domain: String,
    token: CancellationToken,
    outcomes: Vec<SurfaceOutcome>,
    queued: Vec<SurfaceDefinition>,
}

/// Orchestrates scanning operations across the surface catalog.
#[derive(Clone)]
pub struct ScanOrchestrator {
    /// Immutable surface catalog
    catalog: Arc<SurfaceCatalog>,
    /// Probe executors
    probers: ProberSet,
    /// Database for storing results
    db: Database,
    /// Scanning configuration (batch size, pauses, timeouts)
    config: ScanningConfig,
    /// Cancellation tokens for running scans
    tokens: Arc<Mutex<HashMap<String, CancellationToken>>>,
}

impl ScanOrchestrator {
    /// Create a new scan orchestrator.
    #[must_use]
    pub fn new(
        catalog: Arc<SurfaceCatalog>,
        probers: ProberSet,
        db: Database,
        config: ScanningConfig,
    ) -> Self {
        Self {
            catalog,
            probers,
            db,
            config,
            tokens: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Start a scan in the background and return its id immediately.
    ///
    /// The scan row and all triaged result rows exist before this returns,
    /// so the id can be polled right away.
    pub async fn start_scan(
        &self,
        target: &str,
        mode: ScanMode,
        profile: &BusinessProfile,
    ) -> Result<ScanId> {
        let prepared = self.prepare_scan(target, mode, profile).await?;
        let scan_id = prepared.scan_id.clone();

        let orchestrator = self.clone();
        let profile = profile.clone();
        tokio::spawn(async move {
            let id = prepared.scan_id.clone();
            if let Err(e) = orchestrator.run_prepared(prepared, &profile).await {
                error!(scan_id = %id, error = %e, "scan run failed");
            }
        });

        Ok(scan_id)
    }

    /// Run a scan to completion and return every surface outcome.
    pub async fn execute_scan(
        &self,
        target: &str,
        mode: ScanMode,
        profile: &BusinessProfile,
    ) -> Result<(ScanId, Vec<SurfaceOutcome>)> {
        let prepared = self.prepare_scan(target, mode, profile).await?;
        let scan_id = prepared.scan_id.clone();
        let outcomes = self.run_prepared(prepared, profile).await?;
        Ok((scan_id, outcomes))
    }

    /// Request cancellation of a running scan.
    ///
    /// Stops new batches from being issued; in-flight probes complete and
    /// are recorded. Returns `false` when the scan is not running.
    #[must_use]
    pub fn cancel_scan(&self, scan_id: &ScanId) -> bool {
        let tokens = self.tokens.lock().expect("acquire token registry lock");
        if let Some(token) = tokens.get(scan_id.as_str()) {
            token.cancel();
            info!(scan_id = %scan_id, "scan cancellation requested");
            true
        } else {
            false
        }
    }

    /// Create the scan row and triage every surface before any network call.
    async fn prepare_scan(
        &self,
        target: &str,
        mode: ScanMode,
        profile: &BusinessProfile,
    ) -> Result<PreparedScan> {
        profile.validate()?;

        if self.catalog.is_empty() {
            return Err(ScanError::InvalidTarget(
                "surface catalog is empty".to_string(),
            ));
        }

        let domain = normalize_domain(target);
        if domain.is_empty() {
            return Err(ScanError::InvalidTarget(format!(
                "'{target}' is not a usable scan target"
            )));
        }
        let domain_usable = is_probeable_domain(&domain);

        let search_configured = self.probers.search.is_configured().await;

        let scan = scans::create_scan(self.db.pool(), &domain, mode).await?;
        let scan_id = ScanId::new(scan.id)?;

        let mut outcomes = Vec::new();
        let mut queued = Vec::new();

        for definition in self.catalog.list() {
            let initial = triage(definition, mode, domain_usable, search_configured);

            scan_results::insert_result(self.db.pool(), &scan_id, definition, initial).await?;

            if initial == ScanResultStatus::Queued {
                queued.push(definition.clone());
            } else {
                debug!(
                    scan_id = %scan_id,
                    surface = %definition.key,
                    status = %initial,
                    "surface triaged without probing"
                );
                outcomes.push(SurfaceOutcome {
                    surface_key: definition.key.as_str().to_string(),
                    status: initial,
                    confidence: 0.0,
                    error: None,
                });
            }
        }

        let token = CancellationToken::new();
        self.tokens
            .lock()
            .expect("acquire token registry lock")
            .insert(scan_id.as_str().to_string(), token.clone());

        info!(
            scan_id = %scan_id,
            target = %domain,
            queued = queued.len(),
            triaged = outcomes.len(),
            "scan prepared"
        );

        Ok(PreparedScan {
            scan_id,
            domain,
            token,
            outcomes,
            queued,
        })
    }

    /// Probe the queued surfaces in batches and finish the scan.
    async fn run_prepared(
        &self,
        prepared: PreparedScan,
        profile: &BusinessProfile,
    ) -> Result<Vec<SurfaceOutcome>> {
        let PreparedScan {
            scan_id,
            domain,
            token,
            mut outcomes,
            queued,
        } = prepared;

        let run = self
            .probe_queued(&scan_id, &domain, profile, &token, queued, &mut outcomes)
            .await;

        // The token registry entry dies with the run, success or not
        self.tokens
            .lock()
            .expect("acquire token registry lock")
            .remove(scan_id.as_str());

        match run {
            Ok(cancelled) => {
                let summary = build_summary(&outcomes);
                if cancelled {
                    scans::fail_scan(self.db.pool(), &scan_id, "scan cancelled").await?;
                    info!(scan_id = %scan_id, "scan cancelled");
                } else {
                    scans::complete_scan(self.db.pool(), &scan_id, &summary).await?;
                    info!(scan_id = %scan_id, summary = %summary, "scan completed");
                }
                Ok(outcomes)
            }
            Err(e) => {
                // Persistence failures abort the scan as a whole
                let _ = scans::fail_scan(self.db.pool(), &scan_id, &e.to_string()).await;
                Err(e)
            }
        }
    }

    /// Probe surfaces in batches. Returns whether the scan was cancelled.
    async fn probe_queued(
        &self,
        scan_id: &ScanId,
        domain: &str,
        profile: &BusinessProfile,
        token: &CancellationToken,
        queued: Vec<SurfaceDefinition>,
        outcomes: &mut Vec<SurfaceOutcome>,
    ) -> Result<bool> {
        let batch_size = self.config.batch_size.max(1);
        let batches: Vec<_> = queued.chunks(batch_size).collect();
        let batch_count = batches.len();
        let mut cancelled = false;
        let mut remaining: Vec<SurfaceDefinition> = Vec::new();

        for (index, batch) in batches.into_iter().enumerate() {
            if token.is_cancelled() {
                cancelled = true;
                remaining.extend(batch.iter().cloned());
                continue;
            }

            debug!(
                scan_id = %scan_id,
                batch = index + 1,
                batches = batch_count,
                size = batch.len(),
                "probing batch"
            );

            // Concurrent within the batch; one failure never blocks siblings
            let evidences = futures::future::join_all(
                batch
                    .iter()
                    .map(|definition| self.probe_surface(definition, domain, profile)),
            )
            .await;

            for (definition, (evidence, probe)) in batch.iter().zip(evidences) {
                outcomes.push(
                    self.record_outcome(scan_id, definition, evidence, probe)
                        .await?,
                );
            }

            // Courtesy pause between batches, not after the last one
            if index + 1 < batch_count && !token.is_cancelled() {
                tokio::time::sleep(Duration::from_millis(self.config.batch_pause_ms)).await;
            }
        }

        // Surfaces the cancellation left unprobed still need a terminal status
        for definition in remaining {
            let evidence = SurfaceEvidence::new(
                definition.key.clone(),
                footprint_core::SurfaceStatus::Error,
                0.0,
                Vec::new(),
                Vec::new(),
                None,
                Some("scan cancelled before probing".to_string()),
            );
            outcomes.push(
                self.record_outcome(scan_id, &definition, evidence, None)
                    .await?,
            );
        }

        Ok(cancelled)
    }

    /// Probe one surface and classify the result.
    async fn probe_surface(
        &self,
        definition: &SurfaceDefinition,
        domain: &str,
        profile: &BusinessProfile,
    ) -> (SurfaceEvidence, Option<ProbeEvidence>) {
        let (target, kind, queries, budget) = match &definition.detection {
            DetectionMethod::HttpCrawl { path } => (
                format!("https://{domain}{path}"),
                ProbeKind::Http,
                Vec::new(),
                self.config.http_timeout_secs,
            ),
            DetectionMethod::DnsRecord { prefix, .. } => {
                let name = if prefix.is_empty() {
                    domain.to_string()
                } else {
                    format!("{prefix}.{domain}")
                };
                (name, ProbeKind::Dns, Vec::new(), self.config.dns_timeout_secs)
            }
            DetectionMethod::SearchResults { .. } | DetectionMethod::Provider { .. } => {
                let queries = query_builder::build_queries(
                    definition,
                    profile,
                    domain,
                    self.config.max_queries_per_surface,
                );
                if queries.is_empty() {
                    // Nothing to ask: could-not-look, not absent
                    let evidence = SurfaceEvidence::unknown(
                        definition.key.clone(),
                        "no query templates produced a usable query",
                    );
                    return (evidence, None);
                }
                let budget = self.config.search_timeout_secs
                    * u64::try_from(queries.len()).unwrap_or(1).max(1);
                ("search-api".to_string(), ProbeKind::Search, queries, budget)
            }
            DetectionMethod::Manual { .. } => {
                // Triage never queues manual surfaces; defensive fallback
                let evidence = SurfaceEvidence::unknown(
                    definition.key.clone(),
                    "manual surface cannot be probed",
                );
                return (evidence, None);
            }
        };

        let probe_future = async {
            match kind {
                ProbeKind::Http => self.probers.http.fetch(&target).await,
                ProbeKind::Dns => {
                    let DetectionMethod::DnsRecord { prefix, marker } = &definition.detection
                    else {
                        unreachable!("kind is Dns only for DnsRecord detection")
                    };
                    self.probers.dns.lookup_txt(domain, prefix, marker).await
                }
                ProbeKind::Search => self.probers.search.search(&queries).await,
            }
        };

        let deadline = Duration::from_secs(budget + PROBE_GRACE_SECS);
        let probe = match tokio::time::timeout(deadline, probe_future).await {
            Ok(probe) => probe,
            Err(_) => {
                // A hung probe is cancelled and recorded, never silently dropped
                warn!(surface = %definition.key, "probe exceeded its budget");
                ProbeEvidence::failed(
                    target,
                    kind,
                    queries,
                    ProbeFailure::new(
                        ProbeErrorCode::Timeout,
                        format!("probe exceeded {deadline:?} budget"),
                    ),
                )
            }
        };

        let evidence = classifier::classify(definition, &probe, profile, domain);
        (evidence, Some(probe))
    }

    /// Persist one surface outcome, honoring forward-only transitions.
    async fn record_outcome(
        &self,
        scan_id: &ScanId,
        definition: &SurfaceDefinition,
        evidence: SurfaceEvidence,
        probe: Option<ProbeEvidence>,
    ) -> Result<SurfaceOutcome> {
        let status = ScanResultStatus::from_classified(evidence.status);
        let confidence = evidence.confidence;
        let error = evidence.error.clone();

        let payload = EvidencePayload { evidence, probe };
        let payload = serde_json::to_value(&payload)?;

        let updated = scan_results::finalize_result(
            self.db.pool(),
            scan_id,
            definition.key.as_str(),
            status,
            confidence,
            &payload,
        )
        .await?;

        if !updated {
            warn!(
                scan_id = %scan_id,
                surface = %definition.key,
                "surface already terminal; refusing to regress"
            );
        }

        Ok(SurfaceOutcome {
            surface_key: definition.key.as_str().to_string(),
            status,
            confidence,
            error,
        })
    }
}

/// Decide a surface's starting state before any network call.
fn triage(
    definition: &SurfaceDefinition,
    mode: ScanMode,
    domain_usable: bool,
    search_configured: bool,
) -> ScanResultStatus {
    match &definition.detection {
        DetectionMethod::Manual { .. } => ScanResultStatus::ManualRequired,
        DetectionMethod::Provider { .. } => {
            if mode == ScanMode::CrawlOnly || !search_configured {
                ScanResultStatus::RequiresProvider
            } else {
                ScanResultStatus::Queued
            }
        }
        DetectionMethod::SearchResults { .. } => {
            if search_configured {
                ScanResultStatus::Queued
            } else {
                // "Could not verify" must never reach the classifier
                // dressed up as a probe result
                ScanResultStatus::RequiresProvider
            }
        }
        DetectionMethod::HttpCrawl { .. } | DetectionMethod::DnsRecord { .. } => {
            if domain_usable {
                ScanResultStatus::Queued
            } else {
                ScanResultStatus::NeedsEntityInput
            }
        }
    }
}

/// Normalize a scan target to a bare domain.
fn normalize_domain(target: &str) -> String {
    target
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_start_matches("www.")
        .split('/')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase()
}

/// Whether a normalized domain can be probed directly.
fn is_probeable_domain(domain: &str) -> bool {
    domain.contains('.')
        && !domain.contains(' ')
        && domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
}

/// Build the JSON run summary from the surface outcomes.
fn build_summary(outcomes: &[SurfaceOutcome]) -> serde_json::Value {
    let count = |status: ScanResultStatus| {
        outcomes.iter().filter(|o| o.status == status).count()
    };

    let present = count(ScanResultStatus::PresentConfirmed);
    let partial = count(ScanResultStatus::PresentPartial);
    let absent = count(ScanResultStatus::Absent);
    let total = outcomes.len();

    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let percentage = if total == 0 {
        0u32
    } else {
        ((present as f64 + 0.5 * partial as f64) / total as f64 * 100.0).round() as u32
    };

    serde_json::json!({
        "total_surfaces": total,
        "present": present,
        "partial": partial,
        "absent": absent,
        "error": count(ScanResultStatus::Error),
        "manual_required": count(ScanResultStatus::ManualRequired),
        "requires_provider": count(ScanResultStatus::RequiresProvider),
        "needs_entity_input": count(ScanResultStatus::NeedsEntityInput),
        "percentage": percentage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use footprint_catalog::{Guidance, RelevanceTier, SurfaceCategory};
    use footprint_core::SurfaceKey;

    fn definition(detection: DetectionMethod) -> SurfaceDefinition {
        SurfaceDefinition {
            key: SurfaceKey::new("test-surface").expect("valid key"),
            label: "Test".to_string(),
            category: SurfaceCategory::Search,
            base_points: 4,
            default_tier: RelevanceTier::Medium,
            detection,
            platform_hints: vec![],
            guidance: Guidance {
                present: "ok".to_string(),
                absent: "missing".to_string(),
            },
        }
    }

    #[test]
    fn test_triage_manual() {
        let def = definition(DetectionMethod::Manual {
            instructions: "check by hand".to_string(),
        });
        assert_eq!(
            triage(&def, ScanMode::CrawlPlusProvider, true, true),
            ScanResultStatus::ManualRequired
        );
    }

    #[test]
    fn test_triage_provider_gated_by_mode() {
        let def = definition(DetectionMethod::Provider {
            provider: "places".to_string(),
            templates: vec!["{brand}".to_string()],
        });
        assert_eq!(
            triage(&def, ScanMode::CrawlOnly, true, true),
            ScanResultStatus::RequiresProvider
        );
        assert_eq!(
            triage(&def, ScanMode::CrawlPlusProvider, true, true),
            ScanResultStatus::Queued
        );
    }

    #[test]
    fn test_triage_search_without_credentials() {
        let def = definition(DetectionMethod::SearchResults {
            templates: vec!["{brand}".to_string()],
        });
        assert_eq!(
            triage(&def, ScanMode::CrawlOnly, true, false),
            ScanResultStatus::RequiresProvider
        );
        assert_eq!(
            triage(&def, ScanMode::CrawlOnly, true, true),
            ScanResultStatus::Queued
        );
    }

    #[test]
    fn test_triage_direct_surfaces_need_domain() {
        let def = definition(DetectionMethod::HttpCrawl {
            path: "/".to_string(),
        });
        assert_eq!(
            triage(&def, ScanMode::CrawlOnly, false, true),
            ScanResultStatus::NeedsEntityInput
        );
        assert_eq!(
            triage(&def, ScanMode::CrawlOnly, true, true),
            ScanResultStatus::Queued
        );
    }

    #[test]
    fn test_normalize_domain() {
        assert_eq!(normalize_domain("https://www.Example.com/path"), "example.com");
        assert_eq!(normalize_domain("example.com"), "example.com");
        assert_eq!(normalize_domain("  http://example.com  "), "example.com");
    }

    #[test]
    fn test_probeable_domain() {
        assert!(is_probeable_domain("example.com"));
        assert!(is_probeable_domain("sub.example-shop.co.uk"));
        assert!(!is_probeable_domain("localhost"));
        assert!(!is_probeable_domain("not a domain"));
        assert!(!is_probeable_domain("exa_mple.com"));
    }

    #[test]
    fn test_summary_counts_and_percentage() {
        let outcome = |status| SurfaceOutcome {
            surface_key: "s".to_string(),
            status,
            confidence: 0.0,
            error: None,
        };

        let outcomes = vec![
            outcome(ScanResultStatus::PresentConfirmed),
            outcome(ScanResultStatus::PresentPartial),
            outcome(ScanResultStatus::Absent),
            outcome(ScanResultStatus::Error),
        ];

        let summary = build_summary(&outcomes);
        assert_eq!(summary["total_surfaces"], 4);
        assert_eq!(summary["present"], 1);
        assert_eq!(summary["partial"], 1);
        // (1 + 0.5) / 4 = 37.5 -> 38
        assert_eq!(summary["percentage"], 38);
    }

    #[test]
    fn test_summary_empty() {
        let summary = build_summary(&[]);
        assert_eq!(summary["total_surfaces"], 0);
        assert_eq!(summary["percentage"], 0);
    }
}
