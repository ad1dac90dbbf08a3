//! Remediation opportunities.
//!
//! Surfaces with status absent or partial, ranked by relevance tier first
//! and potential point gain second. The tier-first ordering is deliberate
//! policy: fix high-relevance gaps before chasing larger point values in
//! low-relevance surfaces.

use crate::score::FootprintScore;
use footprint_catalog::{RelevanceTier, SurfaceCatalog};
use footprint_core::{SurfaceKey, SurfaceStatus};
use serde::{Deserialize, Serialize};

/// Default cap on the opportunities list.
pub const DEFAULT_OPPORTUNITY_LIMIT: usize = 10;

/// One remediation opportunity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opportunity {
    /// Surface key
    pub key: String,
    /// Surface label
    pub label: String,
    /// Relevance tier the ranking used
    pub tier: RelevanceTier,
    /// The status that made this an opportunity (absent or partial)
    pub status: SurfaceStatus,
    /// Points recoverable by fixing the surface
    pub potential_gain: f64,
    /// The catalog's currently-absent guidance text
    pub guidance: String,
}

/// The highest-value remediation opportunities, capped at `limit`.
///
/// Only absent and partial surfaces qualify; a present surface is never an
/// opportunity. Ordering: tier (high before medium before low), then
/// descending potential gain, then key for a stable total order.
#[must_use]
pub fn top_opportunities(
    score: &FootprintScore,
    catalog: &SurfaceCatalog,
    limit: usize,
) -> Vec<Opportunity> {
    let mut opportunities: Vec<Opportunity> = score
        .surfaces
        .iter()
        .filter(|s| matches!(s.status, SurfaceStatus::Absent | SurfaceStatus::Partial))
        .map(|s| {
            let guidance = SurfaceKey::new(s.key.clone())
                .ok()
                .and_then(|key| catalog.get(&key).ok())
                .map_or_else(String::new, |d| d.guidance.absent.clone());
            Opportunity {
                key: s.key.clone(),
                label: s.label.clone(),
                tier: s.tier,
                status: s.status,
                potential_gain: s.potential_gain,
                guidance,
            }
        })
        .collect();

    opportunities.sort_by(|a, b| {
        a.tier
            .cmp(&b.tier)
            .then_with(|| {
                b.potential_gain
                    .partial_cmp(&a.potential_gain)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| a.key.cmp(&b.key))
    });

    opportunities.truncate(limit);
    opportunities
}

/// Render opportunities as ordered action strings for callers that only
/// want text.
#[must_use]
pub fn recommendations(opportunities: &[Opportunity]) -> Vec<String> {
    opportunities
        .iter()
        .map(|o| {
            if o.guidance.is_empty() {
                o.label.clone()
            } else {
                format!("{}: {}", o.label, o.guidance)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::compute_score;
    use footprint_core::{BusinessProfile, SurfaceEvidence};

    fn key(s: &str) -> SurfaceKey {
        SurfaceKey::new(s).expect("valid surface key")
    }

    fn evidence(surface: &str, status: SurfaceStatus) -> SurfaceEvidence {
        SurfaceEvidence::new(
            key(surface),
            status,
            0.7,
            Vec::new(),
            Vec::new(),
            None,
            None,
        )
    }

    fn scored(evidence: &[SurfaceEvidence]) -> (FootprintScore, SurfaceCatalog) {
        let catalog = SurfaceCatalog::builtin();
        let profile = BusinessProfile::new("Acme Corp");
        let score = compute_score(&catalog, &profile, evidence);
        (score, catalog)
    }

    #[test]
    fn test_present_surfaces_never_opportunities() {
        let (score, catalog) = scored(&[
            evidence("linkedin", SurfaceStatus::Present),
            evidence("facebook", SurfaceStatus::Absent),
        ]);

        let opportunities = top_opportunities(&score, &catalog, 50);
        assert!(opportunities.iter().all(|o| o.key != "linkedin"));
        assert!(opportunities.iter().any(|o| o.key == "facebook"));
    }

    #[test]
    fn test_unknown_and_error_not_opportunities() {
        let (score, catalog) = scored(&[
            evidence("facebook", SurfaceStatus::Error),
            evidence("instagram", SurfaceStatus::Unknown),
        ]);

        // Everything is unknown or error: nothing qualifies
        let opportunities = top_opportunities(&score, &catalog, 50);
        assert!(opportunities.is_empty());
    }

    #[test]
    fn test_tier_outranks_gain() {
        // website (high tier) absent with a big gain, dns-bimi (low tier)
        // absent: high tier must come first regardless of gain, and within
        // the comparison a low-tier surface with more points must not win
        let (score, catalog) = scored(&[
            evidence("dns-bimi", SurfaceStatus::Absent),
            evidence("website", SurfaceStatus::Absent),
        ]);

        let opportunities = top_opportunities(&score, &catalog, 50);
        assert_eq!(opportunities[0].key, "website");
        assert_eq!(opportunities[0].tier, RelevanceTier::High);
    }

    #[test]
    fn test_gain_orders_within_tier() {
        // linkedin (10 pts) and google-organic (12 pts) are both high tier
        let (score, catalog) = scored(&[
            evidence("linkedin", SurfaceStatus::Absent),
            evidence("google-organic", SurfaceStatus::Absent),
        ]);

        let opportunities = top_opportunities(&score, &catalog, 50);
        let high: Vec<&Opportunity> = opportunities
            .iter()
            .filter(|o| o.tier == RelevanceTier::High)
            .collect();

        // google-organic carries the larger weighted gain
        assert_eq!(high[0].key, "google-organic");
        assert!(high[0].potential_gain >= high[1].potential_gain);
    }

    #[test]
    fn test_limit_truncates() {
        let catalog = SurfaceCatalog::builtin();
        let all_absent: Vec<_> = catalog
            .list()
            .iter()
            .map(|d| evidence(d.key.as_str(), SurfaceStatus::Absent))
            .collect();
        let (score, catalog) = scored(&all_absent);

        let opportunities = top_opportunities(&score, &catalog, 10);
        assert_eq!(opportunities.len(), 10);
    }

    #[test]
    fn test_recommendations_render_guidance() {
        let (score, catalog) = scored(&[evidence("linkedin", SurfaceStatus::Absent)]);

        let opportunities = top_opportunities(&score, &catalog, 10);
        let recommendations = recommendations(&opportunities);

        let linkedin = recommendations
            .iter()
            .find(|r| r.starts_with("LinkedIn Company Page:"))
            .expect("linkedin recommendation");
        assert!(linkedin.contains("Create a LinkedIn company page"));
    }

    #[test]
    fn test_partial_surfaces_qualify() {
        let (score, catalog) = scored(&[evidence("facebook", SurfaceStatus::Partial)]);
        let opportunities = top_opportunities(&score, &catalog, 50);

        let facebook = opportunities
            .iter()
            .find(|o| o.key == "facebook")
            .expect("facebook opportunity");
        assert_eq!(facebook.status, SurfaceStatus::Partial);
        // Half the points are still on the table
        assert!(facebook.potential_gain > 0.0);
    }
}
