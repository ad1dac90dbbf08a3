//! Score computation.
//!
//! Per surface: `points_max = base_points x relevance_weight`, awarded
//! points scale by status (present 1.0, partial 0.5, everything else 0.0).
//! Category and overall percentages are `round(100 * awarded / max)`, with
//! an empty denominator defined as 0 rather than a division error.

use footprint_catalog::{RelevanceTier, SurfaceCategory, SurfaceCatalog};
use footprint_core::{BusinessProfile, SurfaceEvidence, SurfaceStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Letter grade over the overall percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    /// 90 and above
    A,
    /// 75 and above
    B,
    /// 60 and above
    C,
    /// 40 and above
    D,
    /// Below 40
    F,
}

impl Grade {
    /// Grade for an overall percentage.
    #[must_use]
    pub fn from_percentage(percentage: u8) -> Self {
        match percentage {
            90..=u8::MAX => Self::A,
            75..=89 => Self::B,
            60..=74 => Self::C,
            40..=59 => Self::D,
            _ => Self::F,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
            Self::C => write!(f, "C"),
            Self::D => write!(f, "D"),
            Self::F => write!(f, "F"),
        }
    }
}

/// Score for one surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceScore {
    /// Surface key
    pub key: String,
    /// Surface label
    pub label: String,
    /// Category (kebab-case)
    pub category: SurfaceCategory,
    /// Relevance tier used for opportunity ranking
    pub tier: RelevanceTier,
    /// Status the evidence resolved to
    pub status: SurfaceStatus,
    /// Classification confidence
    pub confidence: f64,
    /// Maximum achievable points after relevance weighting
    pub points_max: f64,
    /// Points actually awarded
    pub points_awarded: f64,
    /// Points left on the table
    pub potential_gain: f64,
}

/// Score for one category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryScore {
    /// Category
    pub category: SurfaceCategory,
    /// Sum of member surfaces' maximum points
    pub points_max: f64,
    /// Sum of member surfaces' awarded points
    pub points_awarded: f64,
    /// `round(100 * awarded / max)`, 0 when max is 0
    pub percentage: u8,
}

/// The complete audit score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FootprintScore {
    /// Per-surface scores in catalog order
    pub surfaces: Vec<SurfaceScore>,
    /// Per-category scores in catalog order
    pub categories: Vec<CategoryScore>,
    /// Overall maximum points
    pub points_max: f64,
    /// Overall awarded points
    pub points_awarded: f64,
    /// Overall percentage
    pub percentage: u8,
    /// Letter grade
    pub grade: Grade,
}

/// Status factor: how much of a surface's maximum the status earns.
fn status_factor(status: SurfaceStatus) -> f64 {
    match status {
        SurfaceStatus::Present => 1.0,
        SurfaceStatus::Partial => 0.5,
        SurfaceStatus::Absent
        | SurfaceStatus::Unknown
        | SurfaceStatus::ManualRequired
        | SurfaceStatus::Error => 0.0,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn percentage(awarded: f64, max: f64) -> u8 {
    if max <= 0.0 {
        return 0;
    }
    (awarded / max * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Compute the full score from catalog, profile weights and evidence.
///
/// Surfaces with no evidence score as unknown (factor 0.0). Evidence for
/// surfaces outside the catalog is ignored.
#[must_use]
pub fn compute_score(
    catalog: &SurfaceCatalog,
    profile: &BusinessProfile,
    evidence: &[SurfaceEvidence],
) -> FootprintScore {
    let by_key: HashMap<&str, &SurfaceEvidence> = evidence
        .iter()
        .map(|e| (e.surface.as_str(), e))
        .collect();

    let mut surfaces = Vec::with_capacity(catalog.len());

    for definition in catalog.list() {
        let evidence = by_key.get(definition.key.as_str());
        let (status, confidence) = evidence
            .map_or((SurfaceStatus::Unknown, 0.0), |e| (e.status, e.confidence));

        let weight =
            profile.weight_for(&definition.key, definition.default_tier.default_weight());
        let points_max = f64::from(definition.base_points) * weight;
        let points_awarded = points_max * status_factor(status);

        surfaces.push(SurfaceScore {
            key: definition.key.as_str().to_string(),
            label: definition.label.clone(),
            category: definition.category,
            tier: definition.default_tier,
            status,
            confidence,
            points_max,
            points_awarded,
            potential_gain: points_max - points_awarded,
        });
    }

    let categories = SurfaceCategory::all()
        .into_iter()
        .map(|category| {
            let (max, awarded) = surfaces
                .iter()
                .filter(|s| s.category == category)
                .fold((0.0, 0.0), |(max, awarded), s| {
                    (max + s.points_max, awarded + s.points_awarded)
                });
            CategoryScore {
                category,
                points_max: max,
                points_awarded: awarded,
                percentage: percentage(awarded, max),
            }
        })
        .collect::<Vec<_>>();

    let points_max: f64 = surfaces.iter().map(|s| s.points_max).sum();
    let points_awarded: f64 = surfaces.iter().map(|s| s.points_awarded).sum();
    let overall = percentage(points_awarded, points_max);

    debug!(
        points_awarded,
        points_max,
        percentage = overall,
        "computed footprint score"
    );

    FootprintScore {
        surfaces,
        categories,
        points_max,
        points_awarded,
        percentage: overall,
        grade: Grade::from_percentage(overall),
    }
}
