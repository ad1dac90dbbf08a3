//! The classified-evidence model shared by the scanner, database and scorer.
//!
//! A probe produces a raw envelope (owned by `footprint-probe`); the
//! classifier condenses it into a [`SurfaceEvidence`] which is what gets
//! persisted, superseded on re-scan, and scored.

use crate::types::{ProbeKind, SurfaceKey};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum number of evidence items kept per surface.
pub const MAX_EVIDENCE_ITEMS: usize = 5;

/// Classified presence state of a surface for a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SurfaceStatus {
    /// Verifiable presence found
    Present,
    /// Weak or ambiguous signals found
    Partial,
    /// We looked and found nothing
    Absent,
    /// We could not look (no credentials, no templates, not probed)
    Unknown,
    /// A human must verify (blocked or failing social platform)
    ManualRequired,
    /// The probe itself failed
    Error,
}

impl fmt::Display for SurfaceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present => write!(f, "present"),
            Self::Partial => write!(f, "partial"),
            Self::Absent => write!(f, "absent"),
            Self::Unknown => write!(f, "unknown"),
            Self::ManualRequired => write!(f, "manual-required"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Persisted per-surface scan state.
///
/// `Queued` is the only non-terminal state; within a single scan statuses
/// move forward only. `Error` and `ManualRequired` are terminal for the
/// scan, not globally: a later scan may re-attempt the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScanResultStatus {
    /// Waiting to be probed
    Queued,
    /// Cannot be auto-probed; a human must check
    ManualRequired,
    /// Target domain unknown or unresolvable
    NeedsEntityInput,
    /// Surface needs a paid provider the scan mode or credentials don't cover
    RequiresProvider,
    /// Presence confirmed
    PresentConfirmed,
    /// Weak or partial presence
    PresentPartial,
    /// Verified absent
    Absent,
    /// Probe or classification failed
    Error,
}

impl ScanResultStatus {
    /// Whether this status is terminal for the current scan.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Queued)
    }

    /// Map a classifier outcome onto the persisted state machine.
    ///
    /// `Unknown` persists as `Error`: within a scan every probed surface
    /// must reach a terminal state, and the evidence payload keeps the
    /// could-not-classify detail.
    #[must_use]
    pub fn from_classified(status: SurfaceStatus) -> Self {
        match status {
            SurfaceStatus::Present => Self::PresentConfirmed,
            SurfaceStatus::Partial => Self::PresentPartial,
            SurfaceStatus::Absent => Self::Absent,
            SurfaceStatus::ManualRequired => Self::ManualRequired,
            SurfaceStatus::Unknown | SurfaceStatus::Error => Self::Error,
        }
    }

    /// Map a persisted state back onto the classifier vocabulary for scoring.
    #[must_use]
    pub fn to_classified(&self) -> SurfaceStatus {
        match self {
            Self::PresentConfirmed => SurfaceStatus::Present,
            Self::PresentPartial => SurfaceStatus::Partial,
            Self::Absent => SurfaceStatus::Absent,
            Self::ManualRequired => SurfaceStatus::ManualRequired,
            Self::Error => SurfaceStatus::Error,
            Self::Queued | Self::NeedsEntityInput | Self::RequiresProvider => {
                SurfaceStatus::Unknown
            }
        }
    }
}

impl fmt::Display for ScanResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Queued => write!(f, "queued"),
            Self::ManualRequired => write!(f, "manual-required"),
            Self::NeedsEntityInput => write!(f, "needs-entity-input"),
            Self::RequiresProvider => write!(f, "requires-provider"),
            Self::PresentConfirmed => write!(f, "present-confirmed"),
            Self::PresentPartial => write!(f, "present-partial"),
            Self::Absent => write!(f, "absent"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl FromStr for ScanResultStatus {
    type Err = crate::error::FootprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" => Ok(Self::Queued),
            "manual-required" => Ok(Self::ManualRequired),
            "needs-entity-input" => Ok(Self::NeedsEntityInput),
            "requires-provider" => Ok(Self::RequiresProvider),
            "present-confirmed" => Ok(Self::PresentConfirmed),
            "present-partial" => Ok(Self::PresentPartial),
            "absent" => Ok(Self::Absent),
            "error" => Ok(Self::Error),
            other => Err(crate::error::FootprintError::Validation(format!(
                "invalid scan result status '{other}'"
            ))),
        }
    }
}

/// A single matched result backing a surface classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceItem {
    /// Result title (or page title)
    pub title: String,
    /// Result URL
    pub url: String,
    /// Result snippet, when the source provides one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    /// Whether the item looks like an official brand property
    pub official: bool,
}

/// Classified evidence for one (scan, surface) pair.
///
/// Immutable once recorded; a re-scan supersedes it with a fresh value
/// rather than mutating it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceEvidence {
    /// The surface this evidence belongs to
    pub surface: SurfaceKey,
    /// Classified status
    pub status: SurfaceStatus,
    /// Confidence in [0,1]
    pub confidence: f64,
    /// Supporting items, most relevant first, capped at [`MAX_EVIDENCE_ITEMS`]
    pub items: Vec<EvidenceItem>,
    /// The literal queries the probe ran (empty for direct probes)
    pub queries: Vec<String>,
    /// Acquisition method, when a probe actually ran
    pub source: Option<ProbeKind>,
    /// Error detail, when the probe or classification failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SurfaceEvidence {
    /// Create evidence, clamping confidence to [0,1] and capping items.
    #[must_use]
    pub fn new(
        surface: SurfaceKey,
        status: SurfaceStatus,
        confidence: f64,
        mut items: Vec<EvidenceItem>,
        queries: Vec<String>,
        source: Option<ProbeKind>,
        error: Option<String>,
    ) -> Self {
        items.truncate(MAX_EVIDENCE_ITEMS);
        Self {
            surface,
            status,
            confidence: confidence.clamp(0.0, 1.0),
            items,
            queries,
            source,
            error,
        }
    }

    /// Evidence for a surface that could not be checked at all.
    #[must_use]
    pub fn unknown(surface: SurfaceKey, reason: impl Into<String>) -> Self {
        Self::new(
            surface,
            SurfaceStatus::Unknown,
            0.0,
            Vec::new(),
            Vec::new(),
            None,
            Some(reason.into()),
        )
    }

    /// Number of items flagged as official.
    #[must_use]
    pub fn official_count(&self) -> usize {
        self.items.iter().filter(|i| i.official).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> SurfaceKey {
        SurfaceKey::new(s).expect("valid surface key")
    }

    fn item(official: bool) -> EvidenceItem {
        EvidenceItem {
            title: "Acme Corp".to_string(),
            url: "https://example.com".to_string(),
            snippet: None,
            official,
        }
    }

    #[test]
    fn test_status_display() {
        assert_eq!(SurfaceStatus::ManualRequired.to_string(), "manual-required");
        assert_eq!(ScanResultStatus::PresentConfirmed.to_string(), "present-confirmed");
    }

    #[test]
    fn test_scan_result_status_roundtrip() {
        let all = [
            ScanResultStatus::Queued,
            ScanResultStatus::ManualRequired,
            ScanResultStatus::NeedsEntityInput,
            ScanResultStatus::RequiresProvider,
            ScanResultStatus::PresentConfirmed,
            ScanResultStatus::PresentPartial,
            ScanResultStatus::Absent,
            ScanResultStatus::Error,
        ];
        for status in all {
            let parsed: ScanResultStatus = status.to_string().parse().expect("parse status");
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_only_queued_is_nonterminal() {
        assert!(!ScanResultStatus::Queued.is_terminal());
        assert!(ScanResultStatus::Error.is_terminal());
        assert!(ScanResultStatus::ManualRequired.is_terminal());
        assert!(ScanResultStatus::RequiresProvider.is_terminal());
    }

    #[test]
    fn test_classified_mapping() {
        assert_eq!(
            ScanResultStatus::from_classified(SurfaceStatus::Present),
            ScanResultStatus::PresentConfirmed
        );
        assert_eq!(
            ScanResultStatus::from_classified(SurfaceStatus::Partial),
            ScanResultStatus::PresentPartial
        );
        // Unknown cannot stay open within a scan
        assert_eq!(
            ScanResultStatus::from_classified(SurfaceStatus::Unknown),
            ScanResultStatus::Error
        );
        // Non-probed rows score as unknown
        assert_eq!(
            ScanResultStatus::RequiresProvider.to_classified(),
            SurfaceStatus::Unknown
        );
        assert_eq!(
            ScanResultStatus::NeedsEntityInput.to_classified(),
            SurfaceStatus::Unknown
        );
    }

    #[test]
    fn test_evidence_caps_items() {
        let items = vec![item(true); 9];
        let evidence = SurfaceEvidence::new(
            key("linkedin"),
            SurfaceStatus::Present,
            0.9,
            items,
            vec!["acme linkedin".to_string()],
            Some(ProbeKind::Search),
            None,
        );
        assert_eq!(evidence.items.len(), MAX_EVIDENCE_ITEMS);
        assert_eq!(evidence.official_count(), MAX_EVIDENCE_ITEMS);
    }

    #[test]
    fn test_evidence_clamps_confidence() {
        let evidence = SurfaceEvidence::new(
            key("linkedin"),
            SurfaceStatus::Present,
            1.4,
            Vec::new(),
            Vec::new(),
            Some(ProbeKind::Search),
            None,
        );
        assert!((evidence.confidence - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unknown_constructor() {
        let evidence = SurfaceEvidence::unknown(key("bing-organic"), "no credentials");
        assert_eq!(evidence.status, SurfaceStatus::Unknown);
        assert!((evidence.confidence - 0.0).abs() < f64::EPSILON);
        assert!(evidence.items.is_empty());
        assert_eq!(evidence.error.as_deref(), Some("no credentials"));
    }
}
