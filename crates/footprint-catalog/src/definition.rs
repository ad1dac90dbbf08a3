//! Surface definition types and structures.
//!
//! This module defines the data structures for audit surface definitions,
//! whether seeded from the built-in catalog or loaded from TOML files.

use crate::error::{CatalogError, Result};
use footprint_core::SurfaceKey;
use serde::{Deserialize, Serialize};

/// Maximum number of query templates a surface may declare.
pub const MAX_QUERY_TEMPLATES: usize = 5;

/// Complete definition of one audit surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceDefinition {
    /// Unique surface identifier (e.g. "linkedin", "dns-dmarc")
    pub key: SurfaceKey,

    /// Human-readable surface name
    pub label: String,

    /// Scoring category
    pub category: SurfaceCategory,

    /// Base point value; part of the fixed scoring denominator
    pub base_points: u32,

    /// Default relevance tier, used when a profile carries no weight
    pub default_tier: RelevanceTier,

    /// URL patterns that identify a direct hit on this surface's platform
    /// (e.g. `linkedin.com/company/`)
    #[serde(default)]
    pub platform_hints: Vec<String>,

    /// How presence on this surface is detected
    pub detection: DetectionMethod,

    /// Guidance text for report rendering
    pub guidance: Guidance,
}

impl SurfaceDefinition {
    /// Validate the surface definition for completeness and correctness.
    pub fn validate(&self) -> Result<()> {
        if self.label.is_empty() {
            return Err(CatalogError::ValidationError {
                surface_key: self.key.to_string(),
                reason: "label cannot be empty".to_string(),
            });
        }

        if self.base_points == 0 {
            return Err(CatalogError::ValidationError {
                surface_key: self.key.to_string(),
                reason: "base_points must be at least 1".to_string(),
            });
        }

        self.detection.validate(&self.key)?;

        if self.guidance.present.is_empty() || self.guidance.absent.is_empty() {
            return Err(CatalogError::ValidationError {
                surface_key: self.key.to_string(),
                reason: "guidance text cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    /// The query templates this surface runs, if any.
    ///
    /// Directly-checked surfaces (HTTP crawl, DNS) have none; that is
    /// expected, not an error.
    #[must_use]
    pub fn query_templates(&self) -> &[String] {
        self.detection.templates()
    }
}

/// Scoring categories for audit surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SurfaceCategory {
    /// Properties the brand controls directly (website, business profile)
    Owned,
    /// Search engine visibility
    Search,
    /// Social platforms
    Social,
    /// Trust signals: DNS policy records and review sites
    Trust,
    /// Third-party authority mentions
    Authority,
}

impl SurfaceCategory {
    /// Get a human-readable display name.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Owned => "Owned Presence",
            Self::Search => "Search Visibility",
            Self::Social => "Social Platforms",
            Self::Trust => "Trust Signals",
            Self::Authority => "Authority Mentions",
        }
    }

    /// All categories in catalog order.
    #[must_use]
    pub fn all() -> [Self; 5] {
        [
            Self::Owned,
            Self::Search,
            Self::Social,
            Self::Trust,
            Self::Authority,
        ]
    }
}

/// How much a surface matters by default.
///
/// Ordering is by priority: `High < Medium < Low` sorts high-relevance
/// surfaces first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelevanceTier {
    /// Core surfaces almost every business needs
    High,
    /// Commonly relevant surfaces
    Medium,
    /// Niche or secondary surfaces
    Low,
}

impl RelevanceTier {
    /// Default relevance weight when a profile doesn't weigh the surface.
    #[must_use]
    pub fn default_weight(&self) -> f64 {
        match self {
            Self::High => 0.9,
            Self::Medium => 0.6,
            Self::Low => 0.3,
        }
    }
}

/// Methods for detecting presence on a surface.
///
/// This tagged union is the per-surface rule table: adding a surface means
/// adding data, not new code branches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "kebab-case")]
pub enum DetectionMethod {
    /// Fetch the target domain directly over HTTP
    #[serde(rename = "http-crawl")]
    HttpCrawl {
        /// Path appended to the domain (usually "/")
        #[serde(default = "default_path")]
        path: String,
    },

    /// Look up a DNS TXT record at a surface-specific prefix
    DnsRecord {
        /// Subdomain prefix (e.g. `_dmarc`); empty means the bare domain
        #[serde(default)]
        prefix: String,
        /// Marker a positive record must contain (e.g. `v=DMARC1`)
        marker: String,
    },

    /// Query a third-party organic-search API
    SearchResults {
        /// Query templates with `{brand}`-style placeholder tokens
        templates: Vec<String>,
    },

    /// Needs a paid data provider beyond the plain search API
    Provider {
        /// Provider identifier (e.g. "places", "bing")
        provider: String,
        /// Query templates used when the provider mode is enabled
        #[serde(default)]
        templates: Vec<String>,
    },

    /// Cannot be auto-probed at all
    Manual {
        /// Instructions for manual verification
        instructions: String,
    },
}

fn default_path() -> String {
    "/".to_string()
}

impl DetectionMethod {
    /// Validate the detection method configuration.
    fn validate(&self, key: &SurfaceKey) -> Result<()> {
        match self {
            Self::HttpCrawl { path } => {
                if !path.starts_with('/') {
                    return Err(CatalogError::ValidationError {
                        surface_key: key.to_string(),
                        reason: format!("crawl path must start with '/', got '{path}'"),
                    });
                }
            }
            Self::DnsRecord { marker, .. } => {
                if marker.is_empty() {
                    return Err(CatalogError::ValidationError {
                        surface_key: key.to_string(),
                        reason: "DNS record marker cannot be empty".to_string(),
                    });
                }
            }
            Self::SearchResults { templates } => {
                Self::validate_templates(key, templates, true)?;
            }
            Self::Provider {
                provider,
                templates,
            } => {
                if provider.is_empty() {
                    return Err(CatalogError::ValidationError {
                        surface_key: key.to_string(),
                        reason: "provider identifier cannot be empty".to_string(),
                    });
                }
                Self::validate_templates(key, templates, false)?;
            }
            Self::Manual { instructions } => {
                if instructions.is_empty() {
                    return Err(CatalogError::ValidationError {
                        surface_key: key.to_string(),
                        reason: "manual surfaces require instructions".to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    fn validate_templates(key: &SurfaceKey, templates: &[String], required: bool) -> Result<()> {
        if required && templates.is_empty() {
            return Err(CatalogError::ValidationError {
                surface_key: key.to_string(),
                reason: "search surfaces require at least one query template".to_string(),
            });
        }
        if templates.len() > MAX_QUERY_TEMPLATES {
            return Err(CatalogError::ValidationError {
                surface_key: key.to_string(),
                reason: format!(
                    "at most {MAX_QUERY_TEMPLATES} query templates allowed, got {}",
                    templates.len()
                ),
            });
        }
        if templates.iter().any(|t| t.trim().is_empty()) {
            return Err(CatalogError::ValidationError {
                surface_key: key.to_string(),
                reason: "query templates cannot be blank".to_string(),
            });
        }
        Ok(())
    }

    /// Query templates, empty for directly-checked surfaces.
    #[must_use]
    pub fn templates(&self) -> &[String] {
        match self {
            Self::SearchResults { templates } | Self::Provider { templates, .. } => templates,
            _ => &[],
        }
    }

    /// Whether this method needs the target domain to run at all.
    #[must_use]
    pub fn requires_domain(&self) -> bool {
        matches!(self, Self::HttpCrawl { .. } | Self::DnsRecord { .. })
    }
}

/// Human-readable guidance for the two report states.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guidance {
    /// Shown when the surface is already present
    pub present: String,
    /// Shown when the surface is currently absent
    pub absent: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> SurfaceKey {
        SurfaceKey::new(s).expect("valid surface key")
    }

    fn guidance() -> Guidance {
        Guidance {
            present: "Keep it up to date.".to_string(),
            absent: "Claim it.".to_string(),
        }
    }

    fn test_definition(detection: DetectionMethod) -> SurfaceDefinition {
        SurfaceDefinition {
            key: key("test-surface"),
            label: "Test Surface".to_string(),
            category: SurfaceCategory::Social,
            base_points: 4,
            default_tier: RelevanceTier::Medium,
            detection,
            platform_hints: vec![],
            guidance: guidance(),
        }
    }

    #[test]
    fn test_category_display() {
        assert_eq!(SurfaceCategory::Owned.display_name(), "Owned Presence");
        assert_eq!(SurfaceCategory::Trust.display_name(), "Trust Signals");
    }

    #[test]
    fn test_relevance_tier_ordering() {
        assert!(RelevanceTier::High < RelevanceTier::Medium);
        assert!(RelevanceTier::Medium < RelevanceTier::Low);
    }

    #[test]
    fn test_relevance_tier_default_weight() {
        assert!(RelevanceTier::High.default_weight() > RelevanceTier::Medium.default_weight());
        assert!(RelevanceTier::Medium.default_weight() > RelevanceTier::Low.default_weight());
    }

    #[test]
    fn test_search_surface_requires_templates() {
        let def = test_definition(DetectionMethod::SearchResults { templates: vec![] });
        assert!(def.validate().is_err());

        let def = test_definition(DetectionMethod::SearchResults {
            templates: vec!["{brand}".to_string()],
        });
        assert!(def.validate().is_ok());
    }

    #[test]
    fn test_too_many_templates_rejected() {
        let templates = (0..6).map(|i| format!("{{brand}} q{i}")).collect();
        let def = test_definition(DetectionMethod::SearchResults { templates });
        assert!(def.validate().is_err());
    }

    #[test]
    fn test_dns_surface_requires_marker() {
        let def = test_definition(DetectionMethod::DnsRecord {
            prefix: "_dmarc".to_string(),
            marker: String::new(),
        });
        assert!(def.validate().is_err());

        let def = test_definition(DetectionMethod::DnsRecord {
            prefix: "_dmarc".to_string(),
            marker: "v=DMARC1".to_string(),
        });
        assert!(def.validate().is_ok());
    }

    #[test]
    fn test_crawl_path_must_be_absolute() {
        let def = test_definition(DetectionMethod::HttpCrawl {
            path: "about".to_string(),
        });
        assert!(def.validate().is_err());
    }

    #[test]
    fn test_zero_base_points_rejected() {
        let mut def = test_definition(DetectionMethod::Manual {
            instructions: "Check by hand.".to_string(),
        });
        def.base_points = 0;
        assert!(def.validate().is_err());
    }

    #[test]
    fn test_templates_empty_for_direct_surfaces() {
        let def = test_definition(DetectionMethod::HttpCrawl {
            path: "/".to_string(),
        });
        assert!(def.query_templates().is_empty());

        let def = test_definition(DetectionMethod::DnsRecord {
            prefix: String::new(),
            marker: "v=spf1".to_string(),
        });
        assert!(def.query_templates().is_empty());
    }

    #[test]
    fn test_detection_method_toml_roundtrip() {
        let def = test_definition(DetectionMethod::DnsRecord {
            prefix: "_mta-sts".to_string(),
            marker: "v=STSv1".to_string(),
        });
        let toml_str = toml::to_string_pretty(&def).expect("serialize definition");
        let parsed: SurfaceDefinition = toml::from_str(&toml_str).expect("parse definition");
        assert!(matches!(
            parsed.detection,
            DetectionMethod::DnsRecord { ref marker, .. } if marker == "v=STSv1"
        ));
    }

    #[test]
    fn test_requires_domain() {
        assert!(DetectionMethod::HttpCrawl {
            path: "/".to_string()
        }
        .requires_domain());
        assert!(DetectionMethod::DnsRecord {
            prefix: String::new(),
            marker: "v=spf1".to_string()
        }
        .requires_domain());
        assert!(!DetectionMethod::SearchResults {
            templates: vec!["{brand}".to_string()]
        }
        .requires_domain());
    }
}
