//! The externally-produced business profile consumed by the audit engine.
//!
//! A profile is generated once per target domain (possibly by a language
//! model, possibly by a deterministic fallback) and treated as read-only
//! input here: the engine never alters it, only reads the brand identity
//! and per-surface relevance weights out of it.

use crate::error::FootprintError;
use crate::types::SurfaceKey;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Maximum number of brand name variants a profile may carry.
pub const MAX_BRAND_VARIANTS: usize = 5;

/// Confidence tier of a generated profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProfileConfidence {
    /// Generated from rich inputs
    High,
    /// Generated from partial inputs
    Medium,
    /// Deterministic fallback or thin inputs
    Low,
}

/// Structured description of the business being audited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessProfile {
    /// Primary brand name
    pub brand_name: String,
    /// Brand name variants: abbreviations, misspellings, product names
    #[serde(default)]
    pub brand_variants: Vec<String>,
    /// Business type (e.g. "b2b-saas", "local-retail")
    #[serde(default)]
    pub business_type: String,
    /// Industry label used in search queries
    #[serde(default)]
    pub industry: String,
    /// City, when the business is geographically anchored
    #[serde(default)]
    pub city: String,
    /// Country
    #[serde(default)]
    pub country: String,
    /// Geographic scope (e.g. "local", "national", "global")
    #[serde(default)]
    pub geographic_scope: String,
    /// Relevance weight in [0,1] per surface key
    #[serde(default)]
    pub surface_weights: HashMap<SurfaceKey, f64>,
    /// Free-text rationale from the producer
    #[serde(default)]
    pub rationale: String,
    /// Confidence tier of the producer
    pub confidence: ProfileConfidence,
}

impl BusinessProfile {
    /// Create a minimal profile with just a brand name.
    #[must_use]
    pub fn new(brand_name: impl Into<String>) -> Self {
        Self {
            brand_name: brand_name.into(),
            brand_variants: Vec::new(),
            business_type: String::new(),
            industry: String::new(),
            city: String::new(),
            country: String::new(),
            geographic_scope: String::new(),
            surface_weights: HashMap::new(),
            rationale: String::new(),
            confidence: ProfileConfidence::Low,
        }
    }

    /// Validate the profile for use by the engine.
    pub fn validate(&self) -> Result<(), FootprintError> {
        if self.brand_name.trim().is_empty() {
            return Err(FootprintError::Validation(
                "brand name cannot be empty".to_string(),
            ));
        }

        if self.brand_variants.len() > MAX_BRAND_VARIANTS {
            return Err(FootprintError::Validation(format!(
                "at most {MAX_BRAND_VARIANTS} brand variants allowed, got {}",
                self.brand_variants.len()
            )));
        }

        for (key, weight) in &self.surface_weights {
            if !(0.0..=1.0).contains(weight) {
                return Err(FootprintError::Validation(format!(
                    "relevance weight for '{key}' must be in [0,1], got {weight}"
                )));
            }
        }

        Ok(())
    }

    /// The relevance weight for a surface, or the given default when the
    /// producer did not weigh it.
    #[must_use]
    pub fn weight_for(&self, key: &SurfaceKey, default: f64) -> f64 {
        self.surface_weights
            .get(key)
            .copied()
            .unwrap_or(default)
            .clamp(0.0, 1.0)
    }

    /// Brand terms to match evidence against: the brand name plus variants,
    /// lowercased, blanks dropped.
    #[must_use]
    pub fn match_terms(&self) -> Vec<String> {
        std::iter::once(&self.brand_name)
            .chain(self.brand_variants.iter())
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> SurfaceKey {
        SurfaceKey::new(s).expect("valid surface key")
    }

    #[test]
    fn test_minimal_profile_validates() {
        let profile = BusinessProfile::new("Acme Corp");
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_empty_brand_rejected() {
        let profile = BusinessProfile::new("   ");
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_too_many_variants_rejected() {
        let mut profile = BusinessProfile::new("Acme");
        profile.brand_variants = (0..6).map(|i| format!("acme-{i}")).collect();
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_out_of_range_weight_rejected() {
        let mut profile = BusinessProfile::new("Acme");
        profile.surface_weights.insert(key("linkedin"), 1.2);
        assert!(profile.validate().is_err());

        profile.surface_weights.insert(key("linkedin"), -0.1);
        assert!(profile.validate().is_err());

        profile.surface_weights.insert(key("linkedin"), 0.9);
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_weight_for_falls_back_to_default() {
        let mut profile = BusinessProfile::new("Acme");
        profile.surface_weights.insert(key("linkedin"), 0.9);

        assert!((profile.weight_for(&key("linkedin"), 0.3) - 0.9).abs() < f64::EPSILON);
        assert!((profile.weight_for(&key("trustpilot"), 0.3) - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_match_terms_lowercased_and_filtered() {
        let mut profile = BusinessProfile::new("Acme Corp");
        profile.brand_variants = vec!["ACME".to_string(), "  ".to_string()];

        let terms = profile.match_terms();
        assert_eq!(terms, vec!["acme corp".to_string(), "acme".to_string()]);
    }
}
