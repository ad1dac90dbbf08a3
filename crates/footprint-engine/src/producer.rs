//! Business profile producers.
//!
//! The engine consumes a structured [`BusinessProfile`] and never the
//! generation mechanism: a producer may call a language model, read a CRM,
//! or fall back to the deterministic derivation here. Only the fallback
//! ships with the engine.

use crate::error::{EngineError, Result};
use footprint_catalog::SurfaceCatalog;
use footprint_core::{BusinessProfile, ProfileConfidence};
use footprint_scanner::root_label;
use std::sync::Arc;

/// Supplies the structured profile for a target domain.
pub trait ProfileProducer: Send + Sync {
    /// Produce a validated profile for the domain.
    fn produce(&self, domain: &str) -> Result<BusinessProfile>;
}

/// Deterministic non-LLM fallback producer.
///
/// Derives the brand name from the domain's root label and weighs every
/// surface by its catalog default tier. Confidence is always low; callers
/// with a richer producer should prefer it.
pub struct DeterministicProfileProducer {
    catalog: Arc<SurfaceCatalog>,
}

impl DeterministicProfileProducer {
    /// Create a producer deriving weights from the given catalog.
    #[must_use]
    pub fn new(catalog: Arc<SurfaceCatalog>) -> Self {
        Self { catalog }
    }
}

impl ProfileProducer for DeterministicProfileProducer {
    fn produce(&self, domain: &str) -> Result<BusinessProfile> {
        let root = root_label(domain);
        if root.is_empty() {
            return Err(EngineError::Profile(format!(
                "cannot derive a brand name from '{domain}'"
            )));
        }

        let mut profile = BusinessProfile::new(capitalize(&root));
        profile.brand_variants = vec![root.clone()];
        profile.geographic_scope = "unknown".to_string();
        profile.rationale = format!(
            "Deterministic fallback: brand derived from the domain root label '{root}', \
             relevance weights from catalog default tiers."
        );
        profile.confidence = ProfileConfidence::Low;

        for definition in self.catalog.list() {
            profile.surface_weights.insert(
                definition.key.clone(),
                definition.default_tier.default_weight(),
            );
        }

        profile
            .validate()
            .map_err(|e| EngineError::Profile(e.to_string()))?;

        Ok(profile)
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use footprint_core::SurfaceKey;

    fn producer() -> DeterministicProfileProducer {
        DeterministicProfileProducer::new(Arc::new(SurfaceCatalog::builtin()))
    }

    #[test]
    fn test_brand_from_root_label() {
        let profile = producer().produce("acme.example.com").expect("produce profile");
        assert_eq!(profile.brand_name, "Example");
        assert_eq!(profile.brand_variants, vec!["example".to_string()]);
        assert_eq!(profile.confidence, ProfileConfidence::Low);
    }

    #[test]
    fn test_weights_cover_every_surface() {
        let catalog = SurfaceCatalog::builtin();
        let profile = producer().produce("acme.example").expect("produce profile");

        assert_eq!(profile.surface_weights.len(), catalog.len());

        let linkedin = SurfaceKey::new("linkedin").expect("valid key");
        // linkedin is a high-tier surface
        assert!((profile.weight_for(&linkedin, 0.0) - 0.9).abs() < f64::EPSILON);

        let bimi = SurfaceKey::new("dns-bimi").expect("valid key");
        assert!((profile.weight_for(&bimi, 0.0) - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_produced_profile_validates() {
        let profile = producer().produce("acme.example").expect("produce profile");
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_unusable_domain_rejected() {
        assert!(producer().produce("").is_err());
    }
}
