//! Query construction from surface templates.
//!
//! Token substitution is literal string replacement; a missing profile
//! field substitutes the empty string. Output is capped to bound probe
//! cost, and duplicate or blank queries are dropped.

use footprint_catalog::SurfaceDefinition;
use footprint_core::BusinessProfile;
use std::collections::HashSet;

/// Build the concrete search queries for one surface.
///
/// A surface with zero templates (the owned website, DNS records) yields
/// zero queries; that is expected, not an error.
#[must_use]
pub fn build_queries(
    definition: &SurfaceDefinition,
    profile: &BusinessProfile,
    domain: &str,
    max_queries: usize,
) -> Vec<String> {
    let mut queries = Vec::new();
    let mut seen = HashSet::new();

    for template in definition.query_templates() {
        let query = substitute(template, profile, domain);
        // Collapse the whitespace holes left by empty substitutions
        let query = query.split_whitespace().collect::<Vec<_>>().join(" ");

        if query.is_empty() || query.chars().all(|c| !c.is_alphanumeric()) {
            continue;
        }

        if seen.insert(query.to_lowercase()) {
            queries.push(query);
        }

        if queries.len() == max_queries {
            break;
        }
    }

    queries
}

fn substitute(template: &str, profile: &BusinessProfile, domain: &str) -> String {
    let mut out = template
        .replace("{brand}", profile.brand_name.trim())
        .replace("{domain}", domain)
        .replace("{industry}", profile.industry.trim())
        .replace("{city}", profile.city.trim())
        .replace("{country}", profile.country.trim());

    for index in 1..=5 {
        let token = format!("{{variant{index}}}");
        if out.contains(&token) {
            let value = profile
                .brand_variants
                .get(index - 1)
                .map_or("", |v| v.trim());
            out = out.replace(&token, value);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use footprint_catalog::{
        DetectionMethod, Guidance, RelevanceTier, SurfaceCategory,
    };
    use footprint_core::SurfaceKey;

    fn definition_with_templates(templates: &[&str]) -> SurfaceDefinition {
        SurfaceDefinition {
            key: SurfaceKey::new("test-surface").expect("valid key"),
            label: "Test Surface".to_string(),
            category: SurfaceCategory::Search,
            base_points: 4,
            default_tier: RelevanceTier::Medium,
            detection: DetectionMethod::SearchResults {
                templates: templates.iter().map(ToString::to_string).collect(),
            },
            platform_hints: vec![],
            guidance: Guidance {
                present: "ok".to_string(),
                absent: "missing".to_string(),
            },
        }
    }

    fn definition_without_templates() -> SurfaceDefinition {
        let mut def = definition_with_templates(&["placeholder"]);
        def.detection = DetectionMethod::HttpCrawl {
            path: "/".to_string(),
        };
        def
    }

    fn profile() -> BusinessProfile {
        let mut profile = BusinessProfile::new("Acme Corp");
        profile.industry = "logistics".to_string();
        profile.city = "Rotterdam".to_string();
        profile.brand_variants = vec!["Acme".to_string()];
        profile
    }

    #[test]
    fn test_substitutes_tokens() {
        let def = definition_with_templates(&["{brand} {industry}", "{brand} site:{domain}"]);
        let queries = build_queries(&def, &profile(), "acme.example", 3);

        assert_eq!(
            queries,
            vec![
                "Acme Corp logistics".to_string(),
                "Acme Corp site:acme.example".to_string(),
            ]
        );
    }

    #[test]
    fn test_missing_tokens_substitute_empty() {
        let def = definition_with_templates(&["{brand} {city} {country}"]);
        let mut profile = BusinessProfile::new("Acme");
        profile.city = String::new();

        let queries = build_queries(&def, &profile, "acme.example", 3);
        // Empty substitutions collapse, leaving no double spaces
        assert_eq!(queries, vec!["Acme".to_string()]);
    }

    #[test]
    fn test_variant_tokens() {
        let def = definition_with_templates(&["{variant1} reviews", "{variant2} reviews"]);
        let queries = build_queries(&def, &profile(), "acme.example", 3);

        // variant1 exists; variant2 is empty and leaves a bare "reviews"
        assert_eq!(
            queries,
            vec!["Acme reviews".to_string(), "reviews".to_string()]
        );
    }

    #[test]
    fn test_output_capped() {
        let def = definition_with_templates(&[
            "{brand} one",
            "{brand} two",
            "{brand} three",
            "{brand} four",
        ]);
        let queries = build_queries(&def, &profile(), "acme.example", 3);
        assert_eq!(queries.len(), 3);
    }

    #[test]
    fn test_duplicates_dropped() {
        let def = definition_with_templates(&["{brand}", "{variant1} Corp", "{brand}"]);
        let queries = build_queries(&def, &profile(), "acme.example", 3);

        // "Acme Corp" from variant1 duplicates "{brand}" case-insensitively
        assert_eq!(queries, vec!["Acme Corp".to_string()]);
    }

    #[test]
    fn test_zero_templates_zero_queries() {
        let def = definition_without_templates();
        let queries = build_queries(&def, &profile(), "acme.example", 3);
        assert!(queries.is_empty());
    }

    #[test]
    fn test_empty_profile_yields_no_punctuation_only_queries() {
        let def = definition_with_templates(&["\"{brand}\""]);
        let profile = BusinessProfile::new(" ");
        let queries = build_queries(&def, &profile, "acme.example", 3);
        assert!(queries.is_empty());
    }
}
