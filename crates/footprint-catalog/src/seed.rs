//! The built-in surface catalog.
//!
//! These definitions are the fixed scoring denominator: 88 base points
//! across five categories (owned 22, search 22, social 28, trust 12,
//! authority 4). Category and point values are constants; editing them
//! changes the meaning of every historic percentage.

use crate::definition::{
    DetectionMethod, Guidance, RelevanceTier, SurfaceCategory, SurfaceDefinition,
};
use footprint_core::SurfaceKey;

/// Total base points across the built-in catalog.
pub const TOTAL_BASE_POINTS: u32 = 88;

#[allow(clippy::too_many_arguments)]
fn surface(
    key: &str,
    label: &str,
    category: SurfaceCategory,
    base_points: u32,
    default_tier: RelevanceTier,
    detection: DetectionMethod,
    platform_hints: &[&str],
    present: &str,
    absent: &str,
) -> SurfaceDefinition {
    SurfaceDefinition {
        key: SurfaceKey::new(key).expect("seed surface key is valid"),
        label: label.to_string(),
        category,
        base_points,
        default_tier,
        platform_hints: platform_hints.iter().map(ToString::to_string).collect(),
        detection,
        guidance: Guidance {
            present: present.to_string(),
            absent: absent.to_string(),
        },
    }
}

fn search(templates: &[&str]) -> DetectionMethod {
    DetectionMethod::SearchResults {
        templates: templates.iter().map(ToString::to_string).collect(),
    }
}

fn dns(prefix: &str, marker: &str) -> DetectionMethod {
    DetectionMethod::DnsRecord {
        prefix: prefix.to_string(),
        marker: marker.to_string(),
    }
}

/// The built-in surface definitions, in catalog (category, then priority)
/// order.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn builtin_definitions() -> Vec<SurfaceDefinition> {
    vec![
        // --- Owned (22) ---
        surface(
            "website",
            "Website",
            SurfaceCategory::Owned,
            14,
            RelevanceTier::High,
            DetectionMethod::HttpCrawl {
                path: "/".to_string(),
            },
            &[],
            "The website responds and identifies the brand. Keep the title and structured data current.",
            "No reachable website was found at the target domain. Publish one before anything else.",
        ),
        surface(
            "google-business-profile",
            "Google Business Profile",
            SurfaceCategory::Owned,
            8,
            RelevanceTier::High,
            DetectionMethod::Provider {
                provider: "places".to_string(),
                templates: vec!["{brand} {city}".to_string()],
            },
            &["google.com/maps/place/"],
            "The business profile is claimed. Keep hours and contact details accurate.",
            "Claim the Google Business Profile so the brand appears in local results and maps.",
        ),
        // --- Search (22) ---
        surface(
            "google-organic",
            "Google Organic Results",
            SurfaceCategory::Search,
            12,
            RelevanceTier::High,
            search(&["{brand}", "{brand} {industry}", "\"{brand}\" {city}"]),
            &[],
            "The brand ranks for its own name. Monitor for competitors bidding on it.",
            "The brand does not surface for its own name. Improve on-page branding and earn citations.",
        ),
        surface(
            "google-news",
            "News Coverage",
            SurfaceCategory::Search,
            6,
            RelevanceTier::Medium,
            search(&["{brand} news", "{brand} announcement"]),
            &[],
            "The brand has recent news coverage.",
            "No news coverage found. Distribute announcements through a wire or local press.",
        ),
        surface(
            "bing-organic",
            "Bing Organic Results",
            SurfaceCategory::Search,
            4,
            RelevanceTier::Low,
            DetectionMethod::Provider {
                provider: "bing".to_string(),
                templates: vec!["{brand}".to_string()],
            },
            &[],
            "The brand is visible on Bing.",
            "The brand is missing from Bing. Submit the site to Bing Webmaster Tools.",
        ),
        // --- Social (28) ---
        surface(
            "linkedin",
            "LinkedIn Company Page",
            SurfaceCategory::Social,
            10,
            RelevanceTier::High,
            search(&["site:linkedin.com/company {brand}", "{brand} linkedin"]),
            &["linkedin.com/company/", "linkedin.com/school/"],
            "The LinkedIn company page exists. Post at least monthly to keep it alive.",
            "Create a LinkedIn company page; it ranks highly for brand searches.",
        ),
        surface(
            "facebook",
            "Facebook Page",
            SurfaceCategory::Social,
            6,
            RelevanceTier::Medium,
            search(&["site:facebook.com {brand}", "{brand} facebook"]),
            &["facebook.com/"],
            "The Facebook page exists.",
            "Create a Facebook page to cover the largest social audience.",
        ),
        surface(
            "instagram",
            "Instagram Profile",
            SurfaceCategory::Social,
            6,
            RelevanceTier::Medium,
            search(&["site:instagram.com {brand}", "{brand} instagram"]),
            &["instagram.com/"],
            "The Instagram profile exists.",
            "Register the brand handle on Instagram before someone else does.",
        ),
        surface(
            "youtube",
            "YouTube Channel",
            SurfaceCategory::Social,
            4,
            RelevanceTier::Medium,
            search(&["site:youtube.com {brand}", "{brand} youtube channel"]),
            &["youtube.com/@", "youtube.com/channel/", "youtube.com/c/"],
            "The YouTube channel exists.",
            "Create a YouTube channel; video results occupy prime search real estate.",
        ),
        surface(
            "x-twitter",
            "X (Twitter) Profile",
            SurfaceCategory::Social,
            2,
            RelevanceTier::Low,
            DetectionMethod::Manual {
                instructions:
                    "Search x.com for the brand handle and verify account ownership by hand; \
                     the platform blocks unauthenticated lookups."
                        .to_string(),
            },
            &["x.com/", "twitter.com/"],
            "The X profile exists and is verified as the brand's.",
            "Register the brand handle on X to protect the namespace.",
        ),
        // --- Trust (12) ---
        surface(
            "dns-dmarc",
            "DMARC Policy",
            SurfaceCategory::Trust,
            4,
            RelevanceTier::Medium,
            dns("_dmarc", "v=DMARC1"),
            &[],
            "A DMARC record is published. Move the policy toward quarantine or reject.",
            "Publish a DMARC record at _dmarc.<domain> to stop email spoofing of the brand.",
        ),
        surface(
            "dns-spf",
            "SPF Record",
            SurfaceCategory::Trust,
            3,
            RelevanceTier::Medium,
            dns("", "v=spf1"),
            &[],
            "An SPF record is published.",
            "Publish an SPF TXT record listing the senders allowed to mail as the domain.",
        ),
        surface(
            "dns-mta-sts",
            "MTA-STS Policy",
            SurfaceCategory::Trust,
            2,
            RelevanceTier::Low,
            dns("_mta-sts", "v=STSv1"),
            &[],
            "An MTA-STS policy is published.",
            "Publish an MTA-STS record to enforce TLS on inbound mail.",
        ),
        surface(
            "dns-bimi",
            "BIMI Record",
            SurfaceCategory::Trust,
            1,
            RelevanceTier::Low,
            dns("default._bimi", "v=BIMI1"),
            &[],
            "A BIMI record is published; the logo shows next to mail.",
            "Publish a BIMI record so the brand logo appears in supporting inboxes.",
        ),
        surface(
            "trustpilot",
            "Trustpilot Reviews",
            SurfaceCategory::Trust,
            2,
            RelevanceTier::Medium,
            search(&["site:trustpilot.com {brand}", "{brand} reviews"]),
            &["trustpilot.com/review/"],
            "A Trustpilot page exists. Respond to reviews, good and bad.",
            "Claim the Trustpilot listing; review pages rank for \"<brand> reviews\" searches.",
        ),
        // --- Authority (4) ---
        surface(
            "wikipedia",
            "Wikipedia Article",
            SurfaceCategory::Authority,
            2,
            RelevanceTier::Low,
            search(&["site:wikipedia.org {brand}"]),
            &["wikipedia.org/wiki/"],
            "A Wikipedia article covers the brand.",
            "No Wikipedia coverage. Only pursue once independent sources exist.",
        ),
        surface(
            "press-mentions",
            "Press Mentions",
            SurfaceCategory::Authority,
            2,
            RelevanceTier::Low,
            search(&["\"{brand}\" press release", "{brand} {industry} interview"]),
            &[],
            "Third-party press mentions the brand.",
            "No press mentions found. Pitch trade publications in the industry.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_seed_definitions_are_valid() {
        for def in builtin_definitions() {
            def.validate()
                .unwrap_or_else(|e| panic!("invalid seed definition {}: {e}", def.key));
        }
    }

    #[test]
    fn test_seed_total_points() {
        let total: u32 = builtin_definitions().iter().map(|d| d.base_points).sum();
        assert_eq!(total, TOTAL_BASE_POINTS);
    }

    #[test]
    fn test_seed_category_points() {
        let mut by_category: HashMap<SurfaceCategory, u32> = HashMap::new();
        for def in builtin_definitions() {
            *by_category.entry(def.category).or_insert(0) += def.base_points;
        }

        assert_eq!(by_category[&SurfaceCategory::Owned], 22);
        assert_eq!(by_category[&SurfaceCategory::Search], 22);
        assert_eq!(by_category[&SurfaceCategory::Social], 28);
        assert_eq!(by_category[&SurfaceCategory::Trust], 12);
        assert_eq!(by_category[&SurfaceCategory::Authority], 4);
    }

    #[test]
    fn test_seed_keys_unique() {
        let defs = builtin_definitions();
        let mut keys: Vec<_> = defs.iter().map(|d| d.key.as_str()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), defs.len());
    }

    #[test]
    fn test_seed_known_point_values() {
        let defs = builtin_definitions();
        let points = |key: &str| {
            defs.iter()
                .find(|d| d.key.as_str() == key)
                .map(|d| d.base_points)
                .unwrap_or_else(|| panic!("missing seed surface {key}"))
        };

        assert_eq!(points("linkedin"), 10);
        assert_eq!(points("trustpilot"), 2);
        assert_eq!(points("website"), 14);
    }

    #[test]
    fn test_dns_surfaces_carry_markers() {
        for def in builtin_definitions() {
            if let DetectionMethod::DnsRecord { marker, .. } = &def.detection {
                assert!(marker.starts_with("v="), "marker for {}: {marker}", def.key);
            }
        }
    }
}
