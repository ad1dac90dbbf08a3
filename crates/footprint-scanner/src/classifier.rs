//! Evidence classification.
//!
//! Turns a raw probe envelope into a status and confidence. Precedence:
//!
//! 1. probe failed + known social platform -> manual-required
//! 2. probe failed otherwise -> error (first-party 401/403 block -> absent)
//! 3. DNS: marker -> present, bare record -> partial, none -> absent
//! 4. HTTP/search: count official-looking matches
//! 5. platform-pattern hit plus >=1 official match forces present
//!
//! Ambiguous evidence resolves to unknown, never silently to absent.

use footprint_catalog::{SurfaceCategory, SurfaceDefinition};
use footprint_core::{
    BusinessProfile, EvidenceItem, ProbeKind, SurfaceEvidence, SurfaceStatus,
};
use footprint_probe::{ProbeErrorCode, ProbeEvidence, SearchHit};
use tracing::debug;

/// Platform domains where a failing or blocked probe means "check by hand"
/// rather than "absent" — these sites routinely block automated clients.
const KNOWN_SOCIAL_DOMAINS: &[&str] = &[
    "linkedin.com",
    "facebook.com",
    "instagram.com",
    "youtube.com",
    "x.com",
    "twitter.com",
    "tiktok.com",
    "pinterest.com",
];

/// Classify a probe envelope into surface evidence.
#[must_use]
pub fn classify(
    definition: &SurfaceDefinition,
    probe: &ProbeEvidence,
    profile: &BusinessProfile,
    domain: &str,
) -> SurfaceEvidence {
    let key = definition.key.clone();
    let queries = probe.queries.clone();

    if let Some(failure) = &probe.failure {
        let (status, confidence) = classify_failure(definition, probe, failure.code);
        debug!(surface = %key, code = %failure.code, status = %status, "classified failed probe");
        return SurfaceEvidence::new(
            key,
            status,
            confidence,
            Vec::new(),
            queries,
            Some(probe.kind),
            Some(format!("{}: {}", failure.code, failure.message)),
        );
    }

    match probe.kind {
        ProbeKind::Dns => classify_dns(definition, probe, queries),
        ProbeKind::Http => classify_http(definition, probe, profile, domain, queries),
        ProbeKind::Search => classify_search(definition, probe, profile, domain, queries),
    }
}

fn classify_failure(
    definition: &SurfaceDefinition,
    probe: &ProbeEvidence,
    code: ProbeErrorCode,
) -> (SurfaceStatus, f64) {
    match code {
        // Could not look: distinct from every real negative
        ProbeErrorCode::Unconfigured => (SurfaceStatus::Unknown, 0.0),
        _ if is_social_target(definition, &probe.target) => (SurfaceStatus::ManualRequired, 0.0),
        // A first-party 401/403 means the domain serves nothing brand-visible
        ProbeErrorCode::Blocked => (SurfaceStatus::Absent, 0.6),
        _ => (SurfaceStatus::Error, 0.0),
    }
}

fn classify_dns(
    definition: &SurfaceDefinition,
    probe: &ProbeEvidence,
    queries: Vec<String>,
) -> SurfaceEvidence {
    let key = definition.key.clone();

    let Some(meta) = &probe.dns else {
        // Successful DNS probe without DNS metadata cannot be resolved
        return SurfaceEvidence::new(
            key,
            SurfaceStatus::Unknown,
            0.0,
            Vec::new(),
            queries,
            Some(ProbeKind::Dns),
            Some("classification-ambiguous: DNS evidence without lookup metadata".to_string()),
        );
    };

    let (status, confidence) = if meta.marker_found {
        (SurfaceStatus::Present, 0.9)
    } else if meta.record_found {
        // A record exists at the name but it isn't the recognized policy
        (SurfaceStatus::Partial, 0.6)
    } else {
        (SurfaceStatus::Absent, 0.7)
    };

    debug!(surface = %key, status = %status, "classified DNS probe");
    SurfaceEvidence::new(
        key,
        status,
        confidence,
        Vec::new(),
        queries,
        Some(ProbeKind::Dns),
        None,
    )
}

fn classify_http(
    definition: &SurfaceDefinition,
    probe: &ProbeEvidence,
    profile: &BusinessProfile,
    domain: &str,
    queries: Vec<String>,
) -> SurfaceEvidence {
    let key = definition.key.clone();

    let Some(meta) = &probe.fetch else {
        return SurfaceEvidence::new(
            key,
            SurfaceStatus::Unknown,
            0.0,
            Vec::new(),
            queries,
            Some(ProbeKind::Http),
            Some("classification-ambiguous: HTTP evidence without fetch metadata".to_string()),
        );
    };

    if !(200..400).contains(&meta.status_code) {
        // The domain answered but serves nothing at the crawl path
        return SurfaceEvidence::new(
            key,
            SurfaceStatus::Absent,
            0.7,
            Vec::new(),
            queries,
            Some(ProbeKind::Http),
            None,
        );
    }

    let terms = profile.match_terms();
    let root = root_label(domain);
    let title = meta.page_title.clone().unwrap_or_default();
    let official = url_host(&meta.final_url).is_some_and(|host| host_matches(&host, domain))
        || is_official(&title, &meta.final_url, &terms, &root, domain);

    let item = EvidenceItem {
        title: if title.is_empty() {
            meta.final_url.clone()
        } else {
            title
        },
        url: meta.final_url.clone(),
        snippet: None,
        official,
    };

    // A direct crawl yields a single page, so the multi-result counting
    // rule can't apply: an official 2xx page is the presence signal itself.
    let (status, confidence) = if official {
        let mut confidence: f64 = 0.85;
        if meta.page_title.is_some() {
            confidence += 0.05;
        }
        if meta.structured_data {
            confidence += 0.05;
        }
        (SurfaceStatus::Present, confidence.min(0.95))
    } else {
        // Reachable, but redirected off-domain or unbranded (parked page)
        (SurfaceStatus::Partial, 0.55)
    };

    debug!(surface = %key, status = %status, "classified HTTP probe");
    SurfaceEvidence::new(
        key,
        status,
        confidence,
        vec![item],
        queries,
        Some(ProbeKind::Http),
        None,
    )
}

fn classify_search(
    definition: &SurfaceDefinition,
    probe: &ProbeEvidence,
    profile: &BusinessProfile,
    domain: &str,
    queries: Vec<String>,
) -> SurfaceEvidence {
    let key = definition.key.clone();

    if queries.is_empty() && probe.hits.is_empty() {
        // The probe never actually ran a query
        return SurfaceEvidence::new(
            key,
            SurfaceStatus::Unknown,
            0.0,
            Vec::new(),
            queries,
            Some(ProbeKind::Search),
            Some("no queries were issued".to_string()),
        );
    }

    let terms = profile.match_terms();
    let root = root_label(domain);

    let mut items: Vec<EvidenceItem> = probe
        .hits
        .iter()
        .map(|hit| to_item(hit, &terms, &root, domain))
        .collect();

    let official_count = items.iter().filter(|i| i.official).count();
    let total_count = items.len();
    let platform_hit = items.iter().any(|i| matches_platform_hint(definition, &i.url));

    // Most relevant first: official items ahead of the rest, rank preserved
    items.sort_by_key(|i| !i.official);

    let (status, confidence) = if platform_hit && official_count >= 1 {
        // A direct platform-URL hit outweighs keyword co-occurrence
        let confidence = if official_count >= 2 { 0.95 } else { 0.9 };
        (SurfaceStatus::Present, confidence)
    } else if official_count >= 2 {
        #[allow(clippy::cast_precision_loss)]
        let confidence = (0.85 + 0.05 * (official_count as f64 - 2.0)).min(0.95);
        (SurfaceStatus::Present, confidence)
    } else if official_count == 1 || total_count >= 2 {
        (SurfaceStatus::Partial, 0.55)
    } else if total_count == 0 {
        // We looked and found nothing: absent, not unknown
        (SurfaceStatus::Absent, 0.7)
    } else {
        // Exactly one hit, and it isn't brand-related
        (SurfaceStatus::Absent, 0.65)
    };

    debug!(
        surface = %key,
        official = official_count,
        total = total_count,
        platform_hit,
        status = %status,
        "classified search probe"
    );

    SurfaceEvidence::new(
        key,
        status,
        confidence,
        items,
        queries,
        Some(ProbeKind::Search),
        None,
    )
}

fn to_item(hit: &SearchHit, terms: &[String], root: &str, domain: &str) -> EvidenceItem {
    EvidenceItem {
        title: hit.title.clone(),
        url: hit.url.clone(),
        snippet: hit.snippet.clone(),
        official: is_official(&hit.title, &hit.url, terms, root, domain),
    }
}

/// Whether a result looks like an official brand property: its title or URL
/// contains the brand name, a variant, or the domain's root label.
fn is_official(title: &str, url: &str, terms: &[String], root: &str, domain: &str) -> bool {
    let title = title.to_lowercase();
    let url = url.to_lowercase();

    for term in terms {
        if title.contains(term) {
            return true;
        }
        let compact = compact(term);
        if !compact.is_empty() && url.contains(&compact) {
            return true;
        }
    }

    (!root.is_empty() && (title.contains(root) || url.contains(root)))
        || (!domain.is_empty() && url.contains(&domain.to_lowercase()))
}

fn matches_platform_hint(definition: &SurfaceDefinition, url: &str) -> bool {
    let url = url.to_lowercase();
    definition
        .platform_hints
        .iter()
        .any(|hint| url.contains(&hint.to_lowercase()))
}

fn is_social_target(definition: &SurfaceDefinition, target: &str) -> bool {
    if definition.category == SurfaceCategory::Social {
        return true;
    }
    let target = target.to_lowercase();
    KNOWN_SOCIAL_DOMAINS.iter().any(|d| target.contains(d))
}

/// The registrable label of a domain: `example` for `shop.example.com`.
#[must_use]
pub fn root_label(domain: &str) -> String {
    let host = domain
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_start_matches("www.")
        .split('/')
        .next()
        .unwrap_or("");

    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    match labels.len() {
        0 => String::new(),
        1 => labels[0].to_lowercase(),
        n => labels[n - 2].to_lowercase(),
    }
}

fn url_host(url: &str) -> Option<String> {
    let rest = url
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    let host = rest.split('/').next()?.split(':').next()?;
    if host.is_empty() {
        None
    } else {
        Some(host.to_lowercase())
    }
}

fn host_matches(host: &str, domain: &str) -> bool {
    let domain = domain.to_lowercase();
    let host = host.trim_start_matches("www.");
    let domain = domain.trim_start_matches("www.");
    !domain.is_empty() && (host == domain || host.ends_with(&format!(".{domain}")))
}

fn compact(term: &str) -> String {
    term.chars().filter(|c| c.is_alphanumeric()).collect()
}
