//! DNS TXT record probe.
//!
//! Resolves TXT records at a surface-specific subdomain prefix (`_dmarc.`
//! for DMARC, `_mta-sts.` for MTA-STS, `default._bimi.` for BIMI, the bare
//! domain for SPF) and reports record existence and recognized-marker
//! presence as separate signals.

use crate::evidence::{DnsMeta, ProbeErrorCode, ProbeEvidence, ProbeFailure};
use footprint_core::{ProbeKind, ScanningConfig};
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::error::ResolveErrorKind;
use hickory_resolver::TokioAsyncResolver;
use std::time::Duration;
use tracing::{debug, warn};

/// DNS probe executor backed by a shared tokio resolver.
pub struct DnsProber {
    resolver: TokioAsyncResolver,
    timeout: Duration,
}

impl DnsProber {
    /// Build the probe executor from scanning configuration.
    #[must_use]
    pub fn new(config: &ScanningConfig) -> Self {
        let resolver = TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default());

        Self {
            resolver,
            timeout: Duration::from_secs(config.dns_timeout_secs),
        }
    }

    /// Look up TXT records at `prefix.domain` (bare domain when the prefix
    /// is empty) and check them for the recognized marker.
    ///
    /// "No records" resolves to a successful envelope with
    /// `record_found = false` — we looked and found nothing, which is a real
    /// negative, not an error.
    pub async fn lookup_txt(&self, domain: &str, prefix: &str, marker: &str) -> ProbeEvidence {
        let lookup_name = if prefix.is_empty() {
            domain.to_string()
        } else {
            format!("{prefix}.{domain}")
        };

        debug!(name = %lookup_name, "starting DNS probe");

        let lookup = tokio::time::timeout(self.timeout, self.resolver.txt_lookup(&lookup_name));

        match lookup.await {
            Err(_) => {
                warn!(name = %lookup_name, "DNS probe timed out");
                ProbeEvidence::failed(
                    lookup_name.clone(),
                    ProbeKind::Dns,
                    Vec::new(),
                    ProbeFailure::new(
                        ProbeErrorCode::Timeout,
                        format!("DNS lookup for {lookup_name} exceeded {:?}", self.timeout),
                    ),
                )
            }
            Ok(Ok(txt_records)) => {
                let records: Vec<String> = txt_records.iter().map(ToString::to_string).collect();
                let meta = record_meta(&lookup_name, records, marker);
                debug!(
                    name = %lookup_name,
                    record_found = meta.record_found,
                    marker_found = meta.marker_found,
                    "DNS probe completed"
                );
                ProbeEvidence::dns_success(lookup_name, meta)
            }
            Ok(Err(e)) => {
                if matches!(e.kind(), ResolveErrorKind::NoRecordsFound { .. }) {
                    debug!(name = %lookup_name, "DNS probe found no records");
                    let meta = record_meta(&lookup_name, Vec::new(), marker);
                    return ProbeEvidence::dns_success(lookup_name, meta);
                }

                warn!(name = %lookup_name, error = %e, "DNS probe failed");
                ProbeEvidence::failed(
                    lookup_name,
                    ProbeKind::Dns,
                    Vec::new(),
                    ProbeFailure::new(ProbeErrorCode::DnsResolution, e.to_string()),
                )
            }
        }
    }
}

/// Build DNS metadata from raw record strings and the recognized marker.
fn record_meta(lookup_name: &str, records: Vec<String>, marker: &str) -> DnsMeta {
    let marker_found = records.iter().any(|r| r.contains(marker));
    DnsMeta {
        lookup_name: lookup_name.to_string(),
        record_found: !records.is_empty(),
        marker_found,
        records,
    }
}
