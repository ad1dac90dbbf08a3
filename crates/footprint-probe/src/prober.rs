//! Object-safe probe traits and the injectable prober bundle.
//!
//! The orchestrator only sees these traits, so tests can swap the real
//! network executors for stubs.

use crate::dns::DnsProber;
use crate::error::Result;
use crate::evidence::ProbeEvidence;
use crate::http::HttpProber;
use crate::search::{CredentialProvider, SearchProber};
use async_trait::async_trait;
use footprint_core::{ScanningConfig, SearchConfig};
use std::sync::Arc;

/// HTTP crawl probe.
#[async_trait]
pub trait HttpProbe: Send + Sync {
    /// Fetch a URL and return the evidence envelope.
    async fn fetch(&self, url: &str) -> ProbeEvidence;
}

/// DNS TXT record probe.
#[async_trait]
pub trait DnsProbe: Send + Sync {
    /// Look up TXT records at `prefix.domain` and check for the marker.
    async fn lookup_txt(&self, domain: &str, prefix: &str, marker: &str) -> ProbeEvidence;
}

/// Organic-search probe.
#[async_trait]
pub trait SearchProbe: Send + Sync {
    /// Run the built queries and return merged hits.
    async fn search(&self, queries: &[String]) -> ProbeEvidence;

    /// Whether the probe has credentials to run at all.
    async fn is_configured(&self) -> bool;
}

#[async_trait]
impl HttpProbe for HttpProber {
    async fn fetch(&self, url: &str) -> ProbeEvidence {
        HttpProber::fetch(self, url).await
    }
}

#[async_trait]
impl DnsProbe for DnsProber {
    async fn lookup_txt(&self, domain: &str, prefix: &str, marker: &str) -> ProbeEvidence {
        DnsProber::lookup_txt(self, domain, prefix, marker).await
    }
}

#[async_trait]
impl SearchProbe for SearchProber {
    async fn search(&self, queries: &[String]) -> ProbeEvidence {
        SearchProber::search(self, queries).await
    }

    async fn is_configured(&self) -> bool {
        SearchProber::is_configured(self).await
    }
}

/// The probe executors a scan runs with, one per acquisition method.
#[derive(Clone)]
pub struct ProberSet {
    /// HTTP crawl executor
    pub http: Arc<dyn HttpProbe>,
    /// DNS lookup executor
    pub dns: Arc<dyn DnsProbe>,
    /// Search lookup executor
    pub search: Arc<dyn SearchProbe>,
}

impl ProberSet {
    /// Build the real network-backed executors from configuration.
    pub fn from_config(
        scanning: &ScanningConfig,
        search: &SearchConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self> {
        Ok(Self {
            http: Arc::new(HttpProber::new(scanning)?),
            dns: Arc::new(DnsProber::new(scanning)),
            search: Arc::new(SearchProber::new(scanning, search, credentials)?),
        })
    }
}
