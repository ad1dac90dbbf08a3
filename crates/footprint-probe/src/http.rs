//! HTTP crawl probe.
//!
//! Fetches a target URL with a bounded timeout, an identifying user agent
//! and redirect following, and captures status, final URL, content type,
//! elapsed time, page title, structured-data markup and a content hash.

use crate::error::{ProbeError, Result};
use crate::evidence::{FetchMeta, ProbeErrorCode, ProbeEvidence, ProbeFailure};
use footprint_core::{ProbeKind, ScanningConfig};
use scraper::{Html, Selector};
use sha2::{Digest, Sha256};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// HTTP probe executor backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: reqwest::Client,
    sample_limit: usize,
}

impl HttpProber {
    /// Build the probe executor from scanning configuration.
    pub fn new(config: &ScanningConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()
            .map_err(|e| ProbeError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            sample_limit: config.byte_sample_limit,
        })
    }

    /// Fetch a URL and capture the evidence envelope.
    pub async fn fetch(&self, url: &str) -> ProbeEvidence {
        debug!(url, "starting HTTP probe");
        let started = Instant::now();

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(url, error = %e, "HTTP probe failed");
                let code = if e.is_timeout() {
                    ProbeErrorCode::Timeout
                } else if e.is_builder() || e.is_request() {
                    ProbeErrorCode::InvalidTarget
                } else {
                    ProbeErrorCode::Network
                };
                return ProbeEvidence::failed(
                    url,
                    ProbeKind::Http,
                    Vec::new(),
                    ProbeFailure::new(code, e.to_string()),
                );
            }
        };

        let status = response.status();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);

        // 401/403 is a block, not a hard failure; downstream decides whether
        // it means "absent" (first-party) or "verify by hand" (platform).
        if status.as_u16() == 401 || status.as_u16() == 403 {
            warn!(url, status = status.as_u16(), "HTTP probe blocked");
            return ProbeEvidence::failed(
                url,
                ProbeKind::Http,
                Vec::new(),
                ProbeFailure::blocked(
                    format!("HTTP {} from {final_url}", status.as_u16()),
                    format!("status {}", status.as_u16()),
                ),
            );
        }

        let body = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(url, error = %e, "failed to read HTTP body");
                let code = if e.is_timeout() {
                    ProbeErrorCode::Timeout
                } else {
                    ProbeErrorCode::Network
                };
                return ProbeEvidence::failed(
                    url,
                    ProbeKind::Http,
                    Vec::new(),
                    ProbeFailure::new(code, e.to_string()),
                );
            }
        };

        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let text = String::from_utf8_lossy(&body);

        let fetch = FetchMeta {
            status_code: status.as_u16(),
            final_url,
            content_type,
            elapsed_ms,
            page_title: extract_title(&text),
            structured_data: detect_structured_data(&text),
        };

        let sample: String = text.chars().take(self.sample_limit).collect();
        let content_hash = hex::encode(Sha256::digest(&body));

        debug!(
            url,
            status = fetch.status_code,
            elapsed_ms,
            "HTTP probe completed"
        );

        ProbeEvidence::http_success(url, fetch, Some(sample), Some(content_hash))
    }
}

/// Extract the first `<title>` tag content from an HTML document.
#[must_use]
pub fn extract_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("title").ok()?;

    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
}

/// Detect structured-data markup: JSON-LD blocks or microdata attributes.
#[must_use]
pub fn detect_structured_data(html: &str) -> bool {
    html.contains("application/ld+json") || html.contains("itemtype=")
}
