//! Third-party organic-search probe.
//!
//! Submits built queries to an organic-search JSON API (Serper-style:
//! `POST` with an `X-API-KEY` header) and merges the ranked hits. Missing
//! credentials produce a clearly distinguished `Unconfigured` failure, so
//! downstream status determination never conflates "verified absent" with
//! "could not verify".

use crate::error::{ProbeError, Result};
use crate::evidence::{ProbeErrorCode, ProbeEvidence, ProbeFailure, SearchHit};
use async_trait::async_trait;
use footprint_core::{ProbeKind, ScanningConfig, SearchConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Credentials for the organic-search API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCredentials {
    /// API key sent in the `X-API-KEY` header
    pub api_key: String,
}

/// Source of search-API credentials.
///
/// Implemented by the database layer (active credential row) and by
/// [`StaticCredentialProvider`] for tests. Returning `Ok(None)` means
/// "not configured", which is a reportable condition, not an error.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// The active search credentials, if any are configured.
    async fn search_credentials(&self) -> Result<Option<SearchCredentials>>;
}

/// In-memory credential provider for tests and embedding callers.
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    credentials: Option<SearchCredentials>,
}

impl StaticCredentialProvider {
    /// Provider that always returns the given credentials.
    #[must_use]
    pub fn new(credentials: Option<SearchCredentials>) -> Self {
        Self { credentials }
    }

    /// Provider that is never configured.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self { credentials: None }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentialProvider {
    async fn search_credentials(&self) -> Result<Option<SearchCredentials>> {
        Ok(self.credentials.clone())
    }
}

/// Request body for the organic-search API.
#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    q: &'a str,
    num: u32,
}

/// Response body from the organic-search API.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic: Vec<OrganicResult>,
}

/// One organic result from the API.
#[derive(Debug, Deserialize)]
struct OrganicResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: Option<String>,
}

/// Search probe executor.
pub struct SearchProber {
    client: reqwest::Client,
    endpoint: String,
    results_per_query: u32,
    credentials: Arc<dyn CredentialProvider>,
}

impl SearchProber {
    /// Build the probe executor from configuration and a credential source.
    pub fn new(
        scanning: &ScanningConfig,
        search: &SearchConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(scanning.search_timeout_secs))
            .user_agent(scanning.user_agent.clone())
            .build()
            .map_err(|e| ProbeError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: search.endpoint.clone(),
            results_per_query: search.results_per_query,
            credentials,
        })
    }

    /// Whether search credentials are currently configured.
    pub async fn is_configured(&self) -> bool {
        matches!(self.credentials.search_credentials().await, Ok(Some(_)))
    }

    /// Run the built queries and merge their hits in rank order.
    pub async fn search(&self, queries: &[String]) -> ProbeEvidence {
        let queries = queries.to_vec();

        let credentials = match self.credentials.search_credentials().await {
            Ok(Some(credentials)) => credentials,
            Ok(None) => {
                // Not configured is a reportable condition of its own
                return ProbeEvidence::failed(
                    self.endpoint.clone(),
                    ProbeKind::Search,
                    queries,
                    ProbeFailure::new(
                        ProbeErrorCode::Unconfigured,
                        "no search API credentials configured",
                    ),
                );
            }
            Err(e) => {
                warn!(error = %e, "credential lookup failed");
                return ProbeEvidence::failed(
                    self.endpoint.clone(),
                    ProbeKind::Search,
                    queries,
                    ProbeFailure::new(ProbeErrorCode::Network, e.to_string()),
                );
            }
        };

        let mut hits: Vec<SearchHit> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut last_failure: Option<ProbeFailure> = None;
        let mut any_succeeded = false;

        for query in &queries {
            match self.run_query(query, &credentials).await {
                Ok(results) => {
                    any_succeeded = true;
                    for hit in results {
                        if seen.insert(hit.url.clone()) {
                            hits.push(hit);
                        }
                    }
                }
                Err(failure) => {
                    warn!(query, code = %failure.code, "search query failed");
                    last_failure = Some(failure);
                }
            }
        }

        if !any_succeeded {
            if let Some(failure) = last_failure {
                return ProbeEvidence::failed(
                    self.endpoint.clone(),
                    ProbeKind::Search,
                    queries,
                    failure,
                );
            }
            // Zero queries were issued: nothing to report either way
            return ProbeEvidence::search_success(self.endpoint.clone(), queries, Vec::new());
        }

        debug!(hits = hits.len(), "search probe completed");
        ProbeEvidence::search_success(self.endpoint.clone(), queries, hits)
    }

    /// Issue one query against the API.
    async fn run_query(
        &self,
        query: &str,
        credentials: &SearchCredentials,
    ) -> std::result::Result<Vec<SearchHit>, ProbeFailure> {
        let request = SearchRequest {
            q: query,
            num: self.results_per_query,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", &credentials.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                let code = if e.is_timeout() {
                    ProbeErrorCode::Timeout
                } else {
                    ProbeErrorCode::Network
                };
                ProbeFailure::new(code, e.to_string())
            })?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(ProbeFailure::blocked(
                format!("search API returned HTTP {}", status.as_u16()),
                format!("status {}", status.as_u16()),
            ));
        }
        if !status.is_success() {
            return Err(ProbeFailure::new(
                ProbeErrorCode::Network,
                format!("search API returned HTTP {}", status.as_u16()),
            ));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| ProbeFailure::new(ProbeErrorCode::Network, e.to_string()))?;

        Ok(parse_hits(body))
    }
}

/// Convert an API response into ranked hits, dropping malformed entries.
fn parse_hits(response: SearchResponse) -> Vec<SearchHit> {
    response
        .organic
        .into_iter()
        .filter(|r| !r.link.is_empty())
        .map(|r| SearchHit {
            title: r.title,
            url: r.link,
            snippet: r.snippet,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_provider() {
        let provider = StaticCredentialProvider::new(Some(SearchCredentials {
            api_key: "test-key".to_string(),
        }));
        let credentials = provider
            .search_credentials()
            .await
            .expect("lookup credentials");
        assert_eq!(credentials.expect("configured").api_key, "test-key");

        let unconfigured = StaticCredentialProvider::unconfigured();
        assert!(unconfigured
            .search_credentials()
            .await
            .expect("lookup credentials")
            .is_none());
    }

    #[tokio::test]
    async fn test_unconfigured_probe_reports_unconfigured() {
        let prober = SearchProber::new(
            &ScanningConfig::default(),
            &SearchConfig::default(),
            Arc::new(StaticCredentialProvider::unconfigured()),
        )
        .expect("build search prober");

        assert!(!prober.is_configured().await);

        let evidence = prober.search(&["acme corp".to_string()]).await;
        assert!(!evidence.is_ok());
        assert_eq!(evidence.error_code(), Some(ProbeErrorCode::Unconfigured));
        // The queries we meant to run are still recorded
        assert_eq!(evidence.queries, vec!["acme corp".to_string()]);
    }

    #[test]
    fn test_parse_hits_drops_malformed() {
        let response: SearchResponse = serde_json::from_str(
            r#"{
                "organic": [
                    {"title": "Acme Corp", "link": "https://acme.example", "snippet": "The Acme."},
                    {"title": "no link at all"},
                    {"title": "Acme on LinkedIn", "link": "https://linkedin.com/company/acme"}
                ]
            }"#,
        )
        .expect("parse response");

        let hits = parse_hits(response);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].url, "https://acme.example");
        assert_eq!(hits[1].url, "https://linkedin.com/company/acme");
    }

    #[test]
    fn test_parse_empty_response() {
        let response: SearchResponse = serde_json::from_str("{}").expect("parse response");
        assert!(parse_hits(response).is_empty());
    }
}
