//! The uniform probe evidence envelope.
//!
//! Every probe kind returns the same shape: target attempted, method,
//! fetch/DNS metadata, extracted artifacts, integrity hash, and a nullable
//! error triple. Exactly one of the success path or the error path is
//! populated; the constructors enforce it.

use footprint_core::ProbeKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classified cause of a probe failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProbeErrorCode {
    /// Missing credentials or configuration — distinct from a real negative
    Unconfigured,
    /// The probe exceeded its time budget
    Timeout,
    /// Transport-level failure (connect, TLS, read)
    Network,
    /// 401/403 response, possibly bot detection
    Blocked,
    /// DNS resolution failed (beyond "no records")
    DnsResolution,
    /// The target could not be turned into a probe-able address
    InvalidTarget,
}

impl fmt::Display for ProbeErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unconfigured => write!(f, "unconfigured"),
            Self::Timeout => write!(f, "timeout"),
            Self::Network => write!(f, "network"),
            Self::Blocked => write!(f, "blocked"),
            Self::DnsResolution => write!(f, "dns-resolution"),
            Self::InvalidTarget => write!(f, "invalid-target"),
        }
    }
}

/// The error triple carried by a failed probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeFailure {
    /// Failure classification
    pub code: ProbeErrorCode,
    /// Human-readable detail
    pub message: String,
    /// Block reason, when `code` is [`ProbeErrorCode::Blocked`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,
}

impl ProbeFailure {
    /// Create a failure without a block reason.
    #[must_use]
    pub fn new(code: ProbeErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            block_reason: None,
        }
    }

    /// Create a blocked failure with its reason.
    #[must_use]
    pub fn blocked(message: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: ProbeErrorCode::Blocked,
            message: message.into(),
            block_reason: Some(reason.into()),
        }
    }
}

/// Metadata captured by an HTTP fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchMeta {
    /// Final HTTP status code after redirects
    pub status_code: u16,
    /// Final URL after redirects
    pub final_url: String,
    /// Content-Type header, when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Wall-clock fetch time in milliseconds
    pub elapsed_ms: u64,
    /// First `<title>` tag content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_title: Option<String>,
    /// Whether structured-data markup was detected
    pub structured_data: bool,
}

/// Metadata captured by a DNS TXT lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsMeta {
    /// The fully-qualified name that was queried
    pub lookup_name: String,
    /// Whether any TXT record exists at the name
    pub record_found: bool,
    /// Whether a record contained the recognized marker
    pub marker_found: bool,
    /// The raw record strings
    pub records: Vec<String>,
}

/// One organic search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Result title
    pub title: String,
    /// Result URL
    pub url: String,
    /// Result snippet, when the provider returns one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

/// The uniform evidence envelope every probe returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeEvidence {
    /// Target attempted (URL, DNS name, or search endpoint)
    pub target: String,
    /// Acquisition method
    pub kind: ProbeKind,
    /// Literal queries issued (search probes only)
    #[serde(default)]
    pub queries: Vec<String>,
    /// HTTP fetch metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch: Option<FetchMeta>,
    /// DNS lookup metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns: Option<DnsMeta>,
    /// Organic search hits, rank order preserved
    #[serde(default)]
    pub hits: Vec<SearchHit>,
    /// Raw byte sample kept for auditing (lossy UTF-8, capped)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample: Option<String>,
    /// SHA-256 of the fetched body, for change detection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
    /// The failure triple; `None` on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<ProbeFailure>,
}

impl ProbeEvidence {
    /// Successful HTTP probe.
    #[must_use]
    pub fn http_success(
        target: impl Into<String>,
        fetch: FetchMeta,
        sample: Option<String>,
        content_hash: Option<String>,
    ) -> Self {
        Self {
            target: target.into(),
            kind: ProbeKind::Http,
            queries: Vec::new(),
            fetch: Some(fetch),
            dns: None,
            hits: Vec::new(),
            sample,
            content_hash,
            failure: None,
        }
    }

    /// Successful DNS probe (including "no record found").
    #[must_use]
    pub fn dns_success(target: impl Into<String>, dns: DnsMeta) -> Self {
        Self {
            target: target.into(),
            kind: ProbeKind::Dns,
            queries: Vec::new(),
            fetch: None,
            dns: Some(dns),
            hits: Vec::new(),
            sample: None,
            content_hash: None,
            failure: None,
        }
    }

    /// Successful search probe (including "zero hits").
    #[must_use]
    pub fn search_success(
        target: impl Into<String>,
        queries: Vec<String>,
        hits: Vec<SearchHit>,
    ) -> Self {
        Self {
            target: target.into(),
            kind: ProbeKind::Search,
            queries,
            fetch: None,
            dns: None,
            hits,
            sample: None,
            content_hash: None,
            failure: None,
        }
    }

    /// Failed probe of any kind.
    #[must_use]
    pub fn failed(
        target: impl Into<String>,
        kind: ProbeKind,
        queries: Vec<String>,
        failure: ProbeFailure,
    ) -> Self {
        Self {
            target: target.into(),
            kind,
            queries,
            fetch: None,
            dns: None,
            hits: Vec::new(),
            sample: None,
            content_hash: None,
            failure: Some(failure),
        }
    }

    /// Whether the probe ran to completion.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.failure.is_none()
    }

    /// The failure code, if the probe failed.
    #[must_use]
    pub fn error_code(&self) -> Option<ProbeErrorCode> {
        self.failure.as_ref().map(|f| f.code)
    }
}
