//! Footprint Probe - Evidence acquisition executors.
//!
//! This crate provides one executor per evidence-acquisition method: HTTP
//! crawl, DNS TXT lookup, and third-party organic-search lookup. Each wraps
//! a single external call with a bounded timeout and structured error
//! capture, and all three return the same [`ProbeEvidence`] envelope so the
//! classifier never cares which wire the evidence came over.
//!
//! # Architecture
//!
//! - **Envelope** ([`evidence`]): The uniform probe result with an
//!   exactly-one-of success/failure invariant
//! - **HTTP** ([`http`]): reqwest-based page fetch with title, structured-data
//!   and content-hash capture
//! - **DNS** ([`dns`]): hickory-resolver TXT lookups with marker detection
//! - **Search** ([`search`]): organic-search API client plus the
//!   [`CredentialProvider`] seam
//! - **Traits** ([`prober`]): object-safe probe traits and the [`ProberSet`]
//!   bundle the orchestrator injects
//!
//! Probe failures are data, not `Err`: a probe that times out still returns
//! an envelope, with the failure triple populated. `Result` is reserved for
//! construction problems (bad client config, credential store I/O).

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod dns;
pub mod error;
pub mod evidence;
pub mod http;
pub mod prober;
pub mod search;

// Re-export commonly used types
pub use dns::DnsProber;
pub use error::{ProbeError, Result};
pub use evidence::{
    DnsMeta, FetchMeta, ProbeErrorCode, ProbeEvidence, ProbeFailure, SearchHit,
};
pub use http::HttpProber;
pub use prober::{DnsProbe, HttpProbe, ProberSet, SearchProbe};
pub use search::{CredentialProvider, SearchCredentials, SearchProber, StaticCredentialProvider};
