//! Footprint Scanner - Scan orchestration over the surface catalog.
//!
//! This crate turns a target domain into a persisted scan: it builds
//! queries from surface templates, triages which surfaces can be probed at
//! all, runs the eligible probes in small rate-limited batches, classifies
//! the evidence, and records one result row per surface.
//!
//! # Features
//!
//! - Static triage before any network call (manual / provider-gated /
//!   missing-domain surfaces never probe)
//! - Batched probing with an inter-batch pause for third-party rate limits
//! - Per-surface failure isolation: one bad probe never fails its siblings
//! - Forward-only status transitions within a scan
//! - Scan-scoped cancellation that lets in-flight probes finish and be
//!   recorded
//!
//! # Example
//!
//! ```rust,ignore
//! use footprint_scanner::ScanOrchestrator;
//! use std::sync::Arc;
//!
//! let orchestrator = ScanOrchestrator::new(catalog, probers, db, config);
//! let scan_id = orchestrator.start_scan("example.com", mode, &profile).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

#[allow(missing_docs)]
pub mod classifier;
pub mod error;
pub mod orchestrator;
#[allow(missing_docs)]
pub mod query_builder;

// Re-export commonly used types
pub use classifier::{classify, root_label};
pub use error::{Result, ScanError};
pub use orchestrator::{EvidencePayload, ScanOrchestrator, SurfaceOutcome};
pub use query_builder::build_queries;
