//! Footprint Engine - The outward-facing audit API.
//!
//! This crate wires the catalog, probes, scanner, scorer and persistence
//! into one entry point. Callers hand it a target domain and get back a
//! scan id, a weighted score and ranked recommendations; everything else
//! (rendering, scheduling, credential management) lives outside.
//!
//! # Architecture
//!
//! The engine follows the orchestrator pattern: a single owner of the
//! collaborators that all outward calls route through:
//!
//! - **Scans**: `run_scan` (background) / `execute_scan` (awaited)
//! - **Scores**: `score_scan` recomputes fresh from persisted evidence;
//!   `score_evidence` scores an in-memory evidence set
//! - **Recommendations**: `top_recommendations` renders the ranked
//!   opportunity list as action strings
//! - **Profiles**: the [`ProfileProducer`] seam supplies brand identity and
//!   relevance weights; a deterministic fallback ships here, LLM-backed
//!   producers stay external
//!
//! # Example
//!
//! ```rust,ignore
//! use footprint_engine::FootprintEngine;
//! use footprint_core::ScanMode;
//!
//! let engine = FootprintEngine::new(config, db)?;
//! engine.initialize().await?;
//!
//! let scan_id = engine.run_scan("example.com", ScanMode::CrawlOnly).await?;
//! let score = engine.score_scan(&scan_id, &profile).await?;
//! let actions = engine.top_recommendations(&score, 10);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod engine;
pub mod error;
pub mod producer;

// Re-export commonly used types
pub use engine::FootprintEngine;
pub use error::{EngineError, Result};
pub use producer::{DeterministicProfileProducer, ProfileProducer};

// Re-export the score types callers consume
pub use footprint_score::{FootprintScore, Grade, Opportunity};
