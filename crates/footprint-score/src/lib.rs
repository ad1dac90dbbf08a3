//! Footprint Score - Weighted scoring over classified evidence.
//!
//! Computes per-surface, per-category and overall scores with a letter
//! grade, plus the ranked remediation opportunities. Everything here is a
//! pure function of catalog + profile + evidence: same inputs, same score,
//! no clocks, no persistence.
//!
//! # Example
//!
//! ```rust
//! use footprint_catalog::SurfaceCatalog;
//! use footprint_core::BusinessProfile;
//! use footprint_score::compute_score;
//!
//! let catalog = SurfaceCatalog::builtin();
//! let profile = BusinessProfile::new("Acme Corp");
//!
//! let score = compute_score(&catalog, &profile, &[]);
//! // Nothing probed yet: everything scores zero
//! assert_eq!(score.percentage, 0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod opportunity;
pub mod score;

// Re-export commonly used types
pub use opportunity::{recommendations, top_opportunities, Opportunity, DEFAULT_OPPORTUNITY_LIMIT};
pub use score::{compute_score, CategoryScore, FootprintScore, Grade, SurfaceScore};
