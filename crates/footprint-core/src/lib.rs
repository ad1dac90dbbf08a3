//! Footprint Core - Foundation crate for the Footprint audit engine.
//!
//! This crate provides shared types, error handling, and configuration
//! management that all other Footprint crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Shared newtypes and enums (`SurfaceKey`, `ScanId`, `Timestamp`)
//! - [`evidence`] - The classified-evidence model shared by scanner, db and scorer
//! - [`profile`] - The externally-produced business profile consumed by the engine
//!
//! # Example
//!
//! ```rust
//! use footprint_core::{AppConfig, SurfaceKey};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! assert_eq!(config.scanning.batch_size, 3);
//!
//! let key = SurfaceKey::new("linkedin")?;
//! assert_eq!(key.as_str(), "linkedin");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod evidence;
pub mod profile;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, DatabaseConfig, ScanningConfig, SearchConfig};
pub use error::{ConfigError, ConfigResult, FootprintError, Result};
pub use evidence::{EvidenceItem, ScanResultStatus, SurfaceEvidence, SurfaceStatus};
pub use profile::{BusinessProfile, ProfileConfidence};
pub use types::{ProbeKind, ScanId, ScanMode, ScanStatus, SurfaceKey, Timestamp};
