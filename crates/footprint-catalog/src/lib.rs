//! Footprint Catalog - Surface definition system for presence auditing.
//!
//! This crate provides the core types and functionality for managing audit
//! surface definitions: the fixed registry of external channels (owned
//! website, DNS trust records, search visibility, social platforms, review
//! sites, authority mentions) a scan probes for a brand.
//!
//! # Architecture
//!
//! - **Definition Types** ([`definition`]): Strongly-typed surface metadata and detection rules
//! - **Seed** ([`seed`]): The built-in catalog (the fixed scoring denominator)
//! - **Catalog** ([`catalog`]): Immutable in-memory catalog with query support
//! - **Loader** ([`loader`]): TOML definition loading from a `surface-definitions/` directory
//! - **Errors** ([`error`]): Catalog-specific error types
//!
//! # Example
//!
//! ```rust
//! use footprint_catalog::SurfaceCatalog;
//! use footprint_core::SurfaceKey;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = SurfaceCatalog::builtin();
//!
//! let key = SurfaceKey::new("linkedin")?;
//! let surface = catalog.get(&key)?;
//!
//! println!("Surface: {}", surface.label);
//! println!("Category: {:?}", surface.category);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod catalog;
pub mod definition;
pub mod error;
pub mod loader;
pub mod seed;

// Re-export commonly used types
pub use catalog::SurfaceCatalog;
pub use definition::{
    DetectionMethod, Guidance, RelevanceTier, SurfaceCategory, SurfaceDefinition,
};
pub use error::{CatalogError, Result};
pub use loader::CatalogLoader;
