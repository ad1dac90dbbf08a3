//! Engine error types.

use thiserror::Error;

/// Errors surfaced by the outward-facing engine API.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Catalog construction or lookup failed.
    #[error("catalog error: {0}")]
    Catalog(#[from] footprint_catalog::CatalogError),

    /// Probe setup failed.
    #[error("probe error: {0}")]
    Probe(#[from] footprint_probe::ProbeError),

    /// Scan orchestration failed.
    #[error("scan error: {0}")]
    Scan(#[from] footprint_scanner::ScanError),

    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] footprint_db::DatabaseError),

    /// Profile production or validation failed.
    #[error("profile error: {0}")]
    Profile(String),

    /// Requested scan does not exist.
    #[error("scan not found: {0}")]
    ScanNotFound(String),

    /// JSON serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Core validation failed.
    #[error("core error: {0}")]
    Core(#[from] footprint_core::FootprintError),
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
