use footprint_core::FootprintError;
use thiserror::Error;

/// Scan orchestration errors.
///
/// These abort scan startup or recording; individual probe failures are
/// data inside the evidence envelope and never surface here.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("invalid scan target: {0}")]
    InvalidTarget(String),

    #[error("catalog error: {0}")]
    Catalog(#[from] footprint_catalog::CatalogError),

    #[error("probe setup error: {0}")]
    Probe(#[from] footprint_probe::ProbeError),

    #[error("database error: {0}")]
    Database(#[from] footprint_db::DatabaseError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("core error: {0}")]
    Core(#[from] FootprintError),
}

pub type Result<T> = std::result::Result<T, ScanError>;
