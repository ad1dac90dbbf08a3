//! Probe construction and infrastructure errors.
//!
//! Runtime probe failures (timeouts, blocks, resolution errors) are carried
//! inside the evidence envelope; this type covers the cases where a prober
//! cannot be built or a collaborator cannot be reached at all.

use thiserror::Error;

/// Probe infrastructure errors.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Failed to construct the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// Credential store lookup failed (distinct from "not configured").
    #[error("credential lookup failed: {0}")]
    Credentials(String),

    /// Invalid probe configuration value.
    #[error("invalid probe configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for probe operations.
pub type Result<T> = std::result::Result<T, ProbeError>;
