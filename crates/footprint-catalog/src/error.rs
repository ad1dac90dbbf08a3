//! Catalog error types.

use thiserror::Error;

/// Catalog-specific errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Surface not found in the catalog.
    #[error("surface not found: {surface_key}")]
    NotFound {
        /// The key that was looked up
        surface_key: String,
    },

    /// Two definitions share the same key.
    #[error("duplicate surface key: {surface_key}")]
    DuplicateKey {
        /// The offending key
        surface_key: String,
    },

    /// Definition failed validation.
    #[error("invalid surface definition '{surface_key}': {reason}")]
    ValidationError {
        /// The offending surface
        surface_key: String,
        /// What was wrong
        reason: String,
    },

    /// Definitions directory missing or not a directory.
    #[error("definitions directory not found: {path}")]
    DirectoryNotFound {
        /// The path that was checked
        path: String,
    },

    /// Failed to parse a TOML definition file.
    #[error("failed to parse definition TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// I/O error while loading definitions.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
