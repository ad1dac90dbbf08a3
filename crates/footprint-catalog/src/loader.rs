//! Surface definition loading from TOML files.
//!
//! The built-in seed covers the standard catalog; deployments that audit
//! extra surfaces drop TOML files into a `surface-definitions/` directory
//! and load them here.

use crate::{
    definition::SurfaceDefinition,
    error::{CatalogError, Result},
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Loader for surface definitions from TOML files.
pub struct CatalogLoader {
    /// Base directory containing surface definitions
    definitions_dir: PathBuf,
}

impl CatalogLoader {
    /// Create a new loader with the given definitions directory.
    ///
    /// # Errors
    /// Returns error if the directory doesn't exist.
    pub fn new(definitions_dir: impl Into<PathBuf>) -> Result<Self> {
        let definitions_dir = definitions_dir.into();

        if !definitions_dir.is_dir() {
            return Err(CatalogError::DirectoryNotFound {
                path: definitions_dir.display().to_string(),
            });
        }

        Ok(Self { definitions_dir })
    }

    /// Load all surface definitions from the definitions directory.
    ///
    /// Invalid definitions are logged as warnings and skipped.
    ///
    /// # Errors
    /// Returns error if the directory can't be read.
    pub fn load_all(&self) -> Result<Vec<SurfaceDefinition>> {
        let mut definitions = Vec::new();

        Self::walk_and_load(&self.definitions_dir, &mut definitions)?;

        info!(
            count = definitions.len(),
            dir = %self.definitions_dir.display(),
            "loaded surface definitions"
        );

        Ok(definitions)
    }

    /// Recursively walk a directory and load all TOML files.
    fn walk_and_load(dir: &Path, definitions: &mut Vec<SurfaceDefinition>) -> Result<()> {
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.is_dir() {
                Self::walk_and_load(&path, definitions)?;
            } else if path.extension().and_then(|s| s.to_str()) == Some("toml") {
                match Self::load_from_path(&path) {
                    Ok(definition) => {
                        if let Err(e) = definition.validate() {
                            warn!(
                                path = %path.display(),
                                error = %e,
                                "skipping invalid surface definition"
                            );
                            continue;
                        }
                        debug!(
                            surface = %definition.key,
                            path = %path.display(),
                            "loaded surface definition"
                        );
                        definitions.push(definition);
                    }
                    Err(e) => {
                        warn!(
                            path = %path.display(),
                            error = %e,
                            "failed to load surface definition"
                        );
                    }
                }
            }
        }

        Ok(())
    }

    /// Load and parse a single TOML definition file.
    fn load_from_path(path: &Path) -> Result<SurfaceDefinition> {
        let contents = std::fs::read_to_string(path)?;
        let definition = toml::from_str(&contents)?;
        Ok(definition)
    }
}
