//! Immutable in-memory surface catalog with query support.

use crate::{
    definition::{SurfaceCategory, SurfaceDefinition},
    error::{CatalogError, Result},
    seed,
};
use footprint_core::SurfaceKey;
use std::collections::HashMap;
use tracing::info;

/// Immutable catalog of audit surfaces.
///
/// Constructed once (from the built-in seed or loaded definitions) and then
/// only read. Callers share it via `Arc`; there is deliberately no runtime
/// mutation so that scoring stays a pure function of its inputs.
#[derive(Debug, Clone)]
pub struct SurfaceCatalog {
    /// Definitions in stable catalog order
    surfaces: Vec<SurfaceDefinition>,
    /// Key -> position in `surfaces`
    index: HashMap<SurfaceKey, usize>,
}

impl SurfaceCatalog {
    /// Build the catalog from the built-in seed definitions.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_definitions(seed::builtin_definitions())
            .expect("built-in catalog definitions are valid")
    }

    /// Build a catalog from explicit definitions.
    ///
    /// Validates every definition and rejects duplicate keys. Definition
    /// order is preserved as the catalog order.
    pub fn from_definitions(definitions: Vec<SurfaceDefinition>) -> Result<Self> {
        let mut index = HashMap::with_capacity(definitions.len());

        for (pos, definition) in definitions.iter().enumerate() {
            definition.validate()?;

            if index.insert(definition.key.clone(), pos).is_some() {
                return Err(CatalogError::DuplicateKey {
                    surface_key: definition.key.to_string(),
                });
            }
        }

        info!(count = definitions.len(), "constructed surface catalog");

        Ok(Self {
            surfaces: definitions,
            index,
        })
    }

    /// Get a surface definition by key.
    ///
    /// # Errors
    /// Returns error if the surface is not in the catalog.
    pub fn get(&self, key: &SurfaceKey) -> Result<&SurfaceDefinition> {
        self.index
            .get(key)
            .map(|&pos| &self.surfaces[pos])
            .ok_or_else(|| CatalogError::NotFound {
                surface_key: key.to_string(),
            })
    }

    /// All surface definitions in catalog order.
    #[must_use]
    pub fn list(&self) -> &[SurfaceDefinition] {
        &self.surfaces
    }

    /// Surfaces belonging to one category, in catalog order.
    #[must_use]
    pub fn by_category(&self, category: SurfaceCategory) -> Vec<&SurfaceDefinition> {
        self.surfaces
            .iter()
            .filter(|def| def.category == category)
            .collect()
    }

    /// Whether a surface exists in the catalog.
    #[must_use]
    pub fn contains(&self, key: &SurfaceKey) -> bool {
        self.index.contains_key(key)
    }

    /// Number of surfaces in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Sum of base points across the whole catalog (the percentage
    /// denominator before relevance weighting).
    #[must_use]
    pub fn total_base_points(&self) -> u32 {
        self.surfaces.iter().map(|d| d.base_points).sum()
    }

    /// Sum of base points for one category.
    #[must_use]
    pub fn category_base_points(&self, category: SurfaceCategory) -> u32 {
        self.surfaces
            .iter()
            .filter(|d| d.category == category)
            .map(|d| d.base_points)
            .sum()
    }
}
