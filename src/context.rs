// Copyright 2025 Cowboy AI, LLC.

//! Engine-owned discovery state

use crate::catalog::PropertyCatalog;
use crate::registry::DisciplineRegistry;

/// State shared between engine operations
///
/// Each discovery operation resets the part it rebuilds.
#[derive(Debug, Clone, Default)]
pub struct IndexContext {
    /// Disciplines known from the saved Level-1 folder
    pub registry: DisciplineRegistry,
    /// Categories and attributes seen by the last property scan
    pub catalog: PropertyCatalog,
}

impl IndexContext {
    /// Empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget registry and catalog
    pub fn reset(&mut self) {
        self.registry.reset();
        self.catalog.reset();
    }
}
