// Copyright 2025 Cowboy AI, LLC.

//! Discipline registry rehydrated from the saved Level-1 folder

use std::collections::BTreeMap;

use tracing::debug;

use crate::hierarchy::{find_top_level_folder, NamedSet, SavedItem};

/// Discipline name → its persisted Level-1 set
///
/// Always reflects what the host actually saved, never what a build intended
/// to save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisciplineRegistry {
    sets: BTreeMap<String, NamedSet>,
}

impl DisciplineRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every discipline
    pub fn reset(&mut self) {
        self.sets.clear();
    }

    /// Replace the contents with the sets saved under `folder_name`
    ///
    /// Returns the number of disciplines loaded. A missing folder leaves the
    /// registry empty. When two sets share a name the later one wins.
    pub fn reload(&mut self, items: &[SavedItem], folder_name: &str) -> usize {
        self.reset();
        if let Some(folder) = find_top_level_folder(items, folder_name) {
            for set in folder.sets() {
                self.sets.insert(set.name.clone(), set.clone());
            }
        }
        debug!(folder = folder_name, loaded = self.sets.len(), "registry reloaded");
        self.sets.len()
    }

    /// Saved set for a discipline
    pub fn get(&self, discipline: &str) -> Option<&NamedSet> {
        self.sets.get(discipline)
    }

    /// True when the discipline is known
    pub fn contains(&self, discipline: &str) -> bool {
        self.sets.contains_key(discipline)
    }

    /// Discipline names, sorted
    pub fn names(&self) -> Vec<String> {
        self.sets.keys().cloned().collect()
    }

    /// Number of disciplines
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// True when nothing is registered
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
