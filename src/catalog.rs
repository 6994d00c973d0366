// Copyright 2025 Cowboy AI, LLC.

//! Catalog of property categories and attribute names seen during a scan

use std::collections::{BTreeMap, BTreeSet};

/// Category display name → attribute display names observed
///
/// Rebuilt on every scan and used only to offer choices to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyCatalog {
    entries: BTreeMap<String, BTreeSet<String>>,
}

impl PropertyCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Note that a category exists, even if it has no properties
    pub fn record_category(&mut self, category: &str) {
        if !self.entries.contains_key(category) {
            self.entries.insert(category.to_string(), BTreeSet::new());
        }
    }

    /// Note one attribute within a category
    pub fn record(&mut self, category: &str, attribute: &str) {
        self.record_category(category);
        if let Some(attributes) = self.entries.get_mut(category) {
            attributes.insert(attribute.to_string());
        }
    }

    /// Fold another catalog into this one
    pub fn merge(&mut self, other: PropertyCatalog) {
        for (category, attributes) in other.entries {
            self.entries.entry(category).or_default().extend(attributes);
        }
    }

    /// Category names, sorted
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Attribute names of a category, sorted; empty when unknown
    pub fn attributes(&self, category: &str) -> Vec<&str> {
        self.entries
            .get(category)
            .map(|attributes| attributes.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// True when the pair was observed
    pub fn contains(&self, category: &str, attribute: &str) -> bool {
        self.entries
            .get(category)
            .is_some_and(|attributes| attributes.contains(attribute))
    }

    /// Number of categories
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget everything
    pub fn reset(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_are_sorted_and_deduplicated() {
        let mut catalog = PropertyCatalog::new();
        catalog.record("Item", "Name");
        catalog.record("Element", "Workset");
        catalog.record("Element", "Category");
        catalog.record("Element", "Category");
        catalog.record_category("Material");

        assert_eq!(catalog.categories().collect::<Vec<_>>(), vec!["Element", "Item", "Material"]);
        assert_eq!(catalog.attributes("Element"), vec!["Category", "Workset"]);
        assert!(catalog.attributes("Material").is_empty());
        assert!(catalog.attributes("Unknown").is_empty());
        assert!(catalog.contains("Item", "Name"));
    }

    #[test]
    fn test_merge_and_reset() {
        let mut a = PropertyCatalog::new();
        a.record("Element", "Category");
        let mut b = PropertyCatalog::new();
        b.record("Element", "Type");
        b.record("Item", "Name");

        a.merge(b);
        assert_eq!(a.len(), 2);
        assert_eq!(a.attributes("Element"), vec!["Category", "Type"]);

        a.reset();
        assert!(a.is_empty());
    }
}
