// Copyright 2025 Cowboy AI, LLC.

//! In-memory model host
//!
//! Holds an element arena with property sets, evaluates [`ScopedQuery`]s and
//! stores saved folders and sets. Property access failures and query
//! failures can be injected per element or globally.

use std::collections::HashMap;

use indexmap::IndexSet;

use crate::errors::{HostError, IndexError, IndexResult};
use crate::hierarchy::SavedItem;
use crate::host::ModelHost;
use crate::identifiers::{ElementId, NodeId};
use crate::lookup::select_value;
use crate::model::{Element, Property, PropertyCategory, PropertyValue};
use crate::query::{Selection, ScopedQuery, ITEM_CATEGORY, NAME_ATTRIBUTE};
use crate::walker::SubtreeWalker;

#[derive(Debug, Clone)]
struct ElementRecord {
    element: Element,
    children: Option<Vec<ElementId>>,
    categories: Vec<PropertyCategory>,
    access_failure: Option<String>,
}

/// Model host backed by plain collections
#[derive(Debug, Clone, Default)]
pub struct InMemoryHost {
    elements: HashMap<ElementId, ElementRecord>,
    roots: Vec<ElementId>,
    saved: Vec<SavedItem>,
    persist_calls: usize,
    query_failure: Option<String>,
}

impl InMemoryHost {
    /// Create an empty host
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root element; its name is stored as `Item/Name`
    pub fn add_root(&mut self, name: impl Into<String>) -> ElementId {
        let id = self.insert(name.into());
        self.roots.push(id);
        id
    }

    /// Append a child below `parent`; its name is stored as `Item/Name`
    pub fn add_child(&mut self, parent: ElementId, name: impl Into<String>) -> IndexResult<ElementId> {
        if !self.elements.contains_key(&parent) {
            return Err(unknown(parent));
        }
        let id = self.insert(name.into());
        self.record_mut(parent)?
            .children
            .get_or_insert_with(Vec::new)
            .push(id);
        Ok(id)
    }

    /// Set `category/attribute`, creating either when missing
    pub fn set_property(
        &mut self,
        id: ElementId,
        category: &str,
        attribute: &str,
        value: impl Into<PropertyValue>,
    ) -> IndexResult<()> {
        let record = self.record_mut(id)?;
        let index = match record.categories.iter().position(|c| c.answers_to(category)) {
            Some(index) => index,
            None => {
                record.categories.push(PropertyCategory::new(category));
                record.categories.len() - 1
            }
        };

        let properties = &mut record.categories[index].properties;
        let value = value.into();
        match properties.iter_mut().find(|p| p.answers_to(attribute)) {
            Some(property) => property.value = value,
            None => properties.push(Property::new(attribute, value)),
        }
        Ok(())
    }

    /// Attach a whole category
    pub fn add_category(&mut self, id: ElementId, category: PropertyCategory) -> IndexResult<()> {
        self.record_mut(id)?.categories.push(category);
        Ok(())
    }

    /// Make every property read on `id` fail with `reason`
    pub fn fail_property_access(&mut self, id: ElementId, reason: impl Into<String>) -> IndexResult<()> {
        self.record_mut(id)?.access_failure = Some(reason.into());
        Ok(())
    }

    /// Make every query fail with `reason`; `None` restores normal evaluation
    pub fn fail_queries(&mut self, reason: Option<String>) {
        self.query_failure = reason;
    }

    /// Handle for an element
    pub fn element(&self, id: ElementId) -> Option<Element> {
        self.elements.get(&id).map(|record| record.element.clone())
    }

    /// Saved folders and sets at the top of the store
    pub fn saved_items(&self) -> &[SavedItem] {
        &self.saved
    }

    /// Number of successful `persist` calls
    pub fn persist_count(&self) -> usize {
        self.persist_calls
    }

    fn insert(&mut self, name: String) -> ElementId {
        let id = ElementId::new();
        let categories =
            vec![PropertyCategory::new(ITEM_CATEGORY).with_property(Property::new(NAME_ATTRIBUTE, name.clone()))];
        self.elements.insert(
            id,
            ElementRecord {
                element: Element::new(id, name),
                children: None,
                categories,
                access_failure: None,
            },
        );
        id
    }

    fn record_mut(&mut self, id: ElementId) -> IndexResult<&mut ElementRecord> {
        self.elements.get_mut(&id).ok_or_else(|| unknown(id))
    }

    fn bases(&self, selection: &Selection) -> Vec<Element> {
        let ids: &[ElementId] = match selection {
            Selection::All => &self.roots,
            Selection::Elements(ids) => ids,
        };
        ids.iter().filter_map(|id| self.element(*id)).collect()
    }
}

fn unknown(id: ElementId) -> IndexError {
    IndexError::validation(format!("unknown element {id}"))
}

fn upsert(items: &mut Vec<SavedItem>, item: &SavedItem) {
    match items.iter().position(|existing| existing.id() == item.id()) {
        Some(index) => items[index] = item.clone(),
        None => items.push(item.clone()),
    }
}

fn find_folder_children(items: &mut [SavedItem], id: NodeId) -> Option<&mut Vec<SavedItem>> {
    for item in items.iter_mut() {
        if let SavedItem::Folder(folder) = item {
            if folder.id == id {
                return Some(&mut folder.children);
            }
            if let Some(children) = find_folder_children(&mut folder.children, id) {
                return Some(children);
            }
        }
    }
    None
}

impl ModelHost for InMemoryHost {
    fn root_elements(&self) -> Vec<Element> {
        self.roots.iter().filter_map(|id| self.element(*id)).collect()
    }

    fn children(&self, element: &Element) -> Option<Vec<Element>> {
        let record = self.elements.get(&element.id)?;
        record
            .children
            .as_ref()
            .map(|ids| ids.iter().filter_map(|id| self.element(*id)).collect())
    }

    fn property_categories(&self, element: &Element) -> Result<Vec<PropertyCategory>, HostError> {
        let record = self
            .elements
            .get(&element.id)
            .ok_or_else(|| HostError::AccessDenied(format!("unknown element {}", element.id)))?;
        match &record.access_failure {
            Some(reason) => Err(HostError::AccessDenied(reason.clone())),
            None => Ok(record.categories.clone()),
        }
    }

    fn execute_query(&self, query: &ScopedQuery) -> Result<Vec<Element>, HostError> {
        if let Some(reason) = &self.query_failure {
            return Err(HostError::QueryFailed(reason.clone()));
        }

        let matcher = query
            .condition
            .as_ref()
            .map(|condition| condition.compile().map(|m| (condition, m)))
            .transpose()
            .map_err(|e| HostError::QueryFailed(e.to_string()))?;

        let mut seen = IndexSet::new();
        let mut matched = Vec::new();
        for base in self.bases(&query.selection) {
            for element in SubtreeWalker::new(self, base) {
                if !seen.insert(element.id) {
                    continue;
                }
                let keep = match &matcher {
                    None => true,
                    Some((condition, matcher)) => self
                        .property_categories(&element)
                        .ok()
                        .and_then(|categories| select_value(&categories, &condition.attribute))
                        .is_some_and(|value| matcher.matches(&value)),
                };
                if keep {
                    matched.push(element);
                }
            }
        }
        Ok(matched)
    }

    fn persisted_items(&self) -> Vec<SavedItem> {
        self.saved.clone()
    }

    fn persist(&mut self, parent: Option<NodeId>, item: &SavedItem) -> Result<(), HostError> {
        match parent {
            None => upsert(&mut self.saved, item),
            Some(parent) => {
                let children = find_folder_children(&mut self.saved, parent)
                    .ok_or_else(|| HostError::PersistFailed(format!("no saved folder {parent}")))?;
                upsert(children, item);
            }
        }
        self.persist_calls += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::AttributeRef;
    use crate::hierarchy::FolderNode;
    use crate::query::{Condition, QueryBuilder};
    use pretty_assertions::assert_eq;

    fn names(elements: &[Element]) -> Vec<&str> {
        elements.iter().map(|e| e.display_name.as_str()).collect()
    }

    #[test]
    fn test_names_are_item_properties() {
        let mut host = InMemoryHost::new();
        let root = host.add_root("Tower_ARCH_01");
        let element = host.element(root).unwrap();

        let categories = host.property_categories(&element).unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].display_name, "Item");
        assert_eq!(categories[0].properties[0].value, PropertyValue::from("Tower_ARCH_01"));
    }

    #[test]
    fn test_set_property_overwrites_in_place() {
        let mut host = InMemoryHost::new();
        let id = host.add_root("Wall");
        host.set_property(id, "Element", "Category", "Walls").unwrap();
        host.set_property(id, "Element", "Category", "Doors").unwrap();
        let element = host.element(id).unwrap();

        let categories = host.property_categories(&element).unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[1].properties.len(), 1);
        assert_eq!(categories[1].properties[0].value, PropertyValue::from("Doors"));
    }

    #[test]
    fn test_unknown_parent_is_rejected() {
        let mut host = InMemoryHost::new();
        assert!(host.add_child(ElementId::new(), "orphan").is_err());
        assert!(host.fail_property_access(ElementId::new(), "x").is_err());
    }

    #[test]
    fn test_wildcard_query_over_all_roots() {
        let mut host = InMemoryHost::new();
        let arch = host.add_root("Tower_ARCH_01");
        host.add_child(arch, "Wall").unwrap();
        host.add_root("Tower_STRC_01");
        host.add_root("annex_arch_02");

        let found = host.execute_query(&ScopedQuery::name_contains("_ARCH_")).unwrap();
        assert_eq!(names(&found), vec!["Tower_ARCH_01", "annex_arch_02"]);
    }

    #[test]
    fn test_scoped_query_stays_inside_selection() {
        let mut host = InMemoryHost::new();
        let category = AttributeRef::new("Element", "Category").unwrap();
        let mut walls = Vec::new();
        for root_name in ["Tower_ARCH_01", "Tower_STRC_01"] {
            let root = host.add_root(root_name);
            let wall = host.add_child(root, format!("{root_name} wall")).unwrap();
            host.set_property(wall, "Element", "Category", "Walls").unwrap();
            walls.push(wall);
        }

        let arch = host.execute_query(&ScopedQuery::name_contains("_ARCH_")).unwrap();
        let scoped = host.execute_query(&QueryBuilder::scoped(&arch, &category, "Walls")).unwrap();
        let unscoped = host
            .execute_query(&ScopedQuery::all().with_condition(Condition::equals(category, "Walls")))
            .unwrap();

        assert_eq!(scoped.iter().map(|e| e.id).collect::<Vec<_>>(), vec![walls[0]]);
        assert_eq!(unscoped.len(), 2);
    }

    #[test]
    fn test_overlapping_selection_is_deduplicated() {
        let mut host = InMemoryHost::new();
        let root = host.add_root("R");
        let child = host.add_child(root, "C").unwrap();
        let query = ScopedQuery {
            selection: Selection::Elements(vec![root, child]),
            ..ScopedQuery::all()
        };
        assert_eq!(host.execute_query(&query).unwrap().len(), 2);
    }

    #[test]
    fn test_unreadable_elements_never_match() {
        let mut host = InMemoryHost::new();
        let id = host.add_root("Tower_ARCH_01");
        host.fail_property_access(id, "locked").unwrap();
        assert!(host.execute_query(&ScopedQuery::name_contains("_ARCH_")).unwrap().is_empty());
    }

    #[test]
    fn test_injected_query_failure() {
        let mut host = InMemoryHost::new();
        host.fail_queries(Some("engine offline".to_string()));
        assert_eq!(
            host.execute_query(&ScopedQuery::all()),
            Err(HostError::QueryFailed("engine offline".to_string()))
        );
    }

    #[test]
    fn test_persist_upserts_by_id() {
        let mut host = InMemoryHost::new();
        let mut top = FolderNode::new("2. CLASH SETS").unwrap();
        host.persist(None, &SavedItem::Folder(top.clone())).unwrap();

        let mut sub = FolderNode::new("ARCH").unwrap();
        sub.add_leaf("Walls", ScopedQuery::all()).unwrap();
        host.persist(Some(top.id), &SavedItem::Folder(sub.clone())).unwrap();
        sub.add_leaf("Doors", ScopedQuery::all()).unwrap();
        host.persist(Some(top.id), &SavedItem::Folder(sub.clone())).unwrap();

        top.children.push(SavedItem::Folder(sub));
        assert_eq!(host.saved_items(), &[SavedItem::Folder(top)]);
        assert_eq!(host.persist_count(), 3);
    }

    #[test]
    fn test_persist_into_missing_parent_fails() {
        let mut host = InMemoryHost::new();
        let folder = SavedItem::Folder(FolderNode::new("ARCH").unwrap());
        let err = host.persist(Some(NodeId::new()), &folder).unwrap_err();
        assert!(matches!(err, HostError::PersistFailed(_)));
        assert_eq!(host.persist_count(), 0);
    }
}
