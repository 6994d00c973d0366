// Copyright 2025 Cowboy AI, LLC.

//! Host collaborator contract
//!
//! The index never owns the model: element trees, property storage, query
//! evaluation and the saved-set store all belong to the host application. This
//! trait is the narrow surface the index consumes.

mod memory;

pub use memory::InMemoryHost;

use crate::errors::HostError;
use crate::hierarchy::SavedItem;
use crate::identifiers::NodeId;
use crate::model::{Element, PropertyCategory};
use crate::query::ScopedQuery;

/// Access to the host's model tree and saved-set store
#[cfg_attr(test, mockall::automock)]
pub trait ModelHost {
    /// Top-level elements (one per loaded model file)
    fn root_elements(&self) -> Vec<Element>;

    /// Direct children in host order; `None` when the host has no child list
    fn children(&self, element: &Element) -> Option<Vec<Element>>;

    /// Property categories of an element; may fail on host-side access errors
    fn property_categories(&self, element: &Element) -> Result<Vec<PropertyCategory>, HostError>;

    /// Evaluate a query against the current model
    fn execute_query(&self, query: &ScopedQuery) -> Result<Vec<Element>, HostError>;

    /// Saved folders and sets at the top of the host's store
    fn persisted_items(&self) -> Vec<SavedItem>;

    /// Commit `item` and its subtree under `parent` (store root when `None`)
    ///
    /// An item whose id is already present under `parent` is replaced.
    fn persist(&mut self, parent: Option<NodeId>, item: &SavedItem) -> Result<(), HostError>;
}
