// Copyright 2025 Cowboy AI, LLC.

//! Identifier types for host elements and saved hierarchy nodes

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Element ID - identity of a node in the host's model tree
///
/// The host assigns these; the index only copies them into query selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Create a new random element ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from a UUID
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ElementId> for Uuid {
    fn from(id: ElementId) -> Self {
        id.0
    }
}

/// Node ID - identity of a saved folder or search set
///
/// Assigned when the node is built in memory and kept when the host persists
/// it, so a later commit of the same node replaces rather than duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from a UUID
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<NodeId> for Uuid {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_and_round_trip_uuid() {
        let a = NodeId::new();
        let b = NodeId::new();
        assert_ne!(a, b);

        let uuid = Uuid::new_v4();
        let element = ElementId::from_uuid(uuid);
        assert_eq!(element.as_uuid(), &uuid);
        assert_eq!(Uuid::from(element), uuid);
        assert_eq!(element.to_string(), uuid.to_string());
    }
}
