// Copyright 2025 Cowboy AI, LLC.

//! Saved folder / search-set hierarchy
//!
//! ```text
//! 1. DISCIPLINES            2. CLASH SETS / 3. CUSTOM SETS
//! ├── ARCH   (set)          ├── ARCH   (folder)
//! ├── STRC   (set)          │   ├── Doors  (set)
//! └── MEP    (set)          │   └── Walls  (set)
//!                           └── MEP    (folder)
//!                               └── Ducts  (set)
//! ```
//!
//! Trees are built in memory and handed to the host one top-level unit at a
//! time. Folder lookup is idempotent; leaf insertion follows a
//! [`LeafCollisionPolicy`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::classifier::DisciplineDefinition;
use crate::errors::{IndexError, IndexResult};
use crate::identifiers::NodeId;
use crate::query::ScopedQuery;

/// What to do when a leaf name already exists in a folder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum LeafCollisionPolicy {
    /// Add the new leaf next to the existing one
    #[default]
    Append,
    /// Put the new leaf in place of the existing one
    Replace,
    /// Keep the existing leaf and drop the new one
    Skip,
}

/// Outcome of inserting a leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafOutcome {
    /// A new sibling was appended
    Added,
    /// An existing leaf was overwritten
    Replaced,
    /// An existing leaf was kept
    Skipped,
}

fn checked_name(name: &str, kind: &str) -> IndexResult<String> {
    if name.trim().is_empty() {
        return Err(IndexError::InvariantViolation(format!(
            "{kind} names cannot be empty"
        )));
    }
    Ok(name.to_string())
}

/// A saved search set: a name and the query it re-runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedSet {
    /// Node identity
    pub id: NodeId,
    /// Name shown in the sets panel
    pub name: String,
    /// Query evaluated when the set is opened
    pub query: ScopedQuery,
}

impl NamedSet {
    /// Create a set, rejecting blank names
    pub fn new(name: &str, query: ScopedQuery) -> IndexResult<Self> {
        Ok(Self {
            id: NodeId::new(),
            name: checked_name(name, "set")?,
            query,
        })
    }
}

/// A folder of sets and sub-folders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderNode {
    /// Node identity
    pub id: NodeId,
    /// Folder name
    pub name: String,
    /// Children in display order
    pub children: Vec<SavedItem>,
}

/// Either kind of saved node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SavedItem {
    /// A folder
    Folder(FolderNode),
    /// A search set
    Set(NamedSet),
}

impl SavedItem {
    /// Node identity
    pub fn id(&self) -> NodeId {
        match self {
            SavedItem::Folder(folder) => folder.id,
            SavedItem::Set(set) => set.id,
        }
    }

    /// Node name
    pub fn name(&self) -> &str {
        match self {
            SavedItem::Folder(folder) => &folder.name,
            SavedItem::Set(set) => &set.name,
        }
    }

    /// The folder, if this is one
    pub fn as_folder(&self) -> Option<&FolderNode> {
        match self {
            SavedItem::Folder(folder) => Some(folder),
            SavedItem::Set(_) => None,
        }
    }

    /// The set, if this is one
    pub fn as_set(&self) -> Option<&NamedSet> {
        match self {
            SavedItem::Set(set) => Some(set),
            SavedItem::Folder(_) => None,
        }
    }
}

impl FolderNode {
    /// Create an empty folder, rejecting blank names
    pub fn new(name: &str) -> IndexResult<Self> {
        Ok(Self {
            id: NodeId::new(),
            name: checked_name(name, "folder")?,
            children: Vec::new(),
        })
    }

    /// Direct sub-folder with exactly this name
    pub fn folder(&self, name: &str) -> Option<&FolderNode> {
        self.children
            .iter()
            .filter_map(SavedItem::as_folder)
            .find(|folder| folder.name == name)
    }

    /// Direct sub-folder with this name, appended if absent
    ///
    /// Calling this repeatedly with the same name returns the same folder.
    pub fn find_or_create_folder(&mut self, name: &str) -> IndexResult<&mut FolderNode> {
        let position = self
            .children
            .iter()
            .position(|child| matches!(child, SavedItem::Folder(f) if f.name == name));

        let index = match position {
            Some(index) => index,
            None => {
                self.children.push(SavedItem::Folder(FolderNode::new(name)?));
                self.children.len() - 1
            }
        };

        match &mut self.children[index] {
            SavedItem::Folder(folder) => Ok(folder),
            SavedItem::Set(set) => Err(IndexError::InvariantViolation(format!(
                "expected folder at {}, found set {}",
                self.name, set.name
            ))),
        }
    }

    /// Append a set without checking for existing names
    pub fn add_leaf(&mut self, name: &str, query: ScopedQuery) -> IndexResult<&NamedSet> {
        self.children.push(SavedItem::Set(NamedSet::new(name, query)?));
        match self.children.last() {
            Some(SavedItem::Set(set)) => Ok(set),
            _ => Err(IndexError::InvariantViolation(format!(
                "set {name} missing after insert"
            ))),
        }
    }

    /// Insert a set following `policy`
    pub fn add_leaf_with_policy(
        &mut self,
        name: &str,
        query: ScopedQuery,
        policy: LeafCollisionPolicy,
    ) -> IndexResult<LeafOutcome> {
        let existing = self
            .children
            .iter()
            .position(|child| matches!(child, SavedItem::Set(s) if s.name == name));

        match (policy, existing) {
            (LeafCollisionPolicy::Skip, Some(_)) => Ok(LeafOutcome::Skipped),
            (LeafCollisionPolicy::Replace, Some(index)) => {
                self.children[index] = SavedItem::Set(NamedSet::new(name, query)?);
                Ok(LeafOutcome::Replaced)
            }
            _ => {
                self.add_leaf(name, query)?;
                Ok(LeafOutcome::Added)
            }
        }
    }

    /// Direct child sets
    pub fn sets(&self) -> impl Iterator<Item = &NamedSet> {
        self.children.iter().filter_map(SavedItem::as_set)
    }

    /// Direct child folders
    pub fn folders(&self) -> impl Iterator<Item = &FolderNode> {
        self.children.iter().filter_map(SavedItem::as_folder)
    }
}

/// Top-level folder with exactly this name
pub fn find_top_level_folder<'a>(items: &'a [SavedItem], name: &str) -> Option<&'a FolderNode> {
    items
        .iter()
        .filter_map(SavedItem::as_folder)
        .find(|folder| folder.name == name)
}

/// Level-1 build result
#[derive(Debug, Clone)]
pub struct DisciplineFolderBuild {
    /// The folder to commit (existing one extended, or a new one)
    pub folder: FolderNode,
    /// Discipline sets added by this build
    pub added: Vec<String>,
    /// Disciplines that already had a set
    pub existing: Vec<String>,
}

/// Assembles the fixed-name folders of the index
pub struct HierarchyBuilder;

impl HierarchyBuilder {
    /// Level 1: one set per discipline under `folder_name`
    ///
    /// An already saved folder is extended rather than duplicated, and a
    /// discipline that already has a set keeps it.
    pub fn discipline_folder(
        persisted: &[SavedItem],
        folder_name: &str,
        definitions: &[DisciplineDefinition],
    ) -> IndexResult<DisciplineFolderBuild> {
        let mut folder = match find_top_level_folder(persisted, folder_name) {
            Some(existing) => existing.clone(),
            None => FolderNode::new(folder_name)?,
        };

        let mut added = Vec::new();
        let mut existing = Vec::new();
        for definition in definitions {
            match folder.add_leaf_with_policy(
                &definition.name,
                definition.query.clone(),
                LeafCollisionPolicy::Skip,
            )? {
                LeafOutcome::Skipped => existing.push(definition.name.clone()),
                _ => added.push(definition.name.clone()),
            }
        }

        Ok(DisciplineFolderBuild {
            folder,
            added,
            existing,
        })
    }

    /// Level 2/3 top folder: the saved one, or a fresh one (`true` when new)
    pub fn partition_folder(
        persisted: &[SavedItem],
        folder_name: &str,
    ) -> IndexResult<(FolderNode, bool)> {
        match find_top_level_folder(persisted, folder_name) {
            Some(existing) => Ok((existing.clone(), false)),
            None => Ok((FolderNode::new(folder_name)?, true)),
        }
    }
}
