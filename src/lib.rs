// Copyright 2025 Cowboy AI, LLC.

//! # Discipline Sets
//!
//! Property-driven classification index over a host's engineering model tree.
//!
//! The index is built in three tiers:
//! - **Disciplines**: root model files are grouped by literal name patterns
//!   (`_ARCH_`, `_STRC_`, `_MEP_`, ...) into one saved set per discipline
//! - **Clash sets**: each discipline is split by the distinct values of a
//!   fixed element attribute (category, system, workset, type)
//! - **Custom sets**: the same split over any attribute found by a property scan
//!
//! Every saved set is a re-executable query, not a static element list, so it
//! stays correct as the model changes.
//!
//! ## Design Principles
//!
//! 1. **Host owned model**: the tree, properties, queries and saved-set store
//!    live behind [`ModelHost`]
//! 2. **Failures are values**: an unreadable element is a [`Diagnostic`], not
//!    an abort
//! 3. **Idempotent folders**: reruns extend existing folders instead of
//!    duplicating them
//! 4. **Controlled State**: the engine moves through [`EngineState`] only along
//!    valid transitions

#![warn(missing_docs)]

mod attribute;
mod catalog;
mod classifier;
mod config;
mod context;
mod discovery;
mod engine;
mod errors;
mod hierarchy;
mod identifiers;
mod lookup;
mod model;
mod query;
mod registry;
mod state_machine;
mod walker;
pub mod host;

pub use attribute::{AttributeRef, AttributeSelector};
pub use catalog::PropertyCatalog;
pub use classifier::{DisciplineDefinition, DisciplinePattern, PatternClassifier, DEFAULT_PATTERNS};
pub use config::{FolderNames, IndexerConfig, ScanLimits};
pub use context::IndexContext;
pub use discovery::{Discovery, PropertyValueDiscoverer};
pub use engine::{BuildSummary, ClassificationEngine, DisciplineSummary, ScanSummary};
pub use errors::{Diagnostic, HostError, IndexError, IndexResult};
pub use hierarchy::{
    find_top_level_folder, DisciplineFolderBuild, FolderNode, HierarchyBuilder,
    LeafCollisionPolicy, LeafOutcome, NamedSet, SavedItem,
};
pub use host::{InMemoryHost, ModelHost};
pub use identifiers::{ElementId, NodeId};
pub use lookup::{lookup_property, select_value};
pub use model::{Element, Property, PropertyCategory, PropertyValue};
pub use query::{
    Condition, QueryBuilder, ScopedQuery, SearchScope, Selection, ValueMatch, ValueMatcher,
    ITEM_CATEGORY, NAME_ATTRIBUTE,
};
pub use registry::DisciplineRegistry;
pub use state_machine::{EngineState, State, StateMachine, StateTransition, StateTransitions};
pub use walker::{walk_roots, SubtreeWalker};
