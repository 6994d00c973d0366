// Copyright 2025 Cowboy AI, LLC.

//! Scoped queries: a base selection plus at most one property condition
//!
//! A [`ScopedQuery`] is what a saved search set stores. It is re-evaluated by
//! the host whenever the set is opened, so it must carry everything needed to
//! reproduce its result: the base elements and the condition.

use indexmap::IndexSet;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::attribute::AttributeRef;
use crate::errors::{IndexError, IndexResult};
use crate::identifiers::ElementId;
use crate::model::Element;

/// Category holding the element name in the host's property model
pub const ITEM_CATEGORY: &str = "Item";
/// Attribute holding the element name in the host's property model
pub const NAME_ATTRIBUTE: &str = "Name";

/// Elements a query starts from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    /// Every root element of the model
    All,
    /// A copied list of elements
    Elements(Vec<ElementId>),
}

/// How far below the base selection a query reaches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchScope {
    /// The selected elements and all of their descendants
    #[default]
    DescendantsAndSelf,
}

/// Comparison applied to a property's display string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueMatch {
    /// Exact, case-sensitive equality
    Equals(String),
    /// Case-insensitive wildcard pattern (`*` any run, `?` one character)
    Wildcard(String),
}

/// A property condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Property the condition reads
    pub attribute: AttributeRef,
    /// Comparison against the rendered value
    pub value: ValueMatch,
}

impl Condition {
    /// `attribute == value`
    pub fn equals(attribute: AttributeRef, value: impl Into<String>) -> Self {
        Self {
            attribute,
            value: ValueMatch::Equals(value.into()),
        }
    }

    /// `attribute LIKE pattern`
    pub fn wildcard(attribute: AttributeRef, pattern: impl Into<String>) -> Self {
        Self {
            attribute,
            value: ValueMatch::Wildcard(pattern.into()),
        }
    }

    /// Prepare the comparison for repeated evaluation
    pub fn compile(&self) -> IndexResult<ValueMatcher> {
        match &self.value {
            ValueMatch::Equals(expected) => Ok(ValueMatcher::Equals(expected.clone())),
            ValueMatch::Wildcard(pattern) => {
                let mut source = String::from("^");
                for ch in pattern.chars() {
                    match ch {
                        '*' => source.push_str(".*"),
                        '?' => source.push('.'),
                        other => source.push_str(&regex::escape(&other.to_string())),
                    }
                }
                source.push('$');
                let regex = RegexBuilder::new(&source)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| IndexError::validation(format!("invalid wildcard {pattern}: {e}")))?;
                Ok(ValueMatcher::Wildcard(regex))
            }
        }
    }
}

/// A compiled [`ValueMatch`]
#[derive(Debug, Clone)]
pub enum ValueMatcher {
    /// Exact equality
    Equals(String),
    /// Anchored case-insensitive expression
    Wildcard(Regex),
}

impl ValueMatcher {
    /// Test a rendered property value
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            ValueMatcher::Equals(expected) => expected == candidate,
            ValueMatcher::Wildcard(regex) => regex.is_match(candidate),
        }
    }
}

/// A persisted, re-executable selection definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopedQuery {
    /// Where evaluation starts
    pub selection: Selection,
    /// Optional property filter
    pub condition: Option<Condition>,
    /// Traversal below the selection
    pub scope: SearchScope,
}

impl ScopedQuery {
    /// Query over every element in the model
    pub fn all() -> Self {
        Self {
            selection: Selection::All,
            condition: None,
            scope: SearchScope::DescendantsAndSelf,
        }
    }

    /// Add a condition, builder style
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Query matching every element whose name contains `token`
    pub fn name_contains(token: &str) -> Self {
        Self::all().with_condition(Condition::wildcard(
            AttributeRef {
                category: ITEM_CATEGORY.to_string(),
                attribute: NAME_ATTRIBUTE.to_string(),
            },
            format!("*{token}*"),
        ))
    }
}

/// Builds queries scoped to a discipline's resolved elements
pub struct QueryBuilder;

impl QueryBuilder {
    /// `attribute == value`, restricted to `resolved` and its descendants
    ///
    /// `resolved` is what the discipline's saved query currently evaluates
    /// to. The ids are copied so the new set stays inside the discipline even
    /// when another discipline shares the same attribute value.
    pub fn scoped(resolved: &[Element], attribute: &AttributeRef, value: &str) -> ScopedQuery {
        let ids: IndexSet<ElementId> = resolved.iter().map(|e| e.id).collect();
        ScopedQuery {
            selection: Selection::Elements(ids.into_iter().collect()),
            condition: Some(Condition::equals(attribute.clone(), value)),
            scope: SearchScope::DescendantsAndSelf,
        }
    }
}
