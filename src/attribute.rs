// Copyright 2025 Cowboy AI, LLC.

//! Attribute addressing: (category, attribute) pairs and the fixed selectors
//! offered for element partitioning.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::{IndexError, IndexResult};

/// A property addressed by its category and attribute name
///
/// Either name may be a display name or an internal name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeRef {
    /// Property category (e.g. `Element`)
    pub category: String,
    /// Attribute within the category (e.g. `Category`)
    pub attribute: String,
}

impl AttributeRef {
    /// Create an attribute reference, rejecting blank names
    pub fn new(category: impl Into<String>, attribute: impl Into<String>) -> IndexResult<Self> {
        let category = category.into();
        let attribute = attribute.into();
        if category.trim().is_empty() {
            return Err(IndexError::validation("Please select a property category"));
        }
        if attribute.trim().is_empty() {
            return Err(IndexError::validation("Please select a property name"));
        }
        Ok(Self {
            category,
            attribute,
        })
    }
}

impl fmt::Display for AttributeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.attribute)
    }
}

/// Attributes offered for clash-set partitioning
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum AttributeSelector {
    /// Revit category
    #[default]
    Category,
    /// MEP system name
    SystemName,
    /// MEP system classification
    SystemClassification,
    /// Workset
    Workset,
    /// Family type
    FamilyType,
}

impl AttributeSelector {
    /// Every selector, in presentation order
    pub const ALL: [AttributeSelector; 5] = [
        AttributeSelector::Category,
        AttributeSelector::SystemName,
        AttributeSelector::SystemClassification,
        AttributeSelector::Workset,
        AttributeSelector::FamilyType,
    ];

    /// Selector key as used by callers and configuration
    pub fn key(self) -> &'static str {
        match self {
            Self::Category => "Category",
            Self::SystemName => "SystemName",
            Self::SystemClassification => "SystemClassification",
            Self::Workset => "Workset",
            Self::FamilyType => "FamilyType",
        }
    }

    /// Parse a selector key
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.key() == key)
    }

    /// The (category, attribute) pair this selector reads
    pub fn attribute(self) -> AttributeRef {
        let (category, attribute) = match self {
            Self::Category => ("Element", "Category"),
            Self::SystemName => ("Element", "System Name"),
            Self::SystemClassification => ("Element", "System Classification"),
            Self::Workset => ("Element", "Workset"),
            Self::FamilyType => ("Element", "Type"),
        };
        AttributeRef {
            category: category.to_string(),
            attribute: attribute.to_string(),
        }
    }
}

impl fmt::Display for AttributeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for AttributeSelector {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s)
            .ok_or_else(|| IndexError::validation(format!("unknown attribute selector: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(AttributeSelector::Category, "Element", "Category")]
    #[test_case(AttributeSelector::SystemName, "Element", "System Name")]
    #[test_case(AttributeSelector::SystemClassification, "Element", "System Classification")]
    #[test_case(AttributeSelector::Workset, "Element", "Workset")]
    #[test_case(AttributeSelector::FamilyType, "Element", "Type")]
    fn test_selector_mapping(selector: AttributeSelector, category: &str, attribute: &str) {
        let attr = selector.attribute();
        assert_eq!(attr.category, category);
        assert_eq!(attr.attribute, attribute);
        assert_eq!(selector.key().parse::<AttributeSelector>(), Ok(selector));
    }

    #[test]
    fn test_unknown_selector_is_rejected() {
        let err = "Phase".parse::<AttributeSelector>().unwrap_err();
        assert!(err.is_validation_error());
        assert_eq!(AttributeSelector::default(), AttributeSelector::Category);
    }

    #[test]
    fn test_attribute_ref_rejects_blank_names() {
        assert!(AttributeRef::new("", "Category").is_err());
        assert!(AttributeRef::new("Element", "  ").is_err());
        let attr = AttributeRef::new("Element", "Category").unwrap();
        assert_eq!(attr.to_string(), "Element/Category");
    }
}
