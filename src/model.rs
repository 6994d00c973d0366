// Copyright 2025 Cowboy AI, LLC.

//! Read-only view of the host's element tree and property sets
//!
//! Elements are handles: the index never owns the tree. Children and property
//! categories are fetched through [`crate::host::ModelHost`] on demand.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identifiers::ElementId;

/// A node in the host's model tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Element {
    /// Host identity of the element
    pub id: ElementId,
    /// Name shown in the host's selection tree
    pub display_name: String,
}

impl Element {
    /// Create an element handle
    pub fn new(id: ElementId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
        }
    }
}

/// A scalar property value as stored by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    /// Free text
    Text(String),
    /// Whole number
    Integer(i64),
    /// Floating point number
    Double(f64),
    /// Yes / No flag
    Boolean(bool),
    /// Timestamp
    DateTime(DateTime<Utc>),
    /// No value stored
    Empty,
}

impl PropertyValue {
    /// Render the value the way the host shows it to users
    pub fn to_display_string(&self) -> String {
        match self {
            PropertyValue::Text(text) => text.clone(),
            PropertyValue::Integer(i) => i.to_string(),
            PropertyValue::Double(d) => d.to_string(),
            PropertyValue::Boolean(true) => "Yes".to_string(),
            PropertyValue::Boolean(false) => "No".to_string(),
            PropertyValue::DateTime(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
            PropertyValue::Empty => String::new(),
        }
    }

    /// True when the rendered value is empty or whitespace only
    pub fn is_blank(&self) -> bool {
        self.to_display_string().trim().is_empty()
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Integer(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Double(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Boolean(value)
    }
}

/// A single (display name, internal name, value) entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Name shown to users
    pub display_name: String,
    /// Name used internally by the authoring tool
    pub internal_name: String,
    /// Stored value
    pub value: PropertyValue,
}

impl Property {
    /// Create a property whose internal name equals its display name
    pub fn new(name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        let name = name.into();
        Self {
            internal_name: name.clone(),
            display_name: name,
            value: value.into(),
        }
    }

    /// Create a property with distinct display and internal names
    pub fn aliased(
        display_name: impl Into<String>,
        internal_name: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            internal_name: internal_name.into(),
            value: value.into(),
        }
    }

    /// True when either name equals `name`
    pub fn answers_to(&self, name: &str) -> bool {
        self.display_name == name || self.internal_name == name
    }
}

/// A named group of properties attached to an element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyCategory {
    /// Name shown to users
    pub display_name: String,
    /// Name used internally by the authoring tool
    pub internal_name: String,
    /// Properties in host order
    pub properties: Vec<Property>,
}

impl PropertyCategory {
    /// Create an empty category whose internal name equals its display name
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            internal_name: name.clone(),
            display_name: name,
            properties: Vec::new(),
        }
    }

    /// Create an empty category with distinct display and internal names
    pub fn aliased(display_name: impl Into<String>, internal_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            internal_name: internal_name.into(),
            properties: Vec::new(),
        }
    }

    /// Append a property, builder style
    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    /// True when either name equals `name`
    pub fn answers_to(&self, name: &str) -> bool {
        self.display_name == name || self.internal_name == name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(PropertyValue::Text("Wall".into()), "Wall" ; "text")]
    #[test_case(PropertyValue::Integer(42), "42" ; "integer")]
    #[test_case(PropertyValue::Double(2.5), "2.5" ; "double")]
    #[test_case(PropertyValue::Boolean(true), "Yes" ; "boolean yes")]
    #[test_case(PropertyValue::Boolean(false), "No" ; "boolean no")]
    #[test_case(PropertyValue::Empty, "" ; "empty")]
    fn test_display_string(value: PropertyValue, expected: &str) {
        assert_eq!(value.to_display_string(), expected);
    }

    #[test]
    fn test_blank_values() {
        assert!(PropertyValue::Empty.is_blank());
        assert!(PropertyValue::Text("   \t".into()).is_blank());
        assert!(!PropertyValue::Integer(0).is_blank());
    }

    #[test]
    fn test_aliasing_checks_both_names() {
        let category = PropertyCategory::aliased("Element", "LcRevitData_Element");
        assert!(category.answers_to("Element"));
        assert!(category.answers_to("LcRevitData_Element"));
        assert!(!category.answers_to("element"));

        let property = Property::aliased("System Name", "LcRevitPropertyElementSystemName", "HW");
        assert!(property.answers_to("System Name"));
        assert!(property.answers_to("LcRevitPropertyElementSystemName"));
    }
}
