// Copyright 2025 Cowboy AI, LLC.

//! Property lookup by (category, attribute), tolerant of name aliasing

use crate::attribute::AttributeRef;
use crate::errors::HostError;
use crate::host::ModelHost;
use crate::model::{Element, PropertyCategory};

/// Read an attribute's display string from an element
///
/// `Ok(None)` means the category or attribute is absent. `Err` means the host
/// could not read the element at all; callers treat that as "not found for
/// this element" and keep going.
pub fn lookup_property<H: ModelHost + ?Sized>(
    host: &H,
    element: &Element,
    target: &AttributeRef,
) -> Result<Option<String>, HostError> {
    let categories = host.property_categories(element)?;
    Ok(select_value(&categories, target))
}

/// Find the attribute among already-loaded categories
///
/// Only the first category answering to the target name is inspected.
pub fn select_value(categories: &[PropertyCategory], target: &AttributeRef) -> Option<String> {
    let category = categories.iter().find(|c| c.answers_to(&target.category))?;
    category
        .properties
        .iter()
        .find(|p| p.answers_to(&target.attribute))
        .map(|p| p.value.to_display_string())
}
