// Copyright 2025 Cowboy AI, LLC.

//! Property value discovery over element subtrees
//!
//! Two modes share one traversal:
//!
//! - **values**: the sorted distinct non-blank values of one attribute, used
//!   to decide which search sets to create;
//! - **catalog**: every (category, attribute) pair present, used only to offer
//!   choices.
//!
//! A host failure while reading one element never stops a scan; it becomes a
//! [`Diagnostic`] and the walk moves on.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::attribute::AttributeRef;
use crate::catalog::PropertyCatalog;
use crate::config::ScanLimits;
use crate::errors::{Diagnostic, HostError, IndexError};
use crate::host::ModelHost;
use crate::lookup::lookup_property;
use crate::model::Element;
use crate::walker::walk_roots;

/// Result of a discovery pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery<T> {
    /// What was found
    pub result: T,
    /// Elements visited, including unreadable ones
    pub visited: usize,
    /// Elements that could not be read
    pub diagnostics: Vec<Diagnostic>,
}

/// Walks base elements and reads their properties
pub struct PropertyValueDiscoverer<'h, H: ModelHost + ?Sized> {
    host: &'h H,
    limits: ScanLimits,
}

impl<'h, H: ModelHost + ?Sized> PropertyValueDiscoverer<'h, H> {
    /// Unbounded discoverer
    pub fn new(host: &'h H) -> Self {
        Self {
            host,
            limits: ScanLimits::unbounded(),
        }
    }

    /// Cap the number of roots and the nodes walked per root
    pub fn with_limits(mut self, limits: ScanLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Distinct non-blank values of `target` below `bases`, sorted
    pub fn values(&self, bases: &[Element], target: &AttributeRef) -> Discovery<Vec<String>> {
        let mut values = BTreeSet::new();
        let mut visited = 0;
        let mut diagnostics = Vec::new();

        for element in walk_roots(self.host, bases, self.limits) {
            visited += 1;
            match lookup_property(self.host, &element, target) {
                Ok(Some(value)) if !value.trim().is_empty() => {
                    values.insert(value);
                }
                Ok(_) => {}
                Err(err) => diagnostics.push(access_failure(&element, err)),
            }
        }

        debug!(
            attribute = %target,
            visited,
            distinct = values.len(),
            "value discovery finished"
        );

        Discovery {
            result: values.into_iter().collect(),
            visited,
            diagnostics,
        }
    }

    /// Every category and attribute display name below `bases`
    pub fn catalog(&self, bases: &[Element]) -> Discovery<PropertyCatalog> {
        let mut catalog = PropertyCatalog::new();
        let mut visited = 0;
        let mut diagnostics = Vec::new();

        for element in walk_roots(self.host, bases, self.limits) {
            visited += 1;
            match self.host.property_categories(&element) {
                Ok(categories) => {
                    for category in &categories {
                        catalog.record_category(&category.display_name);
                        for property in &category.properties {
                            catalog.record(&category.display_name, &property.display_name);
                        }
                    }
                }
                Err(err) => diagnostics.push(access_failure(&element, err)),
            }
        }

        debug!(visited, categories = catalog.len(), "catalog discovery finished");

        Discovery {
            result: catalog,
            visited,
            diagnostics,
        }
    }
}

fn access_failure(element: &Element, err: HostError) -> Diagnostic {
    warn!(element = %element.display_name, error = %err, "skipping unreadable element");
    Diagnostic::new(IndexError::ElementAccessFailure {
        element: element.id,
        element_name: element.display_name.clone(),
        reason: err.to_string(),
    })
}
