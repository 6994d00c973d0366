// Copyright 2025 Cowboy AI, LLC.

//! Error types for classification and materialization operations

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identifiers::ElementId;

/// Failures reported by the host model through [`crate::host::ModelHost`]
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum HostError {
    /// Reading an element's properties failed on the host side
    #[error("Property access denied: {0}")]
    AccessDenied(String),

    /// The host could not evaluate a query
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// The host refused to commit a folder or set
    #[error("Persist failed: {0}")]
    PersistFailed(String),
}

/// Errors that can occur while building the classification index
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// Caller-supplied input was rejected before any work was done
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// No root element matched any discipline pattern
    #[error(
        "No discipline patterns found in model files ({patterns} patterns checked). \
         Ensure file names contain discipline identifiers like _ARCH_, _STRC_, _MEP_"
    )]
    NoDisciplinesFound {
        /// Number of patterns that were tested
        patterns: usize,
    },

    /// Nothing could be materialized for the chosen attribute
    #[error("No values found for {category}/{attribute} in the selected disciplines")]
    NoValuesDiscovered {
        /// Property category searched
        category: String,
        /// Attribute searched
        attribute: String,
    },

    /// Attribute or custom sets were requested before Level-1 exists
    #[error("Discipline search sets must be created before building attribute sets")]
    DisciplinesNotBuilt,

    /// Reading one element's properties failed; recovered locally
    #[error("Element access failure on {element_name} ({element}): {reason}")]
    ElementAccessFailure {
        /// Element that could not be read
        element: ElementId,
        /// Display name of that element
        element_name: String,
        /// Host-supplied reason
        reason: String,
    },

    /// Materializing one (discipline, value) leaf failed; recovered locally
    #[error("Set creation failed for {discipline}\\{name}: {reason}")]
    SetCreationFailure {
        /// Discipline the set belongs to
        discipline: String,
        /// Set name (the discovered value)
        name: String,
        /// Reason for the failure
        reason: String,
    },

    /// Engine was asked to move between incompatible states
    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition {
        /// Current state
        from: String,
        /// Attempted target state
        to: String,
    },

    /// Configuration could not be parsed or failed validation
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Hierarchy invariant violation (e.g. an empty node name)
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Host collaborator failure that could not be recovered locally
    #[error(transparent)]
    Host(#[from] HostError),
}

/// Result type for index operations
pub type IndexResult<T> = Result<T, IndexError>;

impl From<toml::de::Error> for IndexError {
    fn from(err: toml::de::Error) -> Self {
        IndexError::Configuration(err.to_string())
    }
}

impl IndexError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        IndexError::ValidationError(msg.into())
    }

    /// Check if this error came from rejected caller input
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            IndexError::ValidationError(_) | IndexError::InvariantViolation(_)
        )
    }

    /// Check if a discovery step found nothing usable
    pub fn is_discovery_error(&self) -> bool {
        matches!(
            self,
            IndexError::NoDisciplinesFound { .. } | IndexError::NoValuesDiscovered { .. }
        )
    }

    /// Check if this failure is handled locally without aborting a batch
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            IndexError::ElementAccessFailure { .. } | IndexError::SetCreationFailure { .. }
        )
    }
}

/// A locally recovered failure recorded during a batch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Discipline being processed when the failure happened, if any
    pub discipline: Option<String>,
    /// The recovered failure
    pub error: IndexError,
}

impl Diagnostic {
    /// Record a failure outside any discipline
    pub fn new(error: IndexError) -> Self {
        Self {
            discipline: None,
            error,
        }
    }

    /// Record a failure while processing a discipline
    pub fn for_discipline(discipline: impl Into<String>, error: IndexError) -> Self {
        Self {
            discipline: Some(discipline.into()),
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test error display messages
    ///
    /// ```mermaid
    /// graph TD
    ///     A[IndexError] -->|Display| B[Error Message]
    ///     A -->|Clone| C[Cloned Error]
    /// ```
    #[test]
    fn test_error_display_messages() {
        let err = IndexError::ValidationError("Please select at least one discipline".to_string());
        assert_eq!(
            err.to_string(),
            "Validation error: Please select at least one discipline"
        );

        let err = IndexError::NoValuesDiscovered {
            category: "Element".to_string(),
            attribute: "Category".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "No values found for Element/Category in the selected disciplines"
        );

        let err = IndexError::SetCreationFailure {
            discipline: "ARCH".to_string(),
            name: "Walls".to_string(),
            reason: "rejected".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Set creation failed for ARCH\\Walls: rejected"
        );

        let err = IndexError::from(HostError::QueryFailed("timeout".to_string()));
        assert_eq!(err.to_string(), "Query failed: timeout");
    }

    #[test]
    fn test_error_classification() {
        assert!(IndexError::validation("x").is_validation_error());
        assert!(IndexError::NoDisciplinesFound { patterns: 11 }.is_discovery_error());
        assert!(!IndexError::DisciplinesNotBuilt.is_discovery_error());

        let access = IndexError::ElementAccessFailure {
            element: ElementId::new(),
            element_name: "Wall".to_string(),
            reason: "locked".to_string(),
        };
        assert!(access.is_recoverable());
        assert!(!access.is_validation_error());
    }

    #[test]
    fn test_toml_errors_become_configuration_errors() {
        let err = toml::from_str::<toml::Value>("patterns = [").unwrap_err();
        let err: IndexError = err.into();
        assert!(matches!(err, IndexError::Configuration(_)));
    }
}
