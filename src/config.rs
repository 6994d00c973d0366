// Copyright 2025 Cowboy AI, LLC.

//! Indexer configuration
//!
//! ```toml
//! patterns = ["_ARCH_", "_STRC_", "_MEP_"]
//! leaf_collision = "Append"
//!
//! [folders]
//! disciplines = "1. DISCIPLINES"
//! clash_sets = "2. CLASH SETS"
//! custom_sets = "3. CUSTOM SETS"
//!
//! [scan]
//! max_roots = 500
//! max_descendants_per_root = 50
//! ```
//!
//! Every field is optional; missing values fall back to the defaults above.

use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::classifier::{PatternClassifier, DEFAULT_PATTERNS};
use crate::errors::{IndexError, IndexResult};
use crate::hierarchy::LeafCollisionPolicy;

/// Names of the three fixed top-level folders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FolderNames {
    /// Level-1 folder holding one set per discipline
    pub disciplines: String,
    /// Folder for sets partitioned by a fixed attribute selector
    pub clash_sets: String,
    /// Folder for sets partitioned by a scanned attribute
    pub custom_sets: String,
}

impl Default for FolderNames {
    fn default() -> Self {
        Self {
            disciplines: "1. DISCIPLINES".to_string(),
            clash_sets: "2. CLASH SETS".to_string(),
            custom_sets: "3. CUSTOM SETS".to_string(),
        }
    }
}

/// Sampling caps for interactive property scans
///
/// `None` means no cap. Creation passes always walk everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ScanLimits {
    /// Base elements visited per discipline
    pub max_roots: Option<usize>,
    /// Elements walked below each base element, the base included
    pub max_descendants_per_root: Option<usize>,
}

impl ScanLimits {
    /// No caps at all
    pub fn unbounded() -> Self {
        Self {
            max_roots: None,
            max_descendants_per_root: None,
        }
    }
}

impl Default for ScanLimits {
    fn default() -> Self {
        Self {
            max_roots: Some(500),
            max_descendants_per_root: Some(50),
        }
    }
}

/// Complete indexer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct IndexerConfig {
    /// Discipline tokens in priority order
    pub patterns: Vec<String>,
    /// Fixed folder names
    pub folders: FolderNames,
    /// Caps used by property scans
    pub scan: ScanLimits,
    /// Handling of value sets whose name already exists in a discipline folder
    pub leaf_collision: LeafCollisionPolicy,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            patterns: DEFAULT_PATTERNS.iter().map(|p| p.to_string()).collect(),
            folders: FolderNames::default(),
            scan: ScanLimits::default(),
            leaf_collision: LeafCollisionPolicy::default(),
        }
    }
}

impl IndexerConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> IndexResult<Self> {
        let config: IndexerConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> IndexResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            IndexError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&source)
    }

    /// Check patterns, folder names and caps
    pub fn validate(&self) -> IndexResult<()> {
        self.classifier()?;

        let names = [
            &self.folders.disciplines,
            &self.folders.clash_sets,
            &self.folders.custom_sets,
        ];
        if names.iter().any(|name| name.trim().is_empty()) {
            return Err(IndexError::Configuration(
                "folder names cannot be empty".to_string(),
            ));
        }
        if names[0] == names[1] || names[0] == names[2] || names[1] == names[2] {
            return Err(IndexError::Configuration(
                "folder names must be distinct".to_string(),
            ));
        }

        if self.scan.max_roots == Some(0) || self.scan.max_descendants_per_root == Some(0) {
            return Err(IndexError::Configuration(
                "scan limits must be positive when set".to_string(),
            ));
        }

        Ok(())
    }

    /// Classifier for the configured patterns
    pub fn classifier(&self) -> IndexResult<PatternClassifier> {
        PatternClassifier::new(self.patterns.iter().cloned())
    }

    /// JSON schema of the configuration, for editors
    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(IndexerConfig)
    }
}
