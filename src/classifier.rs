// Copyright 2025 Cowboy AI, LLC.

//! Discipline classifier: map root model names to disciplines
//!
//! A discipline pattern is a delimiter-wrapped token such as `_ARCH_`. A root
//! element belongs to the first pattern its name contains, compared without
//! regard to case. The discipline name is the token without its delimiters.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::errors::{IndexError, IndexResult};
use crate::model::Element;
use crate::query::ScopedQuery;

/// Patterns recognised when no configuration overrides them
pub const DEFAULT_PATTERNS: [&str; 11] = [
    "_ARCH_", "_STRC_", "_MEP_", "_MECH_", "_ELEC_", "_PLUM_", "_HVAC_", "_FIRE_", "_CIVIL_",
    "_SITE_", "_LAND_",
];

const DELIMITER: char = '_';

/// A delimiter-wrapped discipline token
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisciplinePattern {
    token: String,
    folded: String,
    discipline: String,
}

impl DisciplinePattern {
    /// Parse a token; its discipline name must not be empty
    pub fn new(token: impl Into<String>) -> IndexResult<Self> {
        let token = token.into();
        let discipline = token.trim_matches(DELIMITER).to_string();
        if discipline.trim().is_empty() {
            return Err(IndexError::Configuration(format!(
                "discipline pattern {token:?} has no name between its delimiters"
            )));
        }
        Ok(Self {
            folded: token.to_lowercase(),
            token,
            discipline,
        })
    }

    /// The literal token, e.g. `_ARCH_`
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The discipline name, e.g. `ARCH`
    pub fn discipline(&self) -> &str {
        &self.discipline
    }

    /// True when `name` contains the token, ignoring case
    pub fn matches(&self, name: &str) -> bool {
        name.to_lowercase().contains(&self.folded)
    }

    /// The Level-1 definition for this pattern's discipline
    pub fn definition(&self) -> DisciplineDefinition {
        DisciplineDefinition {
            name: self.discipline.clone(),
            query: ScopedQuery::name_contains(&self.token),
        }
    }
}

/// A discipline and the query selecting its elements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisciplineDefinition {
    /// Discipline name, e.g. `ARCH`
    pub name: String,
    /// Elements whose name contains the pattern token, with their descendants
    pub query: ScopedQuery,
}

/// Classifies root elements against an ordered pattern list
#[derive(Debug, Clone)]
pub struct PatternClassifier {
    patterns: Vec<DisciplinePattern>,
}

impl PatternClassifier {
    /// Build a classifier from tokens, in priority order
    pub fn new<I, S>(tokens: I) -> IndexResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns = tokens
            .into_iter()
            .map(DisciplinePattern::new)
            .collect::<IndexResult<Vec<_>>>()?;
        if patterns.is_empty() {
            return Err(IndexError::Configuration(
                "at least one discipline pattern is required".to_string(),
            ));
        }
        Ok(Self { patterns })
    }

    /// Patterns in priority order
    pub fn patterns(&self) -> &[DisciplinePattern] {
        &self.patterns
    }

    /// First pattern a name matches
    pub fn classify_name(&self, name: &str) -> Option<&DisciplinePattern> {
        self.patterns.iter().find(|pattern| pattern.matches(name))
    }

    /// Disciplines present among `roots`, in first-seen order
    ///
    /// Fails with [`IndexError::NoDisciplinesFound`] when no root matches.
    pub fn classify(&self, roots: &[Element]) -> IndexResult<Vec<DisciplineDefinition>> {
        let found: IndexSet<&DisciplinePattern> = roots
            .iter()
            .filter_map(|root| self.classify_name(&root.display_name))
            .collect();

        if found.is_empty() {
            return Err(IndexError::NoDisciplinesFound {
                patterns: self.patterns.len(),
            });
        }

        Ok(found.into_iter().map(DisciplinePattern::definition).collect())
    }
}

impl Default for PatternClassifier {
    fn default() -> Self {
        Self {
            patterns: DEFAULT_PATTERNS
                .iter()
                .filter_map(|token| DisciplinePattern::new(*token).ok())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifiers::ElementId;
    use crate::query::{Selection, ValueMatch};
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn roots(names: &[&str]) -> Vec<Element> {
        names.iter().map(|n| Element::new(ElementId::new(), *n)).collect()
    }

    #[test_case("Tower_ARCH_01.nwc", Some("ARCH") ; "plain match")]
    #[test_case("tower_arch_01.nwc", Some("ARCH") ; "lower case")]
    #[test_case("Tower_ARCH01.nwc", None ; "missing trailing delimiter")]
    #[test_case("Plant_MEP_ELEC_02", Some("MEP") ; "first pattern wins")]
    #[test_case("Landscape.nwc", None ; "no delimiters")]
    fn test_classify_name(name: &str, expected: Option<&str>) {
        let classifier = PatternClassifier::default();
        assert_eq!(classifier.classify_name(name).map(|p| p.discipline()), expected);
    }

    #[test]
    fn test_classify_collects_distinct_disciplines_in_order() {
        let classifier = PatternClassifier::default();
        let found = classifier
            .classify(&roots(&["Tower_STRC_01", "Tower_ARCH_01", "Annex_ARCH_02", "Annex_MEP_02"]))
            .unwrap();

        let names: Vec<_> = found.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["STRC", "ARCH", "MEP"]);
    }

    #[test]
    fn test_definition_query_wildcards_the_token() {
        let definition = DisciplinePattern::new("_HVAC_").unwrap().definition();
        assert_eq!(definition.name, "HVAC");
        assert_eq!(definition.query.selection, Selection::All);
        assert_eq!(
            definition.query.condition.unwrap().value,
            ValueMatch::Wildcard("*_HVAC_*".to_string())
        );
    }

    #[test]
    fn test_no_match_is_an_error() {
        let classifier = PatternClassifier::default();
        let err = classifier.classify(&roots(&["Survey.nwd", "Coordination.nwf"])).unwrap_err();
        assert_eq!(err, IndexError::NoDisciplinesFound { patterns: 11 });
        assert!(err.is_discovery_error());
    }

    #[test]
    fn test_invalid_patterns_are_rejected() {
        assert!(DisciplinePattern::new("__").is_err());
        assert!(PatternClassifier::new(Vec::<String>::new()).is_err());
        assert!(PatternClassifier::new(["_ARCH_", "_"]).is_err());
    }
}
