// Copyright 2025 Cowboy AI, LLC.

//! Classification engine: the three user-facing operations
//!
//! ```mermaid
//! graph LR
//!     R[root elements] -->|PatternClassifier| D[discipline definitions]
//!     D -->|HierarchyBuilder| L1[1. DISCIPLINES]
//!     L1 -->|persist + reload| REG[DisciplineRegistry]
//!     REG -->|execute_query| B[discipline bases]
//!     B -->|PropertyValueDiscoverer| V[distinct values]
//!     V -->|QueryBuilder| S[scoped sets]
//!     S -->|HierarchyBuilder| L23[2. CLASH SETS / 3. CUSTOM SETS]
//! ```
//!
//! Every operation runs to completion on the caller's thread and cannot be
//! cancelled. Work is built in memory and committed one top-level unit at a
//! time; nothing already committed is rolled back when a later step fails.

use std::collections::BTreeMap;

use indexmap::IndexSet;
use tracing::{debug, info, instrument, warn};

use crate::attribute::{AttributeRef, AttributeSelector};
use crate::catalog::PropertyCatalog;
use crate::classifier::PatternClassifier;
use crate::config::IndexerConfig;
use crate::context::IndexContext;
use crate::discovery::PropertyValueDiscoverer;
use crate::errors::{Diagnostic, IndexError, IndexResult};
use crate::hierarchy::{HierarchyBuilder, LeafOutcome, SavedItem};
use crate::host::ModelHost;
use crate::model::Element;
use crate::query::QueryBuilder;
use crate::state_machine::{EngineState, StateMachine, StateTransition};

/// Outcome of [`ClassificationEngine::build_disciplines`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisciplineSummary {
    /// Level-1 folder name
    pub folder: String,
    /// Every discipline now registered, sorted
    pub disciplines: Vec<String>,
    /// Disciplines whose set was added by this run
    pub added: Vec<String>,
    /// Disciplines that already had a set
    pub existing: Vec<String>,
}

/// Outcome of an attribute or custom set build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    /// Top folder the sets went into
    pub folder: String,
    /// Attribute the sets partition by
    pub attribute: AttributeRef,
    /// Sets added or replaced
    pub created: usize,
    /// Sets left in place under the skip policy
    pub kept: usize,
    /// Sets added or replaced per discipline
    pub per_discipline: BTreeMap<String, usize>,
    /// Selected disciplines with no set saved or kept
    pub skipped_disciplines: Vec<String>,
    /// Elements visited by discovery
    pub elements_scanned: usize,
    /// Failures recovered during the run
    pub diagnostics: Vec<Diagnostic>,
}

/// Outcome of [`ClassificationEngine::scan_properties`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSummary {
    /// Disciplines whose elements were sampled
    pub disciplines_scanned: usize,
    /// Elements visited
    pub elements_scanned: usize,
    /// Distinct categories now in the catalog
    pub categories: usize,
    /// Selected disciplines that could not be sampled
    pub skipped_disciplines: Vec<String>,
    /// Failures recovered during the scan
    pub diagnostics: Vec<Diagnostic>,
}

/// Drives classification and set materialization against a [`ModelHost`]
pub struct ClassificationEngine<H: ModelHost> {
    host: H,
    config: IndexerConfig,
    classifier: PatternClassifier,
    context: IndexContext,
    machine: StateMachine<EngineState>,
}

impl<H: ModelHost> ClassificationEngine<H> {
    /// Validate `config` and load any discipline sets the host already saved
    ///
    /// Starts in [`EngineState::DisciplinesReady`] when saved discipline sets
    /// exist, otherwise in [`EngineState::Idle`].
    pub fn open(host: H, config: IndexerConfig) -> IndexResult<Self> {
        config.validate()?;
        let classifier = config.classifier()?;

        let mut context = IndexContext::new();
        let loaded = context
            .registry
            .reload(&host.persisted_items(), &config.folders.disciplines);
        let initial = if loaded > 0 {
            EngineState::DisciplinesReady
        } else {
            EngineState::Idle
        };
        info!(disciplines = loaded, state = ?initial, "classification engine opened");

        Ok(Self {
            host,
            config,
            classifier,
            context,
            machine: StateMachine::new(initial),
        })
    }

    /// The host
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host, mutably
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Give the host back
    pub fn into_host(self) -> H {
        self.host
    }

    /// Active configuration
    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }

    /// Current state
    pub fn state(&self) -> EngineState {
        *self.machine.current_state()
    }

    /// Every state change so far
    pub fn history(&self) -> &[StateTransition<EngineState>] {
        self.machine.history()
    }

    /// Registered disciplines, sorted
    pub fn discipline_names(&self) -> Vec<String> {
        self.context.registry.names()
    }

    /// Catalog from the last property scan
    pub fn catalog(&self) -> &PropertyCatalog {
        &self.context.catalog
    }

    /// Classify root elements and save one set per discipline
    #[instrument(skip(self))]
    pub fn build_disciplines(&mut self) -> IndexResult<DisciplineSummary> {
        self.machine.transition_to(EngineState::DisciplinesBuilding)?;
        self.context.reset();

        let outcome = self.run_build_disciplines();
        let fallback = if self.reload_registry() > 0 {
            EngineState::DisciplinesReady
        } else {
            EngineState::Idle
        };
        let outcome = outcome.and_then(|summary| {
            if self.context.registry.is_empty() {
                return Err(IndexError::InvariantViolation(format!(
                    "folder {} missing after commit",
                    summary.folder
                )));
            }
            Ok(DisciplineSummary {
                disciplines: self.context.registry.names(),
                ..summary
            })
        });
        self.settle(outcome, EngineState::DisciplinesReady, fallback)
    }

    fn run_build_disciplines(&mut self) -> IndexResult<DisciplineSummary> {
        let roots = self.host.root_elements();
        let definitions = self.classifier.classify(&roots)?;
        info!(roots = roots.len(), disciplines = definitions.len(), "disciplines classified");

        let folder_name = self.config.folders.disciplines.clone();
        let build = HierarchyBuilder::discipline_folder(
            &self.host.persisted_items(),
            &folder_name,
            &definitions,
        )?;
        for name in &build.existing {
            debug!(discipline = %name, "discipline set already saved");
        }

        self.host.persist(None, &SavedItem::Folder(build.folder))?;

        Ok(DisciplineSummary {
            folder: folder_name,
            disciplines: Vec::new(),
            added: build.added,
            existing: build.existing,
        })
    }

    /// Save one set per distinct selector value under each selected discipline
    #[instrument(skip(self))]
    pub fn build_attribute_sets(
        &mut self,
        selector: AttributeSelector,
        selected: &[String],
    ) -> IndexResult<BuildSummary> {
        let selected = self.checked_selection(selected)?;
        let folder = self.config.folders.clash_sets.clone();

        let started_from = self.state();
        self.machine.transition_to(EngineState::ElementSetsBuilding)?;
        let outcome = self.materialize_partition(&folder, &selector.attribute(), &selected);
        self.settle(outcome, EngineState::ElementSetsReady, started_from)
    }

    /// Sample the selected disciplines and rebuild the property catalog
    #[instrument(skip(self))]
    pub fn scan_properties(&mut self, selected: &[String]) -> IndexResult<ScanSummary> {
        let selected = self.checked_selection(selected)?;

        let started_from = self.state();
        self.machine.transition_to(EngineState::PropertiesScanning)?;
        self.context.catalog.reset();

        let mut summary = ScanSummary {
            disciplines_scanned: 0,
            elements_scanned: 0,
            categories: 0,
            skipped_disciplines: Vec::new(),
            diagnostics: Vec::new(),
        };
        let mut catalog = PropertyCatalog::new();

        for discipline in &selected {
            let bases = match self.discipline_bases(discipline) {
                Ok(bases) => bases,
                Err(diagnostic) => {
                    summary.diagnostics.push(diagnostic);
                    summary.skipped_disciplines.push(discipline.clone());
                    continue;
                }
            };

            let found = PropertyValueDiscoverer::new(&self.host)
                .with_limits(self.config.scan)
                .catalog(&bases);
            summary.disciplines_scanned += 1;
            summary.elements_scanned += found.visited;
            summary
                .diagnostics
                .extend(tag(discipline, found.diagnostics));
            catalog.merge(found.result);
        }

        summary.categories = catalog.len();
        self.context.catalog = catalog;
        info!(
            disciplines = summary.disciplines_scanned,
            elements = summary.elements_scanned,
            categories = summary.categories,
            "property scan finished"
        );

        self.settle(Ok(summary), EngineState::PropertiesReady, started_from)
    }

    /// Save one set per distinct value of `category/attribute` under each
    /// selected discipline
    ///
    /// Requires a prior [`scan_properties`](Self::scan_properties).
    #[instrument(skip(self))]
    pub fn build_custom_sets(
        &mut self,
        category: &str,
        attribute: &str,
        selected: &[String],
    ) -> IndexResult<BuildSummary> {
        let target = AttributeRef::new(category, attribute)?;
        let selected = self.checked_selection(selected)?;
        if self.context.catalog.is_empty() {
            return Err(IndexError::validation(
                "Scan properties before creating custom search sets",
            ));
        }
        if !self.context.catalog.contains(category, attribute) {
            debug!(attribute = %target, "attribute not seen by the last scan");
        }
        let folder = self.config.folders.custom_sets.clone();

        let started_from = self.state();
        self.machine.transition_to(EngineState::CustomSetsBuilding)?;
        let outcome = self.materialize_partition(&folder, &target, &selected);
        self.settle(outcome, EngineState::CustomSetsReady, started_from)
    }

    /// Level 2/3: `folder_name / discipline / value` for each selected discipline
    fn materialize_partition(
        &mut self,
        folder_name: &str,
        attribute: &AttributeRef,
        selected: &[String],
    ) -> IndexResult<BuildSummary> {
        let policy = self.config.leaf_collision;
        let (mut top, is_new) =
            HierarchyBuilder::partition_folder(&self.host.persisted_items(), folder_name)?;
        if is_new {
            self.host.persist(None, &SavedItem::Folder(top.clone()))?;
        }

        let mut summary = BuildSummary {
            folder: folder_name.to_string(),
            attribute: attribute.clone(),
            created: 0,
            kept: 0,
            per_discipline: BTreeMap::new(),
            skipped_disciplines: Vec::new(),
            elements_scanned: 0,
            diagnostics: Vec::new(),
        };

        for discipline in selected {
            let bases = match self.discipline_bases(discipline) {
                Ok(bases) => bases,
                Err(diagnostic) => {
                    summary.diagnostics.push(diagnostic);
                    summary.skipped_disciplines.push(discipline.clone());
                    continue;
                }
            };

            let found = PropertyValueDiscoverer::new(&self.host).values(&bases, attribute);
            summary.elements_scanned += found.visited;
            summary
                .diagnostics
                .extend(tag(discipline, found.diagnostics));

            if found.result.is_empty() {
                debug!(%discipline, %attribute, "no values, discipline skipped");
                summary.skipped_disciplines.push(discipline.clone());
                continue;
            }

            let folder = top.find_or_create_folder(discipline)?;
            let mut changed = Vec::new();
            let mut kept = 0;
            for value in &found.result {
                let query = QueryBuilder::scoped(&bases, attribute, value);
                match folder.add_leaf_with_policy(value, query, policy) {
                    Ok(LeafOutcome::Added) | Ok(LeafOutcome::Replaced) => changed.push(value.clone()),
                    Ok(LeafOutcome::Skipped) => kept += 1,
                    Err(err) => {
                        warn!(%discipline, %value, error = %err, "search set not created");
                        summary
                            .diagnostics
                            .push(set_creation_failure(discipline, value, err.to_string()));
                    }
                }
            }
            summary.kept += kept;

            if changed.is_empty() {
                if kept == 0 {
                    summary.skipped_disciplines.push(discipline.clone());
                }
                continue;
            }

            let snapshot = SavedItem::Folder(folder.clone());
            match self.host.persist(Some(top.id), &snapshot) {
                Ok(()) => {
                    summary.created += changed.len();
                    summary.per_discipline.insert(discipline.clone(), changed.len());
                    info!(%discipline, sets = changed.len(), "discipline sets saved");
                }
                Err(err) => {
                    warn!(%discipline, error = %err, "discipline folder not saved");
                    summary.diagnostics.extend(
                        changed
                            .iter()
                            .map(|value| set_creation_failure(discipline, value, err.to_string())),
                    );
                    if kept == 0 {
                        summary.skipped_disciplines.push(discipline.clone());
                    }
                }
            }
        }

        if summary.created + summary.kept == 0 {
            return Err(IndexError::NoValuesDiscovered {
                category: attribute.category.clone(),
                attribute: attribute.attribute.clone(),
            });
        }

        info!(
            folder = folder_name,
            created = summary.created,
            kept = summary.kept,
            diagnostics = summary.diagnostics.len(),
            "search sets built"
        );
        Ok(summary)
    }

    /// Current result of a discipline's saved query
    fn discipline_bases(&self, discipline: &str) -> Result<Vec<Element>, Diagnostic> {
        let set = self.context.registry.get(discipline).ok_or_else(|| {
            warn!(%discipline, "discipline not registered");
            Diagnostic::for_discipline(
                discipline,
                IndexError::validation(format!("Unknown discipline {discipline}")),
            )
        })?;

        self.host.execute_query(&set.query).map_err(|err| {
            warn!(%discipline, error = %err, "discipline query failed");
            Diagnostic::for_discipline(discipline, IndexError::Host(err))
        })
    }

    /// Deduplicated non-blank selection, checked against the registry state
    fn checked_selection(&self, selected: &[String]) -> IndexResult<Vec<String>> {
        if self.context.registry.is_empty() {
            return Err(IndexError::DisciplinesNotBuilt);
        }
        let selected: IndexSet<&String> = selected.iter().filter(|d| !d.trim().is_empty()).collect();
        if selected.is_empty() {
            return Err(IndexError::validation("Please select at least one discipline"));
        }
        Ok(selected.into_iter().cloned().collect())
    }

    fn reload_registry(&mut self) -> usize {
        let items = self.host.persisted_items();
        self.context
            .registry
            .reload(&items, &self.config.folders.disciplines)
    }

    fn settle<T>(
        &mut self,
        outcome: IndexResult<T>,
        success: EngineState,
        fallback: EngineState,
    ) -> IndexResult<T> {
        let target = if outcome.is_ok() { success } else { fallback };
        if let Err(err) = &outcome {
            warn!(error = %err, state = ?target, "operation failed");
        }
        self.machine.transition_to(target)?;
        outcome
    }
}

fn set_creation_failure(discipline: &str, name: &str, reason: String) -> Diagnostic {
    Diagnostic::for_discipline(
        discipline,
        IndexError::SetCreationFailure {
            discipline: discipline.to_string(),
            name: name.to_string(),
            reason,
        },
    )
}

fn tag(discipline: &str, diagnostics: Vec<Diagnostic>) -> impl Iterator<Item = Diagnostic> + '_ {
    diagnostics.into_iter().map(move |mut diagnostic| {
        diagnostic.discipline.get_or_insert_with(|| discipline.to_string());
        diagnostic
    })
}
