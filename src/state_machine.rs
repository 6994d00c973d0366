// Copyright 2025 Cowboy AI, LLC.

//! State machine driving the classification engine
//!
//! The engine is a Moore machine: each state only says which states may
//! follow it. Every accepted transition is recorded with an id and a
//! timestamp so a host can show what ran and when.
//!
//! ```mermaid
//! stateDiagram-v2
//!     Idle --> DisciplinesBuilding
//!     DisciplinesBuilding --> DisciplinesReady
//!     DisciplinesBuilding --> Idle
//!     DisciplinesReady --> ElementSetsBuilding
//!     DisciplinesReady --> PropertiesScanning
//!     ElementSetsBuilding --> ElementSetsReady
//!     PropertiesScanning --> PropertiesReady
//!     PropertiesReady --> CustomSetsBuilding
//!     CustomSetsBuilding --> CustomSetsReady
//! ```
//!
//! Every ready state may start any operation; whether a custom build has a
//! catalog to work from is checked by the engine, not by the state. A failed
//! build settles back in the ready state it started from.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use uuid::Uuid;

use crate::errors::{IndexError, IndexResult};

/// Trait for types that can be used as states in a state machine
pub trait State: Debug + Clone + PartialEq + Eq {
    /// Get the name of this state for logging/debugging
    fn name(&self) -> &'static str;
}

/// Allowed moves out of a state
pub trait StateTransitions: State {
    /// Check if a transition to the target state is valid
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    /// Get all valid target states from this state
    fn valid_transitions(&self) -> Vec<Self>;
}

/// Record of a state transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateTransition<S> {
    /// The state before the transition
    pub from: S,
    /// The state after the transition
    pub to: S,
    /// Unique identifier for this transition instance
    pub transition_id: Uuid,
    /// When the transition occurred
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Moore machine with a transition history
#[derive(Debug, Clone)]
pub struct StateMachine<S: StateTransitions> {
    current_state: S,
    transition_history: Vec<StateTransition<S>>,
}

impl<S: StateTransitions> StateMachine<S> {
    /// Create a machine in `initial_state`
    pub fn new(initial_state: S) -> Self {
        Self {
            current_state: initial_state,
            transition_history: Vec::new(),
        }
    }

    /// Get the current state
    pub fn current_state(&self) -> &S {
        &self.current_state
    }

    /// Transition to a new state
    pub fn transition_to(&mut self, new_state: S) -> IndexResult<StateTransition<S>> {
        if !self.current_state.can_transition_to(&new_state) {
            return Err(IndexError::InvalidStateTransition {
                from: self.current_state.name().to_string(),
                to: new_state.name().to_string(),
            });
        }

        let transition = StateTransition {
            from: self.current_state.clone(),
            to: new_state.clone(),
            transition_id: Uuid::new_v4(),
            timestamp: chrono::Utc::now(),
        };

        self.current_state = new_state;
        self.transition_history.push(transition.clone());

        Ok(transition)
    }

    /// Get the transition history
    pub fn history(&self) -> &[StateTransition<S>] {
        &self.transition_history
    }
}

/// Lifecycle of a [`crate::ClassificationEngine`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineState {
    /// No discipline sets known
    Idle,
    /// Level-1 build in progress
    DisciplinesBuilding,
    /// Discipline registry populated
    DisciplinesReady,
    /// Attribute-selector sets being materialized
    ElementSetsBuilding,
    /// Attribute-selector sets committed
    ElementSetsReady,
    /// Property catalog scan in progress
    PropertiesScanning,
    /// Property catalog available
    PropertiesReady,
    /// Custom attribute sets being materialized
    CustomSetsBuilding,
    /// Custom attribute sets committed
    CustomSetsReady,
}

impl EngineState {
    /// True while an operation is running
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            Self::DisciplinesBuilding
                | Self::ElementSetsBuilding
                | Self::PropertiesScanning
                | Self::CustomSetsBuilding
        )
    }

    /// True when no operation is running and disciplines are known
    pub fn is_ready(&self) -> bool {
        !self.is_busy() && *self != Self::Idle
    }
}

impl State for EngineState {
    fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::DisciplinesBuilding => "DisciplinesBuilding",
            Self::DisciplinesReady => "DisciplinesReady",
            Self::ElementSetsBuilding => "ElementSetsBuilding",
            Self::ElementSetsReady => "ElementSetsReady",
            Self::PropertiesScanning => "PropertiesScanning",
            Self::PropertiesReady => "PropertiesReady",
            Self::CustomSetsBuilding => "CustomSetsBuilding",
            Self::CustomSetsReady => "CustomSetsReady",
        }
    }
}

impl StateTransitions for EngineState {
    fn valid_transitions(&self) -> Vec<Self> {
        use EngineState::*;

        match self {
            Idle => vec![DisciplinesBuilding],
            DisciplinesBuilding => vec![DisciplinesReady, Idle],
            DisciplinesReady | ElementSetsReady | PropertiesReady | CustomSetsReady => vec![
                DisciplinesBuilding,
                ElementSetsBuilding,
                PropertiesScanning,
                CustomSetsBuilding,
            ],
            ElementSetsBuilding | PropertiesScanning | CustomSetsBuilding => vec![
                DisciplinesReady,
                ElementSetsReady,
                PropertiesReady,
                CustomSetsReady,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_happy_path_through_every_state() {
        use EngineState::*;
        let mut machine = StateMachine::new(Idle);

        for next in [
            DisciplinesBuilding,
            DisciplinesReady,
            ElementSetsBuilding,
            ElementSetsReady,
            PropertiesScanning,
            PropertiesReady,
            CustomSetsBuilding,
            CustomSetsReady,
        ] {
            machine.transition_to(next).unwrap();
        }

        assert_eq!(machine.current_state(), &CustomSetsReady);
        assert_eq!(machine.history().len(), 8);
        assert_eq!(machine.history()[0].from, Idle);
    }

    #[test]
    fn test_invalid_transitions_are_rejected() {
        let mut machine = StateMachine::new(EngineState::Idle);

        let err = machine.transition_to(EngineState::ElementSetsBuilding).unwrap_err();
        assert_eq!(
            err,
            IndexError::InvalidStateTransition {
                from: "Idle".to_string(),
                to: "ElementSetsBuilding".to_string(),
            }
        );
        assert!(machine.history().is_empty());

        machine.transition_to(EngineState::DisciplinesBuilding).unwrap();
        assert!(machine.transition_to(EngineState::PropertiesScanning).is_err());
        assert!(machine.transition_to(EngineState::DisciplinesBuilding).is_err());
    }

    #[test]
    fn test_failed_builds_settle_in_previous_ready_state() {
        use EngineState::*;
        assert!(DisciplinesBuilding.can_transition_to(&Idle));
        assert!(ElementSetsBuilding.can_transition_to(&DisciplinesReady));
        assert!(PropertiesScanning.can_transition_to(&CustomSetsReady));
        assert!(CustomSetsBuilding.can_transition_to(&PropertiesReady));
        assert!(!ElementSetsBuilding.can_transition_to(&Idle));
        assert!(!Idle.is_ready());
        assert!(ElementSetsReady.is_ready());
    }

    #[test]
    fn test_busy_states_and_transition_ids() {
        let mut machine = StateMachine::new(EngineState::Idle);
        let first = machine.transition_to(EngineState::DisciplinesBuilding).unwrap();
        assert!(machine.current_state().is_busy());
        let second = machine.transition_to(EngineState::DisciplinesReady).unwrap();
        assert!(!machine.current_state().is_busy());

        assert_ne!(first.transition_id, second.transition_id);
        assert!(first.timestamp <= second.timestamp);
        assert_eq!(
            machine.current_state().valid_transitions(),
            vec![
                EngineState::DisciplinesBuilding,
                EngineState::ElementSetsBuilding,
                EngineState::PropertiesScanning,
                EngineState::CustomSetsBuilding,
            ]
        );
    }
}
