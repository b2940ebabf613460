//! Pipeline domain model

use crate::core::{
    action::ActionNode,
    observer::{ObserverRegistry, SharedObserver},
    stage::{Stage, TransitionError, Trigger},
    state::{CancellationError, PipelineState, StateChange},
    visitor::PipelineVisitor,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque identity of a person responsible for the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Owner(String);

impl Owner {
    pub fn new(identity: impl Into<String>) -> Self {
        Self(identity.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of a transition request that did not raise an error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TransitionOutcome {
    /// Moved to the next stage
    Advanced { from: Stage, to: Stage },
    /// Moved to Cancelled
    Cancelled { from: Stage },
    /// Cancelling failed; observers were told and the state is unchanged
    CancellationReported {
        from: Stage,
        #[serde(serialize_with = "serialize_display")]
        error: CancellationError,
    },
}

fn serialize_display<S, T>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
    T: fmt::Display,
{
    serializer.collect_str(value)
}

impl TransitionOutcome {
    /// Whether a new state was installed
    pub fn changed_state(&self) -> bool {
        !matches!(self, TransitionOutcome::CancellationReported { .. })
    }
}

/// A CI/CD pipeline
#[derive(Debug)]
pub struct Pipeline {
    name: String,
    product_owner: Owner,
    scrum_master: Owner,
    state: PipelineState,
    actions: Vec<ActionNode>,
    observers: ObserverRegistry,
}

impl Pipeline {
    /// Create a pipeline in the Source stage with no actions
    pub fn new(name: impl Into<String>, product_owner: Owner, scrum_master: Owner) -> Self {
        let observers = ObserverRegistry::new();
        Self {
            name: name.into(),
            product_owner,
            scrum_master,
            state: PipelineState::initial(observers.clone()),
            actions: Vec::new(),
            observers,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn product_owner(&self) -> &Owner {
        &self.product_owner
    }

    pub fn scrum_master(&self) -> &Owner {
        &self.scrum_master
    }

    /// The installed state
    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    pub fn stage(&self) -> Stage {
        self.state.stage()
    }

    /// Handle to the observer list shared with every state of this pipeline
    pub fn observers(&self) -> &ObserverRegistry {
        &self.observers
    }

    pub fn subscribe(&self, observer: SharedObserver) {
        self.observers.subscribe(observer);
    }

    /// Remove the first registration of `observer`; no-op if absent
    pub fn unsubscribe(&self, observer: &SharedObserver) -> bool {
        self.observers.unsubscribe(observer)
    }

    /// Ask the current state to handle `trigger`
    ///
    /// On success the successor replaces the current state in one
    /// assignment. On error, or when cancellation is downgraded to a
    /// notification, the current state is left untouched.
    pub fn request_transition(
        &mut self,
        trigger: Trigger,
    ) -> Result<TransitionOutcome, TransitionError> {
        let from = self.state.stage();

        match self.state.request(trigger)? {
            StateChange::Install(next) => {
                let to = next.stage();
                self.state = next;
                if to == Stage::Cancelled {
                    Ok(TransitionOutcome::Cancelled { from })
                } else {
                    Ok(TransitionOutcome::Advanced { from, to })
                }
            }
            StateChange::Reported(error) => {
                Ok(TransitionOutcome::CancellationReported { from, error })
            }
        }
    }

    /// Fire the forward trigger of the current stage
    ///
    /// Stages without a successor re-request themselves, which the
    /// transition table rejects.
    pub fn advance(&mut self) -> Result<TransitionOutcome, TransitionError> {
        let stage = self.stage();
        let trigger = stage
            .forward_trigger()
            .unwrap_or_else(|| Trigger::for_stage(stage));
        self.request_transition(trigger)
    }

    pub fn cancel(&mut self) -> Result<TransitionOutcome, TransitionError> {
        self.request_transition(Trigger::ToCancelled)
    }

    /// Root actions in insertion order
    pub fn actions(&self) -> &[ActionNode] {
        &self.actions
    }

    /// Append a root action and return its id
    pub fn add_action(&mut self, action: ActionNode) -> Uuid {
        let id = action.id();
        self.actions.push(action);
        id
    }

    /// Detach the root action with `id`. Absent ids are ignored.
    pub fn remove_action(&mut self, id: Uuid) -> Option<ActionNode> {
        let index = self.actions.iter().position(|a| a.id() == id)?;
        Some(self.actions.remove(index))
    }

    /// Find any action in the forest by id
    pub fn find_action(&self, id: Uuid) -> Option<&ActionNode> {
        self.actions.iter().find_map(|action| action.find(id))
    }

    /// Root actions whose category belongs to `stage`
    pub fn actions_for(&self, stage: Stage) -> impl Iterator<Item = &ActionNode> {
        self.actions
            .iter()
            .filter(move |action| action.category().stage() == stage)
    }

    /// Visit every action of the forest, roots in order, each pre-order
    pub fn traverse<V: PipelineVisitor + ?Sized>(&self, visitor: &mut V) {
        for action in &self.actions {
            action.accept_visitor(visitor);
        }
    }
}
