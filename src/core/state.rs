//! Pipeline states and the transition policy they enforce

use crate::core::{
    observer::{EventKind, ObserverError, ObserverRegistry, SharedObserver, StateEvent},
    stage::{resolve, Resolution, Stage, TransitionError, Trigger},
};
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

/// Entering the cancelled state did not complete
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Cannot cancel pipeline from {from} State: {reason}")]
pub struct CancellationError {
    pub from: Stage,
    pub reason: String,
}

impl CancellationError {
    fn from_observer_errors(from: Stage, errors: &[ObserverError]) -> Self {
        let reason = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Self { from, reason }
    }
}

/// What a state asks its pipeline to do after handling a trigger
#[derive(Debug)]
pub enum StateChange {
    /// Replace the current state with this one
    Install(PipelineState),
    /// Cancellation failed and was broadcast instead; keep the current state
    Reported(CancellationError),
}

/// The state a pipeline is in
///
/// A state is created only by a successful transition (or by pipeline
/// creation for Source) and is discarded once replaced. Each instance carries
/// its own id so callers can tell whether a state was swapped out.
#[derive(Debug)]
pub struct PipelineState {
    id: Uuid,
    stage: Stage,
    entered_at: DateTime<Utc>,
    observers: ObserverRegistry,
}

impl PipelineState {
    /// The Source state a new pipeline starts in. Nothing is broadcast.
    pub(crate) fn initial(observers: ObserverRegistry) -> Self {
        Self::new(Stage::Source, observers)
    }

    fn new(stage: Stage, observers: ObserverRegistry) -> Self {
        Self {
            id: Uuid::new_v4(),
            stage,
            entered_at: Utc::now(),
            observers,
        }
    }

    /// Construct the state for `stage` and broadcast its entry message
    fn enter(stage: Stage, observers: ObserverRegistry) -> (Self, Vec<ObserverError>) {
        let state = Self::new(stage, observers);
        let errors = state.notify(EventKind::Entered, stage.entry_message());
        (state, errors)
    }

    /// Unique identity of this state instance
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Display name, e.g. "Deploy Stage"
    pub fn name(&self) -> &'static str {
        self.stage.label()
    }

    /// What the stage is doing, e.g. "Deploying..."
    pub fn action(&self) -> &'static str {
        self.stage.action()
    }

    pub fn entered_at(&self) -> DateTime<Utc> {
        self.entered_at
    }

    pub fn is_terminal(&self) -> bool {
        self.stage.is_terminal()
    }

    pub fn subscribe(&self, observer: SharedObserver) {
        self.observers.subscribe(observer);
    }

    pub fn unsubscribe(&self, observer: &SharedObserver) -> bool {
        self.observers.unsubscribe(observer)
    }

    /// Broadcast a message to every registered observer
    pub fn notify(&self, kind: EventKind, message: impl Into<String>) -> Vec<ObserverError> {
        let event = StateEvent {
            state: self,
            kind,
            message: message.into(),
        };
        self.observers.notify(&event)
    }

    /// Handle a transition trigger
    ///
    /// The forward trigger always yields the successor state. Cancellation
    /// yields the Cancelled state unless an observer refuses it. A refusal is
    /// broadcast from this state and reported, and Cancelled is never
    /// entered. Every other trigger is logged and returned as a
    /// [`TransitionError`].
    pub fn request(&self, trigger: Trigger) -> Result<StateChange, TransitionError> {
        match resolve(self.stage, trigger) {
            Ok(Resolution::Advance(next)) => {
                let (state, errors) = Self::enter(next, self.observers.clone());
                for error in &errors {
                    warn!("Ignoring observer failure on entering {}: {}", next, error);
                }
                info!("Pipeline moved from {} to {}", self.stage, next);
                Ok(StateChange::Install(state))
            }
            Ok(Resolution::Cancel) => Ok(self.cancel()),
            Err(error) => {
                warn!("{}", error);
                Err(error)
            }
        }
    }

    fn cancel(&self) -> StateChange {
        info!("Cancelling pipeline from {} State", self.stage);

        let refusals = self.observers.approve_cancellation(self);
        if refusals.is_empty() {
            let (state, errors) = Self::enter(Stage::Cancelled, self.observers.clone());
            for error in &errors {
                warn!("Ignoring observer failure on entering {}: {}", Stage::Cancelled, error);
            }
            return StateChange::Install(state);
        }

        let failure = CancellationError::from_observer_errors(self.stage, &refusals);
        warn!("{}", failure);
        for error in self.notify(EventKind::CancellationFailed, failure.to_string()) {
            warn!("Observer failed while reporting cancellation failure: {}", error);
        }
        StateChange::Reported(failure)
    }
}
