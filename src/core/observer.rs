//! Observer notification fan-out

use crate::core::{stage::Stage, state::PipelineState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Error an observer returns when it cannot accept a notification
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("observer '{observer}' rejected notification: {reason}")]
pub struct ObserverError {
    pub observer: String,
    pub reason: String,
}

impl ObserverError {
    pub fn new(observer: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            observer: observer.into(),
            reason: reason.into(),
        }
    }
}

/// Why a notification was sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A new state was entered
    Entered,
    /// Entering the cancelled state failed; the message carries the error
    CancellationFailed,
}

/// Payload handed to every observer
#[derive(Debug, Clone)]
pub struct StateEvent<'a> {
    /// The state that is notifying
    pub state: &'a PipelineState,
    pub kind: EventKind,
    pub message: String,
}

/// A listener for pipeline state changes
pub trait Observer: Send + Sync {
    /// Name used in diagnostics
    fn name(&self) -> &str {
        "observer"
    }

    /// Receive a notification
    fn receive(&self, event: &StateEvent<'_>) -> Result<(), ObserverError>;

    /// Veto a cancellation requested while the pipeline is in `state`
    ///
    /// Asked before the Cancelled state is created. Any error keeps the
    /// pipeline where it is.
    fn approve_cancellation(&self, _state: &PipelineState) -> Result<(), ObserverError> {
        Ok(())
    }
}

/// Observer handle as stored in a registry
pub type SharedObserver = Arc<dyn Observer>;

/// List of registered observers, shared by a pipeline and its states
///
/// Cloning the registry yields another handle to the same list.
#[derive(Clone, Default)]
pub struct ObserverRegistry {
    observers: Arc<RwLock<Vec<SharedObserver>>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an observer. The same observer may be registered twice.
    pub fn subscribe(&self, observer: SharedObserver) {
        self.observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(observer);
    }

    /// Remove the first registration of `observer`; returns whether one was found
    pub fn unsubscribe(&self, observer: &SharedObserver) -> bool {
        let mut observers = self
            .observers
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        match observers
            .iter()
            .position(|o| std::ptr::addr_eq(Arc::as_ptr(o), Arc::as_ptr(observer)))
        {
            Some(index) => {
                observers.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Observers registered right now
    pub fn snapshot(&self) -> Vec<SharedObserver> {
        self.observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Deliver `event` to every observer registered when the call starts
    ///
    /// The lock is released before any callback runs, so observers may
    /// subscribe or unsubscribe from inside `receive`. Every observer is
    /// called even if an earlier one fails; the failures are returned.
    pub fn notify(&self, event: &StateEvent<'_>) -> Vec<ObserverError> {
        let observers = self.snapshot();
        debug!(
            "Notifying {} observer(s): {} ({:?})",
            observers.len(),
            event.message,
            event.kind
        );

        observers
            .iter()
            .filter_map(|observer| observer.receive(event).err())
            .collect()
    }

    /// Ask every registered observer whether `state` may be cancelled
    ///
    /// Nothing is broadcast. All observers are asked; the refusals are
    /// returned.
    pub fn approve_cancellation(&self, state: &PipelineState) -> Vec<ObserverError> {
        self.snapshot()
            .iter()
            .filter_map(|observer| observer.approve_cancellation(state).err())
            .collect()
    }
}

impl fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.len())
            .finish()
    }
}

/// A recorded notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Identity of the state that notified
    pub state_id: Uuid,
    pub stage: Stage,
    pub kind: EventKind,
    pub message: String,
    pub received_at: DateTime<Utc>,
}

/// Observer that keeps every notification it receives
#[derive(Debug, Default)]
pub struct EventLog {
    notifications: Mutex<Vec<Notification>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything received so far
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Observer for EventLog {
    fn name(&self) -> &str {
        "event-log"
    }

    fn receive(&self, event: &StateEvent<'_>) -> Result<(), ObserverError> {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Notification {
                state_id: event.state.id(),
                stage: event.state.stage(),
                kind: event.kind,
                message: event.message.clone(),
                received_at: Utc::now(),
            });
        Ok(())
    }
}
