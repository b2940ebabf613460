//! Thread-safe handle to a pipeline

use crate::core::{
    observer::{ObserverRegistry, SharedObserver},
    pipeline::{Pipeline, TransitionOutcome},
    stage::{Stage, TransitionError, Trigger},
    visitor::PipelineVisitor,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use uuid::Uuid;

/// Stage and identity of the installed state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Installed {
    stage: Stage,
    state_id: Uuid,
}

impl Installed {
    fn of(pipeline: &Pipeline) -> Self {
        Self {
            stage: pipeline.stage(),
            state_id: pipeline.state().id(),
        }
    }
}

/// Cloneable handle that serialises transition requests on one pipeline
///
/// "Read the state, decide legality, install the successor" runs under a
/// single lock, so two concurrent requests can never both act on the same
/// predecessor. Observers are notified while that lock is held.
///
/// From inside an observer callback it is safe to subscribe, unsubscribe and
/// read [`stage`](Self::stage) or [`state_id`](Self::state_id). Those reads
/// report the state being replaced until the transition completes.
/// `request_transition`, `traverse` and `with_pipeline` wait for the lock and
/// must not be called from a callback of the same pipeline.
#[derive(Debug, Clone)]
pub struct SharedPipeline {
    inner: Arc<Mutex<Pipeline>>,
    observers: ObserverRegistry,
    installed: Arc<RwLock<Installed>>,
}

impl SharedPipeline {
    pub fn new(pipeline: Pipeline) -> Self {
        let observers = pipeline.observers().clone();
        let installed = Installed::of(&pipeline);
        Self {
            inner: Arc::new(Mutex::new(pipeline)),
            observers,
            installed: Arc::new(RwLock::new(installed)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Pipeline> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn installed(&self) -> Installed {
        *self.installed.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, pipeline: &Pipeline) {
        *self.installed.write().unwrap_or_else(PoisonError::into_inner) = Installed::of(pipeline);
    }

    pub fn request_transition(
        &self,
        trigger: Trigger,
    ) -> Result<TransitionOutcome, TransitionError> {
        let mut pipeline = self.lock();
        let outcome = pipeline.request_transition(trigger)?;
        self.record(&pipeline);
        Ok(outcome)
    }

    pub fn stage(&self) -> Stage {
        self.installed().stage
    }

    /// Identity of the installed state
    pub fn state_id(&self) -> Uuid {
        self.installed().state_id
    }

    pub fn subscribe(&self, observer: SharedObserver) {
        self.observers.subscribe(observer);
    }

    pub fn unsubscribe(&self, observer: &SharedObserver) -> bool {
        self.observers.unsubscribe(observer)
    }

    pub fn traverse<V: PipelineVisitor + ?Sized>(&self, visitor: &mut V) {
        self.lock().traverse(visitor);
    }

    /// Run `f` with exclusive access to the pipeline
    pub fn with_pipeline<R>(&self, f: impl FnOnce(&mut Pipeline) -> R) -> R {
        let mut pipeline = self.lock();
        let result = f(&mut *pipeline);
        self.record(&pipeline);
        result
    }
}
