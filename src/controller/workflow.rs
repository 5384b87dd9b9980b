//! Controller that drives a session through the workflow.

use super::action::{button_for, ActionOutcome, ButtonAction, ButtonProps};
use super::error::{Operation, WorkflowError};
use super::image::{ImageFile, ImageHandle};
use super::preconditions::identify_inputs;
use super::service::{CapabilityLoader, Prediction};
use super::session::Session;
use crate::config::WorkflowConfig;
use crate::core::{Guard, State, StateHistory, StateTransition};
use crate::machine::{Stage, TransitionTable, WorkflowEvent, WorkflowState, STANDARD_TABLE};
use crate::view::{project, ViewModel};
use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Result of [`WorkflowController::handle_upload`].
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    /// The selection was empty; nothing changed.
    Ignored,
    /// The first file became the session image.
    Selected(ImageHandle),
}

struct Inner {
    state: WorkflowState,
    session: Session,
    history: StateHistory<WorkflowState>,
}

struct OperationGuards {
    idle: Guard<WorkflowState>,
    load: Guard<WorkflowState>,
    upload: Guard<WorkflowState>,
    identify: Guard<WorkflowState>,
    reset: Guard<WorkflowState>,
}

impl OperationGuards {
    fn standard() -> Self {
        Self {
            idle: Guard::idle(),
            load: Guard::new(|s: &WorkflowState| {
                matches!(s, WorkflowState::Initial) || s.failed_in(Stage::LoadingCapability)
            }),
            upload: Guard::one_of(vec![
                WorkflowState::AwaitingUpload,
                WorkflowState::Ready,
                WorkflowState::Complete,
            ]),
            identify: Guard::one_of(vec![WorkflowState::Ready]),
            reset: Guard::new(|s: &WorkflowState| {
                matches!(s, WorkflowState::Complete) || s.failed_in(Stage::Classifying)
            }),
        }
    }

    fn for_operation(&self, operation: Operation) -> &Guard<WorkflowState> {
        match operation {
            Operation::LoadCapability => &self.load,
            Operation::Upload => &self.upload,
            Operation::Identify => &self.identify,
            Operation::Reset => &self.reset,
        }
    }
}

/// Failure detail recorded when an operation future is dropped mid-flight.
pub const CANCELLED: &str = "cancelled";

/// Armed while a service call is awaited.
///
/// Dropping it armed (the caller gave up on the future) moves the pending
/// state to `Failed` so the session keeps offering Retry or Reset.
struct InFlight<'a> {
    controller: &'a WorkflowController,
    armed: bool,
}

impl<'a> InFlight<'a> {
    fn new(controller: &'a WorkflowController) -> Self {
        Self {
            controller,
            armed: true,
        }
    }

    fn settle(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut inner = self.controller.lock();
        if inner.state.is_pending() {
            warn!(state = %inner.state, "operation dropped before it settled");
            self.controller.apply(&mut inner, WorkflowEvent::fail(CANCELLED));
        }
    }
}

/// Owns one session and sequences its asynchronous work.
///
/// Operations take `&self`. The session lock is released before any
/// service call is awaited, and the "work started" transition is published
/// before the call is issued, so subscribers see `LoadingCapability` or
/// `Classifying` for the whole time the call is in flight. Triggers that
/// arrive meanwhile are rejected with [`WorkflowError::Busy`]. If the
/// operation's future is dropped before the call returns, the stage fails
/// with the detail [`CANCELLED`].
pub struct WorkflowController {
    loader: Arc<dyn CapabilityLoader>,
    config: WorkflowConfig,
    table: TransitionTable,
    guards: OperationGuards,
    inner: Mutex<Inner>,
    state_tx: watch::Sender<WorkflowState>,
}

impl WorkflowController {
    pub fn new(loader: Arc<dyn CapabilityLoader>, config: WorkflowConfig) -> Self {
        let (state_tx, _) = watch::channel(WorkflowState::Initial);
        let history = StateHistory::with_limit(config.history_limit);
        Self {
            loader,
            config,
            table: STANDARD_TABLE,
            guards: OperationGuards::standard(),
            inner: Mutex::new(Inner {
                state: WorkflowState::Initial,
                session: Session::new(),
                history,
            }),
            state_tx,
        }
    }

    pub fn builder() -> super::builder::ControllerBuilder {
        super::builder::ControllerBuilder::new()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current state (pure).
    pub fn state(&self) -> WorkflowState {
        self.lock().state.clone()
    }

    /// Receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<WorkflowState> {
        self.state_tx.subscribe()
    }

    /// Snapshot of the session data.
    pub fn session(&self) -> Session {
        self.lock().session.clone()
    }

    pub fn history(&self) -> StateHistory<WorkflowState> {
        self.lock().history.clone()
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Project the current state and session into a view model.
    pub fn view(&self) -> ViewModel {
        let inner = self.lock();
        project(&inner.state, &inner.session, &self.config)
    }

    pub fn button(&self) -> ButtonProps {
        button_for(&self.lock().state)
    }

    pub fn current_button_label(&self) -> &'static str {
        self.button().label
    }

    pub fn current_button_action(&self) -> ButtonAction {
        self.button().action
    }

    fn admit(&self, inner: &Inner, operation: Operation) -> Result<(), WorkflowError> {
        if !self.guards.idle.check(&inner.state) {
            warn!(%operation, state = %inner.state, "trigger rejected while an operation is in flight");
            return Err(WorkflowError::Busy {
                operation,
                state: inner.state.clone(),
            });
        }
        if !self.guards.for_operation(operation).check(&inner.state) {
            debug!(%operation, state = %inner.state, "operation not offered in this state");
            return Err(WorkflowError::NotAvailable {
                operation,
                state: inner.state.clone(),
            });
        }
        Ok(())
    }

    /// Apply `event` to the current state, record it and publish the result.
    fn apply(&self, inner: &mut Inner, event: WorkflowEvent) -> WorkflowState {
        let from = inner.state.clone();
        let event_name = event.name();
        if !self.table.accepts(&from, event_name) {
            warn!(state = %from, event = %event_name, "event not registered for state; falling back to Initial");
        }
        let to = self.table.transition(&from, &event);
        debug!(from = %from, to = %to, event = %event_name, "workflow transition");

        inner.history = inner.history.record(StateTransition {
            from,
            to: to.clone(),
            event: event_name.to_string(),
            timestamp: Utc::now(),
        });
        inner.state = to.clone();
        self.state_tx.send_replace(to.clone());
        to
    }

    /// Load the classification capability.
    ///
    /// Offered in `Initial`, and in `Failed` after a failed load as a retry.
    pub async fn load_capability(&self) -> Result<(), WorkflowError> {
        {
            let mut inner = self.lock();
            self.admit(&inner, Operation::LoadCapability)?;
            self.apply(&mut inner, WorkflowEvent::Next);
        }

        info!("loading classification capability");
        let in_flight = InFlight::new(self);
        let loaded = self.loader.load().await;
        in_flight.settle();
        match loaded {
            Ok(capability) => {
                let mut inner = self.lock();
                inner.session.set_capability(capability);
                self.apply(&mut inner, WorkflowEvent::Next);
                info!("classification capability loaded");
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "classification capability failed to load");
                let mut inner = self.lock();
                self.apply(&mut inner, WorkflowEvent::fail(err.message()));
                Err(WorkflowError::Load(err))
            }
        }
    }

    /// Take the first file of a selection as the session image.
    ///
    /// An empty selection is ignored in every state. A file with no reported
    /// media type is accepted; one whose type is reported and does not match
    /// `accept` is rejected. From `Ready` the image is replaced in place with
    /// no transition. From `Complete` the previous results are discarded and
    /// two `next` events move the workflow straight to `Ready`, so an upload
    /// does not always advance the state by exactly one `next`.
    pub fn handle_upload(&self, files: &[ImageFile]) -> Result<UploadOutcome, WorkflowError> {
        let Some(file) = files.first() else {
            debug!("empty file selection ignored");
            return Ok(UploadOutcome::Ignored);
        };

        let mut inner = self.lock();
        self.admit(&inner, Operation::Upload)?;
        if !self.config.accepts_media_type(&file.media_type) {
            warn!(media_type = %file.media_type, accept = %self.config.accept, "rejected upload");
            return Err(WorkflowError::UnsupportedMedia {
                media_type: file.media_type.clone(),
                accept: self.config.accept.clone(),
            });
        }

        let handle = ImageHandle::from_file(file);
        info!(file = %file.name, source = %handle.source(), ignored = files.len() - 1, "image selected");
        inner.session.select_image(handle.clone());

        let state = inner.state.clone();
        match state {
            WorkflowState::AwaitingUpload => {
                self.apply(&mut inner, WorkflowEvent::Next);
            }
            WorkflowState::Complete => {
                self.apply(&mut inner, WorkflowEvent::Next);
                self.apply(&mut inner, WorkflowEvent::Next);
            }
            _ => {}
        }
        Ok(UploadOutcome::Selected(handle))
    }

    /// Classify the selected image.
    ///
    /// Offered in `Ready`. Returns the ranked predictions as stored in the
    /// session.
    pub async fn identify(&self) -> Result<Vec<Prediction>, WorkflowError> {
        let (classifier, image) = {
            let mut inner = self.lock();
            self.admit(&inner, Operation::Identify)?;
            let inputs = identify_inputs(&inner.session).map_err(WorkflowError::Preconditions)?;
            self.apply(&mut inner, WorkflowEvent::Next);
            inputs
        };

        info!(source = %image.source(), "classifying image");
        let in_flight = InFlight::new(self);
        let classified = classifier.classify(&image).await;
        in_flight.settle();
        match classified {
            Ok(results) => {
                let mut inner = self.lock();
                info!(count = results.len(), top = ?results.first().map(|p| &p.label), "classification complete");
                inner.session.set_results(results.clone());
                self.apply(&mut inner, WorkflowEvent::Next);
                Ok(results)
            }
            Err(err) => {
                error!(error = %err, "classification failed");
                let mut inner = self.lock();
                self.apply(&mut inner, WorkflowEvent::fail(err.message()));
                Err(WorkflowError::Classify(err))
            }
        }
    }

    /// Discard the image and results and wait for the next upload.
    pub fn reset(&self) -> Result<(), WorkflowError> {
        let mut inner = self.lock();
        self.admit(&inner, Operation::Reset)?;
        inner.session.clear();
        self.apply(&mut inner, WorkflowEvent::Next);
        Ok(())
    }

    /// Dispatch a button action to its operation.
    pub async fn perform(&self, action: ButtonAction) -> Result<ActionOutcome, WorkflowError> {
        match action {
            ButtonAction::LoadCapability => {
                self.load_capability().await?;
                Ok(ActionOutcome::Completed)
            }
            ButtonAction::Identify => {
                self.identify().await?;
                Ok(ActionOutcome::Completed)
            }
            ButtonAction::Reset => {
                self.reset()?;
                Ok(ActionOutcome::Completed)
            }
            ButtonAction::OpenFilePicker => Ok(ActionOutcome::OpenFilePicker),
            ButtonAction::Noop => Ok(ActionOutcome::Ignored),
        }
    }

    /// Press the action button as it is labelled right now.
    pub async fn press(&self) -> Result<ActionOutcome, WorkflowError> {
        let action = self.current_button_action();
        self.perform(action).await
    }
}

impl std::fmt::Debug for WorkflowController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("WorkflowController")
            .field("state", &inner.state)
            .field("session", &inner.session)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
