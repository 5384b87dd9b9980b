//! The transition table and its pure lookups.

use super::event::{EventName, WorkflowEvent};
use super::state::{Failure, Stage, WorkflowState};

/// Which regions a state renders.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DisplayFlags {
    pub show_image: bool,
    pub show_results: bool,
}

/// Row of the transition table for one state.
///
/// `on_fail` names the stage recorded when a `Fail` event arrives; the
/// resulting state carries the event's detail. Flags not set default to
/// `false`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StateSpec {
    pub on_next: Option<WorkflowState>,
    pub on_fail: Option<Stage>,
    pub show_image: bool,
    pub show_results: bool,
}

impl StateSpec {
    fn next(to: WorkflowState) -> Self {
        Self {
            on_next: Some(to),
            ..Self::default()
        }
    }

    fn or_fail(mut self, stage: Stage) -> Self {
        self.on_fail = Some(stage);
        self
    }

    fn showing_image(mut self) -> Self {
        self.show_image = true;
        self
    }

    fn showing_results(mut self) -> Self {
        self.show_results = true;
        self
    }

    pub fn flags(&self) -> DisplayFlags {
        DisplayFlags {
            show_image: self.show_image,
            show_results: self.show_results,
        }
    }

    pub fn accepts(&self, event: EventName) -> bool {
        match event {
            EventName::Next => self.on_next.is_some(),
            EventName::Fail => self.on_fail.is_some(),
        }
    }
}

/// Immutable mapping from state to [`StateSpec`].
///
/// The mapping is an exhaustive match, so every new state has to declare
/// its row before the crate compiles.
#[derive(Clone, Copy, Debug, Default)]
pub struct TransitionTable;

/// The table every controller uses.
pub static STANDARD_TABLE: TransitionTable = TransitionTable;

impl TransitionTable {
    pub fn spec(&self, state: &WorkflowState) -> StateSpec {
        use WorkflowState::*;

        match state {
            Initial => StateSpec::next(LoadingCapability),
            LoadingCapability => StateSpec::next(AwaitingUpload).or_fail(Stage::LoadingCapability),
            AwaitingUpload => StateSpec::next(Ready),
            Ready => StateSpec::next(Classifying).showing_image(),
            Classifying => StateSpec::next(Complete).or_fail(Stage::Classifying),
            Complete => StateSpec::next(AwaitingUpload)
                .showing_image()
                .showing_results(),
            Failed(failure) => match failure.stage {
                Stage::LoadingCapability => StateSpec::next(LoadingCapability),
                Stage::Classifying => StateSpec::next(AwaitingUpload).showing_image(),
            },
        }
    }

    /// Next state for `event` in `current`.
    ///
    /// Events the state does not register fall back to `Initial`.
    pub fn transition(&self, current: &WorkflowState, event: &WorkflowEvent) -> WorkflowState {
        let spec = self.spec(current);
        let next = match event {
            WorkflowEvent::Next => spec.on_next,
            WorkflowEvent::Fail(detail) => spec
                .on_fail
                .map(|stage| WorkflowState::Failed(Failure::new(stage, detail.clone()))),
        };
        next.unwrap_or(WorkflowState::Initial)
    }

    /// Transition keyed by event name.
    ///
    /// Unknown names fall back to `Initial`, as do names the state does not
    /// register. A `fail` delivered this way carries an empty detail.
    pub fn transition_named(&self, current: &WorkflowState, name: &str) -> WorkflowState {
        match name.parse::<EventName>() {
            Ok(EventName::Next) => self.transition(current, &WorkflowEvent::Next),
            Ok(EventName::Fail) => self.transition(current, &WorkflowEvent::fail("")),
            Err(_) => WorkflowState::Initial,
        }
    }

    pub fn accepts(&self, current: &WorkflowState, event: EventName) -> bool {
        self.spec(current).accepts(event)
    }

    pub fn describe(&self, state: &WorkflowState) -> DisplayFlags {
        self.spec(state).flags()
    }
}

/// [`TransitionTable::transition`] on the standard table.
pub fn transition(current: &WorkflowState, event: &WorkflowEvent) -> WorkflowState {
    STANDARD_TABLE.transition(current, event)
}

/// [`TransitionTable::describe`] on the standard table.
pub fn describe(state: &WorkflowState) -> DisplayFlags {
    STANDARD_TABLE.describe(state)
}
