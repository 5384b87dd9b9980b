//! The single action button and what it does in each state.

use crate::machine::{Stage, WorkflowState};
use serde::Serialize;

/// What pressing the action button triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonAction {
    LoadCapability,
    OpenFilePicker,
    Identify,
    Reset,
    Noop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ButtonProps {
    pub label: &'static str,
    pub action: ButtonAction,
}

/// Result of dispatching a [`ButtonAction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The operation ran to completion.
    Completed,
    /// The view should open its file picker.
    OpenFilePicker,
    /// The action was a no-op.
    Ignored,
}

pub fn button_for(state: &WorkflowState) -> ButtonProps {
    let (label, action) = match state {
        WorkflowState::Initial => ("Load Model", ButtonAction::LoadCapability),
        WorkflowState::LoadingCapability => ("Loading model...", ButtonAction::Noop),
        WorkflowState::AwaitingUpload => ("Upload Photo", ButtonAction::OpenFilePicker),
        WorkflowState::Ready => ("Identify", ButtonAction::Identify),
        WorkflowState::Classifying => ("Classifying", ButtonAction::Noop),
        WorkflowState::Complete => ("Reset", ButtonAction::Reset),
        WorkflowState::Failed(failure) => match failure.stage {
            Stage::LoadingCapability => ("Retry", ButtonAction::LoadCapability),
            Stage::Classifying => ("Reset", ButtonAction::Reset),
        },
    };
    ButtonProps { label, action }
}
