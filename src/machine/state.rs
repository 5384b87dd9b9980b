//! Workflow states for a photo identification session.

use crate::core::State;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The asynchronous stage an operation failed in.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Stage {
    LoadingCapability,
    Classifying,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadingCapability => "LoadingCapability",
            Self::Classifying => "Classifying",
        }
    }
}

/// Detail carried by [`WorkflowState::Failed`].
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Failure {
    pub stage: Stage,
    pub detail: String,
}

impl Failure {
    pub fn new(stage: Stage, detail: impl Into<String>) -> Self {
        Self {
            stage,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.stage.name(), self.detail)
    }
}

/// Where a session currently is.
///
/// A session starts in `Initial`, loads the capability once, then cycles
/// `AwaitingUpload -> Ready -> Classifying -> Complete -> AwaitingUpload`.
/// `Failed` is entered only from the two pending states.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum WorkflowState {
    #[default]
    Initial,
    LoadingCapability,
    AwaitingUpload,
    Ready,
    Classifying,
    Complete,
    Failed(Failure),
}

impl WorkflowState {
    /// Every fieldless state, in cycle order.
    pub const CYCLE: [WorkflowState; 6] = [
        WorkflowState::Initial,
        WorkflowState::LoadingCapability,
        WorkflowState::AwaitingUpload,
        WorkflowState::Ready,
        WorkflowState::Classifying,
        WorkflowState::Complete,
    ];

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn failed_in(&self, stage: Stage) -> bool {
        self.failure().is_some_and(|f| f.stage == stage)
    }
}

impl State for WorkflowState {
    fn name(&self) -> &str {
        match self {
            Self::Initial => "Initial",
            Self::LoadingCapability => "LoadingCapability",
            Self::AwaitingUpload => "AwaitingUpload",
            Self::Ready => "Ready",
            Self::Classifying => "Classifying",
            Self::Complete => "Complete",
            Self::Failed(_) => "Failed",
        }
    }

    fn is_pending(&self) -> bool {
        matches!(self, Self::LoadingCapability | Self::Classifying)
    }

    fn is_error(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(failure) => write!(f, "Failed({})", failure.stage.name()),
            other => f.write_str(other.name()),
        }
    }
}
