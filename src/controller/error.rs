//! Controller error types.

use super::preconditions::Violation;
use super::service::ServiceError;
use crate::machine::WorkflowState;
use std::fmt;
use thiserror::Error;

/// Operations a controller exposes to the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    LoadCapability,
    Upload,
    Identify,
    Reset,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LoadCapability => "load capability",
            Self::Upload => "upload",
            Self::Identify => "identify",
            Self::Reset => "reset",
        })
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum WorkflowError {
    #[error("{operation} rejected: an operation is already in flight in state {state}")]
    Busy {
        operation: Operation,
        state: WorkflowState,
    },

    #[error("{operation} is not available in state {state}")]
    NotAvailable {
        operation: Operation,
        state: WorkflowState,
    },

    #[error("unsupported media type '{media_type}' (accepted: {accept})")]
    UnsupportedMedia { media_type: String, accept: String },

    #[error("identify preconditions failed: {}", join(.0))]
    Preconditions(Vec<Violation>),

    #[error("capability load failed: {0}")]
    Load(#[source] ServiceError),

    #[error("classification failed: {0}")]
    Classify(#[source] ServiceError),
}

fn join(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors raised while assembling a controller.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Capability loader not specified. Call .loader(loader) before .build()")]
    MissingLoader,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_names_operation_and_state() {
        let err = WorkflowError::Busy {
            operation: Operation::Identify,
            state: WorkflowState::Classifying,
        };
        assert_eq!(
            err.to_string(),
            "identify rejected: an operation is already in flight in state Classifying"
        );
    }

    #[test]
    fn preconditions_list_every_violation() {
        let err = WorkflowError::Preconditions(vec![
            Violation::CapabilityNotLoaded,
            Violation::NoImageSelected,
        ]);
        assert_eq!(
            err.to_string(),
            "identify preconditions failed: classification capability has not been loaded; no image has been selected"
        );
    }
}
