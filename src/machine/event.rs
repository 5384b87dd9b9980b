//! Events that drive workflow transitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// An event fed to the transition table.
///
/// User actions only ever emit `Next`. `Fail` is emitted by the controller
/// when a pending asynchronous operation rejects.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum WorkflowEvent {
    Next,
    Fail(String),
}

impl WorkflowEvent {
    pub fn fail(detail: impl Into<String>) -> Self {
        Self::Fail(detail.into())
    }

    pub fn name(&self) -> EventName {
        match self {
            Self::Next => EventName::Next,
            Self::Fail(_) => EventName::Fail,
        }
    }
}

/// Fieldless key under which an event is registered in the table.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventName {
    Next,
    Fail,
}

impl EventName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::Fail => "fail",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown workflow event '{0}'")]
pub struct UnknownEvent(pub String);

impl FromStr for EventName {
    type Err = UnknownEvent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "next" => Ok(Self::Next),
            "fail" => Ok(Self::Fail),
            other => Err(UnknownEvent(other.to_string())),
        }
    }
}
