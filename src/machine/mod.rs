//! The workflow state machine.
//!
//! A pure transition table mapping (state, event) to the next state, plus
//! the per-state display flags the view layer reads. No I/O happens here;
//! the table is immutable and safe to share between threads.

mod event;
mod state;
mod table;

pub use event::{EventName, UnknownEvent, WorkflowEvent};
pub use state::{Failure, Stage, WorkflowState};
pub use table::{describe, transition, DisplayFlags, StateSpec, TransitionTable, STANDARD_TABLE};
