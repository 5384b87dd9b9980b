//! Core state types shared by the workflow machine and controller.
//!
//! - State definitions via the `State` trait
//! - Guard predicates for gating triggers
//! - Immutable transition history
//!
//! Nothing in this module performs I/O.

mod guard;
mod history;
mod state;

pub use guard::Guard;
pub use history::{StateHistory, StateTransition};
pub use state::State;
