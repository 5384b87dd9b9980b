//! View projection.
//!
//! Derives, from the current state and session, which regions render, the
//! formatted result lines and the action button. Cheap enough to run on
//! every render.

mod projector;

pub use projector::{format_prediction, project, FileInputProps, ViewModel};
