//! The workflow controller: the imperative shell around the pure machine.
//!
//! The controller binds workflow transitions to the asynchronous loading
//! and classification services and owns the per-session data.
//!
//! # Key Concepts
//!
//! - **Services**: `CapabilityLoader` and `Classifier` are async traits the
//!   embedding application implements
//! - **Session**: the loaded capability, selected image and results
//! - **Guards**: each operation is offered only in specific states, and no
//!   trigger is accepted while an operation is in flight
//! - **Preconditions**: identify checks every precondition and reports all
//!   violations together

pub mod action;
pub mod builder;
pub mod error;
pub mod image;
pub mod preconditions;
pub mod service;
pub mod session;
mod workflow;

pub use action::{button_for, ActionOutcome, ButtonAction, ButtonProps};
pub use builder::ControllerBuilder;
pub use error::{BuildError, Operation, WorkflowError};
pub use image::{ImageFile, ImageHandle};
pub use preconditions::{check_identify, Violation};
pub use service::{CapabilityLoader, Classifier, Prediction, ServiceError};
pub use session::Session;
pub use workflow::{UploadOutcome, WorkflowController, CANCELLED};
