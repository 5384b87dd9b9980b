//! Snapid: a workflow controller for photo identification sessions.
//!
//! Snapid follows a "pure core, imperative shell" split. The transition table
//! and the view projection are pure functions; the controller is the shell
//! that performs the asynchronous capability load and classification and
//! owns the session data.
//!
//! # Core Concepts
//!
//! - **Machine**: `WorkflowState`, `WorkflowEvent` and the `TransitionTable`
//! - **Controller**: `WorkflowController` sequencing load, upload, identify
//!   and reset against the `CapabilityLoader` / `Classifier` services
//! - **View**: `project` turns state and session into a `ViewModel`
//!
//! # Example
//!
//! ```rust
//! use snapid::controller::{
//!     CapabilityLoader, Classifier, ImageFile, ImageHandle, Prediction, ServiceError,
//!     WorkflowController,
//! };
//! use snapid::machine::WorkflowState;
//! use async_trait::async_trait;
//! use std::sync::Arc;
//!
//! struct Tabby;
//!
//! #[async_trait]
//! impl Classifier for Tabby {
//!     async fn classify(&self, _image: &ImageHandle) -> Result<Vec<Prediction>, ServiceError> {
//!         Ok(vec![Prediction::new("cat", 0.87)])
//!     }
//! }
//!
//! struct Loader;
//!
//! #[async_trait]
//! impl CapabilityLoader for Loader {
//!     async fn load(&self) -> Result<Arc<dyn Classifier>, ServiceError> {
//!         Ok(Arc::new(Tabby))
//!     }
//! }
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let controller = WorkflowController::builder().loader(Loader).build().unwrap();
//!
//! controller.load_capability().await.unwrap();
//! controller
//!     .handle_upload(&[ImageFile::new("cat.jpg", "image/jpeg", vec![0u8])])
//!     .unwrap();
//! controller.identify().await.unwrap();
//!
//! assert_eq!(controller.state(), WorkflowState::Complete);
//! assert_eq!(controller.view().result_items, vec!["cat 87.00%"]);
//! # });
//! ```

pub mod config;
pub mod controller;
pub mod core;
pub mod machine;
pub mod view;

// Re-export commonly used types
pub use crate::config::WorkflowConfig;
pub use crate::controller::{WorkflowController, WorkflowError};
pub use crate::core::{Guard, State, StateHistory, StateTransition};
pub use crate::machine::{WorkflowEvent, WorkflowState};
pub use crate::view::{project, ViewModel};
