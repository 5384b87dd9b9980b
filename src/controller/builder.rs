//! Builder for constructing controllers.

use super::error::BuildError;
use super::service::CapabilityLoader;
use super::workflow::WorkflowController;
use crate::config::WorkflowConfig;
use std::sync::Arc;

/// Fluent builder for [`WorkflowController`].
///
/// ```rust
/// use snapid::controller::{ControllerBuilder, BuildError};
///
/// let result = ControllerBuilder::new().build();
/// assert!(matches!(result, Err(BuildError::MissingLoader)));
/// ```
#[derive(Default)]
pub struct ControllerBuilder {
    loader: Option<Arc<dyn CapabilityLoader>>,
    config: Option<WorkflowConfig>,
}

impl ControllerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the capability loader (required).
    pub fn loader<L>(self, loader: L) -> Self
    where
        L: CapabilityLoader + 'static,
    {
        self.shared_loader(Arc::new(loader))
    }

    /// Set a loader that is shared with other controllers.
    pub fn shared_loader(mut self, loader: Arc<dyn CapabilityLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Override the default configuration.
    pub fn config(mut self, config: WorkflowConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn build(self) -> Result<WorkflowController, BuildError> {
        let loader = self.loader.ok_or(BuildError::MissingLoader)?;
        Ok(WorkflowController::new(
            loader,
            self.config.unwrap_or_default(),
        ))
    }
}
