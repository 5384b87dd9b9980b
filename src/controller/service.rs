//! Contracts of the external classification capability.

use super::image::ImageHandle;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// A failure reported by the capability loader or the classifier.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ServiceError {
    message: String,
}

impl ServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// One ranked classification result.
///
/// The service reports the label as `className`; `label` is accepted too.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    #[serde(rename = "className", alias = "label")]
    pub label: String,
    pub probability: f64,
}

impl Prediction {
    pub fn new(label: impl Into<String>, probability: f64) -> Self {
        Self {
            label: label.into(),
            probability,
        }
    }
}

/// A loaded classification capability.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify `image`, returning predictions sorted by descending
    /// probability. The order is consumed as-is.
    async fn classify(&self, image: &ImageHandle) -> Result<Vec<Prediction>, ServiceError>;
}

/// Loads the classification capability.
#[async_trait]
pub trait CapabilityLoader: Send + Sync {
    async fn load(&self) -> Result<Arc<dyn Classifier>, ServiceError>;
}
