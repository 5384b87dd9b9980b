//! Mutable data owned by one workflow session.

use super::image::ImageHandle;
use super::service::{Classifier, Prediction};
use std::fmt;
use std::sync::Arc;

/// Session data held by a single controller.
///
/// The capability is set at most once and survives resets. The image and
/// results are replaced on upload and cleared on reset.
#[derive(Clone, Default)]
pub struct Session {
    capability: Option<Arc<dyn Classifier>>,
    image: Option<ImageHandle>,
    results: Vec<Prediction>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capability(&self) -> Option<&Arc<dyn Classifier>> {
        self.capability.as_ref()
    }

    pub fn has_capability(&self) -> bool {
        self.capability.is_some()
    }

    pub fn image(&self) -> Option<&ImageHandle> {
        self.image.as_ref()
    }

    pub fn results(&self) -> &[Prediction] {
        &self.results
    }

    /// Store the loaded capability. Returns `false` if one was already set,
    /// in which case the existing capability is kept.
    pub(crate) fn set_capability(&mut self, capability: Arc<dyn Classifier>) -> bool {
        if self.capability.is_some() {
            return false;
        }
        self.capability = Some(capability);
        true
    }

    /// Select a new image; results of the previous image are discarded.
    pub(crate) fn select_image(&mut self, image: ImageHandle) {
        self.image = Some(image);
        self.results.clear();
    }

    pub(crate) fn set_results(&mut self, results: Vec<Prediction>) {
        self.results = results;
    }

    pub(crate) fn clear(&mut self) {
        self.image = None;
        self.results.clear();
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("capability_loaded", &self.has_capability())
            .field("image", &self.image)
            .field("results", &self.results)
            .finish()
    }
}
