//! Preconditions checked before classification starts.
//!
//! Every violated precondition is collected, so a caller that skipped more
//! than one step learns about all of them at once.

use super::image::ImageHandle;
use super::service::Classifier;
use super::session::Session;
use std::sync::Arc;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Violation {
    #[error("classification capability has not been loaded")]
    CapabilityNotLoaded,

    #[error("no image has been selected")]
    NoImageSelected,
}

/// Check every identify precondition against `session`.
pub fn check_identify(session: &Session) -> Validation<(), NonEmptyVec<Violation>> {
    let mut checks: Vec<Validation<(), NonEmptyVec<Violation>>> = Vec::new();

    checks.push(if session.has_capability() {
        Validation::success(())
    } else {
        Validation::fail(Violation::CapabilityNotLoaded)
    });

    checks.push(if session.image().is_some() {
        Validation::success(())
    } else {
        Validation::fail(Violation::NoImageSelected)
    });

    Validation::all_vec(checks).map(|_| ())
}

/// The capability and image identify needs, or every violation.
pub(crate) fn identify_inputs(
    session: &Session,
) -> Result<(Arc<dyn Classifier>, ImageHandle), Vec<Violation>> {
    if let Validation::Failure(errors) = check_identify(session) {
        return Err(errors.iter().cloned().collect());
    }
    session
        .capability()
        .cloned()
        .zip(session.image().cloned())
        .ok_or_else(|| vec![Violation::CapabilityNotLoaded, Violation::NoImageSelected])
}
