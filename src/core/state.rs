//! Core State trait for workflow states.
//!
//! Every state the controller can sit in implements this trait, which exposes
//! pure inspection methods used by guards, history and the view layer.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for workflow states.
///
/// All methods are pure. A state is an immutable value describing where a
/// session currently is.
///
/// # Required Traits
///
/// - `Clone`: states are copied into history records
/// - `PartialEq`: guards and transition lookups compare states
/// - `Debug`: states show up in logs and error messages
/// - `Serialize` + `Deserialize`: history and view snapshots are serializable
///
/// # Example
///
/// ```rust
/// use snapid::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum UploadState {
///     Idle,
///     Sending,
///     Rejected,
/// }
///
/// impl State for UploadState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Idle => "Idle",
///             Self::Sending => "Sending",
///             Self::Rejected => "Rejected",
///         }
///     }
///
///     fn is_pending(&self) -> bool {
///         matches!(self, Self::Sending)
///     }
///
///     fn is_error(&self) -> bool {
///         matches!(self, Self::Rejected)
///     }
/// }
///
/// assert!(UploadState::Sending.is_pending());
/// assert!(!UploadState::Idle.is_error());
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;

    /// Check if an asynchronous operation is in flight in this state.
    ///
    /// Pending states accept no user triggers until the operation settles.
    ///
    /// Default implementation returns `false`.
    fn is_pending(&self) -> bool {
        false
    }

    /// Check if this state records a failed operation.
    ///
    /// Default implementation returns `false`.
    fn is_error(&self) -> bool {
        false
    }
}
