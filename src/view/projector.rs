//! Pure projection from workflow state and session to a view model.

use crate::config::WorkflowConfig;
use crate::controller::{button_for, ButtonProps, Prediction, Session};
use crate::machine::{describe, WorkflowState};
use serde::Serialize;

/// Attributes of the file input control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileInputProps {
    pub accept: String,
    pub capture: Option<String>,
}

/// Everything the rendering layer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub show_image: bool,
    pub image_source: Option<String>,
    pub show_results: bool,
    pub result_items: Vec<String>,
    pub button: ButtonProps,
    pub file_input: FileInputProps,
    pub error: Option<String>,
}

impl ViewModel {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Render a prediction as `"<label> <percent>%"`.
///
/// ```rust
/// use snapid::controller::Prediction;
/// use snapid::view::format_prediction;
///
/// assert_eq!(format_prediction(&Prediction::new("cat", 0.87), 2), "cat 87.00%");
/// ```
pub fn format_prediction(prediction: &Prediction, decimals: usize) -> String {
    format!(
        "{} {:.*}%",
        prediction.label,
        decimals,
        prediction.probability * 100.0
    )
}

/// Derive what should be shown for `state`.
///
/// The image source is only filled in when the state shows the image, and
/// result lines only when it shows results, even if the session still holds
/// them.
pub fn project(state: &WorkflowState, session: &Session, config: &WorkflowConfig) -> ViewModel {
    let flags = describe(state);

    let image_source = if flags.show_image {
        session.image().map(|image| image.source())
    } else {
        None
    };

    let result_items = if flags.show_results {
        session
            .results()
            .iter()
            .map(|p| format_prediction(p, config.probability_decimals))
            .collect()
    } else {
        Vec::new()
    };

    ViewModel {
        show_image: flags.show_image,
        image_source,
        show_results: flags.show_results,
        result_items,
        button: button_for(state),
        file_input: FileInputProps {
            accept: config.accept.clone(),
            capture: config.capture.clone(),
        },
        error: state.failure().map(|f| f.detail.clone()),
    }
}
