//! Photo Session
//!
//! Drives one controller through a full round with an in-memory classifier,
//! printing the view model after every step.
//!
//! Key concepts:
//! - Services are injected through the `CapabilityLoader` trait
//! - The view model is recomputed from state and session after each action
//! - A failed classification leaves the session recoverable via Reset
//!
//! Run with: RUST_LOG=snapid=debug cargo run --example photo_session

use async_trait::async_trait;
use snapid::controller::{
    ActionOutcome, CapabilityLoader, Classifier, ImageFile, ImageHandle, Prediction, ServiceError,
    WorkflowController,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Pretends to recognise cats in JPEGs and rejects everything else.
struct ToyClassifier;

#[async_trait]
impl Classifier for ToyClassifier {
    async fn classify(&self, image: &ImageHandle) -> Result<Vec<Prediction>, ServiceError> {
        if image.media_type() != "image/jpeg" {
            return Err(ServiceError::new(format!(
                "cannot decode {}",
                image.media_type()
            )));
        }
        Ok(vec![
            Prediction::new("tabby cat", 0.8731),
            Prediction::new("tiger cat", 0.0904),
            Prediction::new("Egyptian cat", 0.0211),
        ])
    }
}

struct ToyLoader;

#[async_trait]
impl CapabilityLoader for ToyLoader {
    async fn load(&self) -> Result<Arc<dyn Classifier>, ServiceError> {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        Ok(Arc::new(ToyClassifier))
    }
}

fn show(step: &str, controller: &WorkflowController) {
    match controller.view().to_json() {
        Ok(json) => println!("{step:>10}: {json}"),
        Err(err) => println!("{step:>10}: <unserializable view: {err}>"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Photo Session Example ===\n");

    let controller = WorkflowController::builder().loader(ToyLoader).build()?;
    show("start", &controller);

    controller.press().await?;
    show("loaded", &controller);

    if controller.press().await? == ActionOutcome::OpenFilePicker {
        controller.handle_upload(&[ImageFile::new(
            "kitchen-cat.jpg",
            "image/jpeg",
            vec![0xffu8, 0xd8, 0xff, 0xe0],
        )])?;
    }
    show("uploaded", &controller);

    controller.press().await?;
    show("complete", &controller);

    controller.press().await?;
    show("reset", &controller);

    controller.handle_upload(&[ImageFile::new("scan.png", "image/png", vec![0x89u8, b'P'])])?;
    if let Err(err) = controller.identify().await {
        println!("\n  identify failed: {err}\n");
    }
    show("failed", &controller);

    controller.press().await?;
    show("recovered", &controller);

    let path: Vec<String> = controller
        .history()
        .get_path()
        .iter()
        .map(|s| s.to_string())
        .collect();
    println!("\nPath: {}", path.join(" -> "));

    println!("\n=== Example Complete ===");
    Ok(())
}
