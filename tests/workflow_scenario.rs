//! End-to-end workflow scenarios against mock services.

use async_trait::async_trait;
use snapid::config::WorkflowConfig;
use snapid::controller::{
    ActionOutcome, ButtonAction, CapabilityLoader, Classifier, ImageFile, ImageHandle, Operation,
    Prediction, ServiceError, UploadOutcome, WorkflowController, WorkflowError, CANCELLED,
};
use snapid::machine::{Failure, Stage, WorkflowState};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// Classifier returning a fixed ranking, optionally held until released.
struct MockClassifier {
    results: Result<Vec<Prediction>, ServiceError>,
    gate: Option<Arc<Notify>>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Classifier for MockClassifier {
    async fn classify(&self, _image: &ImageHandle) -> Result<Vec<Prediction>, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.results.clone()
    }
}

/// Loader that fails `failures` times before handing out its classifier.
struct MockLoader {
    classifier: Arc<MockClassifier>,
    failures: AtomicUsize,
    gate: Option<Arc<Notify>>,
    loads: AtomicUsize,
}

#[async_trait]
impl CapabilityLoader for MockLoader {
    async fn load(&self) -> Result<Arc<dyn Classifier>, ServiceError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(ServiceError::new("model download failed"));
        }
        Ok(self.classifier.clone())
    }
}

struct Fixture {
    loader: Arc<MockLoader>,
    classify_calls: Arc<AtomicUsize>,
}

impl Fixture {
    fn new() -> Self {
        Self::with(Ok(vec![Prediction::new("cat", 0.87)]), None, 0, None)
    }

    fn with(
        results: Result<Vec<Prediction>, ServiceError>,
        classify_gate: Option<Arc<Notify>>,
        load_failures: usize,
        load_gate: Option<Arc<Notify>>,
    ) -> Self {
        let classify_calls = Arc::new(AtomicUsize::new(0));
        let classifier = Arc::new(MockClassifier {
            results,
            gate: classify_gate,
            calls: Arc::clone(&classify_calls),
        });
        let loader = Arc::new(MockLoader {
            classifier,
            failures: AtomicUsize::new(load_failures),
            gate: load_gate,
            loads: AtomicUsize::new(0),
        });
        Self {
            loader,
            classify_calls,
        }
    }

    fn controller(&self) -> WorkflowController {
        WorkflowController::builder()
            .shared_loader(self.loader.clone())
            .build()
            .unwrap()
    }
}

fn photo(name: &str) -> ImageFile {
    ImageFile::new(name, "image/jpeg", vec![0xffu8, 0xd8, 0xff])
}

async fn ready(controller: &WorkflowController) {
    controller.load_capability().await.unwrap();
    controller.handle_upload(&[photo("cat.jpg")]).unwrap();
    assert_eq!(controller.state(), WorkflowState::Ready);
}

#[tokio::test]
async fn full_round_from_load_to_reset() {
    let fixture = Fixture::new();
    let controller = fixture.controller();
    assert_eq!(controller.state(), WorkflowState::Initial);

    controller.load_capability().await.unwrap();
    assert_eq!(controller.state(), WorkflowState::AwaitingUpload);
    assert!(controller.session().has_capability());
    assert_eq!(controller.current_button_label(), "Upload Photo");

    let outcome = controller.handle_upload(&[photo("cat.jpg")]).unwrap();
    assert!(matches!(outcome, UploadOutcome::Selected(_)));
    assert_eq!(controller.state(), WorkflowState::Ready);
    let view = controller.view();
    assert!(view.show_image);
    assert_eq!(
        view.image_source,
        controller.session().image().map(|i| i.source())
    );
    assert_eq!(view.button.label, "Identify");

    let results = controller.identify().await.unwrap();
    assert_eq!(results, vec![Prediction::new("cat", 0.87)]);
    assert_eq!(controller.state(), WorkflowState::Complete);
    let view = controller.view();
    assert!(view.show_image);
    assert!(view.show_results);
    assert_eq!(view.result_items, vec!["cat 87.00%".to_string()]);
    assert_eq!(view.button.label, "Reset");

    controller.reset().unwrap();
    assert_eq!(controller.state(), WorkflowState::AwaitingUpload);
    let session = controller.session();
    assert!(session.image().is_none());
    assert!(session.results().is_empty());
    assert!(session.has_capability());
}

#[tokio::test]
async fn rounds_repeat_without_reloading() {
    let fixture = Fixture::new();
    let controller = fixture.controller();
    controller.load_capability().await.unwrap();

    for round in 0..3 {
        controller
            .handle_upload(&[photo(&format!("photo-{round}.jpg"))])
            .unwrap();
        controller.identify().await.unwrap();
        controller.reset().unwrap();
    }

    assert_eq!(fixture.loader.loads.load(Ordering::SeqCst), 1);
    assert_eq!(fixture.classify_calls.load(Ordering::SeqCst), 3);
    assert!(!controller
        .history()
        .get_path()
        .iter()
        .skip(1)
        .any(|s| **s == WorkflowState::Initial));
}

#[tokio::test]
async fn results_are_kept_in_service_order() {
    let ranking = vec![
        Prediction::new("tabby", 0.6),
        Prediction::new("tiger cat", 0.3),
        Prediction::new("lynx", 0.1),
    ];
    let fixture = Fixture::with(Ok(ranking.clone()), None, 0, None);
    let controller = fixture.controller();
    ready(&controller).await;

    controller.identify().await.unwrap();

    assert_eq!(controller.session().results(), ranking.as_slice());
    assert_eq!(
        controller.view().result_items,
        vec!["tabby 60.00%", "tiger cat 30.00%", "lynx 10.00%"]
    );
}

#[tokio::test]
async fn empty_selection_changes_nothing_in_any_state() {
    let fixture = Fixture::new();
    let controller = fixture.controller();

    assert_eq!(controller.handle_upload(&[]).unwrap(), UploadOutcome::Ignored);
    assert_eq!(controller.state(), WorkflowState::Initial);

    controller.load_capability().await.unwrap();
    assert_eq!(controller.handle_upload(&[]).unwrap(), UploadOutcome::Ignored);
    assert_eq!(controller.state(), WorkflowState::AwaitingUpload);
    assert!(controller.session().image().is_none());

    controller.handle_upload(&[photo("cat.jpg")]).unwrap();
    controller.identify().await.unwrap();
    let before = controller.session();
    assert_eq!(controller.handle_upload(&[]).unwrap(), UploadOutcome::Ignored);
    assert_eq!(controller.state(), WorkflowState::Complete);
    let after = controller.session();
    assert_eq!(before.image(), after.image());
    assert_eq!(before.results(), after.results());
}

#[tokio::test]
async fn only_the_first_file_is_used() {
    let fixture = Fixture::new();
    let controller = fixture.controller();
    controller.load_capability().await.unwrap();

    controller
        .handle_upload(&[photo("first.jpg"), photo("second.jpg")])
        .unwrap();

    assert_eq!(
        controller.session().image().map(|i| i.name().to_string()),
        Some("first.jpg".to_string())
    );
    assert_eq!(controller.history().len(), 3);
}

#[tokio::test]
async fn second_identify_while_classifying_is_rejected() {
    let gate = Arc::new(Notify::new());
    let fixture = Fixture::with(
        Ok(vec![Prediction::new("cat", 0.87)]),
        Some(Arc::clone(&gate)),
        0,
        None,
    );
    let controller = fixture.controller();
    ready(&controller).await;
    let mut rx = controller.subscribe();

    let (first, second) = tokio::join!(controller.identify(), async {
        rx.wait_for(|s| *s == WorkflowState::Classifying)
            .await
            .unwrap();
        assert_eq!(controller.view().button.label, "Classifying");
        assert_eq!(controller.current_button_action(), ButtonAction::Noop);
        let second = controller.identify().await;
        let reset = controller.reset();
        gate.notify_one();
        (second, reset)
    });

    assert!(first.is_ok());
    let (second, reset) = second;
    assert_eq!(
        second,
        Err(WorkflowError::Busy {
            operation: Operation::Identify,
            state: WorkflowState::Classifying
        })
    );
    assert!(matches!(reset, Err(WorkflowError::Busy { .. })));
    assert_eq!(fixture.classify_calls.load(Ordering::SeqCst), 1);
    assert_eq!(controller.state(), WorkflowState::Complete);
}

#[tokio::test]
async fn loading_state_is_visible_while_the_load_is_in_flight() {
    let gate = Arc::new(Notify::new());
    let fixture = Fixture::with(
        Ok(vec![Prediction::new("cat", 0.87)]),
        None,
        0,
        Some(Arc::clone(&gate)),
    );
    let controller = fixture.controller();
    let mut rx = controller.subscribe();

    let (loaded, observed) = tokio::join!(controller.load_capability(), async {
        rx.wait_for(|s| *s == WorkflowState::LoadingCapability)
            .await
            .unwrap();
        let label = controller.current_button_label();
        let upload = controller.handle_upload(&[photo("early.jpg")]);
        let again = controller.load_capability().await;
        gate.notify_one();
        (label, upload, again)
    });

    loaded.unwrap();
    let (label, upload, again) = observed;
    assert_eq!(label, "Loading model...");
    assert!(matches!(upload, Err(WorkflowError::Busy { .. })));
    assert!(matches!(again, Err(WorkflowError::Busy { .. })));
    assert_eq!(fixture.loader.loads.load(Ordering::SeqCst), 1);
    assert_eq!(controller.state(), WorkflowState::AwaitingUpload);
    assert!(controller.session().image().is_none());
}

#[tokio::test]
async fn abandoned_identify_fails_and_can_be_reset() {
    let gate = Arc::new(Notify::new());
    let fixture = Fixture::with(
        Ok(vec![Prediction::new("cat", 0.87)]),
        Some(Arc::clone(&gate)),
        0,
        None,
    );
    let controller = fixture.controller();
    ready(&controller).await;

    let timed_out = tokio::time::timeout(Duration::from_millis(20), controller.identify()).await;

    assert!(timed_out.is_err());
    assert_eq!(
        controller.state(),
        WorkflowState::Failed(Failure::new(Stage::Classifying, CANCELLED))
    );
    assert_eq!(controller.current_button_label(), "Reset");
    assert!(controller.session().results().is_empty());

    controller.reset().unwrap();
    assert_eq!(controller.state(), WorkflowState::AwaitingUpload);
    controller.handle_upload(&[photo("again.jpg")]).unwrap();
    assert_eq!(controller.state(), WorkflowState::Ready);
}

#[tokio::test]
async fn abandoned_load_fails_and_can_be_retried() {
    let gate = Arc::new(Notify::new());
    let fixture = Fixture::with(
        Ok(vec![Prediction::new("cat", 0.87)]),
        None,
        0,
        Some(Arc::clone(&gate)),
    );
    let controller = fixture.controller();

    let timed_out =
        tokio::time::timeout(Duration::from_millis(20), controller.load_capability()).await;

    assert!(timed_out.is_err());
    assert_eq!(
        controller.state(),
        WorkflowState::Failed(Failure::new(Stage::LoadingCapability, CANCELLED))
    );
    assert_eq!(controller.view().button.label, "Retry");
    assert!(!controller.session().has_capability());

    gate.notify_one();
    controller.load_capability().await.unwrap();
    assert_eq!(controller.state(), WorkflowState::AwaitingUpload);
    assert_eq!(fixture.loader.loads.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn upload_without_a_reported_media_type_is_accepted() {
    let fixture = Fixture::new();
    let controller = fixture.controller();
    controller.load_capability().await.unwrap();

    let outcome = controller
        .handle_upload(&[ImageFile::new("IMG_0001.HEIC", "", vec![0u8, 0, 0, 0x18])])
        .unwrap();

    assert!(matches!(outcome, UploadOutcome::Selected(_)));
    assert_eq!(controller.state(), WorkflowState::Ready);
    assert_eq!(
        controller.session().image().map(|i| i.name().to_string()),
        Some("IMG_0001.HEIC".to_string())
    );
}

#[tokio::test]
async fn failed_load_offers_retry() {
    let fixture = Fixture::with(Ok(vec![Prediction::new("cat", 0.87)]), None, 1, None);
    let controller = fixture.controller();

    let err = controller.load_capability().await.unwrap_err();
    assert_eq!(
        err,
        WorkflowError::Load(ServiceError::new("model download failed"))
    );
    assert!(controller
        .state()
        .failed_in(Stage::LoadingCapability));
    assert!(!controller.session().has_capability());

    let view = controller.view();
    assert_eq!(view.button.label, "Retry");
    assert_eq!(view.error.as_deref(), Some("model download failed"));

    assert_eq!(controller.press().await.unwrap(), ActionOutcome::Completed);
    assert_eq!(controller.state(), WorkflowState::AwaitingUpload);
    assert!(controller.session().has_capability());
    assert_eq!(fixture.loader.loads.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn failed_classification_offers_reset() {
    let fixture = Fixture::with(
        Err(ServiceError::new("unsupported image")),
        None,
        0,
        None,
    );
    let controller = fixture.controller();
    ready(&controller).await;

    let err = controller.identify().await.unwrap_err();
    assert!(matches!(err, WorkflowError::Classify(_)));
    assert!(controller.state().failed_in(Stage::Classifying));

    let view = controller.view();
    assert!(view.show_image);
    assert!(!view.show_results);
    assert_eq!(view.button.label, "Reset");
    assert_eq!(view.error.as_deref(), Some("unsupported image"));
    assert!(matches!(
        controller.identify().await,
        Err(WorkflowError::NotAvailable { .. })
    ));

    controller.reset().unwrap();
    assert_eq!(controller.state(), WorkflowState::AwaitingUpload);
    assert!(controller.session().image().is_none());
    assert!(controller.session().results().is_empty());
}

#[tokio::test]
async fn controllers_do_not_share_sessions() {
    let fixture = Fixture::new();
    let first = fixture.controller();
    let second = fixture.controller();

    ready(&first).await;

    assert_eq!(second.state(), WorkflowState::Initial);
    assert!(!second.session().has_capability());
    assert!(second.session().image().is_none());
}

#[tokio::test]
async fn history_limit_comes_from_config() {
    let fixture = Fixture::new();
    let controller = WorkflowController::builder()
        .shared_loader(fixture.loader.clone())
        .config(WorkflowConfig {
            history_limit: 2,
            ..WorkflowConfig::default()
        })
        .build()
        .unwrap();

    ready(&controller).await;

    let history = controller.history();
    assert_eq!(history.len(), 2);
    assert_eq!(
        history.last().map(|t| t.to.clone()),
        Some(WorkflowState::Ready)
    );
}

#[tokio::test]
async fn custom_precision_is_used_for_results() {
    let fixture = Fixture::new();
    let controller = WorkflowController::builder()
        .shared_loader(fixture.loader.clone())
        .config(WorkflowConfig::from_toml_str("probability_decimals = 0").unwrap())
        .build()
        .unwrap();
    ready(&controller).await;

    controller.identify().await.unwrap();

    assert_eq!(controller.view().result_items, vec!["cat 87%"]);
}
