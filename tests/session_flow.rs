use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use plant_health::analysis::provider::{CatalogEntry, FixedIndexSelector};
use plant_health::analysis::{AnalysisCandidate, InferenceProvider};
use plant_health::session::{FailureKind, StatsObserver};
use plant_health::{
    AnalysisController, BusyPolicy, Configuration, HealthStatus, ImagePayload,
    MockInferenceProvider, ProviderError, SessionState,
};
use tokio_stream::StreamExt;

const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

fn png() -> ImagePayload {
    ImagePayload::new(PNG_MAGIC.to_vec(), "image/png").unwrap()
}

fn mock_controller(index: usize) -> AnalysisController {
    AnalysisController::builder(Configuration::default())
        .provider(MockInferenceProvider::new().with_selector(FixedIndexSelector(index)))
        .build()
        .unwrap()
}

/// Returns a fixed candidate after a per-call delay taken from a list.
struct DelayedProvider {
    delays: Mutex<Vec<Duration>>,
    candidate: AnalysisCandidate,
}

#[async_trait]
impl InferenceProvider for DelayedProvider {
    async fn analyze(&self, _payload: &ImagePayload) -> Result<AnalysisCandidate, ProviderError> {
        let delay = self.delays.lock().unwrap().remove(0);
        tokio::time::sleep(delay).await;
        Ok(self.candidate.clone())
    }

    fn name(&self) -> &'static str {
        "DelayedProvider"
    }
}

#[tokio::test(start_paused = true)]
async fn png_upload_completes_after_simulated_delay() {
    let controller = mock_controller(2);
    controller.submit_image(png()).unwrap();

    tokio::time::sleep(Duration::from_millis(1999)).await;
    assert!(controller.current_state().is_analyzing());

    tokio::time::sleep(Duration::from_millis(2)).await;
    let state = controller.current_state();
    let result = state.result().expect("analysis completed");

    assert!(HealthStatus::ALL.contains(&result.status()));
    assert!((0.0..=1.0).contains(&result.confidence()));
    assert_eq!(result.status(), HealthStatus::Disease);
    assert!(result
        .symptoms()
        .iter()
        .any(|s| s == "Large brown patches on leaves"));
}

#[tokio::test(start_paused = true)]
async fn random_catalog_results_are_always_valid() {
    let controller = AnalysisController::builder(Configuration::default())
        .provider(MockInferenceProvider::new())
        .build()
        .unwrap();

    for _ in 0..10 {
        controller.submit_image(png()).unwrap();
        let state = controller.settled().await;
        let result = state.result().expect("mock provider never fails");
        if result.status() == HealthStatus::Healthy {
            assert!(result.symptoms().is_empty());
        }
    }
    assert_eq!(controller.display_registry().live_count(), 1);
    assert_eq!(controller.display_registry().released_count(), 9);
}

#[tokio::test(start_paused = true)]
async fn reset_before_provider_resolves_stays_idle() {
    let controller = mock_controller(0);
    controller.submit_image(png()).unwrap();
    controller.reset();

    tokio::time::sleep(Duration::from_secs(10)).await;

    assert_eq!(controller.current_state(), SessionState::Idle);
    assert_eq!(controller.display_registry().live_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn reset_from_every_state_yields_idle() {
    let controller = mock_controller(1);

    controller.reset();
    assert!(controller.current_state().is_idle());

    controller.submit_image(png()).unwrap();
    controller.reset();
    assert!(controller.current_state().is_idle());

    controller.submit_image(png()).unwrap();
    controller.settled().await;
    controller.reset();
    controller.reset();
    assert!(controller.current_state().is_idle());

    let registry = controller.display_registry();
    assert_eq!(registry.live_count(), 0);
    assert_eq!(registry.acquired_count(), 2);
    assert_eq!(registry.released_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn reset_after_provider_failure_yields_idle() {
    let controller = AnalysisController::builder(Configuration::default())
        .provider(MockInferenceProvider::new().with_selector(FixedIndexSelector(7)))
        .build()
        .unwrap();

    controller.submit_image(png()).unwrap();
    let failed = controller.settled().await;
    assert_eq!(failed.error().unwrap().kind(), FailureKind::Provider);
    assert_eq!(controller.display_registry().live_count(), 1);

    controller.reset();

    assert_eq!(controller.current_state(), SessionState::Idle);
    let registry = controller.display_registry();
    assert_eq!(registry.live_count(), 0);
    assert_eq!(registry.released_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn second_submit_is_rejected_by_default() {
    let controller = mock_controller(0);
    controller.submit_image(png()).unwrap();
    assert!(controller.submit_image(png()).is_err());

    let state = controller.settled().await;
    assert_eq!(state.result().unwrap().status(), HealthStatus::Healthy);
    assert_eq!(controller.display_registry().acquired_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn only_the_latest_submission_lands_when_superseding() {
    let stats = StatsObserver::new();
    let controller = AnalysisController::builder(Configuration {
        busy_policy: BusyPolicy::Supersede,
        ..Configuration::default()
    })
    .provider(DelayedProvider {
        delays: Mutex::new(vec![Duration::from_millis(900), Duration::from_millis(50)]),
        candidate: CatalogEntry::EarlyBlight.candidate(),
    })
    .add_observer(Box::new(stats.clone()))
    .build()
    .unwrap();

    controller.submit_image(png()).unwrap();
    let second = controller.submit_image(png()).unwrap();
    assert_eq!(second, 2);

    let settled = controller.settled().await;
    tokio::time::sleep(Duration::from_secs(2)).await;

    assert_eq!(controller.current_state(), settled);
    let stats = stats.snapshot();
    assert_eq!(stats.total_completed(), 1);
    assert_eq!(stats.stale_results, 1);
}

#[tokio::test(start_paused = true)]
async fn unknown_status_ends_in_failed() {
    let controller = AnalysisController::builder(Configuration::default())
        .provider(DelayedProvider {
            delays: Mutex::new(vec![Duration::from_millis(10)]),
            candidate: AnalysisCandidate {
                status: Some("unknown".to_string()),
                ..CatalogEntry::Healthy.candidate()
            },
        })
        .build()
        .unwrap();

    controller.submit_image(png()).unwrap();
    let state = controller.settled().await;

    assert!(state.result().is_none());
    assert_eq!(state.error().unwrap().kind(), FailureKind::Validation);
}

#[tokio::test(start_paused = true)]
async fn subscribers_observe_the_terminal_state() {
    let controller = mock_controller(1);
    let mut states = controller.state_stream();
    assert_eq!(states.next().await, Some(SessionState::Idle));

    controller.submit_image(png()).unwrap();
    let mut last = None;
    while let Some(state) = states.next().await {
        let settled = state.is_settled();
        last = Some(state);
        if settled {
            break;
        }
    }

    let last = last.unwrap();
    assert_eq!(last.result().unwrap().condition(), "Early Blight");
}
