use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::time::Instant;
use tokio_stream::wrappers::WatchStream;
use tower::{BoxError, ServiceExt};
use tracing::{debug, error, info, warn};

use super::metrics::{AnalysisOutcome, ObserverSet, SessionObserver};
use super::state::{ErrorInfo, SessionState};
use crate::analysis::{
    validate, AnalysisCandidate, BoxedInferenceService, InferenceProvider, InferenceServiceBuilder,
};
use crate::common::{DisplayLease, DisplayRegistry, ImagePayload};
use crate::config::{BusyPolicy, Configuration};
use crate::error::{AppError, ProviderError};

#[derive(Debug, Clone, Copy)]
struct InFlight {
    sequence: u64,
    started: Instant,
}

struct SessionCore {
    state: SessionState,
    lease: Option<DisplayLease>,
    in_flight: Option<InFlight>,
    last_sequence: u64,
    service: BoxedInferenceService,
    observers: ObserverSet,
}

impl SessionCore {
    fn transition(&mut self, next: SessionState, state_tx: &watch::Sender<SessionState>) {
        debug!(
            "Session #{}: {} -> {}",
            self.last_sequence, self.state, next
        );
        self.observers
            .notify_transition(self.last_sequence, &self.state, &next);
        self.state = next.clone();
        state_tx.send_replace(next);
    }

    fn release_reference(&mut self) {
        if let Some(lease) = self.lease.take() {
            lease.release();
        }
    }
}

struct SessionShared {
    core: Mutex<SessionCore>,
    state_tx: watch::Sender<SessionState>,
    registry: Arc<DisplayRegistry>,
    busy_policy: BusyPolicy,
    runtime: Handle,
}

impl SessionShared {
    fn lock(&self) -> MutexGuard<'_, SessionCore> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies a provider outcome if it still belongs to the current analysis.
    fn finish(&self, sequence: u64, outcome: Result<AnalysisCandidate, BoxError>) {
        let mut core = self.lock();
        let in_flight = core.in_flight;
        let started = match in_flight {
            Some(in_flight) if in_flight.sequence == sequence => in_flight.started,
            _ => {
                debug!("Discarding stale result of analysis #{}", sequence);
                core.observers.notify_stale_result(sequence);
                return;
            }
        };
        core.in_flight = None;

        let Some(reference) = core.lease.as_ref().map(|lease| lease.reference().clone()) else {
            error!("Analysis #{} finished without a display reference", sequence);
            return;
        };

        let elapsed = started.elapsed();
        let verdict = outcome
            .map_err(|e| AppError::from(ProviderError::from_boxed(e)))
            .and_then(|candidate| validate(candidate).map_err(AppError::from));

        let next = match verdict {
            Ok(result) => {
                info!(
                    "Analysis #{} completed: {} ({}) in {:?}",
                    sequence,
                    result.condition(),
                    result.status(),
                    elapsed
                );
                core.observers.notify_analysis_finished(
                    sequence,
                    AnalysisOutcome::Completed(result.status()),
                    elapsed,
                );
                SessionState::Completed(reference, Arc::new(result))
            }
            Err(e) => {
                warn!("Analysis #{} failed: {}", sequence, e);
                core.observers
                    .notify_analysis_finished(sequence, AnalysisOutcome::Failed, elapsed);
                SessionState::Failed(reference, ErrorInfo::from(&e))
            }
        };
        core.transition(next, &self.state_tx);
    }
}

/// Owns the analysis session: the current state, the live display
/// reference and the single in-flight inference call.
///
/// Cloning yields another handle onto the same session.
#[derive(Clone)]
pub struct AnalysisController {
    shared: Arc<SessionShared>,
}

impl AnalysisController {
    pub fn builder(configuration: Configuration) -> ControllerBuilder {
        ControllerBuilder::new(configuration)
    }

    /// Starts analysing `payload` and returns the sequence number of the new
    /// analysis. The analysis runs on the runtime the controller was built on.
    pub fn submit_image(&self, payload: ImagePayload) -> Result<u64, AppError> {
        let shared = &self.shared;
        let mut core = shared.lock();

        if let Some(in_flight) = core.in_flight {
            match shared.busy_policy {
                BusyPolicy::Reject => {
                    warn!(
                        "Rejecting image {}: analysis #{} is still running",
                        payload.id(),
                        in_flight.sequence
                    );
                    core.observers.notify_busy_rejected(in_flight.sequence);
                    return Err(AppError::Busy(in_flight.sequence));
                }
                BusyPolicy::Supersede => {
                    info!(
                        "Image {} supersedes analysis #{}",
                        payload.id(),
                        in_flight.sequence
                    );
                    core.observers.notify_superseded(in_flight.sequence);
                }
            }
        }

        core.last_sequence += 1;
        let sequence = core.last_sequence;

        core.release_reference();
        let lease = shared.registry.acquire(&payload);
        let reference = lease.reference().clone();
        core.lease = Some(lease);
        core.transition(SessionState::ImageLoaded(reference.clone()), &shared.state_tx);

        core.in_flight = Some(InFlight {
            sequence,
            started: Instant::now(),
        });
        core.transition(SessionState::Analyzing(reference), &shared.state_tx);

        let service = core.service.clone();
        drop(core);

        let session: Weak<SessionShared> = Arc::downgrade(shared);
        shared.runtime.spawn(async move {
            let outcome = service.oneshot(payload).await;
            match session.upgrade() {
                Some(shared) => shared.finish(sequence, outcome),
                None => debug!("Session closed before analysis #{} finished", sequence),
            }
        });

        Ok(sequence)
    }

    /// Returns to `Idle`, releasing the display reference and orphaning any
    /// running analysis. Safe to call from any state.
    pub fn reset(&self) {
        let shared = &self.shared;
        let mut core = shared.lock();

        if let Some(in_flight) = core.in_flight.take() {
            debug!("Invalidating analysis #{}", in_flight.sequence);
        }
        core.release_reference();

        if core.state.is_idle() {
            debug!("Reset requested on an idle session");
            return;
        }
        core.transition(SessionState::Idle, &shared.state_tx);
    }

    /// Presentation's "clear image" action.
    pub fn clear_image(&self) {
        info!("Clearing image");
        self.reset();
    }

    pub fn current_state(&self) -> SessionState {
        self.shared.lock().state.clone()
    }

    pub fn in_flight_sequence(&self) -> Option<u64> {
        self.shared.lock().in_flight.map(|in_flight| in_flight.sequence)
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.shared.state_tx.subscribe()
    }

    pub fn state_stream(&self) -> WatchStream<SessionState> {
        WatchStream::new(self.subscribe())
    }

    /// Waits until the session is `Idle`, `Completed` or `Failed`.
    pub async fn settled(&self) -> SessionState {
        let mut state_rx = self.subscribe();
        let state = match state_rx.wait_for(SessionState::is_settled).await {
            Ok(state) => state.clone(),
            Err(_) => self.current_state(),
        };
        state
    }

    pub fn display_registry(&self) -> &Arc<DisplayRegistry> {
        &self.shared.registry
    }

    pub fn busy_policy(&self) -> BusyPolicy {
        self.shared.busy_policy
    }
}

pub struct ControllerBuilder {
    configuration: Configuration,
    provider: Option<Arc<dyn InferenceProvider>>,
    registry: Option<Arc<DisplayRegistry>>,
    observers: ObserverSet,
}

impl ControllerBuilder {
    pub fn new(configuration: Configuration) -> Self {
        Self {
            configuration,
            provider: None,
            registry: None,
            observers: ObserverSet::new(),
        }
    }

    pub fn provider(mut self, provider: impl InferenceProvider + 'static) -> Self {
        self.provider = Some(Arc::new(provider));
        self
    }

    // Uses an existing registry instead of creating one from the configured scheme.
    pub fn display_registry(mut self, registry: Arc<DisplayRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    // Sets the busy policy, this will override the configuration.
    pub fn busy_policy(mut self, busy_policy: BusyPolicy) -> Self {
        self.configuration.busy_policy = busy_policy;
        self
    }

    // Sets the provider timeout, this will override the configuration.
    pub fn provider_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.configuration.provider_timeout_ms = timeout.map(whole_millis);
        self
    }

    pub fn add_observer(mut self, observer: Box<dyn SessionObserver>) -> Self {
        self.observers.add_observer(observer);
        self
    }

    /// Must be called from within a Tokio runtime; analyses are spawned on it.
    pub fn build(self) -> Result<AnalysisController, AppError> {
        self.configuration.validate()?;
        let provider = self
            .provider
            .ok_or(AppError::Controller("Inference provider not set".to_string()))?;
        let runtime = Handle::try_current()
            .map_err(|e| AppError::Controller(format!("No Tokio runtime available: {}", e)))?;
        let registry = self
            .registry
            .unwrap_or_else(|| DisplayRegistry::new(self.configuration.display_scheme.clone()));

        info!(
            "Analysis controller using {} (busy policy: {:?})",
            provider.name(),
            self.configuration.busy_policy
        );
        let service = InferenceServiceBuilder::new(provider)
            .timeout(self.configuration.provider_timeout())
            .build();
        let (state_tx, _) = watch::channel(SessionState::Idle);

        Ok(AnalysisController {
            shared: Arc::new(SessionShared {
                core: Mutex::new(SessionCore {
                    state: SessionState::Idle,
                    lease: None,
                    in_flight: None,
                    last_sequence: 0,
                    service,
                    observers: self.observers,
                }),
                state_tx,
                registry,
                busy_policy: self.configuration.busy_policy,
                runtime,
            }),
        })
    }
}

// Rounds up so a non-zero timeout never collapses to 0 ms.
fn whole_millis(timeout: Duration) -> u64 {
    let millis = timeout.as_nanos().div_ceil(1_000_000);
    u64::try_from(millis).unwrap_or(u64::MAX)
}
