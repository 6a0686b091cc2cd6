use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::future::BoxFuture;
use tower::timeout::TimeoutLayer;
use tower::util::BoxCloneService;
use tower::{BoxError, Service, ServiceBuilder};

use super::provider::InferenceProvider;
use super::types::AnalysisCandidate;
use crate::common::ImagePayload;

pub type BoxedInferenceService = BoxCloneService<ImagePayload, AnalysisCandidate, BoxError>;

/// Exposes an [`InferenceProvider`] as a tower service so layers such as a
/// timeout can be stacked in front of it.
#[derive(Clone)]
pub struct InferenceService {
    inner: Arc<dyn InferenceProvider>,
}

impl InferenceService {
    pub fn new(inner: Arc<dyn InferenceProvider>) -> Self {
        Self { inner }
    }
}

impl Service<ImagePayload> for InferenceService {
    type Response = AnalysisCandidate;
    type Error = BoxError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, payload: ImagePayload) -> Self::Future {
        let inner = self.inner.clone();
        Box::pin(async move { inner.analyze(&payload).await.map_err(BoxError::from) })
    }
}

pub struct InferenceServiceBuilder {
    provider: Arc<dyn InferenceProvider>,
    timeout: Option<Duration>,
}

impl InferenceServiceBuilder {
    pub fn new(provider: Arc<dyn InferenceProvider>) -> Self {
        Self {
            provider,
            timeout: None,
        }
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> BoxedInferenceService {
        tracing::debug!(
            "Building inference service for {} (timeout: {:?})",
            self.provider.name(),
            self.timeout
        );
        let service = ServiceBuilder::new()
            .option_layer(self.timeout.map(TimeoutLayer::new))
            .service(InferenceService::new(self.provider));
        BoxCloneService::new(service)
    }
}
