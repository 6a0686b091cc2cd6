use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, instrument};

use super::InferenceProvider;
use crate::analysis::types::AnalysisCandidate;
use crate::common::ImagePayload;
use crate::error::ProviderError;

/// A wrapper that automatically instruments an InferenceProvider with timing and error tracking
pub struct InstrumentedProvider<P> {
    inner: P,
}

impl<P> InstrumentedProvider<P> {
    pub fn new(provider: P) -> Self {
        Self { inner: provider }
    }

    pub fn into_inner(self) -> P {
        self.inner
    }
}

#[async_trait]
impl<P> InferenceProvider for InstrumentedProvider<P>
where
    P: InferenceProvider,
{
    #[instrument(skip(self, payload), fields(provider = self.inner.name(), payload = %payload.id()))]
    async fn analyze(&self, payload: &ImagePayload) -> Result<AnalysisCandidate, ProviderError> {
        let start = Instant::now();
        debug!("Starting inference on {} bytes", payload.len());

        let result = self.inner.analyze(payload).await;
        let duration_us = start.elapsed().as_micros() as u64;

        match &result {
            Ok(candidate) => {
                debug!(
                    "Inference finished in {}us with status {:?}",
                    duration_us, candidate.status
                );
            }
            Err(e) => {
                tracing::error!("Inference failed after {}us: {}", duration_us, e);
            }
        }

        result
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

/// Extension trait to easily wrap providers with instrumentation
pub trait ProviderInstrumentation: Sized {
    fn instrumented(self) -> InstrumentedProvider<Self>;
}

impl<P> ProviderInstrumentation for P
where
    P: InferenceProvider,
{
    fn instrumented(self) -> InstrumentedProvider<Self> {
        InstrumentedProvider::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::provider::{FixedIndexSelector, MockInferenceProvider};
    use std::time::Duration;

    #[tokio::test]
    async fn passes_results_through_unchanged() {
        let provider = MockInferenceProvider::new()
            .with_latency(Duration::ZERO)
            .with_selector(FixedIndexSelector(1))
            .instrumented();
        let payload = ImagePayload::new(vec![1, 2, 3], "image/png").unwrap();

        let candidate = provider.analyze(&payload).await.unwrap();

        assert_eq!(provider.name(), "MockInferenceProvider");
        assert_eq!(candidate.status.as_deref(), Some("warning"));
    }
}
