use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::{CatalogEntry, IndexSelector, InferenceProvider, RandomIndexSelector};
use crate::analysis::types::AnalysisCandidate;
use crate::common::ImagePayload;
use crate::error::ProviderError;

/// Stand-in for a real model: waits, then returns a catalog entry picked by
/// the selector. The image content is not looked at.
pub struct MockInferenceProvider {
    latency: Duration,
    selector: Arc<dyn IndexSelector>,
}

impl MockInferenceProvider {
    pub const DEFAULT_LATENCY: Duration = Duration::from_millis(2000);

    pub fn new() -> Self {
        Self {
            latency: Self::DEFAULT_LATENCY,
            selector: Arc::new(RandomIndexSelector),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_selector(mut self, selector: impl IndexSelector + 'static) -> Self {
        self.selector = Arc::new(selector);
        self
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    async fn simulate_processing(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl Default for MockInferenceProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InferenceProvider for MockInferenceProvider {
    async fn analyze(&self, payload: &ImagePayload) -> Result<AnalysisCandidate, ProviderError> {
        self.simulate_processing().await;

        let index = self.selector.select(CatalogEntry::ALL.len());
        let entry = CatalogEntry::ALL.get(index).ok_or_else(|| {
            ProviderError::Upstream(format!(
                "{} picked index {} outside the catalog",
                self.selector.name(),
                index
            ))
        })?;

        debug!(
            "Mock inference for payload {} ({} bytes) picked {:?}",
            payload.id(),
            payload.len(),
            entry
        );
        Ok(entry.candidate())
    }

    fn name(&self) -> &'static str {
        "MockInferenceProvider"
    }
}
