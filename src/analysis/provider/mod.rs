pub mod catalog;
pub mod instrumented_provider;
pub mod mock_provider;
pub mod selector;

pub use catalog::CatalogEntry;
pub use instrumented_provider::{InstrumentedProvider, ProviderInstrumentation};
pub use mock_provider::MockInferenceProvider;
pub use selector::{FixedIndexSelector, IndexSelector, RandomIndexSelector};

use crate::analysis::types::AnalysisCandidate;
use crate::common::ImagePayload;
use crate::error::ProviderError;
use async_trait::async_trait;

/// Classifies a plant image. Output is raw and goes through validation
/// before the session ever sees it.
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    async fn analyze(&self, payload: &ImagePayload) -> Result<AnalysisCandidate, ProviderError>;
    fn name(&self) -> &'static str;
}
