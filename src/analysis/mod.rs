pub mod provider;
pub mod service;
pub mod types;
pub mod validation;

pub use provider::{CatalogEntry, InferenceProvider, MockInferenceProvider};
pub use service::{BoxedInferenceService, InferenceService, InferenceServiceBuilder};
pub use types::{AnalysisCandidate, AnalysisResult, Assessment, HealthStatus};
pub use validation::validate;
