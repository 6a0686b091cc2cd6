pub mod analysis;
pub mod app;
pub mod common;
pub mod config;
pub mod error;
pub mod session;

pub use analysis::{AnalysisResult, HealthStatus, InferenceProvider, MockInferenceProvider};
pub use common::{DisplayReference, DisplayRegistry, ImagePayload};
pub use config::{BusyPolicy, Configuration};
pub use error::{AcquisitionError, AppError, ProviderError, ValidationError};
pub use session::{AnalysisController, SessionState};
