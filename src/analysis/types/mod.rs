mod analysis_result;
mod candidate;
mod health_status;

pub use analysis_result::{AnalysisResult, Assessment};
pub use candidate::AnalysisCandidate;
pub use health_status::HealthStatus;
