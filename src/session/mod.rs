pub mod controller;
pub mod metrics;
pub mod state;

pub use controller::{AnalysisController, ControllerBuilder};
pub use metrics::{AnalysisOutcome, ObserverSet, SessionObserver, SessionStats, StatsObserver};
pub use state::{ErrorInfo, FailureKind, SessionState};
