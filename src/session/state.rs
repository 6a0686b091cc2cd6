use std::fmt;
use std::sync::Arc;

use crate::analysis::AnalysisResult;
use crate::common::DisplayReference;
use crate::error::AppError;

/// Where a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Provider,
    Validation,
}

/// User-facing description of a failed analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    kind: FailureKind,
    message: String,
}

impl ErrorInfo {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&AppError> for ErrorInfo {
    fn from(error: &AppError) -> Self {
        let kind = match error {
            AppError::Validation(_) => FailureKind::Validation,
            _ => FailureKind::Provider,
        };
        Self::new(kind, error.to_string())
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Snapshot of a session, as exposed to Presentation.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    #[default]
    Idle,
    ImageLoaded(DisplayReference),
    Analyzing(DisplayReference),
    Completed(DisplayReference, Arc<AnalysisResult>),
    Failed(DisplayReference, ErrorInfo),
}

impl SessionState {
    pub fn state_name(&self) -> &'static str {
        match self {
            SessionState::Idle => "Idle",
            SessionState::ImageLoaded(_) => "ImageLoaded",
            SessionState::Analyzing(_) => "Analyzing",
            SessionState::Completed(..) => "Completed",
            SessionState::Failed(..) => "Failed",
        }
    }

    pub fn display_reference(&self) -> Option<&DisplayReference> {
        match self {
            SessionState::Idle => None,
            SessionState::ImageLoaded(reference)
            | SessionState::Analyzing(reference)
            | SessionState::Completed(reference, _)
            | SessionState::Failed(reference, _) => Some(reference),
        }
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            SessionState::Completed(_, result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        match self {
            SessionState::Failed(_, error) => Some(error),
            _ => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, SessionState::Idle)
    }

    pub fn is_analyzing(&self) -> bool {
        matches!(self, SessionState::Analyzing(_))
    }

    /// True when no automatic transition is pending.
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            SessionState::Idle | SessionState::Completed(..) | SessionState::Failed(..)
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.state_name())
    }
}
