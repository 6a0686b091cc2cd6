use thiserror::Error;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("An analysis is already in progress (#{0})")]
    Busy(u64),
    #[error("Validation Error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Provider Error: {0}")]
    Provider(#[from] ProviderError),
    #[error("Acquisition Error: {0}")]
    Acquisition(#[from] AcquisitionError),
    #[error("Configuration Error: {0}")]
    Config(String),
    #[error("Controller Error: {0}")]
    Controller(String),
    #[error("Serialization Error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(error: config::ConfigError) -> Self {
        AppError::Config(error.to_string())
    }
}

// Raised when a provider's raw output breaks the result contract
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing required field '{0}'")]
    MissingField(&'static str),
    #[error("Invalid status '{0}', expected one of healthy, warning, disease")]
    InvalidStatus(String),
    #[error("Invalid confidence {0}, expected a finite number in [0, 1]")]
    InvalidConfidence(f64),
    #[error("Empty entry at index {index} of '{field}'")]
    EmptyEntry { field: &'static str, index: usize },
    #[error("A healthy result cannot report symptoms ({0} given)")]
    SymptomsOnHealthy(usize),
}

// Failures surfaced by the inference provider itself
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("The inference provider timed out")]
    Timeout,
    #[error("Failed to decode provider output: {0}")]
    Decode(String),
    #[error("Upstream inference failure: {0}")]
    Upstream(String),
}

impl ProviderError {
    /// Recovers a provider error from the boxed error returned by the tower stack.
    pub fn from_boxed(error: tower::BoxError) -> Self {
        if error.is::<tower::timeout::error::Elapsed>() {
            return ProviderError::Timeout;
        }
        match error.downcast::<ProviderError>() {
            Ok(provider_error) => *provider_error,
            Err(other) => ProviderError::Upstream(other.to_string()),
        }
    }
}

#[derive(Error, Debug)]
pub enum AcquisitionError {
    #[error("Failed to read image: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unsupported content type '{0}', expected image/*")]
    UnsupportedContentType(String),
    #[error("The image payload is empty")]
    Empty,
    #[error("Could not recognise the image format")]
    UnrecognizedFormat,
}
