use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// Unvalidated provider output. Every field may be absent or malformed;
/// only [`crate::analysis::validate`] turns it into an `AnalysisResult`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisCandidate {
    pub status: Option<String>,
    pub confidence: Option<f64>,
    pub condition: Option<String>,
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symptoms: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<String>>,
}

impl AnalysisCandidate {
    pub fn from_json(raw: &str) -> Result<Self, ProviderError> {
        serde_json::from_str(raw).map_err(|e| ProviderError::Decode(e.to_string()))
    }
}
