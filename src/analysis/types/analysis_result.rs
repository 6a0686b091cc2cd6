use serde::{Deserialize, Serialize};

use super::{AnalysisCandidate, HealthStatus};
use crate::error::ValidationError;

/// Health verdict plus the symptoms that only non-healthy verdicts carry.
#[derive(Debug, Clone, PartialEq)]
pub enum Assessment {
    Healthy,
    Warning { symptoms: Vec<String> },
    Disease { symptoms: Vec<String> },
}

impl Assessment {
    pub fn status(&self) -> HealthStatus {
        match self {
            Assessment::Healthy => HealthStatus::Healthy,
            Assessment::Warning { .. } => HealthStatus::Warning,
            Assessment::Disease { .. } => HealthStatus::Disease,
        }
    }

    pub fn symptoms(&self) -> &[String] {
        match self {
            Assessment::Healthy => &[],
            Assessment::Warning { symptoms } | Assessment::Disease { symptoms } => symptoms,
        }
    }
}

/// A validated plant health assessment. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AnalysisCandidate", into = "AnalysisCandidate")]
pub struct AnalysisResult {
    assessment: Assessment,
    confidence: f64,
    condition: String,
    description: String,
    recommendations: Vec<String>,
}

impl AnalysisResult {
    pub(crate) fn new(
        assessment: Assessment,
        confidence: f64,
        condition: String,
        description: String,
        recommendations: Vec<String>,
    ) -> Self {
        Self {
            assessment,
            confidence,
            condition,
            description,
            recommendations,
        }
    }

    pub fn status(&self) -> HealthStatus {
        self.assessment.status()
    }

    pub fn assessment(&self) -> &Assessment {
        &self.assessment
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Confidence as a percentage with one decimal, e.g. `94.0%`.
    pub fn confidence_percent(&self) -> String {
        format!("{:.1}%", self.confidence * 100.0)
    }

    pub fn condition(&self) -> &str {
        &self.condition
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn symptoms(&self) -> &[String] {
        self.assessment.symptoms()
    }

    pub fn recommendations(&self) -> &[String] {
        &self.recommendations
    }
}

impl TryFrom<AnalysisCandidate> for AnalysisResult {
    type Error = ValidationError;

    fn try_from(candidate: AnalysisCandidate) -> Result<Self, Self::Error> {
        crate::analysis::validation::validate(candidate)
    }
}

impl From<AnalysisResult> for AnalysisCandidate {
    fn from(result: AnalysisResult) -> Self {
        let status = result.status();
        let symptoms = match result.assessment {
            Assessment::Healthy => None,
            Assessment::Warning { symptoms } | Assessment::Disease { symptoms } => Some(symptoms),
        };
        AnalysisCandidate {
            status: Some(status.as_str().to_string()),
            confidence: Some(result.confidence),
            condition: Some(result.condition),
            description: Some(result.description),
            symptoms,
            recommendations: if result.recommendations.is_empty() {
                None
            } else {
                Some(result.recommendations)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn late_blight() -> AnalysisResult {
        AnalysisResult::new(
            Assessment::Disease {
                symptoms: vec!["Large brown patches on leaves".to_string()],
            },
            0.89,
            "Late Blight".to_string(),
            "Severe late blight infection detected.".to_string(),
            vec!["Remove all infected plant material".to_string()],
        )
    }

    #[test]
    fn confidence_renders_with_one_decimal() {
        assert_eq!(late_blight().confidence_percent(), "89.0%");
    }

    #[test]
    fn healthy_assessment_has_no_symptoms() {
        assert!(Assessment::Healthy.symptoms().is_empty());
        assert_eq!(Assessment::Healthy.status(), HealthStatus::Healthy);
    }

    #[test]
    fn serializes_flat_and_reads_back_through_validation() {
        let json = serde_json::to_value(late_blight()).unwrap();
        assert_eq!(json["status"], "disease");
        assert_eq!(json["condition"], "Late Blight");
        assert_eq!(json["symptoms"][0], "Large brown patches on leaves");

        let parsed: AnalysisResult = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, late_blight());
    }

    #[test]
    fn deserializing_an_invalid_result_fails() {
        let raw = r#"{"status":"unknown","confidence":0.5,"condition":"x","description":"y"}"#;
        assert!(serde_json::from_str::<AnalysisResult>(raw).is_err());
    }
}
