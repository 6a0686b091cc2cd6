use super::types::{AnalysisCandidate, AnalysisResult, Assessment, HealthStatus};
use crate::error::ValidationError;

/// Checks a provider's raw output against the result contract.
///
/// Fields are checked in order: status, confidence, condition, description,
/// then the optional sequences. The first failure is returned.
pub fn validate(candidate: AnalysisCandidate) -> Result<AnalysisResult, ValidationError> {
    let status: HealthStatus = candidate
        .status
        .as_deref()
        .ok_or(ValidationError::MissingField("status"))?
        .parse()?;

    let confidence = candidate
        .confidence
        .ok_or(ValidationError::MissingField("confidence"))?;
    if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
        return Err(ValidationError::InvalidConfidence(confidence));
    }

    let condition = required_text(candidate.condition, "condition")?;
    let description = required_text(candidate.description, "description")?;
    let symptoms = text_entries(candidate.symptoms, "symptoms")?;
    let recommendations = text_entries(candidate.recommendations, "recommendations")?;

    let assessment = match status {
        HealthStatus::Healthy if !symptoms.is_empty() => {
            return Err(ValidationError::SymptomsOnHealthy(symptoms.len()));
        }
        HealthStatus::Healthy => Assessment::Healthy,
        HealthStatus::Warning => Assessment::Warning { symptoms },
        HealthStatus::Disease => Assessment::Disease { symptoms },
    };

    Ok(AnalysisResult::new(
        assessment,
        confidence,
        condition,
        description,
        recommendations,
    ))
}

fn required_text(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ValidationError::MissingField(field)),
    }
}

fn text_entries(
    values: Option<Vec<String>>,
    field: &'static str,
) -> Result<Vec<String>, ValidationError> {
    let values = values.unwrap_or_default();
    if let Some(index) = values.iter().position(|v| v.trim().is_empty()) {
        return Err(ValidationError::EmptyEntry { field, index });
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(status: &str) -> AnalysisCandidate {
        AnalysisCandidate {
            status: Some(status.to_string()),
            confidence: Some(0.78),
            condition: Some("Early Blight".to_string()),
            description: Some("Early signs of blight detected.".to_string()),
            symptoms: Some(vec!["Small dark spots on lower leaves".to_string()]),
            recommendations: Some(vec!["Apply copper-based fungicide".to_string()]),
        }
    }

    #[test]
    fn accepts_a_well_formed_warning() {
        let result = validate(candidate("warning")).unwrap();
        assert_eq!(result.status(), HealthStatus::Warning);
        assert_eq!(result.symptoms().len(), 1);
        assert_eq!(result.recommendations().len(), 1);
    }

    #[test]
    fn unknown_status_is_invalid() {
        assert_eq!(
            validate(candidate("unknown")),
            Err(ValidationError::InvalidStatus("unknown".to_string()))
        );
    }

    #[test]
    fn missing_status_is_a_missing_field() {
        let c = AnalysisCandidate {
            status: None,
            ..candidate("warning")
        };
        assert_eq!(validate(c), Err(ValidationError::MissingField("status")));
    }

    #[test]
    fn confidence_must_be_finite_and_in_range() {
        for bad in [-0.01, 1.01, f64::NAN, f64::INFINITY] {
            let c = AnalysisCandidate {
                confidence: Some(bad),
                ..candidate("disease")
            };
            assert!(matches!(validate(c), Err(ValidationError::InvalidConfidence(_))));
        }
        for edge in [0.0, 1.0] {
            let c = AnalysisCandidate {
                confidence: Some(edge),
                ..candidate("disease")
            };
            assert!(validate(c).is_ok());
        }
    }

    #[test]
    fn blank_condition_or_description_is_missing() {
        let c = AnalysisCandidate {
            condition: Some("   ".to_string()),
            ..candidate("warning")
        };
        assert_eq!(validate(c), Err(ValidationError::MissingField("condition")));

        let c = AnalysisCandidate {
            description: None,
            ..candidate("warning")
        };
        assert_eq!(validate(c), Err(ValidationError::MissingField("description")));
    }

    #[test]
    fn empty_list_entries_are_rejected() {
        let c = AnalysisCandidate {
            recommendations: Some(vec!["Water less".to_string(), String::new()]),
            ..candidate("warning")
        };
        assert_eq!(
            validate(c),
            Err(ValidationError::EmptyEntry {
                field: "recommendations",
                index: 1
            })
        );
    }

    #[test]
    fn healthy_with_symptoms_is_flagged() {
        assert_eq!(
            validate(candidate("healthy")),
            Err(ValidationError::SymptomsOnHealthy(1))
        );

        let c = AnalysisCandidate {
            symptoms: Some(Vec::new()),
            ..candidate("healthy")
        };
        assert_eq!(validate(c).unwrap().status(), HealthStatus::Healthy);
    }

    #[test]
    fn optional_sequences_may_be_absent() {
        let c = AnalysisCandidate {
            symptoms: None,
            recommendations: None,
            ..candidate("disease")
        };
        let result = validate(c).unwrap();
        assert!(result.symptoms().is_empty());
        assert!(result.recommendations().is_empty());
    }
}
