use crate::analysis::types::AnalysisCandidate;

/// The fixed set of results the mock provider can return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogEntry {
    Healthy,
    EarlyBlight,
    LateBlight,
}

impl CatalogEntry {
    pub const ALL: [CatalogEntry; 3] = [
        CatalogEntry::Healthy,
        CatalogEntry::EarlyBlight,
        CatalogEntry::LateBlight,
    ];

    pub fn candidate(&self) -> AnalysisCandidate {
        match self {
            CatalogEntry::Healthy => AnalysisCandidate {
                status: Some("healthy".to_string()),
                confidence: Some(0.94),
                condition: Some("Healthy Plant".to_string()),
                description: Some(
                    "Your plant appears to be in excellent health with vibrant green foliage and no signs of disease or stress."
                        .to_string(),
                ),
                symptoms: None,
                recommendations: Some(lines(&[
                    "Continue current watering schedule",
                    "Ensure adequate sunlight exposure",
                    "Monitor for any changes in leaf color",
                ])),
            },
            CatalogEntry::EarlyBlight => AnalysisCandidate {
                status: Some("warning".to_string()),
                confidence: Some(0.78),
                condition: Some("Early Blight".to_string()),
                description: Some(
                    "Early signs of blight detected. This fungal disease commonly affects tomatoes and potatoes."
                        .to_string(),
                ),
                symptoms: Some(lines(&[
                    "Small dark spots on lower leaves",
                    "Yellowing around spot margins",
                    "Concentric ring patterns",
                ])),
                recommendations: Some(lines(&[
                    "Remove affected leaves immediately",
                    "Apply copper-based fungicide",
                    "Improve air circulation around plants",
                    "Water at soil level to avoid wetting leaves",
                ])),
            },
            CatalogEntry::LateBlight => AnalysisCandidate {
                status: Some("disease".to_string()),
                confidence: Some(0.89),
                condition: Some("Late Blight".to_string()),
                description: Some(
                    "Severe late blight infection detected. This is a serious disease that requires immediate action."
                        .to_string(),
                ),
                symptoms: Some(lines(&[
                    "Large brown patches on leaves",
                    "White fuzzy growth on leaf undersides",
                    "Rapid spread to stems and fruits",
                ])),
                recommendations: Some(lines(&[
                    "Remove all infected plant material",
                    "Apply systemic fungicide immediately",
                    "Increase spacing between plants",
                    "Consider resistant varieties for future planting",
                ])),
            },
        }
    }
}

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
