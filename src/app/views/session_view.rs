use std::fmt;

use crate::analysis::{AnalysisResult, HealthStatus};
use crate::app::views::View;
use crate::session::SessionState;

/// Plain-text rendering of the analysis session.
pub struct SessionView {
    show_symptoms: bool,
    show_recommendations: bool,
}

impl SessionView {
    pub fn new() -> Self {
        Self {
            show_symptoms: true,
            show_recommendations: true,
        }
    }

    pub fn with_symptoms(mut self, show: bool) -> Self {
        self.show_symptoms = show;
        self
    }

    pub fn with_recommendations(mut self, show: bool) -> Self {
        self.show_recommendations = show;
        self
    }

    pub fn render(&mut self, state: &SessionState) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.draw(&mut out, state);
        out
    }

    fn status_marker(status: HealthStatus) -> &'static str {
        match status {
            HealthStatus::Healthy => "[ok]",
            HealthStatus::Warning => "[!]",
            HealthStatus::Disease => "[x]",
        }
    }

    fn draw_result(&self, out: &mut dyn fmt::Write, result: &AnalysisResult) -> fmt::Result {
        writeln!(out, "Analysis Complete")?;
        writeln!(
            out,
            "{} {} [{}]",
            Self::status_marker(result.status()),
            result.condition(),
            result.status().badge()
        )?;
        writeln!(out, "Confidence: {}", result.confidence_percent())?;
        writeln!(out, "{}", result.description())?;

        if self.show_symptoms && !result.symptoms().is_empty() {
            writeln!(out, "\nSymptoms Detected")?;
            for symptom in result.symptoms() {
                writeln!(out, "  - {}", symptom)?;
            }
        }

        if self.show_recommendations && !result.recommendations().is_empty() {
            writeln!(out, "\nRecommendations")?;
            for recommendation in result.recommendations() {
                writeln!(out, "  - {}", recommendation)?;
            }
        }
        Ok(())
    }
}

impl Default for SessionView {
    fn default() -> Self {
        Self::new()
    }
}

impl View for SessionView {
    fn draw(&mut self, out: &mut dyn fmt::Write, state: &SessionState) -> fmt::Result {
        match state {
            SessionState::Idle => {
                writeln!(out, "Upload Plant Image")?;
                writeln!(out, "Take a clear photo of your plant's leaves to get started")
            }
            SessionState::ImageLoaded(reference) => {
                writeln!(out, "Image loaded: {}", reference)
            }
            SessionState::Analyzing(reference) => {
                writeln!(out, "Image: {}", reference)?;
                writeln!(out, "Analyzing Your Plant")?;
                writeln!(out, "Examining the image for signs of disease...")
            }
            SessionState::Completed(reference, result) => {
                writeln!(out, "Image: {}", reference)?;
                self.draw_result(out, result)
            }
            SessionState::Failed(reference, error) => {
                writeln!(out, "Image: {}", reference)?;
                writeln!(out, "Analysis Failed")?;
                writeln!(out, "{}", error)?;
                writeln!(out, "Submit the image again or start over.")
            }
        }
    }
}
