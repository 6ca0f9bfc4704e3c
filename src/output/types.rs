//! Output type definitions.

use crate::inference::BoundingBox;
use crate::rules::{City, FollowupPrompt, Recommendation};
use serde::Serialize;

/// A recommendation together with the city's contact string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Disposal guidance.
    #[serde(flatten)]
    pub recommendation: Recommendation,
    /// Who to contact in the selected city.
    pub city_contact: String,
}

/// A detection that survived the background filter, with its decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    /// Per-response identifier, `"{label}_{index}"`.
    pub id: String,
    /// Detected class label.
    pub label: String,
    /// Confidence in percent, rounded to one decimal place.
    pub confidence: f64,
    /// Normalized bounding box as reported by the detector.
    pub bbox: BoundingBox,
    /// Whether the caller must ask the follow-up question.
    pub needs_followup: bool,
    /// Question to ask when `needs_followup` is set.
    pub followup: Option<FollowupPrompt>,
    /// Direct answer, when one exists.
    pub result: Option<Resolution>,
}

/// Classification of one image for one city.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictResponse {
    /// City the rules were taken from.
    pub city: City,
    /// Detections ordered by descending confidence.
    pub detections: Vec<Detection>,
}

impl PredictResponse {
    /// Number of detections that still need an answer from the user.
    pub fn pending_followups(&self) -> usize {
        self.detections.iter().filter(|d| d.needs_followup).count()
    }
}

/// Convert a `0.0..=1.0` confidence to a percentage with one decimal.
///
/// Exact halves round to even.
pub fn confidence_percent(confidence: f32) -> f64 {
    (f64::from(confidence) * 1000.0).round_ties_even() / 10.0
}
