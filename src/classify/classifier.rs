//! Per-detection decision and follow-up resolution.

use crate::classify::filter::is_background;
use crate::constants::DEFAULT_SUBTYPE;
use crate::error::{Error, Result};
use crate::inference::RawDetection;
use crate::output::{Detection, PredictResponse, Resolution, confidence_percent};
use crate::rules::{City, Recommendation, RuleBook};
use std::sync::Arc;
use tracing::{debug, trace};

/// Maps detector output and follow-up answers to disposal recommendations.
///
/// Cheap to clone; the rule book is shared.
#[derive(Debug, Clone)]
pub struct WasteClassifier {
    rules: Arc<RuleBook>,
}

impl WasteClassifier {
    /// Create a classifier over a loaded rule book.
    pub const fn new(rules: Arc<RuleBook>) -> Self {
        Self { rules }
    }

    /// The rule book backing this classifier.
    pub fn rules(&self) -> &RuleBook {
        &self.rules
    }

    /// Validate a caller-supplied city name.
    pub fn parse_city(&self, name: &str) -> Result<City> {
        self.rules.table().parse_city(name)
    }

    /// Decide, for every non-background detection, between a direct answer
    /// and a follow-up question.
    ///
    /// `city` must already be validated. The result is sorted by descending
    /// confidence; equal confidences keep their input order.
    pub fn process(&self, city: City, raw_detections: &[RawDetection]) -> Vec<Detection> {
        let table = self.rules.table();
        let catalog = self.rules.catalog();
        let mut detections: Vec<Detection> = Vec::with_capacity(raw_detections.len());

        for raw in raw_detections {
            if is_background(raw) {
                debug!(
                    "Dropping '{}' ({:.2}): box covers {:.0}% of the frame",
                    raw.label,
                    raw.confidence,
                    raw.bbox.area() * 100.0
                );
                continue;
            }

            let label = raw.label.as_str();
            let prompt = catalog.get(label);
            let needs_followup = self.rules.needs_followup(city, label);

            let result = if needs_followup {
                None
            } else {
                table
                    .lookup(city, label, DEFAULT_SUBTYPE)
                    .map(|rec| self.attach_contact(city, rec))
            };

            trace!(
                "{}: needs_followup={}, direct_result={}",
                label,
                needs_followup,
                result.is_some()
            );

            detections.push(Detection {
                id: format!("{label}_{}", detections.len()),
                label: raw.label.clone(),
                confidence: confidence_percent(raw.confidence),
                bbox: raw.bbox,
                needs_followup,
                followup: if needs_followup { prompt.cloned() } else { None },
                result,
            });
        }

        // Stable sort: ties keep detector order.
        detections.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        detections
    }

    /// Validate the city and classify detections for one image.
    pub fn predict(&self, city: &str, raw_detections: &[RawDetection]) -> Result<PredictResponse> {
        let city = self.parse_city(city)?;
        let detections = self.process(city, raw_detections);
        debug!(
            "{}: {} of {} detections kept",
            city,
            detections.len(),
            raw_detections.len()
        );
        Ok(PredictResponse { city, detections })
    }

    /// Resolve a follow-up answer to a final recommendation.
    pub fn resolve(&self, city: &str, class: &str, subtype: &str) -> Result<Resolution> {
        let parsed = self.parse_city(city)?;
        let rec = self
            .rules
            .table()
            .lookup(parsed, class, subtype)
            .ok_or_else(|| Error::NoRuleFound {
                city: parsed.to_string(),
                class: class.to_string(),
                subtype: subtype.to_string(),
            })?;
        Ok(self.attach_contact(parsed, rec))
    }

    fn attach_contact(&self, city: City, recommendation: &Recommendation) -> Resolution {
        Resolution {
            recommendation: recommendation.clone(),
            city_contact: self
                .rules
                .table()
                .contact(city)
                .unwrap_or_default()
                .to_string(),
        }
    }
}
