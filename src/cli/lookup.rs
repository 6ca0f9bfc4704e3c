//! `binwise resolve` and `binwise triage`: rule lookups without a model.

#![allow(clippy::print_stdout)]

use crate::classify::WasteClassifier;
use crate::config::OutputMode;
use crate::error::{Error, Result};
use crate::inference::RawDetection;
use crate::output::json_envelope::{ClassificationPayload, ResolutionPayload, ResultType};
use crate::output::{PredictResponse, Resolution, emit_json_result};
use std::path::Path;

/// Read a JSON array of raw detections.
pub fn read_detections(path: &Path) -> Result<Vec<RawDetection>> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| Error::DetectionParseFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Handle `resolve`.
pub fn resolve_answer(
    classifier: &WasteClassifier,
    city: &str,
    class: &str,
    subtype: &str,
    mode: OutputMode,
) -> Result<()> {
    let result = classifier.resolve(city, class, subtype)?;

    if mode.is_json() {
        emit_json_result(&ResolutionPayload {
            result_type: ResultType::Resolution,
            city: classifier.parse_city(city)?,
            detected_class: class.to_string(),
            subtype: subtype.to_string(),
            result,
        });
    } else {
        print_resolution(&result, "");
    }
    Ok(())
}

/// Handle `triage`.
pub fn triage_file(
    classifier: &WasteClassifier,
    city: &str,
    detections: &Path,
    mode: OutputMode,
) -> Result<()> {
    let city = classifier.parse_city(city)?;
    let raw = read_detections(detections)?;
    let response = PredictResponse {
        city,
        detections: classifier.process(city, &raw),
    };

    if mode.is_json() {
        emit_json_result(&ClassificationPayload {
            result_type: ResultType::Triage,
            source: detections.to_path_buf(),
            response,
        });
    } else {
        print_response(&response);
    }
    Ok(())
}

/// Print a recommendation for humans.
pub fn print_resolution(resolution: &Resolution, indent: &str) {
    let rec = &resolution.recommendation;
    println!(
        "{indent}{} {} ({} bin)",
        rec.icon, rec.bin_category, rec.color_tag
    );
    println!("{indent}  {}", rec.tip_text);
    println!("{indent}  Contact: {}", resolution.city_contact);
}

/// Print classified detections for humans.
pub fn print_response(response: &PredictResponse) {
    if response.detections.is_empty() {
        println!("No waste items detected ({}).", response.city);
        return;
    }

    for detection in &response.detections {
        println!(
            "{} {} ({:.1}%)",
            detection.id, detection.label, detection.confidence
        );
        if let Some(ref result) = detection.result {
            print_resolution(result, "  ");
        } else if let Some(ref prompt) = detection.followup {
            println!("  ? {}", prompt.question_text);
            for option in &prompt.options {
                println!("    - {} ({})", option.label_text, option.subtype_id);
            }
            println!(
                "  Answer with: binwise resolve --city {} --class {} --subtype <option>",
                response.city, detection.label
            );
        } else {
            println!("  No rule for this item in {}.", response.city);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_detections() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"label": "glass", "confidence": 0.9, "bbox": [0.1, 0.1, 0.4, 0.5]}}]"#
        )
        .unwrap();

        let raw = read_detections(file.path()).unwrap();
        assert_eq!(raw.len(), 1);
        assert_eq!(raw[0].label, "glass");
        assert!((raw[0].bbox.y2 - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_read_detections_malformed() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"label": "glass"}}"#).unwrap();

        let err = read_detections(file.path()).unwrap_err();
        assert!(matches!(err, Error::DetectionParseFailed { .. }));
    }

    #[test]
    fn test_read_detections_missing_file() {
        let err = read_detections(Path::new("/nonexistent/detections.json")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
