//! Single image processing pipeline.

use crate::classify::WasteClassifier;
use crate::config::OutputFormat;
use crate::error::Result;
use crate::inference::Detector;
use crate::output::{CsvWriter, Detection, JsonResultWriter, OutputWriter, PredictResponse};
use crate::pipeline::output_path_for;
use crate::rules::City;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Detect, classify and return the response for one image file.
pub fn classify_image(
    input_path: &Path,
    detector: &dyn Detector,
    classifier: &WasteClassifier,
    city: City,
) -> Result<PredictResponse> {
    let bytes = std::fs::read(input_path)?;
    let raw = detector.detect(&bytes)?;
    debug!("{}: {} raw detections", input_path.display(), raw.len());

    Ok(PredictResponse {
        city,
        detections: classifier.process(city, &raw),
    })
}

/// Process a single image and write the requested output files.
pub fn process_file(
    input_path: &Path,
    output_dir: &Path,
    detector: &dyn Detector,
    classifier: &WasteClassifier,
    city: City,
    formats: &[OutputFormat],
) -> Result<ProcessResult> {
    let start_time = Instant::now();
    info!("Processing: {}", input_path.display());

    let response = classify_image(input_path, detector, classifier, city)?;

    let source_file = input_path
        .file_name()
        .map_or_else(|| input_path.display().to_string(), |n| n.to_string_lossy().to_string());

    std::fs::create_dir_all(output_dir)?;
    for format in formats {
        write_output(
            input_path,
            output_dir,
            *format,
            &source_file,
            detector.name(),
            &response,
        )?;
    }

    let pending_followups = response.pending_followups();
    let duration_secs = start_time.elapsed().as_secs_f64();
    info!(
        "{}: {} items, {} need a follow-up answer ({:.2}s)",
        source_file,
        response.detections.len(),
        pending_followups,
        duration_secs
    );

    Ok(ProcessResult {
        detections: response.detections.len(),
        pending_followups,
        duration_secs,
    })
}

/// Write classified detections to an output file.
fn write_output(
    input_path: &Path,
    output_dir: &Path,
    format: OutputFormat,
    source_file: &str,
    model: &str,
    response: &PredictResponse,
) -> Result<()> {
    let output_path = output_path_for(input_path, output_dir, format);
    debug!("Writing {} output: {}", format, output_path.display());

    let mut writer: Box<dyn OutputWriter> = match format {
        OutputFormat::Json => Box::new(JsonResultWriter::new(
            &output_path,
            source_file,
            model,
            response.city,
        )),
        OutputFormat::Csv => Box::new(CsvWriter::new(&output_path, source_file)?),
    };

    write_detections(writer.as_mut(), &response.detections)
}

fn write_detections(writer: &mut dyn OutputWriter, detections: &[Detection]) -> Result<()> {
    writer.write_header()?;
    for detection in detections {
        writer.write_detection(detection)?;
    }
    writer.finalize()
}

/// Result of processing a single image.
#[derive(Debug)]
pub struct ProcessResult {
    /// Number of detections kept after filtering.
    pub detections: usize,
    /// Detections that still need a follow-up answer.
    pub pending_followups: usize,
    /// Processing duration in seconds.
    pub duration_secs: f64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::inference::{BoundingBox, RawDetection};
    use crate::rules::RuleBook;
    use std::sync::Arc;
    use tempfile::tempdir;

    struct FixedDetector(Vec<RawDetection>);

    impl Detector for FixedDetector {
        fn detect(&self, _image: &[u8]) -> Result<Vec<RawDetection>> {
            Ok(self.0.clone())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn classifier() -> WasteClassifier {
        WasteClassifier::new(Arc::new(RuleBook::embedded().unwrap()))
    }

    #[test]
    fn test_process_file_writes_all_formats() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("bin.jpg");
        std::fs::write(&input, b"image bytes").unwrap();
        let out = dir.path().join("out");

        let detector = FixedDetector(vec![
            RawDetection::new("glass", 0.9, BoundingBox::new(0.1, 0.1, 0.3, 0.3)),
            RawDetection::new("paper", 0.6, BoundingBox::new(0.5, 0.5, 0.7, 0.7)),
            RawDetection::new("cloth", 0.8, BoundingBox::new(0.0, 0.0, 1.0, 1.0)),
        ]);

        let result = process_file(
            &input,
            &out,
            &detector,
            &classifier(),
            City::Oakland,
            &[OutputFormat::Json, OutputFormat::Csv],
        )
        .unwrap();

        assert_eq!(result.detections, 2);
        assert_eq!(result.pending_followups, 1);

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out.join("bin.binwise.json")).unwrap())
                .unwrap();
        assert_eq!(json["model"], "fixed");
        assert_eq!(json["detections"][0]["id"], "glass_0");
        assert_eq!(json["detections"][1]["id"], "paper_1");

        let csv = std::fs::read_to_string(out.join("bin.binwise.csv")).unwrap();
        assert_eq!(csv.lines().count(), 3);
    }

    #[test]
    fn test_classify_image_missing_file_is_io_error() {
        let detector = FixedDetector(Vec::new());
        let result = classify_image(
            Path::new("/nonexistent/bin.jpg"),
            &detector,
            &classifier(),
            City::Livermore,
        );
        assert!(matches!(result, Err(crate::error::Error::Io(_))));
    }
}
