//! JSON output format writer.

use crate::error::{Error, Result};
use crate::output::{Detection, OutputWriter};
use crate::rules::City;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// JSON result file structure.
#[derive(Debug, Serialize)]
pub struct JsonResultFile<'a> {
    /// Source image file name.
    pub source_file: &'a str,
    /// Classification timestamp.
    pub analysis_date: DateTime<Utc>,
    /// Detector that produced the boxes.
    pub model: &'a str,
    /// City whose rules were applied.
    pub city: City,
    /// Classified detections, highest confidence first.
    pub detections: &'a [Detection],
    /// Summary statistics.
    pub summary: JsonSummary,
}

/// Summary statistics.
#[derive(Debug, Serialize)]
pub struct JsonSummary {
    /// Total number of detections.
    pub total_detections: usize,
    /// Detections answered directly.
    pub resolved: usize,
    /// Detections waiting on a follow-up answer.
    pub pending_followups: usize,
    /// Distinct labels seen.
    pub unique_labels: usize,
}

/// Writer for JSON result files.
pub struct JsonResultWriter {
    detections: Vec<Detection>,
    output_path: PathBuf,
    source_file: String,
    model: String,
    city: City,
}

impl JsonResultWriter {
    /// Create a new JSON result writer.
    pub fn new(output_path: &Path, source_file: &str, model: &str, city: City) -> Self {
        Self {
            detections: Vec::new(),
            output_path: output_path.to_path_buf(),
            source_file: source_file.to_string(),
            model: model.to_string(),
            city,
        }
    }

    fn compute_summary(&self) -> JsonSummary {
        let pending_followups = self.detections.iter().filter(|d| d.needs_followup).count();
        let unique_labels: BTreeSet<&str> =
            self.detections.iter().map(|d| d.label.as_str()).collect();

        JsonSummary {
            total_detections: self.detections.len(),
            resolved: self.detections.iter().filter(|d| d.result.is_some()).count(),
            pending_followups,
            unique_labels: unique_labels.len(),
        }
    }
}

impl OutputWriter for JsonResultWriter {
    fn write_header(&mut self) -> Result<()> {
        // Written in one piece at finalize.
        Ok(())
    }

    fn write_detection(&mut self, detection: &Detection) -> Result<()> {
        self.detections.push(detection.clone());
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        let result = JsonResultFile {
            source_file: &self.source_file,
            analysis_date: Utc::now(),
            model: &self.model,
            city: self.city,
            detections: &self.detections,
            summary: self.compute_summary(),
        };

        let file = File::create(&self.output_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &result).map_err(|e| Error::JsonWrite {
            path: self.output_path.clone(),
            source: e,
        })?;

        Ok(())
    }
}
