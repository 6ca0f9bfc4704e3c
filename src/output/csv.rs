//! CSV output format writer.

use crate::error::Result;
use crate::output::{Detection, OutputWriter};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const HEADER: &str =
    "Id,Label,Confidence (%),X1,Y1,X2,Y2,Needs followup,Bin,Color,Emoji,Tip,City contact,File";

/// CSV format output writer, one row per detection.
///
/// Recommendation columns stay empty for detections that still need an
/// answer to their follow-up question.
pub struct CsvWriter {
    writer: BufWriter<File>,
    source_file: String,
}

impl CsvWriter {
    /// Create a new CSV writer.
    pub fn new(path: &Path, source_file: &str) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            source_file: source_file.to_string(),
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_header(&mut self) -> Result<()> {
        writeln!(self.writer, "{HEADER}")?;
        Ok(())
    }

    fn write_detection(&mut self, detection: &Detection) -> Result<()> {
        let bbox = detection.bbox;
        write!(
            self.writer,
            "{},{},{:.1},{:.4},{:.4},{:.4},{:.4},{}",
            escape_csv(&detection.id),
            escape_csv(&detection.label),
            detection.confidence,
            bbox.x1,
            bbox.y1,
            bbox.x2,
            bbox.y2,
            detection.needs_followup,
        )?;

        match detection.result {
            Some(ref resolution) => {
                let rec = &resolution.recommendation;
                write!(
                    self.writer,
                    ",{},{},{},{},{}",
                    escape_csv(&rec.bin_category),
                    escape_csv(&rec.color_tag),
                    escape_csv(&rec.icon),
                    escape_csv(&rec.tip_text),
                    escape_csv(&resolution.city_contact),
                )?;
            }
            None => write!(self.writer, ",,,,,")?,
        }

        writeln!(self.writer, ",{}", escape_csv(&self.source_file))?;
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Escape a value for CSV output.
fn escape_csv(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::inference::BoundingBox;
    use crate::output::Resolution;
    use crate::rules::Recommendation;
    use tempfile::NamedTempFile;

    fn detection(id: &str, result: Option<Resolution>) -> Detection {
        Detection {
            id: id.to_string(),
            label: id.split('_').next().unwrap_or_default().to_string(),
            confidence: 91.3,
            bbox: BoundingBox::new(0.1, 0.2, 0.3, 0.4),
            needs_followup: result.is_none(),
            followup: None,
            result,
        }
    }

    #[test]
    fn test_csv_writer_basic() {
        let file = NamedTempFile::new().unwrap();
        let mut writer = CsvWriter::new(file.path(), "kitchen.jpg").unwrap();

        writer.write_header().unwrap();
        let resolution = Resolution {
            recommendation: Recommendation {
                bin_category: "Recyclable".to_string(),
                color_tag: "blue".to_string(),
                icon: "♻️".to_string(),
                tip_text: "Empty, then recycle.".to_string(),
            },
            city_contact: "Oakland Recycles".to_string(),
        };
        writer
            .write_detection(&detection("glass_0", Some(resolution)))
            .unwrap();
        writer.write_detection(&detection("paper_1", None)).unwrap();
        writer.finalize().unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Id,Label,Confidence (%)"));
        assert_eq!(
            lines[1],
            "glass_0,glass,91.3,0.1000,0.2000,0.3000,0.4000,false,Recyclable,blue,♻️,\"Empty, then recycle.\",Oakland Recycles,kitchen.jpg"
        );
        assert_eq!(
            lines[2],
            "paper_1,paper,91.3,0.1000,0.2000,0.3000,0.4000,true,,,,,,kitchen.jpg"
        );
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv("with\"quote"), "\"with\"\"quote\"");
    }
}
