//! Structured result reporting for `--output-mode json`.

use crate::error::Error;
use crate::output::json_envelope::{
    ErrorPayload, ErrorSeverity, EventType, FileCompletedPayload, FileStatus, JsonEnvelope,
    PipelineCompletedPayload, PipelineStatus,
};
use std::io::Write;
use std::path::Path;

/// Summary of a classification batch.
#[derive(Debug, Clone, Default)]
pub struct PipelineSummary {
    /// Files successfully processed.
    pub files_processed: usize,
    /// Files that failed.
    pub files_failed: usize,
    /// Files skipped.
    pub files_skipped: usize,
    /// Total detections.
    pub total_detections: usize,
    /// Total duration in milliseconds.
    pub duration_ms: u64,
}

impl PipelineSummary {
    /// Envelope payload for this summary.
    pub const fn to_payload(&self) -> PipelineCompletedPayload {
        PipelineCompletedPayload {
            status: PipelineStatus::from_counts(self.files_processed, self.files_failed),
            files_processed: self.files_processed,
            files_failed: self.files_failed,
            files_skipped: self.files_skipped,
            total_detections: self.total_detections,
            duration_ms: self.duration_ms,
        }
    }
}

/// Write one envelope as a single JSON line.
pub fn write_event<W: Write, T: serde::Serialize>(
    writer: &mut W,
    event: EventType,
    payload: &T,
) -> std::io::Result<()> {
    let envelope = JsonEnvelope::new(event, payload);
    let json = serde_json::to_string(&envelope).map_err(std::io::Error::other)?;
    writeln!(writer, "{json}")
}

fn emit<T: serde::Serialize>(event: EventType, payload: &T) {
    let stdout = std::io::stdout();
    if let Err(e) = write_event(&mut stdout.lock(), event, payload) {
        // stderr so a broken pipe does not corrupt the JSON stream
        eprintln!("error: failed to write JSON event: {e}");
    }
}

/// Emit a JSON result event to stdout.
pub fn emit_json_result<T: serde::Serialize>(payload: &T) {
    emit(EventType::Result, payload);
}

/// Emit a fatal error event to stdout.
pub fn emit_json_error(error: &Error) {
    emit(
        EventType::Error,
        &ErrorPayload {
            code: error.code().to_string(),
            severity: ErrorSeverity::Fatal,
            message: error.to_string(),
        },
    );
}

/// Emit a per-file completion event to stdout.
pub fn emit_file_completed(
    file: &Path,
    status: FileStatus,
    detections: Option<usize>,
    error: Option<&Error>,
) {
    emit(
        EventType::FileCompleted,
        &FileCompletedPayload {
            file: file.to_path_buf(),
            status,
            detections,
            error: error.map(ToString::to_string),
        },
    );
}

/// Emit the batch summary to stdout.
pub fn emit_pipeline_completed(summary: &PipelineSummary) {
    emit(EventType::PipelineCompleted, &summary.to_payload());
}
