//! JSON envelope types for CLI output.
//!
//! In `--output-mode json` every command prints its result wrapped in a
//! [`JsonEnvelope`], so binwise can sit behind scripts and web frontends.

use crate::output::{PredictResponse, Resolution};
use crate::rules::{City, FollowupPrompt, Recommendation};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Current spec version for JSON envelope.
pub const SPEC_VERSION: &str = "1.0";

/// JSON envelope wrapping all CLI output events.
#[derive(Debug, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: serde::de::DeserializeOwned"))]
pub struct JsonEnvelope<T> {
    /// API specification version.
    pub spec_version: String,
    /// Event timestamp.
    pub timestamp: DateTime<Utc>,
    /// Event type.
    pub event: EventType,
    /// Event-specific payload.
    pub payload: T,
}

impl<T: Serialize> JsonEnvelope<T> {
    /// Create a new envelope with the current timestamp.
    pub fn new(event: EventType, payload: T) -> Self {
        Self {
            spec_version: SPEC_VERSION.to_string(),
            timestamp: Utc::now(),
            event,
            payload,
        }
    }
}

/// Event types for JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A single image finished processing.
    FileCompleted,
    /// All images processed.
    PipelineCompleted,
    /// Final result.
    Result,
    /// Error occurred.
    Error,
}

/// Result type discriminator for result payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultType {
    /// Image classification.
    Classification,
    /// Answer to a follow-up question.
    Resolution,
    /// Classification of pre-computed detections.
    Triage,
    /// Overview of the rule table.
    RulesList,
    /// Rules of one class in one city.
    RulesShow,
    /// Rules file validation.
    RulesCheck,
    /// Configuration display.
    Config,
}

/// Error severity level.
///
/// Every `error` event ends the command; per-file failures in a batch are
/// reported through `file_completed` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorSeverity {
    /// The command stopped.
    Fatal,
}

/// Error payload for error events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// Error code (`snake_case` identifier).
    pub code: String,
    /// Error severity.
    pub severity: ErrorSeverity,
    /// Human-readable error message.
    pub message: String,
}

/// File processing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    /// File was processed successfully.
    Processed,
    /// File processing failed.
    Failed,
    /// File was skipped (output exists).
    Skipped,
}

/// Payload for `file_completed` event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileCompletedPayload {
    /// File path.
    pub file: PathBuf,
    /// Processing status.
    pub status: FileStatus,
    /// Number of detections (if processed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detections: Option<usize>,
    /// Error message (if failed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Payload for `pipeline_completed` event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineCompletedPayload {
    /// Overall status.
    pub status: PipelineStatus,
    /// Files successfully processed.
    pub files_processed: usize,
    /// Files that failed.
    pub files_failed: usize,
    /// Files skipped.
    pub files_skipped: usize,
    /// Total detections across all files.
    pub total_detections: usize,
    /// Total duration in milliseconds.
    pub duration_ms: u64,
}

/// Pipeline completion status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    /// All files processed successfully.
    Success,
    /// Some files failed.
    PartialSuccess,
    /// Pipeline failed completely.
    Failed,
}

impl PipelineStatus {
    /// Derive the status from processed and failed counts.
    pub const fn from_counts(processed: usize, failed: usize) -> Self {
        if failed == 0 {
            Self::Success
        } else if processed > 0 {
            Self::PartialSuccess
        } else {
            Self::Failed
        }
    }
}

// ============================================================================
// Result Payloads for Commands
// ============================================================================

/// Payload for a classified image or detection list.
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationPayload {
    /// Result type discriminator.
    pub result_type: ResultType,
    /// Input the detections came from.
    pub source: PathBuf,
    /// Classified detections.
    #[serde(flatten)]
    pub response: PredictResponse,
}

/// Payload for a resolved follow-up answer.
#[derive(Debug, Clone, Serialize)]
pub struct ResolutionPayload {
    /// Result type discriminator.
    pub result_type: ResultType,
    /// City of the lookup.
    pub city: City,
    /// Detected class of the lookup.
    pub detected_class: String,
    /// Subtype of the lookup.
    pub subtype: String,
    /// The recommendation with the city's contact.
    pub result: Resolution,
}

/// Payload for the rule table overview.
#[derive(Debug, Clone, Serialize)]
pub struct RulesListPayload {
    /// Result type discriminator.
    pub result_type: ResultType,
    /// One entry per city.
    pub cities: Vec<CityEntry>,
}

/// Rule table overview for one city.
#[derive(Debug, Clone, Serialize)]
pub struct CityEntry {
    /// City.
    pub city: City,
    /// Who to contact in the city.
    pub contact: String,
    /// Classes with rules.
    pub classes: Vec<ClassEntry>,
}

/// Rule table overview for one class.
#[derive(Debug, Clone, Serialize)]
pub struct ClassEntry {
    /// Class label.
    pub class: String,
    /// Subtype keys, `default` for directly answered classes.
    pub subtypes: Vec<String>,
    /// Whether detections of this class need a follow-up answer.
    pub needs_followup: bool,
}

/// Payload for the rules of one class in one city.
#[derive(Debug, Clone, Serialize)]
pub struct RulesShowPayload {
    /// Result type discriminator.
    pub result_type: ResultType,
    /// City.
    pub city: City,
    /// Class label.
    pub class: String,
    /// Follow-up question, if the class has one.
    pub followup: Option<FollowupPrompt>,
    /// Recommendation per subtype.
    pub rules: BTreeMap<String, Recommendation>,
}

/// Payload for a validated rules file.
#[derive(Debug, Clone, Serialize)]
pub struct RulesCheckPayload {
    /// Result type discriminator.
    pub result_type: ResultType,
    /// File that was checked, `None` for the embedded table.
    pub file: Option<PathBuf>,
    /// Number of cities.
    pub cities: usize,
    /// Number of (city, class, subtype) rules.
    pub rules: usize,
    /// Number of follow-up questions.
    pub followups: usize,
}

/// Payload for config show result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigPayload {
    /// Result type discriminator.
    pub result_type: ResultType,
    /// Path to the config file.
    pub config_path: PathBuf,
    /// The configuration contents (as JSON value for flexibility).
    pub config: serde_json::Value,
}
