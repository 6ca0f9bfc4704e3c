//! Configuration type definitions.

use crate::constants::{detector, server};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Detector model and tuning.
    pub detector: DetectorConfig,

    /// HTTP server settings.
    pub server: ServerConfig,

    /// Rule table source.
    pub rules: RulesConfig,

    /// Default settings.
    pub defaults: DefaultsConfig,
}

/// Detector model and tuning parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Path to the ONNX model file.
    pub model: Option<PathBuf>,

    /// Path to the labels file (one class per line, in model order).
    pub labels: Option<PathBuf>,

    /// Minimum detector confidence.
    pub confidence_threshold: f32,

    /// IoU threshold for non-maximum suppression.
    pub iou_threshold: f32,

    /// Square input resolution in pixels.
    pub inference_resolution: u32,

    /// Maximum detections per image.
    pub max_detections: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model: None,
            labels: None,
            confidence_threshold: detector::DEFAULT_CONFIDENCE_THRESHOLD,
            iou_threshold: detector::DEFAULT_IOU_THRESHOLD,
            inference_resolution: detector::DEFAULT_INFERENCE_RESOLUTION,
            max_detections: detector::DEFAULT_MAX_DETECTIONS,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,

    /// Bind port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: server::DEFAULT_HOST.to_string(),
            port: server::DEFAULT_PORT,
        }
    }
}

/// Rule table source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Rules file replacing the embedded table.
    pub file: Option<PathBuf>,
}

/// Default classification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// City used when none is given on the command line.
    pub city: Option<String>,

    /// Output formats.
    pub formats: Vec<OutputFormat>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            city: None,
            formats: vec![OutputFormat::Json],
        }
    }
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Full JSON response.
    Json,
    /// One row per detection.
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

/// How command results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputMode {
    /// Human-readable text.
    #[default]
    Human,
    /// Single JSON envelope per result.
    Json,
}

impl OutputMode {
    /// Whether results are printed as JSON envelopes.
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}
