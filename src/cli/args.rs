//! CLI argument definitions.

use crate::cli::validators::{parse_confidence, parse_resolution};
use crate::config::{DetectorConfig, OutputFormat, OutputMode};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Sort waste into the right bin from a photo, using city disposal rules.
#[derive(Debug, Parser)]
#[command(name = "binwise")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Images or directories to classify.
    pub inputs: Vec<PathBuf>,

    /// Options for classifying images.
    #[command(flatten)]
    pub classify: ClassifyArgs,

    /// Configuration file (default: platform config directory).
    #[arg(long = "config", global = true, env = "BINWISE_CONFIG")]
    pub config_file: Option<PathBuf>,

    /// Rules file replacing the embedded table.
    #[arg(long, global = true, env = "BINWISE_RULES")]
    pub rules: Option<PathBuf>,

    /// Result format on stdout.
    #[arg(long, value_enum, global = true, default_value_t = OutputMode::Human, env = "BINWISE_OUTPUT_MODE")]
    pub output_mode: OutputMode,

    /// Only log warnings and errors; hide progress.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase verbosity (-v: debug, -vv: trace+ORT info, -vvv: trace+ORT debug).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Turn a follow-up answer into a disposal recommendation.
    Resolve {
        /// City whose rules apply.
        #[arg(long, env = "BINWISE_CITY")]
        city: Option<String>,
        /// Detected class (e.g. paper).
        #[arg(long = "class", alias = "detected-class")]
        class: String,
        /// Chosen follow-up option.
        #[arg(long, default_value = crate::constants::DEFAULT_SUBTYPE)]
        subtype: String,
    },
    /// Classify pre-computed detections from a JSON file without a model.
    Triage {
        /// City whose rules apply.
        #[arg(long, env = "BINWISE_CITY")]
        city: Option<String>,
        /// JSON array of `{label, confidence, bbox}` objects.
        detections: PathBuf,
    },
    /// Inspect and validate disposal rules.
    Rules {
        /// Rules action to perform.
        #[command(subcommand)]
        action: RulesAction,
    },
    /// Run the HTTP service.
    Serve(ServeArgs),
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Rules subcommand actions.
#[derive(Debug, Subcommand)]
pub enum RulesAction {
    /// List cities, classes and subtypes.
    List {
        /// Only show this city.
        #[arg(long)]
        city: Option<String>,
    },
    /// Show the rules of one class in one city.
    Show {
        /// City whose rules apply.
        #[arg(long, env = "BINWISE_CITY")]
        city: Option<String>,
        /// Detected class.
        #[arg(long = "class")]
        class: String,
    },
    /// Validate a rules file (the active table when omitted).
    Check {
        /// Rules file to validate.
        file: Option<PathBuf>,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Detector overrides shared by classification and the HTTP service.
#[derive(Debug, Clone, Default, Args)]
pub struct DetectorArgs {
    /// Path to the ONNX model file (overrides config).
    #[arg(long, env = "BINWISE_MODEL")]
    pub model: Option<PathBuf>,

    /// Path to the labels file (overrides config).
    #[arg(long, env = "BINWISE_LABELS")]
    pub labels: Option<PathBuf>,

    /// Minimum detector confidence (0.0-1.0).
    #[arg(long, value_parser = parse_confidence, env = "BINWISE_CONFIDENCE")]
    pub confidence: Option<f32>,

    /// IoU threshold for non-maximum suppression (0.0-1.0).
    #[arg(long, value_parser = parse_confidence, env = "BINWISE_IOU")]
    pub iou: Option<f32>,

    /// Inference resolution in pixels (multiple of 32).
    #[arg(long, value_parser = parse_resolution, env = "BINWISE_RESOLUTION")]
    pub resolution: Option<u32>,

    /// Maximum detections per image.
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..), env = "BINWISE_MAX_DETECTIONS")]
    pub max_detections: Option<u16>,
}

impl DetectorArgs {
    /// Apply the overrides on top of a configured detector.
    pub fn apply(&self, config: &DetectorConfig) -> DetectorConfig {
        let mut merged = config.clone();
        if let Some(ref model) = self.model {
            merged.model = Some(model.clone());
        }
        if let Some(ref labels) = self.labels {
            merged.labels = Some(labels.clone());
        }
        if let Some(confidence) = self.confidence {
            merged.confidence_threshold = confidence;
        }
        if let Some(iou) = self.iou {
            merged.iou_threshold = iou;
        }
        if let Some(resolution) = self.resolution {
            merged.inference_resolution = resolution;
        }
        if let Some(max_detections) = self.max_detections {
            merged.max_detections = usize::from(max_detections);
        }
        merged
    }
}

/// Arguments for classifying images.
#[derive(Debug, Args)]
pub struct ClassifyArgs {
    /// City whose rules apply.
    #[arg(long, env = "BINWISE_CITY")]
    pub city: Option<String>,

    /// Detector overrides.
    #[command(flatten)]
    pub detector: DetectorArgs,

    /// Output formats (comma-separated: json,csv).
    #[arg(short, long, value_enum, value_delimiter = ',', env = "BINWISE_FORMAT")]
    pub format: Option<Vec<OutputFormat>>,

    /// Output directory (default: same as input).
    #[arg(short, long, env = "BINWISE_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Print the result of a single image to stdout instead of writing files.
    #[arg(long)]
    pub stdout: bool,

    /// Reprocess images even if output exists.
    #[arg(long)]
    pub force: bool,

    /// Stop on first error.
    #[arg(long)]
    pub fail_fast: bool,
}

/// Arguments for the HTTP service.
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Bind address (overrides config).
    #[arg(long, env = "BINWISE_HOST")]
    pub host: Option<String>,

    /// Bind port (overrides config).
    #[arg(long, env = "BINWISE_PORT")]
    pub port: Option<u16>,

    /// Detector overrides.
    #[command(flatten)]
    pub detector: DetectorArgs,
}
