//! Error types for binwise.

/// Result type alias for binwise operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for binwise.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// City is not present in the rule table.
    #[error("invalid city '{city}'; choose one of: {supported}")]
    InvalidCity {
        /// City as supplied by the caller.
        city: String,
        /// Comma-separated list of supported cities.
        supported: String,
    },

    /// Inference request carried no image.
    #[error("no image provided")]
    MissingImage,

    /// No rule exists for the requested combination.
    #[error("no rule found for {city}/{class}/{subtype}")]
    NoRuleFound {
        /// City of the lookup.
        city: String,
        /// Detected class of the lookup.
        class: String,
        /// Subtype of the lookup.
        subtype: String,
    },

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// Failed to read a rules file.
    #[error("failed to read rules file '{path}'")]
    RulesRead {
        /// Path to the rules file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse rules data.
    #[error("failed to parse rules from {origin}")]
    RulesParse {
        /// Where the rules came from (file path or "embedded table").
        origin: String,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Rules data violates a table invariant.
    #[error("invalid rules table: {message}")]
    RulesValidation {
        /// Description of the violated invariant.
        message: String,
    },

    /// No detector model configured.
    #[error("no detector model configured (set detector.model in config or pass --model)")]
    DetectorUnavailable,

    /// Model file does not exist.
    #[error("model file does not exist: {path}")]
    ModelFileNotFound {
        /// Path to the missing model file.
        path: std::path::PathBuf,
    },

    /// Labels file does not exist.
    #[error("labels file does not exist: {path}")]
    LabelsFileNotFound {
        /// Path to the missing labels file.
        path: std::path::PathBuf,
    },

    /// Failed to build the detector session.
    #[error("failed to build detector: {reason}")]
    DetectorBuild {
        /// Description of the build failure.
        reason: String,
    },

    /// Inference failed.
    #[error("inference failed: {reason}")]
    Inference {
        /// Description of the inference failure.
        reason: String,
    },

    /// Image could not be decoded.
    #[error("failed to decode image: {reason}")]
    ImageDecode {
        /// Description of the decode failure.
        reason: String,
    },

    /// No valid image files found.
    #[error("no valid image files found in the provided paths")]
    NoValidImageFiles,

    /// Failed to parse a raw detections file.
    #[error("failed to parse detection file '{path}'")]
    DetectionParseFailed {
        /// Path to the detection file.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// Failed to write JSON output file.
    #[error("failed to write JSON output file '{path}'")]
    JsonWrite {
        /// Path to the JSON file.
        path: std::path::PathBuf,
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },

    /// HTTP server failed.
    #[error("HTTP server error: {reason}")]
    Server {
        /// Description of the server failure.
        reason: String,
    },

    /// Internal error (for unexpected failures).
    #[error("internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl Error {
    /// Short `snake_case` category for machine consumers.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidCity { .. } => "invalid_city",
            Self::MissingImage => "missing_image",
            Self::NoRuleFound { .. } => "no_rule_found",
            Self::ImageDecode { .. } => "invalid_image",
            Self::DetectorUnavailable => "detector_unavailable",
            Self::Inference { .. } => "inference_failed",
            Self::ConfigDirNotFound
            | Self::ConfigRead { .. }
            | Self::ConfigParse { .. }
            | Self::ConfigValidation { .. }
            | Self::ConfigWrite { .. }
            | Self::ConfigSerialize { .. } => "config_error",
            Self::RulesRead { .. } | Self::RulesParse { .. } | Self::RulesValidation { .. } => {
                "rules_error"
            }
            Self::DetectionParseFailed { .. } => "invalid_detections",
            _ => "internal_error",
        }
    }

    /// Whether the failure was caused by the request rather than the service.
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCity { .. } | Self::MissingImage | Self::ImageDecode { .. }
        )
    }

    /// Whether the failure means the requested rule does not exist.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NoRuleFound { .. })
    }
}
