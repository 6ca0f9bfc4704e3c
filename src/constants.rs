//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "binwise";

/// Reserved subtype meaning "no further disambiguation needed".
pub const DEFAULT_SUBTYPE: &str = "default";

/// Detections whose box covers more than this share of the frame are
/// treated as background and dropped.
pub const BACKGROUND_AREA_RATIO: f32 = 0.70;

/// Label vocabulary of the bundled waste detector.
///
/// Rule and follow-up tables are validated against this list at load time.
pub const KNOWN_CLASSES: &[&str] = &[
    "biowaste",
    "cloth",
    "footware",
    "glass",
    "metal",
    "paper",
    "plastic",
    "thermocol",
    "wrapper",
];

/// Detector parameter defaults.
pub mod detector {
    /// Minimum detector confidence for a box to be reported.
    pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.35;

    /// IoU threshold used by non-maximum suppression.
    pub const DEFAULT_IOU_THRESHOLD: f32 = 0.6;

    /// Square input resolution the image is letterboxed to.
    pub const DEFAULT_INFERENCE_RESOLUTION: u32 = 1280;

    /// Maximum detections kept per image.
    pub const DEFAULT_MAX_DETECTIONS: usize = 6;

    /// Largest accepted input resolution.
    pub const MAX_INFERENCE_RESOLUTION: u32 = 4096;

    /// Model stride; the input resolution must be a multiple of it.
    pub const STRIDE: u32 = 32;

    /// Grey value used to pad letterboxed images.
    pub const LETTERBOX_FILL: u8 = 114;
}

/// HTTP server defaults.
pub mod server {
    /// Default bind address.
    pub const DEFAULT_HOST: &str = "0.0.0.0";

    /// Default port.
    pub const DEFAULT_PORT: u16 = 5000;

    /// Upper bound for uploaded image bodies (20 MiB).
    pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;
}

/// Confidence value bounds.
pub mod confidence {
    /// Minimum valid confidence value.
    pub const MIN: f32 = 0.0;
    /// Maximum valid confidence value.
    pub const MAX: f32 = 1.0;
}

/// Output file extensions by format.
pub mod output_extensions {
    /// JSON output extension.
    pub const JSON: &str = ".binwise.json";
    /// CSV output extension.
    pub const CSV: &str = ".binwise.csv";
}

/// Image file extensions picked up when scanning input directories.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp"];
