//! Object detection: the detector seam and its ONNX implementation.

mod detector;
mod onnx;
mod postprocess;
mod preprocess;
mod types;

pub use detector::Detector;
pub use onnx::{OnnxDetector, load_labels};
pub use types::{BoundingBox, RawDetection};
