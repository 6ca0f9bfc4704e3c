//! ONNX Runtime backed detector.

use crate::config::{DetectorConfig, detector_files};
use crate::error::{Error, Result};
use crate::inference::postprocess::{decode_output, non_max_suppression};
use crate::inference::preprocess::{decode_image, letterbox};
use crate::inference::{BoundingBox, Detector, RawDetection};
use ort::session::Session;
use ort::value::Tensor;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// YOLO-family detector exported to ONNX.
///
/// The session is guarded by a mutex because running it requires exclusive
/// access; callers share the detector behind an `Arc`.
pub struct OnnxDetector {
    session: Mutex<Session>,
    labels: Vec<String>,
    name: String,
    confidence_threshold: f32,
    iou_threshold: f32,
    resolution: u32,
    max_detections: usize,
}

impl OnnxDetector {
    /// Build a detector from configuration.
    pub fn from_config(config: &DetectorConfig) -> Result<Self> {
        let (model_path, labels_path) = detector_files(config)?;
        let labels = load_labels(&labels_path)?;

        let bytes = std::fs::read(&model_path)?;
        let session = Session::builder()
            .map_err(build_error)?
            .commit_from_memory(&bytes)
            .map_err(build_error)?;

        let name = model_path
            .file_name()
            .map_or_else(|| "onnx".to_string(), |n| n.to_string_lossy().to_string());

        info!(
            "Loaded detector {} ({} classes, {}px)",
            name,
            labels.len(),
            config.inference_resolution
        );

        Ok(Self {
            session: Mutex::new(session),
            labels,
            name,
            confidence_threshold: config.confidence_threshold,
            iou_threshold: config.iou_threshold,
            resolution: config.inference_resolution,
            max_detections: config.max_detections,
        })
    }

    fn run(&self, input: Vec<f32>) -> Result<(Vec<i64>, Vec<f32>)> {
        let size = self.resolution as usize;
        let tensor = Tensor::from_array(([1usize, 3, size, size], input)).map_err(inference_error)?;

        let mut session = self.session.lock().map_err(|_| Error::Internal {
            message: "detector session lock poisoned".to_string(),
        })?;
        let outputs = session.run(ort::inputs![tensor]).map_err(inference_error)?;
        let (shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(inference_error)?;

        Ok((shape.to_vec(), data.to_vec()))
    }
}

impl Detector for OnnxDetector {
    fn detect(&self, image: &[u8]) -> Result<Vec<RawDetection>> {
        let rgb = decode_image(image)?;
        let (input, geometry) = letterbox(&rgb, self.resolution);

        let (shape, data) = self.run(input)?;
        let (rows, anchors) = match shape.as_slice() {
            [1, rows, anchors] => (
                usize::try_from(*rows).unwrap_or_default(),
                usize::try_from(*anchors).unwrap_or_default(),
            ),
            other => {
                return Err(Error::Inference {
                    reason: format!("unexpected output shape {other:?}"),
                });
            }
        };

        if rows != 4 + self.labels.len() {
            return Err(Error::Inference {
                reason: format!(
                    "model reports {} classes but labels file has {}",
                    rows.saturating_sub(4),
                    self.labels.len()
                ),
            });
        }

        let candidates = decode_output(&data, self.labels.len(), anchors, self.confidence_threshold);
        let kept = non_max_suppression(candidates, self.iou_threshold, self.max_detections);
        debug!("{} anchors, {} boxes after NMS", anchors, kept.len());

        Ok(kept
            .into_iter()
            .map(|candidate| {
                let [x1, y1, x2, y2] = geometry.to_normalized(candidate.corners);
                RawDetection::new(
                    self.labels[candidate.class_id].clone(),
                    candidate.confidence,
                    BoundingBox::new(x1, y1, x2, y2),
                )
            })
            .collect())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[allow(clippy::needless_pass_by_value)]
fn build_error(e: impl std::fmt::Display) -> Error {
    Error::DetectorBuild {
        reason: e.to_string(),
    }
}

#[allow(clippy::needless_pass_by_value)]
fn inference_error(e: impl std::fmt::Display) -> Error {
    Error::Inference {
        reason: e.to_string(),
    }
}

/// Read a labels file: one label per line, blank lines ignored.
pub fn load_labels(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)?;
    let labels: Vec<String> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if labels.is_empty() {
        return Err(Error::DetectorBuild {
            reason: format!("labels file {} is empty", path.display()),
        });
    }
    Ok(labels)
}
