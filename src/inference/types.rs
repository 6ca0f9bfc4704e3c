//! Detector output types.

use serde::{Deserialize, Serialize};

/// Axis-aligned box in normalized image coordinates (`0.0..=1.0`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct BoundingBox {
    /// Left edge.
    pub x1: f32,
    /// Top edge.
    pub y1: f32,
    /// Right edge.
    pub x2: f32,
    /// Bottom edge.
    pub y2: f32,
}

impl BoundingBox {
    /// Create a box from its corners.
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Share of the frame covered by the box.
    pub fn area(&self) -> f32 {
        (self.x2 - self.x1) * (self.y2 - self.y1)
    }
}

impl From<[f32; 4]> for BoundingBox {
    fn from([x1, y1, x2, y2]: [f32; 4]) -> Self {
        Self { x1, y1, x2, y2 }
    }
}

impl From<BoundingBox> for [f32; 4] {
    fn from(bbox: BoundingBox) -> Self {
        [bbox.x1, bbox.y1, bbox.x2, bbox.y2]
    }
}

/// One unfiltered detector output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDetection {
    /// Detected class label.
    pub label: String,
    /// Detector confidence (0.0 - 1.0).
    pub confidence: f32,
    /// Normalized bounding box.
    pub bbox: BoundingBox,
}

impl RawDetection {
    /// Create a raw detection.
    pub fn new(label: impl Into<String>, confidence: f32, bbox: BoundingBox) -> Self {
        Self {
            label: label.into(),
            confidence,
            bbox,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_area() {
        let bbox = BoundingBox::new(0.1, 0.2, 0.5, 0.7);
        assert!((bbox.area() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_raw_detection_json_shape() {
        let raw: RawDetection =
            serde_json::from_str(r#"{"label":"glass","confidence":0.9,"bbox":[0.1,0.1,0.3,0.4]}"#)
                .unwrap();
        assert_eq!(raw.label, "glass");
        assert_eq!(raw.bbox, BoundingBox::new(0.1, 0.1, 0.3, 0.4));

        let json = serde_json::to_value(&raw).unwrap();
        assert!(json["bbox"].is_array());
        assert_eq!(json["bbox"].as_array().unwrap().len(), 4);
    }
}
