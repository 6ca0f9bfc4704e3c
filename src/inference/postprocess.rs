//! Decoding of YOLO-style output tensors and non-maximum suppression.

/// A scored box in model pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Index into the label list.
    pub class_id: usize,
    /// Best class score.
    pub confidence: f32,
    /// Corners `[x1, y1, x2, y2]` in model pixels.
    pub corners: [f32; 4],
}

impl Candidate {
    fn area(&self) -> f32 {
        let [x1, y1, x2, y2] = self.corners;
        (x2 - x1).max(0.0) * (y2 - y1).max(0.0)
    }

    /// Intersection over union with another candidate.
    pub fn iou(&self, other: &Self) -> f32 {
        let [ax1, ay1, ax2, ay2] = self.corners;
        let [bx1, by1, bx2, by2] = other.corners;

        let x1 = ax1.max(bx1);
        let y1 = ay1.max(by1);
        let x2 = ax2.min(bx2);
        let y2 = ay2.min(by2);

        let intersection = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
        let union = self.area() + other.area() - intersection;

        if union > 0.0 { intersection / union } else { 0.0 }
    }
}

/// Decode a `[4 + classes, anchors]` row-major output into candidates whose
/// best class score exceeds `confidence_threshold`.
///
/// Rows 0..4 hold centre x, centre y, width and height.
pub fn decode_output(
    data: &[f32],
    num_classes: usize,
    anchors: usize,
    confidence_threshold: f32,
) -> Vec<Candidate> {
    if num_classes == 0 || data.len() < (4 + num_classes) * anchors {
        return Vec::new();
    }

    let at = |row: usize, anchor: usize| data[row * anchors + anchor];

    (0..anchors)
        .filter_map(|anchor| {
            let (class_id, confidence) = (0..num_classes)
                .map(|class| (class, at(4 + class, anchor)))
                .max_by(|a, b| a.1.total_cmp(&b.1))?;

            if confidence <= confidence_threshold {
                return None;
            }

            let (cx, cy) = (at(0, anchor), at(1, anchor));
            let (half_w, half_h) = (at(2, anchor) / 2.0, at(3, anchor) / 2.0);
            Some(Candidate {
                class_id,
                confidence,
                corners: [cx - half_w, cy - half_h, cx + half_w, cy + half_h],
            })
        })
        .collect()
}

/// Greedy per-class non-maximum suppression, keeping at most `max_detections`.
///
/// Output is ordered by descending confidence.
pub fn non_max_suppression(
    mut candidates: Vec<Candidate>,
    iou_threshold: f32,
    max_detections: usize,
) -> Vec<Candidate> {
    candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut kept: Vec<Candidate> = Vec::new();
    for candidate in candidates {
        if kept.len() >= max_detections {
            break;
        }
        let suppressed = kept
            .iter()
            .any(|k| k.class_id == candidate.class_id && k.iou(&candidate) > iou_threshold);
        if !suppressed {
            kept.push(candidate);
        }
    }
    kept
}
