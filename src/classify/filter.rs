//! Background rejection for detector output.

use crate::constants::BACKGROUND_AREA_RATIO;
use crate::inference::RawDetection;

/// Whether a detection covers so much of the frame that it is most likely background.
pub fn is_background(detection: &RawDetection) -> bool {
    detection.bbox.area() > BACKGROUND_AREA_RATIO
}
