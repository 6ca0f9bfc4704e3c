//! Detector abstraction.

use crate::error::Result;
use crate::inference::RawDetection;

/// Object detector that proposes labelled boxes for an encoded image.
///
/// Implementations must be shareable between request handlers.
pub trait Detector: Send + Sync {
    /// Run detection on an encoded image (JPEG, PNG, ...).
    fn detect(&self, image: &[u8]) -> Result<Vec<RawDetection>>;

    /// Short human-readable name used in logs.
    fn name(&self) -> &str;
}
