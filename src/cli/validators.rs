//! CLI argument validators.

use crate::constants::detector::{MAX_INFERENCE_RESOLUTION, STRIDE};

/// Parse and validate a value in the unit interval (0.0-1.0).
pub fn parse_confidence(s: &str) -> Result<f32, String> {
    let value: f32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if !(0.0..=1.0).contains(&value) {
        return Err(format!("value must be between 0.0 and 1.0, got {value}"));
    }

    Ok(value)
}

/// Parse and validate an inference resolution (positive multiple of 32, at most 4096).
pub fn parse_resolution(s: &str) -> Result<u32, String> {
    let value: u32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid pixel count"))?;

    if value == 0 || value % STRIDE != 0 {
        return Err(format!(
            "resolution must be a positive multiple of {STRIDE}, got {value}"
        ));
    }
    if value > MAX_INFERENCE_RESOLUTION {
        return Err(format!(
            "resolution must be at most {MAX_INFERENCE_RESOLUTION}, got {value}"
        ));
    }

    Ok(value)
}
