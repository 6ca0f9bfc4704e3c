//! Configuration validation.

use crate::config::{Config, DetectorConfig};
use crate::constants::confidence;
use crate::constants::detector::{MAX_INFERENCE_RESOLUTION, STRIDE};
use crate::error::{Error, Result};
use crate::rules::City;
use std::path::PathBuf;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_detector(&config.detector)?;
    validate_server(config)?;
    validate_defaults(config)?;
    Ok(())
}

fn validation_error(message: String) -> Error {
    Error::ConfigValidation { message }
}

/// Validate detector tuning parameters.
fn validate_detector(detector: &DetectorConfig) -> Result<()> {
    for (name, value) in [
        ("confidence_threshold", detector.confidence_threshold),
        ("iou_threshold", detector.iou_threshold),
    ] {
        if !(confidence::MIN..=confidence::MAX).contains(&value) {
            return Err(validation_error(format!(
                "detector.{name} must be between {} and {}, got {value}",
                confidence::MIN,
                confidence::MAX
            )));
        }
    }

    if detector.inference_resolution == 0 || detector.inference_resolution % STRIDE != 0 {
        return Err(validation_error(format!(
            "detector.inference_resolution must be a positive multiple of {STRIDE}, got {}",
            detector.inference_resolution
        )));
    }
    if detector.inference_resolution > MAX_INFERENCE_RESOLUTION {
        return Err(validation_error(format!(
            "detector.inference_resolution must be at most {MAX_INFERENCE_RESOLUTION}, got {}",
            detector.inference_resolution
        )));
    }

    if detector.max_detections == 0 {
        return Err(validation_error(
            "detector.max_detections must be at least 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_server(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        return Err(validation_error("server.port must not be 0".to_string()));
    }
    if config.server.host.trim().is_empty() {
        return Err(validation_error("server.host must not be empty".to_string()));
    }
    Ok(())
}

fn validate_defaults(config: &Config) -> Result<()> {
    if let Some(ref city) = config.defaults.city
        && city.parse::<City>().is_err()
    {
        return Err(Error::InvalidCity {
            city: city.clone(),
            supported: City::ALL.map(City::as_str).join(", "),
        });
    }

    if config.defaults.formats.is_empty() {
        return Err(validation_error(
            "defaults.formats must name at least one format".to_string(),
        ));
    }

    Ok(())
}

/// Resolve and check the model and labels files of a detector configuration.
pub fn detector_files(detector: &DetectorConfig) -> Result<(PathBuf, PathBuf)> {
    let model = detector.model.clone().ok_or(Error::DetectorUnavailable)?;
    if !model.exists() {
        return Err(Error::ModelFileNotFound { path: model });
    }

    let labels = detector
        .labels
        .clone()
        .ok_or_else(|| validation_error("detector.labels must be set when a model is configured".to_string()))?;
    if !labels.exists() {
        return Err(Error::LabelsFileNotFound { path: labels });
    }

    Ok((model, labels))
}
