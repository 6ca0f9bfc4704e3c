//! Image decoding and letterboxing.

use crate::constants::detector::LETTERBOX_FILL;
use crate::error::{Error, Result};
use image::{Rgb, RgbImage, imageops};

/// Geometry of a letterboxed image, used to map boxes back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    /// Scale applied to the source image.
    pub scale: f32,
    /// Horizontal padding on the left, in model pixels.
    pub pad_x: f32,
    /// Vertical padding on top, in model pixels.
    pub pad_y: f32,
    /// Source image width.
    pub width: u32,
    /// Source image height.
    pub height: u32,
}

impl Letterbox {
    /// Compute the letterbox geometry for a `width` x `height` image on a
    /// `size` x `size` canvas.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn fit(width: u32, height: u32, size: u32) -> Self {
        let scale = (size as f32 / width as f32).min(size as f32 / height as f32);
        let (new_w, new_h) = scaled_dims(width, height, scale);
        Self {
            scale,
            pad_x: (size.saturating_sub(new_w) / 2) as f32,
            pad_y: (size.saturating_sub(new_h) / 2) as f32,
            width,
            height,
        }
    }

    /// Map a box from model pixels to normalized source coordinates.
    #[allow(clippy::cast_precision_loss)]
    pub fn to_normalized(&self, [x1, y1, x2, y2]: [f32; 4]) -> [f32; 4] {
        let w = self.width as f32;
        let h = self.height as f32;
        let unmap_x = |x: f32| ((x - self.pad_x) / self.scale).clamp(0.0, w) / w;
        let unmap_y = |y: f32| ((y - self.pad_y) / self.scale).clamp(0.0, h) / h;
        [unmap_x(x1), unmap_y(y1), unmap_x(x2), unmap_y(y2)]
    }
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scaled_dims(width: u32, height: u32, scale: f32) -> (u32, u32) {
    let new_w = ((width as f32 * scale).round() as u32).max(1);
    let new_h = ((height as f32 * scale).round() as u32).max(1);
    (new_w, new_h)
}

/// Decode an encoded image into RGB pixels.
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage> {
    image::load_from_memory(bytes)
        .map(|img| img.to_rgb8())
        .map_err(|e| Error::ImageDecode {
            reason: e.to_string(),
        })
}

/// Letterbox `image` onto a square canvas and return the NCHW tensor data
/// scaled to `0.0..=1.0`.
pub fn letterbox(image: &RgbImage, size: u32) -> (Vec<f32>, Letterbox) {
    let geometry = Letterbox::fit(image.width(), image.height(), size);
    let (new_w, new_h) = scaled_dims(image.width(), image.height(), geometry.scale);

    let resized = imageops::resize(image, new_w, new_h, imageops::FilterType::Triangle);
    let mut canvas = RgbImage::from_pixel(size, size, Rgb([LETTERBOX_FILL; 3]));
    imageops::overlay(
        &mut canvas,
        &resized,
        i64::from(size.saturating_sub(new_w) / 2),
        i64::from(size.saturating_sub(new_h) / 2),
    );

    let side = size as usize;
    let plane = side * side;
    let mut data = vec![0.0f32; 3 * plane];
    for (x, y, pixel) in canvas.enumerate_pixels() {
        let offset = y as usize * side + x as usize;
        for (c, value) in pixel.0.iter().enumerate() {
            data[c * plane + offset] = f32::from(*value) / 255.0;
        }
    }

    (data, geometry)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_wide_image_pads_vertically() {
        let geometry = Letterbox::fit(640, 320, 320);
        assert_eq!(geometry.scale, 0.5);
        assert_eq!(geometry.pad_x, 0.0);
        assert_eq!(geometry.pad_y, 80.0);
    }

    #[test]
    fn test_to_normalized_round_trips_corners() {
        let geometry = Letterbox::fit(640, 320, 320);
        // Full image occupies model rows 80..240.
        let bbox = geometry.to_normalized([0.0, 80.0, 320.0, 240.0]);
        assert_eq!(bbox, [0.0, 0.0, 1.0, 1.0]);

        let bbox = geometry.to_normalized([80.0, 120.0, 160.0, 160.0]);
        assert!((bbox[0] - 0.25).abs() < 1e-6);
        assert!((bbox[1] - 0.25).abs() < 1e-6);
        assert!((bbox[2] - 0.5).abs() < 1e-6);
        assert!((bbox[3] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_to_normalized_clamps_padding() {
        let geometry = Letterbox::fit(640, 320, 320);
        let bbox = geometry.to_normalized([-10.0, 0.0, 400.0, 300.0]);
        assert_eq!(bbox, [0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_letterbox_fills_padding() {
        let image = RgbImage::from_pixel(64, 32, Rgb([255, 0, 0]));
        let (data, geometry) = letterbox(&image, 64);
        assert_eq!(data.len(), 3 * 64 * 64);
        assert_eq!(geometry.pad_y, 16.0);

        // Top-left pixel is padding.
        let fill = f32::from(LETTERBOX_FILL) / 255.0;
        assert!((data[0] - fill).abs() < 1e-6);
        // Centre pixel is image: red channel full, green empty.
        let centre = 32 * 64 + 32;
        assert!((data[centre] - 1.0).abs() < 1e-6);
        assert!(data[64 * 64 + centre].abs() < 1e-6);
    }

    #[test]
    fn test_decode_image_rejects_garbage() {
        let result = decode_image(b"not an image");
        assert!(matches!(result, Err(Error::ImageDecode { .. })));
    }
}
