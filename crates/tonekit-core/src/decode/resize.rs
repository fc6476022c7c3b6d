//! Image resizing for display previews and thumbnails.
//!
//! All functions return new buffers without modifying the input.

use super::{DecodeError, FilterType};
use crate::buffer::ImageBuffer;

/// Resize an image to exact dimensions.
///
/// Gray input comes back as RGB.
///
/// # Errors
///
/// Returns `DecodeError::InvalidDimensions` if either target edge is zero.
pub fn resize(
    image: &ImageBuffer,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<ImageBuffer, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidDimensions { width, height });
    }

    if image.width() == width && image.height() == height {
        return Ok(image.to_rgb());
    }

    let rgb_image = image
        .to_rgb_image()
        .ok_or_else(|| DecodeError::CorruptedFile("Failed to create RgbImage".to_string()))?;

    let resized = image::imageops::resize(&rgb_image, width, height, filter.to_image_filter());

    Ok(ImageBuffer::from_rgb_image(resized))
}

/// Scale an image down to fit a `max_width x max_height` box, preserving
/// aspect ratio.
///
/// Images that already fit are returned unchanged; this never upscales.
pub fn resize_to_fit(
    image: &ImageBuffer,
    max_width: u32,
    max_height: u32,
    filter: FilterType,
) -> Result<ImageBuffer, DecodeError> {
    if max_width == 0 || max_height == 0 {
        return Err(DecodeError::InvalidDimensions {
            width: max_width,
            height: max_height,
        });
    }

    let (src_width, src_height) = (image.width(), image.height());
    if src_width <= max_width && src_height <= max_height {
        return Ok(image.to_rgb());
    }

    let (new_width, new_height) = calculate_fit_dimensions(src_width, src_height, max_width, max_height);
    resize(image, new_width, new_height, filter)
}

/// Generate a thumbnail that fits within a `size x size` square.
///
/// Uses bilinear interpolation for speed.
pub fn generate_thumbnail(image: &ImageBuffer, size: u32) -> Result<ImageBuffer, DecodeError> {
    resize_to_fit(image, size, size, FilterType::Bilinear)
}

/// Largest dimensions within the box that keep the aspect ratio.
fn calculate_fit_dimensions(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }

    let scale = (max_width as f64 / width as f64).min(max_height as f64 / height as f64);
    let new_width = ((width as f64 * scale).round() as u32).clamp(1, max_width);
    let new_height = ((height as f64 * scale).round() as u32).clamp(1, max_height);
    (new_width, new_height)
}
