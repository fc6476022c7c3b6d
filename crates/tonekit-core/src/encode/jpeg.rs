//! JPEG encoding for export.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::{check_dimensions, EncodeError};
use crate::buffer::ImageBuffer;

/// Quality used by [`super::save`].
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Encode an image to JPEG bytes.
///
/// `quality` is clamped to `1..=100`.
///
/// # Quality Guidelines
///
/// * 90-100: High quality, suitable for archival or further editing
/// * 60-80: Medium quality, acceptable for web
/// * Below 60: Visible artifacts
pub fn encode_jpeg(image: &ImageBuffer, quality: u8) -> Result<Vec<u8>, EncodeError> {
    check_dimensions(image)?;
    let rgb = image.to_rgb();
    let quality = quality.clamp(1, 100);

    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .write_image(rgb.data(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}
