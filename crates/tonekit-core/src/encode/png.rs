//! Lossless PNG encoding.

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::{check_dimensions, EncodeError};
use crate::buffer::ImageBuffer;

/// Encode an image to PNG bytes.
pub fn encode_png(image: &ImageBuffer) -> Result<Vec<u8>, EncodeError> {
    check_dimensions(image)?;
    let rgb = image.to_rgb();

    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer)
        .write_image(rgb.data(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer)
}
