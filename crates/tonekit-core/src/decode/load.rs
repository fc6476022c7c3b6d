//! Loading images from bytes and files.

use std::path::Path;

use image::ImageFormat;
use tracing::debug;

use super::orientation::{apply_orientation, get_orientation};
use super::DecodeError;
use crate::buffer::ImageBuffer;

/// File extensions accepted by [`decode_file`], lowercase.
pub const SUPPORTED_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "bmp", "tiff", "tif", "gif"];

const SUPPORTED_FORMATS: [ImageFormat; 5] = [
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Bmp,
    ImageFormat::Tiff,
    ImageFormat::Gif,
];

/// True if `path` has an extension [`decode_file`] accepts.
pub fn is_supported_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Decode encoded bytes into an RGB buffer.
///
/// The format is sniffed from the content. JPEG input is rotated according
/// to its EXIF orientation tag.
pub fn decode_bytes(bytes: &[u8]) -> Result<ImageBuffer, DecodeError> {
    decode_inner(bytes, true)
}

/// Decode without applying EXIF orientation.
pub fn decode_bytes_no_orientation(bytes: &[u8]) -> Result<ImageBuffer, DecodeError> {
    decode_inner(bytes, false)
}

/// Read and decode a file.
///
/// The extension must be one of [`SUPPORTED_EXTENSIONS`].
pub fn decode_file(path: impl AsRef<Path>) -> Result<ImageBuffer, DecodeError> {
    let path = path.as_ref();
    if !is_supported_path(path) {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_string();
        return Err(DecodeError::UnsupportedExtension(ext));
    }
    let bytes = std::fs::read(path).map_err(|e| DecodeError::IoError(e.to_string()))?;
    debug!(path = %path.display(), bytes = bytes.len(), "Loading image");
    decode_bytes(&bytes)
}

fn decode_inner(bytes: &[u8], orient: bool) -> Result<ImageBuffer, DecodeError> {
    let format = image::guess_format(bytes).map_err(|_| DecodeError::InvalidFormat)?;
    if !SUPPORTED_FORMATS.contains(&format) {
        return Err(DecodeError::InvalidFormat);
    }

    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?
        .into_rgb8();

    let img = if orient && format == ImageFormat::Jpeg {
        apply_orientation(img, get_orientation(bytes))
    } else {
        img
    };

    debug!(?format, width = img.width(), height = img.height(), "Decoded image");
    Ok(ImageBuffer::from_rgb_image(img))
}
