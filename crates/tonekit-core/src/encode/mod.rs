//! Image encoding for export.
//!
//! Buffers are written as 8-bit RGB. Gray buffers are promoted first.
//!
//! - [`encode_png`] - lossless
//! - [`encode_jpeg`] - quality 1-100
//! - [`save`] - picks the format from the file extension

mod jpeg;
mod png;

use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::buffer::ImageBuffer;

pub use jpeg::{encode_jpeg, DEFAULT_JPEG_QUALITY};
pub use png::encode_png;

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The path's extension names no writable format
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// The codec rejected the data
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    /// Writing the file failed
    #[error("I/O error: {0}")]
    IoError(String),
}

/// Writable file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg { quality: u8 },
}

impl OutputFormat {
    /// Format for a path's extension, case-insensitive.
    ///
    /// JPEG paths use `quality`.
    pub fn from_path(path: &Path, quality: u8) -> Result<Self, EncodeError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "png" => Ok(OutputFormat::Png),
            "jpg" | "jpeg" => Ok(OutputFormat::Jpeg { quality }),
            _ => Err(EncodeError::UnsupportedFormat(ext)),
        }
    }
}

/// Encode to bytes in the given format.
pub fn encode(image: &ImageBuffer, format: OutputFormat) -> Result<Vec<u8>, EncodeError> {
    match format {
        OutputFormat::Png => encode_png(image),
        OutputFormat::Jpeg { quality } => encode_jpeg(image, quality),
    }
}

/// Encode and write to `path`, choosing PNG or JPEG by extension.
///
/// JPEG output uses [`DEFAULT_JPEG_QUALITY`].
pub fn save(image: &ImageBuffer, path: impl AsRef<Path>) -> Result<(), EncodeError> {
    let path = path.as_ref();
    let format = OutputFormat::from_path(path, DEFAULT_JPEG_QUALITY)?;
    let bytes = encode(image, format)?;
    std::fs::write(path, &bytes).map_err(|e| EncodeError::IoError(e.to_string()))?;
    debug!(path = %path.display(), bytes = bytes.len(), "Saved image");
    Ok(())
}

fn check_dimensions(image: &ImageBuffer) -> Result<(), EncodeError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(EncodeError::InvalidDimensions {
            width: image.width(),
            height: image.height(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(OutputFormat::from_path(Path::new("a.png"), 90).unwrap(), OutputFormat::Png);
        assert_eq!(
            OutputFormat::from_path(Path::new("b.JPG"), 70).unwrap(),
            OutputFormat::Jpeg { quality: 70 }
        );
        assert!(matches!(
            OutputFormat::from_path(Path::new("c.gif"), 90),
            Err(EncodeError::UnsupportedFormat(ext)) if ext == "gif"
        ));
        assert!(OutputFormat::from_path(Path::new("noext"), 90).is_err());
    }

    #[test]
    fn test_save_round_trip() {
        let img = ImageBuffer::from_fn(6, 4, |x, y| [(x * 40) as u8, (y * 60) as u8, 10]);
        let path = std::env::temp_dir().join(format!("tonekit-save-{}.png", std::process::id()));
        save(&img, &path).unwrap();
        let loaded = crate::decode::decode_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, img);
    }

    #[test]
    fn test_save_rejects_unknown_extension() {
        let img = ImageBuffer::filled(1, 1, [0, 0, 0]);
        assert!(matches!(
            save(&img, "out.webp"),
            Err(EncodeError::UnsupportedFormat(_))
        ));
    }
}
