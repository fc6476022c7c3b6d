//! Image loading for the transformation engine.
//!
//! This module provides functionality for:
//! - Decoding JPEG, PNG, BMP, TIFF and GIF into [`ImageBuffer`](crate::ImageBuffer)
//! - Honoring EXIF orientation on JPEG input
//! - Downscaling for display previews and thumbnails
//!
//! Every decoded buffer is 8-bit RGB; alpha and 16-bit samples are
//! flattened by the codec.
//!
//! # Examples
//!
//! ```ignore
//! use tonekit_core::decode::{decode_file, resize_to_fit, FilterType};
//!
//! let image = decode_file("photo.jpg")?;
//! let preview = resize_to_fit(&image, 1280, 720, FilterType::Bilinear)?;
//! ```

mod load;
mod orientation;
mod resize;
mod types;

pub use load::{
    decode_bytes, decode_bytes_no_orientation, decode_file, is_supported_path,
    SUPPORTED_EXTENSIONS,
};
pub use orientation::{apply_orientation, get_orientation};
pub use resize::{generate_thumbnail, resize, resize_to_fit};
pub use types::{DecodeError, FilterType, Orientation};
