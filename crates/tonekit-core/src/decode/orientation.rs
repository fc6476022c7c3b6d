//! EXIF orientation lookup and correction.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::imageops;
use image::RgbImage;
use tracing::trace;

use super::Orientation;

/// Read the EXIF orientation tag from encoded bytes.
///
/// Missing or unreadable EXIF data means [`Orientation::Normal`].
pub fn get_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    let Ok(exif) = Reader::new().read_from_container(&mut cursor) else {
        return Orientation::Normal;
    };
    exif.get_field(Tag::Orientation, In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
        .map(Orientation::from)
        .unwrap_or_default()
}

/// Rotate and flip pixels so the image displays upright.
pub fn apply_orientation(img: RgbImage, orientation: Orientation) -> RgbImage {
    trace!(?orientation, "Applying orientation");
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => imageops::flip_horizontal(&img),
        Orientation::Rotate180 => imageops::rotate180(&img),
        Orientation::FlipVertical => imageops::flip_vertical(&img),
        Orientation::Transpose => imageops::flip_horizontal(&imageops::rotate90(&img)),
        Orientation::Rotate90CW => imageops::rotate90(&img),
        Orientation::Transverse => imageops::flip_horizontal(&imageops::rotate270(&img)),
        Orientation::Rotate270CW => imageops::rotate270(&img),
    }
}
