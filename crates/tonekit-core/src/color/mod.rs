//! Color-space conversions between RGB buffers and floating-point planes.
//!
//! HSV and YUV images keep one `f32` triple per pixel so a forward and
//! inverse conversion only loses precision at the final rounding to 8 bits.
//!
//! - [`hsv`] - hue in `[0, 180)` (degrees / 2), saturation and value in `[0, 255]`
//! - [`yuv`] - BT.601 analog YUV, chroma centered on 128

pub mod hsv;
pub mod yuv;

pub use hsv::{hsv_to_rgb, rgb_to_hsv, Hsv, HsvImage};
pub use yuv::{rgb_to_yuv, yuv_to_rgb, Yuv, YuvImage};

/// Round and clamp a float channel value to an 8-bit level.
#[inline]
pub(crate) fn to_u8(value: f32) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}
