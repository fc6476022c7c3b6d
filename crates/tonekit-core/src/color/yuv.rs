//! RGB <-> YUV conversion (BT.601 analog form).
//!
//! `Y` is the BT.601 luma, `U = 0.492 (B - Y) + 128` and
//! `V = 0.877 (R - Y) + 128`. The inverse solves those equations exactly,
//! so only the final rounding to 8 bits loses information.

use super::to_u8;
use crate::buffer::ImageBuffer;
use crate::luma::{luma, LUMA_B, LUMA_G, LUMA_R};

const U_SCALE: f32 = 0.492;
const V_SCALE: f32 = 0.877;
const CHROMA_OFFSET: f32 = 128.0;

/// A single YUV triple.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Yuv {
    pub y: f32,
    pub u: f32,
    pub v: f32,
}

impl Yuv {
    /// Convert one 8-bit RGB pixel.
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        let (r, g, b) = (r as f32, g as f32, b as f32);
        let y = luma(r, g, b);
        Self {
            y,
            u: U_SCALE * (b - y) + CHROMA_OFFSET,
            v: V_SCALE * (r - y) + CHROMA_OFFSET,
        }
    }

    /// Convert back to an 8-bit RGB pixel, rounding and clamping.
    pub fn to_rgb(self) -> [u8; 3] {
        let b = self.y + (self.u - CHROMA_OFFSET) / U_SCALE;
        let r = self.y + (self.v - CHROMA_OFFSET) / V_SCALE;
        let g = (self.y - LUMA_R * r - LUMA_B * b) / LUMA_G;
        [to_u8(r), to_u8(g), to_u8(b)]
    }
}

/// An image stored as YUV triples.
#[derive(Debug, Clone, PartialEq)]
pub struct YuvImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Yuv>,
}

/// Convert an image to YUV. Gray input is promoted to RGB first.
pub fn rgb_to_yuv(image: &ImageBuffer) -> YuvImage {
    let rgb = image.to_rgb();
    let pixels = rgb
        .data()
        .chunks_exact(3)
        .map(|px| Yuv::from_rgb(px[0], px[1], px[2]))
        .collect();
    YuvImage {
        width: rgb.width(),
        height: rgb.height(),
        pixels,
    }
}

/// Convert a YUV image back to an RGB buffer.
pub fn yuv_to_rgb(image: &YuvImage) -> ImageBuffer {
    let mut data = Vec::with_capacity(image.pixels.len() * 3);
    for px in &image.pixels {
        data.extend_from_slice(&px.to_rgb());
    }
    ImageBuffer::rgb_unchecked(image.width, image.height, data)
}
