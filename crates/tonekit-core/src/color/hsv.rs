//! RGB <-> HSV conversion.
//!
//! Uses the 8-bit hue convention: `h` spans `[0, 180)` so that one unit is
//! two degrees, while `s` and `v` span `[0, 255]`.

use super::to_u8;
use crate::buffer::ImageBuffer;

/// Full hue turn in half-degree units.
pub const HUE_RANGE: f32 = 180.0;

/// A single HSV triple.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hsv {
    /// Hue, `[0, 180)`.
    pub h: f32,
    /// Saturation, `[0, 255]`.
    pub s: f32,
    /// Value, `[0, 255]`.
    pub v: f32,
}

impl Hsv {
    /// Convert one 8-bit RGB pixel.
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        let (r, g, b) = (r as f32, g as f32, b as f32);
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let v = max;
        let s = if max > 0.0 { delta / max * 255.0 } else { 0.0 };

        let degrees = if delta == 0.0 {
            0.0
        } else if max == r {
            60.0 * (g - b) / delta
        } else if max == g {
            120.0 + 60.0 * (b - r) / delta
        } else {
            240.0 + 60.0 * (r - g) / delta
        };
        let degrees = if degrees < 0.0 { degrees + 360.0 } else { degrees };

        Self {
            h: degrees / 2.0,
            s,
            v,
        }
    }

    /// Convert back to an 8-bit RGB pixel, rounding and clamping.
    pub fn to_rgb(self) -> [u8; 3] {
        let v = self.v.clamp(0.0, 255.0);
        let s = (self.s / 255.0).clamp(0.0, 1.0);
        if s == 0.0 {
            let level = to_u8(v);
            return [level, level, level];
        }

        let h = self.h.rem_euclid(HUE_RANGE) / 30.0; // sector 0..6
        let sector = h.floor();
        let f = h - sector;
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));

        let (r, g, b) = match sector as i32 % 6 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        [to_u8(r), to_u8(g), to_u8(b)]
    }
}

/// An image stored as HSV triples.
#[derive(Debug, Clone, PartialEq)]
pub struct HsvImage {
    pub width: u32,
    pub height: u32,
    /// Row-major HSV pixels.
    pub pixels: Vec<Hsv>,
}

/// Convert an image to HSV. Gray input is promoted to RGB first.
pub fn rgb_to_hsv(image: &ImageBuffer) -> HsvImage {
    let rgb = image.to_rgb();
    let pixels = rgb
        .data()
        .chunks_exact(3)
        .map(|px| Hsv::from_rgb(px[0], px[1], px[2]))
        .collect();
    HsvImage {
        width: rgb.width(),
        height: rgb.height(),
        pixels,
    }
}

/// Convert an HSV image back to an RGB buffer.
pub fn hsv_to_rgb(image: &HsvImage) -> ImageBuffer {
    let mut data = Vec::with_capacity(image.pixels.len() * 3);
    for px in &image.pixels {
        data.extend_from_slice(&px.to_rgb());
    }
    ImageBuffer::rgb_unchecked(image.width, image.height, data)
}
