//! Multiplicative tone enhancers applied in order brightness, contrast, color.
//!
//! Each enhancer blends the image with a degenerate version of itself:
//! `out = degenerate + factor * (image - degenerate)`.
//!
//! | Enhancer | Degenerate image |
//! |---|---|
//! | brightness | black |
//! | contrast | flat gray at the rounded mean luma |
//! | color | per-pixel luma gray |
//!
//! A factor of exactly 1.0 skips its enhancer, so neutral parameters return
//! the input unchanged.

use super::EffectParams;
use crate::buffer::ImageBuffer;
use crate::color::to_u8;
use crate::luma::luma_u8;

pub fn apply(image: &ImageBuffer, params: &EffectParams) -> ImageBuffer {
    let mut out = image.to_rgb();
    if params.brightness != 1.0 {
        out = enhance_brightness(&out, params.brightness);
    }
    if params.contrast != 1.0 {
        out = enhance_contrast(&out, params.contrast);
    }
    if params.saturation != 1.0 {
        out = enhance_color(&out, params.saturation);
    }
    out
}

#[inline]
fn mix(degenerate: f32, value: u8, factor: f32) -> u8 {
    to_u8(degenerate + factor * (value as f32 - degenerate))
}

/// Scale toward black.
pub fn enhance_brightness(image: &ImageBuffer, factor: f32) -> ImageBuffer {
    let rgb = image.to_rgb();
    let data = rgb.data().iter().map(|&v| mix(0.0, v, factor)).collect();
    rgb.with_data(data)
}

/// Scale around the mean gray level.
pub fn enhance_contrast(image: &ImageBuffer, factor: f32) -> ImageBuffer {
    let rgb = image.to_rgb();
    let mean = mean_luma(&rgb);
    let data = rgb.data().iter().map(|&v| mix(mean, v, factor)).collect();
    rgb.with_data(data)
}

/// Scale chroma around each pixel's luma.
pub fn enhance_color(image: &ImageBuffer, factor: f32) -> ImageBuffer {
    let rgb = image.to_rgb();
    let mut data = Vec::with_capacity(rgb.data().len());
    for px in rgb.data().chunks_exact(3) {
        let gray = luma_u8(px[0], px[1], px[2]) as f32;
        data.extend(px.iter().map(|&v| mix(gray, v, factor)));
    }
    rgb.with_data(data)
}

/// Rounded mean of the per-pixel 8-bit luma.
fn mean_luma(image: &ImageBuffer) -> f32 {
    let count = image.pixel_count();
    if count == 0 {
        return 0.0;
    }
    let sum: u64 = image
        .data()
        .chunks_exact(3)
        .map(|px| luma_u8(px[0], px[1], px[2]) as u64)
        .sum();
    (sum as f64 / count as f64).round() as f32
}
