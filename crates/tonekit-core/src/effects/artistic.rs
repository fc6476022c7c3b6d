//! Sepia toning, oil-paint style smoothing and posterization.

use super::EffectParams;
use crate::buffer::ImageBuffer;
use crate::color::to_u8;
use crate::filter::bilateral;

/// Bilateral color and space sigma.
const BILATERAL_SIGMA: f32 = 80.0;

pub fn apply(image: &ImageBuffer, params: &EffectParams) -> ImageBuffer {
    let mut out = image.to_rgb();
    if params.brightness > 1.0 {
        out = sepia(&out, params.brightness);
    }
    if params.contrast > 1.0 {
        out = bilateral(&out, smoothing_diameter(params.contrast), BILATERAL_SIGMA, BILATERAL_SIGMA);
    }
    if params.saturation != 1.0 {
        out = posterize(&out, posterize_levels(params.saturation));
    }
    out
}

/// Sepia color matrix for strength `b`.
///
/// Diagonal terms fall from 1.0 toward the classic sepia weights as `b`
/// goes from 1 to 2, while the cross terms fade out.
pub fn sepia_matrix(b: f32) -> [[f32; 3]; 3] {
    [
        [0.393 + 0.607 * (2.0 - b), 0.769 - 0.769 * (b - 1.0), 0.189 - 0.189 * (b - 1.0)],
        [0.349 - 0.349 * (b - 1.0), 0.686 + 0.314 * (2.0 - b), 0.168 - 0.168 * (b - 1.0)],
        [0.272 - 0.272 * (b - 1.0), 0.534 - 0.534 * (b - 1.0), 0.131 + 0.869 * (2.0 - b)],
    ]
}

/// Multiply every pixel by the sepia matrix.
pub fn sepia(image: &ImageBuffer, strength: f32) -> ImageBuffer {
    let rgb = image.to_rgb();
    let m = sepia_matrix(strength);
    let mut data = Vec::with_capacity(rgb.data().len());
    for px in rgb.data().chunks_exact(3) {
        let (r, g, b) = (px[0] as f32, px[1] as f32, px[2] as f32);
        for row in &m {
            data.push(to_u8(row[0] * r + row[1] * g + row[2] * b));
        }
    }
    rgb.with_data(data)
}

/// Odd bilateral diameter derived from the contrast slider.
pub fn smoothing_diameter(contrast: f32) -> usize {
    let d = (contrast * 5.0) as usize;
    if d % 2 == 0 {
        d + 1
    } else {
        d
    }
}

/// Number of posterization levels for the saturation slider.
pub fn posterize_levels(saturation: f32) -> u32 {
    ((8.0 * saturation).round() as u32).max(2)
}

/// Quantize each channel down to `levels` evenly spaced values.
pub fn posterize(image: &ImageBuffer, levels: u32) -> ImageBuffer {
    let rgb = image.to_rgb();
    let step = 255.0 / (levels.max(2) - 1) as f32;
    let data = rgb
        .data()
        .iter()
        .map(|&v| ((v as f32 / step).trunc() * step).trunc().min(255.0) as u8)
        .collect();
    rgb.with_data(data)
}
