//! Blur or sharpen, emboss and edge enhancement.

use super::EffectParams;
use crate::buffer::ImageBuffer;
use crate::color::to_u8;
use crate::filter::{convolve3, gaussian_blur, Kernel3};

/// Contrast above which the emboss kernel runs.
const EMBOSS_THRESHOLD: f32 = 1.5;

/// Saturation above which edges are enhanced.
const EDGE_ENHANCE_THRESHOLD: f32 = 1.5;

pub fn apply(image: &ImageBuffer, params: &EffectParams) -> ImageBuffer {
    let mut out = image.to_rgb();
    if params.brightness < 1.0 {
        out = gaussian_blur(&out, (1.0 - params.brightness) * 5.0);
    } else if params.brightness > 1.0 {
        out = sharpen(&out, params.brightness);
    }
    if params.contrast > EMBOSS_THRESHOLD {
        out = convolve3(&out, &Kernel3::EMBOSS);
    }
    if params.saturation > EDGE_ENHANCE_THRESHOLD {
        out = convolve3(&out, &Kernel3::EDGE_ENHANCE_MORE);
    }
    out
}

/// Blend away from a smoothed copy: `smooth + factor * (image - smooth)`.
pub fn sharpen(image: &ImageBuffer, factor: f32) -> ImageBuffer {
    let rgb = image.to_rgb();
    let smooth = convolve3(&rgb, &Kernel3::SMOOTH);
    let data = rgb
        .data()
        .iter()
        .zip(smooth.data())
        .map(|(&v, &s)| to_u8(s as f32 + factor * (v as f32 - s as f32)))
        .collect();
    rgb.with_data(data)
}
