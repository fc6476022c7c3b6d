//! Per-channel equalization, gamma and unsharp masking.

use super::EffectParams;
use crate::buffer::ImageBuffer;
use crate::color::to_u8;
use crate::filter::{gaussian_blur_f32, gaussian_size_for_sigma};
use crate::ops::{equalize_channels, gamma_correct};

/// Brightness above which each channel is histogram-equalized.
const EQUALIZE_THRESHOLD: f32 = 1.2;

/// Blur sigma of the unsharp mask.
const UNSHARP_SIGMA: f32 = 2.0;

pub fn apply(image: &ImageBuffer, params: &EffectParams) -> ImageBuffer {
    let mut out = image.to_rgb();
    if params.brightness > EQUALIZE_THRESHOLD {
        out = equalize_channels(&out);
    }
    if params.contrast != 1.0 {
        // Exponent 1 / contrast: higher contrast lifts midtones.
        out = gamma_correct(&out, params.contrast);
    }
    if params.saturation > 1.0 {
        out = unsharp_mask(&out, params.saturation);
    }
    out
}

/// `out = (1 + amount) * in - amount * blur(in)`.
pub fn unsharp_mask(image: &ImageBuffer, amount: f32) -> ImageBuffer {
    let rgb = image.to_rgb();
    let blurred = gaussian_blur_f32(&rgb, gaussian_size_for_sigma(UNSHARP_SIGMA), UNSHARP_SIGMA);
    let data = rgb
        .data()
        .iter()
        .zip(blurred)
        .map(|(&v, b)| to_u8((1.0 + amount) * v as f32 - amount * b))
        .collect();
    rgb.with_data(data)
}
