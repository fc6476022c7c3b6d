//! Per-channel scalar operations on RGB buffers.
//!
//! Every operation promotes its input to RGB, leaves the input untouched and
//! returns a new buffer whose values are rounded and clamped to `[0, 255]`.

use tracing::warn;

use crate::buffer::ImageBuffer;
use crate::color::{rgb_to_yuv, to_u8, yuv_to_rgb};
use crate::error::BufferError;
use crate::histogram::{channel_histogram, equalization_table};

/// Identity lookup table, `[0, 1, ..., 255]`.
pub const IDENTITY_LUT: [u8; 256] = identity_table();

const fn identity_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = i as u8;
        i += 1;
    }
    table
}

/// Multiply one channel by `factor`, clamping to `[0, 255]`.
///
/// # Arguments
/// * `image` - Source image (gray is promoted to RGB)
/// * `channel` - Channel index: 0 = red, 1 = green, 2 = blue
/// * `factor` - Multiplier; negative or NaN factors yield 0
pub fn scale_channel(
    image: &ImageBuffer,
    channel: usize,
    factor: f32,
) -> Result<ImageBuffer, BufferError> {
    if channel >= 3 {
        return Err(BufferError::ChannelOutOfRange { index: channel, channels: 3 });
    }
    let rgb = image.to_rgb();
    let mut data = rgb.data().to_vec();
    for px in data.chunks_exact_mut(3) {
        px[channel] = to_u8(px[channel] as f32 * factor);
    }
    Ok(rgb.with_data(data))
}

/// Scale all three channels by independent factors.
pub fn scale_channels(image: &ImageBuffer, factors: [f32; 3]) -> ImageBuffer {
    let rgb = image.to_rgb();
    let mut data = rgb.data().to_vec();
    for px in data.chunks_exact_mut(3) {
        for (value, factor) in px.iter_mut().zip(factors) {
            *value = to_u8(*value as f32 * factor);
        }
    }
    rgb.with_data(data)
}

/// Gamma correction: `out = 255 * (in / 255)^(1 / gamma)`.
///
/// No-op when `gamma == 1.0`. Non-finite or non-positive gammas also leave
/// the image unchanged.
pub fn gamma_correct(image: &ImageBuffer, gamma: f32) -> ImageBuffer {
    let rgb = image.to_rgb();
    if gamma == 1.0 {
        return rgb;
    }
    if !gamma.is_finite() || gamma <= 0.0 {
        warn!(gamma, "Ignoring invalid gamma");
        return rgb;
    }
    apply_lut(&rgb, &gamma_table(gamma))
}

/// Lookup table for [`gamma_correct`].
pub fn gamma_table(gamma: f32) -> [u8; 256] {
    let exponent = 1.0 / gamma as f64;
    let mut table = [0u8; 256];
    for (i, entry) in table.iter_mut().enumerate() {
        let v = 255.0 * (i as f64 / 255.0).powf(exponent);
        *entry = v.round().clamp(0.0, 255.0) as u8;
    }
    table
}

/// Remap every channel value through `lut`.
pub fn apply_lut(image: &ImageBuffer, lut: &[u8; 256]) -> ImageBuffer {
    let rgb = image.to_rgb();
    let data = rgb.data().iter().map(|&v| lut[v as usize]).collect();
    rgb.with_data(data)
}

/// Equalize the luma histogram only, preserving chroma.
///
/// The image goes through YUV; `Y` is rounded, remapped through the
/// equalization table and converted back. Constant images are returned as-is.
pub fn equalize_luma(image: &ImageBuffer) -> ImageBuffer {
    let rgb = image.to_rgb();
    let mut yuv = rgb_to_yuv(&rgb);

    let mut bins = [0u32; 256];
    for px in &yuv.pixels {
        bins[to_u8(px.y) as usize] += 1;
    }
    let Some(table) = equalization_table(&bins) else {
        return rgb;
    };

    for px in &mut yuv.pixels {
        px.y = table[to_u8(px.y) as usize] as f32;
    }
    yuv_to_rgb(&yuv)
}

/// Equalize each of the three channels independently.
pub fn equalize_channels(image: &ImageBuffer) -> ImageBuffer {
    let rgb = image.to_rgb();
    let mut data = rgb.data().to_vec();
    for channel in 0..3 {
        let bins = channel_histogram(rgb.data(), 3, channel);
        if let Some(table) = equalization_table(&bins) {
            for px in data.chunks_exact_mut(3) {
                px[channel] = table[px[channel] as usize];
            }
        }
    }
    rgb.with_data(data)
}

/// Linear blend `a * (1 - alpha) + b * alpha`.
///
/// `alpha` is clamped to `[0, 1]`. Both images must share a size.
pub fn blend(a: &ImageBuffer, b: &ImageBuffer, alpha: f32) -> Result<ImageBuffer, BufferError> {
    if a.width() != b.width() || a.height() != b.height() {
        return Err(BufferError::DimensionMismatch {
            left_width: a.width(),
            left_height: a.height(),
            right_width: b.width(),
            right_height: b.height(),
        });
    }
    let alpha = if alpha.is_nan() { 0.0 } else { alpha.clamp(0.0, 1.0) };
    let a = a.to_rgb();
    let b = b.to_rgb();
    let data = a
        .data()
        .iter()
        .zip(b.data())
        .map(|(&x, &y)| to_u8(x as f32 * (1.0 - alpha) + y as f32 * alpha))
        .collect();
    Ok(a.with_data(data))
}

/// Grayscale conversion with BT.601 luma, replicated back into RGB.
pub fn to_gray(image: &ImageBuffer) -> ImageBuffer {
    image.to_gray().to_rgb()
}
