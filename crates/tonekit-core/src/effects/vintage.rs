//! Warm channel balance followed by a radial vignette.

use super::EffectParams;
use crate::buffer::ImageBuffer;
use crate::color::to_u8;
use crate::ops::scale_channels;

/// Floor of the vignette attenuation.
pub const VIGNETTE_FLOOR: f32 = 0.3;

pub fn apply(image: &ImageBuffer, params: &EffectParams) -> ImageBuffer {
    let warmed = scale_channels(image, channel_factors(params));
    let strength = vignette_strength(params.saturation);
    let mask = vignette_mask(warmed.width(), warmed.height(), strength);
    let data = warmed
        .data()
        .chunks_exact(3)
        .zip(&mask)
        .flat_map(|(px, &m)| px.iter().map(move |&v| to_u8(v as f32 * m)))
        .collect();
    warmed.with_data(data)
}

/// Red, green and blue gains.
pub fn channel_factors(params: &EffectParams) -> [f32; 3] {
    [
        1.0 + params.saturation * 0.2,
        0.9 + params.contrast * 0.1,
        0.8 + params.brightness * 0.2,
    ]
}

/// Vignette strength; 0.3 at neutral saturation.
pub fn vignette_strength(saturation: f32) -> f32 {
    0.3 + (saturation - 1.0) * 0.2
}

/// Per-pixel attenuation `clamp(1 - d / d_max * strength, 0.3, 1)`.
///
/// `d` is the distance from the integer center `(w / 2, h / 2)` and `d_max`
/// the distance from that center to the top-left corner.
pub fn vignette_mask(width: u32, height: u32, strength: f32) -> Vec<f32> {
    let cx = (width / 2) as f32;
    let cy = (height / 2) as f32;
    let max_dist = (cx * cx + cy * cy).sqrt();
    let mut mask = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height {
        for x in 0..width {
            if max_dist == 0.0 {
                mask.push(1.0);
                continue;
            }
            let d = ((x as f32 - cx).powi(2) + (y as f32 - cy).powi(2)).sqrt();
            mask.push((1.0 - d / max_dist * strength).clamp(VIGNETTE_FLOOR, 1.0));
        }
    }
    mask
}
