//! Non-local means denoising and morphological closing.
//!
//! The denoiser compares 7x7 patches across a 21x21 search window. Each
//! search offset is processed as a whole-image pass: squared differences
//! against the shifted image are summed with an integral image so every
//! patch distance costs four lookups.

use tracing::debug;

use super::EffectParams;
use crate::buffer::ImageBuffer;
use crate::color::to_u8;
use crate::error::EngineError;
use crate::filter::close3;
use crate::job::{CancelToken, ProgressSink};

/// Filter strength `h`; larger values smooth more.
pub const NLM_STRENGTH: f32 = 10.0;
/// Half-size of the comparison patch.
pub const PATCH_RADIUS: usize = 3;
/// Half-size of the search window.
pub const SEARCH_RADIUS: isize = 10;

pub fn apply(
    image: &ImageBuffer,
    params: &EffectParams,
    cancel: &CancelToken,
    progress: &dyn ProgressSink,
) -> Result<ImageBuffer, EngineError> {
    let mut out = image.to_rgb();
    if params.brightness > 1.0 {
        out = non_local_means(&out, NLM_STRENGTH, cancel, progress)?;
    }
    if params.contrast > 1.0 {
        cancel.check()?;
        out = close3(&out);
    }
    Ok(out)
}

/// Denoise with non-local means.
///
/// The token is checked once per search offset; progress is reported after
/// each.
pub fn non_local_means(
    image: &ImageBuffer,
    strength: f32,
    cancel: &CancelToken,
    progress: &dyn ProgressSink,
) -> Result<ImageBuffer, EngineError> {
    let rgb = image.to_rgb();
    let (w, h) = (rgb.width() as usize, rgb.height() as usize);
    if w == 0 || h == 0 {
        return Ok(rgb);
    }
    debug!(width = w, height = h, strength, "Non-local means");

    let src = rgb.data();
    let pixels = w * h;
    let inv_h2 = 1.0 / (strength as f64 * strength as f64);
    let side = (2 * SEARCH_RADIUS + 1) as usize;
    let total_offsets = (side * side) as f32;

    let mut num = vec![0.0f64; pixels * 3];
    let mut den = vec![0.0f64; pixels];
    let mut diff = vec![0.0f64; pixels];
    let mut integral = vec![0.0f64; (w + 1) * (h + 1)];

    let shifted = |x: usize, y: usize, ox: isize, oy: isize| -> usize {
        let sx = (x as isize + ox).clamp(0, w as isize - 1) as usize;
        let sy = (y as isize + oy).clamp(0, h as isize - 1) as usize;
        sy * w + sx
    };

    let mut done = 0usize;
    for oy in -SEARCH_RADIUS..=SEARCH_RADIUS {
        for ox in -SEARCH_RADIUS..=SEARCH_RADIUS {
            cancel.check()?;

            for y in 0..h {
                for x in 0..w {
                    let a = (y * w + x) * 3;
                    let b = shifted(x, y, ox, oy) * 3;
                    let sq: f64 = (0..3)
                        .map(|c| {
                            let d = src[a + c] as f64 - src[b + c] as f64;
                            d * d
                        })
                        .sum();
                    diff[y * w + x] = sq / 3.0;
                }
            }
            fill_integral(&diff, w, h, &mut integral);

            for y in 0..h {
                let (y0, y1) = (y.saturating_sub(PATCH_RADIUS), (y + PATCH_RADIUS).min(h - 1));
                for x in 0..w {
                    let (x0, x1) = (x.saturating_sub(PATCH_RADIUS), (x + PATCH_RADIUS).min(w - 1));
                    let area = ((x1 - x0 + 1) * (y1 - y0 + 1)) as f64;
                    let mean = box_sum(&integral, w, x0, y0, x1, y1) / area;
                    let weight = (-mean * inv_h2).exp();

                    let p = y * w + x;
                    let b = shifted(x, y, ox, oy) * 3;
                    for c in 0..3 {
                        num[p * 3 + c] += weight * src[b + c] as f64;
                    }
                    den[p] += weight;
                }
            }

            done += 1;
            progress.report(done as f32 / total_offsets);
        }
    }

    let data = num
        .chunks_exact(3)
        .zip(&den)
        .flat_map(|(sums, &d)| sums.iter().map(move |&s| to_u8((s / d) as f32)))
        .collect();
    Ok(rgb.with_data(data))
}

/// Summed-area table with a zero first row and column.
fn fill_integral(values: &[f64], w: usize, h: usize, out: &mut [f64]) {
    let stride = w + 1;
    for y in 0..h {
        let mut row = 0.0;
        for x in 0..w {
            row += values[y * w + x];
            out[(y + 1) * stride + x + 1] = out[y * stride + x + 1] + row;
        }
    }
}

/// Inclusive rectangle sum from a summed-area table.
fn box_sum(integral: &[f64], w: usize, x0: usize, y0: usize, x1: usize, y1: usize) -> f64 {
    let stride = w + 1;
    integral[(y1 + 1) * stride + x1 + 1] - integral[y0 * stride + x1 + 1] - integral[(y1 + 1) * stride + x0]
        + integral[y0 * stride + x0]
}
