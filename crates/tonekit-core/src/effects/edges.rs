//! Canny edge detection blended back over the source.
//!
//! Thresholds come from the sliders: `low = 50 * brightness`,
//! `high = 150 * contrast` (swapped if inverted). Saturation above 0.5 blends
//! the edge map over the original with weight `min(saturation, 1)`;
//! otherwise the bare edge map is returned.

use super::EffectParams;
use crate::buffer::ImageBuffer;
use crate::luma::luma_u8;
use crate::ops::blend;

/// `tan(22.5 deg)`, bounds the horizontal gradient sector.
const TAN_22_5: f32 = 0.414_213_57;
/// `tan(67.5 deg)`, bounds the vertical gradient sector.
const TAN_67_5: f32 = 2.414_213_6;

pub fn apply(image: &ImageBuffer, params: &EffectParams) -> ImageBuffer {
    let rgb = image.to_rgb();
    let (w, h) = (rgb.width() as usize, rgb.height() as usize);
    let gray: Vec<u8> = rgb
        .data()
        .chunks_exact(3)
        .map(|px| luma_u8(px[0], px[1], px[2]))
        .collect();

    let (low, high) = thresholds(params);
    let edges = canny(&gray, w, h, low, high);
    let edges = ImageBuffer::rgb_unchecked(
        rgb.width(),
        rgb.height(),
        edges.iter().flat_map(|&v| [v; 3]).collect(),
    );

    if params.saturation > 0.5 {
        blend(&rgb, &edges, params.saturation.min(1.0)).unwrap_or(edges)
    } else {
        edges
    }
}

/// Hysteresis thresholds `(low, high)` with `low <= high`.
pub fn thresholds(params: &EffectParams) -> (i32, i32) {
    let low = (50.0 * params.brightness) as i32;
    let high = (150.0 * params.contrast) as i32;
    if low > high {
        (high, low)
    } else {
        (low, high)
    }
}

/// Binary Canny edge map (0 or 255) of a single-channel image.
pub fn canny(gray: &[u8], width: usize, height: usize, low: i32, high: i32) -> Vec<u8> {
    if width == 0 || height == 0 {
        return Vec::new();
    }
    let (dx, dy) = sobel(gray, width, height);
    let magnitude: Vec<i32> = dx.iter().zip(&dy).map(|(x, y)| x.abs() + y.abs()).collect();
    let thin = suppress_non_maxima(&magnitude, &dx, &dy, width, height);
    hysteresis(&thin, width, height, low, high)
}

/// 3x3 Sobel gradients with replicated borders.
pub fn sobel(gray: &[u8], width: usize, height: usize) -> (Vec<i32>, Vec<i32>) {
    let at = |x: isize, y: isize| -> i32 {
        let x = x.clamp(0, width as isize - 1) as usize;
        let y = y.clamp(0, height as isize - 1) as usize;
        gray[y * width + x] as i32
    };

    let mut dx = vec![0i32; width * height];
    let mut dy = vec![0i32; width * height];
    for y in 0..height as isize {
        for x in 0..width as isize {
            let i = y as usize * width + x as usize;
            dx[i] = at(x + 1, y - 1) + 2 * at(x + 1, y) + at(x + 1, y + 1)
                - at(x - 1, y - 1)
                - 2 * at(x - 1, y)
                - at(x - 1, y + 1);
            dy[i] = at(x - 1, y + 1) + 2 * at(x, y + 1) + at(x + 1, y + 1)
                - at(x - 1, y - 1)
                - 2 * at(x, y - 1)
                - at(x + 1, y - 1);
        }
    }
    (dx, dy)
}

/// Zero every magnitude that is not a local maximum along its gradient.
///
/// Ties are broken toward the left/upper neighbor so a plateau keeps one
/// pixel. Magnitude outside the image counts as zero.
fn suppress_non_maxima(mag: &[i32], dx: &[i32], dy: &[i32], width: usize, height: usize) -> Vec<i32> {
    let at = |x: isize, y: isize| -> i32 {
        if x < 0 || y < 0 || x >= width as isize || y >= height as isize {
            0
        } else {
            mag[y as usize * width + x as usize]
        }
    };

    let mut out = vec![0i32; mag.len()];
    for y in 0..height as isize {
        for x in 0..width as isize {
            let i = y as usize * width + x as usize;
            let m = mag[i];
            if m == 0 {
                continue;
            }
            let ax = dx[i].abs() as f32;
            let ay = dy[i].abs() as f32;
            let keep = if ay < ax * TAN_22_5 {
                m > at(x - 1, y) && m >= at(x + 1, y)
            } else if ay > ax * TAN_67_5 {
                m > at(x, y - 1) && m >= at(x, y + 1)
            } else {
                let s = if (dx[i] < 0) != (dy[i] < 0) { -1 } else { 1 };
                m > at(x - s, y - 1) && m > at(x + s, y + 1)
            };
            if keep {
                out[i] = m;
            }
        }
    }
    out
}

/// Keep pixels above `high` and every pixel above `low` that is
/// 8-connected to one.
fn hysteresis(mag: &[i32], width: usize, height: usize, low: i32, high: i32) -> Vec<u8> {
    let mut edges = vec![0u8; mag.len()];
    let mut stack: Vec<usize> = Vec::new();
    for (i, &m) in mag.iter().enumerate() {
        if m > high {
            edges[i] = 255;
            stack.push(i);
        }
    }

    while let Some(i) = stack.pop() {
        let (x, y) = ((i % width) as isize, (i / width) as isize);
        for ny in y - 1..=y + 1 {
            for nx in x - 1..=x + 1 {
                if nx < 0 || ny < 0 || nx >= width as isize || ny >= height as isize {
                    continue;
                }
                let j = ny as usize * width + nx as usize;
                if edges[j] == 0 && mag[j] > low {
                    edges[j] = 255;
                    stack.push(j);
                }
            }
        }
    }
    edges
}
