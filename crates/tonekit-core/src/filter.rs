//! Spatial filters: convolution kernels, Gaussian blur, bilateral smoothing
//! and 3x3 morphology.
//!
//! # Kernels
//!
//! - [`Kernel3::SMOOTH`] - weighted 3x3 average used by sharpening
//! - [`Kernel3::EMBOSS`] - directional relief with a mid-gray offset
//! - [`Kernel3::EDGE_ENHANCE_MORE`] - strong Laplacian-style edge boost
//! - [`gaussian_kernel`] - normalized 1D Gaussian for separable blurs
//!
//! Separable and bilateral filters clamp sample coordinates to the edge.
//! 3x3 kernel convolution leaves the one-pixel border unchanged.

use tracing::trace;

use crate::buffer::ImageBuffer;
use crate::color::to_u8;

/// A 3x3 convolution kernel with divisor and offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kernel3 {
    /// Row-major weights.
    pub weights: [f32; 9],
    /// Sum divisor applied before the offset.
    pub scale: f32,
    /// Constant added after scaling.
    pub offset: f32,
}

impl Kernel3 {
    /// Weighted smoothing kernel, center weight 5.
    pub const SMOOTH: Kernel3 = Kernel3 {
        weights: [1.0, 1.0, 1.0, 1.0, 5.0, 1.0, 1.0, 1.0, 1.0],
        scale: 13.0,
        offset: 0.0,
    };

    /// Emboss kernel offset to mid-gray.
    pub const EMBOSS: Kernel3 = Kernel3 {
        weights: [-1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0],
        scale: 1.0,
        offset: 128.0,
    };

    /// Aggressive edge enhancement.
    pub const EDGE_ENHANCE_MORE: Kernel3 = Kernel3 {
        weights: [-1.0, -1.0, -1.0, -1.0, 9.0, -1.0, -1.0, -1.0, -1.0],
        scale: 1.0,
        offset: 0.0,
    };
}

/// Convolve an RGB image with a 3x3 kernel.
///
/// Border pixels are copied from the source. Images smaller than 3x3 are
/// returned unchanged.
pub fn convolve3(image: &ImageBuffer, kernel: &Kernel3) -> ImageBuffer {
    let rgb = image.to_rgb();
    let (w, h) = (rgb.width() as usize, rgb.height() as usize);
    trace!(width = w, height = h, "convolve3");
    if w < 3 || h < 3 {
        return rgb;
    }

    let src = rgb.data();
    let mut dst = src.to_vec();
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            for c in 0..3 {
                let mut sum = 0.0f32;
                for ky in 0..3 {
                    for kx in 0..3 {
                        let idx = ((y + ky - 1) * w + (x + kx - 1)) * 3 + c;
                        sum += src[idx] as f32 * kernel.weights[ky * 3 + kx];
                    }
                }
                dst[(y * w + x) * 3 + c] = to_u8(sum / kernel.scale + kernel.offset);
            }
        }
    }
    rgb.with_data(dst)
}

/// Normalized 1D Gaussian kernel of `size` taps (made odd).
pub fn gaussian_kernel(size: usize, sigma: f32) -> Vec<f32> {
    let size = if size % 2 == 0 { size + 1 } else { size };
    let half = (size / 2) as i32;
    let sigma2 = 2.0 * sigma * sigma;

    let mut data: Vec<f32> = (-half..=half)
        .map(|x| (-((x * x) as f32) / sigma2).exp())
        .collect();
    let sum: f32 = data.iter().sum();
    for w in &mut data {
        *w /= sum;
    }
    data
}

/// Kernel size covering +-3 sigma.
pub fn gaussian_size_for_sigma(sigma: f32) -> usize {
    ((sigma * 6.0 + 1.0).round() as usize) | 1
}

/// Separable convolution of interleaved float data with a 1D kernel.
///
/// # Arguments
/// * `src` - Interleaved samples, `width * height * channels` long
/// * `kernel` - Odd-length kernel applied horizontally then vertically
pub fn convolve_separable(
    src: &[f32],
    width: usize,
    height: usize,
    channels: usize,
    kernel: &[f32],
) -> Vec<f32> {
    trace!(width, height, channels, taps = kernel.len(), "convolve_separable");
    if width == 0 || height == 0 {
        return Vec::new();
    }
    let radius = (kernel.len() / 2) as isize;

    let mut tmp = vec![0.0f32; src.len()];
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                let mut sum = 0.0;
                for (k, &weight) in kernel.iter().enumerate() {
                    let sx = (x as isize + k as isize - radius).clamp(0, width as isize - 1) as usize;
                    sum += src[(y * width + sx) * channels + c] * weight;
                }
                tmp[(y * width + x) * channels + c] = sum;
            }
        }
    }

    let mut dst = vec![0.0f32; src.len()];
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                let mut sum = 0.0;
                for (k, &weight) in kernel.iter().enumerate() {
                    let sy = (y as isize + k as isize - radius).clamp(0, height as isize - 1) as usize;
                    sum += tmp[(sy * width + x) * channels + c] * weight;
                }
                dst[(y * width + x) * channels + c] = sum;
            }
        }
    }
    dst
}

/// Gaussian blur returning unrounded samples.
pub fn gaussian_blur_f32(image: &ImageBuffer, size: usize, sigma: f32) -> Vec<f32> {
    let rgb = image.to_rgb();
    let src: Vec<f32> = rgb.data().iter().map(|&v| v as f32).collect();
    let kernel = gaussian_kernel(size, sigma);
    convolve_separable(&src, rgb.width() as usize, rgb.height() as usize, 3, &kernel)
}

/// Gaussian blur with the kernel size derived from `sigma`.
///
/// Non-positive sigma returns the image unchanged.
pub fn gaussian_blur(image: &ImageBuffer, sigma: f32) -> ImageBuffer {
    if sigma.is_nan() || sigma <= 0.0 {
        return image.to_rgb();
    }
    gaussian_blur_sized(image, gaussian_size_for_sigma(sigma), sigma)
}

/// Gaussian blur with an explicit kernel size.
pub fn gaussian_blur_sized(image: &ImageBuffer, size: usize, sigma: f32) -> ImageBuffer {
    let rgb = image.to_rgb();
    if sigma.is_nan() || sigma <= 0.0 || size <= 1 {
        return rgb;
    }
    let data = gaussian_blur_f32(&rgb, size, sigma)
        .into_iter()
        .map(to_u8)
        .collect();
    rgb.with_data(data)
}

/// Edge-preserving bilateral filter.
///
/// Spatial neighbors lie within a circle of radius `diameter / 2`. Color
/// distance is the sum of absolute channel differences.
pub fn bilateral(image: &ImageBuffer, diameter: usize, sigma_color: f32, sigma_space: f32) -> ImageBuffer {
    let rgb = image.to_rgb();
    let (w, h) = (rgb.width() as usize, rgb.height() as usize);
    let radius = (diameter / 2) as isize;
    trace!(width = w, height = h, radius, "bilateral");
    if radius == 0 || w == 0 || h == 0 {
        return rgb;
    }

    let space_coeff = -0.5 / (sigma_space * sigma_space);
    let color_coeff = -0.5 / (sigma_color * sigma_color);

    let mut offsets = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let r2 = (dx * dx + dy * dy) as f32;
            if r2.sqrt() > radius as f32 {
                continue;
            }
            offsets.push((dx, dy, (r2 * space_coeff).exp()));
        }
    }
    let color_weights: Vec<f32> = (0..=255 * 3)
        .map(|d| ((d * d) as f32 * color_coeff).exp())
        .collect();

    let src = rgb.data();
    let mut dst = vec![0u8; src.len()];
    for y in 0..h {
        for x in 0..w {
            let center = (y * w + x) * 3;
            let mut sums = [0.0f32; 3];
            let mut wsum = 0.0f32;
            for &(dx, dy, space_weight) in &offsets {
                let sx = (x as isize + dx).clamp(0, w as isize - 1) as usize;
                let sy = (y as isize + dy).clamp(0, h as isize - 1) as usize;
                let idx = (sy * w + sx) * 3;
                let diff: usize = (0..3)
                    .map(|c| (src[idx + c] as i32 - src[center + c] as i32).unsigned_abs() as usize)
                    .sum();
                let weight = space_weight * color_weights[diff];
                for c in 0..3 {
                    sums[c] += src[idx + c] as f32 * weight;
                }
                wsum += weight;
            }
            for c in 0..3 {
                dst[center + c] = to_u8(sums[c] / wsum);
            }
        }
    }
    rgb.with_data(dst)
}

fn morph3(image: &ImageBuffer, pick: fn(u8, u8) -> u8) -> ImageBuffer {
    let rgb = image.to_rgb();
    let (w, h) = (rgb.width() as usize, rgb.height() as usize);
    let src = rgb.data();
    let mut dst = src.to_vec();
    for y in 0..h {
        for x in 0..w {
            let ys = y.saturating_sub(1)..=(y + 1).min(h - 1);
            for c in 0..3 {
                let mut acc = src[(y * w + x) * 3 + c];
                for sy in ys.clone() {
                    for sx in x.saturating_sub(1)..=(x + 1).min(w - 1) {
                        acc = pick(acc, src[(sy * w + sx) * 3 + c]);
                    }
                }
                dst[(y * w + x) * 3 + c] = acc;
            }
        }
    }
    rgb.with_data(dst)
}

/// 3x3 dilation (per-channel maximum).
pub fn dilate3(image: &ImageBuffer) -> ImageBuffer {
    morph3(image, u8::max)
}

/// 3x3 erosion (per-channel minimum).
pub fn erode3(image: &ImageBuffer) -> ImageBuffer {
    morph3(image, u8::min)
}

/// Morphological closing: dilation followed by erosion.
pub fn close3(image: &ImageBuffer) -> ImageBuffer {
    erode3(&dilate3(image))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot(size: u32) -> ImageBuffer {
        let mid = size / 2;
        ImageBuffer::from_fn(size, size, |x, y| if x == mid && y == mid { [255; 3] } else { [0; 3] })
    }

    #[test]
    fn test_gaussian_kernel_normalized() {
        let k = gaussian_kernel(5, 1.5);
        assert_eq!(k.len(), 5);
        let sum: f32 = k.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!(k[2] > k[1] && k[1] > k[0]);
        assert!((k[0] - k[4]).abs() < 1e-7);
    }

    #[test]
    fn test_gaussian_kernel_even_size_made_odd() {
        assert_eq!(gaussian_kernel(4, 1.0).len(), 5);
    }

    #[test]
    fn test_gaussian_size_for_sigma() {
        assert_eq!(gaussian_size_for_sigma(2.0), 13);
        assert_eq!(gaussian_size_for_sigma(0.5), 5);
    }

    #[test]
    fn test_blur_preserves_constant() {
        let img = ImageBuffer::filled(6, 6, [90, 10, 200]);
        assert_eq!(gaussian_blur(&img, 2.0), img);
    }

    #[test]
    fn test_blur_spreads_dot() {
        let out = gaussian_blur(&dot(9), 1.0);
        assert!(out.pixel(4, 4)[0] < 255);
        assert!(out.pixel(5, 4)[0] > 0);
        assert_eq!(out.pixel(5, 4), out.pixel(3, 4));
    }

    #[test]
    fn test_blur_zero_sigma_is_noop() {
        let img = dot(5);
        assert_eq!(gaussian_blur(&img, 0.0), img);
    }

    #[test]
    fn test_convolve3_keeps_border() {
        let img = ImageBuffer::from_fn(4, 4, |x, y| [(x * 40 + y * 10) as u8, 0, 0]);
        let out = convolve3(&img, &Kernel3::EDGE_ENHANCE_MORE);
        for x in 0..4 {
            assert_eq!(out.pixel(x, 0), img.pixel(x, 0));
            assert_eq!(out.pixel(x, 3), img.pixel(x, 3));
        }
    }

    #[test]
    fn test_emboss_flat_is_mid_gray() {
        let img = ImageBuffer::filled(3, 3, [77, 77, 77]);
        let out = convolve3(&img, &Kernel3::EMBOSS);
        assert_eq!(out.pixel(1, 1), &[128, 128, 128]);
    }

    #[test]
    fn test_smooth_flat_is_identity() {
        let img = ImageBuffer::filled(5, 5, [30, 60, 90]);
        assert_eq!(convolve3(&img, &Kernel3::SMOOTH), img);
    }

    #[test]
    fn test_tiny_image_untouched_by_3x3() {
        let img = ImageBuffer::filled(2, 2, [1, 2, 3]);
        assert_eq!(convolve3(&img, &Kernel3::EMBOSS), img);
    }

    #[test]
    fn test_bilateral_preserves_constant() {
        let img = ImageBuffer::filled(5, 5, [10, 20, 30]);
        assert_eq!(bilateral(&img, 5, 80.0, 80.0), img);
    }

    #[test]
    fn test_bilateral_keeps_strong_edge() {
        let img = ImageBuffer::from_fn(8, 8, |x, _| if x < 4 { [0; 3] } else { [255; 3] });
        let out = bilateral(&img, 5, 10.0, 80.0);
        assert!(out.pixel(3, 4)[0] < 10);
        assert!(out.pixel(4, 4)[0] > 245);
    }

    #[test]
    fn test_dilate_and_erode() {
        let img = dot(5);
        let dilated = dilate3(&img);
        assert_eq!(dilated.pixel(1, 1), &[255, 255, 255]);
        assert_eq!(dilated.pixel(0, 0), &[0, 0, 0]);
        assert_eq!(erode3(&img).pixel(2, 2), &[0, 0, 0]);
    }

    #[test]
    fn test_close_fills_hole() {
        let img = ImageBuffer::from_fn(5, 5, |x, y| if x == 2 && y == 2 { [0; 3] } else { [200; 3] });
        let out = close3(&img);
        assert_eq!(out.pixel(2, 2), &[200, 200, 200]);
    }

    #[test]
    fn test_empty_images() {
        let img = ImageBuffer::rgb(0, 0, vec![]).unwrap();
        assert!(gaussian_blur(&img, 3.0).is_empty());
        assert!(bilateral(&img, 5, 80.0, 80.0).is_empty());
        assert!(close3(&img).is_empty());
    }
}
