//! Histogram computation and CDF-based equalization tables.
//!
//! Histograms back both the analysis provider and the equalization
//! operations in [`crate::ops`].

use serde::Serialize;

use crate::buffer::{ChannelLayout, ImageBuffer};
use crate::luma::luma_u8;

/// Per-channel 256-bin histograms of an RGB image plus its BT.601 luma.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Histogram {
    /// Red channel histogram (256 bins)
    #[serde(with = "bins")]
    pub red: [u32; 256],
    /// Green channel histogram (256 bins)
    #[serde(with = "bins")]
    pub green: [u32; 256],
    /// Blue channel histogram (256 bins)
    #[serde(with = "bins")]
    pub blue: [u32; 256],
    /// Luma histogram (256 bins)
    #[serde(with = "bins")]
    pub luminance: [u32; 256],
}

// serde only derives fixed arrays up to 32 elements.
mod bins {
    use serde::Serializer;

    pub fn serialize<S: Serializer>(bins: &[u32; 256], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(bins.iter())
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self {
            red: [0; 256],
            green: [0; 256],
            blue: [0; 256],
            luminance: [0; 256],
        }
    }
}

impl Histogram {
    /// Create a new empty histogram
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pixels counted.
    pub fn total(&self) -> u64 {
        self.luminance.iter().map(|&c| c as u64).sum()
    }

    /// Find the maximum value across the color channels for normalization
    pub fn max_value(&self) -> u32 {
        let max_r = self.red.iter().copied().max().unwrap_or(0);
        let max_g = self.green.iter().copied().max().unwrap_or(0);
        let max_b = self.blue.iter().copied().max().unwrap_or(0);
        max_r.max(max_g).max(max_b)
    }

    /// Check for highlight clipping (values at 255)
    pub fn has_highlight_clipping(&self) -> bool {
        self.red[255] > 0 || self.green[255] > 0 || self.blue[255] > 0
    }

    /// Check for shadow clipping (values at 0)
    pub fn has_shadow_clipping(&self) -> bool {
        self.red[0] > 0 || self.green[0] > 0 || self.blue[0] > 0
    }

    /// Mean level of each channel as `[red, green, blue]`.
    pub fn channel_means(&self) -> [f32; 3] {
        [mean(&self.red), mean(&self.green), mean(&self.blue)]
    }
}

/// Compute RGB and luma histograms of an image.
///
/// Gray images count the same level into every channel.
///
/// # Example
/// ```
/// use tonekit_core::{histogram::compute_histogram, ImageBuffer};
///
/// let img = ImageBuffer::rgb(2, 1, vec![255, 0, 0, 0, 255, 0]).unwrap();
/// let hist = compute_histogram(&img);
/// assert_eq!(hist.red[255], 1);
/// assert_eq!(hist.green[255], 1);
/// ```
pub fn compute_histogram(image: &ImageBuffer) -> Histogram {
    let mut hist = Histogram::new();

    match image.layout() {
        ChannelLayout::Rgb => {
            for px in image.data().chunks_exact(3) {
                hist.red[px[0] as usize] += 1;
                hist.green[px[1] as usize] += 1;
                hist.blue[px[2] as usize] += 1;
                hist.luminance[luma_u8(px[0], px[1], px[2]) as usize] += 1;
            }
        }
        ChannelLayout::Gray => {
            for &v in image.data() {
                let v = v as usize;
                hist.red[v] += 1;
                hist.green[v] += 1;
                hist.blue[v] += 1;
                hist.luminance[v] += 1;
            }
        }
    }

    hist
}

/// Histogram of every `stride`-th byte starting at `offset`.
pub fn channel_histogram(data: &[u8], stride: usize, offset: usize) -> [u32; 256] {
    let mut bins = [0u32; 256];
    for &v in data.iter().skip(offset).step_by(stride.max(1)) {
        bins[v as usize] += 1;
    }
    bins
}

/// Build the equalization remap table for a histogram.
///
/// `lut[v] = round((cdf[v] - cdf_min) * 255 / (N - cdf_min))` where
/// `cdf_min` is the count of the lowest occupied level. Returns `None` when
/// the histogram is empty or holds a single level, in which case the data
/// should be left unchanged.
pub fn equalization_table(bins: &[u32; 256]) -> Option<[u8; 256]> {
    let total: u64 = bins.iter().map(|&c| c as u64).sum();
    let first = bins.iter().position(|&c| c > 0)?;
    let cdf_min = bins[first] as u64;
    if total == cdf_min {
        return None;
    }

    let scale = 255.0 / (total - cdf_min) as f64;
    let mut table = [0u8; 256];
    let mut cdf = 0u64;
    for (level, &count) in bins.iter().enumerate() {
        cdf += count as u64;
        let value = (cdf.saturating_sub(cdf_min)) as f64 * scale;
        table[level] = value.round().clamp(0.0, 255.0) as u8;
    }
    Some(table)
}

fn mean(bins: &[u32; 256]) -> f32 {
    let (sum, count) = bins
        .iter()
        .enumerate()
        .fold((0u64, 0u64), |(sum, count), (level, &c)| {
            (sum + level as u64 * c as u64, count + c as u64)
        });
    if count == 0 {
        0.0
    } else {
        (sum as f64 / count as f64) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb(width: u32, height: u32, pixels: Vec<u8>) -> ImageBuffer {
        ImageBuffer::rgb(width, height, pixels).unwrap()
    }

    #[test]
    fn test_empty_histogram() {
        let hist = compute_histogram(&rgb(0, 0, vec![]));
        assert_eq!(hist.max_value(), 0);
        assert_eq!(hist.total(), 0);
    }

    #[test]
    fn test_single_red_pixel() {
        let hist = compute_histogram(&rgb(1, 1, vec![255, 0, 0]));
        assert_eq!(hist.red[255], 1);
        assert_eq!(hist.green[0], 1);
        assert_eq!(hist.blue[0], 1);
        assert_eq!(hist.luminance[76], 1);
        assert!(hist.has_highlight_clipping());
        assert!(hist.has_shadow_clipping());
    }

    #[test]
    fn test_rgb_primary_colors() {
        let pixels = vec![
            255, 0, 0, // Red
            0, 255, 0, // Green
            0, 0, 255, // Blue
        ];
        let hist = compute_histogram(&rgb(3, 1, pixels));
        assert_eq!(hist.red[255], 1);
        assert_eq!(hist.red[0], 2);
        assert_eq!(hist.green[255], 1);
        assert_eq!(hist.green[0], 2);
        assert_eq!(hist.blue[255], 1);
        assert_eq!(hist.blue[0], 2);
    }

    #[test]
    fn test_grayscale_midtone() {
        let hist = compute_histogram(&rgb(1, 1, vec![128, 128, 128]));
        assert_eq!(hist.luminance[128], 1);
        assert!(!hist.has_highlight_clipping());
        assert!(!hist.has_shadow_clipping());
    }

    #[test]
    fn test_gray_layout_counts_every_channel() {
        let img = ImageBuffer::gray(3, 1, vec![0, 10, 10]).unwrap();
        let hist = compute_histogram(&img);
        assert_eq!(hist.red[10], 2);
        assert_eq!(hist.blue[0], 1);
        assert_eq!(hist.luminance[10], 2);
    }

    #[test]
    fn test_max_value() {
        let pixels = vec![100, 100, 100, 100, 100, 100, 100, 100, 100, 200, 200, 200];
        let hist = compute_histogram(&rgb(4, 1, pixels));
        assert_eq!(hist.red[100], 3);
        assert_eq!(hist.red[200], 1);
        assert_eq!(hist.max_value(), 3);
    }

    #[test]
    fn test_channel_means() {
        let hist = compute_histogram(&rgb(2, 1, vec![0, 100, 255, 100, 100, 255]));
        let [r, g, b] = hist.channel_means();
        assert!((r - 50.0).abs() < 1e-4);
        assert!((g - 100.0).abs() < 1e-4);
        assert!((b - 255.0).abs() < 1e-4);
    }

    #[test]
    fn test_channel_histogram_stride() {
        let data = [1, 2, 3, 1, 5, 6];
        let bins = channel_histogram(&data, 3, 0);
        assert_eq!(bins[1], 2);
        let bins = channel_histogram(&data, 3, 1);
        assert_eq!(bins[2], 1);
        assert_eq!(bins[5], 1);
    }

    #[test]
    fn test_equalization_constant_is_none() {
        let mut bins = [0u32; 256];
        bins[77] = 16;
        assert!(equalization_table(&bins).is_none());
        assert!(equalization_table(&[0u32; 256]).is_none());
    }

    #[test]
    fn test_equalization_two_levels_stretch() {
        let mut bins = [0u32; 256];
        bins[100] = 2;
        bins[110] = 2;
        let table = equalization_table(&bins).unwrap();
        assert_eq!(table[100], 0);
        assert_eq!(table[110], 255);
    }

    #[test]
    fn test_equalization_table_is_monotonic() {
        let mut bins = [0u32; 256];
        for (i, b) in bins.iter_mut().enumerate() {
            *b = (i % 7) as u32;
        }
        let table = equalization_table(&bins).unwrap();
        for w in table.windows(2) {
            assert!(w[0] <= w[1]);
        }
        assert_eq!(table[255], 255);
    }

    #[test]
    fn test_gradient_image() {
        let mut pixels = Vec::new();
        for i in 0..=255u8 {
            pixels.extend_from_slice(&[i, i, i]);
        }
        let hist = compute_histogram(&rgb(256, 1, pixels));
        for i in 0..256 {
            assert_eq!(hist.red[i], 1);
            assert_eq!(hist.luminance[i], 1);
        }
        assert_eq!(hist.max_value(), 1);
    }
}
