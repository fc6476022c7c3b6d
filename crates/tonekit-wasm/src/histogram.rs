//! Histogram computation WASM bindings.

use tonekit_core::histogram::compute_histogram as compute_histogram_core;
use wasm_bindgen::prelude::*;

use crate::types::JsImageBuffer;

/// Histogram result accessible from JavaScript.
///
/// Contains 256-bin histograms for red, green, blue, and luminance channels,
/// plus clipping flags and per-channel means.
#[wasm_bindgen]
pub struct JsHistogram {
    red: Vec<u32>,
    green: Vec<u32>,
    blue: Vec<u32>,
    luminance: Vec<u32>,
    means: Vec<f32>,
    max_value: u32,
    has_highlight_clipping: bool,
    has_shadow_clipping: bool,
}

#[wasm_bindgen]
impl JsHistogram {
    pub fn red(&self) -> Vec<u32> {
        self.red.clone()
    }

    pub fn green(&self) -> Vec<u32> {
        self.green.clone()
    }

    pub fn blue(&self) -> Vec<u32> {
        self.blue.clone()
    }

    /// BT.601 luma histogram (256 bins).
    pub fn luminance(&self) -> Vec<u32> {
        self.luminance.clone()
    }

    /// Mean level per channel as `[red, green, blue]`.
    pub fn means(&self) -> Vec<f32> {
        self.means.clone()
    }

    /// Largest bin across the RGB channels, for normalizing the display.
    #[wasm_bindgen(getter)]
    pub fn max_value(&self) -> u32 {
        self.max_value
    }

    #[wasm_bindgen(getter)]
    pub fn has_highlight_clipping(&self) -> bool {
        self.has_highlight_clipping
    }

    #[wasm_bindgen(getter)]
    pub fn has_shadow_clipping(&self) -> bool {
        self.has_shadow_clipping
    }
}

/// Compute histograms of an image.
///
/// # Example (TypeScript)
/// ```typescript
/// const hist = compute_histogram(image);
/// const redBins = hist.red();        // Uint32Array[256]
/// const max = hist.max_value;        // For normalization
/// const clipped = hist.has_highlight_clipping;
/// hist.free();
/// ```
#[wasm_bindgen]
pub fn compute_histogram(image: &JsImageBuffer) -> JsHistogram {
    let hist = compute_histogram_core(image.as_core());

    JsHistogram {
        red: hist.red.to_vec(),
        green: hist.green.to_vec(),
        blue: hist.blue.to_vec(),
        luminance: hist.luminance.to_vec(),
        means: hist.channel_means().to_vec(),
        max_value: hist.max_value(),
        has_highlight_clipping: hist.has_highlight_clipping(),
        has_shadow_clipping: hist.has_shadow_clipping(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonekit_core::ImageBuffer;

    fn image(width: u32, height: u32, pixels: Vec<u8>) -> JsImageBuffer {
        JsImageBuffer::from_core(ImageBuffer::rgb(width, height, pixels).unwrap())
    }

    #[test]
    fn test_js_histogram_creation() {
        let hist = compute_histogram(&image(3, 1, vec![255, 0, 0, 0, 255, 0, 0, 0, 255]));

        assert_eq!(hist.red().len(), 256);
        assert_eq!(hist.green().len(), 256);
        assert_eq!(hist.blue().len(), 256);
        assert_eq!(hist.luminance().len(), 256);
        assert!(hist.has_highlight_clipping);
        assert!(hist.has_shadow_clipping);
    }

    #[test]
    fn test_js_histogram_max_value() {
        let pixels = vec![128, 128, 128, 128, 128, 128, 128, 128, 128, 200, 200, 200];
        let hist = compute_histogram(&image(4, 1, pixels));

        assert_eq!(hist.max_value, 3);
        assert_eq!(hist.red()[128], 3);
        assert_eq!(hist.red()[200], 1);
        assert_eq!(hist.means(), vec![146.0, 146.0, 146.0]);
    }

    #[test]
    fn test_js_histogram_no_clipping() {
        let hist = compute_histogram(&image(3, 1, vec![64, 64, 64, 128, 128, 128, 192, 192, 192]));

        assert!(!hist.has_highlight_clipping);
        assert!(!hist.has_shadow_clipping);
    }

    #[test]
    fn test_js_histogram_empty() {
        let hist = compute_histogram(&image(0, 0, vec![]));

        assert_eq!(hist.max_value, 0);
        assert!(!hist.has_highlight_clipping);
        assert!(!hist.has_shadow_clipping);
    }

    #[test]
    fn test_js_histogram_gray_input() {
        let gray = JsImageBuffer::gray(2, 1, vec![255, 255]).unwrap();
        let hist = compute_histogram(&gray);
        assert_eq!(hist.luminance()[255], 2);
        assert_eq!(hist.red()[255], 2);
    }
}
