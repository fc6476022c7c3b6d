//! WASM-compatible wrapper types for image data.
//!
//! This module provides JavaScript-friendly types that wrap the core Tonekit types,
//! handling the conversion between Rust and JavaScript data representations.

use tonekit_core::decode::FilterType;
use tonekit_core::ImageBuffer;
use wasm_bindgen::prelude::*;

/// An image buffer wrapper for JavaScript.
///
/// Holds 8-bit gray or RGB samples in row-major order.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy is made
/// to JavaScript memory as a `Uint8Array`. For performance-critical code, keep the
/// image in WASM memory and chain effect calls on it.
#[wasm_bindgen]
pub struct JsImageBuffer {
    inner: ImageBuffer,
}

#[wasm_bindgen]
impl JsImageBuffer {
    /// Wrap RGB pixel data (3 bytes per pixel, row-major order).
    ///
    /// # Errors
    /// Returns an error if `pixels.length != width * height * 3`.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsImageBuffer, JsValue> {
        ImageBuffer::rgb(width, height, pixels)
            .map(Self::from_core)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Wrap single-channel gray data (1 byte per pixel).
    pub fn gray(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsImageBuffer, JsValue> {
        ImageBuffer::gray(width, height, pixels)
            .map(Self::from_core)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// Samples per pixel: 1 for gray, 3 for RGB.
    #[wasm_bindgen(getter)]
    pub fn channels(&self) -> usize {
        self.inner.channels()
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.data().len()
    }

    /// Returns the pixel data as Uint8Array.
    ///
    /// Note: This creates a copy of the pixel data.
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.data().to_vec()
    }

    /// RGB copy of this image; gray samples are replicated.
    pub fn to_rgb(&self) -> JsImageBuffer {
        Self::from_core(self.inner.to_rgb())
    }

    /// Explicitly free WASM memory.
    ///
    /// This is optional - wasm-bindgen's finalizer will handle cleanup automatically.
    pub fn free(self) {}
}

impl JsImageBuffer {
    pub(crate) fn from_core(inner: ImageBuffer) -> Self {
        Self { inner }
    }

    pub(crate) fn as_core(&self) -> &ImageBuffer {
        &self.inner
    }
}

/// Convert a u8 filter type value to the core FilterType enum.
///
/// Values:
/// - 0 = Nearest (fastest, lowest quality)
/// - 1 = Bilinear (good balance of speed and quality)
/// - 2 = Lanczos3 (best quality, slowest)
///
/// Any other value defaults to Bilinear.
pub(crate) fn filter_from_u8(value: u8) -> FilterType {
    match value {
        0 => FilterType::Nearest,
        2 => FilterType::Lanczos3,
        _ => FilterType::Bilinear,
    }
}

/// Send a diagnostic to the browser console.
///
/// Native builds (unit tests) have no console, so the message is dropped there.
pub(crate) fn console_warn(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&JsValue::from_str(message));
    #[cfg(not(target_arch = "wasm32"))]
    let _ = message;
}
