//! Image decoding WASM bindings.
//!
//! # Functions
//!
//! - [`decode_image`] - Decode JPEG, PNG, BMP, TIFF or GIF bytes
//! - [`resize`] - Resize an image to exact dimensions
//! - [`resize_to_fit`] - Shrink an image into a box, preserving aspect ratio
//! - [`generate_thumbnail`] - Generate a thumbnail for grid display
//!
//! # Example
//!
//! ```typescript
//! import { decode_image, resize_to_fit } from '@tonekit/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! const preview = resize_to_fit(image, canvas.width, canvas.height, 1);
//! ```

use tonekit_core::decode;
use wasm_bindgen::prelude::*;

use crate::types::{filter_from_u8, JsImageBuffer};

/// Decode an encoded image.
///
/// The format is detected from the content. JPEG input is rotated
/// according to its EXIF orientation.
///
/// # Errors
///
/// Returns an error if the bytes are not a supported format or are
/// corrupted.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsImageBuffer, JsValue> {
    decode::decode_bytes(bytes)
        .map(JsImageBuffer::from_core)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Resize an image to exact dimensions.
///
/// `filter`: 0 = Nearest, 1 = Bilinear, 2 = Lanczos3.
#[wasm_bindgen]
pub fn resize(image: &JsImageBuffer, width: u32, height: u32, filter: u8) -> Result<JsImageBuffer, JsValue> {
    decode::resize(image.as_core(), width, height, filter_from_u8(filter))
        .map(JsImageBuffer::from_core)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Shrink an image to fit `max_width x max_height`. Never upscales.
#[wasm_bindgen]
pub fn resize_to_fit(
    image: &JsImageBuffer,
    max_width: u32,
    max_height: u32,
    filter: u8,
) -> Result<JsImageBuffer, JsValue> {
    decode::resize_to_fit(image.as_core(), max_width, max_height, filter_from_u8(filter))
        .map(JsImageBuffer::from_core)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Thumbnail that fits a `size x size` square, using bilinear filtering.
#[wasm_bindgen]
pub fn generate_thumbnail(image: &JsImageBuffer, size: u32) -> Result<JsImageBuffer, JsValue> {
    decode::generate_thumbnail(image.as_core(), size)
        .map(JsImageBuffer::from_core)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
