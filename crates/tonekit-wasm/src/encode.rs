//! Image encoding WASM bindings for the export workflow.
//!
//! # Example
//!
//! ```typescript
//! import { encode_png, encode_jpeg } from '@tonekit/wasm';
//!
//! const png = encode_png(image);
//! const jpeg = encode_jpeg(image, 90);
//! ```

use tonekit_core::encode;
use wasm_bindgen::prelude::*;

use crate::types::JsImageBuffer;

/// Encode an image to lossless PNG bytes.
///
/// Gray images are written as RGB.
#[wasm_bindgen]
pub fn encode_png(image: &JsImageBuffer) -> Result<Vec<u8>, JsValue> {
    encode::encode_png(image.as_core()).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Encode an image to JPEG bytes.
///
/// # Quality Guidelines
///
/// * 90-100: High quality, suitable for archival
/// * 60-80: Medium quality, acceptable for web/social media
/// * Below 60: Low quality, visible artifacts
///
/// Values outside 1-100 are clamped.
#[wasm_bindgen]
pub fn encode_jpeg(image: &JsImageBuffer, quality: u8) -> Result<Vec<u8>, JsValue> {
    encode::encode_jpeg(image.as_core(), quality).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonekit_core::ImageBuffer;

    fn sample() -> JsImageBuffer {
        JsImageBuffer::from_core(ImageBuffer::from_fn(20, 10, |x, y| [(x * 12) as u8, (y * 25) as u8, 64]))
    }

    #[test]
    fn test_encode_jpeg_markers() {
        let jpeg = encode_jpeg(&sample(), 90).unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
        assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_encode_png_round_trip() {
        let img = sample();
        let png = encode_png(&img).unwrap();
        let decoded = crate::decode::decode_image(&png).unwrap();
        assert_eq!(decoded.pixels(), img.pixels());
    }

    #[test]
    fn test_encode_gray_png() {
        let gray = JsImageBuffer::gray(3, 3, vec![90; 9]).unwrap();
        let decoded = crate::decode::decode_image(&encode_png(&gray).unwrap()).unwrap();
        assert_eq!(decoded.channels(), 3);
        assert_eq!(decoded.pixels(), vec![90; 27]);
    }
}
