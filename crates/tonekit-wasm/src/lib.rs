//! Tonekit WASM - WebAssembly bindings for Tonekit
//!
//! This crate exposes the tonekit-core engine to JavaScript/TypeScript.
//!
//! # Module Structure
//!
//! - `types` - `JsImageBuffer`, the JS-side image handle
//! - `effects` - effect pipeline dispatch by name
//! - `curve` - interactive curve editor driven by canvas pointer events
//! - `histogram` - RGB and luminance histograms
//! - `decode` - image decoding and resizing
//! - `encode` - PNG and JPEG export
//!
//! # Usage
//!
//! ```typescript
//! import init, { decode_image, apply_effect, encode_jpeg } from '@tonekit/wasm';
//!
//! await init();
//!
//! const image = decode_image(new Uint8Array(await file.arrayBuffer()));
//! const edited = apply_effect(image, 'professional', 1.0, 1.2, 1.5);
//! const jpeg = encode_jpeg(edited, 90);
//! ```

use wasm_bindgen::prelude::*;

mod curve;
mod decode;
mod effects;
mod encode;
mod histogram;
mod types;

pub use curve::JsCurveEditor;
pub use decode::{decode_image, generate_thumbnail, resize, resize_to_fit};
pub use effects::{apply_effect, list_effects, process_effect, set_effect_enabled};
pub use encode::{encode_jpeg, encode_png};
pub use histogram::{compute_histogram, JsHistogram};
pub use types::JsImageBuffer;

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }
}
