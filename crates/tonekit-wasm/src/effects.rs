//! Effect pipeline WASM bindings.
//!
//! Effects are dispatched by name through a per-thread [`EffectPipeline`]
//! holding every built-in provider. A provider failure never becomes a JS
//! exception: the original image comes back and the diagnostic goes to the
//! browser console.
//!
//! # Example
//!
//! ```typescript
//! import { apply_effect, process_effect, list_effects } from '@tonekit/wasm';
//!
//! const warm = apply_effect(image, 'vintage', 1.1, 1.0, 1.2);
//! const lifted = process_effect(image, 'density_adjustment', { gamma: 1.4, shadow: 20 });
//! const menu = list_effects(); // [{ name, display_name, description, enabled }]
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;

use tonekit_core::{EffectOutcome, EffectPipeline, EngineError, OutcomeStatus, ParameterSet};
use wasm_bindgen::prelude::*;

use crate::types::{console_warn, JsImageBuffer};

thread_local! {
    static PIPELINE: RefCell<EffectPipeline> = RefCell::new(EffectPipeline::with_builtin());
}

/// Apply a slider-driven effect.
///
/// `brightness`, `contrast` and `saturation` are clamped into each
/// effect's domain; clamps are reported to the console.
///
/// # Errors
/// Returns an error only for an unknown effect name.
#[wasm_bindgen]
pub fn apply_effect(
    image: &JsImageBuffer,
    name: &str,
    brightness: f32,
    contrast: f32,
    saturation: f32,
) -> Result<JsImageBuffer, JsValue> {
    let outcome = PIPELINE.with(|pipeline| {
        pipeline
            .borrow()
            .apply(image.as_core(), name, brightness, contrast, saturation)
    });
    finish(name, outcome)
}

/// Run any provider with named parameter values.
///
/// `params` is a plain object such as `{ gamma: 1.4, shadow: 20 }`.
/// Parameters left out use the provider's stored values.
#[wasm_bindgen]
pub fn process_effect(image: &JsImageBuffer, name: &str, params: JsValue) -> Result<JsImageBuffer, JsValue> {
    let params: BTreeMap<String, f32> = if params.is_undefined() || params.is_null() {
        BTreeMap::new()
    } else {
        serde_wasm_bindgen::from_value(params)
            .map_err(|e| JsValue::from_str(&format!("Invalid parameters: {}", e)))?
    };
    let params: ParameterSet = params.into_iter().collect();
    let outcome = PIPELINE.with(|pipeline| pipeline.borrow().process(name, image.as_core(), &params));
    finish(name, outcome)
}

/// Registered providers as `[{ name, display_name, description, enabled }]`.
#[wasm_bindgen]
pub fn list_effects() -> Result<JsValue, JsValue> {
    let infos = PIPELINE.with(|pipeline| pipeline.borrow().infos());
    serde_wasm_bindgen::to_value(&infos).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Enable or disable a provider. Disabled providers pass images through.
///
/// Returns false for an unknown name.
#[wasm_bindgen]
pub fn set_effect_enabled(name: &str, enabled: bool) -> bool {
    PIPELINE.with(|pipeline| {
        let mut pipeline = pipeline.borrow_mut();
        let Some(provider) = pipeline.provider_mut(name) else {
            return false;
        };
        if enabled {
            provider.enable();
        } else {
            provider.disable();
        }
        true
    })
}

fn finish(name: &str, outcome: Result<EffectOutcome, EngineError>) -> Result<JsImageBuffer, JsValue> {
    let outcome = outcome.map_err(|e| JsValue::from_str(&e.to_string()))?;
    for note in outcome.clamps.iter() {
        console_warn(&format!(
            "{}: {} clamped from {} to {}",
            name, note.name, note.requested, note.applied
        ));
    }
    if let OutcomeStatus::Fallback(err) = &outcome.status {
        console_warn(&format!("{} failed, original image returned: {}", name, err));
    }
    Ok(JsImageBuffer::from_core(outcome.image))
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use serde::Serialize;
    use tonekit_core::ImageBuffer;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[derive(Serialize)]
    struct DensityParams {
        gamma: f32,
    }

    #[wasm_bindgen_test]
    fn test_unknown_effect_errors() {
        let img = JsImageBuffer::from_core(ImageBuffer::filled(2, 2, [9, 9, 9]));
        assert!(apply_effect(&img, "sparkle", 1.0, 1.0, 1.0).is_err());
    }

    #[wasm_bindgen_test]
    fn test_process_effect_with_object() {
        let img = JsImageBuffer::from_core(ImageBuffer::filled(2, 2, [64, 64, 64]));
        let params = serde_wasm_bindgen::to_value(&DensityParams { gamma: 2.0 }).unwrap();
        let out = process_effect(&img, "density_adjustment", params).unwrap();
        assert_eq!(out.pixels()[0], 128);
    }

    #[wasm_bindgen_test]
    fn test_list_effects() {
        let list = list_effects().unwrap();
        assert!(js_sys::Array::is_array(&list));
        assert_eq!(js_sys::Array::from(&list).length(), 12);
    }
}
