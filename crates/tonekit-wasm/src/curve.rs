//! Curve editor WASM bindings.
//!
//! [`JsCurveEditor`] forwards pointer gestures from a canvas to the core
//! editor and hands each delivered LUT to a JavaScript callback as a
//! 256-byte `Uint8Array`.
//!
//! Drags and deletes are debounced: the host calls `poll()` from a timer or
//! animation frame to deliver them once the pointer has settled. Release,
//! reset and `set_points` deliver right away.
//!
//! # Example (TypeScript)
//! ```typescript
//! const editor = new JsCurveEditor(canvas.width, canvas.height);
//! editor.set_callback((lut: Uint8Array) => redraw(lut));
//!
//! canvas.onpointerdown = (e) => editor.press(e.offsetX, e.offsetY);
//! canvas.onpointermove = (e) => e.buttons && editor.drag(e.offsetX, e.offsetY);
//! canvas.onpointerup = () => editor.release();
//! setInterval(() => editor.poll(), 16);
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tonekit_core::curve::{ControlPoint, CurveEditor, EditorConfig, Lut};
use tonekit_core::debounce::Clock;
use wasm_bindgen::prelude::*;

use crate::types::JsImageBuffer;

/// Browser time from `Date.now()`, relative to editor creation.
struct JsClock {
    origin_ms: f64,
}

impl JsClock {
    fn new() -> Self {
        Self {
            origin_ms: js_sys::Date::now(),
        }
    }
}

impl Clock for JsClock {
    fn now(&self) -> Duration {
        let elapsed = (js_sys::Date::now() - self.origin_ms).max(0.0);
        Duration::from_secs_f64(elapsed / 1000.0)
    }
}

/// Helper struct for deserializing JS control points via serde.
#[derive(serde::Deserialize)]
struct ControlPointJs {
    x: i32,
    y: i32,
}

/// LUTs delivered by the core editor, waiting to be handed to JS.
type Mailbox = Arc<Mutex<Option<Lut>>>;

/// Interactive tone-curve editor for a canvas.
#[wasm_bindgen]
pub struct JsCurveEditor {
    inner: CurveEditor<JsClock>,
    mailbox: Mailbox,
    callback: Option<js_sys::Function>,
}

#[wasm_bindgen]
impl JsCurveEditor {
    /// Editor for a canvas of the given size, with default hit radius,
    /// click threshold and a 100 ms debounce.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_width: u32, canvas_height: u32) -> JsCurveEditor {
        let config = EditorConfig {
            canvas_width,
            canvas_height,
            ..EditorConfig::default()
        };
        let mut inner = CurveEditor::with_clock(config, JsClock::new());
        let mailbox = Mailbox::default();
        let sink = Arc::clone(&mailbox);
        inner.on_change(move |lut| {
            if let Ok(mut slot) = sink.lock() {
                *slot = Some(*lut);
            }
        });
        JsCurveEditor {
            inner,
            mailbox,
            callback: None,
        }
    }

    /// Register `callback(lut: Uint8Array)`, replacing any previous one.
    pub fn set_callback(&mut self, callback: js_sys::Function) {
        self.callback = Some(callback);
    }

    pub fn press(&mut self, x: f32, y: f32) -> Result<(), JsValue> {
        self.inner.press(x, y);
        self.dispatch()
    }

    /// Returns whether the curve changed.
    pub fn drag(&mut self, x: f32, y: f32) -> Result<bool, JsValue> {
        let changed = self.inner.drag(x, y);
        self.dispatch()?;
        Ok(changed)
    }

    pub fn release(&mut self) -> Result<(), JsValue> {
        self.inner.release();
        self.dispatch()
    }

    /// Delete the interior point under the pointer.
    pub fn secondary_press(&mut self, x: f32, y: f32) -> Result<bool, JsValue> {
        let removed = self.inner.secondary_press(x, y);
        self.dispatch()?;
        Ok(removed)
    }

    pub fn double_press(&mut self, x: f32, y: f32) -> Result<bool, JsValue> {
        let added = self.inner.double_press(x, y);
        self.dispatch()?;
        Ok(added)
    }

    pub fn reset(&mut self) -> Result<(), JsValue> {
        self.inner.reset();
        self.dispatch()
    }

    /// Deliver a debounced edit if the pointer has settled.
    ///
    /// Returns whether the callback ran.
    pub fn poll(&mut self) -> Result<bool, JsValue> {
        if !self.inner.poll() {
            return Ok(false);
        }
        self.dispatch()?;
        Ok(true)
    }

    /// Replace the curve with `[{ x, y }, ...]` in level space.
    ///
    /// # Errors
    /// Returns an error for fewer than two points or coordinates outside 0..=255.
    pub fn set_points(&mut self, points: JsValue) -> Result<(), JsValue> {
        let points: Vec<ControlPointJs> = serde_wasm_bindgen::from_value(points)
            .map_err(|e| JsValue::from_str(&format!("Invalid curve points: {}", e)))?;
        let pairs: Vec<(i32, i32)> = points.iter().map(|p| (p.x, p.y)).collect();
        self.inner
            .set_points(&pairs)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.dispatch()
    }

    /// Control points as `[{ x, y }, ...]`, sorted by x.
    pub fn points(&self) -> Result<JsValue, JsValue> {
        let points: Vec<ControlPoint> = self.inner.points().to_vec();
        serde_wasm_bindgen::to_value(&points).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Current 256-entry LUT, `lut[input] = output`.
    pub fn lut(&self) -> Vec<u8> {
        self.inner.lut().to_vec()
    }

    /// Canvas position of a curve point, as `[x, y]`.
    pub fn curve_to_canvas(&self, x: u8, y: u8) -> Vec<f32> {
        let (cx, cy) = self.inner.curve_to_canvas(ControlPoint::new(x, y));
        vec![cx, cy]
    }

    /// Index of the selected point, if any.
    #[wasm_bindgen(getter)]
    pub fn selected(&self) -> Option<usize> {
        self.inner.selected()
    }

    /// Whether a debounced delivery is waiting for `poll()`.
    #[wasm_bindgen(getter)]
    pub fn pending(&self) -> bool {
        self.inner.is_pending()
    }

    /// Apply the current curve to every channel of an image.
    pub fn apply(&self, image: &JsImageBuffer) -> JsImageBuffer {
        JsImageBuffer::from_core(self.inner.lut().apply(image.as_core()))
    }

    pub fn free(self) {}
}

impl JsCurveEditor {
    /// Hand any delivered LUT to the JS callback.
    fn dispatch(&mut self) -> Result<(), JsValue> {
        let delivered = self.mailbox.lock().ok().and_then(|mut slot| slot.take());
        let (Some(lut), Some(callback)) = (delivered, self.callback.as_ref()) else {
            return Ok(());
        };
        let bytes = js_sys::Uint8Array::from(&lut.as_array()[..]);
        callback.call1(&JsValue::NULL, &bytes)?;
        Ok(())
    }
}
