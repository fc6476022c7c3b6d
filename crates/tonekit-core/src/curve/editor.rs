//! Pointer-gesture state machine over a [`CurveModel`].
//!
//! The editor translates canvas coordinates (origin top-left, y down) into
//! curve coordinates (origin bottom-left, y up), applies add, move and delete
//! gestures, and notifies a listener with the recomputed [`Lut`].
//!
//! Edits schedule a debounced notification that the host delivers by calling
//! [`CurveEditor::poll`]. Release, reset and point import notify immediately.
//! A double press only adds a point; the next notification carries it.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ControlPoint, CurveModel, Lut};
use crate::debounce::{Clock, Debouncer, SystemClock};
use crate::error::EngineError;

/// Maximum per-axis distance at which a double press reuses an existing point.
const DOUBLE_PRESS_TOLERANCE: i32 = 10;

/// Callback receiving each delivered LUT.
pub type LutListener = Box<dyn FnMut(&Lut) + Send>;

/// Editor geometry and timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Canvas width in pixels
    pub canvas_width: u32,
    /// Canvas height in pixels
    pub canvas_height: u32,
    /// Hit-test radius around a control point, in canvas pixels
    pub point_radius: f32,
    /// Pointer travel before a press turns into a drag
    pub click_threshold: f32,
    /// Quiescence interval for edit notifications
    pub debounce: Duration,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: 256,
            canvas_height: 256,
            point_radius: 8.0,
            click_threshold: 5.0,
            debounce: Duration::from_millis(100),
        }
    }
}

/// Interactive curve editor.
pub struct CurveEditor<C: Clock = SystemClock> {
    config: EditorConfig,
    model: CurveModel,
    debouncer: Debouncer<C>,
    selected: Option<usize>,
    press_origin: Option<(f32, f32)>,
    dragging: bool,
    listener: Option<LutListener>,
}

impl CurveEditor<SystemClock> {
    /// Editor on the system clock.
    pub fn new(config: EditorConfig) -> Self {
        Self::with_clock(config, SystemClock::default())
    }
}

impl Default for CurveEditor<SystemClock> {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl<C: Clock> fmt::Debug for CurveEditor<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurveEditor")
            .field("config", &self.config)
            .field("points", &self.model.points())
            .field("selected", &self.selected)
            .field("dragging", &self.dragging)
            .field("pending", &self.debouncer.is_pending())
            .finish()
    }
}

impl<C: Clock> CurveEditor<C> {
    pub fn with_clock(config: EditorConfig, clock: C) -> Self {
        let debouncer = Debouncer::with_clock(config.debounce, clock);
        Self {
            config,
            model: CurveModel::new(),
            debouncer,
            selected: None,
            press_origin: None,
            dragging: false,
            listener: None,
        }
    }

    /// Register the LUT listener, replacing any previous one.
    pub fn on_change(&mut self, listener: impl FnMut(&Lut) + Send + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn model(&self) -> &CurveModel {
        &self.model
    }

    /// Control points in x order.
    pub fn points(&self) -> &[ControlPoint] {
        self.model.points()
    }

    /// Current LUT, recomputed on demand.
    pub fn lut(&self) -> &Lut {
        self.model.lut()
    }

    /// Index of the selected point, if any.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Whether a debounced notification is waiting.
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    // ------------------------------------------------------------------------
    // Coordinates
    // ------------------------------------------------------------------------

    /// Translate a canvas position to curve coordinates.
    pub fn canvas_to_curve(&self, canvas_x: f32, canvas_y: f32) -> ControlPoint {
        let sx = axis_scale(self.config.canvas_width);
        let sy = axis_scale(self.config.canvas_height);
        let x = (canvas_x * sx).round().clamp(0.0, 255.0);
        let y = (255.0 - (canvas_y * sy).round()).clamp(0.0, 255.0);
        ControlPoint::new(x as u8, y as u8)
    }

    /// Translate a curve point to its canvas position.
    pub fn curve_to_canvas(&self, point: ControlPoint) -> (f32, f32) {
        let sx = axis_scale(self.config.canvas_width);
        let sy = axis_scale(self.config.canvas_height);
        (point.x as f32 / sx, (255.0 - point.y as f32) / sy)
    }

    /// First point within `point_radius` of the canvas position.
    pub fn hit_test(&self, canvas_x: f32, canvas_y: f32) -> Option<usize> {
        self.model.points().iter().position(|&p| {
            let (px, py) = self.curve_to_canvas(p);
            let (dx, dy) = (canvas_x - px, canvas_y - py);
            (dx * dx + dy * dy).sqrt() <= self.config.point_radius
        })
    }

    // ------------------------------------------------------------------------
    // Gestures
    // ------------------------------------------------------------------------

    /// Primary press: select the point under the pointer or add a new one.
    pub fn press(&mut self, canvas_x: f32, canvas_y: f32) {
        self.press_origin = Some((canvas_x, canvas_y));
        self.dragging = false;
        match self.hit_test(canvas_x, canvas_y) {
            Some(index) => {
                self.selected = Some(index);
            }
            None => {
                let point = self.canvas_to_curve(canvas_x, canvas_y);
                let index = self.model.insert(point);
                debug!(index, x = point.x, y = point.y, "Control point added");
                self.selected = None;
                self.debouncer.schedule();
            }
        }
    }

    /// Pointer motion with the primary button held.
    ///
    /// Moves the selected point once the pointer has left the click
    /// threshold. Boundary points stay put. Returns whether the curve changed.
    pub fn drag(&mut self, canvas_x: f32, canvas_y: f32) -> bool {
        let (Some(index), Some((ox, oy))) = (self.selected, self.press_origin) else {
            return false;
        };
        if self.model.is_boundary(index) {
            return false;
        }
        if !self.dragging {
            let (dx, dy) = (canvas_x - ox, canvas_y - oy);
            if (dx * dx + dy * dy).sqrt() <= self.config.click_threshold {
                return false;
            }
            self.dragging = true;
        }

        let target = self.canvas_to_curve(canvas_x, canvas_y);
        let Some(moved) = self.model.move_point(index, target) else {
            return false;
        };
        self.selected = Some(moved);
        self.debouncer.schedule();
        true
    }

    /// Primary release: end the drag and deliver immediately.
    pub fn release(&mut self) {
        self.clear_interaction();
        self.deliver_now();
    }

    /// Secondary press: delete the interior point under the pointer.
    ///
    /// Boundary points and curves with only two points are left alone.
    pub fn secondary_press(&mut self, canvas_x: f32, canvas_y: f32) -> bool {
        let Some(index) = self.hit_test(canvas_x, canvas_y) else {
            return false;
        };
        if !self.model.remove(index) {
            return false;
        }
        debug!(index, "Control point removed");
        self.clear_interaction();
        self.debouncer.schedule();
        true
    }

    /// Double press: add a point unless one already sits within
    /// 10 levels on both axes. Schedules no notification.
    pub fn double_press(&mut self, canvas_x: f32, canvas_y: f32) -> bool {
        let target = self.canvas_to_curve(canvas_x, canvas_y);
        let occupied = self.model.points().iter().any(|p| {
            (p.x as i32 - target.x as i32).abs() < DOUBLE_PRESS_TOLERANCE
                && (p.y as i32 - target.y as i32).abs() < DOUBLE_PRESS_TOLERANCE
        });
        if occupied {
            return false;
        }
        let index = self.model.insert(target);
        debug!(index, x = target.x, y = target.y, "Control point added");
        true
    }

    /// Restore the identity curve and deliver immediately.
    pub fn reset(&mut self) {
        self.model.reset();
        self.clear_interaction();
        self.deliver_now();
    }

    /// Replace all control points and deliver immediately.
    ///
    /// Rejects fewer than two points or coordinates outside `[0, 255]`,
    /// leaving the current curve untouched.
    pub fn set_points(&mut self, pairs: &[(i32, i32)]) -> Result<(), EngineError> {
        self.model = CurveModel::from_pairs(pairs)?;
        self.clear_interaction();
        self.deliver_now();
        Ok(())
    }

    /// Deliver the debounced notification if its deadline has passed.
    pub fn poll(&mut self) -> bool {
        if self.debouncer.poll() {
            self.deliver();
            true
        } else {
            false
        }
    }

    fn clear_interaction(&mut self) {
        self.selected = None;
        self.press_origin = None;
        self.dragging = false;
    }

    fn deliver_now(&mut self) {
        self.debouncer.flush();
        self.deliver();
    }

    fn deliver(&mut self) {
        let lut = *self.model.lut();
        if let Some(listener) = self.listener.as_mut() {
            listener(&lut);
        }
    }
}

/// Canvas pixels to curve levels along one axis.
fn axis_scale(extent: u32) -> f32 {
    if extent <= 1 {
        1.0
    } else {
        255.0 / (extent - 1) as f32
    }
}
