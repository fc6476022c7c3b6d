//! Control-point curves and the 256-entry lookup tables derived from them.
//!
//! A [`CurveModel`] owns an x-sorted list of [`ControlPoint`]s and caches
//! its [`Lut`]. Any edit drops the cache; the next [`CurveModel::lut`] call
//! recomputes it through [`spline::Interpolant`].

pub mod editor;
pub mod spline;

use std::cell::OnceCell;

use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

use crate::buffer::ImageBuffer;
use crate::error::EngineError;
use crate::ops::{apply_lut, IDENTITY_LUT};

pub use editor::{CurveEditor, EditorConfig, LutListener};
pub use spline::{Interpolant, Interpolation};

// ============================================================================
// Control Points
// ============================================================================

/// Curve anchor in level space: input `x`, output `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ControlPoint {
    pub x: u8,
    pub y: u8,
}

impl ControlPoint {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Validate an integer pair, rejecting coordinates outside `[0, 255]`.
    pub fn try_from_pair(x: i32, y: i32) -> Result<Self, EngineError> {
        let check = |v: i32, axis: &str| {
            u8::try_from(v).map_err(|_| {
                EngineError::InvalidCurve(format!("{axis} coordinate {v} outside 0..=255"))
            })
        };
        Ok(Self::new(check(x, "x")?, check(y, "y")?))
    }
}

/// The default curve: black to black, white to white.
pub const DEFAULT_POINTS: [ControlPoint; 2] = [ControlPoint::new(0, 0), ControlPoint::new(255, 255)];

// ============================================================================
// LUT Type
// ============================================================================

/// Pre-computed 256-entry lookup table: `lut[input] = output`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lut([u8; 256]);

impl Lut {
    /// Identity LUT (no change).
    pub const fn identity() -> Self {
        Self(IDENTITY_LUT)
    }

    pub const fn from_table(table: [u8; 256]) -> Self {
        Self(table)
    }

    /// Output level for `input`.
    #[inline]
    pub fn get(&self, input: u8) -> u8 {
        self.0[input as usize]
    }

    pub fn as_array(&self) -> &[u8; 256] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    /// Check if this LUT is identity.
    pub fn is_identity(&self) -> bool {
        self.0 == IDENTITY_LUT
    }

    /// Remap every channel of an image through this table.
    pub fn apply(&self, image: &ImageBuffer) -> ImageBuffer {
        apply_lut(image, &self.0)
    }
}

impl Default for Lut {
    fn default() -> Self {
        Self::identity()
    }
}

impl Serialize for Lut {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter())
    }
}

// ============================================================================
// Curve Model
// ============================================================================

/// Ordered control points plus a lazily rebuilt LUT.
///
/// Holds at least two points at all times. The first and last points in x
/// order are the boundary points: they can be neither deleted nor moved.
#[derive(Debug, Clone)]
pub struct CurveModel {
    points: Vec<ControlPoint>,
    lut: OnceCell<Lut>,
}

impl Default for CurveModel {
    fn default() -> Self {
        Self {
            points: DEFAULT_POINTS.to_vec(),
            lut: OnceCell::new(),
        }
    }
}

impl PartialEq for CurveModel {
    fn eq(&self, other: &Self) -> bool {
        self.points == other.points
    }
}

impl CurveModel {
    /// The identity curve `[(0, 0), (255, 255)]`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a model from points in any order.
    ///
    /// Points are stably sorted by x so equal-x points keep their relative
    /// order. Fewer than two points are rejected.
    pub fn from_points(mut points: Vec<ControlPoint>) -> Result<Self, EngineError> {
        if points.len() < 2 {
            return Err(EngineError::InvalidCurve(format!(
                "at least 2 control points required, got {}",
                points.len()
            )));
        }
        points.sort_by_key(|p| p.x);
        Ok(Self {
            points,
            lut: OnceCell::new(),
        })
    }

    /// Build a model from raw integer pairs, validating their range.
    pub fn from_pairs(pairs: &[(i32, i32)]) -> Result<Self, EngineError> {
        let points = pairs
            .iter()
            .map(|&(x, y)| ControlPoint::try_from_pair(x, y))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_points(points)
    }

    /// Control points in x order.
    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }

    /// Control points as integer pairs, for export.
    pub fn to_pairs(&self) -> Vec<(i32, i32)> {
        self.points.iter().map(|p| (p.x as i32, p.y as i32)).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; a model holds at least two points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// True for the first and last point in x order.
    pub fn is_boundary(&self, index: usize) -> bool {
        index == 0 || index + 1 == self.points.len()
    }

    /// Restore the two default boundary points.
    pub fn reset(&mut self) {
        self.points = DEFAULT_POINTS.to_vec();
        self.invalidate();
    }

    /// Insert a point, keeping x order, and return its index.
    ///
    /// A point sharing x with existing points goes after them, except that
    /// the current last point stays last.
    pub fn insert(&mut self, point: ControlPoint) -> usize {
        let last_x = self.points[self.points.len() - 1].x;
        let index = if point.x == last_x {
            self.points.len() - 1
        } else {
            self.points.partition_point(|p| p.x <= point.x)
        };
        self.points.insert(index, point);
        self.invalidate();
        index
    }

    /// Move the point at `index` toward `to` and return its new index.
    ///
    /// Interior points are clamped between the boundaries and re-sorted.
    /// Returns `None`, leaving the curve untouched, for a boundary point or
    /// an out-of-range index.
    pub fn move_point(&mut self, index: usize, to: ControlPoint) -> Option<usize> {
        if index >= self.points.len() || self.is_boundary(index) {
            return None;
        }

        let first_x = self.points[0].x;
        let last_x = self.points[self.points.len() - 1].x;
        let moved = ControlPoint::new(to.x.clamp(first_x, last_x), to.y);

        self.points.remove(index);
        let upper = self.points.len() - 1;
        let target = self.points.partition_point(|p| p.x <= moved.x).clamp(1, upper);
        self.points.insert(target, moved);
        self.invalidate();
        Some(target)
    }

    /// Delete an interior point.
    ///
    /// Refused (returns `false`) for boundary points, out-of-range indices,
    /// or when fewer than three points exist.
    pub fn remove(&mut self, index: usize) -> bool {
        if self.points.len() < 3 || index >= self.points.len() || self.is_boundary(index) {
            return false;
        }
        self.points.remove(index);
        self.invalidate();
        true
    }

    /// The cached LUT, recomputed if an edit invalidated it.
    pub fn lut(&self) -> &Lut {
        self.lut.get_or_init(|| {
            let lut = Lut::from_table(self.interpolant().sample());
            debug!(points = self.points.len(), identity = lut.is_identity(), "LUT recomputed");
            lut
        })
    }

    /// Continuous curve through the current points, for drawing.
    pub fn interpolant(&self) -> Interpolant {
        let knots: Vec<(f64, f64)> = self
            .points
            .iter()
            .map(|p| (p.x as f64, p.y as f64))
            .collect();
        Interpolant::fit(&knots)
    }

    /// Curve value at a fractional input level, clamped to `[0, 255]`.
    pub fn evaluate(&self, x: f32) -> f32 {
        (self.interpolant().evaluate(x as f64) as f32).clamp(0.0, 255.0)
    }

    fn invalidate(&mut self) {
        self.lut.take();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn s_curve() -> CurveModel {
        CurveModel::from_pairs(&[(0, 0), (64, 40), (192, 215), (255, 255)]).unwrap()
    }

    #[test]
    fn test_identity_lut() {
        let lut = Lut::identity();
        assert!(lut.is_identity());
        for i in 0..=255u8 {
            assert_eq!(lut.get(i), i);
        }
    }

    #[test]
    fn test_default_model_is_identity() {
        let model = CurveModel::new();
        assert_eq!(model.points(), &DEFAULT_POINTS);
        assert!(model.lut().is_identity());
    }

    #[test]
    fn test_s_curve_increases_contrast() {
        let lut = *s_curve().lut();
        assert!(lut.get(64) < 64, "Shadows not darkened");
        assert!(lut.get(192) > 192, "Highlights not brightened");
    }

    #[test]
    fn test_from_points_sorts() {
        let model = CurveModel::from_pairs(&[(255, 255), (0, 0), (100, 80)]).unwrap();
        let xs: Vec<u8> = model.points().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0, 100, 255]);
    }

    #[test]
    fn test_from_points_requires_two() {
        assert!(matches!(
            CurveModel::from_pairs(&[(10, 10)]),
            Err(EngineError::InvalidCurve(_))
        ));
    }

    #[test]
    fn test_from_pairs_rejects_out_of_range() {
        assert!(CurveModel::from_pairs(&[(0, 0), (256, 255)]).is_err());
        assert!(CurveModel::from_pairs(&[(0, -1), (255, 255)]).is_err());
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut model = CurveModel::new();
        assert_eq!(model.insert(ControlPoint::new(128, 100)), 1);
        assert_eq!(model.insert(ControlPoint::new(64, 30)), 1);
        assert_eq!(model.insert(ControlPoint::new(128, 140)), 3);
        let xs: Vec<u8> = model.points().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0, 64, 128, 128, 255]);
    }

    #[test]
    fn test_insert_at_last_x_stays_interior() {
        let mut model = CurveModel::new();
        assert_eq!(model.insert(ControlPoint::new(255, 10)), 1);
        assert_eq!(model.points()[2], ControlPoint::new(255, 255));
    }

    #[test]
    fn test_insert_invalidates_lut() {
        let mut model = CurveModel::new();
        assert!(model.lut().is_identity());
        model.insert(ControlPoint::new(128, 200));
        assert!(!model.lut().is_identity());
        assert_eq!(model.lut().get(128), 200);
    }

    #[test]
    fn test_move_boundary_is_noop() {
        let mut model = CurveModel::new();
        assert_eq!(model.move_point(0, ControlPoint::new(0, 100)), None);
        assert_eq!(model.move_point(1, ControlPoint::new(10, 200)), None);
        assert_eq!(model.points(), &DEFAULT_POINTS);
        assert!(model.lut().is_identity());

        let mut curve = s_curve();
        let before = *curve.lut();
        assert_eq!(curve.move_point(3, ControlPoint::new(255, 0)), None);
        assert_eq!(curve.points()[3], ControlPoint::new(255, 255));
        assert_eq!(curve.lut(), &before);
    }

    #[test]
    fn test_move_interior_resorts() {
        let mut model = CurveModel::from_pairs(&[(0, 0), (50, 50), (200, 200), (255, 255)]).unwrap();
        let index = model.move_point(1, ControlPoint::new(220, 100)).unwrap();
        assert_eq!(index, 2);
        assert_eq!(model.points()[2], ControlPoint::new(220, 100));
        assert_eq!(model.points()[1], ControlPoint::new(200, 200));
    }

    #[test]
    fn test_move_interior_to_edge_stays_interior() {
        let mut model = CurveModel::from_pairs(&[(10, 0), (50, 50), (245, 255)]).unwrap();
        assert_eq!(model.move_point(1, ControlPoint::new(255, 90)), Some(1));
        assert_eq!(model.points()[1], ControlPoint::new(245, 90));
        assert_eq!(model.points()[2], ControlPoint::new(245, 255));
        assert_eq!(model.move_point(1, ControlPoint::new(0, 90)), Some(1));
        assert_eq!(model.points()[1], ControlPoint::new(10, 90));
    }

    #[test]
    fn test_move_out_of_range_index() {
        let mut model = CurveModel::new();
        assert_eq!(model.move_point(2, ControlPoint::new(1, 1)), None);
    }

    #[test]
    fn test_remove_boundary_refused() {
        let mut model = s_curve();
        assert!(!model.remove(0));
        assert!(!model.remove(3));
        assert_eq!(model.len(), 4);
        assert!(model.remove(1));
        assert_eq!(model.len(), 3);
    }

    #[test]
    fn test_remove_refused_at_two_points() {
        let mut model = CurveModel::new();
        assert!(!model.remove(0));
        assert!(!model.remove(1));
        assert_eq!(model.len(), 2);
    }

    #[test]
    fn test_reset_restores_identity() {
        let mut model = s_curve();
        assert!(!model.lut().is_identity());
        model.reset();
        assert_eq!(model.points(), &DEFAULT_POINTS);
        assert_eq!(model.lut().to_vec(), (0..=255u8).collect::<Vec<_>>());
    }

    #[test]
    fn test_lut_apply() {
        let model = CurveModel::from_pairs(&[(0, 255), (255, 0)]).unwrap();
        let img = ImageBuffer::filled(1, 1, [0, 128, 255]);
        assert_eq!(model.lut().apply(&img).data(), &[255, 127, 0]);
    }

    #[test]
    fn test_evaluate_clamps() {
        let model = CurveModel::from_pairs(&[(0, 0), (20, 255), (40, 0), (255, 255)]).unwrap();
        for i in 0..=255 {
            let y = model.evaluate(i as f32);
            assert!((0.0..=255.0).contains(&y));
        }
    }

    #[test]
    fn test_pairs_round_trip() {
        let pairs = vec![(0, 0), (64, 40), (192, 215), (255, 255)];
        assert_eq!(CurveModel::from_pairs(&pairs).unwrap().to_pairs(), pairs);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Edit {
        Insert(u8, u8),
        Move(usize, u8, u8),
        Remove(usize),
    }

    fn edit_strategy() -> impl Strategy<Value = Edit> {
        prop_oneof![
            (any::<u8>(), any::<u8>()).prop_map(|(x, y)| Edit::Insert(x, y)),
            (0usize..10, any::<u8>(), any::<u8>()).prop_map(|(i, x, y)| Edit::Move(i, x, y)),
            (0usize..10).prop_map(Edit::Remove),
        ]
    }

    proptest! {
        /// Property: any edit sequence keeps >= 2 points, x order, and fixed boundary x.
        #[test]
        fn prop_edits_keep_invariants(edits in prop::collection::vec(edit_strategy(), 0..30)) {
            let mut model = CurveModel::new();
            for edit in edits {
                match edit {
                    Edit::Insert(x, y) => { model.insert(ControlPoint::new(x, y)); }
                    Edit::Move(i, x, y) => { model.move_point(i, ControlPoint::new(x, y)); }
                    Edit::Remove(i) => { model.remove(i); }
                }
                prop_assert!(model.len() >= 2);
                prop_assert!(model.points().windows(2).all(|w| w[0].x <= w[1].x));
                prop_assert_eq!(model.points()[0].x, 0);
                prop_assert_eq!(model.points()[model.len() - 1].x, 255);
            }
        }

        /// Property: deleting a boundary never changes the point count.
        #[test]
        fn prop_boundary_delete_is_noop(xs in prop::collection::vec(1u8..255, 0..6)) {
            let mut model = CurveModel::new();
            for x in xs {
                model.insert(ControlPoint::new(x, x));
            }
            let before = model.len();
            let last = model.len() - 1;
            prop_assert!(!model.remove(0));
            prop_assert!(!model.remove(last));
            prop_assert_eq!(model.len(), before);
        }

        /// Property: moving a boundary never changes the points.
        #[test]
        fn prop_boundary_move_is_noop(xs in prop::collection::vec(1u8..255, 0..6), x in any::<u8>(), y in any::<u8>()) {
            let mut model = CurveModel::new();
            for x in xs {
                model.insert(ControlPoint::new(x, x));
            }
            let before = model.points().to_vec();
            let last = model.len() - 1;
            prop_assert_eq!(model.move_point(0, ControlPoint::new(x, y)), None);
            prop_assert_eq!(model.move_point(last, ControlPoint::new(x, y)), None);
            prop_assert_eq!(model.points(), &before[..]);
        }

        /// Property: reset always yields the identity table.
        #[test]
        fn prop_reset_identity(xs in prop::collection::vec((0u8..=255, 0u8..=255), 0..6)) {
            let mut model = CurveModel::new();
            for (x, y) in xs {
                model.insert(ControlPoint::new(x, y));
            }
            model.reset();
            prop_assert!(model.lut().is_identity());
        }
    }
}
