//! Curve interpolation through control points.
//!
//! Up to three points interpolate piecewise linearly. Four or more points
//! use a not-a-knot cubic spline, which needs at least four knots. When the
//! spline system cannot be solved, typically because two points share an x
//! value, interpolation falls back to piecewise linear where the later of
//! two equal-x points wins. Outside the control-point range the curve holds
//! the nearest endpoint's y.

use tracing::debug;

/// Pivot magnitude below which the spline system is treated as singular.
const SINGULAR_EPSILON: f64 = 1e-12;

/// Fewest knots a not-a-knot spline accepts.
const MIN_CUBIC_KNOTS: usize = 4;

/// How a [`Interpolant`] evaluates between knots.
#[derive(Debug, Clone, PartialEq)]
pub enum Interpolation {
    /// Straight segments between consecutive knots.
    Linear,
    /// Cubic spline with the given second derivative at each knot.
    Cubic(Vec<f64>),
}

/// A continuous curve fitted to x-sorted knots.
#[derive(Debug, Clone, PartialEq)]
pub struct Interpolant {
    xs: Vec<f64>,
    ys: Vec<f64>,
    interpolation: Interpolation,
}

impl Interpolant {
    /// Fit a curve to knots already sorted by x.
    ///
    /// Fewer than two knots produce the identity curve.
    pub fn fit(knots: &[(f64, f64)]) -> Self {
        let (xs, ys): (Vec<f64>, Vec<f64>) = if knots.len() < 2 {
            (vec![0.0, 255.0], vec![0.0, 255.0])
        } else {
            knots.iter().copied().unzip()
        };

        let interpolation = if xs.len() < MIN_CUBIC_KNOTS {
            Interpolation::Linear
        } else {
            match solve_second_derivatives(&xs, &ys) {
                Some(m) => Interpolation::Cubic(m),
                None => {
                    debug!(knots = xs.len(), "Spline solve failed, using linear interpolation");
                    Interpolation::Linear
                }
            }
        };

        Self { xs, ys, interpolation }
    }

    pub fn interpolation(&self) -> &Interpolation {
        &self.interpolation
    }

    /// True when the smooth solve succeeded.
    pub fn is_cubic(&self) -> bool {
        matches!(self.interpolation, Interpolation::Cubic(_))
    }

    /// Evaluate the curve at `x`.
    pub fn evaluate(&self, x: f64) -> f64 {
        let n = self.xs.len();
        let (first, last) = (self.xs[0], self.xs[n - 1]);
        if x <= first {
            // Equal-x duplicates at the start resolve to the last of the group.
            let i = self.xs.partition_point(|&v| v <= first) - 1;
            return if x < first { self.ys[0] } else { self.ys[i] };
        }
        if x >= last {
            return self.ys[n - 1];
        }

        // Last knot with xs[i] <= x, so xs[i + 1] > x >= xs[i].
        let i = self.xs.partition_point(|&v| v <= x) - 1;
        let (x0, x1) = (self.xs[i], self.xs[i + 1]);
        let (y0, y1) = (self.ys[i], self.ys[i + 1]);
        if x == x0 {
            return y0;
        }
        let h = x1 - x0;

        match &self.interpolation {
            Interpolation::Linear => y0 + (y1 - y0) * (x - x0) / h,
            Interpolation::Cubic(m) => {
                let a = x1 - x;
                let b = x - x0;
                m[i] * a * a * a / (6.0 * h)
                    + m[i + 1] * b * b * b / (6.0 * h)
                    + (y0 / h - m[i] * h / 6.0) * a
                    + (y1 / h - m[i + 1] * h / 6.0) * b
            }
        }
    }

    /// Sample at every input level, clamping to `[0, 255]` and truncating
    /// toward zero.
    pub fn sample(&self) -> [u8; 256] {
        let mut table = [0u8; 256];
        for (i, entry) in table.iter_mut().enumerate() {
            let y = self.evaluate(i as f64);
            *entry = if y.is_finite() {
                y.clamp(0.0, 255.0) as u8
            } else {
                i as u8
            };
        }
        table
    }
}

/// Solve for the knot second derivatives of a not-a-knot cubic spline.
///
/// Returns `None` for fewer than four knots, non-increasing x or a singular
/// system.
fn solve_second_derivatives(xs: &[f64], ys: &[f64]) -> Option<Vec<f64>> {
    let n = xs.len();
    if n < MIN_CUBIC_KNOTS {
        return None;
    }
    let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
    if h.iter().any(|&step| step <= 0.0) {
        return None;
    }

    let mut a = vec![vec![0.0f64; n]; n];
    let mut rhs = vec![0.0f64; n];

    for i in 1..n - 1 {
        a[i][i - 1] = h[i - 1];
        a[i][i] = 2.0 * (h[i - 1] + h[i]);
        a[i][i + 1] = h[i];
        rhs[i] = 6.0 * ((ys[i + 1] - ys[i]) / h[i] - (ys[i] - ys[i - 1]) / h[i - 1]);
    }

    // Third derivative continuous across the first and last interior knots.
    a[0][0] = h[1];
    a[0][1] = -(h[0] + h[1]);
    a[0][2] = h[0];
    a[n - 1][n - 3] = h[n - 2];
    a[n - 1][n - 2] = -(h[n - 3] + h[n - 2]);
    a[n - 1][n - 1] = h[n - 3];

    gaussian_elimination(a, rhs)
}

/// Dense Gaussian elimination with partial pivoting.
fn gaussian_elimination(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n).max_by(|&r, &s| a[r][col].abs().total_cmp(&a[s][col].abs()))?;
        if a[pivot][col].abs() < SINGULAR_EPSILON {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0f64; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    x.iter().all(|v| v.is_finite()).then_some(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn knots(points: &[(i32, i32)]) -> Vec<(f64, f64)> {
        points.iter().map(|&(x, y)| (x as f64, y as f64)).collect()
    }

    #[test]
    fn test_two_points_linear_identity() {
        let curve = Interpolant::fit(&knots(&[(0, 0), (255, 255)]));
        assert_eq!(curve.interpolation(), &Interpolation::Linear);
        let table = curve.sample();
        for (i, &v) in table.iter().enumerate() {
            assert_eq!(v as usize, i);
        }
    }

    #[test]
    fn test_two_points_hold_flat_outside() {
        let curve = Interpolant::fit(&knots(&[(50, 100), (200, 150)]));
        let table = curve.sample();
        assert_eq!(table[0], 100);
        assert_eq!(table[50], 100);
        assert_eq!(table[125], 125);
        assert_eq!(table[200], 150);
        assert_eq!(table[255], 150);
    }

    #[test]
    fn test_three_points_piecewise_linear() {
        let curve = Interpolant::fit(&knots(&[(0, 0), (128, 200), (255, 255)]));
        assert_eq!(curve.interpolation(), &Interpolation::Linear);
        let table = curve.sample();
        assert_eq!(table[64], 100);
        assert_eq!(table[128], 200);
        // 200 + 55 * 64 / 127 = 227.7
        assert_eq!(table[192], 227);
    }

    #[test]
    fn test_four_points_cubic() {
        let curve = Interpolant::fit(&knots(&[(0, 0), (64, 40), (192, 215), (255, 255)]));
        assert!(curve.is_cubic());
    }

    #[test]
    fn test_sample_truncates() {
        // 128 / 255 = 0.502 and 3 * 128 / 255 = 1.506
        let table = Interpolant::fit(&knots(&[(0, 0), (255, 128)])).sample();
        assert_eq!(table[1], 0);
        assert_eq!(table[3], 1);
        assert_eq!(table[255], 128);
    }

    #[test]
    fn test_sample_hits_cubic_knots_exactly() {
        let pts = knots(&[(0, 0), (64, 30), (128, 140), (192, 220), (255, 255)]);
        let table = Interpolant::fit(&pts).sample();
        for &(x, y) in &pts {
            assert_eq!(table[x as usize] as f64, y);
        }
    }

    #[test]
    fn test_solve_needs_four_knots() {
        assert!(solve_second_derivatives(&[0.0, 100.0, 255.0], &[0.0, 50.0, 255.0]).is_none());
    }

    #[test]
    fn test_cubic_reproduced_exactly() {
        // Not-a-knot splines reproduce cubics.
        let f = |x: f64| 1e-5 * x * x * x - 2e-3 * x * x + 0.9 * x + 3.0;
        let pts: Vec<(f64, f64)> = [0.0, 40.0, 90.0, 170.0, 255.0].iter().map(|&x| (x, f(x))).collect();
        let curve = Interpolant::fit(&pts);
        assert!(curve.is_cubic());
        for x in [5.0, 60.0, 128.0, 230.0] {
            assert!((curve.evaluate(x) - f(x)).abs() < 1e-6, "x = {}", x);
        }
    }

    #[test]
    fn test_passes_through_knots() {
        let pts = knots(&[(0, 0), (64, 30), (128, 140), (192, 220), (255, 255)]);
        let curve = Interpolant::fit(&pts);
        for &(x, y) in &pts {
            assert!((curve.evaluate(x) - y).abs() < 1e-9);
        }
    }

    #[test]
    fn test_duplicate_x_falls_back_to_linear() {
        let curve = Interpolant::fit(&knots(&[(0, 0), (100, 50), (100, 200), (255, 255)]));
        assert_eq!(curve.interpolation(), &Interpolation::Linear);
        let table = curve.sample();
        // Later duplicate wins at and after the shared x.
        assert_eq!(table[100], 200);
        assert_eq!(table[50], 25);
        assert_eq!(table[255], 255);
    }

    #[test]
    fn test_duplicate_first_x() {
        let curve = Interpolant::fit(&knots(&[(0, 10), (0, 40), (255, 255), (255, 255)]));
        assert_eq!(curve.sample()[0], 40);
    }

    #[test]
    fn test_clamps_overshoot() {
        let curve = Interpolant::fit(&knots(&[(0, 0), (20, 255), (40, 0), (255, 255)]));
        let table = curve.sample();
        // Overshoot beyond [0, 255] must be clamped rather than wrap.
        assert_eq!(table[20], 255);
        assert_eq!(table[40], 0);
    }

    #[test]
    fn test_too_few_knots_is_identity() {
        let table = Interpolant::fit(&[]).sample();
        assert_eq!(table[77], 77);
    }

    #[test]
    fn test_gaussian_elimination_singular() {
        let a = vec![vec![1.0, 2.0], vec![2.0, 4.0]];
        assert!(gaussian_elimination(a, vec![1.0, 2.0]).is_none());
    }

    #[test]
    fn test_gaussian_elimination_pivots() {
        let a = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
        let x = gaussian_elimination(a, vec![3.0, 4.0]).unwrap();
        assert_eq!(x, vec![4.0, 3.0]);
    }
}
