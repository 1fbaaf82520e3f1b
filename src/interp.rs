//! One-dimensional interpolation of the blob boundary.
//!
//! A [`BoundaryFunction`] is fitted to `(angle, radius)` samples and maps
//! any angle inside the sampled domain to a radius. Table lookups
//! (nearest, previous, next, linear) work directly on the samples; spline
//! kinds solve for B-spline coefficients with not-a-knot end conditions.

use std::fmt;
use std::str::FromStr;

use ndarray::{Array1, Array2, Zip};
use tracing::debug;

use crate::error::{BlobError, Result};

/// Interpolation strategy used to turn boundary samples into a curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpKind {
    /// Closest sample; half-way points go to the lower sample.
    Nearest,
    /// Closest sample; half-way points go to the upper sample.
    NearestUp,
    /// Last sample at or before the query.
    Previous,
    /// First sample at or after the query.
    Next,
    Linear,
    /// Interpolating B-spline of the given polynomial order.
    Spline(usize),
}

impl InterpKind {
    pub const ZERO: InterpKind = InterpKind::Spline(0);
    pub const SLINEAR: InterpKind = InterpKind::Spline(1);
    pub const QUADRATIC: InterpKind = InterpKind::Spline(2);
    pub const CUBIC: InterpKind = InterpKind::Spline(3);

    /// Fewest samples the strategy can be fitted to.
    pub fn min_samples(&self) -> usize {
        match self {
            InterpKind::Spline(order) => order.saturating_add(1),
            _ => 2,
        }
    }
}

impl Default for InterpKind {
    fn default() -> Self {
        InterpKind::CUBIC
    }
}

impl FromStr for InterpKind {
    type Err = BlobError;

    fn from_str(s: &str) -> Result<Self> {
        let kind = match s.trim() {
            "nearest" => InterpKind::Nearest,
            "nearest-up" => InterpKind::NearestUp,
            "previous" => InterpKind::Previous,
            "next" => InterpKind::Next,
            "linear" => InterpKind::Linear,
            "zero" => InterpKind::ZERO,
            "slinear" => InterpKind::SLINEAR,
            "quadratic" => InterpKind::QUADRATIC,
            "cubic" => InterpKind::CUBIC,
            other => match other.parse::<usize>() {
                Ok(order) => InterpKind::Spline(order),
                Err(_) => {
                    return Err(BlobError::invalid(
                        "interp_kind",
                        format!("unknown interpolation kind `{}`", s),
                    ))
                }
            },
        };
        Ok(kind)
    }
}

impl fmt::Display for InterpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterpKind::Nearest => f.write_str("nearest"),
            InterpKind::NearestUp => f.write_str("nearest-up"),
            InterpKind::Previous => f.write_str("previous"),
            InterpKind::Next => f.write_str("next"),
            InterpKind::Linear => f.write_str("linear"),
            InterpKind::Spline(0) => f.write_str("zero"),
            InterpKind::Spline(1) => f.write_str("slinear"),
            InterpKind::Spline(2) => f.write_str("quadratic"),
            InterpKind::Spline(3) => f.write_str("cubic"),
            InterpKind::Spline(order) => write!(f, "{}", order),
        }
    }
}

/// B-spline in knot/coefficient form.
#[derive(Debug, Clone)]
struct BSpline {
    knots: Vec<f64>,
    coeffs: Vec<f64>,
    order: usize,
}

impl BSpline {
    fn interpolate(x: &[f64], y: &[f64], order: usize) -> Result<Self> {
        let n = x.len();
        let knots = not_a_knot(x, order)?;
        debug_assert_eq!(knots.len(), n + order + 1);

        let mut collocation = Array2::<f64>::zeros((n, n));
        for (row, &xi) in x.iter().enumerate() {
            let span = find_span(&knots, order, n, xi);
            let basis = basis_functions(&knots, order, span, xi);
            for (r, value) in basis.into_iter().enumerate() {
                collocation[[row, span - order + r]] = value;
            }
        }

        let coeffs = solve(collocation, Array1::from(y.to_vec()))?;
        Ok(BSpline {
            knots,
            coeffs: coeffs.to_vec(),
            order,
        })
    }

    fn value_at(&self, x: f64) -> f64 {
        let n = self.coeffs.len();
        let span = find_span(&self.knots, self.order, n, x);
        basis_functions(&self.knots, self.order, span, x)
            .into_iter()
            .enumerate()
            .map(|(r, b)| b * self.coeffs[span - self.order + r])
            .sum()
    }
}

/// Knot vector for an interpolating spline of `order` through `x`.
fn not_a_knot(x: &[f64], order: usize) -> Result<Vec<f64>> {
    let n = x.len();
    let first = x[0];
    let last = x[n - 1];

    let interior: Vec<f64> = match order {
        0 => {
            let mut knots = x.to_vec();
            knots.push(last);
            return Ok(knots);
        }
        1 => x[1..n - 1].to_vec(),
        2 => {
            let mids: Vec<f64> = x.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect();
            mids[1..mids.len() - 1].to_vec()
        }
        k if k % 2 == 1 => {
            let skip = (k - 1) / 2 + 1;
            x[skip..n - skip].to_vec()
        }
        k => {
            return Err(BlobError::invalid(
                "interp_kind",
                format!("even spline orders above 2 are not supported, got {}", k),
            ))
        }
    };

    let mut knots = Vec::with_capacity(n + order + 1);
    knots.extend(std::iter::repeat(first).take(order + 1));
    knots.extend(interior);
    knots.extend(std::iter::repeat(last).take(order + 1));
    Ok(knots)
}

/// Index `l` in `[order, n - 1]` with `knots[l] <= x < knots[l + 1]`.
/// The right end of the domain belongs to the last span.
fn find_span(knots: &[f64], order: usize, n: usize, x: f64) -> usize {
    let upper = knots.partition_point(|&k| k <= x);
    upper.saturating_sub(1).clamp(order, n - 1)
}

/// Non-zero basis functions `B[span - order ..= span]` at `x` (Cox-de Boor).
fn basis_functions(knots: &[f64], order: usize, span: usize, x: f64) -> Vec<f64> {
    let mut basis = vec![0.0; order + 1];
    let mut left = vec![0.0; order + 1];
    let mut right = vec![0.0; order + 1];
    basis[0] = 1.0;

    for j in 1..=order {
        left[j] = x - knots[span + 1 - j];
        right[j] = knots[span + j] - x;
        let mut saved = 0.0;
        for r in 0..j {
            let temp = basis[r] / (right[r + 1] + left[j - r]);
            basis[r] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        basis[j] = saved;
    }

    basis
}

/// Gaussian elimination with partial pivoting.
fn solve(mut a: Array2<f64>, mut b: Array1<f64>) -> Result<Array1<f64>> {
    let n = b.len();

    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&i, &j| a[[i, col]].abs().total_cmp(&a[[j, col]].abs()))
            .unwrap_or(col);
        if a[[pivot, col]].abs() < 1e-12 {
            return Err(BlobError::SingularSystem);
        }
        if pivot != col {
            for j in 0..n {
                a.swap([col, j], [pivot, j]);
            }
            b.swap(col, pivot);
        }

        for row in col + 1..n {
            let factor = a[[row, col]] / a[[col, col]];
            if factor == 0.0 {
                continue;
            }
            for j in col..n {
                a[[row, j]] -= factor * a[[col, j]];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = Array1::<f64>::zeros(n);
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|j| a[[row, j]] * x[j]).sum();
        x[row] = (b[row] - tail) / a[[row, row]];
    }
    Ok(x)
}

#[derive(Debug, Clone)]
enum Fitted {
    Nearest { midpoints: Vec<f64>, round_up: bool },
    Previous,
    Next,
    Linear,
    Spline(BSpline),
}

/// Continuous angle to radius mapping fitted to boundary samples.
#[derive(Debug, Clone)]
pub struct BoundaryFunction {
    angles: Vec<f64>,
    radii: Vec<f64>,
    fitted: Fitted,
}

impl BoundaryFunction {
    /// Fit `kind` through the samples. Angles must be strictly increasing.
    pub fn fit(angles: &[f64], radii: &[f64], kind: InterpKind) -> Result<Self> {
        if angles.len() != radii.len() {
            return Err(BlobError::SampleLengthMismatch {
                angles: angles.len(),
                radii: radii.len(),
            });
        }
        if angles.len() < kind.min_samples() {
            return Err(BlobError::invalid(
                "interp_kind",
                format!(
                    "`{}` needs at least {} samples, got {}",
                    kind,
                    kind.min_samples(),
                    angles.len()
                ),
            ));
        }
        if !angles.windows(2).all(|w| w[0] < w[1]) {
            return Err(BlobError::invalid(
                "angles",
                "sample angles must be strictly increasing",
            ));
        }

        let fitted = match kind {
            InterpKind::Nearest | InterpKind::NearestUp => Fitted::Nearest {
                midpoints: angles.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect(),
                round_up: kind == InterpKind::NearestUp,
            },
            InterpKind::Previous => Fitted::Previous,
            InterpKind::Next => Fitted::Next,
            InterpKind::Linear => Fitted::Linear,
            InterpKind::Spline(order) => Fitted::Spline(BSpline::interpolate(angles, radii, order)?),
        };

        debug!(kind = %kind, samples = angles.len(), "fitted boundary function");

        Ok(BoundaryFunction {
            angles: angles.to_vec(),
            radii: radii.to_vec(),
            fitted,
        })
    }

    /// Closed interval the function is defined on.
    pub fn domain(&self) -> (f64, f64) {
        (self.angles[0], self.angles[self.angles.len() - 1])
    }

    fn check_domain(&self, angle: f64) -> Result<()> {
        let (min, max) = self.domain();
        if angle >= min && angle <= max {
            Ok(())
        } else {
            Err(BlobError::OutOfDomain { angle, min, max })
        }
    }

    pub fn evaluate(&self, angle: f64) -> Result<f64> {
        self.check_domain(angle)?;
        Ok(self.value_at(angle))
    }

    /// Evaluate at every element of `angles`, in parallel.
    ///
    /// The whole grid is checked against the domain before any value is
    /// computed; one stray angle fails the call.
    pub fn evaluate_grid(&self, angles: &Array2<f64>) -> Result<Array2<f64>> {
        for &angle in angles.iter() {
            self.check_domain(angle)?;
        }

        let mut values = Array2::<f64>::zeros(angles.dim());
        Zip::from(&mut values)
            .and(angles)
            .par_for_each(|value, &angle| *value = self.value_at(angle));
        Ok(values)
    }

    fn value_at(&self, angle: f64) -> f64 {
        let last = self.angles.len() - 1;
        match &self.fitted {
            Fitted::Nearest {
                midpoints,
                round_up,
            } => {
                let idx = if *round_up {
                    midpoints.partition_point(|&m| m <= angle)
                } else {
                    midpoints.partition_point(|&m| m < angle)
                };
                self.radii[idx.min(last)]
            }
            Fitted::Previous => {
                let idx = self.angles.partition_point(|&a| a <= angle);
                self.radii[idx.saturating_sub(1)]
            }
            Fitted::Next => {
                let idx = self.angles.partition_point(|&a| a < angle);
                self.radii[idx.min(last)]
            }
            Fitted::Linear => {
                let hi = self.angles.partition_point(|&a| a < angle).clamp(1, last);
                let lo = hi - 1;
                let (x0, x1) = (self.angles[lo], self.angles[hi]);
                let (y0, y1) = (self.radii[lo], self.radii[hi]);
                y0 + (angle - x0) * (y1 - y0) / (x1 - x0)
            }
            Fitted::Spline(spline) => spline.value_at(angle),
        }
    }
}
