//! The blob synthesizer.
//!
//! A blob is a circle of radius `height / 2` whose radius has been pulled
//! inwards by a random amount at `num_of_points` evenly spaced angles. The
//! samples are closed into a loop, interpolated into a boundary function
//! of the angle and every pixel whose distance from the center is below
//! the boundary at its angle is marked as inside.

use std::f64::consts::PI;

use ndarray::{Array2, Zip};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, info, trace};

use crate::error::{BlobError, Result};
use crate::grid::PolarGrid;
use crate::interp::{BoundaryFunction, InterpKind};
use crate::mask::Mask;
use crate::params::BlobParams;

/// Draw `num_of_points` radii uniformly from `[low, center)`.
///
/// `low` is `center - fluctuation_range` rounded up and never below 1, so
/// ratios above 1 cannot produce a non-positive radius. When that leaves
/// an empty range every radius is `center` and no entropy is consumed.
pub fn sample_radii<R: Rng + ?Sized>(params: &BlobParams, rng: &mut R) -> Vec<usize> {
    let center = params.center();
    let low = (center as f64 - params.fluctuation_range()).ceil().max(1.0) as usize;

    if low >= center {
        debug!(center, "empty fluctuation range, using a circle");
        return vec![center; params.num_of_points];
    }

    debug!(low, high = center, "sampling boundary radii");
    (0..params.num_of_points)
        .map(|_| rng.gen_range(low..center))
        .collect()
}

/// Closed loop of `(angle, radius)` samples covering `[-PI, PI]`.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundarySamples {
    pub angles: Vec<f64>,
    pub radii: Vec<f64>,
}

impl BoundarySamples {
    /// Spread `radii` evenly from `-PI` and repeat the first one at `PI`.
    pub fn close(radii: &[usize]) -> Result<Self> {
        if radii.len() < 2 {
            return Err(BlobError::invalid(
                "num_of_points",
                format!("need at least 2 samples, got {}", radii.len()),
            ));
        }

        let step = 2.0 * PI / radii.len() as f64;
        let mut angles: Vec<f64> = (0..radii.len()).map(|i| -PI + i as f64 * step).collect();
        angles.push(PI);

        let mut closed: Vec<f64> = radii.iter().map(|&r| r as f64).collect();
        closed.push(closed[0]);

        Ok(BoundarySamples {
            angles,
            radii: closed,
        })
    }

    pub fn fit(&self, kind: InterpKind) -> Result<BoundaryFunction> {
        BoundaryFunction::fit(&self.angles, &self.radii, kind)
    }
}

/// Generate one blob mask.
pub fn generate<R: Rng + ?Sized>(params: &BlobParams, rng: &mut R) -> Result<Mask> {
    params.validate()?;

    let radii = sample_radii(params, rng);
    let samples = BoundarySamples::close(&radii)?;
    let boundary = samples.fit(params.interp_kind)?;

    let grid = PolarGrid::new(params.height);
    let limit = boundary.evaluate_grid(&grid.theta)?;

    let mut pixels = Array2::<u8>::zeros(grid.radius.dim());
    Zip::from(&mut pixels)
        .and(&grid.radius)
        .and(&limit)
        .par_for_each(|pixel, &radius, &bound| *pixel = u8::from(radius < bound));

    let mask = Mask::from_array(pixels);
    trace!(height = params.height, filled = mask.filled(), "generated blob");
    Ok(mask)
}

/// Generate `count` blobs one after another from the same random source.
///
/// Stops at the first failure.
pub fn generate_many<R: Rng + ?Sized>(
    count: usize,
    params: &BlobParams,
    rng: &mut R,
) -> Result<Vec<Mask>> {
    params.validate()?;
    let masks = (0..count)
        .map(|_| generate(params, &mut *rng))
        .collect::<Result<Vec<_>>>()?;
    info!(count, height = params.height, "generated blobs");
    Ok(masks)
}

/// Generate `count` blobs in parallel.
///
/// Blob `i` draws from its own ChaCha stream `i` of `seed`, so the output
/// does not depend on how the work is scheduled.
pub fn generate_many_par(count: usize, params: &BlobParams, seed: u64) -> Result<Vec<Mask>> {
    params.validate()?;
    let masks = (0..count)
        .into_par_iter()
        .map(|i| generate(params, &mut blob_rng(seed, i)))
        .collect::<Result<Vec<_>>>()?;
    info!(count, height = params.height, seed, "generated blobs in parallel");
    Ok(masks)
}

/// Random stream used for blob `index` of a seeded batch.
pub fn blob_rng(seed: u64, index: usize) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(index as u64);
    rng
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    fn assert_binary_square(mask: &Mask, height: usize) {
        assert_eq!(mask.as_array().dim(), (height, height));
        assert!(mask.as_array().iter().all(|&v| v == 0 || v == 1));
    }

    #[test]
    fn test_shape_invariant() {
        let kinds = [
            InterpKind::Nearest,
            InterpKind::Previous,
            InterpKind::Linear,
            InterpKind::QUADRATIC,
            InterpKind::CUBIC,
            InterpKind::Spline(5),
        ];
        let mut rng = rng();
        for height in [1, 2, 7, 32, 65] {
            for kind in kinds {
                let params = BlobParams::new(height, 0.6, 12, kind);
                let mask = generate(&params, &mut rng).unwrap();
                assert_binary_square(&mask, height);
            }
        }
    }

    #[test]
    fn test_closure_invariant() {
        let mut rng = rng();
        let params = BlobParams::new(50, 0.5, 7, InterpKind::CUBIC);
        let samples = BoundarySamples::close(&sample_radii(&params, &mut rng)).unwrap();

        assert_eq!(samples.angles.len(), 8);
        assert_eq!(samples.radii.len(), 8);
        assert_eq!(samples.angles[0], -PI);
        assert_eq!(samples.angles[7], PI);
        assert_eq!(samples.radii[0], samples.radii[7]);
        assert!(samples.angles.windows(2).all(|w| w[0] < w[1]));

        let boundary = samples.fit(InterpKind::CUBIC).unwrap();
        let at_start = boundary.evaluate(-PI).unwrap();
        let at_end = boundary.evaluate(PI).unwrap();
        assert!((at_start - at_end).abs() < 1e-9);
    }

    #[test]
    fn test_close_requires_two_radii() {
        assert!(matches!(
            BoundarySamples::close(&[4]),
            Err(BlobError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_deterministic_under_fixed_seed() {
        let params = BlobParams::new(64, 0.7, 20, InterpKind::CUBIC);
        let first = generate(&params, &mut ChaCha8Rng::seed_from_u64(7)).unwrap();
        let second = generate(&params, &mut ChaCha8Rng::seed_from_u64(7)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_fluctuation_bounds() {
        let center = 50;
        for ratio in [0.1, 0.25, 0.5, 0.75, 1.0] {
            let params = BlobParams::new(2 * center, ratio, 64, InterpKind::Linear);
            let radii = sample_radii(&params, &mut rng());
            let min = *radii.iter().min().unwrap();
            let max = *radii.iter().max().unwrap();

            assert!(max <= center, "ratio {} max {}", ratio, max);
            assert!(
                min as f64 >= center as f64 - center as f64 * ratio,
                "ratio {} min {}",
                ratio,
                min
            );
        }
    }

    #[test]
    fn test_large_ratio_is_clamped() {
        let params = BlobParams::new(20, 3.0, 200, InterpKind::Linear);
        let radii = sample_radii(&params, &mut rng());
        assert!(radii.iter().all(|&r| (1..10).contains(&r)));
        assert!(generate(&params, &mut rng()).is_ok());
    }

    #[test]
    fn test_zero_fluctuation_is_a_disk() {
        let params = BlobParams::new(10, 0.0, 8, InterpKind::Linear);
        let mask = generate(&params, &mut rng()).unwrap();

        assert!(mask.is_inside(5, 5));
        for (row, col) in [(0, 0), (0, 9), (9, 0), (9, 9)] {
            assert!(!mask.is_inside(row, col), "corner ({}, {})", row, col);
        }
        for ((row, col), &value) in mask.as_array().indexed_iter() {
            let dy = row as i64 - 5;
            let dx = col as i64 - 5;
            assert_eq!(value == 1, dx * dx + dy * dy < 25, "pixel ({}, {})", row, col);
        }
    }

    #[test]
    fn test_two_points() {
        let linear = BlobParams::new(4, 0.5, 2, InterpKind::Linear);
        let mask = generate(&linear, &mut rng()).unwrap();
        assert_binary_square(&mask, 4);

        let cubic = BlobParams::new(4, 0.5, 2, InterpKind::CUBIC);
        assert!(matches!(
            generate(&cubic, &mut rng()),
            Err(BlobError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_huge_spline_order_fails_cleanly() {
        let kind = "18446744073709551615".parse::<InterpKind>().unwrap();
        let params = BlobParams::new(16, 0.5, 10, kind);
        assert!(matches!(
            generate(&params, &mut rng()),
            Err(BlobError::InvalidParameter { name: "interp_kind", .. })
        ));
    }

    #[test]
    fn test_single_pixel_frame_is_empty() {
        let params = BlobParams::new(1, 0.5, 4, InterpKind::Linear);
        let mask = generate(&params, &mut rng()).unwrap();
        assert_eq!(mask.filled(), 0);
    }

    #[test]
    fn test_invalid_parameters() {
        let mut rng = rng();
        assert!(generate(&BlobParams::new(0, 0.5, 4, InterpKind::Linear), &mut rng).is_err());
        assert!(generate(&BlobParams::new(10, 0.5, 1, InterpKind::Linear), &mut rng).is_err());
        assert!(generate(&BlobParams::new(10, 0.5, 4, InterpKind::Spline(4)), &mut rng).is_err());
    }

    #[test]
    fn test_generate_many_count() {
        let params = BlobParams::new(24, 0.5, 10, InterpKind::CUBIC);
        let masks = generate_many(5, &params, &mut rng()).unwrap();
        assert_eq!(masks.len(), 5);
        for mask in &masks {
            assert_binary_square(mask, 24);
        }
        assert!(generate_many(0, &params, &mut rng()).unwrap().is_empty());
    }

    #[test]
    fn test_generate_many_fails_fast() {
        let params = BlobParams::new(24, 0.5, 2, InterpKind::CUBIC);
        assert!(generate_many(3, &params, &mut rng()).is_err());
    }

    #[test]
    fn test_generate_many_par_is_reproducible() {
        let params = BlobParams::new(32, 0.6, 12, InterpKind::CUBIC);
        let first = generate_many_par(6, &params, 99).unwrap();
        let second = generate_many_par(6, &params, 99).unwrap();
        assert_eq!(first.len(), 6);
        assert_eq!(first, second);

        let third = generate(&params, &mut blob_rng(99, 3)).unwrap();
        assert_eq!(first[3], third);
    }
}
