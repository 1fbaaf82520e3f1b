use crate::error::{BlobError, Result};
use crate::interp::InterpKind;

/// Shape parameters of a single blob.
#[derive(Debug, Clone, PartialEq)]
pub struct BlobParams {
    /// Side length of the square frame.
    pub height: usize,
    /// Fraction of the maximum radius that sampled radii may shrink by.
    pub fluctuate_ratio: f64,
    /// Angular samples drawn before the loop is closed.
    pub num_of_points: usize,
    pub interp_kind: InterpKind,
}

impl BlobParams {
    pub fn new(
        height: usize,
        fluctuate_ratio: f64,
        num_of_points: usize,
        interp_kind: InterpKind,
    ) -> Self {
        BlobParams {
            height,
            fluctuate_ratio,
            num_of_points,
            interp_kind,
        }
    }

    /// Frame with the default ratio, sample count and interpolation.
    pub fn with_height(height: usize) -> Self {
        BlobParams {
            height,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.height < 1 {
            return Err(BlobError::invalid("height", "must be at least 1"));
        }
        if self.num_of_points < 2 {
            return Err(BlobError::invalid(
                "num_of_points",
                format!("need at least 2 samples, got {}", self.num_of_points),
            ));
        }
        if !self.fluctuate_ratio.is_finite() || self.fluctuate_ratio < 0.0 {
            return Err(BlobError::invalid(
                "fluctuate_ratio",
                format!(
                    "must be a finite non-negative number, got {}",
                    self.fluctuate_ratio
                ),
            ));
        }
        Ok(())
    }

    /// Center of the frame, which is also the maximum blob radius.
    #[inline]
    pub fn center(&self) -> usize {
        self.height / 2
    }

    #[inline]
    pub fn fluctuation_range(&self) -> f64 {
        self.center() as f64 * self.fluctuate_ratio
    }
}

impl Default for BlobParams {
    fn default() -> Self {
        BlobParams {
            height: 256,
            fluctuate_ratio: 0.5,
            num_of_points: 10,
            interp_kind: InterpKind::CUBIC,
        }
    }
}
