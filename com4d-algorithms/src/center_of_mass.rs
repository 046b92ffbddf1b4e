//! Intensity-weighted center of mass over detector pixels.
//!
//! For each scan position the selected detector pixels are weighted by
//! their intensity:
//!
//! ```text
//! com_y = sum(w * y) / sum(w)
//! com_x = sum(w * x) / sum(w)
//! ```
//!
//! Both planes are normalized the same way whether a mask restricted the
//! selection or the full frame is used.
#![allow(clippy::cast_possible_truncation)]

use com4d_core::region::MaskRegion;
use com4d_core::{Error, Result};
use log::{debug, warn};
use ndarray::{Array3, ArrayView3};

use crate::selection::{combined_mask, PixelSelection};

/// Number of planes in a center-of-mass map: `(y, x)`.
pub const COM_PLANES: usize = 2;

/// What to do with NaN or infinite results (scan positions whose selected
/// pixels sum to zero).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NonFinitePolicy {
    /// Leave non-finite values in the map.
    #[default]
    Keep,
    /// Fail the computation.
    Reject,
}

/// Configuration for center-of-mass extraction.
#[derive(Clone, Debug, Default)]
pub struct CenterOfMassConfig {
    /// Handling of non-finite results.
    pub non_finite: NonFinitePolicy,
}

impl CenterOfMassConfig {
    /// Set non-finite policy.
    #[must_use]
    pub fn with_non_finite(mut self, policy: NonFinitePolicy) -> Self {
        self.non_finite = policy;
        self
    }
}

/// Center-of-mass extraction over flattened 4D data.
#[derive(Clone, Debug, Default)]
pub struct CenterOfMass {
    config: CenterOfMassConfig,
}

impl CenterOfMass {
    /// Create with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom configuration.
    #[must_use]
    pub fn with_config(config: CenterOfMassConfig) -> Self {
        Self { config }
    }

    /// Algorithm name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        "CenterOfMass4D"
    }

    /// Configure the extraction.
    pub fn configure(&mut self, config: CenterOfMassConfig) {
        self.config = config;
    }

    /// Get current configuration.
    #[must_use]
    pub fn config(&self) -> &CenterOfMassConfig {
        &self.config
    }

    /// Computes the `(2, scan y, scan x)` center-of-mass map.
    ///
    /// # Arguments
    /// * `data` - Scan data shaped `(scan y, scan x, det y * det x)`
    /// * `detector_shape` - `(det y, det x)`
    /// * `regions` - Mask regions; their union selects the pixels. If the
    ///   union is empty the full frame is used.
    ///
    /// # Errors
    /// Returns an error on shape mismatches, or on non-finite results when
    /// the policy is [`NonFinitePolicy::Reject`].
    pub fn compute<'a, I>(
        &self,
        data: ArrayView3<'_, f32>,
        detector_shape: (usize, usize),
        regions: I,
    ) -> Result<Array3<f32>>
    where
        I: IntoIterator<Item = &'a dyn MaskRegion>,
    {
        let mask = combined_mask(regions, detector_shape)?;
        let selection = PixelSelection::from_mask(&mask);
        let com = center_of_mass(data, &selection)?;

        let non_finite = com.iter().filter(|value| !value.is_finite()).count();
        if non_finite > 0 {
            match self.config.non_finite {
                NonFinitePolicy::Keep => {
                    warn!("center of mass map has {non_finite} non-finite value(s)");
                }
                NonFinitePolicy::Reject => return Err(Error::NonFinite { count: non_finite }),
            }
        }
        Ok(com)
    }
}

/// Weighted mean detector position of the selected pixels at every scan
/// position.
///
/// Plane 0 of the result holds the y coordinate, plane 1 the x coordinate.
///
/// # Errors
/// Returns an error if the flattened detector axis of `data` does not match
/// the detector shape of `selection`.
pub fn center_of_mass(data: ArrayView3<'_, f32>, selection: &PixelSelection) -> Result<Array3<f32>> {
    let (scan_y, scan_x, pixels) = data.dim();
    let (det_y, det_x) = selection.detector_shape();
    if pixels != det_y * det_x {
        return Err(Error::ShapeMismatch {
            expected: vec![scan_y, scan_x, det_y * det_x],
            actual: vec![scan_y, scan_x, pixels],
        });
    }
    debug!(
        "center of mass over {} of {} detector pixels ({})",
        selection.len(),
        pixels,
        if selection.is_full_frame() {
            "full frame"
        } else {
            "masked"
        }
    );

    let mut com = Array3::<f32>::zeros((COM_PLANES, scan_y, scan_x));
    for (iy, row) in data.outer_iter().enumerate() {
        for (ix, frame) in row.outer_iter().enumerate() {
            let (total, moment_y, moment_x) = selection
                .indices()
                .iter()
                .zip(selection.y())
                .zip(selection.x())
                .fold((0.0, 0.0, 0.0), |(total, my, mx), ((&k, &y), &x)| {
                    let weight = f64::from(frame[k]);
                    (total + weight, my + weight * y, mx + weight * x)
                });
            com[[0, iy, ix]] = (moment_y / total) as f32;
            com[[1, iy, ix]] = (moment_x / total) as f32;
        }
    }
    Ok(com)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use approx::assert_abs_diff_eq;
    use com4d_core::region::Graphic;
    use ndarray::{Array2, Array3};

    #[test]
    fn test_weighted_two_pixels() {
        // det 1x4, weights 30 at x=0 and 10 at x=2
        let data = Array3::from_shape_vec((1, 1, 4), vec![30.0, 0.0, 10.0, 0.0]).unwrap();
        let selection = PixelSelection::full_frame((1, 4));
        let com = center_of_mass(data.view(), &selection).unwrap();
        // (0*30 + 2*10) / 40 = 0.5
        assert_abs_diff_eq!(com[[1, 0, 0]], 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(com[[0, 0, 0]], 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_mask_ignores_pixels_outside() {
        let data = Array3::from_shape_vec((1, 1, 4), vec![1.0, 100.0, 1.0, 3.0]).unwrap();
        let mut mask = Array2::from_elem((2, 2), false);
        mask[[1, 0]] = true;
        mask[[1, 1]] = true;
        let com = center_of_mass(data.view(), &PixelSelection::from_mask(&mask)).unwrap();
        assert_abs_diff_eq!(com[[0, 0, 0]], 1.0, epsilon = 1e-6);
        // (0*1 + 1*3) / 4
        assert_abs_diff_eq!(com[[1, 0, 0]], 0.75, epsilon = 1e-6);
    }

    #[test]
    fn test_shape_mismatch() {
        let data = Array3::<f32>::ones((2, 2, 5));
        let result = center_of_mass(data.view(), &PixelSelection::full_frame((2, 2)));
        assert!(matches!(result, Err(Error::ShapeMismatch { .. })));
    }

    #[test]
    fn test_zero_weight_kept_as_nan() {
        let data = Array3::<f32>::zeros((1, 2, 4));
        let com = CenterOfMass::new()
            .compute(data.view(), (2, 2), std::iter::empty())
            .unwrap();
        assert!(com.iter().all(|value| value.is_nan()));
    }

    #[test]
    fn test_zero_weight_rejected() {
        let data = Array3::<f32>::zeros((1, 2, 4));
        let algo = CenterOfMass::with_config(
            CenterOfMassConfig::default().with_non_finite(NonFinitePolicy::Reject),
        );
        let result = algo.compute(data.view(), (2, 2), std::iter::empty());
        assert!(matches!(result, Err(Error::NonFinite { count: 4 })));
    }

    #[test]
    fn test_compute_with_regions() {
        let data = Array3::<f32>::ones((2, 1, 16));
        let region = Graphic::point(0.5, 0.25);
        let regions: Vec<&dyn MaskRegion> = vec![&region];
        let com = CenterOfMass::new()
            .compute(data.view(), (4, 4), regions)
            .unwrap();
        assert_eq!(com.dim(), (2, 2, 1));
        assert_eq!(com[[0, 1, 0]], 2.0);
        assert_eq!(com[[1, 1, 0]], 1.0);
    }

    #[test]
    fn test_configure() {
        let mut algo = CenterOfMass::new();
        assert_eq!(algo.config().non_finite, NonFinitePolicy::Keep);
        algo.configure(CenterOfMassConfig::default().with_non_finite(NonFinitePolicy::Reject));
        assert_eq!(algo.config().non_finite, NonFinitePolicy::Reject);
        assert_eq!(algo.name(), "CenterOfMass4D");
    }
}
