//! Detector pixel selection from mask regions.

use com4d_core::region::MaskRegion;
use com4d_core::{Error, Result};
use ndarray::Array2;

/// Union of the masks of `regions`.
///
/// An empty region list yields an all-false mask.
///
/// # Errors
/// Returns an error if a region produces a mask of the wrong shape.
pub fn combined_mask<'a, I>(regions: I, shape: (usize, usize)) -> Result<Array2<bool>>
where
    I: IntoIterator<Item = &'a dyn MaskRegion>,
{
    let mut mask = Array2::from_elem(shape, false);
    for region in regions {
        let region_mask = region.mask(shape);
        if region_mask.dim() != shape {
            return Err(Error::ShapeMismatch {
                expected: vec![shape.0, shape.1],
                actual: region_mask.shape().to_vec(),
            });
        }
        mask.zip_mut_with(&region_mask, |combined, &inside| *combined |= inside);
    }
    Ok(mask)
}

/// Row and column index grids of `shape` (`mgrid` layout).
#[must_use]
pub fn index_grids(shape: (usize, usize)) -> (Array2<usize>, Array2<usize>) {
    let grid_y = Array2::from_shape_fn(shape, |(row, _)| row);
    let grid_x = Array2::from_shape_fn(shape, |(_, col)| col);
    (grid_y, grid_x)
}

/// Flattened detector pixels taking part in a center-of-mass sum, with
/// their detector coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelSelection {
    indices: Vec<usize>,
    y: Vec<f64>,
    x: Vec<f64>,
    full_frame: bool,
    detector_shape: (usize, usize),
}

impl PixelSelection {
    /// Every pixel of the detector, in row-major order.
    #[must_use]
    pub fn full_frame(shape: (usize, usize)) -> Self {
        let (grid_y, grid_x) = index_grids(shape);
        Self {
            indices: (0..shape.0 * shape.1).collect(),
            y: grid_y.iter().map(|&row| index_to_f64(row)).collect(),
            x: grid_x.iter().map(|&col| index_to_f64(col)).collect(),
            full_frame: true,
            detector_shape: shape,
        }
    }

    /// Pixels where `mask` is true, in row-major order.
    ///
    /// Falls back to [`PixelSelection::full_frame`] if no pixel is set.
    #[must_use]
    pub fn from_mask(mask: &Array2<bool>) -> Self {
        let shape = mask.dim();
        if !mask.iter().any(|&inside| inside) {
            return Self::full_frame(shape);
        }
        let (grid_y, grid_x) = index_grids(shape);
        let mut selection = Self {
            indices: Vec::new(),
            y: Vec::new(),
            x: Vec::new(),
            full_frame: false,
            detector_shape: shape,
        };
        for (flat, ((&inside, &row), &col)) in mask
            .iter()
            .zip(grid_y.iter())
            .zip(grid_x.iter())
            .enumerate()
        {
            if inside {
                selection.indices.push(flat);
                selection.y.push(index_to_f64(row));
                selection.x.push(index_to_f64(col));
            }
        }
        selection
    }

    /// Flat detector indices of the selected pixels.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Detector row of each selected pixel.
    #[must_use]
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Detector column of each selected pixel.
    #[must_use]
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// True if no mask restricted the selection.
    #[must_use]
    pub fn is_full_frame(&self) -> bool {
        self.full_frame
    }

    /// Shape of the detector the selection was made on.
    #[must_use]
    pub fn detector_shape(&self) -> (usize, usize) {
        self.detector_shape
    }

    /// Number of selected pixels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns true if no pixel is selected (only for an empty detector).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[allow(clippy::cast_precision_loss)]
fn index_to_f64(index: usize) -> f64 {
    index as f64
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use com4d_core::region::Graphic;
    use serde_json::Value;

    #[test]
    fn test_combined_mask_is_union() {
        let a = Graphic::rectangle(((0.0, 0.0), (0.25, 0.25)));
        let b = Graphic::rectangle(((0.75, 0.75), (0.25, 0.25)));
        let regions: Vec<&dyn MaskRegion> = vec![&a, &b];
        let mask = combined_mask(regions, (4, 4)).unwrap();
        assert!(mask[[0, 0]]);
        assert!(mask[[3, 3]]);
        assert_eq!(mask.iter().filter(|&&inside| inside).count(), 2);
    }

    #[test]
    fn test_combined_mask_empty_regions() {
        let mask = combined_mask(std::iter::empty(), (3, 5)).unwrap();
        assert_eq!(mask.dim(), (3, 5));
        assert!(mask.iter().all(|&inside| !inside));
    }

    #[derive(Debug)]
    struct WrongShape;

    impl MaskRegion for WrongShape {
        fn mask(&self, _shape: (usize, usize)) -> Array2<bool> {
            Array2::from_elem((1, 1), true)
        }

        fn to_record(&self) -> Result<Value> {
            Ok(Value::Null)
        }
    }

    #[test]
    fn test_combined_mask_rejects_wrong_shape() {
        let regions: Vec<&dyn MaskRegion> = vec![&WrongShape];
        let result = combined_mask(regions, (4, 4));
        assert!(matches!(result, Err(Error::ShapeMismatch { .. })));
    }

    #[test]
    fn test_index_grids() {
        let (grid_y, grid_x) = index_grids((2, 3));
        assert_eq!(grid_y.row(1).to_vec(), vec![1, 1, 1]);
        assert_eq!(grid_x.row(0).to_vec(), vec![0, 1, 2]);
    }

    #[test]
    fn test_from_mask_selects_row_major() {
        let mut mask = Array2::from_elem((3, 3), false);
        mask[[2, 0]] = true;
        mask[[0, 1]] = true;
        let selection = PixelSelection::from_mask(&mask);
        assert!(!selection.is_full_frame());
        assert_eq!(selection.indices(), &[1, 6]);
        assert_eq!(selection.y(), &[0.0, 2.0]);
        assert_eq!(selection.x(), &[1.0, 0.0]);
    }

    #[test]
    fn test_from_empty_mask_is_full_frame() {
        let selection = PixelSelection::from_mask(&Array2::from_elem((2, 2), false));
        assert!(selection.is_full_frame());
        assert_eq!(selection.len(), 4);
        assert_eq!(selection.y(), &[0.0, 0.0, 1.0, 1.0]);
        assert_eq!(selection.x(), &[0.0, 1.0, 0.0, 1.0]);
    }
}
