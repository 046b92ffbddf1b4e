//! Conversion between normalized positions and integer slice indices.

use crate::util::{f64_to_index_clamped, usize_to_f64};

/// Maps a normalized coordinate along one axis to a pixel index and back.
///
/// `convert(v) = floor(v * axis_size)` and
/// `convert_back(t) = (t[axis_index] + 0.5) / axis_size`, so converting a
/// pixel back yields the center of that pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatTupleToIntTupleConverter {
    axis_size: usize,
    axis_index: usize,
}

impl FloatTupleToIntTupleConverter {
    /// Creates a converter for an axis of `axis_size` pixels stored at
    /// `axis_index` in index tuples.
    #[must_use]
    pub fn new(axis_size: usize, axis_index: usize) -> Self {
        Self {
            axis_size,
            axis_index,
        }
    }

    #[must_use]
    pub fn axis_size(&self) -> usize {
        self.axis_size
    }

    #[must_use]
    pub fn axis_index(&self) -> usize {
        self.axis_index
    }

    /// Normalized position to pixel index.
    ///
    /// Positions outside `[0, 1)` clamp to the first or last pixel. Returns
    /// `None` for an empty axis or a non-finite position.
    #[must_use]
    pub fn convert(&self, value: f64) -> Option<usize> {
        f64_to_index_clamped(value * usize_to_f64(self.axis_size), self.axis_size)
    }

    /// Pixel index tuple to the normalized center of the pixel on this axis.
    ///
    /// Returns `None` if the tuple has no entry for this axis or the axis
    /// is empty.
    #[must_use]
    pub fn convert_back(&self, value: &[usize]) -> Option<f64> {
        if self.axis_size == 0 {
            return None;
        }
        let index = value.get(self.axis_index)?;
        Some((usize_to_f64(*index) + 0.5) / usize_to_f64(self.axis_size))
    }
}
