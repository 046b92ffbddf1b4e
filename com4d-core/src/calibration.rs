//! Axis calibrations and data descriptors.
//!
//! Both are opaque to the center-of-mass numerics; they are carried from
//! the source onto the result so the host can label axes.

use serde::{Deserialize, Serialize};

/// Linear calibration of one axis (or of the intensity).
///
/// A calibrated value is `offset + scale * index`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    /// Calibrated value at index 0.
    pub offset: f64,
    /// Calibrated step per index.
    pub scale: f64,
    /// Physical units (empty when uncalibrated).
    pub units: String,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            offset: 0.0,
            scale: 1.0,
            units: String::new(),
        }
    }
}

impl Calibration {
    /// Creates an empty (identity) calibration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an identity calibration with the given units.
    #[must_use]
    pub fn with_units(units: impl Into<String>) -> Self {
        Self {
            units: units.into(),
            ..Self::default()
        }
    }

    /// Set offset.
    #[must_use]
    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// Set scale.
    #[must_use]
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Returns true if this calibration is the identity without units.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Converts an index to a calibrated value.
    #[must_use]
    pub fn convert_to_calibrated(&self, index: f64) -> f64 {
        self.offset + self.scale * index
    }
}

/// Describes the role of each axis of a data array.
///
/// Axes are laid out as `[sequence] + collection + datum`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataDescriptor {
    /// Leading axis is a sequence axis.
    pub is_sequence: bool,
    /// Number of collection axes (e.g. scan axes).
    pub collection_dimension_count: usize,
    /// Number of datum axes (e.g. detector axes).
    pub datum_dimension_count: usize,
}

impl DataDescriptor {
    /// Creates a data descriptor.
    #[must_use]
    pub fn new(
        is_sequence: bool,
        collection_dimension_count: usize,
        datum_dimension_count: usize,
    ) -> Self {
        Self {
            is_sequence,
            collection_dimension_count,
            datum_dimension_count,
        }
    }

    /// Descriptor of a 4D scan: 2D collection of 2D detector frames.
    #[must_use]
    pub fn scan_4d() -> Self {
        Self::new(false, 2, 2)
    }

    /// Total number of axes described.
    #[must_use]
    pub fn expected_dimension_count(&self) -> usize {
        usize::from(self.is_sequence)
            + self.collection_dimension_count
            + self.datum_dimension_count
    }

    /// Returns true if this describes 4D data with two collection axes.
    #[must_use]
    pub fn is_collection_4d(&self) -> bool {
        !self.is_sequence && self.collection_dimension_count == 2 && self.datum_dimension_count == 2
    }
}
