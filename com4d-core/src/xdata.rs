//! Array data bundled with calibrations, descriptor and metadata.

use ndarray::ArrayD;
use serde_json::Value;

use crate::calibration::{Calibration, DataDescriptor};
use crate::error::{Error, Result};

/// Free-form metadata attached to data.
pub type Metadata = serde_json::Map<String, Value>;

/// Numeric data together with everything the host needs to display it.
#[derive(Debug, Clone, PartialEq)]
pub struct DataAndMetadata {
    data: ArrayD<f32>,
    dimensional_calibrations: Vec<Calibration>,
    intensity_calibration: Calibration,
    data_descriptor: DataDescriptor,
    metadata: Metadata,
}

impl DataAndMetadata {
    /// Bundles data with calibrations and a descriptor.
    ///
    /// # Errors
    /// Returns an error if the calibration count or the descriptor does not
    /// match the rank of `data`.
    pub fn new(
        data: ArrayD<f32>,
        dimensional_calibrations: Vec<Calibration>,
        intensity_calibration: Calibration,
        data_descriptor: DataDescriptor,
    ) -> Result<Self> {
        let dimensions = data.ndim();
        if dimensional_calibrations.len() != dimensions {
            return Err(Error::CalibrationCount {
                calibrations: dimensional_calibrations.len(),
                dimensions,
            });
        }
        if data_descriptor.expected_dimension_count() != dimensions {
            return Err(Error::DescriptorMismatch {
                expected: data_descriptor.expected_dimension_count(),
                actual: dimensions,
            });
        }
        Ok(Self {
            data,
            dimensional_calibrations,
            intensity_calibration,
            data_descriptor,
            metadata: Metadata::new(),
        })
    }

    /// Wraps data with empty calibrations.
    ///
    /// 4D data is described as a 2D collection of 2D frames, anything else
    /// as plain datum axes.
    #[must_use]
    pub fn from_data(data: ArrayD<f32>) -> Self {
        let dimensions = data.ndim();
        let data_descriptor = if dimensions == 4 {
            DataDescriptor::scan_4d()
        } else {
            DataDescriptor::new(false, 0, dimensions)
        };
        Self {
            data,
            dimensional_calibrations: vec![Calibration::new(); dimensions],
            intensity_calibration: Calibration::new(),
            data_descriptor,
            metadata: Metadata::new(),
        }
    }

    /// Replace metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Returns the data array.
    #[must_use]
    pub fn data(&self) -> &ArrayD<f32> {
        &self.data
    }

    /// Returns the shape of the data array.
    #[must_use]
    pub fn data_shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Returns true if the data has four axes.
    #[must_use]
    pub fn is_data_4d(&self) -> bool {
        self.data.ndim() == 4
    }

    #[must_use]
    pub fn dimensional_calibrations(&self) -> &[Calibration] {
        &self.dimensional_calibrations
    }

    #[must_use]
    pub fn intensity_calibration(&self) -> &Calibration {
        &self.intensity_calibration
    }

    #[must_use]
    pub fn data_descriptor(&self) -> DataDescriptor {
        self.data_descriptor
    }

    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
