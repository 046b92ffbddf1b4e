//! Error types for com4d-core.

use thiserror::Error;

/// Result type alias for com4d operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for com4d operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Source data does not have the four (scan y, scan x, det y, det x) axes.
    #[error("expected 4D data, got {0} dimension(s)")]
    NotFourDimensional(usize),

    /// Array shape does not match what the operation requires.
    #[error("shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Number of dimensional calibrations does not match the data rank.
    #[error("{calibrations} dimensional calibration(s) for {dimensions}D data")]
    CalibrationCount {
        calibrations: usize,
        dimensions: usize,
    },

    /// Data descriptor does not describe the data rank.
    #[error("data descriptor expects {expected} dimension(s), data has {actual}")]
    DescriptorMismatch { expected: usize, actual: usize },

    /// Data cache transform failed.
    #[error("transform error: {0}")]
    Transform(String),

    /// Computation produced NaN or infinite values.
    #[error("{count} non-finite value(s) in result")]
    NonFinite { count: usize },

    /// Array reshape error.
    #[error("array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// Record serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
