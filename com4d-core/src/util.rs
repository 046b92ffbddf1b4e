//! Numeric conversion utilities.
//!
//! These functions handle conversions between pixel indices and
//! normalized coordinates with explicit handling of precision loss and
//! bounds.

/// Convert usize to f64 with allowed precision loss.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    value as f64
}

/// Floor a non-negative value to an index.
///
/// Returns `None` if the value is not finite or negative.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[must_use]
pub fn f64_to_index(value: f64) -> Option<usize> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some(value.floor() as usize)
}

/// Floor a value to an index within `[0, len)`.
///
/// Negative values clamp to 0 and values past the end clamp to `len - 1`.
/// Returns `None` for an empty axis or a non-finite value.
#[must_use]
pub fn f64_to_index_clamped(value: f64, len: usize) -> Option<usize> {
    if len == 0 || !value.is_finite() {
        return None;
    }
    Some(f64_to_index(value.max(0.0)).map_or(0, |index| index.min(len - 1)))
}

/// Floor a pixel edge and clamp it to `[0, len]`.
///
/// Non-finite edges map to 0.
#[must_use]
pub fn clamp_to_axis(value: f64, len: usize) -> usize {
    f64_to_index(value.clamp(0.0, usize_to_f64(len))).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_f64_to_index() {
        assert_eq!(f64_to_index(2.9), Some(2));
        assert_eq!(f64_to_index(0.0), Some(0));
        assert_eq!(f64_to_index(-0.1), None);
        assert_eq!(f64_to_index(f64::NAN), None);
    }

    #[test]
    fn test_f64_to_index_clamped() {
        assert_eq!(f64_to_index_clamped(-3.0, 4), Some(0));
        assert_eq!(f64_to_index_clamped(4.0, 4), Some(3));
        assert_eq!(f64_to_index_clamped(1.5, 4), Some(1));
        assert_eq!(f64_to_index_clamped(1.5, 0), None);
    }

    #[test]
    fn test_clamp_to_axis() {
        assert_eq!(clamp_to_axis(2.5, 4), 2);
        assert_eq!(clamp_to_axis(-1.0, 4), 0);
        assert_eq!(clamp_to_axis(9.0, 4), 4);
        assert_eq!(clamp_to_axis(1e300, 4), 4);
        assert_eq!(clamp_to_axis(f64::NAN, 4), 0);
    }
}
