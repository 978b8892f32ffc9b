//! Shared input guards for the calculation engines
//!
//! Every engine validates its numeric inputs through these helpers so that
//! out-of-range values produce one uniform error message naming the input.

use crate::analysis::{AnalysisError, Result};

/// Check that a value falls inside a closed range
///
/// Returns the value unchanged on success so callers can validate inline:
///
/// ```text
/// let ratio = validate_range("voltage_ratio", ratio, 0.0, 1.0)?;
/// ```
pub fn validate_range(name: &str, value: f64, min: f64, max: f64) -> Result<f64> {
    if value < min || value > max || value.is_nan() {
        return Err(AnalysisError::OutOfRange {
            name: name.to_string(),
            value,
            min,
            max,
        });
    }
    Ok(value)
}

/// Check that a value is zero or positive
pub fn validate_non_negative(name: &str, value: f64) -> Result<f64> {
    validate_range(name, value, 0.0, f64::INFINITY)
}

/// Check that a value is a valid proportion in [0, 1]
pub fn validate_ratio(name: &str, value: f64) -> Result<f64> {
    validate_range(name, value, 0.0, 1.0)
}
