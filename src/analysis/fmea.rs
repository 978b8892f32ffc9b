//! FMEA criticality and risk priority numbers
//!
//! Implements the MIL-STD-1629A task 102 criticality numbers and the
//! severity x occurrence x detection risk priority number. Inputs are
//! validated before any multiplication so a bad rating is reported by
//! name instead of surfacing as a nonsense product.

use crate::analysis::validation::{validate_non_negative, validate_range, validate_ratio};
use crate::analysis::Result;

/// Calculate the risk priority number for a failure mode
///
/// ```text
/// RPN = severity * occurrence * detection
/// ```
///
/// Each factor must be an integer rating in [1, 10], which bounds the
/// product to [1, 1000].
pub fn calculate_rpn(severity: u32, occurrence: u32, detection: u32) -> Result<u32> {
    validate_range("rpn_severity", f64::from(severity), 1.0, 10.0)?;
    validate_range("rpn_occurrence", f64::from(occurrence), 1.0, 10.0)?;
    validate_range("rpn_detection", f64::from(detection), 1.0, 10.0)?;

    Ok(severity * occurrence * detection)
}

/// Calculate the hazard rate attributable to a single failure mode
///
/// ```text
/// lambda_mode = lambda_item * mode_ratio
/// ```
///
/// `mode_ratio` is the fraction of the item's failures that manifest as
/// this mode, so the ratios across an item's modes should sum to one.
pub fn calculate_mode_hazard_rate(item_hazard_rate: f64, mode_ratio: f64) -> Result<f64> {
    validate_non_negative("item_hazard_rate", item_hazard_rate)?;
    validate_ratio("mode_ratio", mode_ratio)?;

    Ok(item_hazard_rate * mode_ratio)
}

/// Calculate the MIL-STD-1629A mode criticality number
///
/// ```text
/// Cm = lambda_mode * mission_time * effect_probability
/// ```
pub fn calculate_mode_criticality(
    mode_hazard_rate: f64,
    mode_op_time: f64,
    effect_probability: f64,
) -> Result<f64> {
    validate_non_negative("mode_op_time", mode_op_time)?;
    validate_ratio("effect_probability", effect_probability)?;

    Ok(mode_hazard_rate * mode_op_time * effect_probability)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_rpn() {
        assert_eq!(calculate_rpn(5, 8, 7).unwrap(), 280);
        assert_eq!(calculate_rpn(1, 1, 1).unwrap(), 1);
        assert_eq!(calculate_rpn(10, 10, 10).unwrap(), 1000);
    }

    #[test]
    fn test_calculate_rpn_names_bad_factor() {
        let err = calculate_rpn(0, 8, 7).unwrap_err();
        assert_eq!(
            err.to_string(),
            "rpn_severity (0) is outside the allowed range [1, 10]"
        );

        let err = calculate_rpn(5, 11, 7).unwrap_err();
        assert!(err.to_string().starts_with("rpn_occurrence"));

        let err = calculate_rpn(5, 8, 0).unwrap_err();
        assert!(err.to_string().starts_with("rpn_detection"));
    }

    #[test]
    fn test_calculate_mode_hazard_rate() {
        let rate = calculate_mode_hazard_rate(0.000617, 0.23).unwrap();
        assert!((rate - 0.00014191).abs() < 1e-10);
    }

    #[test]
    fn test_calculate_mode_hazard_rate_rejects_bad_inputs() {
        assert!(calculate_mode_hazard_rate(-0.000617, 0.23).is_err());
        assert!(calculate_mode_hazard_rate(0.000617, 1.23).is_err());
    }

    #[test]
    fn test_calculate_mode_criticality() {
        let mode_hr = calculate_mode_hazard_rate(0.000617, 0.23).unwrap();
        let crit = calculate_mode_criticality(mode_hr, 4.15, 0.95).unwrap();
        assert!((crit - 0.00014191 * 4.15 * 0.95).abs() < 1e-12);
    }

    #[test]
    fn test_calculate_mode_criticality_rejects_bad_inputs() {
        assert!(calculate_mode_criticality(0.00014191, -4.15, 0.95).is_err());
        assert!(calculate_mode_criticality(0.00014191, 4.15, 1.95).is_err());
    }
}
