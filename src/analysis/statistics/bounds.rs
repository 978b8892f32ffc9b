//! Three-point estimates with normal confidence bounds
//!
//! The beta (PERT) approximation turns a minimum / most likely / maximum
//! triple into a mean and standard deviation:
//!
//! ```text
//! mean = (min + 4 likely + max) / 6
//! sd   = (max - min) / 6
//! ```
//!
//! and bounds the mean at the requested two-sided confidence level.

use crate::analysis::statistics::distributions::inverse_normal;
use crate::analysis::{AnalysisError, Result};

/// Calculate beta-distribution bounds on a three-point estimate
///
/// `confidence` may be given as a fraction (0.95) or a percentage (95.0).
/// Returns `(lower, mean, upper, standard deviation)`.
pub fn beta_bounds(
    minimum: f64,
    likely: f64,
    maximum: f64,
    confidence: f64,
) -> Result<(f64, f64, f64, f64)> {
    if maximum < minimum || likely < minimum || likely > maximum {
        return Err(AnalysisError::OutOfRange {
            name: "likely".to_string(),
            value: likely,
            min: minimum,
            max: maximum,
        });
    }

    let confidence = if confidence > 1.0 {
        confidence / 100.0
    } else {
        confidence
    };
    let z = inverse_normal(0.5 + confidence / 2.0);

    let mean = (minimum + 4.0 * likely + maximum) / 6.0;
    let sd = (maximum - minimum) / 6.0;

    Ok((mean - z * sd, mean, mean + z * sd, sd))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beta_bounds_symmetric() {
        let (lower, mean, upper, sd) = beta_bounds(25.0, 50.0, 75.0, 0.95).unwrap();
        assert!((mean - 50.0).abs() < 1e-12);
        assert!((sd - 50.0 / 6.0).abs() < 1e-12);
        assert!((lower - 33.66696679549955).abs() < 1e-6);
        assert!((upper - 66.33303320450045).abs() < 1e-6);
    }

    #[test]
    fn test_beta_bounds_percent_confidence() {
        // 95.0 and 0.95 must give identical results.
        let fractional = beta_bounds(25.0, 50.0, 75.0, 0.95).unwrap();
        let percent = beta_bounds(25.0, 50.0, 75.0, 95.0).unwrap();
        assert_eq!(fractional, percent);
    }

    #[test]
    fn test_beta_bounds_skewed() {
        let (_, mean, _, sd) = beta_bounds(10.0, 12.0, 20.0, 0.90).unwrap();
        assert!((mean - 13.0).abs() < 1e-12);
        assert!((sd - 10.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_beta_bounds_degenerate_point() {
        let (lower, mean, upper, sd) = beta_bounds(10.0, 10.0, 10.0, 0.95).unwrap();
        assert_eq!(sd, 0.0);
        assert_eq!(lower, 10.0);
        assert_eq!(mean, 10.0);
        assert_eq!(upper, 10.0);
    }

    #[test]
    fn test_beta_bounds_rejects_disordered_inputs() {
        assert!(beta_bounds(75.0, 50.0, 25.0, 0.95).is_err());
        assert!(beta_bounds(25.0, 80.0, 75.0, 0.95).is_err());
    }
}
