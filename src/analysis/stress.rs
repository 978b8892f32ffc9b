//! Operating-to-rated stress ratios

use crate::analysis::validation::validate_non_negative;
use crate::analysis::{AnalysisError, Result};

/// Calculate the ratio of an operating stress to its rated limit
///
/// The ratio is the input to every derating check. A zero rated stress is
/// an error rather than an infinite ratio.
pub fn calculate_stress_ratio(stress_operating: f64, stress_rated: f64) -> Result<f64> {
    validate_non_negative("stress_operating", stress_operating)?;
    if stress_rated == 0.0 {
        return Err(AnalysisError::DivisionByZero {
            function: "calculate_stress_ratio",
            detail: "stress_rated is 0.0".to_string(),
        });
    }

    Ok(stress_operating / stress_rated)
}
