//! MIL-HDBK-217F Notice 2 hazard rate prediction
//!
//! Two prediction methods:
//! - part count: base rates tabulated by environment, scaled by quality
//! - part stress: closed-form base rate times the family pi factors
//!
//! Each family module owns its static factor tables, verifies its inputs
//! and writes the intermediate pi factors back onto the record. Rates are
//! failures per million hours. All IDs are 1-based, matching the handbook
//! section numbering.

pub mod capacitor;
pub mod inductor;
pub mod miscellaneous;

use std::fmt;
use std::str::FromStr;

use crate::analysis::{AnalysisError, Result};
use crate::records::ComponentRecord;

/// Prediction method selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PredictionMethod {
    /// Environment-keyed base rates, quality factor only
    PartCount,
    /// Full pi factor model from operating stresses
    #[default]
    PartStress,
}

impl fmt::Display for PredictionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictionMethod::PartCount => write!(f, "part-count"),
            PredictionMethod::PartStress => write!(f, "part-stress"),
        }
    }
}

impl FromStr for PredictionMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "part-count" | "count" | "1" => Ok(PredictionMethod::PartCount),
            "part-stress" | "stress" | "2" => Ok(PredictionMethod::PartStress),
            _ => Err(format!("Unknown prediction method: {}", s)),
        }
    }
}

/// Predict the active hazard rate for one component record.
///
/// Dispatches on the part family, then applies the universal adjustment to
/// the base rate returned by the family model:
///
/// ```text
/// hr = (hr_base + add_adj_factor) * (duty_cycle / 100) * mult_adj_factor * quantity
/// ```
///
/// The adjusted rate is written to `hazard_rate_active` on the record and
/// returned.
pub fn calculate_hazard_rate(
    record: &mut ComponentRecord,
    method: PredictionMethod,
) -> Result<f64> {
    match record {
        ComponentRecord::Capacitor(r) => {
            let base = match method {
                PredictionMethod::PartCount => capacitor::calculate_part_count(r)?,
                PredictionMethod::PartStress => capacitor::calculate_part_stress(r)?,
            };
            r.hazard_rate_active = apply_adjustments(
                base,
                r.add_adj_factor,
                r.duty_cycle,
                r.mult_adj_factor,
                r.quantity,
            );
            Ok(r.hazard_rate_active)
        }
        ComponentRecord::Inductor(r) => {
            let base = match method {
                PredictionMethod::PartCount => inductor::calculate_part_count(r)?,
                PredictionMethod::PartStress => inductor::calculate_part_stress(r)?,
            };
            r.hazard_rate_active = apply_adjustments(
                base,
                r.add_adj_factor,
                r.duty_cycle,
                r.mult_adj_factor,
                r.quantity,
            );
            Ok(r.hazard_rate_active)
        }
        ComponentRecord::Miscellaneous(r) => {
            let base = match method {
                PredictionMethod::PartCount => miscellaneous::calculate_part_count(r)?,
                PredictionMethod::PartStress => miscellaneous::calculate_part_stress(r)?,
            };
            r.hazard_rate_active = apply_adjustments(
                base,
                r.add_adj_factor,
                r.duty_cycle,
                r.mult_adj_factor,
                r.quantity,
            );
            Ok(r.hazard_rate_active)
        }
    }
}

/// Fill zero-valued derived fields with the handbook defaults for the family
pub fn set_default_values(record: &mut ComponentRecord) {
    match record {
        ComponentRecord::Capacitor(r) => capacitor::set_default_values(r),
        ComponentRecord::Inductor(r) => inductor::set_default_values(r),
        ComponentRecord::Miscellaneous(_) => {}
    }
}

fn apply_adjustments(
    base: f64,
    add_adj_factor: f64,
    duty_cycle: f64,
    mult_adj_factor: f64,
    quantity: u32,
) -> f64 {
    (base + add_adj_factor) * (duty_cycle / 100.0) * mult_adj_factor * quantity as f64
}

/// Resolve a 1-based ID against a positional factor table.
///
/// Out-of-range IDs map to an index-style error naming the ID, mirroring
/// the handbook's list-shaped tables.
pub(crate) fn indexed_value(
    table: &[f64],
    id: u32,
    function: &'static str,
    what: &str,
) -> Result<f64> {
    id.checked_sub(1)
        .and_then(|i| table.get(i as usize))
        .copied()
        .ok_or_else(|| AnalysisError::IndexOutOfBounds {
            function,
            detail: format!("{} {}", what, id),
        })
}

/// Resolve a 1-based ID against a keyed factor table.
///
/// Unknown IDs map to a key-style error, mirroring the handbook's tables
/// keyed by subcategory, family or construction.
pub(crate) fn keyed_value(
    table: &[f64],
    id: u32,
    function: &'static str,
    what: &str,
) -> Result<f64> {
    id.checked_sub(1)
        .and_then(|i| table.get(i as usize))
        .copied()
        .ok_or_else(|| AnalysisError::UnknownTableKey {
            function,
            detail: format!("{} {}", what, id),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::MiscellaneousRecord;

    fn lamp(duty_cycle: f64) -> MiscellaneousRecord {
        serde_yml::from_str(&format!(
            "hardware_id: 1\nsubcategory_id: 4\nvoltage_rated: 12.0\nduty_cycle: {}",
            duty_cycle
        ))
        .unwrap()
    }

    #[test]
    fn test_calculate_hazard_rate_part_stress_lamp() {
        let mut record = ComponentRecord::Miscellaneous(lamp(100.0));
        let hr = calculate_hazard_rate(&mut record, PredictionMethod::PartStress).unwrap();

        assert!((hr - 1.8254734762892308).abs() < 1e-12);
        assert_eq!(record.hazard_rate_active(), hr);
    }

    #[test]
    fn test_calculate_hazard_rate_part_count_lamp() {
        let mut record = ComponentRecord::Miscellaneous(lamp(100.0));
        let hr = calculate_hazard_rate(&mut record, PredictionMethod::PartCount).unwrap();

        assert!((hr - 3.9).abs() < 1e-12);
    }

    #[test]
    fn test_apply_adjustments() {
        assert!((apply_adjustments(2.0, 0.5, 50.0, 2.0, 3) - 7.5).abs() < 1e-12);
        assert!((apply_adjustments(1.0, 0.0, 100.0, 1.0, 1) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_prediction_method_round_trip() {
        assert_eq!(
            "part-count".parse::<PredictionMethod>().unwrap(),
            PredictionMethod::PartCount
        );
        assert_eq!(
            "stress".parse::<PredictionMethod>().unwrap(),
            PredictionMethod::PartStress
        );
        assert_eq!(PredictionMethod::PartCount.to_string(), "part-count");
        assert!("weibull".parse::<PredictionMethod>().is_err());
    }

    #[test]
    fn test_indexed_value_errors_name_the_id() {
        let err = indexed_value(&[1.0, 2.0], 3, "get_environment_factor", "lamp environment ID")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "get_environment_factor: invalid lamp environment ID 3"
        );

        let err = keyed_value(&[1.0], 0, "get_part_count_lambda_b", "filter type ID").unwrap_err();
        assert_eq!(
            err.to_string(),
            "get_part_count_lambda_b: unknown filter type ID 0"
        );
    }
}
