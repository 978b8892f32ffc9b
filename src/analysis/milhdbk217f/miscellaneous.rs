//! MIL-HDBK-217F sections 19-22 miscellaneous part hazard rates
//!
//! Four subcategories: quartz crystal (1), electronic filter (2), fuse (3)
//! and incandescent lamp (4). Crystals and lamps have closed-form base
//! rates; filters and fuses are straight table lookups. Fuses and lamps
//! carry no quality factor, so piQ is reported as 1.0 for them.

use crate::analysis::milhdbk217f::{indexed_value, keyed_value};
use crate::analysis::{AnalysisError, Result};
use crate::records::MiscellaneousRecord;

/// Environment factors, one row per subcategory
const PI_E: [[f64; 14]; 4] = [
    [
        1.0, 3.0, 10.0, 6.0, 16.0, 12.0, 17.0, 22.0, 28.0, 23.0, 0.5, 13.0, 32.0, 500.0,
    ],
    [
        1.0, 2.0, 6.0, 4.0, 9.0, 7.0, 9.0, 11.0, 13.0, 11.0, 0.8, 7.0, 15.0, 120.0,
    ],
    [
        1.0, 2.0, 6.0, 5.0, 11.0, 9.0, 12.0, 15.0, 18.0, 18.0, 0.9, 10.0, 21.0, 230.0,
    ],
    [
        1.0, 2.0, 3.0, 3.0, 4.0, 4.0, 4.0, 5.0, 6.0, 5.0, 0.7, 4.0, 6.0, 27.0,
    ],
];

/// Part stress quality factors for crystals
const PART_STRESS_PI_Q_CRYSTAL: [f64; 2] = [1.0, 2.1];

/// Quality factors for filters, used by both methods
const PI_Q_FILTER: [f64; 2] = [1.0, 2.9];

/// Part count quality factors for crystals
const PART_COUNT_PI_Q_CRYSTAL: [f64; 2] = [2.1, 3.4];

/// Filter base hazard rates by construction type: ceramic-ferrite,
/// discrete LC, discrete LC and crystal
const LAMBDA_B_FILTER: [f64; 3] = [0.022, 0.12, 0.12];

/// Lamp application factors: alternating current, direct current
const PI_A: [f64; 2] = [1.0, 3.3];

/// Part count base rates for crystals
const PART_COUNT_LAMBDA_B_CRYSTAL: [f64; 14] = [
    0.032, 0.096, 0.32, 0.19, 0.51, 0.38, 0.54, 0.70, 0.90, 0.74, 0.016, 0.42, 1.0, 16.0,
];

/// Part count base rates for filters, one row per construction type
const PART_COUNT_LAMBDA_B_FILTER: [[f64; 14]; 3] = [
    [
        0.022, 0.044, 0.13, 0.088, 0.20, 0.15, 0.20, 0.24, 0.29, 0.24, 0.018, 0.15, 0.33, 2.6,
    ],
    [
        0.12, 0.24, 0.72, 0.48, 1.1, 0.84, 1.1, 1.3, 1.6, 1.3, 0.096, 0.84, 1.8, 14.0,
    ],
    [
        0.12, 0.24, 0.72, 0.48, 1.1, 0.84, 1.1, 1.3, 1.6, 1.3, 0.096, 0.84, 1.8, 14.0,
    ],
];

/// Part count base rates for fuses
const PART_COUNT_LAMBDA_B_FUSE: [f64; 14] = [
    0.01, 0.02, 0.06, 0.05, 0.11, 0.09, 0.12, 0.15, 0.18, 0.18, 0.009, 0.1, 0.21, 2.3,
];

/// Part count base rates for lamps, one row per application
const PART_COUNT_LAMBDA_B_LAMP: [[f64; 14]; 2] = [
    [
        3.9, 7.8, 12.0, 12.0, 16.0, 16.0, 16.0, 19.0, 23.0, 19.0, 2.7, 16.0, 23.0, 100.0,
    ],
    [
        13.0, 26.0, 38.0, 38.0, 51.0, 51.0, 51.0, 64.0, 77.0, 64.0, 9.0, 51.0, 77.0, 350.0,
    ],
];

/// Part count hazard rate: `lambda_b * piQ`
pub fn calculate_part_count(record: &mut MiscellaneousRecord) -> Result<f64> {
    record.lambda_b = get_part_count_lambda_b(record)?;
    record.pi_q = match record.subcategory_id {
        1 => indexed_value(
            &PART_COUNT_PI_Q_CRYSTAL,
            record.quality_id,
            "get_part_count_quality_factor",
            "crystal quality ID",
        )?,
        2 => indexed_value(
            &PI_Q_FILTER,
            record.quality_id,
            "get_part_count_quality_factor",
            "filter quality ID",
        )?,
        // fuses and lamps have no quality factor
        _ => 1.0,
    };

    Ok(record.lambda_b * record.pi_q)
}

/// Part stress hazard rate.
///
/// ```text
/// hr = lambda_b * piQ * piE          crystal:  lambda_b = 0.013 * f^0.23
/// hr = lambda_b * piQ * piE          filter:   lambda_b by construction type
/// hr = lambda_b * piE                fuse:     lambda_b = 0.010
/// hr = lambda_b * piU * piA * piE    lamp:     lambda_b = 0.074 * V^1.29
/// ```
///
/// Writes every computed factor back onto the record and returns the
/// unadjusted rate.
pub fn calculate_part_stress(record: &mut MiscellaneousRecord) -> Result<f64> {
    verify_part_stress_inputs(record)?;

    record.pi_e = get_environment_factor(record.subcategory_id, record.environment_active_id)?;

    match record.subcategory_id {
        1 => {
            record.lambda_b = 0.013 * record.frequency_operating.powf(0.23);
            record.pi_q = indexed_value(
                &PART_STRESS_PI_Q_CRYSTAL,
                record.quality_id,
                "get_part_stress_quality_factor",
                "crystal quality ID",
            )?;
            Ok(record.lambda_b * record.pi_q * record.pi_e)
        }
        2 => {
            record.lambda_b = keyed_value(
                &LAMBDA_B_FILTER,
                record.type_id,
                "get_part_stress_lambda_b",
                "filter type ID",
            )?;
            record.pi_q = indexed_value(
                &PI_Q_FILTER,
                record.quality_id,
                "get_part_stress_quality_factor",
                "filter quality ID",
            )?;
            Ok(record.lambda_b * record.pi_q * record.pi_e)
        }
        3 => {
            record.lambda_b = 0.010;
            record.pi_q = 1.0;
            Ok(record.lambda_b * record.pi_e)
        }
        4 => {
            record.lambda_b = 0.074 * record.voltage_rated.powf(1.29);
            record.pi_u = get_utilization_factor(record.duty_cycle);
            record.pi_a = keyed_value(
                &PI_A,
                record.application_id,
                "get_application_factor",
                "lamp application ID",
            )?;
            record.pi_q = 1.0;
            Ok(record.lambda_b * record.pi_u * record.pi_a * record.pi_e)
        }
        _ => Err(AnalysisError::UnknownTableKey {
            function: "calculate_part_stress",
            detail: format!("miscellaneous subcategory ID {}", record.subcategory_id),
        }),
    }
}

fn verify_part_stress_inputs(record: &MiscellaneousRecord) -> Result<()> {
    let mut negative: Vec<&str> = Vec::new();
    if record.frequency_operating < 0.0 {
        negative.push("frequency_operating");
    }
    if record.voltage_rated < 0.0 {
        negative.push("voltage_rated");
    }
    if !negative.is_empty() {
        return Err(AnalysisError::NegativeInput {
            hardware_id: record.hardware_id,
            fields: negative.join(", "),
        });
    }

    if record.subcategory_id == 1 && record.frequency_operating == 0.0 {
        return Err(AnalysisError::ZeroInput {
            hardware_id: record.hardware_id,
            fields: "frequency_operating".to_string(),
        });
    }
    if record.subcategory_id == 4 && record.voltage_rated == 0.0 {
        return Err(AnalysisError::ZeroInput {
            hardware_id: record.hardware_id,
            fields: "voltage_rated".to_string(),
        });
    }

    Ok(())
}

/// Lamp utilization factor, stepped on illuminate hours as a percentage of
/// operate hours: below 10 percent, 10 to 90 percent, above 90 percent
fn get_utilization_factor(duty_cycle: f64) -> f64 {
    if duty_cycle < 10.0 {
        0.10
    } else if duty_cycle <= 90.0 {
        0.72
    } else {
        1.0
    }
}

fn get_part_count_lambda_b(record: &MiscellaneousRecord) -> Result<f64> {
    match record.subcategory_id {
        1 => indexed_value(
            &PART_COUNT_LAMBDA_B_CRYSTAL,
            record.environment_active_id,
            "get_part_count_lambda_b",
            "crystal environment ID",
        ),
        2 => {
            let row = record
                .type_id
                .checked_sub(1)
                .and_then(|i| PART_COUNT_LAMBDA_B_FILTER.get(i as usize))
                .ok_or_else(|| AnalysisError::UnknownTableKey {
                    function: "get_part_count_lambda_b",
                    detail: format!("filter type ID {}", record.type_id),
                })?;
            indexed_value(
                row,
                record.environment_active_id,
                "get_part_count_lambda_b",
                "filter environment ID",
            )
        }
        3 => indexed_value(
            &PART_COUNT_LAMBDA_B_FUSE,
            record.environment_active_id,
            "get_part_count_lambda_b",
            "fuse environment ID",
        ),
        4 => {
            let row = record
                .application_id
                .checked_sub(1)
                .and_then(|i| PART_COUNT_LAMBDA_B_LAMP.get(i as usize))
                .ok_or_else(|| AnalysisError::UnknownTableKey {
                    function: "get_part_count_lambda_b",
                    detail: format!("lamp application ID {}", record.application_id),
                })?;
            indexed_value(
                row,
                record.environment_active_id,
                "get_part_count_lambda_b",
                "lamp environment ID",
            )
        }
        _ => Err(AnalysisError::UnknownTableKey {
            function: "get_part_count_lambda_b",
            detail: format!(
                "miscellaneous subcategory ID {}",
                record.subcategory_id
            ),
        }),
    }
}

fn get_environment_factor(subcategory_id: u32, environment_active_id: u32) -> Result<f64> {
    let row = subcategory_id
        .checked_sub(1)
        .and_then(|i| PI_E.get(i as usize))
        .ok_or_else(|| AnalysisError::UnknownTableKey {
            function: "get_environment_factor",
            detail: format!("miscellaneous subcategory ID {}", subcategory_id),
        })?;

    indexed_value(
        row,
        environment_active_id,
        "get_environment_factor",
        "miscellaneous environment ID",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(subcategory_id: u32) -> MiscellaneousRecord {
        serde_yml::from_str(&format!(
            "hardware_id: 2\nsubcategory_id: {}\nfrequency_operating: 1.5\nvoltage_rated: 12.0",
            subcategory_id
        ))
        .unwrap()
    }

    #[test]
    fn test_part_stress_crystal() {
        let mut r = record(1);
        r.quality_id = 2;
        let hr = calculate_part_stress(&mut r).unwrap();

        assert!((r.lambda_b - 0.014270669290648566).abs() < 1e-15);
        assert!((hr - 0.02996840551036199).abs() < 1e-15);
    }

    #[test]
    fn test_part_stress_crystal_harsh_environment() {
        let mut r = record(1);
        r.environment_active_id = 5;
        let hr = calculate_part_stress(&mut r).unwrap();
        assert!((hr - 0.22833070865037705).abs() < 1e-15);
    }

    #[test]
    fn test_part_stress_filter() {
        let mut r = record(2);
        r.quality_id = 2;
        let hr = calculate_part_stress(&mut r).unwrap();
        assert!((hr - 0.0638).abs() < 1e-15);

        let mut r = record(2);
        r.type_id = 2;
        r.environment_active_id = 3;
        let hr = calculate_part_stress(&mut r).unwrap();
        assert!((hr - 0.72).abs() < 1e-15);
    }

    #[test]
    fn test_part_stress_fuse() {
        let mut r = record(3);
        let hr = calculate_part_stress(&mut r).unwrap();
        assert!((hr - 0.01).abs() < 1e-15);
        assert!((r.pi_q - 1.0).abs() < 1e-15);

        let mut r = record(3);
        r.environment_active_id = 13;
        let hr = calculate_part_stress(&mut r).unwrap();
        assert!((hr - 0.21).abs() < 1e-15);
    }

    #[test]
    fn test_part_stress_lamp() {
        let mut r = record(4);
        let hr = calculate_part_stress(&mut r).unwrap();

        assert!((r.lambda_b - 1.8254734762892308).abs() < 1e-15);
        assert!((r.pi_u - 1.0).abs() < 1e-15);
        assert!((hr - 1.8254734762892308).abs() < 1e-15);
    }

    #[test]
    fn test_part_stress_lamp_dc_half_duty() {
        let mut r = record(4);
        r.application_id = 2;
        r.duty_cycle = 50.0;
        r.environment_active_id = 2;
        let hr = calculate_part_stress(&mut r).unwrap();

        assert!((r.pi_u - 0.72).abs() < 1e-15);
        assert!((r.pi_a - 3.3).abs() < 1e-15);
        assert!((hr - 8.674649959326425).abs() < 1e-12);
    }

    #[test]
    fn test_utilization_factor_steps() {
        assert!((get_utilization_factor(5.0) - 0.10).abs() < 1e-15);
        assert!((get_utilization_factor(10.0) - 0.72).abs() < 1e-15);
        assert!((get_utilization_factor(90.0) - 0.72).abs() < 1e-15);
        assert!((get_utilization_factor(90.1) - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_part_count() {
        let mut r = record(1);
        r.quality_id = 2;
        let hr = calculate_part_count(&mut r).unwrap();
        assert!((hr - 0.1088).abs() < 1e-15);

        let mut r = record(3);
        r.environment_active_id = 3;
        let hr = calculate_part_count(&mut r).unwrap();
        assert!((hr - 0.06).abs() < 1e-15);

        let mut r = record(4);
        r.application_id = 2;
        r.environment_active_id = 11;
        let hr = calculate_part_count(&mut r).unwrap();
        assert!((hr - 9.0).abs() < 1e-15);
    }

    #[test]
    fn test_zero_inputs() {
        let mut r = record(1);
        r.frequency_operating = 0.0;
        assert!(matches!(
            calculate_part_stress(&mut r).unwrap_err(),
            AnalysisError::ZeroInput { .. }
        ));

        let mut r = record(4);
        r.voltage_rated = 0.0;
        assert!(matches!(
            calculate_part_stress(&mut r).unwrap_err(),
            AnalysisError::ZeroInput { .. }
        ));
    }

    #[test]
    fn test_unknown_filter_type() {
        let mut r = record(2);
        r.type_id = 4;
        let err = calculate_part_stress(&mut r).unwrap_err();
        assert_eq!(
            err.to_string(),
            "get_part_stress_lambda_b: unknown filter type ID 4"
        );
    }

    #[test]
    fn test_invalid_environment() {
        let mut r = record(4);
        r.environment_active_id = 15;
        let err = calculate_part_stress(&mut r).unwrap_err();
        assert!(matches!(err, AnalysisError::IndexOutOfBounds { .. }));
    }
}
