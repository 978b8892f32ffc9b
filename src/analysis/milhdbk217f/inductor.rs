//! MIL-HDBK-217F section 11 inductive device hazard rates
//!
//! Subcategory 1 is a transformer, 2 is a coil. The base rate is an
//! exponential in the hot spot temperature, keyed by insulation class. The
//! hot spot temperature comes from an explicit temperature rise when one is
//! given, from the MIL-C-39010 spec sheet for coils procured to
//! specification 2, or is derived from dissipated or input power:
//!
//! ```text
//! dT = 125 * P / A              power and radiating area known
//! dT = 11.5 * P / W^0.6766      power and weight known
//! dT = 2.1 * (V * I) / W^0.6766 input power and weight known
//! t_hs = t_ambient + 1.1 * dT
//! ```

use crate::analysis::milhdbk217f::{indexed_value, keyed_value};
use crate::analysis::{AnalysisError, Result};
use crate::records::InductorRecord;

/// Base rate constants `[f0, f1, f2]` for transformers, by insulation class
const LAMBDA_B_TRANSFORMER: [[f64; 3]; 6] = [
    [0.0018, 329.0, 15.6],
    [0.002, 352.0, 14.0],
    [0.0018, 364.0, 8.7],
    [0.002, 400.0, 10.0],
    [0.00125, 398.0, 3.8],
    [0.00159, 477.0, 8.4],
];

/// Base rate constants `[f0, f1, f2]` for coils, by insulation class
const LAMBDA_B_COIL: [[f64; 3]; 4] = [
    [0.000335, 329.0, 15.6],
    [0.000379, 352.0, 14.0],
    [0.000319, 364.0, 8.7],
    [0.00035, 409.0, 10.0],
];

/// Environment factors, one row per subcategory
const PI_E: [[f64; 14]; 2] = [
    [
        1.0, 6.0, 12.0, 5.0, 16.0, 6.0, 8.0, 7.0, 9.0, 24.0, 0.5, 13.0, 34.0, 610.0,
    ],
    [
        1.0, 4.0, 12.0, 5.0, 16.0, 5.0, 7.0, 6.0, 8.0, 24.0, 0.5, 13.0, 34.0, 610.0,
    ],
];

/// Part stress quality factors for transformers, by device family
const PART_STRESS_PI_Q_TRANSFORMER: [[f64; 2]; 4] = [
    [1.5, 5.0],
    [3.0, 7.5],
    [8.0, 30.0],
    [12.0, 30.0],
];

/// Part stress quality factors for coils
const PART_STRESS_PI_Q_COIL: [f64; 6] = [0.03, 0.1, 0.3, 1.0, 4.0, 20.0];

/// Part count quality factors
const PART_COUNT_PI_Q: [f64; 3] = [0.25, 1.0, 10.0];

/// Construction factors for coils: fixed, variable
const PI_C: [f64; 2] = [1.0, 2.0];

/// MIL-C-39010 spec sheet temperature rise, by page number
const SPEC_SHEET_RISE: [f64; 14] = [
    15.0, 15.0, 15.0, 35.0, 15.0, 35.0, 15.0, 35.0, 15.0, 15.0, 35.0, 35.0, 15.0, 15.0,
];

/// Part count base rates for transformers, by device family
const PART_COUNT_LAMBDA_B_TRANSFORMER: [[f64; 14]; 4] = [
    [
        0.0035, 0.023, 0.049, 0.019, 0.065, 0.027, 0.037, 0.041, 0.052, 0.11, 0.0018, 0.053,
        0.16, 2.3,
    ],
    [
        0.0071, 0.046, 0.097, 0.038, 0.13, 0.055, 0.073, 0.081, 0.10, 0.22, 0.035, 0.11, 0.31,
        4.7,
    ],
    [
        0.023, 0.16, 0.35, 0.13, 0.45, 0.21, 0.27, 0.35, 0.45, 0.82, 0.011, 0.37, 1.2, 16.0,
    ],
    [
        0.028, 0.18, 0.39, 0.15, 0.52, 0.22, 0.29, 0.33, 0.42, 0.88, 0.015, 0.42, 1.2, 19.0,
    ],
];

/// Part count base rates for coils, by device family
const PART_COUNT_LAMBDA_B_COIL: [[f64; 14]; 2] = [
    [
        0.0017, 0.0073, 0.023, 0.0091, 0.031, 0.011, 0.015, 0.016, 0.022, 0.052, 0.00083, 0.25,
        0.073, 1.1,
    ],
    [
        0.0033, 0.015, 0.046, 0.018, 0.061, 0.022, 0.03, 0.033, 0.044, 0.10, 0.0017, 0.05,
        0.15, 2.2,
    ],
];

/// Part count hazard rate: `lambda_b * piQ`
pub fn calculate_part_count(record: &mut InductorRecord) -> Result<f64> {
    record.lambda_b = get_part_count_lambda_b(
        record.subcategory_id,
        record.family_id,
        record.environment_active_id,
    )?;
    record.pi_q = get_part_count_quality_factor(record.quality_id)?;

    Ok(record.lambda_b * record.pi_q)
}

/// Part stress hazard rate.
///
/// ```text
/// hr = lambda_b * piQ * piE          transformers
/// hr = lambda_b * piC * piQ * piE    coils
/// ```
///
/// Writes the hot spot temperature and every factor back onto the record
/// and returns the unadjusted rate.
pub fn calculate_part_stress(record: &mut InductorRecord) -> Result<f64> {
    verify_part_stress_inputs(record)?;

    let temperature_rise = get_temperature_rise(record)?;
    record.temperature_hot_spot =
        calculate_hot_spot_temperature(record.temperature_active, temperature_rise);
    record.lambda_b = calculate_part_stress_lambda_b(
        record.subcategory_id,
        record.insulation_id,
        record.temperature_hot_spot,
    )?;
    record.pi_q = get_part_stress_quality_factor(
        record.subcategory_id,
        record.family_id,
        record.quality_id,
    )?;
    record.pi_e = get_environment_factor(record.subcategory_id, record.environment_active_id)?;

    let mut hazard_rate = record.lambda_b * record.pi_q * record.pi_e;
    if record.subcategory_id == 2 {
        record.pi_c = get_construction_factor(record.construction_id)?;
        hazard_rate *= record.pi_c;
    }

    Ok(hazard_rate)
}

/// Fill zero-valued fields with the handbook defaults
pub fn set_default_values(record: &mut InductorRecord) {
    if record.temperature_rated_max <= 0.0 {
        record.temperature_rated_max = if record.subcategory_id == 1 {
            130.0
        } else {
            125.0
        };
    }
}

fn verify_part_stress_inputs(record: &InductorRecord) -> Result<()> {
    let mut negative: Vec<&str> = Vec::new();
    if record.power_operating < 0.0 {
        negative.push("power_operating");
    }
    if record.current_operating < 0.0 {
        negative.push("current_operating");
    }
    if record.voltage_dc_operating < 0.0 {
        negative.push("voltage_dc_operating");
    }
    if record.area < 0.0 {
        negative.push("area");
    }
    if record.weight < 0.0 {
        negative.push("weight");
    }
    if !negative.is_empty() {
        return Err(AnalysisError::NegativeInput {
            hardware_id: record.hardware_id,
            fields: negative.join(", "),
        });
    }

    Ok(())
}

/// Temperature rise in Celsius, from the first derivation with usable inputs.
///
/// An explicit rise wins; coils procured to specification 2 use the spec
/// sheet; otherwise the rise is derived from power and area, power and
/// weight, or input power and weight. With no usable inputs the rise is 0.
fn get_temperature_rise(record: &InductorRecord) -> Result<f64> {
    if record.temperature_rise > 0.0 {
        return Ok(record.temperature_rise);
    }
    if record.subcategory_id == 2 && record.specification_id == 2 {
        return get_temperature_rise_spec_sheet(record.page_number);
    }
    if record.power_operating > 0.0 && record.area > 0.0 {
        return Ok(calculate_temperature_rise_power_loss_surface(
            record.power_operating,
            record.area,
        ));
    }
    if record.power_operating > 0.0 && record.weight > 0.0 {
        return Ok(calculate_temperature_rise_power_loss_weight(
            record.power_operating,
            record.weight,
        ));
    }
    let power_input = record.voltage_dc_operating * record.current_operating;
    if power_input > 0.0 && record.weight > 0.0 {
        return Ok(calculate_temperature_rise_input_power_weight(
            power_input,
            record.weight,
        ));
    }

    Ok(0.0)
}

fn get_temperature_rise_spec_sheet(page_number: u32) -> Result<f64> {
    keyed_value(
        &SPEC_SHEET_RISE,
        page_number,
        "get_temperature_rise_spec_sheet",
        "inductor page number",
    )
}

/// `dT = 125 * P / A` with P in watts and A in square inches
fn calculate_temperature_rise_power_loss_surface(power_operating: f64, area: f64) -> f64 {
    125.0 * power_operating / area
}

/// `dT = 11.5 * P / W^0.6766` with P in watts and W in pounds
fn calculate_temperature_rise_power_loss_weight(power_operating: f64, weight: f64) -> f64 {
    11.5 * power_operating / weight.powf(0.6766)
}

/// `dT = 2.1 * P_in / W^0.6766` with P_in in watts and W in pounds
fn calculate_temperature_rise_input_power_weight(power_input: f64, weight: f64) -> f64 {
    2.1 * power_input / weight.powf(0.6766)
}

/// `t_hs = t_ambient + 1.1 * dT`
fn calculate_hot_spot_temperature(temperature_active: f64, temperature_rise: f64) -> f64 {
    temperature_active + 1.1 * temperature_rise
}

/// Base hazard rate from the hot spot temperature curve fit.
///
/// ```text
/// lambda_b = f0 * exp(((t_hs + 273) / f1)^f2)
/// ```
fn calculate_part_stress_lambda_b(
    subcategory_id: u32,
    insulation_id: u32,
    temperature_hot_spot: f64,
) -> Result<f64> {
    let table: &[[f64; 3]] = match subcategory_id {
        1 => &LAMBDA_B_TRANSFORMER,
        2 => &LAMBDA_B_COIL,
        _ => {
            return Err(AnalysisError::UnknownTableKey {
                function: "calculate_part_stress_lambda_b",
                detail: format!("inductor subcategory ID {}", subcategory_id),
            })
        }
    };
    let factors = insulation_id
        .checked_sub(1)
        .and_then(|i| table.get(i as usize))
        .ok_or_else(|| AnalysisError::UnknownTableKey {
            function: "calculate_part_stress_lambda_b",
            detail: format!("inductor insulation ID {}", insulation_id),
        })?;

    Ok(factors[0] * (((temperature_hot_spot + 273.0) / factors[1]).powf(factors[2])).exp())
}

fn get_part_count_lambda_b(
    subcategory_id: u32,
    family_id: u32,
    environment_active_id: u32,
) -> Result<f64> {
    let table: &[[f64; 14]] = match subcategory_id {
        1 => &PART_COUNT_LAMBDA_B_TRANSFORMER,
        2 => &PART_COUNT_LAMBDA_B_COIL,
        _ => {
            return Err(AnalysisError::UnknownTableKey {
                function: "get_part_count_lambda_b",
                detail: format!("inductor subcategory ID {}", subcategory_id),
            })
        }
    };
    let row = family_id
        .checked_sub(1)
        .and_then(|i| table.get(i as usize))
        .ok_or_else(|| AnalysisError::UnknownTableKey {
            function: "get_part_count_lambda_b",
            detail: format!("inductor family ID {}", family_id),
        })?;

    indexed_value(
        row,
        environment_active_id,
        "get_part_count_lambda_b",
        "inductor environment ID",
    )
}

fn get_part_count_quality_factor(quality_id: u32) -> Result<f64> {
    indexed_value(
        &PART_COUNT_PI_Q,
        quality_id,
        "get_part_count_quality_factor",
        "inductor quality ID",
    )
}

fn get_part_stress_quality_factor(
    subcategory_id: u32,
    family_id: u32,
    quality_id: u32,
) -> Result<f64> {
    match subcategory_id {
        1 => {
            let row = family_id
                .checked_sub(1)
                .and_then(|i| PART_STRESS_PI_Q_TRANSFORMER.get(i as usize))
                .ok_or_else(|| AnalysisError::UnknownTableKey {
                    function: "get_part_stress_quality_factor",
                    detail: format!("inductor family ID {}", family_id),
                })?;
            indexed_value(
                row,
                quality_id,
                "get_part_stress_quality_factor",
                "inductor quality ID",
            )
        }
        2 => indexed_value(
            &PART_STRESS_PI_Q_COIL,
            quality_id,
            "get_part_stress_quality_factor",
            "inductor quality ID",
        ),
        _ => Err(AnalysisError::UnknownTableKey {
            function: "get_part_stress_quality_factor",
            detail: format!("inductor subcategory ID {}", subcategory_id),
        }),
    }
}

fn get_environment_factor(subcategory_id: u32, environment_active_id: u32) -> Result<f64> {
    let row = subcategory_id
        .checked_sub(1)
        .and_then(|i| PI_E.get(i as usize))
        .ok_or_else(|| AnalysisError::UnknownTableKey {
            function: "get_environment_factor",
            detail: format!("inductor subcategory ID {}", subcategory_id),
        })?;

    indexed_value(
        row,
        environment_active_id,
        "get_environment_factor",
        "inductor environment ID",
    )
}

fn get_construction_factor(construction_id: u32) -> Result<f64> {
    keyed_value(
        &PI_C,
        construction_id,
        "get_construction_factor",
        "inductor construction ID",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transformer() -> InductorRecord {
        serde_yml::from_str(
            "hardware_id: 8\nsubcategory_id: 1\ninsulation_id: 3\nfamily_id: 1\n\
             quality_id: 1\nenvironment_active_id: 4\ntemperature_active: 43.2\n\
             power_operating: 0.875\narea: 12.5\nweight: 2.5",
        )
        .unwrap()
    }

    #[test]
    fn test_temperature_rise_helpers() {
        assert!((calculate_temperature_rise_power_loss_surface(0.387, 12.5) - 3.87).abs() < 1e-15);
        assert!(
            (calculate_temperature_rise_power_loss_weight(0.387, 2.5) - 2.3942119576119576).abs()
                < 1e-15
        );
        assert!(
            (calculate_temperature_rise_input_power_weight(0.387, 0.015) - 13.931148250959215)
                .abs()
                < 1e-12
        );
        assert!((calculate_hot_spot_temperature(43.2, 38.7) - 85.77).abs() < 1e-12);
    }

    #[test]
    fn test_part_stress_lambda_b() {
        let lambda_b = calculate_part_stress_lambda_b(1, 4, 85.77).unwrap();
        assert!((lambda_b - 0.002801328998416535).abs() < 1e-15);
    }

    #[test]
    fn test_part_stress_transformer_surface_rise() {
        let mut r = transformer();
        let hr = calculate_part_stress(&mut r).unwrap();

        assert!((r.temperature_hot_spot - 52.825).abs() < 1e-12);
        assert!((r.lambda_b - 0.002635803474087143).abs() < 1e-15);
        assert!((r.pi_q - 1.5).abs() < 1e-15);
        assert!((r.pi_e - 5.0).abs() < 1e-15);
        assert!((hr - 0.019768526055653574).abs() < 1e-15);
    }

    #[test]
    fn test_part_stress_transformer_weight_rise() {
        let mut r = transformer();
        r.area = 0.0;
        let hr = calculate_part_stress(&mut r).unwrap();

        assert!((r.lambda_b - 0.002543115203034451).abs() < 1e-15);
        assert!((hr - 0.019073364022758384).abs() < 1e-15);
    }

    #[test]
    fn test_part_stress_transformer_input_power_rise() {
        let mut r = transformer();
        r.area = 0.0;
        r.power_operating = 0.0;
        r.voltage_dc_operating = 3.3;
        r.current_operating = 0.2;
        let hr = calculate_part_stress(&mut r).unwrap();

        assert!((r.lambda_b - 0.002431010820126531).abs() < 1e-15);
        assert!((hr - 0.01823258115094898).abs() < 1e-15);
    }

    #[test]
    fn test_part_stress_no_derivable_rise() {
        let mut r = transformer();
        r.area = 0.0;
        r.power_operating = 0.0;
        let hr = calculate_part_stress(&mut r).unwrap();

        assert!((r.temperature_hot_spot - 43.2).abs() < 1e-12);
        assert!((r.lambda_b - 0.0024147842325465915).abs() < 1e-15);
        assert!((hr - 0.018110881744099437).abs() < 1e-15);
    }

    #[test]
    fn test_part_stress_coil() {
        let mut r = transformer();
        r.subcategory_id = 2;
        r.construction_id = 2;
        let hr = calculate_part_stress(&mut r).unwrap();

        assert!((r.lambda_b - 0.0004671229490187771).abs() < 1e-15);
        assert!((r.pi_c - 2.0).abs() < 1e-15);
        assert!((r.pi_q - 0.03).abs() < 1e-15);
        assert!((hr - 0.0001401368847056331).abs() < 1e-15);
    }

    #[test]
    fn test_part_stress_coil_spec_sheet_rise() {
        let mut r = transformer();
        r.subcategory_id = 2;
        r.specification_id = 2;
        r.page_number = 4;
        let hr = calculate_part_stress(&mut r).unwrap();

        assert!((r.temperature_hot_spot - 81.7).abs() < 1e-12);
        assert!((hr - 0.00021263976690681966).abs() < 1e-15);
    }

    #[test]
    fn test_explicit_rise_wins() {
        let mut r = transformer();
        r.insulation_id = 1;
        r.quality_id = 1;
        r.environment_active_id = 2;
        r.temperature_active = 45.0;
        r.temperature_rise = 125.0 * 0.5 / 1.5;
        r.power_operating = 99.0;
        let hr = calculate_part_stress(&mut r).unwrap();

        assert!((r.temperature_hot_spot - 90.83333333333334).abs() < 1e-12);
        assert!((r.lambda_b - 0.2201299886310762).abs() < 1e-13);
        assert!((hr - 1.9811698976796859).abs() < 1e-12);
    }

    #[test]
    fn test_part_count() {
        let mut r = transformer();
        r.family_id = 3;
        r.environment_active_id = 7;
        r.quality_id = 2;
        let hr = calculate_part_count(&mut r).unwrap();
        assert!((hr - 0.27).abs() < 1e-15);

        let mut r = transformer();
        r.subcategory_id = 2;
        r.family_id = 2;
        r.environment_active_id = 14;
        r.quality_id = 3;
        let hr = calculate_part_count(&mut r).unwrap();
        assert!((hr - 22.0).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_insulation() {
        let mut r = transformer();
        r.insulation_id = 9;
        let err = calculate_part_stress(&mut r).unwrap_err();
        assert_eq!(
            err.to_string(),
            "calculate_part_stress_lambda_b: unknown inductor insulation ID 9"
        );
    }

    #[test]
    fn test_unknown_spec_sheet_page() {
        let mut r = transformer();
        r.subcategory_id = 2;
        r.specification_id = 2;
        r.page_number = 17;
        let err = calculate_part_stress(&mut r).unwrap_err();
        assert_eq!(
            err.to_string(),
            "get_temperature_rise_spec_sheet: unknown inductor page number 17"
        );
    }

    #[test]
    fn test_negative_input() {
        let mut r = transformer();
        r.weight = -2.5;
        let err = calculate_part_stress(&mut r).unwrap_err();
        assert!(matches!(err, AnalysisError::NegativeInput { .. }));
    }

    #[test]
    fn test_set_default_values() {
        let mut r = transformer();
        set_default_values(&mut r);
        assert!((r.temperature_rated_max - 130.0).abs() < 1e-15);

        r.subcategory_id = 2;
        r.temperature_rated_max = 0.0;
        set_default_values(&mut r);
        assert!((r.temperature_rated_max - 125.0).abs() < 1e-15);
    }
}
