//! MIL-HDBK-217F section 10 capacitor hazard rates
//!
//! Covers all nineteen capacitor subcategories, paper (1) through gas or
//! vacuum (19). The part stress base rate is a curve fit in the voltage
//! stress ratio and the ratio of ambient to reference temperature; the
//! reference temperature is keyed by the rated maximum temperature.

use crate::analysis::milhdbk217f::{indexed_value, keyed_value};
use crate::analysis::{AnalysisError, Result};
use crate::records::CapacitorRecord;

/// Curve fit constants per subcategory:
/// `[f0, f1, f2, f3, f4, piCV scale, piCV exponent]`
const FACTORS: [[f64; 7]; 19] = [
    [0.00086, 0.4, 5.0, 2.5, 1.8, 1.2, 0.095],
    [0.00115, 0.4, 5.0, 2.5, 1.8, 1.4, 0.12],
    [0.0005, 0.4, 5.0, 2.5, 1.8, 1.6, 0.13],
    [0.00069, 0.4, 5.0, 2.5, 1.8, 1.2, 0.092],
    [0.00099, 0.4, 5.0, 2.5, 1.8, 1.1, 0.085],
    [0.00055, 0.4, 5.0, 2.5, 1.8, 1.2, 0.092],
    [8.6e-10, 0.4, 3.0, 16.0, 1.0, 0.45, 0.14],
    [0.0053, 0.4, 3.0, 1.2, 6.3, 0.31, 0.23],
    [8.25e-10, 0.5, 4.0, 16.0, 1.0, 0.62, 0.14],
    [0.0003, 0.3, 3.0, 1.0, 1.0, 0.41, 0.11],
    [2.6e-9, 0.3, 3.0, 14.3, 1.0, 0.59, 0.12],
    [0.00375, 0.4, 3.0, 2.6, 9.0, 1.0, 0.12],
    [0.00165, 0.4, 3.0, 2.6, 9.0, 0.82, 0.066],
    [0.00254, 0.5, 3.0, 5.09, 5.0, 0.34, 0.18],
    [0.0028, 0.55, 3.0, 4.09, 5.9, 0.321, 0.19],
    [0.00224, 0.17, 3.0, 1.59, 10.1, 1.0, 0.0],
    [7.3e-7, 0.33, 3.0, 12.1, 1.0, 1.0, 0.0],
    [1.92e-6, 0.33, 3.0, 10.8, 1.0, 1.0, 0.0],
    [0.0112, 0.17, 3.0, 1.59, 10.1, 1.0, 0.0],
];

/// Rated maximum temperature to reference temperature, Celsius to Kelvin
const REF_TEMPS: [(f64, f64); 9] = [
    (65.0, 338.0),
    (70.0, 343.0),
    (85.0, 358.0),
    (105.0, 378.0),
    (125.0, 398.0),
    (150.0, 423.0),
    (170.0, 443.0),
    (175.0, 448.0),
    (200.0, 473.0),
];

/// Environment factors, all capacitor styles
const PI_E: [f64; 14] = [
    1.0, 6.0, 9.0, 9.0, 19.0, 13.0, 29.0, 20.0, 43.0, 24.0, 0.5, 14.0, 32.0, 320.0,
];

/// Part stress quality factors per subcategory
const PART_STRESS_PI_Q: [&[f64]; 19] = [
    &[3.0, 7.0],
    &[1.0, 3.0, 10.0],
    &[0.03, 0.1, 0.3, 1.0, 3.0, 10.0, 30.0],
    &[0.03, 0.1, 0.3, 1.0, 3.0, 7.0, 20.0],
    &[0.03, 0.1, 0.3, 1.0, 10.0],
    &[0.02, 0.1, 0.3, 1.0, 10.0],
    &[0.01, 0.03, 0.1, 0.3, 1.0, 1.5, 3.0, 6.0, 15.0],
    &[5.0, 15.0],
    &[0.03, 0.1, 0.3, 1.0, 3.0, 3.0, 10.0],
    &[0.03, 0.1, 0.3, 1.0, 3.0, 3.0, 10.0],
    &[0.03, 0.1, 0.3, 1.0, 3.0, 10.0],
    &[0.001, 0.01, 0.03, 0.03, 0.1, 0.3, 1.0, 1.5, 10.0],
    &[0.03, 0.1, 0.3, 1.0, 1.5, 3.0, 10.0],
    &[0.03, 0.1, 0.3, 1.0, 3.0, 10.0],
    &[3.0, 10.0],
    &[4.0, 20.0],
    &[3.0, 10.0],
    &[5.0, 20.0],
    &[3.0, 20.0],
];

/// Part count quality factors, established reliability S through lower
const PART_COUNT_PI_Q: [f64; 7] = [0.030, 0.10, 0.30, 1.0, 3.0, 3.0, 10.0];

/// Construction factors for wet tantalum styles (subcategory 13)
const PI_C: [f64; 5] = [0.3, 1.0, 2.0, 2.5, 3.0];

/// Configuration factors for gas or vacuum styles (subcategory 19)
const PI_CF: [f64; 2] = [0.1, 1.0];

/// Part count base rates for paper bypass capacitors (subcategory 1), one
/// row per governing specification (MIL-C-25, MIL-C-12889)
const PART_COUNT_LAMBDA_B_PAPER: [[f64; 14]; 2] = [
    [
        0.0036, 0.0072, 0.330, 0.016, 0.055, 0.023, 0.030, 0.07, 0.13, 0.083, 0.0018, 0.044,
        0.12, 2.1,
    ],
    [
        0.0039, 0.0087, 0.042, 0.022, 0.070, 0.035, 0.047, 0.19, 0.35, 0.130, 0.0020, 0.056,
        0.19, 2.5,
    ],
];

/// Part count base rates for subcategories 2 through 19
const PART_COUNT_LAMBDA_B: [[f64; 14]; 18] = [
    [
        0.0047, 0.0096, 0.044, 0.034, 0.073, 0.030, 0.040, 0.094, 0.15, 0.11, 0.0024, 0.058,
        0.18, 2.7,
    ],
    [
        0.0021, 0.0042, 0.017, 0.010, 0.030, 0.0068, 0.013, 0.026, 0.048, 0.044, 0.0010, 0.023,
        0.063, 1.1,
    ],
    [
        0.0029, 0.0058, 0.023, 0.014, 0.041, 0.012, 0.018, 0.037, 0.066, 0.060, 0.0014, 0.032,
        0.088, 1.5,
    ],
    [
        0.0041, 0.0083, 0.042, 0.021, 0.067, 0.026, 0.048, 0.086, 0.14, 0.10, 0.0020, 0.054,
        0.15, 2.5,
    ],
    [
        0.0023, 0.0092, 0.019, 0.012, 0.033, 0.0096, 0.014, 0.034, 0.053, 0.048, 0.0011, 0.026,
        0.07, 1.2,
    ],
    [
        0.0005, 0.0015, 0.0091, 0.0044, 0.014, 0.0068, 0.0095, 0.054, 0.069, 0.031, 0.00025,
        0.012, 0.046, 0.45,
    ],
    [
        0.018, 0.037, 0.19, 0.094, 0.31, 0.10, 0.14, 0.47, 0.60, 0.48, 0.0091, 0.25, 0.68, 11.0,
    ],
    [
        0.00032, 0.00096, 0.0059, 0.0029, 0.0094, 0.0044, 0.0062, 0.035, 0.045, 0.020, 0.00016,
        0.0076, 0.030, 0.29,
    ],
    [
        0.0036, 0.0074, 0.034, 0.019, 0.056, 0.015, 0.015, 0.032, 0.048, 0.077, 0.0014, 0.049,
        0.13, 2.3,
    ],
    [
        0.00078, 0.0022, 0.013, 0.0056, 0.023, 0.0077, 0.015, 0.053, 0.12, 0.048, 0.00039,
        0.017, 0.065, 0.68,
    ],
    [
        0.0018, 0.0039, 0.016, 0.0097, 0.028, 0.0091, 0.011, 0.034, 0.057, 0.055, 0.00072,
        0.022, 0.066, 1.0,
    ],
    [
        0.0061, 0.013, 0.069, 0.039, 0.11, 0.031, 0.061, 0.13, 0.29, 0.18, 0.0030, 0.069, 0.26,
        4.0,
    ],
    [
        0.024, 0.061, 0.42, 0.18, 0.59, 0.46, 0.55, 2.1, 2.6, 1.2, 0.012, 0.49, 1.7, 21.0,
    ],
    [
        0.029, 0.081, 0.58, 0.24, 0.83, 0.73, 0.88, 4.3, 5.4, 2.0, 0.015, 0.68, 2.8, 28.0,
    ],
    [
        0.08, 0.27, 1.2, 0.71, 2.3, 0.69, 1.1, 6.2, 12.0, 4.1, 0.032, 1.9, 5.9, 85.0,
    ],
    [
        0.033, 0.13, 0.62, 0.31, 0.93, 0.21, 0.28, 2.2, 3.3, 2.2, 0.16, 0.93, 3.2, 37.0,
    ],
    [
        0.80, 0.33, 1.6, 0.87, 3.0, 1.0, 1.7, 9.9, 19.0, 8.1, 0.032, 2.5, 8.9, 100.0,
    ],
    [
        0.4, 1.3, 6.8, 3.6, 13.0, 5.7, 10.0, 58.0, 90.0, 23.0, 20.0, 0.0, 0.0, 0.0,
    ],
];

/// Part count hazard rate: `lambda_b * piQ`.
///
/// Writes `lambda_b` and `pi_q` back onto the record and returns the
/// unadjusted rate.
pub fn calculate_part_count(record: &mut CapacitorRecord) -> Result<f64> {
    record.lambda_b = get_part_count_lambda_b(
        record.subcategory_id,
        record.specification_id,
        record.environment_active_id,
    )?;
    record.pi_q = get_part_count_quality_factor(record.quality_id)?;

    Ok(record.lambda_b * record.pi_q)
}

/// Part stress hazard rate.
///
/// ```text
/// hr = lambda_b * piQ * piE * piCV            subcategories 1-11, 14, 15
/// hr = lambda_b * piQ * piE * piCV * piSR     subcategory 12 (solid tantalum)
/// hr = lambda_b * piQ * piE * piCV * piC      subcategory 13 (wet tantalum)
/// hr = lambda_b * piQ * piE                   subcategories 16-18 (variable)
/// hr = lambda_b * piQ * piE * piCF            subcategory 19 (gas or vacuum)
/// ```
///
/// Writes every computed factor back onto the record and returns the
/// unadjusted rate.
pub fn calculate_part_stress(record: &mut CapacitorRecord) -> Result<f64> {
    verify_part_stress_inputs(record)?;

    record.lambda_b = calculate_part_stress_lambda_b(
        record.subcategory_id,
        record.voltage_ratio,
        record.temperature_active,
        record.temperature_rated_max,
    )?;
    record.pi_cv = calculate_capacitance_factor(record.subcategory_id, record.capacitance)?;
    record.pi_q = get_part_stress_quality_factor(record.subcategory_id, record.quality_id)?;
    record.pi_e = get_environment_factor(record.environment_active_id)?;

    let mut hazard_rate = record.lambda_b * record.pi_q * record.pi_e;
    match record.subcategory_id {
        12 => {
            record.pi_sr = calculate_series_resistance_factor(
                record.resistance,
                record.voltage_dc_operating,
                record.voltage_ac_operating,
            );
            hazard_rate *= record.pi_cv * record.pi_sr;
        }
        13 => {
            record.pi_c = get_construction_factor(record.construction_id)?;
            hazard_rate *= record.pi_cv * record.pi_c;
        }
        16..=18 => {}
        19 => {
            record.pi_cf = get_configuration_factor(record.configuration_id)?;
            hazard_rate *= record.pi_cf;
        }
        _ => hazard_rate *= record.pi_cv,
    }

    Ok(hazard_rate)
}

/// Fill zero-valued fields with the handbook defaults
pub fn set_default_values(record: &mut CapacitorRecord) {
    if record.temperature_rated_max <= 0.0 {
        record.temperature_rated_max = 85.0;
    }
}

fn verify_part_stress_inputs(record: &CapacitorRecord) -> Result<()> {
    let mut negative: Vec<&str> = Vec::new();
    if record.capacitance < 0.0 {
        negative.push("capacitance");
    }
    if record.voltage_ratio < 0.0 {
        negative.push("voltage_ratio");
    }
    if record.resistance < 0.0 {
        negative.push("resistance");
    }
    if record.voltage_dc_operating < 0.0 {
        negative.push("voltage_dc_operating");
    }
    if record.voltage_ac_operating < 0.0 {
        negative.push("voltage_ac_operating");
    }
    if !negative.is_empty() {
        return Err(AnalysisError::NegativeInput {
            hardware_id: record.hardware_id,
            fields: negative.join(", "),
        });
    }

    let mut zero: Vec<&str> = Vec::new();
    if record.subcategory_id <= 15 && record.capacitance == 0.0 {
        zero.push("capacitance");
    }
    if record.subcategory_id == 12
        && record.voltage_dc_operating + record.voltage_ac_operating == 0.0
    {
        zero.push("voltage_dc_operating");
        zero.push("voltage_ac_operating");
    }
    if !zero.is_empty() {
        return Err(AnalysisError::ZeroInput {
            hardware_id: record.hardware_id,
            fields: zero.join(", "),
        });
    }

    Ok(())
}

/// Base hazard rate from the voltage stress and temperature curve fit.
///
/// ```text
/// lambda_b = f0 * ((S / f1)^f2 + 1) * exp(f3 * ((T + 273) / T_ref)^f4)
/// ```
///
/// where S is the operating to rated voltage ratio, T the ambient
/// temperature and T_ref the reference temperature for the rated maximum.
fn calculate_part_stress_lambda_b(
    subcategory_id: u32,
    voltage_ratio: f64,
    temperature_active: f64,
    temperature_rated_max: f64,
) -> Result<f64> {
    let factors = subcategory_factors(subcategory_id, "calculate_part_stress_lambda_b")?;
    let ref_temp = reference_temperature(temperature_rated_max)?;

    Ok(factors[0]
        * ((voltage_ratio / factors[1]).powf(factors[2]) + 1.0)
        * (factors[3] * ((temperature_active + 273.0) / ref_temp).powf(factors[4])).exp())
}

/// Capacitance factor: `piCV = f5 * C^f6` with C in farads.
///
/// The variable styles (16-19) carry a zero exponent, so piCV is 1.0 there.
fn calculate_capacitance_factor(subcategory_id: u32, capacitance: f64) -> Result<f64> {
    let factors = subcategory_factors(subcategory_id, "calculate_capacitance_factor")?;

    Ok(factors[5] * capacitance.powf(factors[6]))
}

/// Series resistance factor for solid tantalum styles.
///
/// The circuit resistance ratio is the effective series resistance over the
/// sum of the operating DC and peak AC voltages.
fn calculate_series_resistance_factor(
    resistance: f64,
    voltage_dc_operating: f64,
    voltage_ac_operating: f64,
) -> f64 {
    let ratio = resistance / (voltage_dc_operating + voltage_ac_operating);

    if ratio <= 0.1 {
        0.33
    } else if ratio <= 0.2 {
        0.27
    } else if ratio <= 0.4 {
        0.2
    } else if ratio <= 0.6 {
        0.13
    } else if ratio <= 0.8 {
        0.1
    } else {
        0.066
    }
}

fn get_part_count_lambda_b(
    subcategory_id: u32,
    specification_id: u32,
    environment_active_id: u32,
) -> Result<f64> {
    let row: &[f64; 14] = match subcategory_id {
        1 => specification_id
            .checked_sub(1)
            .and_then(|i| PART_COUNT_LAMBDA_B_PAPER.get(i as usize))
            .ok_or_else(|| AnalysisError::UnknownTableKey {
                function: "get_part_count_lambda_b",
                detail: format!(
                    "capacitor subcategory ID {} or specification ID {}",
                    subcategory_id, specification_id
                ),
            })?,
        2..=19 => &PART_COUNT_LAMBDA_B[subcategory_id as usize - 2],
        _ => {
            return Err(AnalysisError::UnknownTableKey {
                function: "get_part_count_lambda_b",
                detail: format!("capacitor subcategory ID {}", subcategory_id),
            })
        }
    };

    indexed_value(
        row,
        environment_active_id,
        "get_part_count_lambda_b",
        "capacitor environment ID",
    )
}

fn get_part_count_quality_factor(quality_id: u32) -> Result<f64> {
    indexed_value(
        &PART_COUNT_PI_Q,
        quality_id,
        "get_part_count_quality_factor",
        "capacitor quality ID",
    )
}

fn get_part_stress_quality_factor(subcategory_id: u32, quality_id: u32) -> Result<f64> {
    let table = subcategory_id
        .checked_sub(1)
        .and_then(|i| PART_STRESS_PI_Q.get(i as usize))
        .ok_or_else(|| AnalysisError::UnknownTableKey {
            function: "get_part_stress_quality_factor",
            detail: format!("capacitor subcategory ID {}", subcategory_id),
        })?;

    indexed_value(
        table,
        quality_id,
        "get_part_stress_quality_factor",
        "capacitor quality ID",
    )
}

fn get_environment_factor(environment_active_id: u32) -> Result<f64> {
    indexed_value(
        &PI_E,
        environment_active_id,
        "get_environment_factor",
        "capacitor environment ID",
    )
}

fn get_construction_factor(construction_id: u32) -> Result<f64> {
    keyed_value(
        &PI_C,
        construction_id,
        "get_construction_factor",
        "capacitor construction ID",
    )
}

fn get_configuration_factor(configuration_id: u32) -> Result<f64> {
    keyed_value(
        &PI_CF,
        configuration_id,
        "get_configuration_factor",
        "capacitor configuration ID",
    )
}

fn subcategory_factors(
    subcategory_id: u32,
    function: &'static str,
) -> Result<&'static [f64; 7]> {
    subcategory_id
        .checked_sub(1)
        .and_then(|i| FACTORS.get(i as usize))
        .ok_or_else(|| AnalysisError::UnknownTableKey {
            function,
            detail: format!("capacitor subcategory ID {}", subcategory_id),
        })
}

/// Reference temperature in Kelvin for a rated maximum temperature.
///
/// A zero rated maximum selects the 85C default.
fn reference_temperature(temperature_rated_max: f64) -> Result<f64> {
    if temperature_rated_max == 0.0 {
        return Ok(358.0);
    }

    REF_TEMPS
        .iter()
        .find(|(rated, _)| *rated == temperature_rated_max)
        .map(|(_, reference)| *reference)
        .ok_or_else(|| AnalysisError::UnknownTableKey {
            function: "reference_temperature",
            detail: format!(
                "capacitor rated maximum temperature {}",
                temperature_rated_max
            ),
        })
}
