//! Inductive device record for MIL-HDBK-217F section 11

use serde::{Deserialize, Serialize};

use crate::records::{
    default_duty_cycle, default_mult_adj_factor, default_one, default_quantity,
    default_temperature_active, is_zero,
};

/// One transformer or coil in a components file
///
/// Subcategory 1 is a transformer, 2 is a coil. The hot spot temperature
/// either comes from an explicit `temperature_rise`, a MIL-C-39010 spec
/// sheet page, or is derived from dissipated power and the case area or
/// weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InductorRecord {
    /// Caller-assigned hardware identifier, reported in diagnostics
    pub hardware_id: u32,

    /// Free-text reference designator or part name
    #[serde(default)]
    pub description: String,

    /// 1 = transformer, 2 = coil
    pub subcategory_id: u32,

    /// Insulation class, 1-based key into the base hazard rate table
    #[serde(default = "default_one")]
    pub insulation_id: u32,

    /// Device family within the subcategory (power, audio, RF, ...)
    #[serde(default = "default_one")]
    pub family_id: u32,

    /// Construction class for coils: 1 = fixed, 2 = variable
    #[serde(default = "default_one")]
    pub construction_id: u32,

    /// Governing specification; 2 selects spec sheet temperature rise
    #[serde(default = "default_one")]
    pub specification_id: u32,

    /// Spec sheet page for the temperature rise lookup, 1-based
    #[serde(default)]
    pub page_number: u32,

    /// Quality level, 1-based
    #[serde(default = "default_one")]
    pub quality_id: u32,

    /// Active environment, 1-based index into the piE table
    #[serde(default = "default_one")]
    pub environment_active_id: u32,

    /// Dissipated power in watts
    #[serde(default)]
    pub power_operating: f64,

    /// Operating DC voltage, used with current to estimate input power
    #[serde(default)]
    pub voltage_dc_operating: f64,

    /// Operating current in amperes
    #[serde(default)]
    pub current_operating: f64,

    /// Ratio of operating to rated current, checked when derating
    #[serde(default)]
    pub current_ratio: f64,

    /// Ratio of operating to rated voltage, checked when derating
    #[serde(default)]
    pub voltage_ratio: f64,

    /// Radiating surface area of the case, square inches
    #[serde(default)]
    pub area: f64,

    /// Transformer weight in pounds
    #[serde(default)]
    pub weight: f64,

    /// Ambient operating temperature, Celsius
    #[serde(default = "default_temperature_active")]
    pub temperature_active: f64,

    /// Case temperature rise, Celsius; 0 means derive from power
    #[serde(default)]
    pub temperature_rise: f64,

    /// Maximum rated temperature, Celsius; 0 selects the subcategory default
    #[serde(default)]
    pub temperature_rated_max: f64,

    /// Additive hazard rate adjustment, failures per million hours
    #[serde(default)]
    pub add_adj_factor: f64,

    /// Multiplicative hazard rate adjustment
    #[serde(default = "default_mult_adj_factor")]
    pub mult_adj_factor: f64,

    /// Number of identical parts this record represents
    #[serde(default = "default_quantity")]
    pub quantity: u32,

    /// Operating duty cycle, percent
    #[serde(default = "default_duty_cycle")]
    pub duty_cycle: f64,

    // Calculation outputs, written back by the prediction engine.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub hazard_rate_active: f64,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub lambda_b: f64,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub pi_q: f64,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub pi_e: f64,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub pi_c: f64,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub temperature_hot_spot: f64,
}
