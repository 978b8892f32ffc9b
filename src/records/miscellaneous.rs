//! Miscellaneous part record for MIL-HDBK-217F sections 19-22

use serde::{Deserialize, Serialize};

use crate::records::{default_duty_cycle, default_mult_adj_factor, default_one, default_quantity, is_zero};

/// One crystal, filter, fuse or lamp in a components file
///
/// Subcategory 1 = quartz crystal, 2 = electronic filter, 3 = fuse,
/// 4 = incandescent lamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiscellaneousRecord {
    /// Caller-assigned hardware identifier, reported in diagnostics
    pub hardware_id: u32,

    /// Free-text reference designator or part name
    #[serde(default)]
    pub description: String,

    /// 1 = crystal, 2 = filter, 3 = fuse, 4 = lamp
    pub subcategory_id: u32,

    /// Quality level, 1-based
    #[serde(default = "default_one")]
    pub quality_id: u32,

    /// Active environment, 1-based index into the piE table
    #[serde(default = "default_one")]
    pub environment_active_id: u32,

    /// Filter construction type, 1-based
    #[serde(default = "default_one")]
    pub type_id: u32,

    /// Lamp application: 1 = alternating current, 2 = direct current
    #[serde(default = "default_one")]
    pub application_id: u32,

    /// Crystal operating frequency, MHz
    #[serde(default)]
    pub frequency_operating: f64,

    /// Lamp rated voltage, volts
    #[serde(default)]
    pub voltage_rated: f64,

    /// Ratio of operating to rated current, checked when derating lamps
    #[serde(default)]
    pub current_ratio: f64,

    /// Additive hazard rate adjustment, failures per million hours
    #[serde(default)]
    pub add_adj_factor: f64,

    /// Multiplicative hazard rate adjustment
    #[serde(default = "default_mult_adj_factor")]
    pub mult_adj_factor: f64,

    /// Number of identical parts this record represents
    #[serde(default = "default_quantity")]
    pub quantity: u32,

    /// Operating duty cycle, percent; also drives the lamp piU steps
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
    pub pi_u: f64,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub pi_a: f64,
}
