//! Capacitor record for MIL-HDBK-217F section 10

use serde::{Deserialize, Serialize};

use crate::records::{
    default_duty_cycle, default_mult_adj_factor, default_one, default_quantity,
    default_temperature_active, is_zero,
};

/// One capacitor in a components file
///
/// Subcategory IDs follow MIL-HDBK-217F section 10 ordering, 1 through 19
/// (paper through vacuum). The `specification_id` selects the governing
/// MIL spec within a subcategory for the part count table; `construction_id`
/// and `configuration_id` feed the piC and piCF factors of the wet tantalum
/// and variable vacuum styles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapacitorRecord {
    /// Caller-assigned hardware identifier, reported in diagnostics
    pub hardware_id: u32,

    /// Free-text reference designator or part name
    #[serde(default)]
    pub description: String,

    /// MIL-HDBK-217F section 10 subcategory, 1-based
    pub subcategory_id: u32,

    /// Governing specification within the subcategory, 1-based
    #[serde(default = "default_one")]
    pub specification_id: u32,

    /// Quality level, 1-based index into the subcategory's piQ table
    #[serde(default = "default_one")]
    pub quality_id: u32,

    /// Active environment, 1-based index into the piE table
    #[serde(default = "default_one")]
    pub environment_active_id: u32,

    /// Construction class for wet tantalum styles (piC)
    #[serde(default = "default_one")]
    pub construction_id: u32,

    /// Configuration class for vacuum styles (piCF)
    #[serde(default = "default_one")]
    pub configuration_id: u32,

    /// Capacitance in farads
    #[serde(default)]
    pub capacitance: f64,

    /// Ratio of operating to rated voltage
    #[serde(default)]
    pub voltage_ratio: f64,

    /// Operating DC voltage, used for the series-resistance factor
    #[serde(default)]
    pub voltage_dc_operating: f64,

    /// Peak operating AC voltage, used for the series-resistance factor
    #[serde(default)]
    pub voltage_ac_operating: f64,

    /// Ratio of reverse operating to rated voltage, checked when derating
    /// tantalum styles
    #[serde(default)]
    pub voltage_reverse_ratio: f64,

    /// Effective series resistance in the tantalum charge path, ohms
    #[serde(default)]
    pub resistance: f64,

    /// Ambient operating temperature, Celsius
    #[serde(default = "default_temperature_active")]
    pub temperature_active: f64,

    /// Maximum rated temperature, Celsius; 0 selects the 85C default
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
    pub pi_cv: f64,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub pi_sr: f64,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub pi_c: f64,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub pi_cf: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacitor_record_defaults() {
        let yaml = "hardware_id: 3\nsubcategory_id: 12\ncapacitance: 3.3e-6";
        let record: CapacitorRecord = serde_yml::from_str(yaml).unwrap();

        assert_eq!(record.hardware_id, 3);
        assert_eq!(record.subcategory_id, 12);
        assert_eq!(record.quality_id, 1);
        assert_eq!(record.environment_active_id, 1);
        assert_eq!(record.quantity, 1);
        assert_eq!(record.duty_cycle, 100.0);
        assert_eq!(record.mult_adj_factor, 1.0);
        assert_eq!(record.temperature_active, 35.0);
        assert_eq!(record.hazard_rate_active, 0.0);
    }

    #[test]
    fn test_capacitor_record_skips_unset_outputs() {
        let yaml = "hardware_id: 1\nsubcategory_id: 1";
        let record: CapacitorRecord = serde_yml::from_str(yaml).unwrap();
        let out = serde_yml::to_string(&record).unwrap();

        assert!(!out.contains("lambda_b"));
        assert!(!out.contains("pi_cv"));
    }
}
