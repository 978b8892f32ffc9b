//! FMEA worksheet records

use serde::{Deserialize, Serialize};

use crate::records::is_zero;

fn default_effect_probability() -> f64 {
    1.0
}

/// One failure mode row in an FMEA file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FmeaMode {
    /// Failure mode description
    pub description: String,

    /// Severity rating, 1 to 10
    pub severity: u32,

    /// Occurrence rating, 1 to 10
    pub occurrence: u32,

    /// Detection rating, 1 to 10
    pub detection: u32,

    /// Fraction of item failures that take this mode
    #[serde(default)]
    pub mode_ratio: f64,

    /// Conditional probability the mode produces its end effect
    #[serde(default = "default_effect_probability")]
    pub effect_probability: f64,

    // Calculation outputs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpn: Option<u32>,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub mode_hazard_rate: f64,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub mode_criticality: f64,
}

/// Top-level shape of an FMEA file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FmeaFile {
    /// File discriminator, always "fmea"
    pub kind: String,

    /// Optional item under analysis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Item hazard rate, failures per million hours
    #[serde(default)]
    pub item_hazard_rate: f64,

    /// Mission time over which mode criticality accumulates, hours
    #[serde(default)]
    pub mission_time: f64,

    pub modes: Vec<FmeaMode>,
}
