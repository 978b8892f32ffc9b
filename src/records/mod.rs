//! Record types for the plain-text analysis inputs
//!
//! Every `lrt` input file is a YAML document with a `kind` discriminator and
//! a list of records. The component records double as calculation scratch
//! space: the MIL-HDBK-217F engine writes the hazard rate and intermediate
//! pi factors back onto the record so output formats can show the full
//! factor breakdown, not just the final number.

pub mod capacitor;
pub mod component;
pub mod fmea;
pub mod growth;
pub mod inductor;
pub mod loader;
pub mod miscellaneous;
pub mod survival;

pub use capacitor::CapacitorRecord;
pub use component::{ComponentFile, ComponentRecord};
pub use fmea::{FmeaFile, FmeaMode};
pub use growth::{FailureRecord, GrowthFile, GrowthPlan, PlannedPhase};
pub use inductor::InductorRecord;
pub use loader::{InputFile, LoadError};
pub use miscellaneous::MiscellaneousRecord;
pub use survival::{ObservationStatus, SurvivalFile, SurvivalObservation};

pub(crate) fn default_one() -> u32 {
    1
}

pub(crate) fn default_quantity() -> u32 {
    1
}

pub(crate) fn default_duty_cycle() -> f64 {
    100.0
}

pub(crate) fn default_mult_adj_factor() -> f64 {
    1.0
}

pub(crate) fn default_temperature_active() -> f64 {
    35.0
}

pub(crate) fn default_confidence() -> f64 {
    0.90
}

pub(crate) fn is_zero(value: &f64) -> bool {
    *value == 0.0
}
