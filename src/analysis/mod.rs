//! Analysis module - reliability math engines
//!
//! Each submodule is a self-contained calculation engine that operates on
//! plain values or record structs and never touches the filesystem:
//! - `validation`: shared range and ratio guards
//! - `stress`: operating-to-rated stress ratios
//! - `derating`: stress-limit checks against derating curves
//! - `milhdbk217f`: MIL-HDBK-217F part count and part stress hazard rates
//! - `fmea`: failure mode criticality and risk priority numbers
//! - `growth`: Duane and Crow-AMSAA reliability growth models
//! - `survival`: non-parametric survival estimators
//! - `statistics`: distribution quantiles and three-point bounds

pub mod derating;
pub mod fmea;
pub mod growth;
pub mod milhdbk217f;
pub mod statistics;
pub mod stress;
pub mod survival;
pub mod validation;

use thiserror::Error;

/// Errors raised by the calculation engines
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("{name} ({value}) is outside the allowed range [{min}, {max}]")]
    OutOfRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{function}: invalid {detail}")]
    IndexOutOfBounds {
        function: &'static str,
        detail: String,
    },

    #[error("{function}: unknown {detail}")]
    UnknownTableKey {
        function: &'static str,
        detail: String,
    },

    #[error(
        "failed to predict the MIL-HDBK-217F hazard rate for hardware ID {hardware_id}; \
         one or more inputs has a negative value: {fields}"
    )]
    NegativeInput { hardware_id: u32, fields: String },

    #[error(
        "failed to predict the MIL-HDBK-217F hazard rate for hardware ID {hardware_id}; \
         one or more inputs has a value of 0.0: {fields}"
    )]
    ZeroInput { hardware_id: u32, fields: String },

    #[error("{function}: division by zero ({detail})")]
    DivisionByZero {
        function: &'static str,
        detail: String,
    },

    #[error("{function}: solution did not converge after {iterations} iterations")]
    ConvergenceFailure {
        function: &'static str,
        iterations: usize,
    },

    #[error("{function}: {detail}")]
    InsufficientData {
        function: &'static str,
        detail: String,
    },
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
