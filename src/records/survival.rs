//! Survival observation records

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::records::{default_confidence, default_quantity};

/// Censoring status of one observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ObservationStatus {
    /// Failure observed at `time`
    #[default]
    Event,
    /// Unit survived past `time`
    Censored,
    /// Failure occurred somewhere in [time, right]
    Interval,
}

impl std::fmt::Display for ObservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObservationStatus::Event => write!(f, "event"),
            ObservationStatus::Censored => write!(f, "censored"),
            ObservationStatus::Interval => write!(f, "interval"),
        }
    }
}

impl FromStr for ObservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "event" | "failure" | "1" => Ok(ObservationStatus::Event),
            "censored" | "suspension" | "0" => Ok(ObservationStatus::Censored),
            "interval" | "3" => Ok(ObservationStatus::Interval),
            _ => Err(format!("Unknown observation status: {}", s)),
        }
    }
}

/// One time-to-event observation
///
/// Kaplan-Meier uses `time` and `status`; the Turnbull estimator reads the
/// censoring interval [time, right].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SurvivalObservation {
    /// Event or censoring time; left edge for interval censoring
    pub time: f64,

    /// Right edge of the censoring interval
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<f64>,

    #[serde(default)]
    pub status: ObservationStatus,

    /// Number of identical observations this record represents
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

/// Top-level shape of a survival file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurvivalFile {
    /// File discriminator, always "survival"
    pub kind: String,

    /// Optional free-text dataset name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Confidence level for the survival bounds, fraction or percent
    #[serde(default = "default_confidence")]
    pub confidence: f64,

    /// Ignore observations past this time; 0 keeps everything
    #[serde(default)]
    pub time_limit: f64,

    pub observations: Vec<SurvivalObservation>,
}

impl SurvivalFile {
    /// Expand quantities into `(time, is_event)` pairs for the product-limit fit
    pub fn km_observations(&self) -> Vec<(f64, bool)> {
        let mut out = Vec::new();
        for obs in &self.observations {
            let is_event = obs.status == ObservationStatus::Event;
            for _ in 0..obs.quantity {
                out.push((obs.time, is_event));
            }
        }
        out
    }

    /// Expand quantities into censoring intervals for the Turnbull fit
    pub fn intervals(&self) -> Vec<(f64, f64)> {
        let mut out = Vec::new();
        for obs in &self.observations {
            let right = match obs.status {
                ObservationStatus::Event => obs.time,
                ObservationStatus::Censored => f64::INFINITY,
                ObservationStatus::Interval => obs.right.unwrap_or(obs.time),
            };
            for _ in 0..obs.quantity {
                out.push((obs.time, right));
            }
        }
        out
    }
}
