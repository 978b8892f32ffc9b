//! Reliability growth models
//!
//! Implements the growth assessment and planning mathematics used by the
//! `lrt growth` commands:
//! - `duane`: Duane log-linear regression with standard errors
//! - `crow_amsaa`: Crow-AMSAA (NHPP power law) MLE, goodness of fit and
//!   Fisher/Crow confidence bounds
//! - `planning`: MIL-HDBK-189 program planning relations (SPLAN)
//! - `curves`: idealized and planned growth curve values for plotting
//! - `simulation`: NHPP failure-time simulation for plan checks
//!
//! All functions operate on plain slices of failure counts and cumulative
//! test times; file parsing and report formatting live in the CLI layer.

pub mod crow_amsaa;
pub mod curves;
pub mod duane;
pub mod planning;
pub mod simulation;

use serde::Serialize;

/// How the power law parameters are estimated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitMethod {
    /// Maximum likelihood on exact or grouped failure times
    Mle,
    /// Least-squares regression through the Duane transform
    Regression,
}

/// Which confidence bound construction to use on the fitted parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsMethod {
    /// Fisher information matrix bounds (log-normal form)
    Fisher,
    /// Dr. Crow's chi-square bounds
    Crow,
}

/// A point estimate with its two-sided confidence bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParameterEstimate {
    pub lower: f64,
    pub point: f64,
    pub upper: f64,
}

/// Fitted power law parameters
///
/// `scale` is lambda and `shape` is beta in the cumulative failure relation
/// N(T) = lambda * T^beta.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PowerLawFit {
    pub scale: ParameterEstimate,
    pub shape: ParameterEstimate,
}

impl PowerLawFit {
    /// Observed growth rate, 1 - beta, with the bounds crossed so the lower
    /// rate comes from the upper shape bound
    pub fn growth_rate(&self) -> ParameterEstimate {
        ParameterEstimate {
            lower: 1.0 - self.shape.upper,
            point: 1.0 - self.shape.point,
            upper: 1.0 - self.shape.lower,
        }
    }
}

/// Cumulative and instantaneous MTBF at one failure time
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MeanEstimate {
    pub time: f64,
    pub cumulative: ParameterEstimate,
    pub instantaneous: ParameterEstimate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth_rate_crosses_bounds() {
        let fit = PowerLawFit {
            scale: ParameterEstimate {
                lower: 0.3,
                point: 0.4,
                upper: 0.5,
            },
            shape: ParameterEstimate {
                lower: 0.51,
                point: 0.61,
                upper: 0.85,
            },
        };
        let rate = fit.growth_rate();
        assert!((rate.lower - 0.15).abs() < 1e-12);
        assert!((rate.point - 0.39).abs() < 1e-12);
        assert!((rate.upper - 0.49).abs() < 1e-12);
    }
}
