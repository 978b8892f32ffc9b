//! Reliability growth test records

use serde::{Deserialize, Serialize};

use crate::records::{default_confidence, default_quantity};

/// One failure observation in a growth file
///
/// For exact data `time` is the cumulative test time of a single failure.
/// For grouped data `time` is the end of an interval and `count` the number
/// of failures observed inside it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FailureRecord {
    /// Cumulative test time, hours
    pub time: f64,

    /// Failures at (or up to) this time
    #[serde(default = "default_quantity")]
    pub count: u32,
}

fn default_management_strategy() -> f64 {
    0.95
}

fn default_fix_effectiveness() -> f64 {
    0.7
}

/// One planned test phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedPhase {
    /// Phase label for the report
    #[serde(default)]
    pub name: String,

    /// Cumulative test time at the end of the phase, hours
    pub cumulative_time: f64,

    /// Average MTBF across the phase; 0 derives it from the plan
    #[serde(default)]
    pub mtbf_average: f64,
}

/// Growth program plan parameters for the SPLAN relations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthPlan {
    /// Goal MTBF at the end of the program, hours
    pub mtbf_goal: f64,

    /// MTBF entering the first test phase; 0 derives it
    #[serde(default)]
    pub mtbf_initial: f64,

    /// Average program growth rate; 0 derives it
    #[serde(default)]
    pub growth_rate: f64,

    /// Total planned test time, hours
    pub total_time: f64,

    /// Length of the first test phase, hours
    pub first_phase_time: f64,

    /// Fraction of observed failures receiving a corrective action
    #[serde(default = "default_management_strategy")]
    pub management_strategy: f64,

    /// Average fraction of a failure mode removed by a fix
    #[serde(default = "default_fix_effectiveness")]
    pub fix_effectiveness: f64,

    /// Probability of observing at least one failure in phase one; 0 derives it
    #[serde(default)]
    pub probability: f64,

    /// Planned test phases, in program order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phases: Vec<PlannedPhase>,
}

/// Top-level shape of a growth file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthFile {
    /// File discriminator, always "growth"
    pub kind: String,

    /// Optional free-text program name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Observation end for time terminated tests; 0 means failure terminated
    #[serde(default)]
    pub termination_time: f64,

    /// Whether the failure records are grouped intervals
    #[serde(default)]
    pub grouped: bool,

    /// Confidence level for parameter bounds, fraction or percent
    #[serde(default = "default_confidence")]
    pub confidence: f64,

    #[serde(default)]
    pub failures: Vec<FailureRecord>,

    /// Planning parameters, needed by `lrt growth plan`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<GrowthPlan>,
}

impl GrowthFile {
    /// Split the failure records into count and time vectors
    pub fn observations(&self) -> (Vec<f64>, Vec<f64>) {
        let counts = self.failures.iter().map(|f| f64::from(f.count)).collect();
        let times = self.failures.iter().map(|f| f.time).collect();
        (counts, times)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth_file_parses() {
        let yaml = r#"
kind: growth
termination_time: 3000.0
failures:
  - time: 2.7
  - time: 10.3
  - time: 30.6
    count: 2
"#;
        let file: GrowthFile = serde_yml::from_str(yaml).unwrap();

        assert!(!file.grouped);
        assert_eq!(file.confidence, 0.90);
        let (counts, times) = file.observations();
        assert_eq!(counts, vec![1.0, 1.0, 2.0]);
        assert_eq!(times, vec![2.7, 10.3, 30.6]);
    }

    #[test]
    fn test_growth_plan_defaults() {
        let yaml = r#"
mtbf_goal: 110.0
total_time: 10000.0
first_phase_time: 1000.0
"#;
        let plan: GrowthPlan = serde_yml::from_str(yaml).unwrap();
        assert_eq!(plan.management_strategy, 0.95);
        assert_eq!(plan.fix_effectiveness, 0.7);
        assert_eq!(plan.mtbf_initial, 0.0);
    }
}
