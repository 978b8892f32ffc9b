//! Non-parametric survival estimators
//!
//! Implements the estimators behind the `lrt survival` commands:
//! - `kaplan_meier`: product-limit survival table with Greenwood log-log
//!   bounds, restricted mean life and hazard rate derivation
//! - `turnbull`: self-consistency NPMLE for interval censored data
//! - `ranks`: adjusted mean order numbers and Bernard's median rank
//!   approximation for probability plotting
//!
//! All functions take plain observation slices; expanding record quantities
//! and windowing by time happens in the record layer.

pub mod kaplan_meier;
pub mod ranks;
pub mod turnbull;

pub use kaplan_meier::{
    calculate_kaplan_meier, calculate_kaplan_meier_hazard, calculate_kaplan_meier_mean,
    HazardRow, KaplanMeierFit, KaplanMeierRow, MeanLife,
};
pub use ranks::{adjusted_ranks, bernard_ranks, bernard_ranks_grouped};
pub use turnbull::{calculate_turnbull, TurnbullFit};
