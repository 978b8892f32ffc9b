//! Statistical primitives shared by the growth and survival engines
//!
//! - `distributions`: quantile and CDF routines for the normal, chi-square,
//!   Student's t and beta distributions
//! - `bounds`: three-point (beta/PERT) estimates with normal confidence bounds

pub mod bounds;
pub mod distributions;

pub use bounds::beta_bounds;
pub use distributions::{
    chi_square_cdf, chi_square_ppf, incomplete_beta, inverse_normal, ln_gamma, students_t_ppf,
};
