//! Duane reliability growth model
//!
//! The Duane postulate is a log-linear relation between cumulative MTBF and
//! cumulative test time:
//!
//! ```text
//! cumulative MTBF      MTBFc = beta * T^alpha
//! cumulative intensity lambda_c = (1 / beta) * T^-alpha
//! instantaneous MTBF   MTBFi = MTBFc / (1 - alpha)
//! ```
//!
//! `alpha` is the growth slope and `beta` the scale. Parameters are fit by
//! least squares on ln(MTBFc) vs ln(T); a degenerate input (no failures)
//! yields `(alpha, beta) = (0.0, 1.0)` instead of an error so a report over
//! an empty test record renders as "no growth" rather than aborting.

/// Fit the Duane parameters to failure counts and cumulative times
///
/// `n_failures[i]` is the number of failures recorded at cumulative test
/// time `fail_times[i]`. Returns `(alpha, beta)`: the growth slope and the
/// scale of the cumulative MTBF line. An empty data set, a zero total
/// failure count or a zero regression denominator falls back to the
/// degenerate `(0.0, 1.0)`.
pub fn calculate_duane_parameters(n_failures: &[f64], fail_times: &[f64]) -> (f64, f64) {
    let total: f64 = n_failures.iter().sum();
    if fail_times.is_empty() || total <= 0.0 {
        return (0.0, 1.0);
    }

    let (log_t, log_t2, log_m, log_tm) = log_sums(n_failures, fail_times);

    let denominator = log_t2 - log_t.powi(2) / total;
    let alpha = if denominator == 0.0 {
        0.0
    } else {
        (log_tm - log_t * log_m / total) / denominator
    };

    let beta = ((log_m - alpha * log_t) / total).exp();
    let beta = if beta.is_finite() { beta } else { 1.0 };

    (alpha, beta)
}

/// Standard errors of the fitted Duane parameters
///
/// Returns `(variance, se_ln_beta, se_alpha)`: the residual variance of the
/// log-log fit, the standard error of ln(beta) and the standard error of
/// alpha. With fewer than three total failures the residual sum of squares
/// is used directly as the variance instead of dividing by n - 2.
pub fn calculate_duane_standard_error(
    n_failures: &[f64],
    fail_times: &[f64],
    alpha: f64,
    beta: f64,
) -> (f64, f64, f64) {
    let total: f64 = n_failures.iter().sum();
    if fail_times.is_empty() || total <= 0.0 {
        return (0.0, 0.0, 0.0);
    }

    let (log_t, log_t2, _, _) = log_sums(n_failures, fail_times);

    let mut sse = 0.0;
    let mut cumulative = 0.0;
    for (&count, &time) in n_failures.iter().zip(fail_times) {
        cumulative += count;
        let residual = (beta.ln() + alpha * time.ln()) - (time / cumulative).ln();
        sse += residual.powi(2);
    }

    let variance = if total > 2.0 { sse / (total - 2.0) } else { sse };

    let sxx = log_t2 - log_t.powi(2) / total;
    let sxx = if sxx == 0.0 { 1.0 } else { sxx };

    let se_ln_beta = variance.sqrt() * (log_t2 / (total * sxx)).sqrt();
    let se_ln_beta = if se_ln_beta.is_finite() { se_ln_beta } else { 0.0 };

    let se_alpha = variance.sqrt() / sxx.sqrt();
    let se_alpha = if se_alpha.is_finite() { se_alpha } else { 0.0 };

    (variance, se_ln_beta, se_alpha)
}

/// Cumulative and instantaneous MTBF at `time`
///
/// An `alpha` of 1.0 puts the instantaneous mean at infinity.
pub fn calculate_duane_mean(alpha: f64, beta: f64, time: f64) -> (f64, f64) {
    let cumulative = beta * time.powf(alpha);
    (cumulative, cumulative / (1.0 - alpha))
}

/// Sums of ln(T), ln(T)^2, ln(MTBFc) and ln(T)ln(MTBFc) over the data
fn log_sums(n_failures: &[f64], fail_times: &[f64]) -> (f64, f64, f64, f64) {
    let mut log_t = 0.0;
    let mut log_t2 = 0.0;
    let mut log_m = 0.0;
    let mut log_tm = 0.0;

    let mut cumulative = 0.0;
    for (&count, &time) in n_failures.iter().zip(fail_times) {
        cumulative += count;
        let lt = time.ln();
        let lm = (time / cumulative).ln();
        log_t += lt;
        log_t2 += lt.powi(2);
        log_m += lm;
        log_tm += lt * lm;
    }

    (log_t, log_t2, log_m, log_tm)
}
