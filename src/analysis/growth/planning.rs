//! Reliability growth program planning (SPLAN)
//!
//! MIL-HDBK-189 planning relations connecting the program-level quantities:
//!
//! ```text
//! MF   = MI * exp(GR * (0.5 * GR + ln(TTT / t1) + 1))
//! MI   = (-t1 * MS) / ln(1 - p)
//! TTT  = t1 * ((1 - GR) * MF / MI)^(1 / GR)
//! MGP  = MA / (1 - MS * FEF)
//! ```
//!
//! where MI/MF are the initial and final MTBF, MA the average MTBF over a
//! phase, TTT the total time on test, t1 the first phase length, GR the
//! growth rate, MS the management strategy, FEF the average fix
//! effectiveness factor and MGP the growth potential MTBF.
//!
//! Planning inputs are routinely incomplete while a test program is being
//! sketched out, so every relation degrades to a defined sentinel instead
//! of erroring when a divisor or logarithm argument collapses.

/// Initial MTBF for the whole test program
///
/// Prefers the failure-observation form driven by the management strategy
/// and the probability of seeing at least one failure; falls back to
/// inverting the final MTBF through the growth model, then to zero.
pub fn calculate_initial_mtbf(
    total_time: f64,
    first_phase_time: f64,
    final_mtbf: f64,
    growth_rate: f64,
    management_strategy: f64,
    probability: f64,
) -> f64 {
    if 1.0 - probability > 0.0 {
        let denominator = (1.0 - probability).ln();
        if denominator != 0.0 {
            return (-first_phase_time * management_strategy) / denominator;
        }
    }

    let ratio = total_time / first_phase_time;
    if ratio.is_finite() && ratio > 0.0 {
        let scale = (growth_rate * (0.5 * growth_rate + ratio.ln() + 1.0)).exp();
        if scale != 0.0 {
            return final_mtbf / scale;
        }
    }

    0.0
}

/// Final MTBF of the program, or of one phase when `total_time` is the
/// phase end
pub fn calculate_final_mtbf(
    total_time: f64,
    first_phase_time: f64,
    initial_mtbf: f64,
    growth_rate: f64,
) -> f64 {
    let ratio = total_time / first_phase_time;
    if !ratio.is_finite() || ratio <= 0.0 {
        return 0.0;
    }

    initial_mtbf * (growth_rate * (0.5 * growth_rate + ratio.ln() + 1.0)).exp()
}

/// Expected failures and average MTBF over one test phase
///
/// `previous_time` and `previous_failures` accumulate over the phases
/// already planned. Returns `(expected failures, average MTBF)`.
pub fn calculate_average_mtbf(
    total_time: f64,
    first_phase_time: f64,
    initial_mtbf: f64,
    growth_rate: f64,
    previous_time: f64,
    previous_failures: f64,
) -> (f64, f64) {
    let n_failures = (1.0 / initial_mtbf)
        * first_phase_time
        * (total_time / first_phase_time).powf(1.0 - growth_rate)
        - previous_failures;
    let average_mtbf = (total_time - previous_time) / n_failures;

    (n_failures, average_mtbf)
}

/// Total test time the program needs to grow from `initial_mtbf` to
/// `final_mtbf`
///
/// Falls back to extrapolating the average MTBF over the expected failures
/// when the model form collapses.
pub fn calculate_total_time(
    first_phase_time: f64,
    initial_mtbf: f64,
    final_mtbf: f64,
    growth_rate: f64,
    average_mtbf: f64,
    n_failures: f64,
    cumulative_time: f64,
) -> f64 {
    if initial_mtbf != 0.0 && growth_rate != 0.0 {
        let powered = ((1.0 - growth_rate) * final_mtbf / initial_mtbf).powf(1.0 / growth_rate);
        if !powered.is_nan() {
            if final_mtbf / initial_mtbf == 1.0 {
                return first_phase_time;
            }
            return first_phase_time * powered;
        }
    }

    average_mtbf * n_failures + cumulative_time
}

/// Minimum average growth rate needed to reach `final_mtbf` in
/// `total_time`
pub fn calculate_growth_rate(
    total_time: f64,
    first_phase_time: f64,
    initial_mtbf: f64,
    final_mtbf: f64,
) -> f64 {
    let log_ratio = (total_time / first_phase_time).ln();
    let rate = -log_ratio - 1.0
        + ((1.0 + log_ratio).powi(2) + 2.0 * (final_mtbf / initial_mtbf).ln()).sqrt();

    if rate.is_finite() {
        rate
    } else {
        0.0
    }
}

/// Minimum length of the first test phase
pub fn calculate_minimum_first_phase_time(
    total_time: f64,
    final_mtbf: f64,
    average_mtbf: f64,
    growth_rate: f64,
) -> f64 {
    let time = (total_time.ln()
        - ((1.0 - growth_rate) * (final_mtbf / average_mtbf)).ln() / growth_rate)
        .exp();

    if time.is_finite() {
        time
    } else {
        0.0
    }
}

/// Management strategy needed to reach the growth potential MTBF
pub fn calculate_management_strategy(
    fix_effectiveness: f64,
    average_mtbf: f64,
    growth_potential_mtbf: f64,
) -> f64 {
    if fix_effectiveness == 0.0 || growth_potential_mtbf == 0.0 {
        return 1.0;
    }

    (1.0 - average_mtbf / growth_potential_mtbf) / fix_effectiveness
}

/// Average fix effectiveness factor needed to reach the growth potential
/// MTBF
pub fn calculate_fix_effectiveness(
    management_strategy: f64,
    average_mtbf: f64,
    growth_potential_mtbf: f64,
) -> f64 {
    if management_strategy == 0.0 || growth_potential_mtbf == 0.0 {
        return 1.0;
    }

    (1.0 - average_mtbf / growth_potential_mtbf) / management_strategy
}

/// Probability of observing at least one correctable failure over `time`
pub fn calculate_probability(time: f64, management_strategy: f64, initial_mtbf: f64) -> f64 {
    if initial_mtbf == 0.0 {
        return 0.0;
    }

    1.0 - (-time * management_strategy / initial_mtbf).exp()
}

/// Growth potential MTBF, the ceiling the program can grow to
pub fn calculate_growth_potential(
    average_mtbf: f64,
    management_strategy: f64,
    fix_effectiveness: f64,
) -> f64 {
    let denominator = 1.0 - management_strategy * fix_effectiveness;
    if denominator == 0.0 {
        return f64::INFINITY;
    }

    average_mtbf / denominator
}

#[cfg(test)]
mod tests {
    use super::*;

    // Fixture program: 10000 hours total, 1000 hour first phase, growing
    // from 50 to 110 hours MTBF at rate 0.23.

    #[test]
    fn test_initial_mtbf_from_probability() {
        let mtbf = calculate_initial_mtbf(10000.0, 1000.0, 0.0, 0.0, 0.15, 0.95);
        assert!((mtbf - 50.07123010430013).abs() < 1e-12);
    }

    #[test]
    fn test_initial_mtbf_falls_back_to_model() {
        // probability 1.0 makes ln(1 - p) undefined
        let mtbf = calculate_initial_mtbf(10000.0, 1000.0, 110.0, 0.23, 0.0, 1.0);
        assert!((mtbf - 50.12078510467009).abs() < 1e-12);
    }

    #[test]
    fn test_initial_mtbf_degrades_to_zero() {
        assert_eq!(calculate_initial_mtbf(0.0, 0.0, 110.0, 0.23, 0.0, 1.0), 0.0);
    }

    #[test]
    fn test_final_mtbf_program_and_phases() {
        assert!((calculate_final_mtbf(10000.0, 1000.0, 50.0, 0.23) - 109.73491314060698).abs() < 1e-12);
        assert!((calculate_final_mtbf(1000.0, 1000.0, 50.0, 0.23) - 64.61670737384307).abs() < 1e-12);
        assert!((calculate_final_mtbf(2500.0, 1000.0, 50.0, 0.23) - 79.77577394848697).abs() < 1e-12);
        assert!((calculate_final_mtbf(5000.0, 1000.0, 50.0, 0.23) - 93.56381578880756).abs() < 1e-12);
        assert!((calculate_final_mtbf(7000.0, 1000.0, 50.0, 0.23) - 101.09213610935264).abs() < 1e-12);
    }

    #[test]
    fn test_final_mtbf_degrades_to_zero() {
        assert_eq!(calculate_final_mtbf(10000.0, 0.0, 50.0, 0.23), 0.0);
        assert_eq!(calculate_final_mtbf(0.0, 1000.0, 50.0, 0.23), 0.0);
    }

    #[test]
    fn test_average_mtbf_phase_walk() {
        let (n, mtbf) = calculate_average_mtbf(1000.0, 1000.0, 50.0, 0.23, 0.0, 0.0);
        assert!((n - 20.0).abs() < 1e-12);
        assert!((mtbf - 50.0).abs() < 1e-12);

        let (n, mtbf) = calculate_average_mtbf(2500.0, 1000.0, 50.0, 0.23, 1000.0, 20.0);
        assert!((n - 20.498953614393976).abs() < 1e-12);
        assert!((mtbf - 73.17446676628062).abs() < 1e-12);

        let (n, mtbf) = calculate_average_mtbf(5000.0, 1000.0, 50.0, 0.23, 2500.0, 40.5);
        assert!((n - 28.561641863448614).abs() < 1e-12);
        assert!((mtbf - 87.52998206308799).abs() < 1e-12);

        let (n, mtbf) = calculate_average_mtbf(7000.0, 1000.0, 50.0, 0.23, 5000.0, 69.1);
        assert!((n - 20.386080525121073).abs() < 1e-12);
        assert!((mtbf - 98.1061561851219).abs() < 1e-12);

        let (n, mtbf) = calculate_average_mtbf(10000.0, 1000.0, 50.0, 0.23, 7000.0, 89.5);
        assert!((n - 28.2687310711178).abs() < 1e-12);
        assert!((mtbf - 106.12432487516584).abs() < 1e-12);
    }

    #[test]
    fn test_total_time_from_model() {
        let time = calculate_total_time(1000.0, 50.0, 110.0, 0.23, 0.0, 0.0, 0.0);
        assert!((time - 9891.808002799138).abs() < 1e-9);

        let time = calculate_total_time(1000.0, 50.0, 80.2, 0.23, 0.0, 0.0, 0.0);
        assert!((time - 2504.230499074793).abs() < 1e-9);
    }

    #[test]
    fn test_total_time_equal_mtbfs_is_first_phase() {
        assert_eq!(calculate_total_time(1000.0, 50.0, 50.0, 0.23, 0.0, 0.0, 0.0), 1000.0);
    }

    #[test]
    fn test_total_time_falls_back_to_average() {
        let time = calculate_total_time(0.0, 0.0, 0.0, 0.0, 73.2, 21.0, 1000.0);
        assert!((time - 2537.2).abs() < 1e-12);
    }

    #[test]
    fn test_growth_rate() {
        let rate = calculate_growth_rate(10000.0, 1000.0, 50.0, 110.0);
        assert!((rate - 0.2306829434270563).abs() < 1e-12);

        let rate = calculate_growth_rate(1000.0, 1000.0, 45.0, 50.0);
        assert!((rate - 0.1003276926968859).abs() < 1e-12);

        let rate = calculate_growth_rate(1500.0, 1000.0, 50.0, 80.2);
        assert!((rate - 0.3034331302308362).abs() < 1e-12);
    }

    #[test]
    fn test_growth_rate_degrades_to_zero() {
        assert_eq!(calculate_growth_rate(10000.0, 0.0, 50.0, 110.0), 0.0);
        assert_eq!(calculate_growth_rate(10000.0, 1000.0, 0.0, 110.0), 0.0);
    }

    #[test]
    fn test_minimum_first_phase_time() {
        let time = calculate_minimum_first_phase_time(10000.0, 110.0, 50.0, 0.23);
        assert!((time - 1010.937535096744).abs() < 1e-9);
    }

    #[test]
    fn test_minimum_first_phase_time_degrades_to_zero() {
        assert_eq!(calculate_minimum_first_phase_time(10000.0, 110.0, 50.0, 0.0), 0.0);
        assert_eq!(calculate_minimum_first_phase_time(10000.0, 110.0, 0.0, 0.23), 0.0);
    }

    #[test]
    fn test_management_strategy() {
        let strategy = calculate_management_strategy(0.7, 45.0, 140.0);
        assert!((strategy - 0.9693877551020409).abs() < 1e-15);
        assert_eq!(calculate_management_strategy(0.0, 45.0, 140.0), 1.0);
        assert_eq!(calculate_management_strategy(0.7, 45.0, 0.0), 1.0);
    }

    #[test]
    fn test_fix_effectiveness() {
        let factor = calculate_fix_effectiveness(0.95, 45.0, 140.0);
        assert!((factor - 0.7142857142857143).abs() < 1e-15);
        assert_eq!(calculate_fix_effectiveness(0.0, 45.0, 140.0), 1.0);
    }

    #[test]
    fn test_probability() {
        let probability = calculate_probability(75.0, 0.95, 45.0);
        assert!((probability - 0.7947103424200908).abs() < 1e-12);

        let probability = calculate_probability(1000.0, 0.95, 45.0);
        assert!((probability - 0.9999999993214826).abs() < 1e-12);

        assert_eq!(calculate_probability(75.0, 0.95, 0.0), 0.0);
    }

    #[test]
    fn test_growth_potential() {
        let potential = calculate_growth_potential(45.0, 0.95, 0.7);
        assert!((potential - 134.3283582089552).abs() < 1e-12);

        assert_eq!(calculate_growth_potential(45.0, 1.0, 1.0), f64::INFINITY);
        assert_eq!(calculate_growth_potential(0.0, 0.95, 0.7), 0.0);
    }
}
