//! Idealized and planned growth curve values
//!
//! Both curves are sampled at one-hour steps for plotting. The idealized
//! curve holds the initial MTBF over the first test phase, breaks at the
//! phase boundary (a NaN gap, so plots show a discontinuity instead of a
//! connecting line) and then follows
//!
//! ```text
//! MTBF(t) = MI * (t / t1)^GR / (1 - GR)
//! ```
//!
//! The planned curve is a step function holding each phase's average MTBF,
//! with a NaN gap between phases. Passing `mtbf = false` returns failure
//! intensities (reciprocals) instead.

/// Idealized growth curve sampled at each whole hour of test time
pub fn calculate_idealized_values(
    total_time: f64,
    first_phase_time: f64,
    initial_mtbf: f64,
    growth_rate: f64,
    mtbf: bool,
) -> Vec<f64> {
    let steps = total_time as usize;
    let boundary = first_phase_time.trunc();

    let mut values = Vec::with_capacity(steps);
    let mut time = 0.0;
    for _ in 0..steps {
        let value = if time < boundary {
            initial_mtbf
        } else if time == boundary {
            f64::NAN
        } else {
            (initial_mtbf * (time / first_phase_time).powf(growth_rate)) / (1.0 - growth_rate)
        };
        values.push(if mtbf { value } else { 1.0 / value });
        time += 1.0;
    }

    values
}

/// Planned growth curve holding each phase's average MTBF
///
/// Phases are given as parallel slices of phase duration and phase average
/// MTBF; extra entries in the longer slice are ignored.
pub fn calculate_planned_values(
    phase_times: &[f64],
    phase_mtbfs: &[f64],
    mtbf: bool,
) -> Vec<f64> {
    let mut values = Vec::new();
    for (&duration, &average_mtbf) in phase_times.iter().zip(phase_mtbfs) {
        let value = if mtbf { average_mtbf } else { 1.0 / average_mtbf };
        let mut time = 0.0;
        while time < duration - 1.0 {
            values.push(value);
            time += 1.0;
        }
        values.push(f64::NAN);
    }

    values
}

/// Growth rate that carries the idealized curve from `initial_mtbf` to
/// `final_mtbf` over the program
///
/// Solves `(TTT / t1)^GR + (MF / MI) * (GR - 1) = 0` by bisection over
/// [0, 1]. A final MTBF at or below the initial one needs no growth and
/// returns zero.
pub fn solve_growth_rate(
    initial_mtbf: f64,
    final_mtbf: f64,
    total_time: f64,
    first_phase_time: f64,
) -> f64 {
    let time_ratio = total_time / first_phase_time;
    let mtbf_ratio = final_mtbf / initial_mtbf;
    let score = |rate: f64| time_ratio.powf(rate) + mtbf_ratio * (rate - 1.0);

    let mut lo = 0.0;
    let mut hi = 1.0;
    if score(lo) >= 0.0 {
        return 0.0;
    }
    for _ in 0..200 {
        let mid = 0.5 * (lo + hi);
        if score(mid) < 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo <= 1.0e-14 {
            break;
        }
    }

    0.5 * (lo + hi)
}
