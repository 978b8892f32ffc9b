//! NHPP failure time simulation
//!
//! Draws synthetic failure histories from a fitted or planned power law
//! process by sequential inversion: exponential arrivals accumulate on the
//! cumulative intensity scale and map back through
//!
//! ```text
//! t_i = (Lambda_i / lambda)^(1 / beta),  Lambda_i = Lambda_i-1 + E_i
//! ```
//!
//! where each `E_i` is a unit exponential draw.

use rand::Rng;

/// Simulate failure times of a power law process up to `t_max`
///
/// Returns the ordered failure times. Non-positive parameters yield an
/// empty history.
pub fn simulate_power_law<R: Rng>(lambda: f64, beta: f64, t_max: f64, rng: &mut R) -> Vec<f64> {
    let mut times = Vec::new();
    if lambda <= 0.0 || beta <= 0.0 || t_max <= 0.0 {
        return times;
    }

    let mut cumulative_intensity = 0.0;
    loop {
        let u: f64 = rng.random();
        cumulative_intensity -= u.ln();
        let time = (cumulative_intensity / lambda).powf(1.0 / beta);
        if !(time <= t_max) {
            break;
        }
        times.push(time);
    }

    times
}
