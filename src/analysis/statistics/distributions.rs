//! Distribution quantiles and CDFs
//!
//! Self-contained implementations of the handful of special functions the
//! growth and survival engines need:
//! - Lanczos log-gamma
//! - regularized incomplete gamma (series + Lentz continued fraction)
//! - chi-square CDF and quantile (Wilson-Hilferty start, Newton refinement)
//! - standard normal quantile (Acklam's rational approximation)
//! - Student's t quantile (Cornish-Fisher start, Newton refinement)
//! - regularized incomplete beta (Lentz continued fraction)
//!
//! The chi-square and Student's t quantiles are Newton-refined against their
//! own CDFs, so they are accurate to near machine precision. The normal
//! quantile is the rational approximation alone, good to about 1e-9 relative.

use std::f64::consts::PI;

const FPMIN: f64 = 1.0e-300;
const EPS: f64 = 3.0e-14;
const MAX_ITER: usize = 300;

/// Lanczos coefficients, g = 7
const LANCZOS: [f64; 9] = [
    0.999_999_999_999_809_93,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_13,
    -176.615_029_162_140_59,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_571_6e-6,
    1.505_632_735_149_311_6e-7,
];

/// Natural log of the gamma function
pub fn ln_gamma(x: f64) -> f64 {
    if x < 0.5 {
        // Reflection formula for the left half-plane.
        PI.ln() - (PI * x).sin().abs().ln() - ln_gamma(1.0 - x)
    } else {
        let x = x - 1.0;
        let mut acc = LANCZOS[0];
        for (i, &c) in LANCZOS.iter().enumerate().skip(1) {
            acc += c / (x + i as f64);
        }
        let t = x + 7.5;
        0.5 * (2.0 * PI).ln() + (x + 0.5) * t.ln() - t + acc.ln()
    }
}

/// Regularized lower incomplete gamma function P(a, x)
pub fn gamma_p(a: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x < a + 1.0 {
        gamma_p_series(a, x)
    } else {
        1.0 - gamma_q_cf(a, x)
    }
}

/// Series expansion for P(a, x), converges quickly for x < a + 1
fn gamma_p_series(a: f64, x: f64) -> f64 {
    let mut term = 1.0 / a;
    let mut sum = term;
    for n in 1..MAX_ITER {
        term *= x / (a + n as f64);
        sum += term;
        if term.abs() < sum.abs() * EPS {
            break;
        }
    }
    sum * (-x + a * x.ln() - ln_gamma(a)).exp()
}

/// Lentz continued fraction for Q(a, x) = 1 - P(a, x), for x >= a + 1
fn gamma_q_cf(a: f64, x: f64) -> f64 {
    let mut b = x + 1.0 - a;
    let mut c = 1.0 / FPMIN;
    let mut d = 1.0 / b;
    let mut h = d;
    for i in 1..MAX_ITER {
        let an = -(i as f64) * (i as f64 - a);
        b += 2.0;
        d = an * d + b;
        if d.abs() < FPMIN {
            d = FPMIN;
        }
        c = b + an / c;
        if c.abs() < FPMIN {
            c = FPMIN;
        }
        d = 1.0 / d;
        let del = d * c;
        h *= del;
        if (del - 1.0).abs() < EPS {
            break;
        }
    }
    (-x + a * x.ln() - ln_gamma(a)).exp() * h
}

/// Chi-square CDF with `df` degrees of freedom
pub fn chi_square_cdf(x: f64, df: f64) -> f64 {
    gamma_p(0.5 * df, 0.5 * x)
}

/// Chi-square density, used by the quantile's Newton steps
fn chi_square_pdf(x: f64, df: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    let half = 0.5 * df;
    ((half - 1.0) * x.ln() - 0.5 * x - half * std::f64::consts::LN_2 - ln_gamma(half)).exp()
}

/// Chi-square quantile with `df` degrees of freedom
///
/// Starts from the Wilson-Hilferty cube approximation and Newton-refines
/// against the CDF until the step is below 1e-12 relative.
pub fn chi_square_ppf(p: f64, df: f64) -> f64 {
    if p <= 0.0 {
        return 0.0;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }

    let z = inverse_normal(p);
    let t = 2.0 / (9.0 * df);
    let mut x = df * (1.0 - t + z * t.sqrt()).powi(3);
    if x <= 0.0 || !x.is_finite() {
        x = 0.5 * df;
    }

    for _ in 0..100 {
        let err = chi_square_cdf(x, df) - p;
        let slope = chi_square_pdf(x, df);
        if slope <= 0.0 {
            break;
        }
        let mut step = err / slope;
        // Keep the iterate inside the support.
        while x - step <= 0.0 {
            step *= 0.5;
        }
        x -= step;
        if step.abs() <= 1.0e-12 * x.max(1.0) {
            break;
        }
    }
    x
}

/// Standard normal quantile, Acklam's rational approximation
///
/// Relative accuracy about 1.15e-9 over the full open interval (0, 1).
pub fn inverse_normal(p: f64) -> f64 {
    const A: [f64; 6] = [
        -3.969_683_028_665_376e1,
        2.209_460_984_245_205e2,
        -2.759_285_104_469_687e2,
        1.383_577_518_672_69e2,
        -3.066_479_806_614_716e1,
        2.506_628_277_459_239,
    ];
    const B: [f64; 5] = [
        -5.447_609_879_822_406e1,
        1.615_858_368_580_409e2,
        -1.556_989_798_598_866e2,
        6.680_131_188_771_972e1,
        -1.328_068_155_288_572e1,
    ];
    const C: [f64; 6] = [
        -7.784_894_002_430_293e-3,
        -3.223_964_580_411_365e-1,
        -2.400_758_277_161_838,
        -2.549_732_539_343_734,
        4.374_664_141_464_968,
        2.938_163_982_698_783,
    ];
    const D: [f64; 4] = [
        7.784_695_709_041_462e-3,
        3.224_671_290_700_398e-1,
        2.445_134_137_142_996,
        3.754_408_661_907_416,
    ];
    const P_LOW: f64 = 0.02425;

    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }

    if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= 1.0 - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -(((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    }
}

/// Regularized incomplete beta function I_x(a, b)
pub fn incomplete_beta(a: f64, b: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let ln_front =
        ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln();
    // The continued fraction converges fastest below the distribution mean.
    if x < (a + 1.0) / (a + b + 2.0) {
        ln_front.exp() * beta_cf(a, b, x) / a
    } else {
        1.0 - ln_front.exp() * beta_cf(b, a, 1.0 - x) / b
    }
}

/// Lentz continued fraction for the incomplete beta function
fn beta_cf(a: f64, b: f64, x: f64) -> f64 {
    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;
    let mut c = 1.0;
    let mut d = 1.0 - qab * x / qap;
    if d.abs() < FPMIN {
        d = FPMIN;
    }
    d = 1.0 / d;
    let mut h = d;

    for m in 1..MAX_ITER {
        let m = m as f64;
        let m2 = 2.0 * m;

        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 + aa * d;
        if d.abs() < FPMIN {
            d = FPMIN;
        }
        c = 1.0 + aa / c;
        if c.abs() < FPMIN {
            c = FPMIN;
        }
        d = 1.0 / d;
        h *= d * c;

        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 + aa * d;
        if d.abs() < FPMIN {
            d = FPMIN;
        }
        c = 1.0 + aa / c;
        if c.abs() < FPMIN {
            c = FPMIN;
        }
        d = 1.0 / d;
        let del = d * c;
        h *= del;

        if (del - 1.0).abs() < EPS {
            break;
        }
    }
    h
}

/// Student's t CDF with `df` degrees of freedom
fn students_t_cdf(t: f64, df: f64) -> f64 {
    let x = df / (df + t * t);
    let tail = 0.5 * incomplete_beta(0.5 * df, 0.5, x);
    if t > 0.0 {
        1.0 - tail
    } else {
        tail
    }
}

/// Student's t density
fn students_t_pdf(t: f64, df: f64) -> f64 {
    (ln_gamma(0.5 * (df + 1.0))
        - ln_gamma(0.5 * df)
        - 0.5 * (df * PI).ln()
        - 0.5 * (df + 1.0) * (1.0 + t * t / df).ln())
    .exp()
}

/// Student's t quantile with `df` degrees of freedom
///
/// Starts from the normal quantile plus the Cornish-Fisher correction terms
/// and Newton-refines against the t CDF.
pub fn students_t_ppf(p: f64, df: f64) -> f64 {
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }
    if (p - 0.5).abs() < 1.0e-16 {
        return 0.0;
    }

    let z = inverse_normal(p);
    let z2 = z * z;
    let g1 = (z2 + 1.0) * z / 4.0;
    let g2 = ((5.0 * z2 + 16.0) * z2 + 3.0) * z / 96.0;
    let g3 = (((3.0 * z2 + 19.0) * z2 + 17.0) * z2 - 15.0) * z / 384.0;
    let g4 = ((((79.0 * z2 + 776.0) * z2 + 1482.0) * z2 - 1920.0) * z2 - 945.0) * z / 92160.0;
    let mut t = z + g1 / df + g2 / (df * df) + g3 / df.powi(3) + g4 / df.powi(4);

    for _ in 0..100 {
        let err = students_t_cdf(t, df) - p;
        let slope = students_t_pdf(t, df);
        if slope <= 0.0 {
            break;
        }
        let step = err / slope;
        t -= step;
        if step.abs() <= 1.0e-12 * t.abs().max(1.0) {
            break;
        }
    }
    t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ln_gamma_known_values() {
        // gamma(5) = 24
        assert!((ln_gamma(5.0) - 24.0_f64.ln()).abs() < 1e-12);
        // gamma(1/2) = sqrt(pi)
        assert!((ln_gamma(0.5) - 0.5723649429247001).abs() < 1e-12);
        assert!(ln_gamma(1.0).abs() < 1e-12);
        assert!(ln_gamma(2.0).abs() < 1e-12);
    }

    #[test]
    fn test_gamma_p_exponential_case() {
        // P(1, x) = 1 - exp(-x)
        assert!((gamma_p(1.0, 2.0) - (1.0 - (-2.0_f64).exp())).abs() < 1e-12);
        assert_eq!(gamma_p(1.0, 0.0), 0.0);
    }

    #[test]
    fn test_chi_square_df2_is_exponential() {
        // With two degrees of freedom the quantile is -2 ln(1 - p).
        assert!((chi_square_ppf(0.025, 2.0) - 0.05063561596857978).abs() < 1e-10);
        assert!((chi_square_ppf(0.975, 2.0) - 7.377758908227873).abs() < 1e-9);
    }

    #[test]
    fn test_chi_square_ppf_round_trip() {
        for &(p, df) in &[(0.05, 10.0), (0.95, 10.0), (0.6, 3.0), (0.995, 44.0)] {
            let x = chi_square_ppf(p, df);
            assert!(
                (chi_square_cdf(x, df) - p).abs() < 1e-10,
                "round trip failed at p={p} df={df}"
            );
        }
    }

    #[test]
    fn test_inverse_normal() {
        assert!(inverse_normal(0.5).abs() < 1e-9);
        assert!((inverse_normal(0.975) - 1.959963984540054).abs() < 1e-7);
        assert!((inverse_normal(0.9) - 1.2815515655446004).abs() < 1e-7);
        // Symmetry
        assert!((inverse_normal(0.1) + inverse_normal(0.9)).abs() < 1e-9);
        assert_eq!(inverse_normal(0.0), f64::NEG_INFINITY);
        assert_eq!(inverse_normal(1.0), f64::INFINITY);
    }

    #[test]
    fn test_incomplete_beta_closed_forms() {
        // I_x(1, 1) = x
        assert!((incomplete_beta(1.0, 1.0, 0.3) - 0.3).abs() < 1e-12);
        // I_x(2, 2) = x^2 (3 - 2x)
        assert!((incomplete_beta(2.0, 2.0, 0.3) - 0.216).abs() < 1e-12);
        assert_eq!(incomplete_beta(2.0, 3.0, 0.0), 0.0);
        assert_eq!(incomplete_beta(2.0, 3.0, 1.0), 1.0);
    }

    #[test]
    fn test_students_t_ppf() {
        // Quantile used by the growth regression bounds at 95% two-sided.
        assert!((students_t_ppf(0.05, 21.0) - (-1.7207429028118795)).abs() < 1e-9);
        assert!(students_t_ppf(0.5, 7.0).abs() < 1e-12);
        // Large df approaches the normal quantile.
        assert!((students_t_ppf(0.9, 1.0e6) - inverse_normal(0.9)).abs() < 1e-5);
        // Textbook two-sided 95% critical value for df = 10.
        assert!((students_t_ppf(0.975, 10.0) - 2.228139).abs() < 1e-4);
    }

    #[test]
    fn test_students_t_round_trip() {
        for &(p, df) in &[(0.05, 21.0), (0.25, 4.0), (0.975, 10.0)] {
            let t = students_t_ppf(p, df);
            assert!((students_t_cdf(t, df) - p).abs() < 1e-10);
        }
    }
}
