//! Kaplan-Meier product-limit estimator
//!
//! The survival probability steps down at each event time:
//!
//! ```text
//! S(t) = prod over ti <= t of (1 - di / ni)
//! ```
//!
//! where `ni` is the number at risk just before `ti` and `di` the number of
//! events at `ti`. Confidence bounds use the Greenwood variance on the
//! log(-log S) scale, which keeps them inside [0, 1] without clipping.

use serde::Serialize;

use crate::analysis::statistics::distributions::inverse_normal;
use crate::analysis::{AnalysisError, Result};

/// One step of the product-limit table
#[derive(Debug, Clone, Copy, Serialize)]
pub struct KaplanMeierRow {
    /// Observation time the row belongs to
    pub time: f64,
    /// Units at risk just before `time`
    pub n_at_risk: usize,
    /// Events recorded at `time`
    pub n_events: usize,
    /// Lower confidence bound on the survival probability
    pub lower: f64,
    /// Survival probability estimate S(t)
    pub s_hat: f64,
    /// Upper confidence bound on the survival probability
    pub upper: f64,
}

/// A fitted product-limit table
#[derive(Debug, Clone, Serialize)]
pub struct KaplanMeierFit {
    /// One row per distinct observation time inside the analysis window
    pub rows: Vec<KaplanMeierRow>,
    /// 1-based positions of the events in the time-ordered observation list
    pub ranks: Vec<usize>,
    /// Observations inside the analysis window
    pub n_total: usize,
    /// Confidence level the bounds were computed at, as a fraction
    pub confidence: f64,
}

/// Restricted mean life derived from a product-limit table
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MeanLife {
    pub lower: f64,
    pub mean: f64,
    pub upper: f64,
    /// Lee & Wang variance of the restricted mean
    pub variance: f64,
}

/// Hazard rates derived from one row of the product-limit table
///
/// Bounds are mapped back into hazard order: the lower hazard bound comes
/// from the upper survival bound. Rows where the survival estimate has
/// reached zero carry the 0.0 / -0.0 sentinels instead of an error.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct HazardRow {
    pub time: f64,
    /// Hazard rate H(t) / t as (lower, point, upper)
    pub hazard: (f64, f64, f64),
    /// Cumulative hazard -ln S(t) as (lower, point, upper)
    pub cumulative: (f64, f64, f64),
    /// Natural log of the cumulative hazard as (lower, point, upper)
    pub log_cumulative: (f64, f64, f64),
}

/// Fit the product-limit table to `(time, is_event)` observations
///
/// Observations outside `[start_time, end_time]` are dropped before the fit;
/// an `end_time` of 0.0 keeps everything. At tied times events are processed
/// before censorings. `confidence` above 1.0 is read as a percentage.
pub fn calculate_kaplan_meier(
    observations: &[(f64, bool)],
    start_time: f64,
    end_time: f64,
    confidence: f64,
) -> Result<KaplanMeierFit> {
    let confidence = fraction(confidence);
    let z = inverse_normal((1.0 + confidence) / 2.0);

    let mut data: Vec<(f64, bool)> = observations
        .iter()
        .copied()
        .filter(|(t, _)| *t >= start_time.max(0.0) && (end_time == 0.0 || *t <= end_time))
        .collect();
    if data.is_empty() {
        return Err(AnalysisError::InsufficientData {
            function: "calculate_kaplan_meier",
            detail: "no observations inside the analysis window".to_string(),
        });
    }
    // Events sort ahead of censorings at tied times.
    data.sort_by(|a, b| a.0.total_cmp(&b.0).then(b.1.cmp(&a.1)));

    let n_total = data.len();
    let ranks: Vec<usize> = data
        .iter()
        .enumerate()
        .filter(|(_, (_, event))| *event)
        .map(|(i, _)| i + 1)
        .collect();

    let mut rows = Vec::new();
    let mut s_hat = 1.0;
    let mut greenwood = 0.0;
    let mut n_at_risk = n_total;

    let mut i = 0;
    while i < data.len() {
        let time = data[i].0;
        let mut n_events = 0;
        let mut n_censored = 0;
        while i < data.len() && data[i].0 == time {
            if data[i].1 {
                n_events += 1;
            } else {
                n_censored += 1;
            }
            i += 1;
        }

        if n_events > 0 {
            s_hat *= 1.0 - n_events as f64 / n_at_risk as f64;
            if n_at_risk > n_events {
                greenwood +=
                    n_events as f64 / ((n_at_risk * (n_at_risk - n_events)) as f64);
            }
        }

        let (lower, upper) = if s_hat > 0.0 {
            let se = greenwood.sqrt() / s_hat.ln().abs();
            (s_hat.powf((z * se).exp()), s_hat.powf((-z * se).exp()))
        } else {
            (0.0, 0.0)
        };

        rows.push(KaplanMeierRow {
            time,
            n_at_risk,
            n_events,
            lower,
            s_hat,
            upper,
        });
        n_at_risk -= n_events + n_censored;
    }

    Ok(KaplanMeierFit {
        rows,
        ranks,
        n_total,
        confidence,
    })
}

/// Restricted mean life from a fitted product-limit table
///
/// The mean is the area under the survival curve up to the last observation
/// time, offset by the first. The variance follows Lee & Wang: each event
/// contributes the squared remaining area weighted by its rank, with the
/// final event (rank n) dropped since it has no survivors behind it.
pub fn calculate_kaplan_meier_mean(fit: &KaplanMeierFit, confidence: f64) -> Result<MeanLife> {
    if fit.rows.is_empty() {
        return Err(AnalysisError::InsufficientData {
            function: "calculate_kaplan_meier_mean",
            detail: "empty product-limit table".to_string(),
        });
    }

    let confidence = fraction(confidence);
    let z = inverse_normal((1.0 + confidence) / 2.0);
    let n = fit.n_total;

    let mut mean = fit.rows[0].time;
    for pair in fit.rows.windows(2) {
        mean += pair[0].s_hat * (pair[1].time - pair[0].time);
    }

    // Area under the survival curve from `time` to the end of the table.
    let area_after = |time: f64| -> f64 {
        let mut area = 0.0;
        for pair in fit.rows.windows(2) {
            let left = pair[0].time.max(time);
            if pair[1].time > left {
                area += pair[0].s_hat * (pair[1].time - left);
            }
        }
        area
    };

    let mut variance = 0.0;
    let mut rank_iter = fit.ranks.iter().copied();
    for row in &fit.rows {
        for _ in 0..row.n_events {
            let Some(rank) = rank_iter.next() else { break };
            if rank >= n {
                continue;
            }
            let area = area_after(row.time);
            variance += area * area / (((n - rank) * (n - rank + 1)) as f64);
        }
    }

    let sd = variance.sqrt();
    Ok(MeanLife {
        lower: mean - z * sd,
        mean,
        upper: mean + z * sd,
        variance,
    })
}

/// Hazard, cumulative hazard and log cumulative hazard for each table row
///
/// Once the survival estimate reaches zero the cumulative hazard is
/// undefined; those rows carry 0.0 entries with a -0.0 log sentinel so a
/// report prints a recognizable terminal row instead of infinities.
pub fn calculate_kaplan_meier_hazard(fit: &KaplanMeierFit) -> Vec<HazardRow> {
    fit.rows
        .iter()
        .map(|row| {
            if row.s_hat > 0.0 && row.s_hat < 1.0 {
                // The lower survival bound gives the upper hazard bound.
                let h_point = -row.s_hat.ln();
                let h_upper = if row.lower > 0.0 { -row.lower.ln() } else { 0.0 };
                let h_lower = if row.upper > 0.0 { -row.upper.ln() } else { 0.0 };
                let log = |h: f64| if h > 0.0 { h.ln() } else { 0.0 };
                HazardRow {
                    time: row.time,
                    hazard: (h_lower / row.time, h_point / row.time, h_upper / row.time),
                    cumulative: (h_lower, h_point, h_upper),
                    log_cumulative: (log(h_lower), log(h_point), log(h_upper)),
                }
            } else {
                HazardRow {
                    time: row.time,
                    hazard: (0.0, 0.0, 0.0),
                    cumulative: (0.0, 0.0, 0.0),
                    log_cumulative: (-0.0, -0.0, -0.0),
                }
            }
        })
        .collect()
}

fn fraction(confidence: f64) -> f64 {
    if confidence > 1.0 {
        confidence / 100.0
    } else {
        confidence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Lee & Wang, example 4.2: remission times of ten leukemia patients.
    fn remission() -> Vec<(f64, bool)> {
        vec![
            (3.0, true),
            (4.0, false),
            (5.7, false),
            (6.5, true),
            (6.5, true),
            (8.4, false),
            (10.0, true),
            (10.0, false),
            (12.0, true),
            (15.0, true),
        ]
    }

    #[test]
    fn test_kaplan_meier_survival_column() {
        let fit = calculate_kaplan_meier(&remission(), 0.0, 100_000.0, 0.75).unwrap();

        assert_eq!(fit.rows.len(), 8);
        assert_eq!(fit.n_total, 10);

        let s: Vec<f64> = fit.rows.iter().map(|r| r.s_hat).collect();
        let expected = [
            0.9, 0.9, 0.9, 0.6428571428571429, 0.6428571428571429, 0.48214285714285715,
            0.24107142857142858, 0.0,
        ];
        for (got, want) in s.iter().zip(expected) {
            assert!((got - want).abs() < 1e-12);
        }
        assert_eq!(fit.rows[7].time, 15.0);
        assert_eq!(fit.rows[7].s_hat, 0.0);
    }

    #[test]
    fn test_kaplan_meier_loglog_bounds() {
        let fit = calculate_kaplan_meier(&remission(), 0.0, 100_000.0, 0.75).unwrap();

        assert!((fit.rows[0].lower - 0.716739881694).abs() < 1e-9);
        assert!((fit.rows[0].upper - 0.967217760075).abs() < 1e-9);
        assert!((fit.rows[3].lower - 0.417990256743).abs() < 1e-9);
        assert!((fit.rows[3].upper - 0.799478608444).abs() < 1e-9);
        assert!((fit.rows[6].lower - 0.065053971668).abs() < 1e-9);
        assert!((fit.rows[6].upper - 0.476784193188).abs() < 1e-9);
        assert_eq!(fit.rows[7].lower, 0.0);
        assert_eq!(fit.rows[7].upper, 0.0);
    }

    #[test]
    fn test_kaplan_meier_event_ranks() {
        let fit = calculate_kaplan_meier(&remission(), 0.0, 100_000.0, 0.75).unwrap();
        assert_eq!(fit.ranks, vec![1, 4, 5, 7, 9, 10]);
    }

    #[test]
    fn test_kaplan_meier_at_risk_counts() {
        let fit = calculate_kaplan_meier(&remission(), 0.0, 100_000.0, 0.75).unwrap();
        let at_risk: Vec<usize> = fit.rows.iter().map(|r| r.n_at_risk).collect();
        assert_eq!(at_risk, vec![10, 9, 8, 7, 5, 4, 2, 1]);
    }

    #[test]
    fn test_kaplan_meier_empty_window() {
        let err = calculate_kaplan_meier(&remission(), 500.0, 600.0, 0.75).unwrap_err();
        assert!(err.to_string().contains("no observations"));
    }

    #[test]
    fn test_kaplan_meier_mean() {
        let fit = calculate_kaplan_meier(&remission(), 0.0, 100_000.0, 0.75).unwrap();
        let mean = calculate_kaplan_meier_mean(&fit, 0.90).unwrap();

        assert!((mean.mean - 10.0875).abs() < 1e-12);
        assert!((mean.variance - 1.942902264031).abs() < 1e-9);
        assert!((mean.lower - 7.794770948761).abs() < 1e-8);
        assert!((mean.upper - 12.380229051239).abs() < 1e-8);
    }

    #[test]
    fn test_kaplan_meier_hazard() {
        let fit = calculate_kaplan_meier(&remission(), 0.0, 100_000.0, 0.75).unwrap();
        let hazard = calculate_kaplan_meier_hazard(&fit);

        // Point estimates at the first and sixth rows.
        assert!((hazard[0].hazard.1 - 0.0351201719).abs() < 1e-9);
        assert!((hazard[0].cumulative.1 - 0.1053605157).abs() < 1e-9);
        assert!((hazard[0].log_cumulative.1 - (-2.2503673273)).abs() < 1e-8);
        assert!((hazard[5].hazard.1 - 0.0729514825).abs() < 1e-9);
        assert!((hazard[5].cumulative.1 - 0.7295148247).abs() < 1e-9);

        // Bound ordering: upper hazard from the lower survival bound.
        assert!(hazard[0].cumulative.0 < hazard[0].cumulative.1);
        assert!(hazard[0].cumulative.2 > hazard[0].cumulative.1);
        assert!((hazard[0].cumulative.0 - 0.033331617490).abs() < 1e-9);
        assert!((hazard[0].cumulative.2 - 0.333042291243).abs() < 1e-8);
    }

    #[test]
    fn test_kaplan_meier_hazard_terminal_sentinels() {
        let fit = calculate_kaplan_meier(&remission(), 0.0, 100_000.0, 0.75).unwrap();
        let hazard = calculate_kaplan_meier_hazard(&fit);

        let last = hazard.last().unwrap();
        assert_eq!(last.hazard.1, 0.0);
        assert_eq!(last.cumulative.1, 0.0);
        assert_eq!(last.log_cumulative.1, 0.0);
        assert!(last.log_cumulative.1.is_sign_negative());
    }

    #[test]
    fn test_confidence_accepts_percent() {
        let as_fraction = calculate_kaplan_meier(&remission(), 0.0, 0.0, 0.75).unwrap();
        let as_percent = calculate_kaplan_meier(&remission(), 0.0, 0.0, 75.0).unwrap();
        assert!((as_fraction.rows[0].lower - as_percent.rows[0].lower).abs() < 1e-15);
    }
}
