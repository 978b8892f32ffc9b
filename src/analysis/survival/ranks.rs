//! Failure ranks for probability plotting
//!
//! With suspensions in the data the failure order numbers shift: each
//! suspension spreads its unused rank over the remaining failures. The
//! adjusted mean order number handles that, and Bernard's approximation
//! turns an order number into a median rank for plotting positions.

/// Suspensions carry this instead of a rank.
pub const SUSPENSION: f64 = -1.0;

/// Adjusted mean order numbers for time-ordered observations
///
/// `is_event[i]` is true for a failure and false for a suspension, in
/// ascending time order. Failures get the mean order number
///
/// ```text
/// rank = previous + (n + 1 - previous) / (n - i + 2)
/// ```
///
/// with `i` the 1-based position; suspensions get the -1.0 sentinel. With
/// no suspensions this reduces to the plain order 1..n.
pub fn adjusted_ranks(is_event: &[bool]) -> Vec<f64> {
    let n = is_event.len() as f64;
    let mut previous = 0.0;

    is_event
        .iter()
        .enumerate()
        .map(|(index, &event)| {
            if event {
                let position = (index + 1) as f64;
                previous += (n + 1.0 - previous) / (n - position + 2.0);
                previous
            } else {
                SUSPENSION
            }
        })
        .collect()
}

/// Bernard's median rank approximation, (rank - 0.3) / (n + 0.4)
///
/// Suspension sentinels pass through as NaN so plot code can skip them.
pub fn bernard_ranks(ranks: &[f64], n: usize) -> Vec<f64> {
    ranks
        .iter()
        .map(|&rank| {
            if rank < 0.0 {
                f64::NAN
            } else {
                (rank - 0.3) / (n as f64 + 0.4)
            }
        })
        .collect()
}

/// Bernard median ranks for grouped data
///
/// `counts[i]` is the number of failures observed in the i-th inspection
/// interval; the rank of an interval is its cumulative failure count.
pub fn bernard_ranks_grouped(counts: &[u32]) -> Vec<f64> {
    let total: u32 = counts.iter().sum();
    let mut cumulative = 0u32;

    counts
        .iter()
        .map(|&count| {
            cumulative += count;
            (f64::from(cumulative) - 0.3) / (f64::from(total) + 0.4)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjusted_ranks_exact_data() {
        let ranks = adjusted_ranks(&[true; 8]);
        let expected = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        for (got, want) in ranks.iter().zip(expected) {
            assert!((got - want).abs() < 1e-12);
        }
    }

    #[test]
    fn test_adjusted_ranks_with_suspensions() {
        let is_event = [false, true, false, true, true, true, true, false];
        let ranks = adjusted_ranks(&is_event);
        let expected = [-1.0, 1.125, -1.0, 2.4375, 3.75, 5.0625, 6.375, -1.0];
        for (got, want) in ranks.iter().zip(expected) {
            assert!((got - want).abs() < 1e-12);
        }
    }

    #[test]
    fn test_bernard_ranks_exact_data() {
        let ranks = adjusted_ranks(&[true; 8]);
        let medians = bernard_ranks(&ranks, 8);
        let expected = [
            0.083333333333333,
            0.202380952380952,
            0.321428571428571,
            0.440476190476190,
            0.559523809523810,
            0.678571428571429,
            0.797619047619048,
            0.916666666666667,
        ];
        for (got, want) in medians.iter().zip(expected) {
            assert!((got - want).abs() < 1e-12);
        }
    }

    #[test]
    fn test_bernard_ranks_skip_suspensions() {
        let is_event = [false, true, false, true, true, true, true, false];
        let medians = bernard_ranks(&adjusted_ranks(&is_event), 8);

        assert!(medians[0].is_nan());
        assert!(medians[7].is_nan());
        assert!((medians[1] - 0.0982142857142857).abs() < 1e-12);
        assert!((medians[4] - (3.75 - 0.3) / 8.4).abs() < 1e-12);
        assert!((medians[4] - 0.4107142857142857).abs() < 1e-12);
    }

    #[test]
    fn test_bernard_ranks_grouped() {
        let medians = bernard_ranks_grouped(&[7, 5, 3, 2, 1, 2]);
        let expected = [
            0.328431372549020,
            0.573529411764706,
            0.720588235294118,
            0.818627450980392,
            0.867647058823529,
            0.965686274509804,
        ];
        for (got, want) in medians.iter().zip(expected) {
            assert!((got - want).abs() < 1e-12);
        }
    }
}
