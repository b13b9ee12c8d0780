//! Descriptive statistics over per-block distinct-key counts.
//!
//! One type lives here: [`DistributionSummary`], the
//! count/mean/std/min/percentiles/max record computed over a sample set.
//! Percentiles use linear interpolation between closest ranks — for
//! percentile `p` over `N` sorted values the rank is `p/100 * (N-1)`,
//! interpolated between the two bracketing values. The standard deviation is
//! the sample deviation (N−1 divisor). Both choices are load-bearing:
//! downstream consumers compare these figures against descriptive-statistics
//! output from other tooling, and any other quantile method drifts.

use serde::Serialize;

/// Summary statistics over a set of integer samples.
///
/// An empty sample set produces the all-zero summary (`count == 0`) rather
/// than an error; a single sample has `std == 0.0` since the N−1 divisor is
/// undefined there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistributionSummary {
    /// Number of samples.
    pub count: u64,
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample standard deviation (N−1 divisor); 0.0 for fewer than 2 samples.
    pub std: f64,
    /// Smallest sample.
    pub min: f64,
    /// 50th percentile (median), linear interpolation.
    pub p50: f64,
    /// 90th percentile, linear interpolation.
    pub p90: f64,
    /// 95th percentile, linear interpolation.
    pub p95: f64,
    /// 99th percentile, linear interpolation.
    pub p99: f64,
    /// Largest sample.
    pub max: f64,
}

impl DistributionSummary {
    /// The no-data sentinel: every field zero.
    pub const EMPTY: Self = Self {
        count: 0,
        mean: 0.0,
        std: 0.0,
        min: 0.0,
        p50: 0.0,
        p90: 0.0,
        p95: 0.0,
        p99: 0.0,
        max: 0.0,
    };

    /// Computes the summary over `samples` (order irrelevant).
    pub fn from_samples(samples: &[u64]) -> Self {
        if samples.is_empty() {
            return Self::EMPTY;
        }

        let mut sorted: Vec<f64> = samples.iter().map(|&v| v as f64).collect();
        sorted.sort_unstable_by(|a, b| a.total_cmp(b));

        let n = sorted.len();
        let mean = sorted.iter().sum::<f64>() / n as f64;
        let std = if n < 2 {
            0.0
        } else {
            let sum_sq = sorted
                .iter()
                .map(|&v| {
                    let d = v - mean;
                    d * d
                })
                .sum::<f64>();
            (sum_sq / (n - 1) as f64).sqrt()
        };

        Self {
            count: n as u64,
            mean,
            std,
            min: sorted[0],
            p50: percentile(&sorted, 50.0),
            p90: percentile(&sorted, 90.0),
            p95: percentile(&sorted, 95.0),
            p99: percentile(&sorted, 99.0),
            max: sorted[n - 1],
        }
    }

    /// Returns `true` if this is the no-data sentinel.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Linear-interpolation percentile over a sorted, non-empty sample set.
///
/// Rank `p/100 * (N-1)` lands between two sorted values; the result is the
/// weighted blend of the two by the fractional part of the rank.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    debug_assert!((0.0..=100.0).contains(&p));

    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let frac = rank - lo as f64;
        sorted[lo] + (sorted[hi] - sorted[lo]) * frac
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn empty_samples_yield_sentinel() {
        let summary = DistributionSummary::from_samples(&[]);
        assert_eq!(summary, DistributionSummary::EMPTY);
        assert!(summary.is_empty());
    }

    #[test]
    fn single_sample_collapses_to_value() {
        let summary = DistributionSummary::from_samples(&[7]);
        assert_eq!(summary.count, 1);
        assert!(approx(summary.mean, 7.0));
        assert!(approx(summary.std, 0.0));
        assert!(approx(summary.min, 7.0));
        assert!(approx(summary.p50, 7.0));
        assert!(approx(summary.p99, 7.0));
        assert!(approx(summary.max, 7.0));
    }

    #[test]
    fn two_samples_interpolate_median() {
        // Rank for p50 over [1, 2] is 0.5: halfway between the two values.
        let summary = DistributionSummary::from_samples(&[1, 2]);
        assert!(approx(summary.p50, 1.5));
        assert!(approx(summary.p90, 1.9));
        assert!(approx(summary.p95, 1.95));
        assert!(approx(summary.p99, 1.99));
        assert!(approx(summary.min, 1.0));
        assert!(approx(summary.max, 2.0));
    }

    #[test]
    fn five_samples_match_hand_computed_ranks() {
        let summary = DistributionSummary::from_samples(&[30, 10, 50, 20, 40]);
        assert!(approx(summary.p50, 30.0)); // rank 2.0, exact
        assert!(approx(summary.p90, 46.0)); // rank 3.6 between 40 and 50
        assert!(approx(summary.p95, 48.0)); // rank 3.8
        assert!(approx(summary.p99, 49.6)); // rank 3.96
        assert!(approx(summary.min, 10.0));
        assert!(approx(summary.max, 50.0));
    }

    #[test]
    fn sample_std_uses_n_minus_one() {
        // Mean 2.5, squared deviations sum to 5, sample variance 5/3.
        let summary = DistributionSummary::from_samples(&[1, 2, 3, 4]);
        assert!(approx(summary.mean, 2.5));
        assert!(approx(summary.std, (5.0f64 / 3.0).sqrt()));
    }

    #[test]
    fn input_order_is_irrelevant() {
        let a = DistributionSummary::from_samples(&[9, 1, 5, 3, 7]);
        let b = DistributionSummary::from_samples(&[1, 3, 5, 7, 9]);
        assert_eq!(a, b);
    }

    #[test]
    fn percentiles_are_ordered() {
        // Deterministic pseudo-random samples; ordering must hold regardless.
        let mut state = 0x9E3779B97F4A7C15u64;
        let samples: Vec<u64> = (0..257)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                state % 1000
            })
            .collect();
        let s = DistributionSummary::from_samples(&samples);
        assert!(s.min <= s.p50);
        assert!(s.p50 <= s.p90);
        assert!(s.p90 <= s.p95);
        assert!(s.p95 <= s.p99);
        assert!(s.p99 <= s.max);
    }
}
