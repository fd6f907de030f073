//! Small statistics helpers shared by the estimators

/// Arithmetic mean, 0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1), 0 for fewer than two values
pub fn sample_stddev(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (ss / (n - 1) as f64).sqrt()
}

/// Nearest-rank percentile of an ascending-sorted slice.
///
/// `rank = ceil(q / 100 * n)`, 1-indexed and clamped to `[1, n]`. No interpolation.
pub fn nearest_rank(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    let rank = (q * n as f64 / 100.0).ceil() as usize;
    let rank = rank.clamp(1, n);
    sorted[rank - 1]
}

/// Clamp to zero and scrub NaN / infinity
pub fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_stddev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&values) - 5.0).abs() < 1e-12);
        // population sd is 2, sample sd is sqrt(32/7)
        assert!((sample_stddev(&values) - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_stddev_needs_two_values() {
        assert_eq!(sample_stddev(&[]), 0.0);
        assert_eq!(sample_stddev(&[3.0]), 0.0);
    }

    #[test]
    fn test_nearest_rank_one_to_ten() {
        let samples: Vec<f64> = (1..=10).map(|v| v as f64).collect();
        assert_eq!(nearest_rank(&samples, 50.0), 5.0);
        assert_eq!(nearest_rank(&samples, 80.0), 8.0);
        assert_eq!(nearest_rank(&samples, 100.0), 10.0);
        assert_eq!(nearest_rank(&samples, 0.0), 1.0);
    }

    #[test]
    fn test_nearest_rank_small_samples() {
        assert_eq!(nearest_rank(&[], 50.0), 0.0);
        assert_eq!(nearest_rank(&[12.0], 80.0), 12.0);
        assert_eq!(nearest_rank(&[3.0, 9.0], 50.0), 3.0);
        assert_eq!(nearest_rank(&[3.0, 9.0], 80.0), 9.0);
    }

    #[test]
    fn test_non_negative() {
        assert_eq!(non_negative(-1.0), 0.0);
        assert_eq!(non_negative(f64::INFINITY), 0.0);
        assert_eq!(non_negative(f64::NAN), 0.0);
        assert_eq!(non_negative(2.5), 2.5);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_stddev_non_negative(values in prop::collection::vec(-1e6f64..1e6, 0..40)) {
                let sd = sample_stddev(&values);
                prop_assert!(sd.is_finite());
                prop_assert!(sd >= 0.0);
            }

            #[test]
            fn prop_mean_within_bounds(values in prop::collection::vec(0.0f64..1e4, 1..40)) {
                let m = mean(&values);
                let lo = values.iter().cloned().fold(f64::INFINITY, f64::min);
                let hi = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                prop_assert!(m >= lo - 1e-9 && m <= hi + 1e-9);
            }
        }
    }
}
