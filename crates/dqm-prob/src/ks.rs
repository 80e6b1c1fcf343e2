//! Two-sample Kolmogorov–Smirnov statistic.

use dqm_core::{Error, Result};

/// Supremum of `|F_a(x) - F_b(x)|` over the empirical distribution functions
/// of the two samples. Always in `[0, 1]`.
///
/// Ties are handled like `scipy.stats.ks_2samp`: both ECDFs are evaluated
/// right-continuously at every distinct value of the pooled sample.
pub fn two_sample_statistic(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.is_empty() || b.is_empty() {
        return Err(Error::Validation("KS statistic needs two non-empty samples".to_string()));
    }
    if a.iter().chain(b).any(|v| v.is_nan()) {
        return Err(Error::Validation("KS statistic samples must not contain NaN".to_string()));
    }

    let mut a = a.to_vec();
    let mut b = b.to_vec();
    a.sort_by(|x, y| x.total_cmp(y));
    b.sort_by(|x, y| x.total_cmp(y));

    let (n_a, n_b) = (a.len() as f64, b.len() as f64);
    let (mut i, mut j) = (0usize, 0usize);
    let mut d: f64 = 0.0;
    while i < a.len() && j < b.len() {
        let x = a[i].min(b[j]);
        while i < a.len() && a[i] <= x {
            i += 1;
        }
        while j < b.len() && b[j] <= x {
            j += 1;
        }
        d = d.max((i as f64 / n_a - j as f64 / n_b).abs());
    }
    Ok(d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    #[test]
    fn test_identical_samples() {
        let s = [10.0, 20.0, 10.0];
        assert_eq!(two_sample_statistic(&s, &s).unwrap(), 0.0);
    }

    #[test]
    fn test_disjoint_samples() {
        let d = two_sample_statistic(&[1.0, 2.0, 3.0], &[4.0, 5.0]).unwrap();
        assert_eq!(d, 1.0);
    }

    #[test]
    fn test_known_value_with_ties() {
        // a = {1, 2, 2, 3}, b = {2, 3, 3, 4}
        // at x=2: F_a = 3/4, F_b = 1/4 -> 0.5
        let d = two_sample_statistic(&[1.0, 2.0, 2.0, 3.0], &[2.0, 3.0, 3.0, 4.0]).unwrap();
        assert_abs_diff_eq!(d, 0.5, epsilon = 1e-15);
    }

    #[test]
    fn test_symmetric() {
        let a = [0.3, 5.0, 2.0, 7.5, 1.0];
        let b = [4.0, 0.1, 6.0];
        assert_eq!(
            two_sample_statistic(&a, &b).unwrap(),
            two_sample_statistic(&b, &a).unwrap()
        );
    }

    #[test]
    fn test_invalid_input() {
        assert!(two_sample_statistic(&[], &[1.0]).is_err());
        assert!(two_sample_statistic(&[1.0, f64::NAN], &[1.0]).is_err());
    }

    proptest! {
        #[test]
        fn prop_statistic_is_bounded(
            a in proptest::collection::vec(-1e6f64..1e6, 1..64),
            b in proptest::collection::vec(-1e6f64..1e6, 1..64),
        ) {
            let d = two_sample_statistic(&a, &b).unwrap();
            prop_assert!((0.0..=1.0).contains(&d), "d={}", d);
        }
    }
}
