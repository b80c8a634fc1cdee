//! Unbiased pass@k estimator.
//!
//! Given `n` samples of which `c` passed, pass@k is the probability that a
//! random k-subset (drawn without replacement) contains at least one passing
//! sample:
//!
//! ```text
//! pass@k = 1 - C(n-c, k) / C(n, k)
//! ```
//!
//! The ratio of binomials is evaluated as the product
//! `∏_{i=n-c+1}^{n} (1 - k/i)`, which never forms a binomial coefficient and
//! so stays finite for large `n`.

use crate::domain::{EvalError, Result};

/// Estimate pass@k for one problem.
///
/// Fails with [`EvalError::InvalidEstimatorInput`] when `c > n` or `k == 0`.
/// Returns exactly `1.0` when `n - c < k` (every k-subset holds a success),
/// including the case `k > n`.
pub fn estimate(n: usize, c: usize, k: usize) -> Result<f64> {
    if c > n || k == 0 {
        return Err(EvalError::InvalidEstimatorInput { n, c, k });
    }
    if n - c < k {
        return Ok(1.0);
    }

    // Multiply from i = n downwards so the product for c + 1 extends the
    // product for c by one factor; keeps the result monotone in c.
    let k = k as f64;
    let all_fail = (n - c + 1..=n)
        .rev()
        .fold(1.0_f64, |acc, i| acc * (1.0 - k / i as f64));

    Ok(1.0 - all_fail)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_all_correct_is_one() {
        assert_eq!(estimate(10, 10, 1).expect("valid"), 1.0);
        assert_eq!(estimate(10, 10, 10).expect("valid"), 1.0);
    }

    #[test]
    fn test_none_correct_is_zero() {
        assert_eq!(estimate(10, 0, 1).expect("valid"), 0.0);
        assert_eq!(estimate(10, 0, 10).expect("valid"), 0.0);
    }

    #[test]
    fn test_pass_at_1_equals_fraction_correct() {
        let v = estimate(10, 3, 1).expect("valid");
        assert!((v - 0.3).abs() < EPS, "got {v}");
    }

    #[test]
    fn test_matches_binomial_ratio() {
        // 1 - C(3,2)/C(5,2) = 1 - 3/10
        let v = estimate(5, 2, 2).expect("valid");
        assert!((v - 0.7).abs() < EPS, "got {v}");
    }

    #[test]
    fn test_fewer_failures_than_k_is_one() {
        assert_eq!(estimate(5, 4, 3).expect("valid"), 1.0);
    }

    #[test]
    fn test_k_larger_than_n_uses_same_rule() {
        assert_eq!(estimate(3, 1, 5).expect("valid"), 1.0);
    }

    #[test]
    fn test_c_greater_than_n_rejected() {
        let err = estimate(3, 4, 1).unwrap_err();
        assert!(matches!(
            err,
            EvalError::InvalidEstimatorInput { n: 3, c: 4, k: 1 }
        ));
    }

    #[test]
    fn test_k_zero_rejected() {
        assert!(matches!(
            estimate(3, 1, 0),
            Err(EvalError::InvalidEstimatorInput { k: 0, .. })
        ));
    }

    #[test]
    fn test_large_n_stays_finite() {
        let v = estimate(100_000, 50_000, 100).expect("valid");
        assert!(v.is_finite());
        assert!(v > 0.999_999);
        assert!(v <= 1.0);
    }
}
