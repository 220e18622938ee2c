//! Shared helpers, mostly tolerance-based floating-point comparison.
//!
//! Exact equality is rarely the right check for indicator outputs; these
//! helpers compare within a tolerance and treat two NaNs as equal, which is
//! what tests over unknown-marked series want.
//!
//! # Example
//!
//! ```
//! use ta_frame::utils::{approx_eq, EPSILON};
//!
//! let a = 1.0 / 3.0;
//! let b = 0.333333333333333;
//! assert!(approx_eq(a, b, EPSILON));
//! ```

use crate::traits::SeriesElement;

/// Standard epsilon for high-precision comparisons (1e-10).
pub const EPSILON: f64 = 1e-10;

/// Looser epsilon (1e-6) for results with many accumulated operations.
pub const LOOSE_EPSILON: f64 = 1e-6;

/// Approximate equality within an absolute tolerance.
///
/// Two NaNs compare equal; a NaN against a known value does not.
///
/// # Example
///
/// ```
/// use ta_frame::utils::{approx_eq, EPSILON};
///
/// assert!(approx_eq(1.0, 1.0 + 1e-11, EPSILON));
/// assert!(!approx_eq(1.0, 2.0, EPSILON));
/// assert!(approx_eq(f64::NAN, f64::NAN, EPSILON));
/// ```
#[inline]
#[must_use]
pub fn approx_eq<T: SeriesElement>(a: T, b: T, tolerance: T) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    if a.is_nan() || b.is_nan() {
        return false;
    }
    (a - b).abs() < tolerance
}

/// Approximate equality within a relative tolerance.
///
/// Preferable to [`approx_eq`] when the magnitudes being compared vary widely,
/// as with cumulative returns or long products.
///
/// # Example
///
/// ```
/// use ta_frame::utils::approx_eq_relative;
///
/// assert!(approx_eq_relative(1e10, 1e10 + 1.0, 1e-9));
/// ```
#[inline]
#[must_use]
pub fn approx_eq_relative<T: SeriesElement>(a: T, b: T, rel_tolerance: T) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    if a.is_nan() || b.is_nan() {
        return false;
    }

    let diff = (a - b).abs();
    let max_abs = a.abs().max(b.abs());

    if max_abs == T::zero() {
        return diff == T::zero();
    }

    diff / max_abs < rel_tolerance
}

/// Counts the NaN values in a slice.
#[inline]
#[must_use]
pub fn count_nans<T: SeriesElement>(data: &[T]) -> usize {
    data.iter().filter(|x| x.is_nan()).count()
}

/// Counts the NaN values at the start of a slice.
///
/// Useful for verifying an indicator's warm-up span.
///
/// # Example
///
/// ```
/// use ta_frame::utils::count_nan_prefix;
///
/// let data = vec![f64::NAN, f64::NAN, 1.0, 2.0, f64::NAN];
/// assert_eq!(count_nan_prefix(&data), 2);
/// ```
#[inline]
#[must_use]
pub fn count_nan_prefix<T: SeriesElement>(data: &[T]) -> usize {
    data.iter().take_while(|x| x.is_nan()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approx_eq_basic() {
        assert!(approx_eq(1.0_f64, 1.0, EPSILON));
        assert!(approx_eq(1.0_f64, 1.0 + 1e-11, EPSILON));
        assert!(!approx_eq(1.0_f64, 2.0, EPSILON));
    }

    #[test]
    fn test_approx_eq_nan() {
        assert!(approx_eq(f64::NAN, f64::NAN, EPSILON));
        assert!(!approx_eq(f64::NAN, 1.0, EPSILON));
        assert!(!approx_eq(1.0, f64::NAN, EPSILON));
    }

    #[test]
    fn test_approx_eq_relative_basic() {
        assert!(approx_eq_relative(1e10_f64, 1e10 + 1.0, 1e-9));
        assert!(!approx_eq_relative(1.0_f64, 2.0, 1e-10));
    }

    #[test]
    fn test_approx_eq_relative_zero() {
        assert!(approx_eq_relative(0.0_f64, 0.0, 1e-10));
        assert!(!approx_eq_relative(0.0_f64, 1e-11, 1e-10));
    }

    #[test]
    fn test_count_nans() {
        let data = vec![f64::NAN, 1.0, f64::NAN, 2.0, f64::NAN];
        assert_eq!(count_nans(&data), 3);
        assert_eq!(count_nans(&[1.0_f64, 2.0]), 0);
    }

    #[test]
    fn test_count_nan_prefix() {
        let data = vec![f64::NAN, f64::NAN, 1.0, 2.0, f64::NAN];
        assert_eq!(count_nan_prefix(&data), 2);
        assert_eq!(count_nan_prefix(&[1.0_f64, f64::NAN]), 0);
        assert_eq!(count_nan_prefix(&[f64::NAN; 3]), 3);
    }
}
