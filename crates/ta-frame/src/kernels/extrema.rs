//! Rolling extrema using a monotonic deque.
//!
//! The deque holds indices whose values are monotonically ordered (decreasing
//! for max, increasing for min), so the front is always the current window's
//! extremum and each element is pushed and popped at most once: O(n) total.
//!
//! NaN handling differs from a plain skip: a window that contains any NaN
//! yields NaN, tracked with an occupancy count alongside the deque, so the
//! uniform unknown-propagation policy holds for order-based reducers too.

use std::collections::VecDeque;

use crate::error::Result;
use crate::traits::{validate_length, SeriesElement};

/// Which extremum a deque pass computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extremum {
    Max,
    Min,
}

/// Computes the rolling maximum over a trailing window of `length` positions.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is zero. A window longer
/// than the input yields an all-NaN output.
///
/// # Example
///
/// ```
/// use ta_frame::kernels::rolling_max;
///
/// let data = [3.0_f64, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
/// let out = rolling_max(&data, 3).unwrap();
/// assert_eq!(out[2], 4.0); // max of [3, 1, 4]
/// assert_eq!(out[5], 9.0); // max of [1, 5, 9]
/// ```
pub fn rolling_max<T: SeriesElement>(data: &[T], length: usize) -> Result<Vec<T>> {
    rolling_extremum(data, length, Extremum::Max)
}

/// Computes the rolling minimum over a trailing window of `length` positions.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is zero. A window longer
/// than the input yields an all-NaN output.
pub fn rolling_min<T: SeriesElement>(data: &[T], length: usize) -> Result<Vec<T>> {
    rolling_extremum(data, length, Extremum::Min)
}

fn rolling_extremum<T: SeriesElement>(
    data: &[T],
    length: usize,
    which: Extremum,
) -> Result<Vec<T>> {
    validate_length(length)?;
    let n = data.len();
    let mut out = vec![T::nan(); n];
    if length > n {
        return Ok(out);
    }

    let mut deque: VecDeque<usize> = VecDeque::with_capacity(length);
    let mut nan_count = 0usize;

    for i in 0..n {
        let value = data[i];
        if value.is_nan() {
            nan_count += 1;
        } else {
            // Pop dominated values from the back to keep the deque monotonic.
            while let Some(&back) = deque.back() {
                let dominated = match which {
                    Extremum::Max => value >= data[back],
                    Extremum::Min => value <= data[back],
                };
                if dominated {
                    deque.pop_back();
                } else {
                    break;
                }
            }
            deque.push_back(i);
        }

        // Retire positions that left the window.
        if i >= length {
            if data[i - length].is_nan() {
                nan_count -= 1;
            }
            while deque.front().is_some_and(|&front| front + length <= i) {
                deque.pop_front();
            }
        }

        if i + 1 >= length && nan_count == 0 {
            if let Some(&front) = deque.front() {
                out[i] = data[front];
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_rolling_max_basic() {
        let data = [3.0_f64, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
        let out = rolling_max(&data, 3).unwrap();
        assert!(out[0].is_nan());
        assert!(out[1].is_nan());
        assert_eq!(out[2], 4.0);
        assert_eq!(out[3], 4.0);
        assert_eq!(out[4], 5.0);
        assert_eq!(out[5], 9.0);
        assert_eq!(out[6], 9.0);
        assert_eq!(out[7], 9.0);
    }

    #[test]
    fn test_rolling_min_basic() {
        let data = [3.0_f64, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
        let out = rolling_min(&data, 3).unwrap();
        assert_eq!(out[2], 1.0);
        assert_eq!(out[3], 1.0);
        assert_eq!(out[4], 1.0);
        assert_eq!(out[5], 1.0);
        assert_eq!(out[6], 2.0);
        assert_eq!(out[7], 2.0);
    }

    #[test]
    fn test_rolling_max_window_one() {
        let data = [2.0_f64, 7.0, 1.0];
        let out = rolling_max(&data, 1).unwrap();
        assert_eq!(out, vec![2.0, 7.0, 1.0]);
    }

    #[test]
    fn test_rolling_extrema_zero_length() {
        let result = rolling_max(&[1.0_f64], 0);
        assert!(matches!(result, Err(Error::InvalidParameter { .. })));
    }

    #[test]
    fn test_rolling_extrema_window_longer_than_input() {
        let out = rolling_min(&[1.0_f64, 2.0], 4).unwrap();
        assert!(out.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_rolling_max_nan_poisons_window() {
        let data = [1.0_f64, f64::NAN, 3.0, 4.0, 5.0];
        let out = rolling_max(&data, 2).unwrap();
        assert!(out[1].is_nan()); // [1, NaN]
        assert!(out[2].is_nan()); // [NaN, 3]
        assert_eq!(out[3], 4.0); // [3, 4]
        assert_eq!(out[4], 5.0); // [4, 5]
    }

    #[test]
    fn test_rolling_min_decreasing_sequence() {
        let data: Vec<f64> = (0..10).rev().map(f64::from).collect();
        let out = rolling_min(&data, 4).unwrap();
        for (i, v) in out.iter().enumerate().skip(3) {
            assert_eq!(*v, data[i]);
        }
    }

    #[test]
    fn test_rolling_max_matches_naive_scan() {
        let data = [5.0_f64, 3.0, 8.0, 8.0, 2.0, 9.0, 1.0, 4.0, 7.0, 6.0];
        let length = 4;
        let out = rolling_max(&data, length).unwrap();
        for i in (length - 1)..data.len() {
            let naive = data[i + 1 - length..=i]
                .iter()
                .fold(f64::NEG_INFINITY, |a, &b| a.max(b));
            assert_eq!(out[i], naive, "mismatch at {i}");
        }
    }
}
