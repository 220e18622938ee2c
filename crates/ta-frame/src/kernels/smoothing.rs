//! Recursive smoothers: exponential, Wilder, and weighted moving averages.
//!
//! All recurrences are stateful only within a single call; no kernel carries
//! state across invocations.
//!
//! # Seeding rules
//!
//! The warm-up seed differs by smoother family and is fixed per kernel:
//!
//! - [`ewm`] (explicit alpha) seeds from the first known input value.
//! - [`ema`] and [`rma`] (length-parameterized) seed from the simple average
//!   of the first `length` values, the TA-Lib convention; their warm-up
//!   `[0, length-2]` is NaN.
//!
//! # Unknown inputs
//!
//! After the seed, an unknown (NaN) input holds the previous smoothed value
//! at that position instead of poisoning the rest of the series. This is the
//! one documented substitution the engine makes: a recursive smoother cannot
//! roll a NaN out of its window the way a finite-window reducer can, so the
//! state is carried across the gap. A NaN inside the seed window, however,
//! makes the seed (and everything after it) unknown.

use crate::error::Result;
use crate::traits::{validate_alpha, validate_length, SeriesElement};

/// Exponential smoothing with an explicit smoothing factor.
///
/// `out[i] = alpha * data[i] + (1 - alpha) * out[i-1]`, seeded from the first
/// known input value.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` unless `0 < alpha <= 1`, or
/// `Error::NumericConversion` if `alpha` is not representable in `T`.
///
/// # Example
///
/// ```
/// use ta_frame::kernels::ewm;
///
/// let out = ewm(&[2.0_f64, 4.0, 4.0], 0.5).unwrap();
/// assert_eq!(out[0], 2.0);
/// assert_eq!(out[1], 3.0);
/// assert_eq!(out[2], 3.5);
/// ```
pub fn ewm<T: SeriesElement>(data: &[T], alpha: f64) -> Result<Vec<T>> {
    validate_alpha(alpha)?;
    let alpha_t = T::from_f64(alpha)?;
    let beta = T::one() - alpha_t;

    let mut out = vec![T::nan(); data.len()];
    let mut prev = T::nan();
    for (i, &value) in data.iter().enumerate() {
        if prev.is_nan() {
            // Still looking for the seed.
            if !value.is_nan() {
                prev = value;
                out[i] = value;
            }
        } else {
            if !value.is_nan() {
                prev = alpha_t * value + beta * prev;
            }
            out[i] = prev;
        }
    }
    Ok(out)
}

/// Exponential moving average with `alpha = 2 / (length + 1)`.
///
/// Seeded with the simple average of the first `length` values at position
/// `length - 1`; earlier positions are NaN.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is zero. A window longer
/// than the input yields an all-NaN output.
pub fn ema<T: SeriesElement>(data: &[T], length: usize) -> Result<Vec<T>> {
    validate_length(length)?;
    seeded_recursive(data, length, 2.0 / (length as f64 + 1.0))
}

/// Wilder's moving average with `alpha = 1 / length`.
///
/// The smoother behind ATR and RSI. Same SMA seed as [`ema`], slower decay.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is zero.
pub fn rma<T: SeriesElement>(data: &[T], length: usize) -> Result<Vec<T>> {
    validate_length(length)?;
    seeded_recursive(data, length, 1.0 / length as f64)
}

fn seeded_recursive<T: SeriesElement>(data: &[T], length: usize, alpha: f64) -> Result<Vec<T>> {
    let n = data.len();
    let mut out = vec![T::nan(); n];
    if length > n {
        return Ok(out);
    }

    let alpha_t = T::from_f64(alpha)?;
    let beta = T::one() - alpha_t;
    let length_t = T::from_usize(length)?;

    // SMA seed; NaN in the seed window leaves the whole output unknown.
    let seed = data[..length].iter().fold(T::zero(), |acc, &v| acc + v) / length_t;
    out[length - 1] = seed;

    let mut prev = seed;
    for i in length..n {
        let value = data[i];
        if !prev.is_nan() && !value.is_nan() {
            prev = alpha_t * value + beta * prev;
        }
        out[i] = prev;
    }
    Ok(out)
}

/// Linearly weighted moving average.
///
/// Weights `1..=length` over the trailing window, newest value weighted
/// heaviest; denominator `length * (length + 1) / 2`.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is zero.
pub fn wma<T: SeriesElement>(data: &[T], length: usize) -> Result<Vec<T>> {
    validate_length(length)?;
    let n = data.len();
    let mut out = vec![T::nan(); n];
    if length > n {
        return Ok(out);
    }

    let denom = T::from_usize(length * (length + 1) / 2)?;
    for i in (length - 1)..n {
        let slice = &data[i + 1 - length..=i];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        let mut acc = T::zero();
        for (j, &value) in slice.iter().enumerate() {
            acc = acc + value * T::from_usize(j + 1)?;
        }
        out[i] = acc / denom;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::utils::{approx_eq, EPSILON};

    #[test]
    fn test_ewm_seeds_from_first_value() {
        let out = ewm(&[10.0_f64, 20.0], 0.5).unwrap();
        assert_eq!(out[0], 10.0);
        assert!(approx_eq(out[1], 15.0, EPSILON));
    }

    #[test]
    fn test_ewm_invalid_alpha() {
        assert!(matches!(
            ewm(&[1.0_f64], 0.0),
            Err(Error::InvalidParameter { .. })
        ));
        assert!(matches!(
            ewm(&[1.0_f64], 1.1),
            Err(Error::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_ewm_alpha_one_tracks_input() {
        let data = [3.0_f64, 7.0, 5.0];
        let out = ewm(&data, 1.0).unwrap();
        assert_eq!(out, data.to_vec());
    }

    #[test]
    fn test_ewm_leading_nan_delays_seed() {
        let out = ewm(&[f64::NAN, f64::NAN, 4.0, 6.0], 0.5).unwrap();
        assert!(out[0].is_nan());
        assert!(out[1].is_nan());
        assert_eq!(out[2], 4.0);
        assert!(approx_eq(out[3], 5.0, EPSILON));
    }

    #[test]
    fn test_ewm_holds_state_across_gap() {
        let out = ewm(&[4.0_f64, f64::NAN, 6.0], 0.5).unwrap();
        assert_eq!(out[0], 4.0);
        assert_eq!(out[1], 4.0); // held
        assert!(approx_eq(out[2], 5.0, EPSILON));
    }

    #[test]
    fn test_ewm_convex_bounds() {
        // Every output lies within the historical min/max of known inputs.
        let data = [5.0_f64, 1.0, 9.0, 3.0, 7.0, 2.0];
        let out = ewm(&data, 0.3).unwrap();
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for (i, &x) in data.iter().enumerate() {
            lo = lo.min(x);
            hi = hi.max(x);
            assert!(out[i] >= lo - EPSILON && out[i] <= hi + EPSILON);
        }
    }

    #[test]
    fn test_ema_sma_seed() {
        let data = [1.0_f64, 2.0, 3.0, 4.0, 5.0];
        let out = ema(&data, 3).unwrap();
        assert!(out[0].is_nan());
        assert!(out[1].is_nan());
        assert!(approx_eq(out[2], 2.0, EPSILON)); // SMA of [1,2,3]
        // alpha = 0.5: 0.5*4 + 0.5*2 = 3
        assert!(approx_eq(out[3], 3.0, EPSILON));
        assert!(approx_eq(out[4], 4.0, EPSILON));
    }

    #[test]
    fn test_ema_window_longer_than_input() {
        let out = ema(&[1.0_f64, 2.0], 5).unwrap();
        assert!(out.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_ema_constant_input() {
        let out = ema(&[7.0_f64; 20], 5).unwrap();
        for v in &out[4..] {
            assert!(approx_eq(*v, 7.0, EPSILON));
        }
    }

    #[test]
    fn test_rma_slower_than_ema() {
        // RMA alpha (1/n) is smaller than EMA alpha (2/(n+1)) for n > 1, so
        // after a step change RMA lags further behind.
        let mut data = vec![10.0_f64; 10];
        data.extend(vec![20.0_f64; 10]);
        let e = ema(&data, 5).unwrap();
        let r = rma(&data, 5).unwrap();
        assert!(e[19] > r[19]);
    }

    #[test]
    fn test_wma_known_value() {
        // WMA of [1,2,3] with length 3: (1*1 + 2*2 + 3*3) / 6 = 14/6
        let out = wma(&[1.0_f64, 2.0, 3.0], 3).unwrap();
        assert!(approx_eq(out[2], 14.0 / 6.0, EPSILON));
    }

    #[test]
    fn test_wma_nan_window() {
        let out = wma(&[1.0_f64, f64::NAN, 3.0, 4.0, 5.0], 2).unwrap();
        assert!(out[1].is_nan());
        assert!(out[2].is_nan());
        assert!(approx_eq(out[3], (3.0 + 2.0 * 4.0) / 3.0, EPSILON));
    }

    #[test]
    fn test_smoothers_preserve_length() {
        let data: Vec<f64> = (0..30).map(f64::from).collect();
        assert_eq!(ewm(&data, 0.2).unwrap().len(), 30);
        assert_eq!(ema(&data, 9).unwrap().len(), 30);
        assert_eq!(rma(&data, 9).unwrap().len(), 30);
        assert_eq!(wma(&data, 9).unwrap().len(), 30);
    }
}
