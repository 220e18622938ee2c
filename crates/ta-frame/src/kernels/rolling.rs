//! Rolling-window reducers: sum, mean, variance, stdev, quantile, mad.
//!
//! Sum-based reducers use an O(n) sliding accumulator with a NaN occupancy
//! count, so a NaN entering the window poisons outputs only while it remains
//! inside. Order-statistic reducers (median, quantile) copy and sort each
//! window.
//!
//! # Mathematical conventions
//!
//! - Variance and standard deviation take a `ddof` (delta degrees of freedom)
//!   argument. Indicator builders pass `ddof = 1` (sample statistics), the
//!   convention for these indicator columns; pass `ddof = 0` for population
//!   statistics.
//! - The sum-of-squares variance algorithm can lose precision for very large
//!   magnitude data with tiny variance; negative rounding artifacts are
//!   clamped to zero.
//! - Quantiles interpolate linearly between the two nearest order statistics.

use crate::error::{Error, Result};
use crate::traits::{validate_length, SeriesElement};

/// Computes the rolling sum over a trailing window of `length` positions.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is zero. A window longer
/// than the input yields an all-NaN output, not an error.
///
/// # Example
///
/// ```
/// use ta_frame::kernels::rolling_sum;
///
/// let out = rolling_sum(&[1.0_f64, 2.0, 3.0, 4.0], 2).unwrap();
/// assert!(out[0].is_nan());
/// assert_eq!(out[1], 3.0);
/// assert_eq!(out[3], 7.0);
/// ```
pub fn rolling_sum<T: SeriesElement>(data: &[T], length: usize) -> Result<Vec<T>> {
    validate_length(length)?;
    let n = data.len();
    let mut out = vec![T::nan(); n];
    if length > n {
        return Ok(out);
    }

    let mut sum = T::zero();
    let mut nan_count = 0usize;
    for &value in &data[..length] {
        if value.is_nan() {
            nan_count += 1;
        } else {
            sum = sum + value;
        }
    }
    if nan_count == 0 {
        out[length - 1] = sum;
    }

    for i in length..n {
        let new = data[i];
        let old = data[i - length];
        if new.is_nan() {
            nan_count += 1;
        } else {
            sum = sum + new;
        }
        if old.is_nan() {
            nan_count -= 1;
        } else {
            sum = sum - old;
        }
        if nan_count == 0 {
            out[i] = sum;
        }
    }
    Ok(out)
}

/// Computes the rolling mean over a trailing window of `length` positions.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is zero.
pub fn rolling_mean<T: SeriesElement>(data: &[T], length: usize) -> Result<Vec<T>> {
    let length_t = T::from_usize(length.max(1))?;
    let mut out = rolling_sum(data, length)?;
    for v in &mut out {
        *v = *v / length_t;
    }
    Ok(out)
}

/// Computes the rolling variance with `ddof` delta degrees of freedom.
///
/// `ddof = 0` gives population variance, `ddof = 1` sample variance.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is zero or not greater than
/// `ddof`.
pub fn rolling_variance<T: SeriesElement>(
    data: &[T],
    length: usize,
    ddof: usize,
) -> Result<Vec<T>> {
    validate_length(length)?;
    if length <= ddof {
        return Err(Error::invalid_parameter(
            "length",
            format!("must be greater than ddof ({ddof})"),
        ));
    }
    let n = data.len();
    let mut out = vec![T::nan(); n];
    if length > n {
        return Ok(out);
    }

    let length_t = T::from_usize(length)?;
    let divisor = T::from_usize(length - ddof)?;

    let mut sum = T::zero();
    let mut sum_sq = T::zero();
    let mut nan_count = 0usize;
    for &value in &data[..length] {
        if value.is_nan() {
            nan_count += 1;
        } else {
            sum = sum + value;
            sum_sq = sum_sq + value * value;
        }
    }
    if nan_count == 0 {
        out[length - 1] = variance_from_sums(sum, sum_sq, length_t, divisor);
    }

    for i in length..n {
        let new = data[i];
        let old = data[i - length];
        if new.is_nan() {
            nan_count += 1;
        } else {
            sum = sum + new;
            sum_sq = sum_sq + new * new;
        }
        if old.is_nan() {
            nan_count -= 1;
        } else {
            sum = sum - old;
            sum_sq = sum_sq - old * old;
        }
        if nan_count == 0 {
            out[i] = variance_from_sums(sum, sum_sq, length_t, divisor);
        }
    }
    Ok(out)
}

/// Computes the rolling standard deviation with `ddof` delta degrees of freedom.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is zero or not greater than
/// `ddof`.
pub fn rolling_stdev<T: SeriesElement>(data: &[T], length: usize, ddof: usize) -> Result<Vec<T>> {
    let mut out = rolling_variance(data, length, ddof)?;
    for v in &mut out {
        *v = v.sqrt();
    }
    Ok(out)
}

/// Var = (sum_sq - sum^2 / n) / (n - ddof), clamped at zero.
#[inline]
fn variance_from_sums<T: SeriesElement>(sum: T, sum_sq: T, length: T, divisor: T) -> T {
    let variance = (sum_sq - sum * sum / length) / divisor;
    if variance < T::zero() {
        T::zero()
    } else {
        variance
    }
}

/// Computes the rolling quantile `q` over a trailing window of `length`.
///
/// The quantile interpolates linearly between order statistics, so
/// `q = 0.5` over an even window averages the two middle values.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is zero or `q` is outside
/// `[0, 1]`.
pub fn rolling_quantile<T: SeriesElement>(data: &[T], length: usize, q: f64) -> Result<Vec<T>> {
    validate_length(length)?;
    if !(0.0..=1.0).contains(&q) {
        return Err(Error::invalid_parameter(
            "q",
            format!("must be in [0, 1], got {q}"),
        ));
    }
    let n = data.len();
    let mut out = vec![T::nan(); n];
    if length > n {
        return Ok(out);
    }

    let mut window: Vec<T> = Vec::with_capacity(length);
    for i in (length - 1)..n {
        let slice = &data[i + 1 - length..=i];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        window.clear();
        window.extend_from_slice(slice);
        window.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let pos = q * (length - 1) as f64;
        let lo = pos.floor() as usize;
        let hi = pos.ceil() as usize;
        let frac = T::from_f64(pos - lo as f64)?;
        out[i] = window[lo] + (window[hi] - window[lo]) * frac;
    }
    Ok(out)
}

/// Computes the rolling median (quantile 0.5).
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is zero.
pub fn rolling_median<T: SeriesElement>(data: &[T], length: usize) -> Result<Vec<T>> {
    rolling_quantile(data, length, 0.5)
}

/// Computes the rolling mean absolute deviation around the window mean.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is zero.
pub fn rolling_mad<T: SeriesElement>(data: &[T], length: usize) -> Result<Vec<T>> {
    validate_length(length)?;
    let n = data.len();
    let mut out = vec![T::nan(); n];
    if length > n {
        return Ok(out);
    }

    let length_t = T::from_usize(length)?;
    for i in (length - 1)..n {
        let slice = &data[i + 1 - length..=i];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        let mean = slice.iter().fold(T::zero(), |acc, &v| acc + v) / length_t;
        let dev = slice
            .iter()
            .fold(T::zero(), |acc, &v| acc + (v - mean).abs());
        out[i] = dev / length_t;
    }
    Ok(out)
}
