//! Overlap indicators: values plotted on the price scale.
//!
//! Moving averages ([`sma`], [`kernels::ema`](crate::kernels::ema), [`dema`],
//! [`tema`], [`trima`], [`kernels::wma`](crate::kernels::wma)), range
//! midpoints ([`midpoint`], [`midprice`]), typical prices ([`hl2`], [`hlc3`],
//! [`ohlc4`]), the volume weighted average price ([`vwap`]), and Ehlers'
//! super smoother filter ([`ssf`]).

use crate::error::Result;
use crate::frame::{Frame, TabularSource};
use crate::kernels::{ema, rma, rolling_max, rolling_mean, rolling_min, wma};
use crate::output::{IndicatorResult, ResolvedParams};
use crate::registry::{Category, IndicatorSpec, ParamSpec, Registry};
use crate::traits::{validate_length, validate_rows, SeriesElement};

use super::{single_result, skip_nan_prefix};

/// Simple Moving Average: the arithmetic mean over a trailing window.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is zero. A window longer
/// than the input yields an all-NaN output.
///
/// # Example
///
/// ```
/// use ta_frame::indicators::overlap::sma;
///
/// let data = vec![1.0_f64, 2.0, 3.0, 4.0, 5.0];
/// let out = sma(&data, 3).unwrap();
/// assert!(out[1].is_nan());
/// assert!((out[2] - 2.0).abs() < 1e-10);
/// assert!((out[4] - 4.0).abs() < 1e-10);
/// ```
pub fn sma<T: SeriesElement>(data: &[T], length: usize) -> Result<Vec<T>> {
    rolling_mean(data, length)
}

/// Double Exponential Moving Average: `2*EMA - EMA(EMA)`.
///
/// Reduces the lag of a plain EMA by subtracting the doubly smoothed
/// component. The inner EMA runs past the outer one's warm-up prefix, so the
/// first known value appears at position `2*(length - 1)`.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is zero.
pub fn dema<T: SeriesElement>(data: &[T], length: usize) -> Result<Vec<T>> {
    let e1 = ema(data, length)?;
    let e2 = skip_nan_prefix(&e1, |tail| ema(tail, length))?;
    Ok(e1
        .iter()
        .zip(&e2)
        .map(|(&a, &b)| T::two() * a - b)
        .collect())
}

/// Triple Exponential Moving Average: `3*EMA - 3*EMA(EMA) + EMA(EMA(EMA))`.
///
/// First known value at position `3*(length - 1)`.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is zero.
pub fn tema<T: SeriesElement>(data: &[T], length: usize) -> Result<Vec<T>> {
    let three = T::two() + T::one();
    let e1 = ema(data, length)?;
    let e2 = skip_nan_prefix(&e1, |tail| ema(tail, length))?;
    let e3 = skip_nan_prefix(&e2, |tail| ema(tail, length))?;
    Ok(e1
        .iter()
        .zip(&e2)
        .zip(&e3)
        .map(|((&a, &b), &c)| three * a - three * b + c)
        .collect())
}

/// Triangular Moving Average: an SMA of an SMA with half-length windows.
///
/// Weights form a triangle peaking at the window center. The half window is
/// `length / 2 + 1`.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is zero.
pub fn trima<T: SeriesElement>(data: &[T], length: usize) -> Result<Vec<T>> {
    validate_length(length)?;
    let half = length / 2 + 1;
    let first = rolling_mean(data, half)?;
    rolling_mean(&first, half)
}

/// Midpoint: the average of the rolling high and low of a single series.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is zero.
pub fn midpoint<T: SeriesElement>(data: &[T], length: usize) -> Result<Vec<T>> {
    let max = rolling_max(data, length)?;
    let min = rolling_min(data, length)?;
    Ok(max
        .iter()
        .zip(&min)
        .map(|(&a, &b)| (a + b) / T::two())
        .collect())
}

/// Midprice: the average of the rolling highest high and lowest low.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is zero, or
/// `Error::LengthMismatch` if `high` and `low` differ in length.
pub fn midprice<T: SeriesElement>(high: &[T], low: &[T], length: usize) -> Result<Vec<T>> {
    check_same_len(high, low)?;
    let max = rolling_max(high, length)?;
    let min = rolling_min(low, length)?;
    Ok(max
        .iter()
        .zip(&min)
        .map(|(&a, &b)| (a + b) / T::two())
        .collect())
}

/// Median price: `(high + low) / 2`.
///
/// # Errors
///
/// Returns `Error::LengthMismatch` if the inputs differ in length.
pub fn hl2<T: SeriesElement>(high: &[T], low: &[T]) -> Result<Vec<T>> {
    check_same_len(high, low)?;
    Ok(high
        .iter()
        .zip(low)
        .map(|(&h, &l)| (h + l) / T::two())
        .collect())
}

/// Typical price: `(high + low + close) / 3`.
///
/// # Errors
///
/// Returns `Error::LengthMismatch` if the inputs differ in length.
pub fn hlc3<T: SeriesElement>(high: &[T], low: &[T], close: &[T]) -> Result<Vec<T>> {
    check_same_len(high, low)?;
    check_same_len(high, close)?;
    let three = T::two() + T::one();
    Ok(high
        .iter()
        .zip(low)
        .zip(close)
        .map(|((&h, &l), &c)| (h + l + c) / three)
        .collect())
}

/// Average price: `(open + high + low + close) / 4`.
///
/// # Errors
///
/// Returns `Error::LengthMismatch` if the inputs differ in length.
pub fn ohlc4<T: SeriesElement>(open: &[T], high: &[T], low: &[T], close: &[T]) -> Result<Vec<T>> {
    check_same_len(open, high)?;
    check_same_len(open, low)?;
    check_same_len(open, close)?;
    let four = T::two() * T::two();
    Ok(open
        .iter()
        .zip(high)
        .zip(low)
        .zip(close)
        .map(|(((&o, &h), &l), &c)| (o + h + l + c) / four)
        .collect())
}

/// Volume weighted average price.
///
/// The running ratio `cumsum(hlc3 * volume) / cumsum(volume)` over the whole
/// series, anchored at the first bar. A bar with an unknown price or volume
/// leaves both running sums untouched and produces NaN at that position; the
/// output is also NaN while the cumulative volume is zero.
///
/// Session-anchored VWAP needs a datetime index and is out of scope; callers
/// wanting per-session resets should segment their input first.
///
/// # Errors
///
/// Returns `Error::LengthMismatch` if the inputs differ in length.
pub fn vwap<T: SeriesElement>(
    high: &[T],
    low: &[T],
    close: &[T],
    volume: &[T],
) -> Result<Vec<T>> {
    check_same_len(high, low)?;
    check_same_len(high, close)?;
    check_same_len(high, volume)?;
    let typical = hlc3(high, low, close)?;
    let mut weighted = T::zero();
    let mut traded = T::zero();
    let mut out = Vec::with_capacity(typical.len());
    for (&tp, &v) in typical.iter().zip(volume) {
        if tp.is_nan() || v.is_nan() {
            out.push(T::nan());
            continue;
        }
        weighted = weighted + tp * v;
        traded = traded + v;
        if traded == T::zero() {
            out.push(T::nan());
        } else {
            out.push(weighted / traded);
        }
    }
    Ok(out)
}

/// Ehlers' Super Smoother Filter.
///
/// A 2- or 3-pole recursive low-pass filter with critically damped
/// coefficients derived from `length`. The first `poles` positions pass the
/// input through unchanged to prime the recursion.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is zero or `poles` is not
/// 2 or 3, or `Error::NumericConversion` if a coefficient is not
/// representable in `T`.
pub fn ssf<T: SeriesElement>(data: &[T], length: usize, poles: usize) -> Result<Vec<T>> {
    validate_length(length)?;
    if poles != 2 && poles != 3 {
        return Err(crate::error::Error::invalid_parameter(
            "poles",
            format!("must be 2 or 3, got {poles}"),
        ));
    }

    let n = data.len();
    let mut out = data.to_vec();
    if n <= poles {
        return Ok(out);
    }

    if poles == 2 {
        let x = std::f64::consts::PI * std::f64::consts::SQRT_2 / length as f64;
        let a0 = (-x).exp();
        let c2 = T::from_f64(2.0 * a0 * x.cos())?;
        let c3 = T::from_f64(-a0 * a0)?;
        let c1 = T::one() - c2 - c3;
        for i in 2..n {
            out[i] = c1 * data[i] + c2 * out[i - 1] + c3 * out[i - 2];
        }
    } else {
        let x = std::f64::consts::PI / length as f64;
        let a0 = (-x).exp();
        let b0 = 2.0 * a0 * (3.0_f64.sqrt() * x).cos();
        let c0 = a0 * a0;
        let c4 = T::from_f64(c0 * c0)?;
        let c3 = T::from_f64(-c0 * (1.0 + b0))?;
        let c2 = T::from_f64(c0 + b0)?;
        let c1 = T::one() - c2 - c3 - c4;
        for i in 3..n {
            out[i] = c1 * data[i] + c2 * out[i - 1] + c3 * out[i - 2] + c4 * out[i - 3];
        }
    }
    Ok(out)
}

fn check_same_len<T: SeriesElement>(a: &[T], b: &[T]) -> Result<()> {
    if a.len() == b.len() {
        Ok(())
    } else {
        Err(crate::error::Error::LengthMismatch {
            left: a.len(),
            right: b.len(),
        })
    }
}

// Builders and registration.

const LENGTH_10: &[ParamSpec] = &[ParamSpec::length("length", 10, "window length")];
const MIDPOINT_PARAMS: &[ParamSpec] = &[ParamSpec::length("length", 2, "window length")];
const NO_PARAMS: &[ParamSpec] = &[];
const SSF_PARAMS: &[ParamSpec] = &[
    ParamSpec::length("length", 10, "critical period of the filter"),
    ParamSpec::int("poles", 2, 2, 3, "number of filter poles"),
];

fn sma_builder(frame: &Frame<f64>, params: &ResolvedParams) -> Result<IndicatorResult<f64>> {
    let length = params.get_usize("length")?;
    let close = frame.close()?;
    validate_rows("sma", length, close.len())?;
    Ok(single_result("SMA", params, sma(close, length)?))
}

fn ema_builder(frame: &Frame<f64>, params: &ResolvedParams) -> Result<IndicatorResult<f64>> {
    let length = params.get_usize("length")?;
    let close = frame.close()?;
    validate_rows("ema", length, close.len())?;
    Ok(single_result("EMA", params, ema(close, length)?))
}

fn dema_builder(frame: &Frame<f64>, params: &ResolvedParams) -> Result<IndicatorResult<f64>> {
    let length = params.get_usize("length")?;
    let close = frame.close()?;
    validate_rows("dema", 2 * length - 1, close.len())?;
    Ok(single_result("DEMA", params, dema(close, length)?))
}

fn tema_builder(frame: &Frame<f64>, params: &ResolvedParams) -> Result<IndicatorResult<f64>> {
    let length = params.get_usize("length")?;
    let close = frame.close()?;
    validate_rows("tema", 3 * length - 2, close.len())?;
    Ok(single_result("TEMA", params, tema(close, length)?))
}

fn wma_builder(frame: &Frame<f64>, params: &ResolvedParams) -> Result<IndicatorResult<f64>> {
    let length = params.get_usize("length")?;
    let close = frame.close()?;
    validate_rows("wma", length, close.len())?;
    Ok(single_result("WMA", params, wma(close, length)?))
}

fn rma_builder(frame: &Frame<f64>, params: &ResolvedParams) -> Result<IndicatorResult<f64>> {
    let length = params.get_usize("length")?;
    let close = frame.close()?;
    validate_rows("rma", length, close.len())?;
    Ok(single_result("RMA", params, rma(close, length)?))
}

fn trima_builder(frame: &Frame<f64>, params: &ResolvedParams) -> Result<IndicatorResult<f64>> {
    let length = params.get_usize("length")?;
    let close = frame.close()?;
    let half = length / 2 + 1;
    validate_rows("trima", 2 * half - 1, close.len())?;
    Ok(single_result("TRIMA", params, trima(close, length)?))
}

fn midpoint_builder(frame: &Frame<f64>, params: &ResolvedParams) -> Result<IndicatorResult<f64>> {
    let length = params.get_usize("length")?;
    let close = frame.close()?;
    validate_rows("midpoint", length, close.len())?;
    Ok(single_result("MIDPOINT", params, midpoint(close, length)?))
}

fn midprice_builder(frame: &Frame<f64>, params: &ResolvedParams) -> Result<IndicatorResult<f64>> {
    let length = params.get_usize("length")?;
    let high = frame.high()?;
    let low = frame.low()?;
    validate_rows("midprice", length, high.len())?;
    Ok(single_result(
        "MIDPRICE",
        params,
        midprice(high, low, length)?,
    ))
}

fn hl2_builder(frame: &Frame<f64>, params: &ResolvedParams) -> Result<IndicatorResult<f64>> {
    let high = frame.high()?;
    let low = frame.low()?;
    validate_rows("hl2", 1, high.len())?;
    Ok(single_result("HL2", params, hl2(high, low)?))
}

fn hlc3_builder(frame: &Frame<f64>, params: &ResolvedParams) -> Result<IndicatorResult<f64>> {
    let high = frame.high()?;
    let low = frame.low()?;
    let close = frame.close()?;
    validate_rows("hlc3", 1, high.len())?;
    Ok(single_result("HLC3", params, hlc3(high, low, close)?))
}

fn ohlc4_builder(frame: &Frame<f64>, params: &ResolvedParams) -> Result<IndicatorResult<f64>> {
    let open = frame.open()?;
    let high = frame.high()?;
    let low = frame.low()?;
    let close = frame.close()?;
    validate_rows("ohlc4", 1, open.len())?;
    Ok(single_result("OHLC4", params, ohlc4(open, high, low, close)?))
}

fn vwap_builder(frame: &Frame<f64>, params: &ResolvedParams) -> Result<IndicatorResult<f64>> {
    let high = frame.high()?;
    let low = frame.low()?;
    let close = frame.close()?;
    let volume = frame.volume()?;
    validate_rows("vwap", 1, high.len())?;
    Ok(single_result("VWAP", params, vwap(high, low, close, volume)?))
}

fn ssf_builder(frame: &Frame<f64>, params: &ResolvedParams) -> Result<IndicatorResult<f64>> {
    let length = params.get_usize("length")?;
    let poles = params.get_usize("poles")?;
    let close = frame.close()?;
    validate_rows("ssf", 1, close.len())?;
    Ok(single_result("SSF", params, ssf(close, length, poles)?))
}

pub(crate) fn register(registry: &mut Registry) {
    let specs = [
        IndicatorSpec::new("sma", Category::Overlap, LENGTH_10, sma_builder),
        IndicatorSpec::new("ema", Category::Overlap, LENGTH_10, ema_builder),
        IndicatorSpec::new("dema", Category::Overlap, LENGTH_10, dema_builder),
        IndicatorSpec::new("tema", Category::Overlap, LENGTH_10, tema_builder),
        IndicatorSpec::new("wma", Category::Overlap, LENGTH_10, wma_builder),
        IndicatorSpec::new("rma", Category::Overlap, LENGTH_10, rma_builder),
        IndicatorSpec::new("trima", Category::Overlap, LENGTH_10, trima_builder),
        IndicatorSpec::new("midpoint", Category::Overlap, MIDPOINT_PARAMS, midpoint_builder),
        IndicatorSpec::new("midprice", Category::Overlap, MIDPOINT_PARAMS, midprice_builder),
        IndicatorSpec::new("hl2", Category::Overlap, NO_PARAMS, hl2_builder),
        IndicatorSpec::new("hlc3", Category::Overlap, NO_PARAMS, hlc3_builder),
        IndicatorSpec::new("ohlc4", Category::Overlap, NO_PARAMS, ohlc4_builder),
        IndicatorSpec::new("vwap", Category::Overlap, NO_PARAMS, vwap_builder),
        IndicatorSpec::new("ssf", Category::Overlap, SSF_PARAMS, ssf_builder),
    ];
    for spec in specs {
        registry.add(spec);
    }
}
