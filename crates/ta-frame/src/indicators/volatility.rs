//! Volatility indicators: the true-range family and band overlays.

use crate::error::{Error, Result};
use crate::frame::{Frame, TabularSource};
use crate::kernels::{ema, rma, rolling_max, rolling_mean, rolling_min, rolling_stdev};
use crate::output::{IndicatorResult, ResolvedParams};
use crate::registry::{Category, IndicatorSpec, ParamSpec, Registry};
use crate::traits::{validate_length, validate_rows, SeriesElement};

use super::{multi_result, single_result, skip_nan_prefix};

/// True Range: the largest of the bar range and the two gap ranges against
/// the previous close.
///
/// `max(high - low, |high - prev_close|, |low - prev_close|)`. The first
/// position has no previous close and is unknown.
///
/// # Errors
///
/// Returns `Error::LengthMismatch` if the inputs differ in length.
pub fn true_range<T: SeriesElement>(high: &[T], low: &[T], close: &[T]) -> Result<Vec<T>> {
    check_ohlc_len(high, low, close)?;
    let n = high.len();
    let mut out = vec![T::nan(); n];
    for i in 1..n {
        let prev_close = close[i - 1];
        let range = high[i] - low[i];
        out[i] = range
            .max((high[i] - prev_close).abs())
            .max((low[i] - prev_close).abs());
    }
    Ok(out)
}

/// Average True Range: Wilder-smoothed [`true_range`].
///
/// First known value at position `length`.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is zero, or
/// `Error::LengthMismatch` if the inputs differ in length.
///
/// # Example
///
/// ```
/// use ta_frame::indicators::volatility::atr;
///
/// let high = vec![12.0_f64; 20];
/// let low = vec![10.0_f64; 20];
/// let close = vec![11.0_f64; 20];
/// let out = atr(&high, &low, &close, 14).unwrap();
/// // Constant 2-point range smooths to a constant 2-point ATR.
/// assert!((out[19] - 2.0).abs() < 1e-10);
/// ```
pub fn atr<T: SeriesElement>(
    high: &[T],
    low: &[T],
    close: &[T],
    length: usize,
) -> Result<Vec<T>> {
    validate_length(length)?;
    let tr = true_range(high, low, close)?;
    skip_nan_prefix(&tr, |tail| rma(tail, length))
}

/// Normalized Average True Range: ATR as a percentage of the close.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is zero, or
/// `Error::LengthMismatch` if the inputs differ in length.
pub fn natr<T: SeriesElement>(
    high: &[T],
    low: &[T],
    close: &[T],
    length: usize,
) -> Result<Vec<T>> {
    let atr = atr(high, low, close, length)?;
    Ok(atr
        .iter()
        .zip(close)
        .map(|(&a, &c)| T::hundred() * a / c)
        .collect())
}

/// The three Bollinger band lines.
#[derive(Debug, Clone)]
pub struct BollingerOutput<T> {
    /// Middle band minus `std` rolling deviations.
    pub lower: Vec<T>,
    /// The rolling mean.
    pub middle: Vec<T>,
    /// Middle band plus `std` rolling deviations.
    pub upper: Vec<T>,
}

/// Bollinger Bands: a rolling mean flanked at `std` rolling sample standard
/// deviations.
///
/// The middle band is computed once and shared by both flanks, so
/// `upper - lower == 2 * std * stdev` exactly.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is less than 2 or `std` is
/// negative or NaN.
pub fn bbands<T: SeriesElement>(
    data: &[T],
    length: usize,
    std: f64,
) -> Result<BollingerOutput<T>> {
    if std.is_nan() || std < 0.0 {
        return Err(Error::invalid_parameter(
            "std",
            format!("must be a non-negative number, got {std}"),
        ));
    }
    let std_t = T::from_f64(std)?;
    let middle = rolling_mean(data, length)?;
    let deviation = rolling_stdev(data, length, 1)?;
    let lower = middle
        .iter()
        .zip(&deviation)
        .map(|(&m, &d)| m - std_t * d)
        .collect();
    let upper = middle
        .iter()
        .zip(&deviation)
        .map(|(&m, &d)| m + std_t * d)
        .collect();
    Ok(BollingerOutput {
        lower,
        middle,
        upper,
    })
}

/// The three Donchian channel lines.
#[derive(Debug, Clone)]
pub struct DonchianOutput<T> {
    /// Rolling lowest low over `lower_length`.
    pub lower: Vec<T>,
    /// Midpoint of the two channel edges.
    pub middle: Vec<T>,
    /// Rolling highest high over `upper_length`.
    pub upper: Vec<T>,
}

/// Donchian Channels: rolling extremes of high and low with independent
/// window lengths.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if either length is zero, or
/// `Error::LengthMismatch` if `high` and `low` differ in length.
pub fn donchian<T: SeriesElement>(
    high: &[T],
    low: &[T],
    lower_length: usize,
    upper_length: usize,
) -> Result<DonchianOutput<T>> {
    if high.len() != low.len() {
        return Err(Error::LengthMismatch {
            left: high.len(),
            right: low.len(),
        });
    }
    let lower = rolling_min(low, lower_length)?;
    let upper = rolling_max(high, upper_length)?;
    let middle = lower
        .iter()
        .zip(&upper)
        .map(|(&l, &u)| (l + u) / T::two())
        .collect();
    Ok(DonchianOutput {
        lower,
        middle,
        upper,
    })
}

/// The three Keltner channel lines.
#[derive(Debug, Clone)]
pub struct KeltnerOutput<T> {
    /// Basis minus `scalar` smoothed true ranges.
    pub lower: Vec<T>,
    /// The EMA basis line.
    pub basis: Vec<T>,
    /// Basis plus `scalar` smoothed true ranges.
    pub upper: Vec<T>,
}

/// Keltner Channels: an EMA basis flanked at `scalar` EMA-smoothed true
/// ranges.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is zero or `scalar` is
/// negative or NaN, or `Error::LengthMismatch` if the inputs differ in
/// length.
pub fn kc<T: SeriesElement>(
    high: &[T],
    low: &[T],
    close: &[T],
    length: usize,
    scalar: f64,
) -> Result<KeltnerOutput<T>> {
    if scalar.is_nan() || scalar < 0.0 {
        return Err(Error::invalid_parameter(
            "scalar",
            format!("must be a non-negative number, got {scalar}"),
        ));
    }
    let scalar_t = T::from_f64(scalar)?;
    let basis = ema(close, length)?;
    let tr = true_range(high, low, close)?;
    let band = skip_nan_prefix(&tr, |tail| ema(tail, length))?;
    let lower = basis
        .iter()
        .zip(&band)
        .map(|(&b, &w)| b - scalar_t * w)
        .collect();
    let upper = basis
        .iter()
        .zip(&band)
        .map(|(&b, &w)| b + scalar_t * w)
        .collect();
    Ok(KeltnerOutput {
        lower,
        basis,
        upper,
    })
}

fn check_ohlc_len<T: SeriesElement>(high: &[T], low: &[T], close: &[T]) -> Result<()> {
    if high.len() != low.len() {
        return Err(Error::LengthMismatch {
            left: high.len(),
            right: low.len(),
        });
    }
    if high.len() != close.len() {
        return Err(Error::LengthMismatch {
            left: high.len(),
            right: close.len(),
        });
    }
    Ok(())
}

const ATR_PARAMS: &[ParamSpec] = &[ParamSpec::length("length", 14, "smoothing length")];
const NO_PARAMS: &[ParamSpec] = &[];
const BBANDS_PARAMS: &[ParamSpec] = &[
    ParamSpec::int("length", 5, 2, i64::MAX, "window length"),
    ParamSpec::float("std", 2.0, 0.0, f64::MAX, "deviation multiplier"),
];
const DONCHIAN_PARAMS: &[ParamSpec] = &[
    ParamSpec::length("lower_length", 20, "lower channel window"),
    ParamSpec::length("upper_length", 20, "upper channel window"),
];
const KC_PARAMS: &[ParamSpec] = &[
    ParamSpec::length("length", 20, "basis and band length"),
    ParamSpec::float("scalar", 2.0, 0.0, f64::MAX, "band multiplier"),
];

fn true_range_builder(frame: &Frame<f64>, params: &ResolvedParams) -> Result<IndicatorResult<f64>> {
    let high = frame.high()?;
    let low = frame.low()?;
    let close = frame.close()?;
    validate_rows("true_range", 2, high.len())?;
    Ok(single_result(
        "TRUERANGE",
        params,
        true_range(high, low, close)?,
    ))
}

fn atr_builder(frame: &Frame<f64>, params: &ResolvedParams) -> Result<IndicatorResult<f64>> {
    let length = params.get_usize("length")?;
    let high = frame.high()?;
    let low = frame.low()?;
    let close = frame.close()?;
    validate_rows("atr", length + 1, high.len())?;
    Ok(single_result("ATR", params, atr(high, low, close, length)?))
}

fn natr_builder(frame: &Frame<f64>, params: &ResolvedParams) -> Result<IndicatorResult<f64>> {
    let length = params.get_usize("length")?;
    let high = frame.high()?;
    let low = frame.low()?;
    let close = frame.close()?;
    validate_rows("natr", length + 1, high.len())?;
    Ok(single_result("NATR", params, natr(high, low, close, length)?))
}

fn bbands_builder(frame: &Frame<f64>, params: &ResolvedParams) -> Result<IndicatorResult<f64>> {
    let length = params.get_usize("length")?;
    let std = params.get_f64("std")?;
    let close = frame.close()?;
    validate_rows("bbands", length, close.len())?;
    let out = bbands(close, length, std)?;
    multi_result(
        "BBANDS",
        params,
        vec![("BBL", out.lower), ("BBM", out.middle), ("BBU", out.upper)],
    )
}

fn donchian_builder(frame: &Frame<f64>, params: &ResolvedParams) -> Result<IndicatorResult<f64>> {
    let lower_length = params.get_usize("lower_length")?;
    let upper_length = params.get_usize("upper_length")?;
    let high = frame.high()?;
    let low = frame.low()?;
    validate_rows("donchian", lower_length.max(upper_length), high.len())?;
    let out = donchian(high, low, lower_length, upper_length)?;
    multi_result(
        "DC",
        params,
        vec![("DCL", out.lower), ("DCM", out.middle), ("DCU", out.upper)],
    )
}

fn kc_builder(frame: &Frame<f64>, params: &ResolvedParams) -> Result<IndicatorResult<f64>> {
    let length = params.get_usize("length")?;
    let scalar = params.get_f64("scalar")?;
    let high = frame.high()?;
    let low = frame.low()?;
    let close = frame.close()?;
    validate_rows("kc", length + 1, high.len())?;
    let out = kc(high, low, close, length, scalar)?;
    multi_result(
        "KC",
        params,
        vec![("KCL", out.lower), ("KCB", out.basis), ("KCU", out.upper)],
    )
}

pub(crate) fn register(registry: &mut Registry) {
    let specs = [
        IndicatorSpec::new("true_range", Category::Volatility, NO_PARAMS, true_range_builder),
        IndicatorSpec::new("atr", Category::Volatility, ATR_PARAMS, atr_builder),
        IndicatorSpec::new("natr", Category::Volatility, ATR_PARAMS, natr_builder),
        IndicatorSpec::new("bbands", Category::Volatility, BBANDS_PARAMS, bbands_builder),
        IndicatorSpec::new("donchian", Category::Volatility, DONCHIAN_PARAMS, donchian_builder),
        IndicatorSpec::new("kc", Category::Volatility, KC_PARAMS, kc_builder),
    ];
    for spec in specs {
        registry.add(spec);
    }
}
