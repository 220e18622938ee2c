//! Momentum indicators: MACD, RSI, and the rate-of-change family.

use crate::error::Result;
use crate::frame::{Frame, TabularSource};
use crate::kernels::{ema, rma, rolling_mean};
use crate::output::{IndicatorResult, ResolvedParams};
use crate::registry::{Category, IndicatorSpec, ParamSpec, Registry};
use crate::traits::{validate_length, validate_rows, SeriesElement};

use super::{multi_result, single_result, skip_nan_prefix};

/// Momentum: the difference over `length` positions, `x[i] - x[i-length]`.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is zero.
pub fn mom<T: SeriesElement>(data: &[T], length: usize) -> Result<Vec<T>> {
    validate_length(length)?;
    let n = data.len();
    let mut out = vec![T::nan(); n];
    for i in length..n {
        out[i] = data[i] - data[i - length];
    }
    Ok(out)
}

/// Rate of Change: `100 * (x[i] - x[i-length]) / x[i-length]`.
///
/// A zero base value yields an infinite or NaN output at that position, the
/// arithmetic result of the division.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is zero.
pub fn roc<T: SeriesElement>(data: &[T], length: usize) -> Result<Vec<T>> {
    validate_length(length)?;
    let n = data.len();
    let mut out = vec![T::nan(); n];
    for i in length..n {
        out[i] = T::hundred() * (data[i] - data[i - length]) / data[i - length];
    }
    Ok(out)
}

/// Relative Strength Index over Wilder-smoothed gains and losses.
///
/// `RSI = 100 * avg_gain / (avg_gain + avg_loss)` where the averages are
/// [`rma`]-smoothed one-period gains and losses. A flat stretch where both
/// averages are zero reads as neutral 50. First known value at position
/// `length`.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is zero.
///
/// # Example
///
/// ```
/// use ta_frame::indicators::momentum::rsi;
///
/// let rising: Vec<f64> = (1..=20).map(f64::from).collect();
/// let out = rsi(&rising, 14).unwrap();
/// // Monotonic gains, no losses: RSI pins at 100.
/// assert!((out[19] - 100.0).abs() < 1e-10);
/// ```
pub fn rsi<T: SeriesElement>(data: &[T], length: usize) -> Result<Vec<T>> {
    validate_length(length)?;
    let n = data.len();
    let mut gains = vec![T::nan(); n];
    let mut losses = vec![T::nan(); n];
    for i in 1..n {
        let change = data[i] - data[i - 1];
        if change.is_nan() {
            continue;
        }
        if change > T::zero() {
            gains[i] = change;
            losses[i] = T::zero();
        } else {
            gains[i] = T::zero();
            losses[i] = -change;
        }
    }

    let avg_gain = skip_nan_prefix(&gains, |tail| rma(tail, length))?;
    let avg_loss = skip_nan_prefix(&losses, |tail| rma(tail, length))?;

    let fifty = T::hundred() / T::two();
    Ok(avg_gain
        .iter()
        .zip(&avg_loss)
        .map(|(&g, &l)| {
            if g.is_nan() || l.is_nan() {
                T::nan()
            } else if g + l == T::zero() {
                fifty
            } else {
                T::hundred() * g / (g + l)
            }
        })
        .collect())
}

/// The three MACD output lines.
#[derive(Debug, Clone)]
pub struct MacdOutput<T> {
    /// Fast EMA minus slow EMA; first known value at `slow - 1`.
    pub line: Vec<T>,
    /// EMA of the line over `signal` positions; first known value at
    /// `slow + signal - 2`.
    pub signal: Vec<T>,
    /// Line minus signal.
    pub histogram: Vec<T>,
}

/// Moving Average Convergence Divergence.
///
/// `line = EMA(fast) - EMA(slow)`, `signal = EMA(line, signal)` seeded past
/// the line's warm-up prefix, `histogram = line - signal`. Swapped `fast` and
/// `slow` are reordered rather than rejected.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if any period is zero.
pub fn macd<T: SeriesElement>(
    data: &[T],
    fast: usize,
    slow: usize,
    signal: usize,
) -> Result<MacdOutput<T>> {
    validate_length(signal)?;
    let (fast, slow) = if fast > slow { (slow, fast) } else { (fast, slow) };

    let fast_ema = ema(data, fast)?;
    let slow_ema = ema(data, slow)?;
    let line: Vec<T> = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(&f, &s)| f - s)
        .collect();
    let signal_line = skip_nan_prefix(&line, |tail| ema(tail, signal))?;
    let histogram = line
        .iter()
        .zip(&signal_line)
        .map(|(&l, &s)| l - s)
        .collect();

    Ok(MacdOutput {
        line,
        signal: signal_line,
        histogram,
    })
}

/// Absolute Price Oscillator: `SMA(fast) - SMA(slow)`.
///
/// Swapped periods are reordered rather than rejected.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if either period is zero.
pub fn apo<T: SeriesElement>(data: &[T], fast: usize, slow: usize) -> Result<Vec<T>> {
    let (fast, slow) = if fast > slow { (slow, fast) } else { (fast, slow) };
    let fast_ma = rolling_mean(data, fast)?;
    let slow_ma = rolling_mean(data, slow)?;
    Ok(fast_ma
        .iter()
        .zip(&slow_ma)
        .map(|(&f, &s)| f - s)
        .collect())
}

const MOM_PARAMS: &[ParamSpec] = &[ParamSpec::length("length", 10, "lookback offset")];
const RSI_PARAMS: &[ParamSpec] = &[ParamSpec::length("length", 14, "smoothing length")];
const MACD_PARAMS: &[ParamSpec] = &[
    ParamSpec::length("fast", 12, "fast EMA length"),
    ParamSpec::length("slow", 26, "slow EMA length"),
    ParamSpec::length("signal", 9, "signal EMA length"),
];
const APO_PARAMS: &[ParamSpec] = &[
    ParamSpec::length("fast", 12, "fast SMA length"),
    ParamSpec::length("slow", 26, "slow SMA length"),
];

fn mom_builder(frame: &Frame<f64>, params: &ResolvedParams) -> Result<IndicatorResult<f64>> {
    let length = params.get_usize("length")?;
    let close = frame.close()?;
    validate_rows("mom", length + 1, close.len())?;
    Ok(single_result("MOM", params, mom(close, length)?))
}

fn roc_builder(frame: &Frame<f64>, params: &ResolvedParams) -> Result<IndicatorResult<f64>> {
    let length = params.get_usize("length")?;
    let close = frame.close()?;
    validate_rows("roc", length + 1, close.len())?;
    Ok(single_result("ROC", params, roc(close, length)?))
}

fn rsi_builder(frame: &Frame<f64>, params: &ResolvedParams) -> Result<IndicatorResult<f64>> {
    let length = params.get_usize("length")?;
    let close = frame.close()?;
    validate_rows("rsi", length + 1, close.len())?;
    Ok(single_result("RSI", params, rsi(close, length)?))
}

fn macd_builder(frame: &Frame<f64>, params: &ResolvedParams) -> Result<IndicatorResult<f64>> {
    let fast = params.get_usize("fast")?;
    let slow = params.get_usize("slow")?;
    let signal = params.get_usize("signal")?;
    let close = frame.close()?;
    validate_rows("macd", fast.max(slow) + signal - 1, close.len())?;
    let out = macd(close, fast, slow, signal)?;
    multi_result(
        "MACD",
        params,
        vec![
            ("MACD", out.line),
            ("MACDh", out.histogram),
            ("MACDs", out.signal),
        ],
    )
}

fn apo_builder(frame: &Frame<f64>, params: &ResolvedParams) -> Result<IndicatorResult<f64>> {
    let fast = params.get_usize("fast")?;
    let slow = params.get_usize("slow")?;
    let close = frame.close()?;
    validate_rows("apo", fast.max(slow), close.len())?;
    Ok(single_result("APO", params, apo(close, fast, slow)?))
}

pub(crate) fn register(registry: &mut Registry) {
    let specs = [
        IndicatorSpec::new("mom", Category::Momentum, MOM_PARAMS, mom_builder),
        IndicatorSpec::new("roc", Category::Momentum, MOM_PARAMS, roc_builder),
        IndicatorSpec::new("rsi", Category::Momentum, RSI_PARAMS, rsi_builder),
        IndicatorSpec::new("macd", Category::Momentum, MACD_PARAMS, macd_builder),
        IndicatorSpec::new("apo", Category::Momentum, APO_PARAMS, apo_builder),
    ];
    for spec in specs {
        registry.add(spec);
    }
}
