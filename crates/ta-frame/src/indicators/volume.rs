//! Volume indicators: flow measures weighting price movement by volume.

use crate::error::{Error, Result};
use crate::frame::{Frame, TabularSource};
use crate::kernels::rolling_sum;
use crate::output::{IndicatorResult, ResolvedParams};
use crate::registry::{Category, IndicatorSpec, ParamSpec, Registry};
use crate::traits::{validate_length, validate_rows, SeriesElement};

use super::{single_result, skip_nan_prefix};
use crate::indicators::overlap::hlc3;

/// On-Balance Volume: a running total of volume signed by the close's
/// direction.
///
/// Starts at the first bar's volume; an unchanged close contributes nothing.
///
/// # Errors
///
/// Returns `Error::LengthMismatch` if the inputs differ in length.
pub fn obv<T: SeriesElement>(close: &[T], volume: &[T]) -> Result<Vec<T>> {
    check_same_len(close, volume)?;
    let n = close.len();
    let mut out = vec![T::nan(); n];
    if n == 0 {
        return Ok(out);
    }
    let mut acc = volume[0];
    out[0] = acc;
    for i in 1..n {
        let change = close[i] - close[i - 1];
        if change.is_nan() || volume[i].is_nan() {
            continue;
        }
        if change > T::zero() {
            acc = acc + volume[i];
        } else if change < T::zero() {
            acc = acc - volume[i];
        }
        out[i] = acc;
    }
    Ok(out)
}

/// Accumulation/Distribution line: cumulative money flow volume.
///
/// Each bar contributes `((close - low) - (high - close)) / (high - low) *
/// volume`; a zero-range bar contributes nothing.
///
/// # Errors
///
/// Returns `Error::LengthMismatch` if the inputs differ in length.
pub fn ad<T: SeriesElement>(high: &[T], low: &[T], close: &[T], volume: &[T]) -> Result<Vec<T>> {
    check_same_len(high, low)?;
    check_same_len(high, close)?;
    check_same_len(high, volume)?;
    let mfv = money_flow_volume(high, low, close, volume);
    let n = mfv.len();
    let mut out = vec![T::nan(); n];
    let mut acc = T::zero();
    for i in 0..n {
        if mfv[i].is_nan() {
            continue;
        }
        acc = acc + mfv[i];
        out[i] = acc;
    }
    Ok(out)
}

/// Chaikin Money Flow: rolling money flow volume over rolling volume.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is zero, or
/// `Error::LengthMismatch` if the inputs differ in length.
pub fn cmf<T: SeriesElement>(
    high: &[T],
    low: &[T],
    close: &[T],
    volume: &[T],
    length: usize,
) -> Result<Vec<T>> {
    validate_length(length)?;
    check_same_len(high, low)?;
    check_same_len(high, close)?;
    check_same_len(high, volume)?;
    let mfv = money_flow_volume(high, low, close, volume);
    let flow = rolling_sum(&mfv, length)?;
    let total = rolling_sum(volume, length)?;
    Ok(flow
        .iter()
        .zip(&total)
        .map(|(&f, &t)| f / t)
        .collect())
}

/// Price-Volume Trend: cumulative percent price change weighted by volume.
///
/// `PVT[i] = PVT[i-1] + (close[i] / close[i-1] - 1) * volume[i]`. The first
/// position has no prior close and is unknown.
///
/// # Errors
///
/// Returns `Error::LengthMismatch` if the inputs differ in length.
pub fn pvt<T: SeriesElement>(close: &[T], volume: &[T]) -> Result<Vec<T>> {
    check_same_len(close, volume)?;
    let n = close.len();
    let mut out = vec![T::nan(); n];
    let mut acc = T::zero();
    for i in 1..n {
        let step = (close[i] / close[i - 1] - T::one()) * volume[i];
        if step.is_nan() {
            continue;
        }
        acc = acc + step;
        out[i] = acc;
    }
    Ok(out)
}

/// Money Flow Index: a volume-weighted RSI over the typical price.
///
/// Raw money flow (`hlc3 * volume`) splits into positive and negative sums
/// by the typical price's direction; `MFI = 100 * pos / (pos + neg)` over
/// rolling sums of `length`. A window with no flow either way reads as
/// neutral 50. First known value at position `length`.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is zero, or
/// `Error::LengthMismatch` if the inputs differ in length.
pub fn mfi<T: SeriesElement>(
    high: &[T],
    low: &[T],
    close: &[T],
    volume: &[T],
    length: usize,
) -> Result<Vec<T>> {
    validate_length(length)?;
    check_same_len(high, volume)?;
    let tp = hlc3(high, low, close)?;
    let n = tp.len();
    let mut positive = vec![T::nan(); n];
    let mut negative = vec![T::nan(); n];
    for i in 1..n {
        let change = tp[i] - tp[i - 1];
        let flow = tp[i] * volume[i];
        if change.is_nan() || flow.is_nan() {
            continue;
        }
        if change > T::zero() {
            positive[i] = flow;
            negative[i] = T::zero();
        } else if change < T::zero() {
            positive[i] = T::zero();
            negative[i] = flow;
        } else {
            positive[i] = T::zero();
            negative[i] = T::zero();
        }
    }

    let pos_sum = skip_nan_prefix(&positive, |tail| rolling_sum(tail, length))?;
    let neg_sum = skip_nan_prefix(&negative, |tail| rolling_sum(tail, length))?;

    let fifty = T::hundred() / T::two();
    Ok(pos_sum
        .iter()
        .zip(&neg_sum)
        .map(|(&p, &m)| {
            if p.is_nan() || m.is_nan() {
                T::nan()
            } else if p + m == T::zero() {
                fifty
            } else {
                T::hundred() * p / (p + m)
            }
        })
        .collect())
}

/// `((close - low) - (high - close)) / (high - low) * volume`, zero when the
/// bar has no range.
fn money_flow_volume<T: SeriesElement>(
    high: &[T],
    low: &[T],
    close: &[T],
    volume: &[T],
) -> Vec<T> {
    high.iter()
        .zip(low)
        .zip(close)
        .zip(volume)
        .map(|(((&h, &l), &c), &v)| {
            let range = h - l;
            if range == T::zero() {
                T::zero() * v
            } else {
                ((c - l) - (h - c)) / range * v
            }
        })
        .collect()
}

fn check_same_len<T: SeriesElement>(a: &[T], b: &[T]) -> Result<()> {
    if a.len() == b.len() {
        Ok(())
    } else {
        Err(Error::LengthMismatch {
            left: a.len(),
            right: b.len(),
        })
    }
}

const NO_PARAMS: &[ParamSpec] = &[];
const CMF_PARAMS: &[ParamSpec] = &[ParamSpec::length("length", 20, "flow window")];
const MFI_PARAMS: &[ParamSpec] = &[ParamSpec::length("length", 14, "flow window")];

fn obv_builder(frame: &Frame<f64>, params: &ResolvedParams) -> Result<IndicatorResult<f64>> {
    let close = frame.close()?;
    let volume = frame.volume()?;
    validate_rows("obv", 1, close.len())?;
    Ok(single_result("OBV", params, obv(close, volume)?))
}

fn ad_builder(frame: &Frame<f64>, params: &ResolvedParams) -> Result<IndicatorResult<f64>> {
    let high = frame.high()?;
    let low = frame.low()?;
    let close = frame.close()?;
    let volume = frame.volume()?;
    validate_rows("ad", 1, high.len())?;
    Ok(single_result("AD", params, ad(high, low, close, volume)?))
}

fn cmf_builder(frame: &Frame<f64>, params: &ResolvedParams) -> Result<IndicatorResult<f64>> {
    let length = params.get_usize("length")?;
    let high = frame.high()?;
    let low = frame.low()?;
    let close = frame.close()?;
    let volume = frame.volume()?;
    validate_rows("cmf", length, high.len())?;
    Ok(single_result(
        "CMF",
        params,
        cmf(high, low, close, volume, length)?,
    ))
}

fn pvt_builder(frame: &Frame<f64>, params: &ResolvedParams) -> Result<IndicatorResult<f64>> {
    let close = frame.close()?;
    let volume = frame.volume()?;
    validate_rows("pvt", 2, close.len())?;
    Ok(single_result("PVT", params, pvt(close, volume)?))
}

fn mfi_builder(frame: &Frame<f64>, params: &ResolvedParams) -> Result<IndicatorResult<f64>> {
    let length = params.get_usize("length")?;
    let high = frame.high()?;
    let low = frame.low()?;
    let close = frame.close()?;
    let volume = frame.volume()?;
    validate_rows("mfi", length + 1, high.len())?;
    Ok(single_result(
        "MFI",
        params,
        mfi(high, low, close, volume, length)?,
    ))
}

pub(crate) fn register(registry: &mut Registry) {
    let specs = [
        IndicatorSpec::new("obv", Category::Volume, NO_PARAMS, obv_builder),
        IndicatorSpec::new("ad", Category::Volume, NO_PARAMS, ad_builder),
        IndicatorSpec::new("cmf", Category::Volume, CMF_PARAMS, cmf_builder),
        IndicatorSpec::new("pvt", Category::Volume, NO_PARAMS, pvt_builder),
        IndicatorSpec::new("mfi", Category::Volume, MFI_PARAMS, mfi_builder),
    ];
    for spec in specs {
        registry.add(spec);
    }
}
