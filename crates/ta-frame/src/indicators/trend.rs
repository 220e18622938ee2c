//! Trend indicators: the detrended price oscillator and directional flags.

use crate::error::Result;
use crate::frame::{Frame, TabularSource};
use crate::kernels::rolling_mean;
use crate::output::{IndicatorResult, ResolvedParams};
use crate::registry::{Category, IndicatorSpec, ParamSpec, Registry};
use crate::traits::{validate_length, validate_rows, SeriesElement};

use super::single_result;

/// Detrended Price Oscillator.
///
/// Subtracts a displaced moving average from the close to strip the longer
/// trend and expose the cycle: `close[i] - SMA(close, length)[i - t]` with
/// `t = length / 2 + 1`. The displacement looks strictly backward; no
/// position reads data ahead of itself.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is zero.
pub fn dpo<T: SeriesElement>(data: &[T], length: usize) -> Result<Vec<T>> {
    validate_length(length)?;
    let t = length / 2 + 1;
    let ma = rolling_mean(data, length)?;
    let n = data.len();
    let mut out = vec![T::nan(); n];
    for i in t..n {
        out[i] = data[i] - ma[i - t];
    }
    Ok(out)
}

/// Directional flag: 1 where the value rose over `length` positions, 0 where
/// it did not, NaN where the comparison base is unknown.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is zero.
pub fn increasing<T: SeriesElement>(data: &[T], length: usize) -> Result<Vec<T>> {
    directional(data, length, |change| change > T::zero())
}

/// Directional flag: 1 where the value fell over `length` positions.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is zero.
pub fn decreasing<T: SeriesElement>(data: &[T], length: usize) -> Result<Vec<T>> {
    directional(data, length, |change| change < T::zero())
}

fn directional<T: SeriesElement>(
    data: &[T],
    length: usize,
    test: impl Fn(T) -> bool,
) -> Result<Vec<T>> {
    validate_length(length)?;
    let n = data.len();
    let mut out = vec![T::nan(); n];
    for i in length..n {
        let change = data[i] - data[i - length];
        if change.is_nan() {
            continue;
        }
        out[i] = if test(change) { T::one() } else { T::zero() };
    }
    Ok(out)
}

const DPO_PARAMS: &[ParamSpec] = &[ParamSpec::length("length", 20, "detrending window")];
const FLAG_PARAMS: &[ParamSpec] = &[ParamSpec::length("length", 1, "comparison offset")];

fn dpo_builder(frame: &Frame<f64>, params: &ResolvedParams) -> Result<IndicatorResult<f64>> {
    let length = params.get_usize("length")?;
    let close = frame.close()?;
    validate_rows("dpo", length + length / 2 + 1, close.len())?;
    Ok(single_result("DPO", params, dpo(close, length)?))
}

fn increasing_builder(frame: &Frame<f64>, params: &ResolvedParams) -> Result<IndicatorResult<f64>> {
    let length = params.get_usize("length")?;
    let close = frame.close()?;
    validate_rows("increasing", length + 1, close.len())?;
    Ok(single_result("INC", params, increasing(close, length)?))
}

fn decreasing_builder(frame: &Frame<f64>, params: &ResolvedParams) -> Result<IndicatorResult<f64>> {
    let length = params.get_usize("length")?;
    let close = frame.close()?;
    validate_rows("decreasing", length + 1, close.len())?;
    Ok(single_result("DEC", params, decreasing(close, length)?))
}

pub(crate) fn register(registry: &mut Registry) {
    registry.add(IndicatorSpec::new(
        "dpo",
        Category::Trend,
        DPO_PARAMS,
        dpo_builder,
    ));
    registry.add(IndicatorSpec::new(
        "increasing",
        Category::Trend,
        FLAG_PARAMS,
        increasing_builder,
    ));
    registry.add(IndicatorSpec::new(
        "decreasing",
        Category::Trend,
        FLAG_PARAMS,
        decreasing_builder,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::ohlcv_frame;
    use crate::registry::{compute, Params};
    use crate::utils::{approx_eq, count_nan_prefix, EPSILON};

    #[test]
    fn test_dpo_linear_trend_constant() {
        // On a perfectly linear series the displaced mean sits a fixed
        // distance below the close, so the oscillator is flat.
        let data: Vec<f64> = (0..60).map(f64::from).collect();
        let out = dpo(&data, 20).unwrap();
        let first_known = count_nan_prefix(&out);
        let reference = out[first_known];
        for v in &out[first_known..] {
            assert!(approx_eq(*v, reference, EPSILON));
        }
    }

    #[test]
    fn test_dpo_warm_up_span() {
        let data: Vec<f64> = (0..60).map(f64::from).collect();
        let out = dpo(&data, 20).unwrap();
        // SMA known from 19, displaced by t = 11.
        assert_eq!(count_nan_prefix(&out), 30);
    }

    #[test]
    fn test_increasing_and_decreasing_flags() {
        let data = [1.0_f64, 2.0, 2.0, 1.0];
        let inc = increasing(&data, 1).unwrap();
        let dec = decreasing(&data, 1).unwrap();
        assert!(inc[0].is_nan());
        assert_eq!(inc[1], 1.0);
        assert_eq!(inc[2], 0.0);
        assert_eq!(inc[3], 0.0);
        assert_eq!(dec[1], 0.0);
        assert_eq!(dec[2], 0.0);
        assert_eq!(dec[3], 1.0);
    }

    #[test]
    fn test_flags_nan_base() {
        let data = [f64::NAN, 2.0, 3.0];
        let out = increasing(&data, 1).unwrap();
        assert!(out[1].is_nan());
        assert_eq!(out[2], 1.0);
    }

    #[test]
    fn test_builders_name_outputs() {
        let frame = ohlcv_frame(60);
        assert_eq!(
            compute("dpo", &frame, &Params::new()).unwrap().name(),
            "DPO_20"
        );
        assert_eq!(
            compute("increasing", &frame, &Params::new()).unwrap().name(),
            "INC_1"
        );
        assert_eq!(
            compute("decreasing", &frame, &Params::new()).unwrap().name(),
            "DEC_1"
        );
    }

    #[test]
    fn test_flags_are_binary_or_unknown() {
        let frame = ohlcv_frame(60);
        let result = compute("increasing", &frame, &Params::new().with("length", 3)).unwrap();
        for v in result.as_single().unwrap().values() {
            assert!(v.is_nan() || *v == 0.0 || *v == 1.0);
        }
    }
}
