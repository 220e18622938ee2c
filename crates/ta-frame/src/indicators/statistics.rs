//! Rolling statistics over the close: moments, quantiles, and z-score.
//!
//! Variance-family indicators use sample statistics (`ddof = 1`), and the
//! higher moments ([`kurtosis`], [`skew`]) are the bias-corrected sample
//! estimators, the standard convention for these columns.

use crate::error::Result;
use crate::frame::{Frame, TabularSource};
use crate::kernels::{
    rolling_mad, rolling_mean, rolling_median, rolling_quantile, rolling_stdev, rolling_variance,
};
use crate::output::{IndicatorResult, ResolvedParams};
use crate::registry::{Category, IndicatorSpec, ParamSpec, Registry};
use crate::traits::{validate_length, validate_rows, SeriesElement};

use super::single_result;

/// Rolling sample excess kurtosis (bias-corrected, Fisher's definition).
///
/// A window with zero variance yields NaN. Requires `length >= 4`.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is less than 4.
pub fn kurtosis<T: SeriesElement>(data: &[T], length: usize) -> Result<Vec<T>> {
    if length < 4 {
        return Err(crate::error::Error::invalid_parameter(
            "length",
            format!("must be at least 4, got {length}"),
        ));
    }
    let n = data.len();
    let mut out = vec![T::nan(); n];
    if length > n {
        return Ok(out);
    }

    let len_f = length as f64;
    let lead = T::from_f64(len_f * (len_f + 1.0) / ((len_f - 1.0) * (len_f - 2.0) * (len_f - 3.0)))?;
    let tail = T::from_f64(3.0 * (len_f - 1.0) * (len_f - 1.0) / ((len_f - 2.0) * (len_f - 3.0)))?;
    let divisor = T::from_usize(length - 1)?;
    let length_t = T::from_usize(length)?;

    for i in (length - 1)..n {
        let window = &data[i + 1 - length..=i];
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        let mean = window.iter().fold(T::zero(), |acc, &v| acc + v) / length_t;
        let mut m2 = T::zero();
        let mut m4 = T::zero();
        for &v in window {
            let d = v - mean;
            let d2 = d * d;
            m2 = m2 + d2;
            m4 = m4 + d2 * d2;
        }
        let s2 = m2 / divisor;
        if s2 > T::zero() {
            out[i] = lead * m4 / (s2 * s2) - tail;
        }
    }
    Ok(out)
}

/// Rolling sample skewness (bias-corrected).
///
/// A window with zero variance yields NaN. Requires `length >= 3`.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is less than 3.
pub fn skew<T: SeriesElement>(data: &[T], length: usize) -> Result<Vec<T>> {
    if length < 3 {
        return Err(crate::error::Error::invalid_parameter(
            "length",
            format!("must be at least 3, got {length}"),
        ));
    }
    let n = data.len();
    let mut out = vec![T::nan(); n];
    if length > n {
        return Ok(out);
    }

    let len_f = length as f64;
    let lead = T::from_f64(len_f / ((len_f - 1.0) * (len_f - 2.0)))?;
    let divisor = T::from_usize(length - 1)?;
    let length_t = T::from_usize(length)?;

    for i in (length - 1)..n {
        let window = &data[i + 1 - length..=i];
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        let mean = window.iter().fold(T::zero(), |acc, &v| acc + v) / length_t;
        let mut m2 = T::zero();
        let mut m3 = T::zero();
        for &v in window {
            let d = v - mean;
            m2 = m2 + d * d;
            m3 = m3 + d * d * d;
        }
        let s = (m2 / divisor).sqrt();
        if s > T::zero() {
            out[i] = lead * m3 / (s * s * s);
        }
    }
    Ok(out)
}

/// Rolling z-score: the close's distance from its rolling mean in rolling
/// sample standard deviations.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is less than 2.
pub fn zscore<T: SeriesElement>(data: &[T], length: usize) -> Result<Vec<T>> {
    validate_length(length)?;
    let mean = rolling_mean(data, length)?;
    let stdev = rolling_stdev(data, length, 1)?;
    Ok(data
        .iter()
        .zip(mean.iter().zip(&stdev))
        .map(|(&x, (&m, &s))| (x - m) / s)
        .collect())
}

const LENGTH_30: &[ParamSpec] = &[ParamSpec::length("length", 30, "window length")];
const KURT_PARAMS: &[ParamSpec] =
    &[ParamSpec::int("length", 30, 4, i64::MAX, "window length")];
const SKEW_PARAMS: &[ParamSpec] =
    &[ParamSpec::int("length", 30, 3, i64::MAX, "window length")];
const SPREAD_PARAMS: &[ParamSpec] =
    &[ParamSpec::int("length", 30, 2, i64::MAX, "window length")];
const QUANTILE_PARAMS: &[ParamSpec] = &[
    ParamSpec::length("length", 30, "window length"),
    ParamSpec::float("q", 0.5, 0.0, 1.0, "quantile in [0, 1]"),
];

fn kurtosis_builder(frame: &Frame<f64>, params: &ResolvedParams) -> Result<IndicatorResult<f64>> {
    let length = params.get_usize("length")?;
    let close = frame.close()?;
    validate_rows("kurtosis", length, close.len())?;
    Ok(single_result("KURT", params, kurtosis(close, length)?))
}

fn mad_builder(frame: &Frame<f64>, params: &ResolvedParams) -> Result<IndicatorResult<f64>> {
    let length = params.get_usize("length")?;
    let close = frame.close()?;
    validate_rows("mad", length, close.len())?;
    Ok(single_result("MAD", params, rolling_mad(close, length)?))
}

fn median_builder(frame: &Frame<f64>, params: &ResolvedParams) -> Result<IndicatorResult<f64>> {
    let length = params.get_usize("length")?;
    let close = frame.close()?;
    validate_rows("median", length, close.len())?;
    Ok(single_result("MEDIAN", params, rolling_median(close, length)?))
}

fn quantile_builder(frame: &Frame<f64>, params: &ResolvedParams) -> Result<IndicatorResult<f64>> {
    let length = params.get_usize("length")?;
    let q = params.get_f64("q")?;
    let close = frame.close()?;
    validate_rows("quantile", length, close.len())?;
    Ok(single_result(
        "QTL",
        params,
        rolling_quantile(close, length, q)?,
    ))
}

fn skew_builder(frame: &Frame<f64>, params: &ResolvedParams) -> Result<IndicatorResult<f64>> {
    let length = params.get_usize("length")?;
    let close = frame.close()?;
    validate_rows("skew", length, close.len())?;
    Ok(single_result("SKEW", params, skew(close, length)?))
}

fn stdev_builder(frame: &Frame<f64>, params: &ResolvedParams) -> Result<IndicatorResult<f64>> {
    let length = params.get_usize("length")?;
    let close = frame.close()?;
    validate_rows("stdev", length, close.len())?;
    Ok(single_result("STDEV", params, rolling_stdev(close, length, 1)?))
}

fn variance_builder(frame: &Frame<f64>, params: &ResolvedParams) -> Result<IndicatorResult<f64>> {
    let length = params.get_usize("length")?;
    let close = frame.close()?;
    validate_rows("variance", length, close.len())?;
    Ok(single_result("VAR", params, rolling_variance(close, length, 1)?))
}

fn zscore_builder(frame: &Frame<f64>, params: &ResolvedParams) -> Result<IndicatorResult<f64>> {
    let length = params.get_usize("length")?;
    let close = frame.close()?;
    validate_rows("zscore", length, close.len())?;
    Ok(single_result("ZS", params, zscore(close, length)?))
}

pub(crate) fn register(registry: &mut Registry) {
    let specs = [
        IndicatorSpec::new("kurtosis", Category::Statistics, KURT_PARAMS, kurtosis_builder),
        IndicatorSpec::new("mad", Category::Statistics, LENGTH_30, mad_builder),
        IndicatorSpec::new("median", Category::Statistics, LENGTH_30, median_builder),
        IndicatorSpec::new("quantile", Category::Statistics, QUANTILE_PARAMS, quantile_builder),
        IndicatorSpec::new("skew", Category::Statistics, SKEW_PARAMS, skew_builder),
        IndicatorSpec::new("stdev", Category::Statistics, SPREAD_PARAMS, stdev_builder),
        IndicatorSpec::new("variance", Category::Statistics, SPREAD_PARAMS, variance_builder),
        IndicatorSpec::new("zscore", Category::Statistics, SPREAD_PARAMS, zscore_builder),
    ];
    for spec in specs {
        registry.add(spec);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::ohlcv_frame;
    use crate::registry::{compute, Params};
    use crate::utils::{approx_eq, count_nan_prefix, EPSILON, LOOSE_EPSILON};

    #[test]
    fn test_kurtosis_uniformish_window_negative() {
        // Evenly spread values are platykurtic: sample excess kurtosis of
        // [1, 2, 3, 4, 5] is -1.2.
        let out = kurtosis(&[1.0_f64, 2.0, 3.0, 4.0, 5.0], 5).unwrap();
        assert!(approx_eq(out[4], -1.2, LOOSE_EPSILON));
    }

    #[test]
    fn test_kurtosis_constant_window_unknown() {
        let out = kurtosis(&[5.0_f64; 10], 5).unwrap();
        assert!(out.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_kurtosis_min_length() {
        assert!(kurtosis(&[1.0_f64; 10], 3).is_err());
    }

    #[test]
    fn test_skew_symmetric_window_zero() {
        let out = skew(&[1.0_f64, 2.0, 3.0, 4.0, 5.0], 5).unwrap();
        assert!(approx_eq(out[4], 0.0, EPSILON));
    }

    #[test]
    fn test_skew_right_tail_positive() {
        // One large outlier above the bulk pulls the sample skew positive.
        let out = skew(&[1.0_f64, 1.0, 1.0, 2.0, 10.0], 5).unwrap();
        assert!(out[4] > 0.0);
    }

    #[test]
    fn test_zscore_known_value() {
        // Window [1, 2, 3]: mean 2, sample stdev 1, so z(3) = 1.
        let out = zscore(&[1.0_f64, 2.0, 3.0], 3).unwrap();
        assert!(approx_eq(out[2], 1.0, EPSILON));
    }

    #[test]
    fn test_zscore_warm_up() {
        let data: Vec<f64> = (0..40).map(|i| f64::from(i).sin()).collect();
        let out = zscore(&data, 10).unwrap();
        assert_eq!(count_nan_prefix(&out), 9);
    }

    #[test]
    fn test_builders_name_outputs() {
        let frame = ohlcv_frame(40);
        let cases = [
            ("kurtosis", "KURT_30"),
            ("mad", "MAD_30"),
            ("median", "MEDIAN_30"),
            ("skew", "SKEW_30"),
            ("stdev", "STDEV_30"),
            ("variance", "VAR_30"),
            ("zscore", "ZS_30"),
        ];
        for (name, expected) in cases {
            let result = compute(name, &frame, &Params::new()).unwrap();
            assert_eq!(result.name(), expected, "indicator `{name}`");
        }
    }

    #[test]
    fn test_quantile_naming_includes_q() {
        let frame = ohlcv_frame(40);
        let result = compute("quantile", &frame, &Params::new()).unwrap();
        assert_eq!(result.name(), "QTL_30_0.5");
        let result = compute("quantile", &frame, &Params::new().with("q", 0.25)).unwrap();
        assert_eq!(result.name(), "QTL_30_0.25");
    }

    #[test]
    fn test_quantile_out_of_range_rejected() {
        let frame = ohlcv_frame(40);
        let result = compute("quantile", &frame, &Params::new().with("q", 1.5));
        assert!(matches!(
            result,
            Err(crate::error::Error::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_stdev_matches_variance_sqrt() {
        let frame = ohlcv_frame(40);
        let params = Params::new().with("length", 10);
        let stdev = compute("stdev", &frame, &params).unwrap();
        let variance = compute("variance", &frame, &params).unwrap();
        let s = stdev.as_single().unwrap().values();
        let v = variance.as_single().unwrap().values();
        for i in 9..40 {
            assert!(approx_eq(s[i] * s[i], v[i], LOOSE_EPSILON));
        }
    }
}
