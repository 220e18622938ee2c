//! Performance indicators: log and percent returns.
//!
//! Both come in per-period and cumulative flavors. The `cumulative` flag
//! changes the output values and swaps the identifier base (`LOGRET_1` vs
//! `CUMLOGRET_1`) but, being a flag, never appears as an identifier
//! parameter itself.

use crate::error::Result;
use crate::frame::{Frame, TabularSource};
use crate::output::{IndicatorResult, ResolvedParams};
use crate::registry::{Category, IndicatorSpec, ParamSpec, Registry};
use crate::traits::{validate_length, validate_rows, SeriesElement};

use super::single_result;

/// Log return over `length` positions: `ln(x[i] / x[i-length])`.
///
/// With `cumulative`, the per-period returns are summed from the start of the
/// series; unknown positions stay unknown without resetting the running sum.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is zero.
///
/// # Example
///
/// ```
/// use ta_frame::indicators::performance::log_return;
///
/// let out = log_return(&[100.0_f64, 105.0, 110.25], 1, false).unwrap();
/// assert!(out[0].is_nan());
/// assert!((out[1] - 0.05_f64.ln_1p()).abs() < 1e-10);
/// ```
pub fn log_return<T: SeriesElement>(
    data: &[T],
    length: usize,
    cumulative: bool,
) -> Result<Vec<T>> {
    validate_length(length)?;
    let n = data.len();
    let mut out = vec![T::nan(); n];
    for i in length..n {
        out[i] = (data[i] / data[i - length]).ln();
    }
    if cumulative {
        accumulate(&mut out, T::zero(), |acc, v| acc + v);
    }
    Ok(out)
}

/// Percent return over `length` positions: `x[i] / x[i-length] - 1`.
///
/// With `cumulative`, the per-period returns compound from the start of the
/// series: `prod(1 + r) - 1` over known positions.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is zero.
pub fn percent_return<T: SeriesElement>(
    data: &[T],
    length: usize,
    cumulative: bool,
) -> Result<Vec<T>> {
    validate_length(length)?;
    let n = data.len();
    let mut out = vec![T::nan(); n];
    for i in length..n {
        out[i] = data[i] / data[i - length] - T::one();
    }
    if cumulative {
        accumulate(&mut out, T::one(), |acc, r| acc * (T::one() + r));
        for v in &mut out {
            if !v.is_nan() {
                *v = *v - T::one();
            }
        }
    }
    Ok(out)
}

/// Folds known values into a running accumulator in place; NaN positions
/// stay NaN and leave the accumulator untouched.
fn accumulate<T: SeriesElement>(values: &mut [T], init: T, fold: impl Fn(T, T) -> T) {
    let mut acc = init;
    for v in values {
        if !v.is_nan() {
            acc = fold(acc, *v);
            *v = acc;
        }
    }
}

const RETURN_PARAMS: &[ParamSpec] = &[
    ParamSpec::length("length", 1, "return horizon"),
    ParamSpec::flag("cumulative", false, "accumulate from the series start"),
];

fn log_return_builder(frame: &Frame<f64>, params: &ResolvedParams) -> Result<IndicatorResult<f64>> {
    let length = params.get_usize("length")?;
    let cumulative = params.get_bool("cumulative")?;
    let close = frame.close()?;
    validate_rows("log_return", length + 1, close.len())?;
    let base = if cumulative { "CUMLOGRET" } else { "LOGRET" };
    Ok(single_result(
        base,
        params,
        log_return(close, length, cumulative)?,
    ))
}

fn percent_return_builder(
    frame: &Frame<f64>,
    params: &ResolvedParams,
) -> Result<IndicatorResult<f64>> {
    let length = params.get_usize("length")?;
    let cumulative = params.get_bool("cumulative")?;
    let close = frame.close()?;
    validate_rows("percent_return", length + 1, close.len())?;
    let base = if cumulative { "CUMPCTRET" } else { "PCTRET" };
    Ok(single_result(
        base,
        params,
        percent_return(close, length, cumulative)?,
    ))
}

pub(crate) fn register(registry: &mut Registry) {
    registry.add(IndicatorSpec::new(
        "log_return",
        Category::Performance,
        RETURN_PARAMS,
        log_return_builder,
    ));
    registry.add(IndicatorSpec::new(
        "percent_return",
        Category::Performance,
        RETURN_PARAMS,
        percent_return_builder,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::ohlcv_frame;
    use crate::registry::{compute, Params};
    use crate::utils::{approx_eq, EPSILON};

    #[test]
    fn test_log_return_basic() {
        let out = log_return(&[100.0_f64, 110.0, 121.0], 1, false).unwrap();
        assert!(out[0].is_nan());
        assert!(approx_eq(out[1], 1.1_f64.ln(), EPSILON));
        assert!(approx_eq(out[2], 1.1_f64.ln(), EPSILON));
    }

    #[test]
    fn test_cumulative_log_return_telescopes() {
        // Sum of one-period log returns equals the log of the total ratio.
        let data = [100.0_f64, 110.0, 99.0, 120.0];
        let out = log_return(&data, 1, true).unwrap();
        assert!(approx_eq(out[3], (120.0_f64 / 100.0).ln(), EPSILON));
    }

    #[test]
    fn test_percent_return_basic() {
        let out = percent_return(&[100.0_f64, 110.0, 99.0], 1, false).unwrap();
        assert!(approx_eq(out[1], 0.10, EPSILON));
        assert!(approx_eq(out[2], -0.10, EPSILON));
    }

    #[test]
    fn test_cumulative_percent_return_compounds() {
        // Compounded one-period returns equal the total ratio minus one.
        let data = [100.0_f64, 110.0, 99.0, 120.0];
        let out = percent_return(&data, 1, true).unwrap();
        assert!(approx_eq(out[3], 0.20, EPSILON));
    }

    #[test]
    fn test_cumulative_skips_unknown_positions() {
        let data = [100.0_f64, f64::NAN, 110.0, 121.0];
        let out = log_return(&data, 1, true).unwrap();
        // Positions touching the gap stay unknown; accumulation resumes after.
        assert!(out[1].is_nan());
        assert!(out[2].is_nan());
        assert!(approx_eq(out[3], 1.1_f64.ln(), EPSILON));
    }

    #[test]
    fn test_multi_period_horizon() {
        let data = [100.0_f64, 1.0, 110.0, 2.0, 121.0];
        let out = percent_return(&data, 2, false).unwrap();
        assert!(out[1].is_nan());
        assert!(approx_eq(out[2], 0.10, EPSILON));
        assert!(approx_eq(out[4], 0.10, EPSILON));
    }

    #[test]
    fn test_builder_naming_swaps_base_on_flag() {
        let frame = ohlcv_frame(20);
        let plain = compute("log_return", &frame, &Params::new()).unwrap();
        assert_eq!(plain.name(), "LOGRET_1");
        let cumulative = compute(
            "log_return",
            &frame,
            &Params::new().with("cumulative", true),
        )
        .unwrap();
        assert_eq!(cumulative.name(), "CUMLOGRET_1");
        let pct = compute("percent_return", &frame, &Params::new()).unwrap();
        assert_eq!(pct.name(), "PCTRET_1");
    }
}
