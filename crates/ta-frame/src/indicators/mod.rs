//! Composite indicator builders, one module per category.
//!
//! Each category module exposes two layers:
//!
//! - **Typed functions** generic over [`SeriesElement`](crate::traits::SeriesElement),
//!   operating on plain slices and returning plain vectors (or a small output
//!   struct for multi-line indicators). These are the direct API for callers
//!   who already hold their data.
//! - **Builders**, the `f64` entry points behind the registry: they pull role
//!   columns from a frame, run the typed function, and wrap the output in an
//!   [`IndicatorResult`] with canonical identifiers.
//!
//! Builders never mutate their input frame; multi-output indicators compute
//! shared intermediates once. `InsufficientData` is raised only for degenerate
//! calls where no output position could be known; a partial-NaN warm-up is a
//! valid result.
//!
//! # Categories
//!
//! - [`overlap`] - price-following overlays: moving averages, typical prices
//! - [`momentum`] - MACD, RSI, rate-of-change oscillators
//! - [`performance`] - log and percent returns, optionally cumulative
//! - [`statistics`] - rolling moments, quantiles, z-score
//! - [`trend`] - detrended price oscillator, directional flags
//! - [`volatility`] - band indicators and true-range family
//! - [`volume`] - OBV, accumulation/distribution, money flow

pub mod momentum;
pub mod overlap;
pub mod performance;
pub mod statistics;
pub mod trend;
pub mod volatility;
pub mod volume;

use crate::error::Result;
use crate::frame::Frame;
use crate::output::{column_name, IndicatorResult, ResolvedParams};
use crate::series::Series;
use crate::traits::SeriesElement;
use crate::utils::count_nan_prefix;

/// Wraps a single output vector with its canonical identifier.
pub(crate) fn single_result<T: SeriesElement>(
    base: &str,
    params: &ResolvedParams,
    values: Vec<T>,
) -> IndicatorResult<T> {
    IndicatorResult::Single(Series::new(column_name(base, params), values))
}

/// Wraps multiple output lines under a result-level identifier.
///
/// `parts` pairs each role token with its values, in canonical output order.
pub(crate) fn multi_result<T: SeriesElement>(
    base: &str,
    params: &ResolvedParams,
    parts: Vec<(&str, Vec<T>)>,
) -> Result<IndicatorResult<T>> {
    let mut frame = Frame::with_capacity(parts.len());
    for (role, values) in parts {
        frame.push(Series::new(column_name(role, params), values))?;
    }
    Ok(IndicatorResult::Multi {
        name: column_name(base, params),
        frame,
    })
}

/// Applies a whole-slice kernel past a leading NaN prefix.
///
/// Recursive smoothers seed from the start of their input, so feeding them a
/// series that begins with a warm-up prefix (an EMA of an EMA, a signal line
/// over a MACD line) would poison the seed. This runs `f` on the known suffix
/// and pads the prefix back with NaN.
pub(crate) fn skip_nan_prefix<T: SeriesElement>(
    data: &[T],
    f: impl FnOnce(&[T]) -> Result<Vec<T>>,
) -> Result<Vec<T>> {
    let skip = count_nan_prefix(data);
    let mut out = vec![T::nan(); data.len()];
    if skip < data.len() {
        let tail = f(&data[skip..])?;
        out[skip..].copy_from_slice(&tail);
    }
    Ok(out)
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::frame::Frame;
    use crate::series::Series;

    /// A deterministic synthetic OHLCV frame: a gently trending, oscillating
    /// close with a fixed spread and cycling volume.
    pub(crate) fn ohlcv_frame(n: usize) -> Frame<f64> {
        let close: Vec<f64> = (0..n)
            .map(|i| 100.0 + 0.1 * i as f64 + 5.0 * (0.7 * i as f64).sin())
            .collect();
        let open: Vec<f64> = (0..n)
            .map(|i| if i == 0 { close[0] } else { close[i - 1] })
            .collect();
        let high: Vec<f64> = close.iter().map(|c| c + 1.0).collect();
        let low: Vec<f64> = close.iter().map(|c| c - 1.0).collect();
        let volume: Vec<f64> = (0..n)
            .map(|i| 1000.0 + 250.0 * ((i % 7) as f64))
            .collect();

        let mut frame = Frame::with_capacity(5);
        for (name, values) in [
            ("open", open),
            ("high", high),
            ("low", low),
            ("close", close),
            ("volume", volume),
        ] {
            frame
                .push(Series::new(name, values))
                .unwrap_or_else(|_| unreachable!("fresh frame, equal lengths"));
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::ema;

    #[test]
    fn test_skip_nan_prefix_pads_front() {
        let data = [f64::NAN, f64::NAN, 1.0, 2.0, 3.0, 4.0];
        let out = skip_nan_prefix(&data, |tail| ema(tail, 2)).unwrap();
        assert_eq!(out.len(), 6);
        assert!(out[0].is_nan());
        assert!(out[1].is_nan());
        // Seed (SMA of [1, 2]) lands one position into the suffix.
        assert!(out[2].is_nan());
        assert!((out[3] - 1.5).abs() < 1e-10);
    }

    #[test]
    fn test_skip_nan_prefix_all_nan_input() {
        let data = [f64::NAN; 4];
        let out = skip_nan_prefix(&data, |tail| ema(tail, 2)).unwrap();
        assert!(out.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_skip_nan_prefix_no_prefix_is_identity_wrap() {
        let data = [1.0_f64, 2.0, 3.0];
        let direct = ema(&data, 2).unwrap();
        let wrapped = skip_nan_prefix(&data, |tail| ema(tail, 2)).unwrap();
        assert_eq!(direct.len(), wrapped.len());
        for (a, b) in direct.iter().zip(&wrapped) {
            assert!(a.is_nan() && b.is_nan() || (a - b).abs() < 1e-12);
        }
    }
}
