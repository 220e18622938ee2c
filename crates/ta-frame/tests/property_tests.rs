//! Property-based tests over randomly generated series.
//!
//! These pin the engine's structural invariants — length preservation,
//! warm-up NaN spans, band ordering, naming determinism, append idempotence —
//! for arbitrary valid inputs rather than hand-picked fixtures.

mod common;

use proptest::prelude::*;

use ta_frame::indicators::momentum::rsi;
use ta_frame::indicators::overlap::sma;
use ta_frame::indicators::volatility::bbands;
use ta_frame::kernels::{ewm, rolling_max, rolling_min};
use ta_frame::prelude::*;

fn arb_price_series(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0..1000.0_f64, min_len..=max_len)
}

proptest! {
    #[test]
    fn prop_sma_length_and_warm_up(data in arb_price_series(12, 120), length in 1usize..=10) {
        let out = sma(&data, length).unwrap();
        prop_assert_eq!(out.len(), data.len());
        prop_assert_eq!(out.iter().take_while(|v| v.is_nan()).count(), length - 1);
        prop_assert!(out[length - 1..].iter().all(|v| !v.is_nan()));
    }

    #[test]
    fn prop_sma_within_window_bounds(data in arb_price_series(12, 120), length in 1usize..=10) {
        let out = sma(&data, length).unwrap();
        for i in (length - 1)..data.len() {
            let window = &data[i + 1 - length..=i];
            let lo = window.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(out[i] >= lo - 1e-9 && out[i] <= hi + 1e-9);
        }
    }

    #[test]
    fn prop_rolling_extrema_ordering(data in arb_price_series(12, 120), length in 1usize..=10) {
        let max = rolling_max(&data, length).unwrap();
        let min = rolling_min(&data, length).unwrap();
        for i in (length - 1)..data.len() {
            prop_assert!(min[i] <= max[i]);
            prop_assert!(min[i] <= data[i] && data[i] <= max[i]);
        }
    }

    #[test]
    fn prop_ewm_convex_bounds(data in arb_price_series(2, 120), alpha in 0.01..=1.0_f64) {
        let out = ewm(&data, alpha).unwrap();
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for (i, &x) in data.iter().enumerate() {
            lo = lo.min(x);
            hi = hi.max(x);
            prop_assert!(out[i] >= lo - 1e-9 && out[i] <= hi + 1e-9);
        }
    }

    #[test]
    fn prop_rsi_bounded(data in arb_price_series(20, 120), length in 2usize..=14) {
        let out = rsi(&data, length).unwrap();
        for v in out.iter().filter(|v| !v.is_nan()) {
            prop_assert!(*v >= -1e-9 && *v <= 100.0 + 1e-9);
        }
    }

    #[test]
    fn prop_bbands_ordering(data in arb_price_series(25, 120), length in 2usize..=20, std in 0.0..=4.0_f64) {
        let out = bbands(&data, length, std).unwrap();
        for i in (length - 1)..data.len() {
            prop_assert!(out.lower[i] <= out.middle[i] + 1e-9);
            prop_assert!(out.middle[i] <= out.upper[i] + 1e-9);
        }
    }

    #[test]
    fn prop_naming_deterministic(length in 1usize..=30, seed in 0u64..1000) {
        let frame = common::ohlcv_frame(60, seed);
        let params = Params::new().with("length", length);
        let a = compute("sma", &frame, &params).unwrap();
        let b = compute("sma", &frame, &params).unwrap();
        prop_assert_eq!(a.name(), b.name());
        prop_assert_eq!(a.name(), format!("SMA_{length}"));
    }

    #[test]
    fn prop_append_idempotent(length in 2usize..=20, seed in 0u64..1000) {
        let mut frame = common::ohlcv_frame(60, seed);
        let params = Params::new().with("length", length);
        compute_append("ema", &mut frame, &params).unwrap();
        let columns = frame.num_columns();
        let name = format!("EMA_{length}");
        let first: Vec<f64> = frame.column_values(&name).unwrap().to_vec();
        compute_append("ema", &mut frame, &params).unwrap();
        prop_assert_eq!(frame.num_columns(), columns);
        prop_assert_eq!(frame.column_values(&name).unwrap(), first.as_slice());
    }

    #[test]
    fn prop_compute_never_mutates_input(seed in 0u64..1000) {
        let frame = common::ohlcv_frame(80, seed);
        let closes_before: Vec<f64> = frame.column_values("close").unwrap().to_vec();
        let _ = compute("macd", &frame, &Params::new()).unwrap();
        prop_assert_eq!(frame.column_values("close").unwrap(), closes_before.as_slice());
    }
}
