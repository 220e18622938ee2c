//! The frame-level analysis accessor.
//!
//! [`Frame::ta`] borrows a frame and exposes indicator invocation as methods,
//! so pipelines that enrich a frame column by column read linearly:
//!
//! ```
//! use ta_frame::{Frame, Series};
//!
//! let mut frame = Frame::new();
//! frame
//!     .push(Series::new("close", (1..=40).map(f64::from).collect()))
//!     .unwrap();
//!
//! frame.ta().sma(10).unwrap();
//! frame.ta().rsi(14).unwrap();
//! assert!(frame.contains("SMA_10"));
//! assert!(frame.contains("RSI_14"));
//! ```
//!
//! Convenience methods append their outputs (upsert by identifier); use
//! [`Ta::compute`] for a result without touching the frame.

use crate::error::Result;
use crate::frame::Frame;
use crate::output::IndicatorResult;
use crate::registry::{compute, compute_append, Params};

/// A short-lived accessor borrowing a frame for indicator invocation.
pub struct Ta<'a> {
    frame: &'a mut Frame<f64>,
}

impl Frame<f64> {
    /// Returns the analysis accessor over this frame.
    pub fn ta(&mut self) -> Ta<'_> {
        Ta { frame: self }
    }
}

impl Ta<'_> {
    /// Computes the named indicator without modifying the frame.
    ///
    /// # Errors
    ///
    /// Same conditions as [`compute`].
    pub fn compute(&self, name: &str, params: &Params) -> Result<IndicatorResult<f64>> {
        compute(name, self.frame, params)
    }

    /// Computes the named indicator and upserts its outputs into the frame.
    ///
    /// # Errors
    ///
    /// Same conditions as [`compute`]; the frame is untouched on error.
    pub fn append(&mut self, name: &str, params: &Params) -> Result<IndicatorResult<f64>> {
        compute_append(name, self.frame, params)
    }

    /// Appends a simple moving average of the close.
    ///
    /// # Errors
    ///
    /// Same conditions as [`compute`].
    pub fn sma(&mut self, length: usize) -> Result<IndicatorResult<f64>> {
        self.append("sma", &Params::new().with("length", length))
    }

    /// Appends an exponential moving average of the close.
    ///
    /// # Errors
    ///
    /// Same conditions as [`compute`].
    pub fn ema(&mut self, length: usize) -> Result<IndicatorResult<f64>> {
        self.append("ema", &Params::new().with("length", length))
    }

    /// Appends the relative strength index of the close.
    ///
    /// # Errors
    ///
    /// Same conditions as [`compute`].
    pub fn rsi(&mut self, length: usize) -> Result<IndicatorResult<f64>> {
        self.append("rsi", &Params::new().with("length", length))
    }

    /// Appends the three MACD lines.
    ///
    /// # Errors
    ///
    /// Same conditions as [`compute`].
    pub fn macd(&mut self, fast: usize, slow: usize, signal: usize) -> Result<IndicatorResult<f64>> {
        self.append(
            "macd",
            &Params::new()
                .with("fast", fast)
                .with("slow", slow)
                .with("signal", signal),
        )
    }

    /// Appends the three Bollinger bands.
    ///
    /// # Errors
    ///
    /// Same conditions as [`compute`].
    pub fn bbands(&mut self, length: usize, std: f64) -> Result<IndicatorResult<f64>> {
        self.append(
            "bbands",
            &Params::new().with("length", length).with("std", std),
        )
    }

    /// Appends the average true range.
    ///
    /// # Errors
    ///
    /// Same conditions as [`compute`].
    pub fn atr(&mut self, length: usize) -> Result<IndicatorResult<f64>> {
        self.append("atr", &Params::new().with("length", length))
    }

    /// Appends the log return of the close.
    ///
    /// # Errors
    ///
    /// Same conditions as [`compute`].
    pub fn log_return(&mut self, length: usize, cumulative: bool) -> Result<IndicatorResult<f64>> {
        self.append(
            "log_return",
            &Params::new()
                .with("length", length)
                .with("cumulative", cumulative),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::indicators::test_support::ohlcv_frame;

    #[test]
    fn test_accessor_appends_columns() {
        let mut frame = ohlcv_frame(80);
        let before = frame.num_columns();
        frame.ta().sma(10).unwrap();
        frame.ta().macd(12, 26, 9).unwrap();
        assert_eq!(frame.num_columns(), before + 4);
        assert!(frame.contains("SMA_10"));
        assert!(frame.contains("MACD_12_26_9"));
        assert!(frame.contains("MACDh_12_26_9"));
        assert!(frame.contains("MACDs_12_26_9"));
    }

    #[test]
    fn test_accessor_compute_leaves_frame_alone() {
        let mut frame = ohlcv_frame(40);
        let before = frame.num_columns();
        let result = frame
            .ta()
            .compute("sma", &Params::new().with("length", 5))
            .unwrap();
        assert_eq!(result.name(), "SMA_5");
        assert_eq!(frame.num_columns(), before);
    }

    #[test]
    fn test_accessor_repeat_append_idempotent() {
        let mut frame = ohlcv_frame(40);
        frame.ta().bbands(5, 2.0).unwrap();
        let count = frame.num_columns();
        frame.ta().bbands(5, 2.0).unwrap();
        assert_eq!(frame.num_columns(), count);
    }

    #[test]
    fn test_accessor_error_passthrough() {
        let mut frame = ohlcv_frame(40);
        let result = frame.ta().append("nonexistent", &Params::new());
        assert!(matches!(result, Err(Error::UnknownIndicator { .. })));
    }
}
