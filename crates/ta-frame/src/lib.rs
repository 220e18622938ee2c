//! ta-frame: a technical-analysis indicator engine over ordered series.
//!
//! The crate computes indicator columns over position-aligned financial time
//! series. It layers reusable numeric primitives (rolling windows, recursive
//! smoothing) under dozens of composite indicators, all sharing one
//! input/output contract: same-length outputs, NaN as the explicit unknown
//! marker for warm-up positions, and deterministic column identifiers derived
//! from the indicator name and its parameters.
//!
//! # Quick Start
//!
//! ```
//! use ta_frame::prelude::*;
//!
//! let mut frame = Frame::new();
//! frame
//!     .push(Series::new("close", (1..=30).map(f64::from).collect()))
//!     .unwrap();
//!
//! // String-driven dispatch with schema-validated parameters.
//! let result = compute("sma", &frame, &Params::new().with("length", 5)).unwrap();
//! assert_eq!(result.name(), "SMA_5");
//!
//! // Append mode upserts the output columns into the frame.
//! compute_append("rsi", &mut frame, &Params::new()).unwrap();
//! assert!(frame.contains("RSI_14"));
//! ```
//!
//! Typed indicator functions in [`indicators`] skip the string layer and work
//! on plain slices, generic over `f32`/`f64` via
//! [`SeriesElement`](traits::SeriesElement):
//!
//! ```
//! use ta_frame::indicators::overlap::sma;
//!
//! let out = sma(&[1.0_f64, 2.0, 3.0, 4.0, 5.0], 3).unwrap();
//! assert!(out[1].is_nan()); // warm-up
//! assert!((out[4] - 4.0).abs() < 1e-10);
//! ```
//!
//! # Layers
//!
//! - [`series`] / [`frame`] - named value sequences and the column store
//! - [`kernels`] - rolling reducers and recursive smoothers
//! - [`indicators`] - composite builders by category
//! - [`output`] - the naming and multi-output contract
//! - [`registry`] - name-keyed dispatch, schemas, `compute`/`compute_append`
//! - [`analysis`] - the `frame.ta()` accessor
//!
//! # Unknown Values
//!
//! NaN means "not yet known", not "error": every indicator writes NaN over
//! its warm-up span and propagates unknowns through arithmetic instead of
//! substituting values. Errors are reserved for caller mistakes (bad
//! parameters, missing columns, unknown names) and for degenerate calls that
//! could not produce a single known output.

#![deny(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::perf)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::many_single_char_names)]

pub mod analysis;
pub mod error;
pub mod frame;
pub mod indicators;
pub mod kernels;
pub mod output;
pub mod prelude;
pub mod registry;
pub mod series;
pub mod traits;
pub mod utils;

pub use error::{Error, Result};
pub use frame::{Frame, TabularSource};
pub use output::{IndicatorResult, ParamValue};
pub use registry::{
    compute, compute_append, describe, list_indicators, registry, Category, IndicatorSpec, Params,
};
pub use series::Series;
pub use traits::SeriesElement;
