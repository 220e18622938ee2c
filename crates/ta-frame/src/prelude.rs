//! Commonly used imports for working with ta-frame.
//!
//! # Example
//!
//! ```
//! use ta_frame::prelude::*;
//!
//! let mut frame = Frame::new();
//! frame
//!     .push(Series::new("close", (1..=30).map(f64::from).collect()))
//!     .unwrap();
//! let result = compute("sma", &frame, &Params::new().with("length", 5)).unwrap();
//! assert_eq!(result.name(), "SMA_5");
//! ```

pub use crate::error::{Error, Result};
pub use crate::frame::{Frame, TabularSource};
pub use crate::output::{IndicatorResult, ParamValue};
pub use crate::registry::{
    compute, compute_append, describe, list_indicators, registry, Category, Params,
};
pub use crate::series::Series;
pub use crate::traits::SeriesElement;
