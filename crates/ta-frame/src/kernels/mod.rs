//! Window primitives: rolling reducers and recursive smoothers.
//!
//! Every kernel maps an input slice to an output `Vec` of the same length.
//! The uniform warm-up policy: a rolling reducer with window `n` writes NaN
//! at positions `[0, n-2]` and, for `i >= n-1`, the reducer applied to the
//! trailing window `[i-n+1, i]`. A window longer than the input produces an
//! all-NaN output — that is a valid (degenerate) result at this layer, not an
//! error; indicator builders decide whether an all-unknown result is worth
//! raising.
//!
//! A window containing NaN yields NaN at that position; known values are
//! never silently substituted for unknowns.

pub mod extrema;
pub mod rolling;
pub mod smoothing;

pub use extrema::{rolling_max, rolling_min};
pub use rolling::{
    rolling_mad, rolling_mean, rolling_median, rolling_quantile, rolling_stdev, rolling_sum,
    rolling_variance,
};
pub use smoothing::{ema, ewm, rma, wma};
