//! Core traits for ta-frame numeric operations.
//!
//! The primary trait is [`SeriesElement`], a common interface for numeric
//! operations on time-series values that abstracts over `f32` and `f64`.
//! The module also provides the shared window-length and smoothing-factor
//! validation used by every primitive.

use num_traits::{Float, NumCast};

use crate::error::{Error, Result};

/// A trait for types that can be used as elements in a data series.
///
/// Extends `num_traits::Float` with conversions used throughout the engine.
/// The unknown-value marker for a series element is `Self::nan()`; every
/// primitive writes it at positions it cannot yet compute and propagates it
/// through arithmetic.
///
/// # Example
///
/// ```
/// use ta_frame::traits::SeriesElement;
///
/// fn mean<T: SeriesElement>(data: &[T]) -> ta_frame::Result<T> {
///     let n = T::from_usize(data.len())?;
///     Ok(data.iter().fold(T::zero(), |acc, &x| acc + x) / n)
/// }
///
/// let m: f64 = mean(&[1.0, 2.0, 3.0]).unwrap();
/// assert!((m - 2.0).abs() < 1e-10);
/// ```
pub trait SeriesElement: Float + NumCast + Copy + Default + Send + Sync + 'static {
    /// Creates a series element from a `usize` value.
    ///
    /// Commonly used for converting window lengths to the element type.
    ///
    /// # Errors
    ///
    /// Returns `Error::NumericConversion` if the value cannot be represented.
    #[inline]
    fn from_usize(value: usize) -> Result<Self> {
        <Self as NumCast>::from(value).ok_or(Error::NumericConversion {
            context: "usize to series element",
        })
    }

    /// Creates a series element from an `f64` value.
    ///
    /// # Errors
    ///
    /// Returns `Error::NumericConversion` if the value cannot be represented.
    #[inline]
    fn from_f64(value: f64) -> Result<Self> {
        <Self as NumCast>::from(value).ok_or(Error::NumericConversion {
            context: "f64 to series element",
        })
    }

    /// Returns the constant 2 as this type.
    #[inline]
    #[must_use]
    fn two() -> Self {
        // 2 is always representable in Float types
        <Self as NumCast>::from(2).unwrap()
    }

    /// Returns the constant 100 as this type.
    ///
    /// Used for percentage-scaled indicators such as RSI and ROC.
    #[inline]
    #[must_use]
    fn hundred() -> Self {
        // 100 is always representable in Float types
        <Self as NumCast>::from(100).unwrap()
    }
}

impl<T: Float + NumCast + Copy + Default + Send + Sync + 'static> SeriesElement for T {}

/// Validates a rolling window length.
///
/// A zero window is a caller error; a window longer than the data is *not*
/// (primitives produce an all-unknown output in that case).
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is zero.
#[inline]
pub fn validate_length(length: usize) -> Result<()> {
    if length == 0 {
        Err(Error::invalid_parameter("length", "must be at least 1"))
    } else {
        Ok(())
    }
}

/// Validates an exponential smoothing factor.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` unless `0 < alpha <= 1`.
#[inline]
pub fn validate_alpha(alpha: f64) -> Result<()> {
    if alpha > 0.0 && alpha <= 1.0 {
        Ok(())
    } else {
        Err(Error::invalid_parameter(
            "alpha",
            format!("must be in (0, 1], got {alpha}"),
        ))
    }
}

/// Validates that a builder call can produce at least one known output value.
///
/// This is the degenerate-call check applied by indicator builders after
/// their window parameters are known: an input shorter than `required` rows
/// would produce an all-unknown output, which is an error rather than a
/// result.
///
/// # Errors
///
/// Returns `Error::InsufficientData` if `actual < required`.
#[inline]
pub fn validate_rows(indicator: &'static str, required: usize, actual: usize) -> Result<()> {
    if actual < required {
        Err(Error::InsufficientData {
            indicator,
            required,
            actual,
        })
    } else {
        Ok(())
    }
}
