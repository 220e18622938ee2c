//! Error types for ta-frame.
//!
//! All failures are raised synchronously at the point of detection and are
//! never retried internally. A failed call returns no partial result: either
//! the full [`crate::output::IndicatorResult`] is produced or the error below
//! is returned and the caller's data is untouched.
//!
//! Warm-up NaN values in an output are *not* errors; they are a property of
//! the output's content. [`Error::InsufficientData`] is reserved for the
//! degenerate case where every output position would be unknown.

use thiserror::Error;

/// The main error type for ta-frame operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A parameter is out of range, of the wrong type, or not recognized by
    /// the indicator it was passed to.
    ///
    /// This is a caller error and is never retried.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: String,
        /// Description of why the parameter is invalid.
        reason: String,
    },

    /// A required input column is absent from the source frame.
    ///
    /// Indicators read their inputs by the standard role names (`open`,
    /// `high`, `low`, `close`, `volume`). A missing expected column fails
    /// loudly rather than being silently defaulted.
    #[error("missing column `{column}`")]
    MissingColumn {
        /// The role name that could not be resolved.
        column: String,
    },

    /// The requested indicator name is not registered.
    #[error("unknown indicator `{name}`")]
    UnknownIndicator {
        /// The name that failed to resolve.
        name: String,
    },

    /// The call is degenerate: every output position would be unknown.
    ///
    /// Partial-unknown outputs from legitimate warm-up periods are valid
    /// results, not errors. This variant is returned only when the input is
    /// too short to produce a single known value.
    #[error("insufficient data for {indicator}: required {required} rows, got {actual}")]
    InsufficientData {
        /// The indicator that was invoked.
        indicator: &'static str,
        /// The minimum number of rows needed for one known output value.
        required: usize,
        /// The number of rows provided.
        actual: usize,
    },

    /// Two series with different lengths were combined positionally.
    ///
    /// Alignment between series is by position; the engine never reindexes.
    #[error("length mismatch: {left} vs {right}")]
    LengthMismatch {
        /// Length of the left operand.
        left: usize,
        /// Length of the right operand.
        right: usize,
    },

    /// Failed to convert a numeric value to the target element type.
    ///
    /// This occurs when `NumCast::from()` cannot represent a value (e.g. a
    /// `usize` window length) in the series element type.
    #[error("numeric conversion failed: {context}")]
    NumericConversion {
        /// Description of the conversion that failed.
        context: &'static str,
    },
}

impl Error {
    /// Shorthand for an [`Error::InvalidParameter`].
    pub(crate) fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience type alias for Results using the ta-frame [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_display() {
        let err = Error::invalid_parameter("length", "must be at least 1");
        assert_eq!(
            err.to_string(),
            "invalid parameter `length`: must be at least 1"
        );
    }

    #[test]
    fn test_missing_column_display() {
        let err = Error::MissingColumn {
            column: "volume".into(),
        };
        assert_eq!(err.to_string(), "missing column `volume`");
    }

    #[test]
    fn test_unknown_indicator_display() {
        let err = Error::UnknownIndicator {
            name: "frobnicator".into(),
        };
        assert_eq!(err.to_string(), "unknown indicator `frobnicator`");
    }

    #[test]
    fn test_insufficient_data_display() {
        let err = Error::InsufficientData {
            indicator: "sma",
            required: 20,
            actual: 10,
        };
        assert_eq!(
            err.to_string(),
            "insufficient data for sma: required 20 rows, got 10"
        );
    }

    #[test]
    fn test_length_mismatch_display() {
        let err = Error::LengthMismatch { left: 5, right: 3 };
        assert_eq!(err.to_string(), "length mismatch: 5 vs 3");
    }

    #[test]
    fn test_error_equality() {
        let a = Error::InsufficientData {
            indicator: "sma",
            required: 20,
            actual: 10,
        };
        let b = a.clone();
        assert_eq!(a, b);
        assert_ne!(
            a,
            Error::InsufficientData {
                indicator: "sma",
                required: 30,
                actual: 10,
            }
        );
    }

    #[test]
    fn test_error_is_std_error() {
        fn accepts_std_error<E: std::error::Error>(_: E) {}
        accepts_std_error(Error::NumericConversion { context: "test" });
    }
}
