//! The series abstraction: a named, ordered sequence of numeric values.
//!
//! A [`Series`] is an ordered `Vec` of element values with an attached output
//! identifier. Positions are the alignment key: binary operations combine two
//! series position by position and require equal lengths — the engine never
//! reindexes or drops positions. The unknown-value marker is NaN; it appears
//! at warm-up positions and propagates through arithmetic.
//!
//! Series are immutable once produced by a primitive: transformations return
//! fresh series rather than mutating in place.

use crate::error::{Error, Result};
use crate::traits::SeriesElement;

/// A named, ordered sequence of numeric values.
///
/// # Example
///
/// ```
/// use ta_frame::Series;
///
/// let s = Series::new("close", vec![1.0_f64, 2.0, 3.0]);
/// assert_eq!(s.name(), "close");
/// assert_eq!(s.len(), 3);
///
/// let shifted = s.shift(1);
/// assert!(shifted.values()[0].is_nan());
/// assert_eq!(shifted.values()[1], 1.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Series<T> {
    name: String,
    values: Vec<T>,
}

impl<T: SeriesElement> Series<T> {
    /// Creates a new series from a name and values.
    #[must_use]
    pub fn new(name: impl Into<String>, values: Vec<T>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Creates an all-unknown series of the given length.
    #[must_use]
    pub fn filled_nan(name: impl Into<String>, len: usize) -> Self {
        Self::new(name, vec![T::nan(); len])
    }

    /// Returns the output identifier of this series.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns a copy of this series under a different name.
    #[must_use]
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self::new(name, self.values.clone())
    }

    /// Returns the values as a slice.
    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Consumes the series, returning its values.
    #[must_use]
    pub fn into_values(self) -> Vec<T> {
        self.values
    }

    /// Returns the number of positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the series has no positions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the value at `index`, or `None` if out of bounds.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<T> {
        self.values.get(index).copied()
    }

    /// Returns the number of unknown (NaN) positions.
    #[must_use]
    pub fn nan_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_nan()).count()
    }

    /// Returns `true` if every position is unknown.
    #[must_use]
    pub fn all_nan(&self) -> bool {
        self.values.iter().all(|v| v.is_nan())
    }

    /// Shifts values forward by `periods`, filling vacated positions with NaN.
    ///
    /// `shift(2)` moves the value at position `i` to position `i + 2`; the
    /// first two positions become unknown. Length is preserved.
    #[must_use]
    pub fn shift(&self, periods: usize) -> Self {
        let n = self.values.len();
        let mut out = vec![T::nan(); n];
        for i in periods..n {
            out[i] = self.values[i - periods];
        }
        Self::new(self.name.clone(), out)
    }

    /// Positionwise difference over `periods`: `out[i] = self[i] - self[i - periods]`.
    ///
    /// The first `periods` positions are unknown.
    #[must_use]
    pub fn diff(&self, periods: usize) -> Self {
        let n = self.values.len();
        let mut out = vec![T::nan(); n];
        for i in periods..n {
            out[i] = self.values[i] - self.values[i - periods];
        }
        Self::new(self.name.clone(), out)
    }

    /// Applies `f` to every value, producing a new series with the given name.
    #[must_use]
    pub fn map(&self, name: impl Into<String>, f: impl Fn(T) -> T) -> Self {
        Self::new(name, self.values.iter().map(|&v| f(v)).collect())
    }

    /// Combines two series position by position.
    ///
    /// # Errors
    ///
    /// Returns `Error::LengthMismatch` if the operands differ in length;
    /// alignment is strictly positional.
    pub fn zip_with(
        &self,
        other: &Self,
        name: impl Into<String>,
        f: impl Fn(T, T) -> T,
    ) -> Result<Self> {
        if self.values.len() != other.values.len() {
            return Err(Error::LengthMismatch {
                left: self.values.len(),
                right: other.values.len(),
            });
        }
        let values = self
            .values
            .iter()
            .zip(&other.values)
            .map(|(&a, &b)| f(a, b))
            .collect();
        Ok(Self::new(name, values))
    }

    /// Positionwise addition. See [`Series::zip_with`] for alignment rules.
    ///
    /// # Errors
    ///
    /// Returns `Error::LengthMismatch` if the operands differ in length.
    pub fn add(&self, other: &Self, name: impl Into<String>) -> Result<Self> {
        self.zip_with(other, name, |a, b| a + b)
    }

    /// Positionwise subtraction.
    ///
    /// # Errors
    ///
    /// Returns `Error::LengthMismatch` if the operands differ in length.
    pub fn sub(&self, other: &Self, name: impl Into<String>) -> Result<Self> {
        self.zip_with(other, name, |a, b| a - b)
    }
}
