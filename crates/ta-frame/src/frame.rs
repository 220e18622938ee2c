//! The engine-owned column store and the tabular input contract.
//!
//! A [`Frame`] is an ordered set of named [`Series`] sharing one positional
//! index. It is both the multi-column result shape for indicators that emit
//! several lines and the container that `append` mode upserts into: writing
//! a column whose identifier already exists overwrites it in place, never
//! duplicates it.
//!
//! [`TabularSource`] is the contract an input container must satisfy: named,
//! position-aligned numeric columns readable by the standard role names
//! (`open`, `high`, `low`, `close`, `volume`). A missing expected column is a
//! [`Error::MissingColumn`] failure, never a silent default.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::series::Series;
use crate::traits::SeriesElement;

/// An ordered, column-addressable container of equal-length series.
///
/// Column order is insertion order and is preserved by upserts that replace
/// an existing column.
///
/// # Example
///
/// ```
/// use ta_frame::{Frame, Series};
///
/// let mut frame = Frame::new();
/// frame.push(Series::new("close", vec![1.0_f64, 2.0, 3.0])).unwrap();
/// assert_eq!(frame.num_rows(), 3);
/// assert_eq!(frame.num_columns(), 1);
///
/// // Upsert by identifier: same name overwrites, count unchanged.
/// frame.upsert(Series::new("close", vec![4.0, 5.0, 6.0])).unwrap();
/// assert_eq!(frame.num_columns(), 1);
/// assert_eq!(frame.column("close").unwrap().values()[0], 4.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Frame<T> {
    columns: Vec<Series<T>>,
    index: HashMap<String, usize>,
}

impl<T: SeriesElement> Frame<T> {
    /// Creates an empty frame.
    #[must_use]
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Creates a frame with pre-allocated column capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            columns: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Returns the number of rows (positions) shared by every column.
    ///
    /// An empty frame has zero rows.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, Series::len)
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if the frame has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns `true` if a column with the given name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Returns the column with the given name, if present.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Series<T>> {
        self.index.get(name).map(|&i| &self.columns[i])
    }

    /// Returns the values of the named column as a slice, if present.
    #[must_use]
    pub fn column_values(&self, name: &str) -> Option<&[T]> {
        self.column(name).map(Series::values)
    }

    /// Returns the column names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(Series::name)
    }

    /// Returns the columns in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Series<T>> {
        self.columns.iter()
    }

    /// Appends a new column.
    ///
    /// # Errors
    ///
    /// Returns `Error::LengthMismatch` if the series length differs from the
    /// frame's row count, or `Error::InvalidParameter` if a column with the
    /// same name already exists (use [`Frame::upsert`] to overwrite).
    pub fn push(&mut self, series: Series<T>) -> Result<()> {
        if self.contains(series.name()) {
            return Err(Error::invalid_parameter(
                series.name().to_owned(),
                "column already exists",
            ));
        }
        self.check_len(&series)?;
        self.index.insert(series.name().to_owned(), self.columns.len());
        self.columns.push(series);
        Ok(())
    }

    /// Inserts a column, overwriting any existing column with the same name.
    ///
    /// Overwriting keeps the original column position, so repeated upserts of
    /// the same identifier are idempotent with respect to both content and
    /// column order.
    ///
    /// # Errors
    ///
    /// Returns `Error::LengthMismatch` if the series length differs from the
    /// frame's row count.
    pub fn upsert(&mut self, series: Series<T>) -> Result<()> {
        self.check_len(&series)?;
        if let Some(&i) = self.index.get(series.name()) {
            self.columns[i] = series;
        } else {
            self.index.insert(series.name().to_owned(), self.columns.len());
            self.columns.push(series);
        }
        Ok(())
    }

    fn check_len(&self, series: &Series<T>) -> Result<()> {
        if !self.columns.is_empty() && series.len() != self.num_rows() {
            return Err(Error::LengthMismatch {
                left: self.num_rows(),
                right: series.len(),
            });
        }
        Ok(())
    }
}

impl<T: SeriesElement> FromIterator<Series<T>> for Frame<T> {
    /// Collects series into a frame, overwriting duplicates by name.
    ///
    /// # Panics
    ///
    /// Panics if the series lengths are inconsistent; use [`Frame::upsert`]
    /// directly when lengths are not known to match.
    fn from_iter<I: IntoIterator<Item = Series<T>>>(iter: I) -> Self {
        let mut frame = Self::new();
        for series in iter {
            frame
                .upsert(series)
                .expect("FromIterator requires equal-length series");
        }
        frame
    }
}

/// The input contract for indicator computation.
///
/// Any ordered, column-addressable container can feed the engine by exposing
/// named, position-aligned numeric columns. The provided role accessors fail
/// with [`Error::MissingColumn`] when the expected column is absent.
pub trait TabularSource<T: SeriesElement> {
    /// Returns the values of the named column, if present.
    fn source_column(&self, name: &str) -> Option<&[T]>;

    /// Returns the number of rows.
    fn source_rows(&self) -> usize;

    /// Returns the named column or a `MissingColumn` error.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingColumn` if the column is absent.
    fn required_column(&self, name: &str) -> Result<&[T]> {
        self.source_column(name).ok_or_else(|| Error::MissingColumn {
            column: name.to_owned(),
        })
    }

    /// The `open` role column.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingColumn` if absent.
    fn open(&self) -> Result<&[T]> {
        self.required_column("open")
    }

    /// The `high` role column.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingColumn` if absent.
    fn high(&self) -> Result<&[T]> {
        self.required_column("high")
    }

    /// The `low` role column.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingColumn` if absent.
    fn low(&self) -> Result<&[T]> {
        self.required_column("low")
    }

    /// The `close` role column.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingColumn` if absent.
    fn close(&self) -> Result<&[T]> {
        self.required_column("close")
    }

    /// The `volume` role column.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingColumn` if absent.
    fn volume(&self) -> Result<&[T]> {
        self.required_column("volume")
    }
}

impl<T: SeriesElement> TabularSource<T> for Frame<T> {
    fn source_column(&self, name: &str) -> Option<&[T]> {
        self.column_values(name)
    }

    fn source_rows(&self) -> usize {
        self.num_rows()
    }
}
