//! The naming and output contract.
//!
//! Every output column identifier is derived deterministically from the
//! indicator's canonical (uppercase) name, a role token for multi-output
//! indicators, and the resolved parameter values in their declared order:
//! `<NAME>_<p1>_<p2>_..._<pk>`. Only parameters that affect numeric output
//! participate; display-only flags never appear. Identical invocations always
//! produce identical identifiers, and no two distinct (indicator, parameters,
//! role) triples collide.
//!
//! Integers print verbatim; floats keep one decimal when integral
//! (`BBU_5_2.0`) and their shortest form otherwise (`QTL_30_0.25`).

use std::fmt;

use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::series::Series;
use crate::traits::SeriesElement;

/// A parameter value: integer, float, or boolean.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    /// An integer parameter (window lengths, pole counts).
    Int(i64),
    /// A floating-point parameter (multipliers, quantiles).
    Float(f64),
    /// A boolean flag (`cumulative`, ...).
    Bool(bool),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) if v.fract() == 0.0 && v.is_finite() => write!(f, "{v:.1}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<usize> for ParamValue {
    fn from(v: usize) -> Self {
        // Window lengths far exceed any practical i64 bound before this lossy
        // cast could matter.
        Self::Int(v as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

/// Parameter values after defaults were applied and validation passed,
/// in the indicator's declared parameter order.
///
/// Builders read their inputs from here with the typed getters; the naming
/// layer iterates the identifier-relevant subset in order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedParams {
    items: Vec<ResolvedParam>,
}

#[derive(Debug, Clone, PartialEq)]
struct ResolvedParam {
    name: &'static str,
    value: ParamValue,
    affects_output: bool,
}

impl ResolvedParams {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, name: &'static str, value: ParamValue, affects_output: bool) {
        self.items.push(ResolvedParam {
            name,
            value,
            affects_output,
        });
    }

    /// Returns the resolved value of the named parameter, if declared.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<ParamValue> {
        self.items
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value)
    }

    /// Returns the named parameter as a window length.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` if the parameter is not declared or
    /// is not a non-negative integer.
    pub fn get_usize(&self, name: &str) -> Result<usize> {
        match self.get(name) {
            Some(ParamValue::Int(v)) if v >= 0 => Ok(v as usize),
            Some(other) => Err(Error::invalid_parameter(
                name,
                format!("expected a non-negative integer, got {other}"),
            )),
            None => Err(Error::invalid_parameter(name, "not declared")),
        }
    }

    /// Returns the named parameter as a float (integers promote).
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` if the parameter is not declared or
    /// is a boolean.
    pub fn get_f64(&self, name: &str) -> Result<f64> {
        match self.get(name) {
            Some(ParamValue::Float(v)) => Ok(v),
            Some(ParamValue::Int(v)) => Ok(v as f64),
            Some(other) => Err(Error::invalid_parameter(
                name,
                format!("expected a number, got {other}"),
            )),
            None => Err(Error::invalid_parameter(name, "not declared")),
        }
    }

    /// Returns the named parameter as a boolean flag.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` if the parameter is not declared or
    /// is not a boolean.
    pub fn get_bool(&self, name: &str) -> Result<bool> {
        match self.get(name) {
            Some(ParamValue::Bool(v)) => Ok(v),
            Some(other) => Err(Error::invalid_parameter(
                name,
                format!("expected a boolean, got {other}"),
            )),
            None => Err(Error::invalid_parameter(name, "not declared")),
        }
    }

    /// Iterates `(name, value)` pairs in declared order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, ParamValue)> + '_ {
        self.items.iter().map(|p| (p.name, p.value))
    }

    fn identifier_values(&self) -> impl Iterator<Item = ParamValue> + '_ {
        self.items
            .iter()
            .filter(|p| p.affects_output)
            .map(|p| p.value)
    }
}

/// Builds an output identifier from a base token and the identifier-relevant
/// parameters in declared order.
///
/// The base is the indicator's canonical uppercase name, or a role token for
/// one line of a multi-output indicator (`MACDh`, `BBL`). Parameter values
/// are underscore-joined after the base.
///
/// # Example
///
/// ```
/// # use ta_frame::{compute, Frame, Params, Series};
/// let mut frame = Frame::new();
/// frame.push(Series::new("close", (1..=30).map(f64::from).collect())).unwrap();
/// let result = compute("sma", &frame, &Params::new().with("length", 5)).unwrap();
/// assert_eq!(result.name(), "SMA_5");
/// ```
#[must_use]
pub fn column_name(base: &str, params: &ResolvedParams) -> String {
    let mut name = String::from(base);
    for value in params.identifier_values() {
        name.push('_');
        name.push_str(&value.to_string());
    }
    name
}

/// The result of one indicator invocation: a single named series, or an
/// ordered set of named series sharing the same index.
#[derive(Debug, Clone)]
pub enum IndicatorResult<T> {
    /// A single-line indicator output.
    Single(Series<T>),
    /// A multi-line indicator output with a result-level name.
    Multi {
        /// The result-level identifier (e.g. `MACD_12_26_9`).
        name: String,
        /// The output lines in their canonical order.
        frame: Frame<T>,
    },
}

impl<T: SeriesElement> IndicatorResult<T> {
    /// Returns the result-level identifier.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Single(series) => series.name(),
            Self::Multi { name, .. } => name,
        }
    }

    /// Returns the output series in their canonical order.
    #[must_use]
    pub fn columns(&self) -> Vec<&Series<T>> {
        match self {
            Self::Single(series) => vec![series],
            Self::Multi { frame, .. } => frame.iter().collect(),
        }
    }

    /// Returns the number of output lines.
    #[must_use]
    pub fn num_outputs(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Multi { frame, .. } => frame.num_columns(),
        }
    }

    /// Returns the number of rows, shared by every output line.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        match self {
            Self::Single(series) => series.len(),
            Self::Multi { frame, .. } => frame.num_rows(),
        }
    }

    /// Returns the single output series, if this is a single-line result.
    #[must_use]
    pub fn as_single(&self) -> Option<&Series<T>> {
        match self {
            Self::Single(series) => Some(series),
            Self::Multi { .. } => None,
        }
    }

    /// Returns the named output line, if present.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Series<T>> {
        match self {
            Self::Single(series) => (series.name() == name).then_some(series),
            Self::Multi { frame, .. } => frame.column(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(items: &[(&'static str, ParamValue, bool)]) -> ResolvedParams {
        let mut p = ResolvedParams::with_capacity(items.len());
        for &(name, value, affects) in items {
            p.push(name, value, affects);
        }
        p
    }

    #[test]
    fn test_param_value_display_int() {
        assert_eq!(ParamValue::Int(14).to_string(), "14");
    }

    #[test]
    fn test_param_value_display_integral_float() {
        assert_eq!(ParamValue::Float(2.0).to_string(), "2.0");
    }

    #[test]
    fn test_param_value_display_fractional_float() {
        assert_eq!(ParamValue::Float(2.5).to_string(), "2.5");
        assert_eq!(ParamValue::Float(0.25).to_string(), "0.25");
    }

    #[test]
    fn test_param_value_display_bool() {
        assert_eq!(ParamValue::Bool(true).to_string(), "true");
    }

    #[test]
    fn test_column_name_single_param() {
        let p = params(&[("length", ParamValue::Int(10), true)]);
        assert_eq!(column_name("SMA", &p), "SMA_10");
    }

    #[test]
    fn test_column_name_multiple_params_in_order() {
        let p = params(&[
            ("fast", ParamValue::Int(12), true),
            ("slow", ParamValue::Int(26), true),
            ("signal", ParamValue::Int(9), true),
        ]);
        assert_eq!(column_name("MACD", &p), "MACD_12_26_9");
        assert_eq!(column_name("MACDh", &p), "MACDh_12_26_9");
    }

    #[test]
    fn test_column_name_skips_display_only_flags() {
        let p = params(&[
            ("length", ParamValue::Int(5), true),
            ("cumulative", ParamValue::Bool(true), false),
        ]);
        assert_eq!(column_name("LOGRET", &p), "LOGRET_5");
    }

    #[test]
    fn test_column_name_no_params() {
        let p = params(&[]);
        assert_eq!(column_name("OBV", &p), "OBV");
    }

    #[test]
    fn test_column_name_float_formatting() {
        let p = params(&[
            ("length", ParamValue::Int(5), true),
            ("std", ParamValue::Float(2.0), true),
        ]);
        assert_eq!(column_name("BBU", &p), "BBU_5_2.0");
    }

    #[test]
    fn test_naming_injective_across_params() {
        let a = params(&[("length", ParamValue::Int(5), true)]);
        let b = params(&[("length", ParamValue::Int(50), true)]);
        assert_ne!(column_name("SMA", &a), column_name("SMA", &b));
    }

    #[test]
    fn test_resolved_params_typed_getters() {
        let p = params(&[
            ("length", ParamValue::Int(14), true),
            ("std", ParamValue::Float(2.0), true),
            ("cumulative", ParamValue::Bool(false), false),
        ]);
        assert_eq!(p.get_usize("length").unwrap(), 14);
        assert!((p.get_f64("std").unwrap() - 2.0).abs() < 1e-12);
        assert!((p.get_f64("length").unwrap() - 14.0).abs() < 1e-12); // promote
        assert!(!p.get_bool("cumulative").unwrap());
        assert!(p.get_usize("missing").is_err());
        assert!(p.get_bool("std").is_err());
    }

    #[test]
    fn test_indicator_result_single() {
        let r: IndicatorResult<f64> =
            IndicatorResult::Single(Series::new("SMA_5", vec![1.0, 2.0]));
        assert_eq!(r.name(), "SMA_5");
        assert_eq!(r.num_outputs(), 1);
        assert_eq!(r.num_rows(), 2);
        assert!(r.as_single().is_some());
        assert!(r.column("SMA_5").is_some());
        assert!(r.column("other").is_none());
    }

    #[test]
    fn test_indicator_result_multi() {
        let mut frame = Frame::new();
        frame.push(Series::new("BBL_5_2.0", vec![1.0_f64])).unwrap();
        frame.push(Series::new("BBM_5_2.0", vec![2.0_f64])).unwrap();
        frame.push(Series::new("BBU_5_2.0", vec![3.0_f64])).unwrap();
        let r = IndicatorResult::Multi {
            name: "BBANDS_5_2.0".to_owned(),
            frame,
        };
        assert_eq!(r.name(), "BBANDS_5_2.0");
        assert_eq!(r.num_outputs(), 3);
        assert!(r.as_single().is_none());
        let names: Vec<&str> = r.columns().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["BBL_5_2.0", "BBM_5_2.0", "BBU_5_2.0"]);
    }
}
