//! The indicator registry: name-keyed dispatch, parameter schemas, and the
//! string-driven `compute` / `compute_append` entry points.
//!
//! Each registered indicator carries a static parameter schema. A call
//! resolves user-supplied [`Params`] against that schema (defaults applied,
//! types and ranges checked, unrecognized names rejected) before the builder
//! runs, so builders only ever see validated [`ResolvedParams`].
//!
//! Dispatch is over `f64` frames; the typed indicator functions in
//! [`crate::indicators`] remain generic over any [`crate::SeriesElement`] for
//! callers who bypass the string layer.

use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::indicators;
use crate::output::{IndicatorResult, ParamValue, ResolvedParams};

/// The category an indicator belongs to, mirroring the module layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    /// Price-following overlays (moving averages, typical prices).
    Overlap,
    /// Rate-of-change style oscillators.
    Momentum,
    /// Return measures.
    Performance,
    /// Rolling statistical moments and ranks.
    Statistics,
    /// Directional and detrending tools.
    Trend,
    /// Range- and deviation-based band indicators.
    Volatility,
    /// Volume-weighted flow measures.
    Volume,
}

impl Category {
    /// Returns the lowercase category name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Overlap => "overlap",
            Self::Momentum => "momentum",
            Self::Performance => "performance",
            Self::Statistics => "statistics",
            Self::Trend => "trend",
            Self::Volatility => "volatility",
            Self::Volume => "volume",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The declared type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Integer-valued (window lengths, pole counts).
    Int,
    /// Float-valued (multipliers, quantiles); integers promote.
    Float,
    /// Boolean flag.
    Bool,
}

/// One entry in an indicator's parameter schema.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    name: &'static str,
    kind: ParamKind,
    default: ParamValue,
    min: Option<f64>,
    max: Option<f64>,
    affects_output: bool,
    help: &'static str,
}

impl ParamSpec {
    /// A window-length parameter: integer, at least 1.
    pub(crate) const fn length(name: &'static str, default: i64, help: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::Int,
            default: ParamValue::Int(default),
            min: Some(1.0),
            max: None,
            affects_output: true,
            help,
        }
    }

    /// A bounded integer parameter.
    pub(crate) const fn int(
        name: &'static str,
        default: i64,
        min: i64,
        max: i64,
        help: &'static str,
    ) -> Self {
        Self {
            name,
            kind: ParamKind::Int,
            default: ParamValue::Int(default),
            min: Some(min as f64),
            max: Some(max as f64),
            affects_output: true,
            help,
        }
    }

    /// A bounded float parameter.
    pub(crate) const fn float(
        name: &'static str,
        default: f64,
        min: f64,
        max: f64,
        help: &'static str,
    ) -> Self {
        Self {
            name,
            kind: ParamKind::Float,
            default: ParamValue::Float(default),
            min: Some(min),
            max: Some(max),
            affects_output: true,
            help,
        }
    }

    /// A boolean flag; flags never participate in output naming.
    pub(crate) const fn flag(name: &'static str, default: bool, help: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::Bool,
            default: ParamValue::Bool(default),
            min: None,
            max: None,
            affects_output: false,
            help,
        }
    }

    /// The parameter name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The declared type.
    #[must_use]
    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    /// The default value, used when the caller omits the parameter.
    #[must_use]
    pub fn default(&self) -> ParamValue {
        self.default
    }

    /// Whether this parameter participates in output identifiers.
    #[must_use]
    pub fn affects_output(&self) -> bool {
        self.affects_output
    }

    /// A one-line description.
    #[must_use]
    pub fn help(&self) -> &'static str {
        self.help
    }

    fn check_range(&self, numeric: f64) -> Result<()> {
        if let Some(min) = self.min {
            if numeric < min {
                return Err(Error::invalid_parameter(
                    self.name,
                    format!("must be at least {min}, got {numeric}"),
                ));
            }
        }
        if let Some(max) = self.max {
            if numeric > max {
                return Err(Error::invalid_parameter(
                    self.name,
                    format!("must be at most {max}, got {numeric}"),
                ));
            }
        }
        Ok(())
    }

    fn validate(&self, value: ParamValue) -> Result<ParamValue> {
        match (self.kind, value) {
            (ParamKind::Int, ParamValue::Int(v)) => {
                self.check_range(v as f64)?;
                Ok(ParamValue::Int(v))
            }
            (ParamKind::Float, ParamValue::Float(v)) => {
                if v.is_nan() {
                    return Err(Error::invalid_parameter(self.name, "must not be NaN"));
                }
                self.check_range(v)?;
                Ok(ParamValue::Float(v))
            }
            (ParamKind::Float, ParamValue::Int(v)) => {
                // Integer literals are accepted wherever a float is declared.
                let promoted = v as f64;
                self.check_range(promoted)?;
                Ok(ParamValue::Float(promoted))
            }
            (ParamKind::Bool, ParamValue::Bool(v)) => Ok(ParamValue::Bool(v)),
            (kind, other) => Err(Error::invalid_parameter(
                self.name,
                format!("expected {kind:?}, got {other}"),
            )),
        }
    }
}

/// User-supplied parameter overrides for one indicator invocation.
///
/// Unspecified parameters take their schema defaults; names outside the
/// schema are rejected at resolution time.
///
/// # Example
///
/// ```
/// use ta_frame::Params;
///
/// let params = Params::new().with("length", 20).with("std", 2.5);
/// assert_eq!(params.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    values: BTreeMap<String, ParamValue>,
}

impl Params {
    /// Creates an empty parameter set (all defaults).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, consuming and returning `self` for chaining.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Adds a parameter in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> &mut Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Returns the override for `name`, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<ParamValue> {
        self.values.get(name).copied()
    }

    /// The number of overrides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no overrides were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

pub(crate) type IndicatorFn = fn(&Frame<f64>, &ResolvedParams) -> Result<IndicatorResult<f64>>;

/// A registered indicator: canonical name, category, parameter schema, and
/// the builder that computes it.
#[derive(Debug, Clone, Copy)]
pub struct IndicatorSpec {
    name: &'static str,
    category: Category,
    params: &'static [ParamSpec],
    builder: IndicatorFn,
}

impl IndicatorSpec {
    pub(crate) const fn new(
        name: &'static str,
        category: Category,
        params: &'static [ParamSpec],
        builder: IndicatorFn,
    ) -> Self {
        Self {
            name,
            category,
            params,
            builder,
        }
    }

    /// The canonical lowercase invocation name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The indicator's category.
    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    /// The parameter schema in declared (naming) order.
    #[must_use]
    pub fn params(&self) -> &'static [ParamSpec] {
        self.params
    }

    /// Resolves user overrides against the schema.
    pub(crate) fn resolve(&self, user: &Params) -> Result<ResolvedParams> {
        for key in user.keys() {
            if !self.params.iter().any(|p| p.name == key) {
                return Err(Error::invalid_parameter(
                    key,
                    format!("not recognized by `{}`", self.name),
                ));
            }
        }
        let mut resolved = ResolvedParams::with_capacity(self.params.len());
        for spec in self.params {
            let value = user.get(spec.name).unwrap_or_else(|| spec.default());
            let value = spec.validate(value)?;
            resolved.push(spec.name, value, spec.affects_output);
        }
        Ok(resolved)
    }
}

/// The name-keyed indicator catalog.
pub struct Registry {
    by_name: HashMap<&'static str, IndicatorSpec>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            by_name: HashMap::new(),
        }
    }

    /// Creates a registry populated with every built-in indicator.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        indicators::overlap::register(&mut registry);
        indicators::momentum::register(&mut registry);
        indicators::performance::register(&mut registry);
        indicators::statistics::register(&mut registry);
        indicators::trend::register(&mut registry);
        indicators::volatility::register(&mut registry);
        indicators::volume::register(&mut registry);
        registry
    }

    /// Registration runs once at startup, so a duplicate name is a
    /// programming error and panics rather than silently overwriting.
    pub(crate) fn add(&mut self, spec: IndicatorSpec) {
        assert!(
            !self.by_name.contains_key(spec.name),
            "duplicate indicator `{}`",
            spec.name
        );
        self.by_name.insert(spec.name, spec);
    }

    /// Looks up an indicator by its canonical name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&IndicatorSpec> {
        self.by_name.get(name)
    }

    /// The number of registered indicators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Iterates all registered specs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &IndicatorSpec> {
        self.by_name.values()
    }

    /// Returns indicator names grouped by category, sorted within each group.
    #[must_use]
    pub fn names_by_category(&self) -> BTreeMap<Category, Vec<&'static str>> {
        let mut grouped: BTreeMap<Category, Vec<&'static str>> = BTreeMap::new();
        for spec in self.by_name.values() {
            grouped.entry(spec.category).or_default().push(spec.name);
        }
        for names in grouped.values_mut() {
            names.sort_unstable();
        }
        grouped
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Returns the process-wide registry, built on first use.
#[must_use]
pub fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(Registry::with_defaults)
}

/// Computes the named indicator over `frame` without touching the frame.
///
/// # Errors
///
/// Returns `Error::UnknownIndicator` for an unregistered name,
/// `Error::InvalidParameter` for bad overrides, `Error::MissingColumn` if the
/// frame lacks a required input, or `Error::InsufficientData` for a
/// degenerate all-unknown call. On error the frame is untouched and no
/// partial result is produced.
///
/// # Example
///
/// ```
/// use ta_frame::{compute, Frame, Params, Series};
///
/// let mut frame = Frame::new();
/// frame
///     .push(Series::new("close", (1..=30).map(f64::from).collect()))
///     .unwrap();
/// let result = compute("rsi", &frame, &Params::new()).unwrap();
/// assert_eq!(result.name(), "RSI_14");
/// ```
pub fn compute(name: &str, frame: &Frame<f64>, params: &Params) -> Result<IndicatorResult<f64>> {
    let spec = registry().get(name).ok_or_else(|| Error::UnknownIndicator {
        name: name.to_owned(),
    })?;
    let resolved = spec.resolve(params)?;
    (spec.builder)(frame, &resolved)
}

/// Computes the named indicator and appends its output columns to `frame`.
///
/// Existing columns with the same identifiers are overwritten in place, so
/// repeating a call with identical parameters leaves the frame unchanged
/// apart from recomputed values. All-or-nothing: a failed computation leaves
/// the frame exactly as it was.
///
/// # Errors
///
/// Same conditions as [`compute`].
pub fn compute_append(
    name: &str,
    frame: &mut Frame<f64>,
    params: &Params,
) -> Result<IndicatorResult<f64>> {
    let result = compute(name, frame, params)?;
    for series in result.columns() {
        frame.upsert(series.clone())?;
    }
    Ok(result)
}

/// Returns all built-in indicator names grouped by category.
#[must_use]
pub fn list_indicators() -> BTreeMap<Category, Vec<&'static str>> {
    registry().names_by_category()
}

/// Returns the spec (schema included) for the named indicator.
///
/// # Errors
///
/// Returns `Error::UnknownIndicator` if the name is not registered.
pub fn describe(name: &str) -> Result<&'static IndicatorSpec> {
    registry().get(name).ok_or_else(|| Error::UnknownIndicator {
        name: name.to_owned(),
    })
}
