//! Concrete parameter values supplied by callers

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A 2D point in diagram coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A value parameter: either numeric or free text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Text(String),
}

impl ParamValue {
    /// Coerce to a number, parsing text if necessary
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Number(n) => Some(*n),
            ParamValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        }
    }

    /// Text view of the value (numbers are formatted)
    pub fn as_text(&self) -> String {
        match self {
            ParamValue::Number(n) => n.to_string(),
            ParamValue::Text(s) => s.clone(),
        }
    }

    /// True for empty or whitespace-only text
    pub fn is_empty(&self) -> bool {
        matches!(self, ParamValue::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Number(n) => write!(f, "{}", n),
            ParamValue::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(n: f64) -> Self {
        ParamValue::Number(n)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

/// A visibility flag as supplied; anything but a boolean is kept as malformed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Flag {
    Bool(bool),
    Malformed(serde_json::Value),
}

impl Flag {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Flag::Bool(b) => Some(*b),
            Flag::Malformed(_) => None,
        }
    }
}

impl From<bool> for Flag {
    fn from(b: bool) -> Self {
        Flag::Bool(b)
    }
}

/// A position as supplied; objects without numeric `x`/`y` are kept as malformed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PositionValue {
    Point(Point),
    Malformed(serde_json::Value),
}

impl PositionValue {
    pub fn as_point(&self) -> Option<Point> {
        match self {
            PositionValue::Point(p) if p.x.is_finite() && p.y.is_finite() => Some(*p),
            _ => None,
        }
    }
}

impl From<Point> for PositionValue {
    fn from(p: Point) -> Self {
        PositionValue::Point(p)
    }
}

/// The four typed parameter maps a template consumes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramParams {
    pub labels: BTreeMap<String, String>,
    pub values: BTreeMap<String, ParamValue>,
    pub visibility: BTreeMap<String, Flag>,
    pub positions: BTreeMap<String, PositionValue>,
}

impl DiagramParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.labels.insert(name.into(), text.into());
        self
    }

    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn with_flag(mut self, name: impl Into<String>, flag: impl Into<Flag>) -> Self {
        self.visibility.insert(name.into(), flag.into());
        self
    }

    pub fn with_position(mut self, name: impl Into<String>, x: f64, y: f64) -> Self {
        self.positions
            .insert(name.into(), PositionValue::Point(Point::new(x, y)));
        self
    }

    /// Label text, empty when absent
    pub fn label(&self, name: &str) -> &str {
        self.labels.get(name).map(|s| s.as_str()).unwrap_or("")
    }

    /// Numeric value, if present and coercible
    pub fn number(&self, name: &str) -> Option<f64> {
        self.values.get(name).and_then(ParamValue::as_number)
    }

    /// Numeric value with a fallback for absent or non-numeric entries
    pub fn number_or(&self, name: &str, fallback: f64) -> f64 {
        self.number(name).unwrap_or(fallback)
    }

    /// Text view of a value, empty when absent
    pub fn text(&self, name: &str) -> String {
        self.values.get(name).map(ParamValue::as_text).unwrap_or_default()
    }

    /// Visibility flag; absent or malformed flags read as hidden
    pub fn visible(&self, name: &str) -> bool {
        self.visibility
            .get(name)
            .and_then(Flag::as_bool)
            .unwrap_or(false)
    }

    /// Well-formed position, if present
    pub fn point(&self, name: &str) -> Option<Point> {
        self.positions.get(name).and_then(PositionValue::as_point)
    }
}
