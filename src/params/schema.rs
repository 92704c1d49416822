//! Declarative parameter schemas
//!
//! A schema describes the labels, values, visibility flags and positions a
//! template accepts, together with their defaults and constraints. Schemas are
//! open: parameters they do not declare are passed through untouched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::types::{ParamValue, Point};

/// Constraints for a text label
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LabelSpec {
    pub default: Option<String>,
    pub required: bool,
    pub max_len: Option<usize>,
}

impl LabelSpec {
    pub fn with_default(text: impl Into<String>) -> Self {
        Self {
            default: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn required() -> Self {
        Self {
            required: true,
            ..Self::default()
        }
    }

    pub fn max_len(mut self, len: usize) -> Self {
        self.max_len = Some(len);
        self
    }

    pub fn mark_required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Whether a value parameter is interpreted numerically
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    #[default]
    Number,
    String,
}

/// Constraints for a value parameter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueSpec {
    pub default: Option<ParamValue>,
    pub required: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub kind: ValueKind,
}

impl ValueSpec {
    /// Numeric value with a default
    pub fn number(default: f64) -> Self {
        Self {
            default: Some(ParamValue::Number(default)),
            ..Self::default()
        }
    }

    /// Numeric value that must be supplied by the caller
    pub fn required_number() -> Self {
        Self {
            required: true,
            ..Self::default()
        }
    }

    /// Free text value with a default
    pub fn text(default: impl Into<String>) -> Self {
        Self {
            default: Some(ParamValue::Text(default.into())),
            kind: ValueKind::String,
            ..Self::default()
        }
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn range(self, min: f64, max: f64) -> Self {
        self.min(min).max(max)
    }

    pub fn mark_required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Default for a visibility flag
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilitySpec {
    pub default: Option<bool>,
}

/// Constraints for a point position
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionSpec {
    pub default: Option<Point>,
    pub required: bool,
    pub normalized: bool,
}

impl PositionSpec {
    pub fn with_default(x: f64, y: f64) -> Self {
        Self {
            default: Some(Point::new(x, y)),
            ..Self::default()
        }
    }

    pub fn required() -> Self {
        Self {
            required: true,
            ..Self::default()
        }
    }

    /// Coordinates are fractions of the canvas in `[0, 1]`
    pub fn normalized(mut self) -> Self {
        self.normalized = true;
        self
    }
}

/// The full parameter schema of a template
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParamSchema {
    pub labels: BTreeMap<String, LabelSpec>,
    pub values: BTreeMap<String, ValueSpec>,
    pub visibility: BTreeMap<String, VisibilitySpec>,
    pub positions: BTreeMap<String, PositionSpec>,
}

impl ParamSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, name: impl Into<String>, spec: LabelSpec) -> Self {
        self.labels.insert(name.into(), spec);
        self
    }

    pub fn value(mut self, name: impl Into<String>, spec: ValueSpec) -> Self {
        self.values.insert(name.into(), spec);
        self
    }

    pub fn flag(mut self, name: impl Into<String>, default: bool) -> Self {
        self.visibility.insert(
            name.into(),
            VisibilitySpec {
                default: Some(default),
            },
        );
        self
    }

    pub fn position(mut self, name: impl Into<String>, spec: PositionSpec) -> Self {
        self.positions.insert(name.into(), spec);
        self
    }

    /// Check that every declared default satisfies its own constraints
    ///
    /// Returns a description of each offending entry. Used to audit template
    /// definitions; never called on the render path.
    pub fn default_violations(&self) -> Vec<String> {
        let mut problems = Vec::new();

        for (name, spec) in &self.labels {
            if let (Some(default), Some(max)) = (&spec.default, spec.max_len) {
                if default.chars().count() > max {
                    problems.push(format!("label \"{}\" default exceeds maxLen {}", name, max));
                }
            }
        }

        for (name, spec) in &self.values {
            let Some(default) = &spec.default else {
                continue;
            };
            if spec.kind == ValueKind::String {
                continue;
            }
            match default.as_number() {
                None => problems.push(format!("value \"{}\" default is not numeric", name)),
                Some(n) => {
                    if spec.min.is_some_and(|min| n < min) || spec.max.is_some_and(|max| n > max)
                    {
                        problems.push(format!("value \"{}\" default {} is out of range", name, n));
                    }
                }
            }
        }

        for (name, spec) in &self.positions {
            if let Some(p) = spec.default {
                if spec.normalized && !((0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y))
                {
                    problems.push(format!("position \"{}\" default is not normalized", name));
                }
            }
        }

        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_from_json() {
        let json = r#"{
            "labels": {"A": {"default": "A", "maxLen": 3}},
            "values": {"radius": {"required": true, "min": 1, "max": 10, "kind": "number"}},
            "visibility": {"showGrid": {"default": true}},
            "positions": {"P": {"default": {"x": 0.5, "y": 0.5}, "normalized": true}}
        }"#;
        let schema: ParamSchema = serde_json::from_str(json).expect("should parse");
        assert_eq!(schema.labels["A"].max_len, Some(3));
        assert!(schema.values["radius"].required);
        assert_eq!(schema.values["radius"].min, Some(1.0));
        assert_eq!(schema.visibility["showGrid"].default, Some(true));
        assert!(schema.positions["P"].normalized);
    }

    #[test]
    fn test_value_kind_defaults_to_number() {
        let spec: ValueSpec = serde_json::from_str(r#"{"default": 3}"#).expect("should parse");
        assert_eq!(spec.kind, ValueKind::Number);
    }

    #[test]
    fn test_default_violations() {
        let schema = ParamSchema::new()
            .label("A", LabelSpec::with_default("ABCD").max_len(2))
            .value("r", ValueSpec::number(50.0).range(0.0, 10.0))
            .value("unit", ValueSpec::text("cm"))
            .position("P", PositionSpec::with_default(2.0, 0.5).normalized());
        let problems = schema.default_violations();
        assert_eq!(problems.len(), 3);
    }

    #[test]
    fn test_consistent_schema_has_no_violations() {
        let schema = ParamSchema::new()
            .label("A", LabelSpec::with_default("A").max_len(2))
            .value("r", ValueSpec::number(5.0).range(0.0, 10.0))
            .flag("showGrid", true);
        assert!(schema.default_violations().is_empty());
    }
}
