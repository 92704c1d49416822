//! Checking merged parameters against a schema
//!
//! Problems come in two tiers. An error means the template cannot produce a
//! sane image and blocks rendering. A warning flags content that renders but
//! is probably confusing for a learner (a label that is too long, a value
//! outside its expected range).

use serde::{Deserialize, Serialize};

use super::schema::{ParamSchema, ValueKind};
use super::types::{DiagramParams, Flag, PositionValue};

/// Outcome of a validation pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub ok: bool,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// Build a result, deriving `ok` from the error list
    pub fn new(warnings: Vec<String>, errors: Vec<String>) -> Self {
        Self {
            ok: errors.is_empty(),
            warnings,
            errors,
        }
    }

    /// A passing result with no diagnostics
    pub fn valid() -> Self {
        Self::new(vec![], vec![])
    }

    /// A failing result with a single error
    pub fn failure(error: impl Into<String>) -> Self {
        Self::new(vec![], vec![error.into()])
    }

    /// Append another result's diagnostics to this one
    pub fn merge(mut self, other: ValidationResult) -> Self {
        self.warnings.extend(other.warnings);
        self.errors.extend(other.errors);
        self.ok = self.errors.is_empty();
        self
    }
}

/// How a non-boolean visibility value is treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisibilityPolicy {
    /// Report an error
    Strict,
    /// Say nothing and fall back to the schema default before rendering
    #[default]
    Lenient,
}

/// Knobs for [`validate_params`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationOptions {
    pub visibility: VisibilityPolicy,
}

impl ValidationOptions {
    pub fn strict() -> Self {
        Self {
            visibility: VisibilityPolicy::Strict,
        }
    }

    pub fn lenient() -> Self {
        Self {
            visibility: VisibilityPolicy::Lenient,
        }
    }
}

/// Validate parameters against every key the schema declares
pub fn validate_params(
    params: &DiagramParams,
    schema: &ParamSchema,
    options: ValidationOptions,
) -> ValidationResult {
    let mut warnings = Vec::new();
    let mut errors = Vec::new();

    for (name, spec) in &schema.labels {
        match params.labels.get(name) {
            None => {
                if spec.required {
                    errors.push(format!("Label \"{}\" is required", name));
                }
            }
            Some(text) if text.trim().is_empty() => {
                if spec.required {
                    errors.push(format!("Label \"{}\" is required", name));
                }
            }
            Some(text) => {
                let len = text.chars().count();
                if let Some(max) = spec.max_len {
                    if len > max {
                        warnings.push(format!(
                            "Label \"{}\" exceeds max length of {} (got {})",
                            name, max, len
                        ));
                    }
                }
            }
        }
    }

    for (name, spec) in &schema.values {
        let value = match params.values.get(name) {
            Some(v) if !v.is_empty() => v,
            _ => {
                if spec.required {
                    errors.push(format!("Value \"{}\" is required", name));
                }
                continue;
            }
        };

        if spec.kind == ValueKind::String {
            continue;
        }

        let Some(n) = value.as_number() else {
            errors.push(format!("Value \"{}\" must be a number (got {})", name, value));
            continue;
        };

        if let Some(min) = spec.min {
            if n < min {
                warnings.push(format!(
                    "Value \"{}\" ({}) is below minimum {}",
                    name, n, min
                ));
            }
        }
        if let Some(max) = spec.max {
            if n > max {
                warnings.push(format!(
                    "Value \"{}\" ({}) is above maximum {}",
                    name, n, max
                ));
            }
        }
    }

    for (name, spec) in &schema.positions {
        match params.positions.get(name) {
            None => {
                if spec.required {
                    errors.push(format!("Position \"{}\" is required", name));
                }
            }
            Some(position) => match position.as_point() {
                None => errors.push(format!(
                    "Position \"{}\" must have numeric x and y",
                    name
                )),
                Some(p) => {
                    let inside = (0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y);
                    if spec.normalized && !inside {
                        warnings.push(format!(
                            "Position \"{}\" ({}, {}) is outside the normalized range [0, 1]",
                            name, p.x, p.y
                        ));
                    }
                }
            },
        }
    }

    if options.visibility == VisibilityPolicy::Strict {
        for name in schema.visibility.keys() {
            if let Some(Flag::Malformed(value)) = params.visibility.get(name) {
                errors.push(format!(
                    "Visibility \"{}\" must be a boolean (got {})",
                    name, value
                ));
            }
        }
    }

    // Malformed positions the schema does not declare still cannot be drawn
    for (name, position) in &params.positions {
        if !schema.positions.contains_key(name) && matches!(position, PositionValue::Malformed(_))
        {
            warnings.push(format!(
                "Position \"{}\" is malformed and will be ignored",
                name
            ));
        }
    }

    ValidationResult::new(warnings, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::schema::{LabelSpec, PositionSpec, ValueSpec};
    use pretty_assertions::assert_eq;

    fn schema() -> ParamSchema {
        ParamSchema::new()
            .label("A", LabelSpec::required().max_len(3))
            .value("radius", ValueSpec::required_number().range(1.0, 10.0))
            .value("unit", ValueSpec::text("cm"))
            .flag("showGrid", true)
            .position("P", PositionSpec::required().normalized())
    }

    fn complete() -> DiagramParams {
        DiagramParams::new()
            .with_label("A", "A")
            .with_value("radius", 5.0)
            .with_position("P", 0.5, 0.5)
    }

    #[test]
    fn test_complete_params_are_valid() {
        let result = validate_params(&complete(), &schema(), ValidationOptions::default());
        assert_eq!(result, ValidationResult::valid());
    }

    #[test]
    fn test_missing_required_fields_are_errors() {
        let result = validate_params(&DiagramParams::new(), &schema(), ValidationOptions::default());
        assert!(!result.ok);
        assert_eq!(
            result.errors,
            vec![
                "Label \"A\" is required".to_string(),
                "Value \"radius\" is required".to_string(),
                "Position \"P\" is required".to_string(),
            ]
        );
    }

    #[test]
    fn test_empty_label_counts_as_missing() {
        let params = complete().with_label("A", "  ");
        let result = validate_params(&params, &schema(), ValidationOptions::default());
        assert_eq!(result.errors, vec!["Label \"A\" is required".to_string()]);
    }

    #[test]
    fn test_length_and_range_are_warnings() {
        let params = complete()
            .with_label("A", "ABCDE")
            .with_value("radius", 12.0)
            .with_position("P", 1.5, 0.5);
        let result = validate_params(&params, &schema(), ValidationOptions::default());
        assert!(result.ok);
        assert_eq!(
            result.warnings,
            vec![
                "Label \"A\" exceeds max length of 3 (got 5)".to_string(),
                "Value \"radius\" (12) is above maximum 10".to_string(),
                "Position \"P\" (1.5, 0.5) is outside the normalized range [0, 1]".to_string(),
            ]
        );
    }

    #[test]
    fn test_below_minimum_is_warning() {
        let params = complete().with_value("radius", 0.5);
        let result = validate_params(&params, &schema(), ValidationOptions::default());
        assert!(result.ok);
        assert_eq!(
            result.warnings,
            vec!["Value \"radius\" (0.5) is below minimum 1".to_string()]
        );
    }

    #[test]
    fn test_non_numeric_value_is_error() {
        let params = complete().with_value("radius", "wide");
        let result = validate_params(&params, &schema(), ValidationOptions::default());
        assert_eq!(
            result.errors,
            vec!["Value \"radius\" must be a number (got \"wide\")".to_string()]
        );
    }

    #[test]
    fn test_numeric_string_coerces() {
        let params = complete().with_value("radius", "7.5");
        let result = validate_params(&params, &schema(), ValidationOptions::default());
        assert!(result.ok);
    }

    #[test]
    fn test_malformed_position_is_error() {
        let mut params = complete();
        params.positions.insert(
            "P".to_string(),
            PositionValue::Malformed(serde_json::json!({"x": "left"})),
        );
        let result = validate_params(&params, &schema(), ValidationOptions::default());
        assert_eq!(
            result.errors,
            vec!["Position \"P\" must have numeric x and y".to_string()]
        );
    }

    #[test]
    fn test_visibility_policy() {
        let params = complete().with_flag("showGrid", Flag::Malformed(serde_json::json!("yes")));

        let lenient = validate_params(&params, &schema(), ValidationOptions::lenient());
        assert!(lenient.ok);
        assert!(lenient.warnings.is_empty());

        let strict = validate_params(&params, &schema(), ValidationOptions::strict());
        assert_eq!(
            strict.errors,
            vec!["Visibility \"showGrid\" must be a boolean (got \"yes\")".to_string()]
        );
    }

    #[test]
    fn test_merge_results() {
        let a = ValidationResult::new(vec!["w".into()], vec![]);
        let b = ValidationResult::failure("e");
        let merged = a.merge(b);
        assert!(!merged.ok);
        assert_eq!(merged.warnings, vec!["w".to_string()]);
        assert_eq!(merged.errors, vec!["e".to_string()]);
    }
}
