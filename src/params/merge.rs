//! Filling caller parameters from schema defaults

use super::schema::ParamSchema;
use super::types::{DiagramParams, Flag, PositionValue};

/// Fill every declared key the caller omitted with the schema default
///
/// Supplied values are never overwritten and undeclared keys are kept as-is.
/// Keys whose spec declares no default stay absent.
pub fn merge_with_defaults(params: &DiagramParams, schema: &ParamSchema) -> DiagramParams {
    let mut merged = params.clone();

    for (name, spec) in &schema.labels {
        if let Some(default) = &spec.default {
            merged
                .labels
                .entry(name.clone())
                .or_insert_with(|| default.clone());
        }
    }

    for (name, spec) in &schema.values {
        if let Some(default) = &spec.default {
            merged
                .values
                .entry(name.clone())
                .or_insert_with(|| default.clone());
        }
    }

    for (name, spec) in &schema.visibility {
        if let Some(default) = spec.default {
            merged
                .visibility
                .entry(name.clone())
                .or_insert(Flag::Bool(default));
        }
    }

    for (name, spec) in &schema.positions {
        if let Some(default) = spec.default {
            merged
                .positions
                .entry(name.clone())
                .or_insert(PositionValue::Point(default));
        }
    }

    merged
}

/// Replace malformed visibility values with the schema default (or hidden)
///
/// Applied before rendering under the lenient visibility policy, so render
/// functions only ever see booleans for declared flags.
pub fn normalize_visibility(params: &mut DiagramParams, schema: &ParamSchema) {
    for (name, flag) in params.visibility.iter_mut() {
        if let Flag::Malformed(_) = flag {
            let fallback = schema
                .visibility
                .get(name)
                .and_then(|spec| spec.default)
                .unwrap_or(false);
            *flag = Flag::Bool(fallback);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::schema::{LabelSpec, PositionSpec, ValueSpec};
    use crate::params::types::{ParamValue, Point};

    fn schema() -> ParamSchema {
        ParamSchema::new()
            .label("A", LabelSpec::with_default("A"))
            .label("B", LabelSpec::required())
            .value("radius", ValueSpec::number(5.0))
            .flag("showGrid", true)
            .position("P", PositionSpec::with_default(0.5, 0.5))
    }

    #[test]
    fn test_fills_missing_keys() {
        let merged = merge_with_defaults(&DiagramParams::new(), &schema());
        assert_eq!(merged.label("A"), "A");
        assert_eq!(merged.number("radius"), Some(5.0));
        assert!(merged.visible("showGrid"));
        assert_eq!(merged.point("P"), Some(Point::new(0.5, 0.5)));
        // No default declared, so nothing to fill
        assert!(!merged.labels.contains_key("B"));
    }

    #[test]
    fn test_never_overwrites_supplied_values() {
        let params = DiagramParams::new()
            .with_label("A", "X")
            .with_value("radius", "abc")
            .with_flag("showGrid", false);
        let merged = merge_with_defaults(&params, &schema());
        assert_eq!(merged.label("A"), "X");
        assert_eq!(merged.values["radius"], ParamValue::from("abc"));
        assert!(!merged.visible("showGrid"));
    }

    #[test]
    fn test_passes_through_undeclared_keys() {
        let params = DiagramParams::new().with_label("extra", "kept");
        let merged = merge_with_defaults(&params, &schema());
        assert_eq!(merged.label("extra"), "kept");
    }

    #[test]
    fn test_normalize_visibility_uses_schema_default() {
        let mut params = DiagramParams::new()
            .with_flag("showGrid", Flag::Malformed(serde_json::json!("yes")))
            .with_flag("other", Flag::Malformed(serde_json::json!(1)));
        normalize_visibility(&mut params, &schema());
        assert!(params.visible("showGrid"));
        assert_eq!(params.visibility["other"], Flag::Bool(false));
    }
}
