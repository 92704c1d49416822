//! Template-independent checks on diagram metadata

use crate::params::{merge_with_defaults, validate_params, ParamSchema, ValidationOptions, ValidationResult};

use super::types::{DiagramMetadata, DiagramMode};

/// Validate a metadata record
///
/// Checks the fields the mode requires and, when `schema` is given, the
/// parameters merged with that schema's defaults. Callers on the authoring
/// side pass [`ValidationOptions::strict`].
pub fn validate_metadata(
    metadata: &DiagramMetadata,
    schema: Option<&ParamSchema>,
    options: ValidationOptions,
) -> ValidationResult {
    let mut warnings = Vec::new();
    let mut errors = Vec::new();

    match metadata.mode {
        DiagramMode::Asset => {
            let has_id = metadata
                .diagram_id
                .as_deref()
                .is_some_and(|id| !id.trim().is_empty());
            if !has_id {
                errors.push("diagramId is required for mode \"asset\"".to_string());
            }
        }
        DiagramMode::Template | DiagramMode::Auto if !metadata.uses_blueprint() => {
            if metadata.template_id().is_none() {
                errors.push(format!("templateId is required for mode \"{}\"", metadata.mode));
            }
        }
        _ => match &metadata.custom {
            None => errors.push("custom blueprint is required for mode \"custom\"".to_string()),
            Some(bp) if bp.layers.is_empty() => {
                warnings.push("Custom blueprint has no layers".to_string())
            }
            Some(_) => {}
        },
    }

    if metadata.is_renderable() && metadata.alt.as_deref().map_or(true, |a| a.trim().is_empty()) {
        warnings.push("Alt text is missing".to_string());
    }

    let result = ValidationResult::new(warnings, errors);
    match schema {
        Some(schema) => {
            let merged = merge_with_defaults(&metadata.params, schema);
            result.merge(validate_params(&merged, schema, options))
        }
        None => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::Blueprint;
    use crate::params::{DiagramParams, Flag, ValueSpec};

    fn radius_schema() -> ParamSchema {
        ParamSchema::new()
            .value("radius", ValueSpec::required_number().min(0.0))
            .flag("showCenter", true)
    }

    #[test]
    fn test_asset_requires_diagram_id() {
        let meta = DiagramMetadata {
            mode: DiagramMode::Asset,
            ..DiagramMetadata::default()
        };
        let result = validate_metadata(&meta, None, ValidationOptions::strict());
        assert!(!result.ok);
        assert_eq!(result.errors, vec!["diagramId is required for mode \"asset\""]);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_template_requires_template_id() {
        let meta = DiagramMetadata {
            mode: DiagramMode::Template,
            alt: Some("x".to_string()),
            ..DiagramMetadata::default()
        };
        let result = validate_metadata(&meta, None, ValidationOptions::strict());
        assert_eq!(result.errors, vec!["templateId is required for mode \"template\""]);
    }

    #[test]
    fn test_custom_without_layers_warns() {
        let bp: Blueprint = serde_json::from_str(r#"{"viewBox": "0 0 10 10"}"#).expect("parse");
        let meta = DiagramMetadata::custom(bp).with_alt("empty");
        let result = validate_metadata(&meta, None, ValidationOptions::strict());
        assert!(result.ok);
        assert_eq!(result.warnings, vec!["Custom blueprint has no layers"]);

        let missing = DiagramMetadata {
            mode: DiagramMode::Custom,
            ..DiagramMetadata::default()
        };
        assert!(!validate_metadata(&missing, None, ValidationOptions::strict()).ok);
    }

    #[test]
    fn test_missing_alt_warns() {
        let meta = DiagramMetadata::template("math.geometry.circle.v1");
        let result = validate_metadata(&meta, None, ValidationOptions::strict());
        assert!(result.ok);
        assert_eq!(result.warnings, vec!["Alt text is missing"]);
    }

    #[test]
    fn test_delegates_to_schema() {
        let meta = DiagramMetadata::template("t").with_alt("a");
        let result = validate_metadata(&meta, Some(&radius_schema()), ValidationOptions::strict());
        assert!(!result.ok);
        assert!(result.errors.iter().any(|e| e.contains("radius")));

        let meta = meta.with_params(DiagramParams::new().with_value("radius", 2.0));
        assert!(validate_metadata(&meta, Some(&radius_schema()), ValidationOptions::strict()).ok);
    }

    #[test]
    fn test_strict_visibility_is_the_authoring_choice() {
        let params = DiagramParams::new()
            .with_value("radius", 2.0)
            .with_flag("showCenter", Flag::Malformed(serde_json::json!("yes")));
        let meta = DiagramMetadata::template("t").with_alt("a").with_params(params);

        assert!(!validate_metadata(&meta, Some(&radius_schema()), ValidationOptions::strict()).ok);
        assert!(validate_metadata(&meta, Some(&radius_schema()), ValidationOptions::lenient()).ok);
    }
}
