//! Static check of blueprint expressions
//!
//! Parses every `{{...}}` string in a blueprint without evaluating it, so
//! malformed expressions can be reported before anything is rendered.

use serde_json::Value;

use super::expr;
use super::resolver::expression_body;
use super::types::Blueprint;
use crate::error::ExprError;

/// An expression that does not parse
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionIssue {
    /// Where the expression sits, e.g. `shapes/tri.points[1]`
    pub location: String,
    /// Body of the expression, without the braces
    pub source: String,
    pub error: ExprError,
}

impl ExpressionIssue {
    /// Source-annotated report for terminal output
    pub fn report(&self) -> String {
        self.error.format(&self.source, &self.location)
    }
}

/// Every syntax error in the blueprint, in layer and item order
pub fn check_expressions(blueprint: &Blueprint) -> Vec<ExpressionIssue> {
    let mut issues = Vec::new();
    for layer in &blueprint.layers {
        for (index, item) in layer.items.iter().enumerate() {
            let name = if item.id.is_empty() {
                format!("{}-{}", layer.id, index)
            } else {
                item.id.clone()
            };
            for (field, value) in &item.fields {
                let location = format!("{}/{}.{}", layer.id, name, field);
                collect(value, &location, &mut issues);
            }
        }
    }
    issues
}

fn collect(value: &Value, location: &str, issues: &mut Vec<ExpressionIssue>) {
    match value {
        Value::String(s) => {
            let Some(body) = expression_body(s) else {
                return;
            };
            if let Err(errors) = expr::parse(body) {
                issues.extend(errors.into_iter().map(|error| ExpressionIssue {
                    location: location.to_string(),
                    source: body.to_string(),
                    error,
                }));
            }
        }
        Value::Array(items) => {
            for (i, v) in items.iter().enumerate() {
                collect(v, &format!("{}[{}]", location, i), issues);
            }
        }
        Value::Object(map) => {
            for (k, v) in map {
                collect(v, &format!("{}.{}", location, k), issues);
            }
        }
        _ => {}
    }
}
