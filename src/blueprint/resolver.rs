//! Expression resolution against a parameter namespace
//!
//! Resolution never panics. Anything that cannot be evaluated comes back as
//! an [`Unresolved`] marker; the caller decides what to draw instead.

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};
use thiserror::Error;

use super::expr::{self, Expr};
use crate::error::ExprError;
use crate::params::{DiagramParams, Point};
use crate::renderer::geometry;

/// Marker for a value that could not be resolved
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Unresolved expression \"{expression}\": {error}")]
pub struct Unresolved {
    pub expression: String,
    pub error: ExprError,
}

impl Unresolved {
    fn new(expression: impl Into<String>, error: ExprError) -> Self {
        Self {
            expression: expression.into(),
            error,
        }
    }
}

/// Body of a `{{...}}` string, if it is one
pub fn expression_body(s: &str) -> Option<&str> {
    let inner = s.strip_prefix("{{")?.strip_suffix("}}")?;
    if inner.is_empty() {
        None
    } else {
        Some(inner)
    }
}

/// Namespace object for a set of diagram parameters
pub fn namespace_from_params(params: &DiagramParams) -> Value {
    serde_json::to_value(params).unwrap_or_else(|_| json!({}))
}

/// Resolves literals and expressions against a namespace
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    namespace: &'a Value,
}

impl<'a> Resolver<'a> {
    pub fn new(namespace: &'a Value) -> Self {
        Self { namespace }
    }

    /// Numbers and plain strings pass through; `{{expr}}` strings are evaluated
    pub fn resolve_value(&self, value: &Value) -> Result<Value, Unresolved> {
        match value {
            Value::String(s) => match expression_body(s) {
                Some(body) => self.evaluate(body),
                None => Ok(value.clone()),
            },
            _ => Ok(value.clone()),
        }
    }

    /// Parse and evaluate the body of an expression
    pub fn evaluate(&self, source: &str) -> Result<Value, Unresolved> {
        let ast = expr::parse(source.trim()).map_err(|errs| {
            let first = errs.into_iter().next().unwrap_or(ExprError::Syntax {
                span: 0..source.len(),
                message: "Invalid expression".to_string(),
                expected: vec![],
            });
            Unresolved::new(source, first)
        })?;
        self.eval(&ast).map_err(|e| Unresolved::new(source, e))
    }

    /// Resolve and coerce to a number (numeric strings are accepted)
    pub fn resolve_number(&self, value: &Value) -> Result<f64, Unresolved> {
        let resolved = self.resolve_value(value)?;
        as_number(&resolved, "value").map_err(|e| Unresolved::new(describe(value), e))
    }

    /// Resolve and coerce to display text
    pub fn resolve_text(&self, value: &Value) -> Result<String, Unresolved> {
        Ok(as_text(&self.resolve_value(value)?))
    }

    /// Resolve a `{x, y}` object whose members may themselves be expressions
    pub fn resolve_point(&self, value: &Value) -> Result<Point, Unresolved> {
        let resolved = self.resolve_value(value)?;
        let Value::Object(map) = &resolved else {
            return Err(Unresolved::new(
                describe(value),
                ExprError::type_error("point", "expected an object with x and y"),
            ));
        };
        let coord = |axis: &str| -> Result<f64, Unresolved> {
            let member = map.get(axis).ok_or_else(|| {
                Unresolved::new(
                    describe(value),
                    ExprError::type_error("point", format!("missing {}", axis)),
                )
            })?;
            self.resolve_number(member)
        };
        Ok(Point::new(coord("x")?, coord("y")?))
    }

    /// Resolve every member of a style object to a string
    ///
    /// Members that fail are left out and reported alongside the result.
    pub fn resolve_style(&self, value: &Value) -> (BTreeMap<String, String>, Vec<Unresolved>) {
        let mut style = BTreeMap::new();
        let mut problems = Vec::new();
        let Value::Object(map) = value else {
            return (style, problems);
        };
        for (key, member) in map {
            match self.resolve_text(member) {
                Ok(text) => {
                    style.insert(key.clone(), text);
                }
                Err(e) => problems.push(e),
            }
        }
        (style, problems)
    }

    fn eval(&self, expr: &Expr) -> Result<Value, ExprError> {
        match expr {
            Expr::Number(n) => Ok(json!(n)),
            Expr::Str(s) => Ok(Value::String(s.clone())),
            Expr::Path(segments) => self.lookup(segments),
            Expr::Call { name, args } => {
                let values = args
                    .iter()
                    .map(|a| self.eval(a))
                    .collect::<Result<Vec<_>, _>>()?;
                call_helper(name, &values)
            }
        }
    }

    fn lookup(&self, segments: &[String]) -> Result<Value, ExprError> {
        let mut current = self.namespace;
        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment),
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            }
            .ok_or_else(|| ExprError::UnresolvedPath {
                path: segments.join("."),
            })?;
        }
        Ok(current.clone())
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn as_number(value: &Value, context: &str) -> Result<f64, ExprError> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| ExprError::type_error(context, "number out of range")),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| ExprError::type_error(context, format!("\"{}\" is not a number", s))),
        other => Err(ExprError::type_error(
            context,
            format!("expected a number, got {}", other),
        )),
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Number(n) => match n.as_f64() {
            Some(f) => geometry::fmt_num(f, 6),
            None => n.to_string(),
        },
        other => other.to_string(),
    }
}

fn as_point(value: &Value, context: &str) -> Result<Point, ExprError> {
    let Value::Object(map) = value else {
        return Err(ExprError::type_error(context, "expected a point"));
    };
    let coord = |axis: &str| {
        map.get(axis)
            .ok_or_else(|| ExprError::type_error(context, format!("point is missing {}", axis)))
            .and_then(|v| as_number(v, context))
    };
    Ok(Point::new(coord("x")?, coord("y")?))
}

fn point_value(p: Point) -> Value {
    let mut map = Map::new();
    map.insert("x".to_string(), json!(p.x));
    map.insert("y".to_string(), json!(p.y));
    Value::Object(map)
}

fn expect_args(helper: &str, args: &[Value], expected: usize) -> Result<(), ExprError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(ExprError::Arity {
            helper: helper.to_string(),
            expected,
            found: args.len(),
        })
    }
}

fn call_helper(name: &str, args: &[Value]) -> Result<Value, ExprError> {
    let num = |i: usize| as_number(&args[i], name);
    let result = match name {
        "degToRad" => {
            expect_args(name, args, 1)?;
            json!(num(0)?.to_radians())
        }
        "radToDeg" => {
            expect_args(name, args, 1)?;
            json!(num(0)?.to_degrees())
        }
        "midpoint" => {
            expect_args(name, args, 2)?;
            point_value(geometry::midpoint(as_point(&args[0], name)?, as_point(&args[1], name)?))
        }
        "distance" => {
            expect_args(name, args, 2)?;
            json!(geometry::distance(as_point(&args[0], name)?, as_point(&args[1], name)?))
        }
        "clamp" => {
            expect_args(name, args, 3)?;
            let (v, lo, hi) = (num(0)?, num(1)?, num(2)?);
            if lo > hi {
                return Err(ExprError::type_error(name, "lower bound exceeds upper bound"));
            }
            json!(v.clamp(lo, hi))
        }
        "add" => {
            expect_args(name, args, 2)?;
            json!(num(0)? + num(1)?)
        }
        "sub" => {
            expect_args(name, args, 2)?;
            json!(num(0)? - num(1)?)
        }
        "mul" => {
            expect_args(name, args, 2)?;
            json!(num(0)? * num(1)?)
        }
        "div" => {
            expect_args(name, args, 2)?;
            let divisor = num(1)?;
            if divisor == 0.0 {
                return Err(ExprError::DivisionByZero);
            }
            json!(num(0)? / divisor)
        }
        _ => {
            return Err(ExprError::UnknownHelper {
                name: name.to_string(),
            })
        }
    };
    Ok(result)
}
