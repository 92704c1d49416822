//! Built-in diagram library
//!
//! Each module defines one template: its schema and a pure render function
//! drawing on a [`Canvas`](crate::renderer::Canvas). Templates never call each
//! other; shared math lives in [`crate::renderer::geometry`] and the helpers
//! below.

use crate::params::{DiagramParams, Point};
use crate::renderer::geometry::fmt_num;
use crate::template::{TemplateError, TemplateRegistry};

pub mod angle;
pub mod bar_chart;
pub mod box_plot;
pub mod circle;
pub mod circuit;
pub mod coordinate;
pub mod number_line;
pub mod rectangle;
pub mod solids;
pub mod triangle;

/// Register every built-in template
pub fn register_builtin(registry: &mut TemplateRegistry) {
    registry.register(coordinate::template());
    registry.register(number_line::template());
    registry.register(triangle::template());
    registry.register(rectangle::template());
    registry.register(circle::template());
    registry.register(angle::template());
    registry.register(solids::cuboid_template());
    registry.register(solids::cylinder_template());
    registry.register(bar_chart::template());
    registry.register(box_plot::template());
    registry.register(circuit::template());
}

/// A numeric parameter the render function cannot do without
pub(crate) fn required_number(params: &DiagramParams, name: &str) -> Result<f64, TemplateError> {
    params
        .number(name)
        .ok_or_else(|| TemplateError::missing(name))
}

/// A strictly positive numeric parameter
pub(crate) fn positive_number(params: &DiagramParams, name: &str) -> Result<f64, TemplateError> {
    let value = required_number(params, name)?;
    if value <= 0.0 {
        return Err(TemplateError::invalid(name, format!("must be positive (got {})", value)));
    }
    Ok(value)
}

/// A measurement with its unit, e.g. `5 cm`
pub(crate) fn measure(value: f64, unit: &str) -> String {
    let unit = unit.trim();
    if unit.is_empty() {
        fmt_num(value, 2)
    } else {
        format!("{} {}", fmt_num(value, 2), unit)
    }
}

/// An angle in degrees, e.g. `36.9°`
pub(crate) fn degrees(value: f64) -> String {
    format!("{}°", fmt_num(value, 1))
}

/// Split a `;`-separated list, dropping blank entries
pub(crate) fn split_list(s: &str) -> Vec<String> {
    s.split(';')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Caller-supplied override text, or a computed fallback
pub(crate) fn label_or(params: &DiagramParams, name: &str, fallback: impl FnOnce() -> String) -> String {
    let text = params.label(name);
    if text.trim().is_empty() {
        fallback()
    } else {
        text.to_string()
    }
}

/// Scale and centre model points (y up) onto a canvas (y down)
pub(crate) fn fit_to_canvas(points: &[Point], width: f64, height: f64, margin: f64) -> Vec<Point> {
    if points.is_empty() {
        return vec![];
    }

    let min_x = points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let max_x = points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    let min_y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_y = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

    let span_x = (max_x - min_x).max(f64::EPSILON);
    let span_y = (max_y - min_y).max(f64::EPSILON);
    let scale = ((width - 2.0 * margin) / span_x).min((height - 2.0 * margin) / span_y);

    let offset_x = (width - span_x * scale) / 2.0;
    let offset_y = (height - span_y * scale) / 2.0;

    points
        .iter()
        .map(|p| {
            Point::new(
                offset_x + (p.x - min_x) * scale,
                height - offset_y - (p.y - min_y) * scale,
            )
        })
        .collect()
}

/// Tick positions `k * step` inside `[min, max]`, or `None` past `limit` ticks
pub(crate) fn ticks(min: f64, max: f64, step: f64, limit: usize) -> Option<Vec<f64>> {
    if step.is_nan() || min.is_nan() || max.is_nan() || step <= 0.0 || max < min {
        return None;
    }
    let first = (min / step).ceil();
    let last = (max / step).floor();
    let count = last - first + 1.0;
    if !count.is_finite() {
        return None;
    }
    if count < 1.0 {
        return Some(vec![]);
    }
    if count > limit as f64 {
        return None;
    }
    Some((0..count as usize).map(|k| (first + k as f64) * step).collect())
}
