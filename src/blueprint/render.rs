//! Shape-tree renderer for blueprints
//!
//! Layers are drawn in ascending `z` (declaration order for ties) and items in
//! declaration order. Each item resolves all of its fields before it writes
//! anything, so a shape that fails leaves no partial markup behind.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use super::resolver::{Resolver, Unresolved};
use super::types::{Blueprint, ShapeItem};
use crate::params::Point;
use crate::renderer::canvas::class;
use crate::renderer::geometry::{self, fmt_num, PathData};
use crate::renderer::svg::escape_xml;
use crate::renderer::{Canvas, IdPrefix, RenderContext, RenderResult, SvgBuilder, TextAnchor};

/// Shape types the renderer understands
pub const SHAPE_TYPES: [&str; 13] = [
    "line",
    "polyline",
    "polygon",
    "rect",
    "circle",
    "ellipse",
    "text",
    "arrow",
    "arc",
    "angleMarker",
    "tickMark",
    "grid",
    "axes",
];

/// Why a single shape was skipped
#[derive(Debug, Error)]
enum ShapeError {
    #[error("missing field \"{0}\"")]
    MissingField(&'static str),
    #[error("field \"{field}\" {reason}")]
    InvalidField { field: &'static str, reason: String },
}

/// Render a blueprint against a namespace
pub fn render_blueprint(blueprint: &Blueprint, namespace: &Value, ctx: &RenderContext) -> RenderResult {
    let resolver = Resolver::new(namespace);
    let mut canvas = Canvas::new(ctx, blueprint.view_box.width, blueprint.view_box.height, "blueprint");

    let mut layers: Vec<_> = blueprint.layers.iter().collect();
    layers.sort_by(|a, b| a.z.total_cmp(&b.z));

    for layer in layers {
        debug!(layer = %layer.id, items = layer.items.len(), "Rendering blueprint layer");
        canvas.begin_group(&layer.id);
        for (index, item) in layer.items.iter().enumerate() {
            let name = if item.id.is_empty() {
                format!("{}-{}", layer.id, index)
            } else {
                item.id.clone()
            };
            let mut shape = ShapeContext {
                resolver,
                item,
                name: &name,
                warnings: vec![],
            };
            let outcome = emit(&mut shape, &mut canvas);
            for w in shape.warnings {
                warn!(item = %name, "{}", w);
                canvas.warn(w);
            }
            if let Err(e) = outcome {
                let message = format!("Shape \"{}\" ({}) skipped: {}", name, item.kind, e);
                warn!("{}", message);
                canvas.warn(message);
            }
        }
        canvas.end_group();
    }

    canvas.finish()
}

/// Field access for one item; unresolved values degrade to zero/empty with a warning
struct ShapeContext<'a> {
    resolver: Resolver<'a>,
    item: &'a ShapeItem,
    name: &'a str,
    warnings: Vec<String>,
}

impl ShapeContext<'_> {
    fn note(&mut self, field: &str, err: Unresolved) {
        self.warnings
            .push(format!("Shape \"{}\" field \"{}\": {}", self.name, field, err));
    }

    fn number(&mut self, field: &'static str) -> Result<f64, ShapeError> {
        let value = self.item.field(field).ok_or(ShapeError::MissingField(field))?;
        Ok(self.resolve_number(field, value))
    }

    fn number_or(&mut self, field: &'static str, fallback: f64) -> f64 {
        match self.item.field(field) {
            Some(value) => self.resolve_number(field, value),
            None => fallback,
        }
    }

    fn resolve_number(&mut self, field: &str, value: &Value) -> f64 {
        match self.resolver.resolve_number(value) {
            Ok(n) => n,
            Err(e) => {
                self.note(field, e);
                0.0
            }
        }
    }

    fn point(&mut self, field: &'static str) -> Result<Point, ShapeError> {
        let value = self.item.field(field).ok_or(ShapeError::MissingField(field))?;
        Ok(self.resolve_point(field, value))
    }

    fn resolve_point(&mut self, field: &str, value: &Value) -> Point {
        match self.resolver.resolve_point(value) {
            Ok(p) => p,
            Err(e) => {
                self.note(field, e);
                Point::new(0.0, 0.0)
            }
        }
    }

    fn points(&mut self, field: &'static str) -> Result<Vec<Point>, ShapeError> {
        let value = self.item.field(field).ok_or(ShapeError::MissingField(field))?;
        let resolved = match self.resolver.resolve_value(value) {
            Ok(v) => v,
            Err(e) => {
                self.note(field, e);
                Value::Array(vec![])
            }
        };
        let Value::Array(items) = resolved else {
            return Err(ShapeError::InvalidField {
                field,
                reason: "must be a list of points".to_string(),
            });
        };
        Ok(items.iter().map(|p| self.resolve_point(field, p)).collect())
    }

    fn text(&mut self, field: &'static str) -> Option<String> {
        let value = self.item.field(field)?;
        match self.resolver.resolve_text(value) {
            Ok(t) => Some(t),
            Err(e) => {
                self.note(field, e);
                Some(String::new())
            }
        }
    }

    fn flag(&mut self, field: &'static str, fallback: bool) -> bool {
        let Some(value) = self.item.field(field) else {
            return fallback;
        };
        match self.resolver.resolve_value(value) {
            Ok(Value::Bool(b)) => b,
            Ok(_) => fallback,
            Err(e) => {
                self.note(field, e);
                fallback
            }
        }
    }

    /// CSS class, falling back to the shape's default class
    fn class(&mut self, fallback: &str) -> String {
        self.text("class")
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }

    /// Presentation attributes from the `style` object
    ///
    /// Only keys in [`STYLE_ATTRIBUTES`] are written, and `url(...)` values
    /// must point at a fragment inside the document. Anything else is dropped
    /// with a warning.
    fn style_attrs(&mut self) -> String {
        let Some(value) = self.item.field("style") else {
            return String::new();
        };
        let (style, problems) = self.resolver.resolve_style(value);
        for p in problems {
            self.note("style", p);
        }
        let mut attrs = String::new();
        for (key, v) in style {
            if !STYLE_ATTRIBUTES.contains(&key.as_str()) {
                self.drop_style(&key, "is not a presentation attribute");
            } else if !references_are_local(&v) {
                self.drop_style(&key, "references an external resource");
            } else {
                attrs.push_str(&format!(r#" {}="{}""#, key, escape_xml(&v)));
            }
        }
        attrs
    }

    fn drop_style(&mut self, key: &str, reason: &str) {
        self.warnings.push(format!(
            "Shape \"{}\" style \"{}\" dropped: {}",
            self.name, key, reason
        ));
    }
}

/// Style keys a blueprint may set on a shape
pub const STYLE_ATTRIBUTES: [&str; 20] = [
    "fill",
    "fill-opacity",
    "fill-rule",
    "stroke",
    "stroke-width",
    "stroke-opacity",
    "stroke-dasharray",
    "stroke-dashoffset",
    "stroke-linecap",
    "stroke-linejoin",
    "stroke-miterlimit",
    "opacity",
    "font-size",
    "font-family",
    "font-weight",
    "font-style",
    "text-anchor",
    "dominant-baseline",
    "letter-spacing",
    "visibility",
];

/// True when every `url(...)` in `value` targets a `#fragment`
fn references_are_local(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    lower.match_indices("url(").all(|(at, _)| {
        lower[at + 4..]
            .trim_start_matches(|c: char| c.is_whitespace() || c == '\'' || c == '"')
            .starts_with('#')
    })
}

fn positive(field: &'static str, value: f64) -> Result<f64, ShapeError> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ShapeError::InvalidField {
            field,
            reason: format!("must be positive (got {})", fmt_num(value, 2)),
        })
    }
}

fn emit(shape: &mut ShapeContext<'_>, canvas: &mut Canvas) -> Result<(), ShapeError> {
    let name = shape.name.to_string();
    let item = shape.item;
    match item.kind.as_str() {
        "line" => {
            let (from, to) = (shape.point("from")?, shape.point("to")?);
            let (class, style) = (shape.class(class::LINE), shape.style_attrs());
            canvas
                .builder()
                .add_line(Some(&IdPrefix::Line.id(&name)), from, to, Some(&class), &style);
        }
        "polyline" | "polygon" => {
            let points = shape.points("points")?;
            if points.len() < 2 {
                return Err(ShapeError::InvalidField {
                    field: "points",
                    reason: "needs at least two points".to_string(),
                });
            }
            let style = shape.style_attrs();
            if item.kind == "polygon" {
                let class = shape.class(class::FACE);
                canvas
                    .builder()
                    .add_polygon(Some(&IdPrefix::Poly.id(&name)), &points, Some(&class), &style);
            } else {
                let class = shape.class(class::LINE);
                canvas
                    .builder()
                    .add_polyline(Some(&IdPrefix::Path.id(&name)), &points, Some(&class), &style);
            }
        }
        "rect" => {
            let origin = Point::new(shape.number("x")?, shape.number("y")?);
            let width = positive("width", shape.number("width")?)?;
            let height = positive("height", shape.number("height")?)?;
            let (class, style) = (shape.class(class::FACE), shape.style_attrs());
            canvas.builder().add_rect(
                Some(&IdPrefix::Face.id(&name)),
                origin,
                width,
                height,
                Some(&class),
                &style,
            );
        }
        "circle" => {
            let center = shape.point("center")?;
            let r = positive("r", shape.number("r")?)?;
            let (class, style) = (shape.class(class::LINE), shape.style_attrs());
            canvas
                .builder()
                .add_circle(Some(&IdPrefix::Path.id(&name)), center, r, Some(&class), &style);
        }
        "ellipse" => {
            let center = shape.point("center")?;
            let rx = positive("rx", shape.number("rx")?)?;
            let ry = positive("ry", shape.number("ry")?)?;
            let (class, style) = (shape.class(class::LINE), shape.style_attrs());
            canvas.builder().add_ellipse(
                Some(&IdPrefix::Path.id(&name)),
                center,
                rx,
                ry,
                Some(&class),
                &style,
            );
        }
        "text" => {
            let at = shape.point("at")?;
            let text = shape.text("text").ok_or(ShapeError::MissingField("text"))?;
            let anchor = match shape.text("anchor") {
                None => TextAnchor::Middle,
                Some(a) => TextAnchor::parse(&a).ok_or(ShapeError::InvalidField {
                    field: "anchor",
                    reason: format!("must be start, middle or end (got \"{}\")", a),
                })?,
            };
            let (class, style) = (shape.class(class::TEXT), shape.style_attrs());
            canvas.builder().add_text(
                Some(&IdPrefix::Text.id(&name)),
                &text,
                at,
                anchor,
                Some(&class),
                &style,
            );
        }
        "arrow" => {
            let (from, to) = (shape.point("from")?, shape.point("to")?);
            let head = shape.number_or("headSize", 10.0);
            let (class, style) = (shape.class(class::LINE), shape.style_attrs());
            emit_arrow(canvas.builder(), &name, from, to, head, &class, &style);
        }
        "arc" => {
            let center = shape.point("center")?;
            let r = positive("r", shape.number("r")?)?;
            let start = shape.number("startAngle")?;
            let end = shape.number("endAngle")?;
            let (class, style) = (shape.class(class::ARC), shape.style_attrs());
            let sweep = end - start;
            let path = PathData::new()
                .move_to(geometry::polar(center, r, start.to_radians()))
                .arc_to(
                    geometry::polar(center, r, end.to_radians()),
                    r,
                    sweep.abs() > 180.0,
                    sweep > 0.0,
                );
            canvas
                .builder()
                .add_path(Some(&IdPrefix::Arc.id(&name)), &path, Some(&class), &style);
        }
        "angleMarker" => {
            let vertex = shape.point("vertex")?;
            let p1 = shape.point("from")?;
            let p2 = shape.point("to")?;
            let r = shape.number_or("r", 30.0);
            let show_degrees = shape.flag("showDegrees", false);
            let label = shape.text("label");
            let (class, style) = (shape.class(class::ARC), shape.style_attrs());

            let arc = geometry::angle_arc(vertex, p1, p2, r);
            let text = match label {
                Some(text) if !text.is_empty() => text,
                _ if show_degrees => format!("{}°", fmt_num(arc.degrees(), 1)),
                _ => String::new(),
            };
            canvas
                .builder()
                .add_path(Some(&IdPrefix::Arc.id(&name)), &arc.path(), Some(&class), &style);
            canvas.text(
                &name,
                &text,
                arc.label_position(vertex, r + 16.0),
                TextAnchor::Middle,
                class::TEXT_ANGLE,
            );
        }
        "tickMark" => {
            let (from, to) = (shape.point("from")?, shape.point("to")?);
            let t = shape.number_or("t", 0.5);
            let count = shape.number_or("count", 1.0).round().clamp(1.0, 5.0) as usize;
            let size = shape.number_or("size", 10.0);
            let (class, style) = (shape.class(class::EQUAL_MARK), shape.style_attrs());
            let path = geometry::tick_marks(from, to, t, count, size, size / 2.0);
            canvas
                .builder()
                .add_path(Some(&IdPrefix::Mark.id(&name)), &path, Some(&class), &style);
        }
        "grid" => {
            let x = shape.number("x")?;
            let y = shape.number("y")?;
            let width = positive("width", shape.number("width")?)?;
            let height = positive("height", shape.number("height")?)?;
            let step = positive("step", shape.number("step")?)?;
            if width / step > 200.0 || height / step > 200.0 {
                return Err(ShapeError::InvalidField {
                    field: "step",
                    reason: "is too small for the grid size".to_string(),
                });
            }
            let (class, style) = (shape.class(class::GRID), shape.style_attrs());
            let builder = canvas.builder();
            builder.start_group(Some(&IdPrefix::Group.id(&name)), None);
            let columns = (width / step).floor() as usize;
            for i in 0..=columns {
                let gx = x + i as f64 * step;
                builder.add_line(None, Point::new(gx, y), Point::new(gx, y + height), Some(&class), &style);
            }
            let rows = (height / step).floor() as usize;
            for j in 0..=rows {
                let gy = y + j as f64 * step;
                builder.add_line(None, Point::new(x, gy), Point::new(x + width, gy), Some(&class), &style);
            }
            builder.end_group();
        }
        "axes" => {
            let origin = shape.point("origin")?;
            let x_length = positive("xLength", shape.number("xLength")?)?;
            let y_length = positive("yLength", shape.number("yLength")?)?;
            let x_label = shape.text("xLabel").unwrap_or_default();
            let y_label = shape.text("yLabel").unwrap_or_default();
            let (class, style) = (shape.class(class::AXIS), shape.style_attrs());

            let x_end = Point::new(origin.x + x_length, origin.y);
            let y_end = Point::new(origin.x, origin.y - y_length);
            canvas.begin_group(&name);
            emit_arrow(canvas.builder(), &format!("{}-x", name), origin, x_end, 8.0, &class, &style);
            emit_arrow(canvas.builder(), &format!("{}-y", name), origin, y_end, 8.0, &class, &style);
            canvas.text(
                &format!("{}-x", name),
                &x_label,
                Point::new(x_end.x + 12.0, x_end.y),
                TextAnchor::Start,
                class::TEXT,
            );
            canvas.text(
                &format!("{}-y", name),
                &y_label,
                Point::new(y_end.x, y_end.y - 14.0),
                TextAnchor::Middle,
                class::TEXT,
            );
            canvas.end_group();
        }
        other => {
            return Err(ShapeError::InvalidField {
                field: "type",
                reason: format!("\"{}\" is not a known shape type", other),
            })
        }
    }
    Ok(())
}

/// Line plus a filled triangular head at `to`, rotated to the line direction
fn emit_arrow(
    builder: &mut SvgBuilder,
    name: &str,
    from: Point,
    to: Point,
    head: f64,
    class: &str,
    style: &str,
) {
    builder.add_line(Some(&IdPrefix::Line.id(name)), from, to, Some(class), style);
    let head_points = geometry::arrow_head(from, to, head);
    builder.add_polygon(
        Some(&IdPrefix::Mark.id(&format!("{}-head", name))),
        &head_points,
        Some(class::POINT),
        "",
    );
}
