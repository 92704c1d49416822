//! Coordinate grid with plotted points
//!
//! Every position in the parameters is plotted, not only the declared `P`,
//! so content can add points without a new template.

use crate::params::{DiagramParams, LabelSpec, ParamSchema, Point, PositionSpec, ValueSpec};
use crate::renderer::canvas::class;
use crate::renderer::geometry::fmt_num;
use crate::renderer::{Canvas, RenderContext, RenderResult, TextAnchor};
use crate::template::{Template, TemplateError};

use super::{positive_number, required_number, ticks};

pub const ID: &str = "math.graphs.coordinate_point.v1";

const SIZE: f64 = 480.0;
const MARGIN: f64 = 40.0;
const MAX_TICKS: usize = 41;

pub fn template() -> Template {
    let schema = ParamSchema::new()
        .label("P", LabelSpec::with_default("P").max_len(3))
        .label("xAxis", LabelSpec::with_default("x").max_len(3))
        .label("yAxis", LabelSpec::with_default("y").max_len(3))
        .value("xMin", ValueSpec::number(-5.0).range(-100.0, 0.0))
        .value("xMax", ValueSpec::number(5.0).range(0.0, 100.0))
        .value("yMin", ValueSpec::number(-5.0).range(-100.0, 0.0))
        .value("yMax", ValueSpec::number(5.0).range(0.0, 100.0))
        .value("step", ValueSpec::number(1.0).range(0.1, 50.0))
        .position("P", PositionSpec::with_default(2.0, 3.0))
        .flag("showGrid", true)
        .flag("showAxes", true)
        .flag("showTickLabels", true)
        .flag("showCoordinates", true);

    Template::new(ID, "Coordinate point", "graphs", schema, render)
}

/// Linear map from grid units to canvas pixels
struct Frame {
    x_min: f64,
    y_max: f64,
    sx: f64,
    sy: f64,
}

impl Frame {
    fn to_canvas(&self, x: f64, y: f64) -> Point {
        Point::new(MARGIN + (x - self.x_min) * self.sx, MARGIN + (self.y_max - y) * self.sy)
    }
}

fn render(params: &DiagramParams, ctx: &RenderContext) -> Result<RenderResult, TemplateError> {
    let x_min = required_number(params, "xMin")?;
    let x_max = required_number(params, "xMax")?;
    let y_min = required_number(params, "yMin")?;
    let y_max = required_number(params, "yMax")?;
    let step = positive_number(params, "step")?;

    if x_max <= x_min {
        return Err(TemplateError::invalid("xMax", "must be greater than xMin"));
    }
    if y_max <= y_min {
        return Err(TemplateError::invalid("yMax", "must be greater than yMin"));
    }

    let too_dense = || TemplateError::invalid("step", format!("too small for the range (at most {} ticks)", MAX_TICKS));
    let x_ticks = ticks(x_min, x_max, step, MAX_TICKS).ok_or_else(too_dense)?;
    let y_ticks = ticks(y_min, y_max, step, MAX_TICKS).ok_or_else(too_dense)?;

    let inner = SIZE - 2.0 * MARGIN;
    let frame = Frame {
        x_min,
        y_max,
        sx: inner / (x_max - x_min),
        sy: inner / (y_max - y_min),
    };

    let mut canvas = Canvas::new(ctx, SIZE, SIZE, "coordinate-grid");

    if params.visible("showGrid") {
        canvas.begin_group("grid");
        for &x in &x_ticks {
            let name = format!("grid-x{}", fmt_num(x, 2));
            canvas.rule(&name, frame.to_canvas(x, y_min), frame.to_canvas(x, y_max), class::GRID);
        }
        for &y in &y_ticks {
            let name = format!("grid-y{}", fmt_num(y, 2));
            canvas.rule(&name, frame.to_canvas(x_min, y), frame.to_canvas(x_max, y), class::GRID);
        }
        canvas.end_group();
    }

    // Axes sit on zero when it is in range, otherwise on the nearest edge
    let axis_x = 0.0_f64.clamp(x_min, x_max);
    let axis_y = 0.0_f64.clamp(y_min, y_max);

    if params.visible("showAxes") {
        canvas.begin_group("axes");
        let x_end = frame.to_canvas(x_max, axis_y);
        let y_end = frame.to_canvas(axis_x, y_max);
        canvas.rule("x-axis", frame.to_canvas(x_min, axis_y), x_end, class::AXIS);
        canvas.rule("y-axis", frame.to_canvas(axis_x, y_min), y_end, class::AXIS);
        canvas.text(
            "x-axis",
            params.label("xAxis"),
            Point::new(x_end.x + 14.0, x_end.y),
            TextAnchor::Start,
            class::TEXT,
        );
        canvas.text(
            "y-axis",
            params.label("yAxis"),
            Point::new(y_end.x, y_end.y - 16.0),
            TextAnchor::Middle,
            class::TEXT,
        );

        if params.visible("showTickLabels") {
            for &x in x_ticks.iter().filter(|x| **x != axis_x) {
                let at = frame.to_canvas(x, axis_y);
                let text = fmt_num(x, 2);
                canvas.text(&format!("tick-x{}", text), &text, Point::new(at.x, at.y + 14.0), TextAnchor::Middle, class::TEXT_SIDE);
            }
            for &y in y_ticks.iter().filter(|y| **y != axis_y) {
                let at = frame.to_canvas(axis_x, y);
                let text = fmt_num(y, 2);
                canvas.text(&format!("tick-y{}", text), &text, Point::new(at.x - 8.0, at.y), TextAnchor::End, class::TEXT_SIDE);
            }
        }
        canvas.end_group();
    }

    canvas.begin_group("points");
    for name in params.positions.keys() {
        let Some(p) = params.point(name) else {
            canvas.warn(format!("Point {} has no numeric coordinates and was skipped", name));
            continue;
        };
        if p.x < x_min || p.x > x_max || p.y < y_min || p.y > y_max {
            canvas.warn(format!(
                "Point {} ({}, {}) lies outside the grid",
                name,
                fmt_num(p.x, 2),
                fmt_num(p.y, 2)
            ));
            continue;
        }

        let at = frame.to_canvas(p.x, p.y);
        canvas.point(name, at);

        let label = match params.labels.get(name) {
            Some(text) => text.as_str(),
            None => name.as_str(),
        };
        let text = if params.visible("showCoordinates") {
            format!("{}({}, {})", label, fmt_num(p.x, 2), fmt_num(p.y, 2))
        } else {
            label.to_string()
        };
        canvas.text(name, &text, Point::new(at.x + 8.0, at.y - 14.0), TextAnchor::Start, class::TEXT);
    }
    canvas.end_group();

    Ok(canvas.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::merge_with_defaults;

    fn render_with(params: DiagramParams) -> Result<RenderResult, TemplateError> {
        let merged = merge_with_defaults(&params, &template().schema);
        render(&merged, &RenderContext::default())
    }

    #[test]
    fn test_default_point_is_plotted() {
        let result = render_with(DiagramParams::new()).expect("renders");
        assert_eq!((result.width, result.height), (480.0, 480.0));
        // (2, 3) on a -5..5 grid: x = 40 + 7 * 40, y = 40 + 2 * 40
        assert!(result.svg.contains(r#"id="pt:P" class="diagram-point" cx="320" cy="120""#));
        assert!(result.svg.contains(">P(2, 3)</text>"));
        assert!(result.svg.contains(r#"id="ln:x-axis""#));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_extra_points_are_plotted() {
        let params = DiagramParams::new()
            .with_position("Q", -1.0, -2.0)
            .with_label("Q", "Q");
        let result = render_with(params).expect("renders");
        assert!(result.svg.contains(r#"id="pt:Q""#));
        assert!(result.svg.contains(">Q(-1, -2)</text>"));
    }

    #[test]
    fn test_point_outside_grid_warns() {
        let params = DiagramParams::new().with_position("P", 7.0, 3.0);
        let result = render_with(params).expect("renders");
        assert_eq!(result.warnings, vec!["Point P (7, 3) lies outside the grid"]);
        assert!(!result.svg.contains("pt:P"));
    }

    #[test]
    fn test_inverted_range_is_an_error() {
        let params = DiagramParams::new().with_value("xMin", 5.0).with_value("xMax", -5.0);
        let err = render_with(params).expect_err("fails");
        assert_eq!(err, TemplateError::invalid("xMax", "must be greater than xMin"));
    }

    #[test]
    fn test_dense_ticks_are_rejected() {
        let params = DiagramParams::new().with_value("step", 0.1);
        assert!(render_with(params).is_err());
    }
}
