//! Number line with a marked point and optional inequality shading

use crate::params::{DiagramParams, LabelSpec, ParamSchema, Point, ValueSpec};
use crate::renderer::canvas::class;
use crate::renderer::geometry::{arrow_head, fmt_num};
use crate::renderer::{Canvas, IdPrefix, RenderContext, RenderResult, TextAnchor};
use crate::template::{Template, TemplateError};

use super::{positive_number, required_number, ticks};

pub const ID: &str = "math.number.number_line.v1";

const WIDTH: f64 = 600.0;
const HEIGHT: f64 = 160.0;
const MARGIN: f64 = 40.0;
const AXIS_Y: f64 = 90.0;
const MAX_TICKS: usize = 41;

pub fn template() -> Template {
    let schema = ParamSchema::new()
        .label("point", LabelSpec::with_default("P").max_len(3))
        .value("min", ValueSpec::number(-5.0))
        .value("max", ValueSpec::number(5.0))
        .value("step", ValueSpec::number(1.0).min(0.01))
        .value("point", ValueSpec::number(2.0))
        .value("shade", ValueSpec::text("none"))
        .flag("showPoint", true)
        .flag("openPoint", false)
        .flag("showTickLabels", true)
        .flag("showArrows", true);

    Template::new(ID, "Number line", "number", schema, render)
}

/// Which side of the point is shaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shade {
    None,
    Left,
    Right,
}

impl Shade {
    fn parse(s: &str) -> Result<Self, TemplateError> {
        match s.trim() {
            "" | "none" => Ok(Shade::None),
            "left" => Ok(Shade::Left),
            "right" => Ok(Shade::Right),
            other => Err(TemplateError::invalid(
                "shade",
                format!("expected none, left or right (got \"{}\")", other),
            )),
        }
    }
}

fn render(params: &DiagramParams, ctx: &RenderContext) -> Result<RenderResult, TemplateError> {
    let min = required_number(params, "min")?;
    let max = required_number(params, "max")?;
    let step = positive_number(params, "step")?;
    let shade = Shade::parse(&params.text("shade"))?;

    if max <= min {
        return Err(TemplateError::invalid("max", "must be greater than min"));
    }
    let marks = ticks(min, max, step, MAX_TICKS).ok_or_else(|| {
        TemplateError::invalid("step", format!("too small for the range (at most {} ticks)", MAX_TICKS))
    })?;

    let scale = (WIDTH - 2.0 * MARGIN) / (max - min);
    let x_of = |v: f64| MARGIN + (v - min) * scale;

    let mut canvas = Canvas::new(ctx, WIDTH, HEIGHT, "number-line");

    let left = Point::new(MARGIN - 20.0, AXIS_Y);
    let right = Point::new(WIDTH - MARGIN + 20.0, AXIS_Y);
    canvas.rule("axis", left, right, class::AXIS);
    if params.visible("showArrows") {
        canvas.polygon(IdPrefix::Mark, "arrow-right", &arrow_head(left, right, 10.0), class::POINT);
        canvas.polygon(IdPrefix::Mark, "arrow-left", &arrow_head(right, left, 10.0), class::POINT);
    }

    canvas.begin_group("ticks");
    for &v in &marks {
        let x = x_of(v);
        let text = fmt_num(v, 2);
        canvas.rule(
            &format!("tick{}", text),
            Point::new(x, AXIS_Y - 8.0),
            Point::new(x, AXIS_Y + 8.0),
            class::AXIS,
        );
        if params.visible("showTickLabels") {
            canvas.text(
                &format!("tick{}", text),
                &text,
                Point::new(x, AXIS_Y + 26.0),
                TextAnchor::Middle,
                class::TEXT_SIDE,
            );
        }
    }
    canvas.end_group();

    if params.visible("showPoint") {
        let value = required_number(params, "point")?;
        if value < min || value > max {
            canvas.warn(format!(
                "Point {} lies outside the number line",
                fmt_num(value, 2)
            ));
        } else {
            let at = Point::new(x_of(value), AXIS_Y);

            let shaded_to = match shade {
                Shade::None => None,
                Shade::Left => Some(Point::new(left.x, AXIS_Y)),
                Shade::Right => Some(Point::new(right.x, AXIS_Y)),
            };
            if let Some(end) = shaded_to {
                canvas.builder().add_line(
                    Some(&IdPrefix::Line.id("shade")),
                    at,
                    end,
                    Some(class::LINE),
                    r#" stroke-width="5""#,
                );
            }

            let radius = 7.0;
            let fill = if params.visible("openPoint") {
                r#" fill="white""#
            } else {
                ""
            };
            canvas.builder().add_circle(
                Some(&IdPrefix::Point.id("point")),
                at,
                radius,
                Some(class::LINE),
                fill,
            );
            canvas.label("point", params.label("point"), Point::new(at.x, AXIS_Y - 26.0));
        }
    }

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
    fn test_default_number_line() {
        let result = render_with(DiagramParams::new()).expect("renders");
        assert_eq!((result.width, result.height), (600.0, 160.0));
        assert!(result.svg.contains(r#"id="ln:tick-5""#));
        assert!(result.svg.contains(r#"id="ln:tick5""#));
        // 2 on a -5..5 line: 40 + 7 * 52
        assert!(result.svg.contains(r#"id="pt:point" class="diagram-line" cx="404" cy="90""#));
        assert!(!result.svg.contains("ln:shade"));
    }

    #[test]
    fn test_open_point_with_right_shading() {
        let params = DiagramParams::new()
            .with_flag("openPoint", true)
            .with_value("shade", "right");
        let result = render_with(params).expect("renders");
        assert!(result.svg.contains(r#"id="ln:shade""#));
        assert!(result.svg.contains(r#"fill="white""#));
    }

    #[test]
    fn test_unknown_shade_is_an_error() {
        let err = render_with(DiagramParams::new().with_value("shade", "up")).expect_err("fails");
        assert!(err.to_string().contains("expected none, left or right"));
    }

    #[test]
    fn test_point_off_the_line_warns() {
        let result = render_with(DiagramParams::new().with_value("point", 9.0)).expect("renders");
        assert_eq!(result.warnings, vec!["Point 9 lies outside the number line"]);
    }
}
