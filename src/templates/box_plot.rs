//! Box-and-whisker plot of a five-number summary

use crate::params::{DiagramParams, LabelSpec, ParamSchema, Point, ValueSpec};
use crate::renderer::canvas::class;
use crate::renderer::geometry::fmt_num;
use crate::renderer::{Canvas, IdPrefix, RenderContext, RenderResult, TextAnchor};
use crate::template::{Template, TemplateError};

use super::{positive_number, required_number, ticks};

pub const ID: &str = "math.statistics.box_plot.v1";

const WIDTH: f64 = 560.0;
const HEIGHT: f64 = 240.0;
const MARGIN: f64 = 40.0;
const BOX_TOP: f64 = 60.0;
const BOX_HEIGHT: f64 = 60.0;
const AXIS_Y: f64 = 170.0;

const SUMMARY: [&str; 5] = ["min", "q1", "median", "q3", "max"];

pub fn template() -> Template {
    let schema = ParamSchema::new()
        .label("title", LabelSpec::default().max_len(60))
        .value("min", ValueSpec::number(2.0).mark_required())
        .value("q1", ValueSpec::number(5.0).mark_required())
        .value("median", ValueSpec::number(8.0).mark_required())
        .value("q3", ValueSpec::number(11.0).mark_required())
        .value("max", ValueSpec::number(15.0).mark_required())
        .value("axisMin", ValueSpec::number(0.0))
        .value("axisMax", ValueSpec::number(20.0))
        .value("step", ValueSpec::number(2.0).min(0.01))
        .flag("showValues", true);

    Template::new(ID, "Box plot", "statistics", schema, render)
}

fn render(params: &DiagramParams, ctx: &RenderContext) -> Result<RenderResult, TemplateError> {
    let mut summary = [0.0; 5];
    for (slot, name) in summary.iter_mut().zip(SUMMARY) {
        *slot = required_number(params, name)?;
    }
    if summary.windows(2).any(|w| w[0] > w[1]) {
        return Err(TemplateError::geometry(
            "five-number summary must satisfy min <= q1 <= median <= q3 <= max",
        ));
    }
    let [min, q1, median, q3, max] = summary;

    let axis_min = required_number(params, "axisMin")?;
    let axis_max = required_number(params, "axisMax")?;
    let step = positive_number(params, "step")?;
    if axis_max <= axis_min {
        return Err(TemplateError::invalid("axisMax", "must be greater than axisMin"));
    }
    let marks = ticks(axis_min, axis_max, step, 41)
        .ok_or_else(|| TemplateError::invalid("step", "too small for the axis range"))?;

    let scale = (WIDTH - 2.0 * MARGIN) / (axis_max - axis_min);
    let x_of = |v: f64| MARGIN + (v.clamp(axis_min, axis_max) - axis_min) * scale;

    let mut canvas = Canvas::new(ctx, WIDTH, HEIGHT, "box-plot");
    if min < axis_min || max > axis_max {
        canvas.warn("Summary extends beyond the axis range and is clipped");
    }

    canvas.label("title", params.label("title"), Point::new(WIDTH / 2.0, 26.0));

    canvas.begin_group("axis");
    canvas.rule("axis", Point::new(MARGIN, AXIS_Y), Point::new(WIDTH - MARGIN, AXIS_Y), class::AXIS);
    for v in marks {
        let x = x_of(v);
        let text = fmt_num(v, 2);
        canvas.rule(&format!("tick{}", text), Point::new(x, AXIS_Y), Point::new(x, AXIS_Y + 6.0), class::AXIS);
        canvas.text(&format!("tick{}", text), &text, Point::new(x, AXIS_Y + 20.0), TextAnchor::Middle, class::TEXT_SIDE);
    }
    canvas.end_group();

    let mid_y = BOX_TOP + BOX_HEIGHT / 2.0;
    let bottom = BOX_TOP + BOX_HEIGHT;

    canvas.begin_group("plot");
    canvas.segment("whisker-low", Point::new(x_of(min), mid_y), Point::new(x_of(q1), mid_y));
    canvas.segment("whisker-high", Point::new(x_of(q3), mid_y), Point::new(x_of(max), mid_y));
    canvas.segment("cap-min", Point::new(x_of(min), BOX_TOP + 15.0), Point::new(x_of(min), bottom - 15.0));
    canvas.segment("cap-max", Point::new(x_of(max), BOX_TOP + 15.0), Point::new(x_of(max), bottom - 15.0));
    canvas.builder().add_rect(
        Some(&IdPrefix::Bar.id("box")),
        Point::new(x_of(q1), BOX_TOP),
        x_of(q3) - x_of(q1),
        BOX_HEIGHT,
        Some(class::BAR),
        "",
    );
    canvas.segment("median", Point::new(x_of(median), BOX_TOP), Point::new(x_of(median), bottom));
    canvas.end_group();

    if params.visible("showValues") {
        canvas.begin_group("values");
        for (name, v) in SUMMARY.into_iter().zip(summary) {
            canvas.text(name, &fmt_num(v, 2), Point::new(x_of(v), BOX_TOP - 12.0), TextAnchor::Middle, class::TEXT_SIDE);
        }
        canvas.end_group();
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
    fn test_default_box_plot() {
        let result = render_with(DiagramParams::new()).expect("renders");
        assert_eq!((result.width, result.height), (560.0, 240.0));
        // q1 = 5 on a 0..20 axis: 40 + 5 * 24
        assert!(result.svg.contains(r#"id="bar:box" class="diagram-bar" x="160" y="60" width="144""#));
        assert!(result.svg.contains(r#"id="ln:median""#));
        assert!(result.svg.contains(r#"id="txt:median""#));
    }

    #[test]
    fn test_unordered_summary_fails() {
        let err = render_with(DiagramParams::new().with_value("q1", 9.0)).expect_err("fails");
        assert!(matches!(err, TemplateError::InvalidGeometry { .. }));
    }

    #[test]
    fn test_clipped_summary_warns() {
        let result = render_with(DiagramParams::new().with_value("max", 25.0)).expect("renders");
        assert_eq!(result.warnings, vec!["Summary extends beyond the axis range and is clipped"]);
    }
}
