//! Vertical bar chart from `;`-separated categories and frequencies

use crate::params::{DiagramParams, LabelSpec, ParamSchema, Point, ValueSpec};
use crate::renderer::canvas::class;
use crate::renderer::geometry::fmt_num;
use crate::renderer::{Canvas, IdPrefix, RenderContext, RenderResult, TextAnchor};
use crate::template::{Template, TemplateError};

use super::split_list;

pub const ID: &str = "math.statistics.bar_chart.v1";

const WIDTH: f64 = 560.0;
const HEIGHT: f64 = 400.0;
const LEFT: f64 = 70.0;
const RIGHT: f64 = 30.0;
const TOP: f64 = 50.0;
const BOTTOM: f64 = 60.0;

pub fn template() -> Template {
    let schema = ParamSchema::new()
        .label("title", LabelSpec::default().max_len(60))
        .label("xAxis", LabelSpec::with_default("Category").max_len(30))
        .label("yAxis", LabelSpec::with_default("Frequency").max_len(30))
        .value("categories", ValueSpec::text("A;B;C;D").mark_required())
        .value("frequencies", ValueSpec::text("4;7;3;5").mark_required())
        .value("yMax", ValueSpec::number(0.0).min(0.0))
        .flag("showValues", false)
        .flag("showGrid", true);

    Template::new(ID, "Bar chart", "statistics", schema, render)
}

/// Parse frequencies, one per category
pub(crate) fn parse_frequencies(raw: &str, expected: usize) -> Result<Vec<f64>, TemplateError> {
    let items = split_list(raw);
    if items.len() != expected {
        return Err(TemplateError::invalid(
            "frequencies",
            format!("expected {} values, got {}", expected, items.len()),
        ));
    }
    items
        .iter()
        .map(|item| {
            let value: f64 = item
                .parse()
                .map_err(|_| TemplateError::invalid("frequencies", format!("\"{}\" is not a number", item)))?;
            if value < 0.0 || !value.is_finite() {
                return Err(TemplateError::invalid(
                    "frequencies",
                    format!("\"{}\" must be a non-negative number", item),
                ));
            }
            Ok(value)
        })
        .collect()
}

/// Round an axis maximum up to 1, 2 or 5 times a power of ten, with its gridline step
fn nice_axis(max: f64) -> (f64, f64) {
    if max <= 0.0 {
        return (1.0, 1.0);
    }
    let raw_step = max / 5.0;
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let step = [1.0, 2.0, 5.0, 10.0]
        .into_iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw_step)
        .unwrap_or(10.0 * magnitude);
    ((max / step).ceil() * step, step)
}

fn render(params: &DiagramParams, ctx: &RenderContext) -> Result<RenderResult, TemplateError> {
    let categories = split_list(&params.text("categories"));
    if categories.is_empty() {
        return Err(TemplateError::invalid("categories", "at least one category is required"));
    }
    let frequencies = parse_frequencies(&params.text("frequencies"), categories.len())?;

    let data_max = frequencies.iter().copied().fold(0.0, f64::max);
    let requested = params.number_or("yMax", 0.0);
    let mut warnings = vec![];
    let (y_max, step) = if requested > 0.0 {
        if requested < data_max {
            warnings.push(format!(
                "yMax {} is below the largest frequency {}; bars are clipped",
                fmt_num(requested, 2),
                fmt_num(data_max, 2)
            ));
        }
        nice_axis(requested)
    } else {
        nice_axis(data_max)
    };

    let plot_w = WIDTH - LEFT - RIGHT;
    let plot_h = HEIGHT - TOP - BOTTOM;
    let base_y = TOP + plot_h;
    let y_of = |v: f64| base_y - v.min(y_max) / y_max * plot_h;

    let mut canvas = Canvas::new(ctx, WIDTH, HEIGHT, "bar-chart");
    for w in warnings {
        canvas.warn(w);
    }

    canvas.label("title", params.label("title"), Point::new(WIDTH / 2.0, TOP / 2.0));

    canvas.begin_group("axes");
    let steps = (y_max / step).round() as usize;
    for i in 0..=steps {
        let v = i as f64 * step;
        let y = y_of(v);
        let text = fmt_num(v, 2);
        if i > 0 && params.visible("showGrid") {
            canvas.rule(&format!("grid{}", text), Point::new(LEFT, y), Point::new(LEFT + plot_w, y), class::GRID);
        }
        canvas.text(&format!("tick{}", text), &text, Point::new(LEFT - 8.0, y), TextAnchor::End, class::TEXT_SIDE);
    }
    canvas.rule("x-axis", Point::new(LEFT, base_y), Point::new(LEFT + plot_w, base_y), class::AXIS);
    canvas.rule("y-axis", Point::new(LEFT, base_y), Point::new(LEFT, TOP), class::AXIS);
    canvas.text(
        "x-axis",
        params.label("xAxis"),
        Point::new(LEFT + plot_w / 2.0, HEIGHT - 16.0),
        TextAnchor::Middle,
        class::TEXT,
    );
    let y_label_at = Point::new(18.0, TOP + plot_h / 2.0);
    let rotate = format!(
        r#" transform="rotate(-90 {} {})""#,
        fmt_num(y_label_at.x, 2),
        fmt_num(y_label_at.y, 2)
    );
    let y_label = params.label("yAxis");
    if !y_label.is_empty() {
        canvas.builder().add_text(
            Some(&IdPrefix::Text.id("y-axis")),
            y_label,
            y_label_at,
            TextAnchor::Middle,
            Some(class::TEXT),
            &rotate,
        );
    }
    canvas.end_group();

    canvas.begin_group("bars");
    let slot = plot_w / categories.len() as f64;
    let bar_w = slot * 0.6;
    for (i, (category, value)) in categories.iter().zip(&frequencies).enumerate() {
        let x = LEFT + slot * i as f64 + (slot - bar_w) / 2.0;
        let top = y_of(*value);
        let id = IdPrefix::Bar.id(&i.to_string());
        canvas
            .builder()
            .add_rect(Some(&id), Point::new(x, top), bar_w, base_y - top, Some(class::BAR), "");
        canvas.text(
            &format!("category{}", i),
            category,
            Point::new(x + bar_w / 2.0, base_y + 16.0),
            TextAnchor::Middle,
            class::TEXT_SIDE,
        );
        if params.visible("showValues") {
            canvas.text(
                &format!("value{}", i),
                &fmt_num(*value, 2),
                Point::new(x + bar_w / 2.0, top - 10.0),
                TextAnchor::Middle,
                class::TEXT_SIDE,
            );
        }
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
    fn test_default_chart_has_one_bar_per_category() {
        let result = render_with(DiagramParams::new()).expect("renders");
        assert_eq!((result.width, result.height), (560.0, 400.0));
        for i in 0..4 {
            assert!(result.svg.contains(&format!(r#"id="bar:{}""#, i)));
        }
        assert!(!result.svg.contains(r#"id="bar:4""#));
        assert!(result.svg.contains(">Frequency</text>"));
    }

    #[test]
    fn test_mismatched_lengths_fail() {
        let params = DiagramParams::new().with_value("frequencies", "1;2");
        let err = render_with(params).expect_err("fails");
        assert_eq!(
            err.to_string(),
            "invalid parameter frequencies: expected 4 values, got 2"
        );
    }

    #[test]
    fn test_non_numeric_frequency_fails() {
        let err = parse_frequencies("1;x", 2).expect_err("fails");
        assert_eq!(err, TemplateError::invalid("frequencies", "\"x\" is not a number"));
    }

    #[test]
    fn test_low_y_max_warns() {
        let result = render_with(DiagramParams::new().with_value("yMax", 5.0)).expect("renders");
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("below the largest frequency 7"));
    }

    #[test]
    fn test_nice_axis() {
        assert_eq!(nice_axis(7.0), (8.0, 2.0));
        assert_eq!(nice_axis(100.0), (100.0, 20.0));
        assert_eq!(nice_axis(0.0), (1.0, 1.0));
    }

    #[test]
    fn test_value_labels() {
        let result = render_with(DiagramParams::new().with_flag("showValues", true)).expect("renders");
        assert!(result.svg.contains(r#"id="txt:value1""#));
        assert!(result.svg.contains(">7</text>"));
    }
}
