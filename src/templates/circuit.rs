//! Series circuit: a cell driving resistors around a single loop

use crate::params::{DiagramParams, LabelSpec, ParamSchema, Point, ValueSpec};
use crate::renderer::canvas::class;
use crate::renderer::geometry::{arrow_head, fmt_num, PathData};
use crate::renderer::{Canvas, IdPrefix, RenderContext, RenderResult, TextAnchor};
use crate::template::{Template, TemplateError};

use super::{positive_number, split_list};

pub const ID: &str = "science.physics.circuit_series.v1";

const WIDTH: f64 = 560.0;
const HEIGHT: f64 = 360.0;
const LEFT: f64 = 80.0;
const RIGHT: f64 = 480.0;
const TOP: f64 = 90.0;
const BOTTOM: f64 = 280.0;

const RESISTOR_LEN: f64 = 60.0;
const ZIGZAG_PEAKS: usize = 6;

pub fn template() -> Template {
    let schema = ParamSchema::new()
        .label("cell", LabelSpec::default().max_len(12))
        .value("voltage", ValueSpec::number(12.0).range(0.1, 1000.0).mark_required())
        .value("resistors", ValueSpec::text("4;6").mark_required())
        .flag("showValues", true)
        .flag("showCurrent", true);

    Template::new(ID, "Series circuit", "physics", schema, render)
}

pub(crate) fn parse_resistances(raw: &str) -> Result<Vec<f64>, TemplateError> {
    let items = split_list(raw);
    if items.is_empty() {
        return Err(TemplateError::invalid("resistors", "at least one resistor is required"));
    }
    items
        .iter()
        .map(|item| match item.parse::<f64>() {
            Ok(r) if r > 0.0 && r.is_finite() => Ok(r),
            _ => Err(TemplateError::invalid(
                "resistors",
                format!("\"{}\" is not a positive resistance", item),
            )),
        })
        .collect()
}

/// Zigzag resistor symbol between two points on a horizontal wire
fn zigzag(start: Point, len: f64) -> PathData {
    let step = len / (ZIGZAG_PEAKS as f64 + 1.0);
    let mut path = PathData::new().move_to(start);
    for i in 1..=ZIGZAG_PEAKS {
        let dy = if i % 2 == 1 { -10.0 } else { 10.0 };
        path = path.line_to(Point::new(start.x + step * i as f64, start.y + dy));
    }
    path.line_to(Point::new(start.x + len, start.y))
}

fn render(params: &DiagramParams, ctx: &RenderContext) -> Result<RenderResult, TemplateError> {
    let voltage = positive_number(params, "voltage")?;
    let resistors = parse_resistances(&params.text("resistors"))?;
    let total: f64 = resistors.iter().sum();
    let current = voltage / total;

    let span = RIGHT - LEFT;
    let needed = resistors.len() as f64 * (RESISTOR_LEN + 20.0);
    if needed > span {
        return Err(TemplateError::invalid(
            "resistors",
            format!("at most {} resistors fit in the loop", (span / (RESISTOR_LEN + 20.0)) as usize),
        ));
    }

    let mut canvas = Canvas::new(ctx, WIDTH, HEIGHT, "circuit");

    // Top wire carries the resistors, evenly spaced
    canvas.begin_group("resistors");
    let slot = span / resistors.len() as f64;
    let mut cursor = Point::new(LEFT, TOP);
    for (i, r) in resistors.iter().enumerate() {
        let start_x = LEFT + slot * i as f64 + (slot - RESISTOR_LEN) / 2.0;
        let start = Point::new(start_x, TOP);
        canvas.segment(&format!("wire-top{}", i), cursor, start);
        canvas.path(IdPrefix::Path, &format!("R{}", i + 1), &zigzag(start, RESISTOR_LEN), class::LINE);
        if params.visible("showValues") {
            canvas.text(
                &format!("R{}", i + 1),
                &format!("R{} = {} Ω", i + 1, fmt_num(*r, 2)),
                Point::new(start_x + RESISTOR_LEN / 2.0, TOP - 28.0),
                TextAnchor::Middle,
                class::TEXT_SIDE,
            );
        }
        cursor = Point::new(start_x + RESISTOR_LEN, TOP);
    }
    canvas.segment("wire-top-end", cursor, Point::new(RIGHT, TOP));
    canvas.end_group();

    canvas.segment("wire-right", Point::new(RIGHT, TOP), Point::new(RIGHT, BOTTOM));

    // Cell on the bottom wire: long plate positive, short plate negative
    let mid_x = (LEFT + RIGHT) / 2.0;
    canvas.begin_group("cell");
    canvas.segment("wire-bottom-right", Point::new(RIGHT, BOTTOM), Point::new(mid_x + 6.0, BOTTOM));
    canvas.segment("cell-positive", Point::new(mid_x - 6.0, BOTTOM - 22.0), Point::new(mid_x - 6.0, BOTTOM + 22.0));
    canvas.segment("cell-negative", Point::new(mid_x + 6.0, BOTTOM - 11.0), Point::new(mid_x + 6.0, BOTTOM + 11.0));
    canvas.segment("wire-bottom-left", Point::new(mid_x - 6.0, BOTTOM), Point::new(LEFT, BOTTOM));
    let cell_text = if params.label("cell").is_empty() {
        format!("{} V", fmt_num(voltage, 2))
    } else {
        params.label("cell").to_string()
    };
    canvas.text("cell", &cell_text, Point::new(mid_x, BOTTOM + 40.0), TextAnchor::Middle, class::TEXT_SIDE);
    canvas.end_group();

    canvas.segment("wire-left", Point::new(LEFT, BOTTOM), Point::new(LEFT, TOP));

    if params.visible("showCurrent") {
        // Conventional current leaves the positive plate and climbs the left wire
        let from = Point::new(LEFT, (TOP + BOTTOM) / 2.0 + 10.0);
        let tip = Point::new(LEFT, (TOP + BOTTOM) / 2.0 - 10.0);
        canvas.polygon(IdPrefix::Mark, "current", &arrow_head(from, tip, 12.0), class::POINT);
        canvas.text(
            "current",
            &format!("I = {} A", fmt_num(current, 2)),
            Point::new(LEFT + 16.0, (TOP + BOTTOM) / 2.0),
            TextAnchor::Start,
            class::TEXT_SIDE,
        );
    }

    Ok(canvas.finish())
}
