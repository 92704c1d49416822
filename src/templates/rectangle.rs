//! Rectangle with dimensions, right angles and an optional diagonal

use crate::params::{DiagramParams, LabelSpec, ParamSchema, Point, ValueSpec};
use crate::renderer::geometry::{centroid, distance, lerp, outward};
use crate::renderer::{Canvas, RenderContext, RenderResult};
use crate::template::{Template, TemplateError};

use super::{fit_to_canvas, label_or, measure, positive_number};

pub const ID: &str = "math.geometry.rectangle.v1";

const WIDTH: f64 = 500.0;
const HEIGHT: f64 = 380.0;

pub fn template() -> Template {
    let schema = ParamSchema::new()
        .label("A", LabelSpec::with_default("A").max_len(3))
        .label("B", LabelSpec::with_default("B").max_len(3))
        .label("C", LabelSpec::with_default("C").max_len(3))
        .label("D", LabelSpec::with_default("D").max_len(3))
        .label("width", LabelSpec::default().max_len(12))
        .label("height", LabelSpec::default().max_len(12))
        .label("diagonal", LabelSpec::default().max_len(12))
        .value("width", ValueSpec::number(6.0).range(0.1, 1000.0).mark_required())
        .value("height", ValueSpec::number(4.0).range(0.1, 1000.0).mark_required())
        .value("unit", ValueSpec::text("cm"))
        .flag("showVertexLabels", true)
        .flag("showDimensions", true)
        .flag("showRightAngles", true)
        .flag("showDiagonal", false)
        .flag("showEqualSides", false);

    Template::new(ID, "Rectangle", "geometry", schema, render)
}

fn render(params: &DiagramParams, ctx: &RenderContext) -> Result<RenderResult, TemplateError> {
    let w = positive_number(params, "width")?;
    let h = positive_number(params, "height")?;
    let unit = params.text("unit");

    let model = [
        Point::new(0.0, 0.0),
        Point::new(w, 0.0),
        Point::new(w, h),
        Point::new(0.0, h),
    ];
    let fitted = fit_to_canvas(&model, WIDTH, HEIGHT, 70.0);
    let [a, b, c, d] = [fitted[0], fitted[1], fitted[2], fitted[3]];
    let center = centroid(&fitted);

    let mut canvas = Canvas::new(ctx, WIDTH, HEIGHT, "rectangle");

    canvas.begin_group("sides");
    canvas.segment("AB", a, b);
    canvas.segment("BC", b, c);
    canvas.segment("CD", c, d);
    canvas.segment("DA", d, a);
    canvas.end_group();

    if params.visible("showDiagonal") {
        canvas.hidden_segment("AC", a, c);
        let text = label_or(params, "diagonal", || measure(w.hypot(h), &unit));
        // Offset along the diagonal so the label does not sit on the centre
        let at = lerp(a, c, 0.35);
        canvas.side_label("diagonal", &text, a, at, d);
    }

    let corners = [(a, b, d, "A"), (b, c, a, "B"), (c, d, b, "C"), (d, a, c, "D")];

    if params.visible("showRightAngles") {
        canvas.begin_group("right-angles");
        for (vertex, p1, p2, name) in corners {
            let size = 14.0_f64.min(distance(vertex, p1) / 3.0).min(distance(vertex, p2) / 3.0);
            canvas.right_angle(&format!("right-{}", name), vertex, p1, p2, size);
        }
        canvas.end_group();
    }

    if params.visible("showEqualSides") {
        canvas.begin_group("equal-marks");
        canvas.equal_ticks("AB", a, b, 1);
        canvas.equal_ticks("CD", c, d, 1);
        canvas.equal_ticks("BC", b, c, 2);
        canvas.equal_ticks("DA", d, a, 2);
        canvas.end_group();
    }

    if params.visible("showDimensions") {
        canvas.begin_group("dimensions");
        let width_text = label_or(params, "width", || measure(w, &unit));
        let height_text = label_or(params, "height", || measure(h, &unit));
        canvas.side_label("width", &width_text, a, b, center);
        canvas.side_label("height", &height_text, b, c, center);
        canvas.end_group();
    }

    canvas.begin_group("vertices");
    for (vertex, _, _, name) in corners {
        canvas.point(name, vertex);
        if params.visible("showVertexLabels") {
            canvas.label(name, params.label(name), outward(vertex, center, 22.0));
        }
    }
    canvas.end_group();

    Ok(canvas.finish())
}
