//! Triangle from three side lengths

use crate::params::{DiagramParams, LabelSpec, ParamSchema, Point, ValueSpec};
use crate::renderer::geometry::{angle_arc, centroid, outward};
use crate::renderer::{Canvas, RenderContext, RenderResult};
use crate::template::{Template, TemplateError};

use super::{degrees, fit_to_canvas, label_or, measure, positive_number};

pub const ID: &str = "math.geometry.triangle.v1";

const WIDTH: f64 = 500.0;
const HEIGHT: f64 = 420.0;

/// Angles within this many degrees of 90 get a square corner mark
const RIGHT_ANGLE_TOLERANCE: f64 = 0.05;

pub fn template() -> Template {
    let schema = ParamSchema::new()
        .label("A", LabelSpec::with_default("A").max_len(3))
        .label("B", LabelSpec::with_default("B").max_len(3))
        .label("C", LabelSpec::with_default("C").max_len(3))
        .label("a", LabelSpec::default().max_len(12))
        .label("b", LabelSpec::default().max_len(12))
        .label("c", LabelSpec::default().max_len(12))
        .value("a", ValueSpec::number(3.0).range(0.1, 1000.0).mark_required())
        .value("b", ValueSpec::number(4.0).range(0.1, 1000.0).mark_required())
        .value("c", ValueSpec::number(5.0).range(0.1, 1000.0).mark_required())
        .value("unit", ValueSpec::text("cm"))
        .flag("showVertexLabels", true)
        .flag("showSideLengths", true)
        .flag("showAngles", false)
        .flag("showRightAngle", true);

    Template::new(ID, "Triangle", "geometry", schema, render)
}

/// Vertex positions with A at the origin and B on the positive x axis (y up)
///
/// Side `a` is opposite A (BC), `b` opposite B (CA), `c` opposite C (AB).
pub(crate) fn solve_sss(a: f64, b: f64, c: f64) -> Result<[Point; 3], TemplateError> {
    if a + b <= c || a + c <= b || b + c <= a {
        return Err(TemplateError::geometry(format!(
            "sides {}, {}, {} cannot form a triangle",
            a, b, c
        )));
    }
    let cos_a = ((b * b + c * c - a * a) / (2.0 * b * c)).clamp(-1.0, 1.0);
    let angle_a = cos_a.acos();
    Ok([
        Point::new(0.0, 0.0),
        Point::new(c, 0.0),
        Point::new(b * angle_a.cos(), b * angle_a.sin()),
    ])
}

fn render(params: &DiagramParams, ctx: &RenderContext) -> Result<RenderResult, TemplateError> {
    let a = positive_number(params, "a")?;
    let b = positive_number(params, "b")?;
    let c = positive_number(params, "c")?;
    let unit = params.text("unit");

    let model = solve_sss(a, b, c)?;
    let fitted = fit_to_canvas(&model, WIDTH, HEIGHT, 70.0);
    let [pa, pb, pc] = [fitted[0], fitted[1], fitted[2]];
    let center = centroid(&fitted);

    let mut canvas = Canvas::new(ctx, WIDTH, HEIGHT, "triangle");

    canvas.begin_group("sides");
    canvas.segment("AB", pa, pb);
    canvas.segment("BC", pb, pc);
    canvas.segment("CA", pc, pa);
    canvas.end_group();

    // vertex, the two neighbours, label key
    let corners = [(pa, pb, pc, "A"), (pb, pc, pa, "B"), (pc, pa, pb, "C")];

    canvas.begin_group("angles");
    for (vertex, p1, p2, name) in corners {
        let arc = angle_arc(vertex, p1, p2, 28.0);
        let is_right = (arc.degrees() - 90.0).abs() < RIGHT_ANGLE_TOLERANCE;
        if is_right && params.visible("showRightAngle") {
            canvas.right_angle(&format!("right-{}", name), vertex, p1, p2, 16.0);
        } else if params.visible("showAngles") {
            let arc = canvas.angle_arc(name, vertex, p1, p2, 28.0);
            canvas.angle_label(name, &degrees(arc.degrees()), vertex, &arc);
        }
    }
    canvas.end_group();

    if params.visible("showSideLengths") {
        canvas.begin_group("side-lengths");
        let sides = [("c", pa, pb, c), ("a", pb, pc, a), ("b", pc, pa, b)];
        for (name, from, to, length) in sides {
            let text = label_or(params, name, || measure(length, &unit));
            canvas.side_label(&format!("side-{}", name), &text, from, to, center);
        }
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::merge_with_defaults;

    fn render_with(params: DiagramParams) -> Result<RenderResult, TemplateError> {
        let merged = merge_with_defaults(&params, &template().schema);
        render(&merged, &RenderContext::default())
    }

    #[test]
    fn test_default_is_right_triangle() {
        let result = render_with(DiagramParams::new()).expect("renders");
        assert_eq!((result.width, result.height), (500.0, 420.0));
        assert!(result.svg.contains(r#"id="mk:right-C""#));
        assert!(result.svg.contains(r#"id="pt:A""#));
        assert!(result.svg.contains(">5 cm</text>"));
    }

    #[test]
    fn test_impossible_sides_fail() {
        let params = DiagramParams::new()
            .with_value("a", 1.0)
            .with_value("b", 2.0)
            .with_value("c", 10.0);
        let err = render_with(params).expect_err("should fail");
        assert_eq!(err.to_string(), "sides 1, 2, 10 cannot form a triangle");
    }

    #[test]
    fn test_angle_labels_when_enabled() {
        let params = DiagramParams::new()
            .with_value("a", 5.0)
            .with_value("b", 5.0)
            .with_value("c", 5.0)
            .with_flag("showAngles", true);
        let result = render_with(params).expect("renders");
        assert!(result.svg.contains(r#"id="arc:A""#));
        assert!(result.svg.contains(">60°</text>"));
        assert!(!result.svg.contains("mk:right"));
    }

    #[test]
    fn test_side_label_override() {
        let params = DiagramParams::new().with_label("c", "x");
        let result = render_with(params).expect("renders");
        assert!(result.svg.contains(">x</text>"));
        assert!(!result.svg.contains(">5 cm</text>"));
    }

    #[test]
    fn test_solve_sss_places_c_above_ab() {
        let [a, b, c] = solve_sss(3.0, 4.0, 5.0).expect("valid");
        assert_eq!(a, Point::new(0.0, 0.0));
        assert_eq!(b, Point::new(5.0, 0.0));
        assert!(c.y > 0.0);
        assert!((c.x.hypot(c.y) - 4.0).abs() < 1e-9);
    }
}
