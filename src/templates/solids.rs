//! Pseudo-3D solids drawn with a fixed oblique depth offset

use crate::params::{DiagramParams, LabelSpec, ParamSchema, Point, ValueSpec};
use crate::renderer::canvas::class;
use crate::renderer::geometry::{midpoint, oblique, PathData, OBLIQUE_DX, OBLIQUE_DY};
use crate::renderer::{Canvas, IdPrefix, RenderContext, RenderResult, TextAnchor};
use crate::template::{Template, TemplateError};

use super::{label_or, measure, positive_number};

pub const CUBOID_ID: &str = "math.geometry.cuboid.v1";
pub const CYLINDER_ID: &str = "math.geometry.cylinder.v1";

const CUBOID_WIDTH: f64 = 500.0;
const CUBOID_HEIGHT: f64 = 420.0;
const CYLINDER_WIDTH: f64 = 420.0;
const CYLINDER_HEIGHT: f64 = 460.0;

/// Ellipse height as a fraction of its width
const ELLIPSE_RATIO: f64 = 0.3;

pub fn cuboid_template() -> Template {
    let mut schema = ParamSchema::new()
        .label("length", LabelSpec::default().max_len(12))
        .label("width", LabelSpec::default().max_len(12))
        .label("height", LabelSpec::default().max_len(12))
        .value("length", ValueSpec::number(6.0).range(0.1, 1000.0).mark_required())
        .value("width", ValueSpec::number(3.0).range(0.1, 1000.0).mark_required())
        .value("height", ValueSpec::number(4.0).range(0.1, 1000.0).mark_required())
        .value("unit", ValueSpec::text("cm"))
        .flag("showHiddenEdges", true)
        .flag("showDimensions", true)
        .flag("showVertexLabels", false);
    for name in ["A", "B", "C", "D", "E", "F", "G", "H"] {
        schema = schema.label(name, LabelSpec::with_default(name).max_len(3));
    }

    Template::new(CUBOID_ID, "Cuboid", "geometry", schema, render_cuboid)
}

pub fn cylinder_template() -> Template {
    let schema = ParamSchema::new()
        .label("radius", LabelSpec::default().max_len(12))
        .label("height", LabelSpec::default().max_len(12))
        .value("radius", ValueSpec::number(3.0).range(0.1, 1000.0).mark_required())
        .value("height", ValueSpec::number(8.0).range(0.1, 1000.0).mark_required())
        .value("unit", ValueSpec::text("cm"))
        .flag("showHiddenEdges", true)
        .flag("showRadius", true)
        .flag("showHeight", true);

    Template::new(CYLINDER_ID, "Cylinder", "geometry", schema, render_cylinder)
}

fn render_cuboid(params: &DiagramParams, ctx: &RenderContext) -> Result<RenderResult, TemplateError> {
    let length = positive_number(params, "length")?;
    let width = positive_number(params, "width")?;
    let height = positive_number(params, "height")?;
    let unit = params.text("unit");

    // Fit the projected bounding box: length + offset across, height + offset up
    let extent_x = length + width * OBLIQUE_DX;
    let extent_y = height + width * OBLIQUE_DY;
    let scale = ((CUBOID_WIDTH - 140.0) / extent_x).min((CUBOID_HEIGHT - 120.0) / extent_y);
    let (l, w, h) = (length * scale, width * scale, height * scale);

    let left = (CUBOID_WIDTH - (l + w * OBLIQUE_DX)) / 2.0;
    let bottom = (CUBOID_HEIGHT + (h + w * OBLIQUE_DY)) / 2.0;

    // Front face A B C D (bottom-left, counter-clockwise), back face E F G H
    let a = Point::new(left, bottom);
    let b = Point::new(left + l, bottom);
    let c = Point::new(left + l, bottom - h);
    let d = Point::new(left, bottom - h);
    let [e, f, g, hh] = [a, b, c, d].map(|p| oblique(p, w));

    let mut canvas = Canvas::new(ctx, CUBOID_WIDTH, CUBOID_HEIGHT, "cuboid");

    canvas.begin_group("faces");
    canvas.polygon(IdPrefix::Face, "front", &[a, b, c, d], class::FACE);
    canvas.polygon(IdPrefix::Face, "top", &[d, c, g, hh], class::FACE);
    canvas.polygon(IdPrefix::Face, "side", &[b, f, g, c], class::FACE);
    canvas.end_group();

    if params.visible("showHiddenEdges") {
        canvas.begin_group("hidden-edges");
        canvas.hidden_segment("AE", a, e);
        canvas.hidden_segment("EF", e, f);
        canvas.hidden_segment("EH", e, hh);
        canvas.end_group();
    }

    if params.visible("showDimensions") {
        canvas.begin_group("dimensions");
        let length_text = label_or(params, "length", || measure(length, &unit));
        let width_text = label_or(params, "width", || measure(width, &unit));
        let height_text = label_or(params, "height", || measure(height, &unit));
        let mid_ab = midpoint(a, b);
        let mid_bf = midpoint(b, f);
        let mid_ad = midpoint(a, d);
        canvas.text("length", &length_text, Point::new(mid_ab.x, mid_ab.y + 22.0), TextAnchor::Middle, class::TEXT_SIDE);
        canvas.text("width", &width_text, Point::new(mid_bf.x + 12.0, mid_bf.y + 12.0), TextAnchor::Start, class::TEXT_SIDE);
        canvas.text("height", &height_text, Point::new(mid_ad.x - 12.0, mid_ad.y), TextAnchor::End, class::TEXT_SIDE);
        canvas.end_group();
    }

    if params.visible("showVertexLabels") {
        canvas.begin_group("vertices");
        let placed = [
            ("A", a, -12.0, 16.0),
            ("B", b, 12.0, 16.0),
            ("C", c, 12.0, 0.0),
            ("D", d, -12.0, 0.0),
            ("E", e, -12.0, -10.0),
            ("F", f, 14.0, 0.0),
            ("G", g, 12.0, -12.0),
            ("H", hh, -12.0, -12.0),
        ];
        for (name, p, dx, dy) in placed {
            canvas.label(name, params.label(name), Point::new(p.x + dx, p.y + dy));
        }
        canvas.end_group();
    }

    Ok(canvas.finish())
}

fn render_cylinder(params: &DiagramParams, ctx: &RenderContext) -> Result<RenderResult, TemplateError> {
    let radius = positive_number(params, "radius")?;
    let height = positive_number(params, "height")?;
    let unit = params.text("unit");

    let scale = ((CYLINDER_WIDTH - 140.0) / (2.0 * radius))
        .min((CYLINDER_HEIGHT - 120.0) / (height + 2.0 * radius * ELLIPSE_RATIO));
    let rx = radius * scale;
    let ry = rx * ELLIPSE_RATIO;
    let h = height * scale;

    let cx = CYLINDER_WIDTH / 2.0;
    let top_y = (CYLINDER_HEIGHT - h) / 2.0;
    let bottom_y = top_y + h;

    let mut canvas = Canvas::new(ctx, CYLINDER_WIDTH, CYLINDER_HEIGHT, "cylinder");

    canvas.builder().add_ellipse(
        Some(&IdPrefix::Face.id("top")),
        Point::new(cx, top_y),
        rx,
        ry,
        Some(class::FACE),
        "",
    );

    let left_top = Point::new(cx - rx, top_y);
    let right_top = Point::new(cx + rx, top_y);
    let left_bottom = Point::new(cx - rx, bottom_y);
    let right_bottom = Point::new(cx + rx, bottom_y);

    canvas.segment("left", left_top, left_bottom);
    canvas.segment("right", right_top, right_bottom);

    // Front half of the base bulges towards the viewer (down on screen)
    let front = PathData::new()
        .move_to(left_bottom)
        .ellipse_to(right_bottom, rx, ry, false, false);
    canvas.path(IdPrefix::Path, "base-front", &front, class::LINE);

    if params.visible("showHiddenEdges") {
        let back = PathData::new()
            .move_to(left_bottom)
            .ellipse_to(right_bottom, rx, ry, false, true);
        canvas.path(IdPrefix::Path, "base-back", &back, class::HIDDEN_LINE);
    }

    if params.visible("showRadius") {
        let center = Point::new(cx, top_y);
        canvas.point("center", center);
        canvas.segment("radius", center, right_top);
        let text = label_or(params, "radius", || measure(radius, &unit));
        canvas.text("radius", &text, Point::new(cx + rx / 2.0, top_y - 14.0), TextAnchor::Middle, class::TEXT_SIDE);
    }

    if params.visible("showHeight") {
        let text = label_or(params, "height", || measure(height, &unit));
        canvas.text(
            "height",
            &text,
            Point::new(cx + rx + 12.0, (top_y + bottom_y) / 2.0),
            TextAnchor::Start,
            class::TEXT_SIDE,
        );
    }

    Ok(canvas.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::merge_with_defaults;

    fn render_cuboid_with(params: DiagramParams) -> RenderResult {
        let merged = merge_with_defaults(&params, &cuboid_template().schema);
        render_cuboid(&merged, &RenderContext::default()).expect("renders")
    }

    fn render_cylinder_with(params: DiagramParams) -> RenderResult {
        let merged = merge_with_defaults(&params, &cylinder_template().schema);
        render_cylinder(&merged, &RenderContext::default()).expect("renders")
    }

    #[test]
    fn test_cuboid_faces_and_dimensions() {
        let result = render_cuboid_with(DiagramParams::new());
        assert_eq!((result.width, result.height), (500.0, 420.0));
        for id in ["face:front", "face:top", "face:side", "ln:AE", "ln:EF", "ln:EH"] {
            assert!(result.svg.contains(&format!(r#"id="{}""#, id)), "missing {}", id);
        }
        assert!(result.svg.contains(">6 cm</text>"));
        assert!(result.svg.contains(">3 cm</text>"));
        assert!(result.svg.contains(">4 cm</text>"));
        assert!(!result.svg.contains("txt:A\""));
    }

    #[test]
    fn test_cuboid_without_hidden_edges() {
        let result = render_cuboid_with(DiagramParams::new().with_flag("showHiddenEdges", false));
        assert!(!result.svg.contains("diagram-line diagram-hidden\""));
        assert!(!result.svg.contains("ln:AE"));
    }

    #[test]
    fn test_cuboid_vertex_labels() {
        let result = render_cuboid_with(DiagramParams::new().with_flag("showVertexLabels", true));
        assert!(result.svg.contains(r#"id="txt:H""#));
    }

    #[test]
    fn test_cylinder_parts() {
        let result = render_cylinder_with(DiagramParams::new());
        assert_eq!((result.width, result.height), (420.0, 460.0));
        for id in ["face:top", "path:base-front", "path:base-back", "ln:radius"] {
            assert!(result.svg.contains(&format!(r#"id="{}""#, id)), "missing {}", id);
        }
        assert!(result.svg.contains(">8 cm</text>"));
    }

    #[test]
    fn test_cylinder_rejects_zero_height() {
        let merged = merge_with_defaults(
            &DiagramParams::new().with_value("height", 0.0),
            &cylinder_template().schema,
        );
        assert!(render_cylinder(&merged, &RenderContext::default()).is_err());
    }
}
