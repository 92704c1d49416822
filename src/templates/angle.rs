//! A single angle between two rays, including reflex angles

use crate::params::{DiagramParams, LabelSpec, ParamSchema, Point, ValueSpec};
use crate::renderer::geometry::{polar, PathData};
use crate::renderer::canvas::class;
use crate::renderer::{Canvas, IdPrefix, RenderContext, RenderResult, TextAnchor};
use crate::template::{Template, TemplateError};

use super::{degrees, label_or, required_number};

pub const ID: &str = "math.geometry.angle.v1";

const WIDTH: f64 = 420.0;
const HEIGHT: f64 = 320.0;
const ARM: f64 = 170.0;
const ARC_RADIUS: f64 = 40.0;

pub fn template() -> Template {
    let schema = ParamSchema::new()
        .label("O", LabelSpec::with_default("O").max_len(3))
        .label("A", LabelSpec::with_default("A").max_len(3))
        .label("B", LabelSpec::with_default("B").max_len(3))
        .label("angle", LabelSpec::default().max_len(12))
        .value("degrees", ValueSpec::number(50.0).range(1.0, 359.0).mark_required())
        .flag("showMeasure", true)
        .flag("showPointLabels", true)
        .flag("showRightAngle", true);

    Template::new(ID, "Angle", "geometry", schema, render)
}

fn render(params: &DiagramParams, ctx: &RenderContext) -> Result<RenderResult, TemplateError> {
    let measure = required_number(params, "degrees")?;
    if measure <= 0.0 || measure >= 360.0 {
        return Err(TemplateError::invalid(
            "degrees",
            format!("must lie strictly between 0 and 360 (got {})", measure),
        ));
    }

    // Obtuse and reflex angles open to the left; centre the vertex for them
    let vertex = if measure > 90.0 {
        Point::new(WIDTH * 0.55, HEIGHT * 0.55)
    } else {
        Point::new(WIDTH * 0.25, HEIGHT * 0.8)
    };
    // Screen y points down, so a counter-clockwise turn is a negative angle
    let theta = -measure.to_radians();
    let a = polar(vertex, ARM.min(WIDTH - vertex.x - 20.0), 0.0);
    let arm_b = if measure > 90.0 { 120.0 } else { ARM * 0.9 };
    let b = polar(vertex, arm_b, theta);

    let mut canvas = Canvas::new(ctx, WIDTH, HEIGHT, "angle");

    canvas.segment("OA", vertex, a);
    canvas.segment("OB", vertex, b);

    if (measure - 90.0).abs() < 1e-9 && params.visible("showRightAngle") {
        canvas.right_angle("right-O", vertex, a, b, 18.0);
    } else {
        let arc = PathData::new()
            .move_to(polar(vertex, ARC_RADIUS, 0.0))
            .arc_to(polar(vertex, ARC_RADIUS, theta), ARC_RADIUS, measure > 180.0, false);
        canvas.path(IdPrefix::Arc, "O", &arc, class::ARC);
    }

    if params.visible("showMeasure") {
        let text = label_or(params, "angle", || degrees(measure));
        let at = polar(vertex, ARC_RADIUS + 22.0, theta / 2.0);
        canvas.text("angle", &text, at, TextAnchor::Middle, class::TEXT_ANGLE);
    }

    canvas.point("O", vertex);
    if params.visible("showPointLabels") {
        // Opposite the bisector, away from both arms
        let behind = polar(vertex, 22.0, theta / 2.0 + std::f64::consts::PI);
        canvas.label("O", params.label("O"), behind);
        canvas.label("A", params.label("A"), Point::new(a.x, a.y + 20.0));
        canvas.label("B", params.label("B"), polar(vertex, arm_b + 20.0, theta));
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
    fn test_acute_angle_uses_small_arc() {
        let result = render_with(DiagramParams::new()).expect("renders");
        assert!(result.svg.contains(r#"id="arc:O""#));
        assert!(result.svg.contains(" 0 0 0 "));
        assert!(result.svg.contains(">50°</text>"));
    }

    #[test]
    fn test_reflex_angle_uses_large_arc() {
        let result = render_with(DiagramParams::new().with_value("degrees", 250.0)).expect("renders");
        assert!(result.svg.contains(" 0 1 0 "));
        assert!(result.svg.contains(">250°</text>"));
    }

    #[test]
    fn test_right_angle_mark() {
        let result = render_with(DiagramParams::new().with_value("degrees", 90.0)).expect("renders");
        assert!(result.svg.contains(r#"id="mk:right-O""#));
        assert!(!result.svg.contains("arc:O"));
    }

    #[test]
    fn test_out_of_range_is_an_error() {
        let err = render_with(DiagramParams::new().with_value("degrees", 360.0)).expect_err("fails");
        assert!(err.to_string().contains("strictly between 0 and 360"));
    }
}
