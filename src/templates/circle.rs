//! Circle with optional centre, radius and diameter

use std::f64::consts::FRAC_PI_4;

use crate::params::{DiagramParams, LabelSpec, ParamSchema, Point, ValueSpec};
use crate::renderer::canvas::class;
use crate::renderer::geometry::{midpoint, polar};
use crate::renderer::{Canvas, IdPrefix, RenderContext, RenderResult, TextAnchor};
use crate::template::{Template, TemplateError};

use super::{label_or, measure, positive_number};

pub const ID: &str = "math.geometry.circle.v1";

const SIZE: f64 = 420.0;
const DRAWN_RADIUS: f64 = 150.0;

pub fn template() -> Template {
    let schema = ParamSchema::new()
        .label("O", LabelSpec::with_default("O").max_len(3))
        .label("radius", LabelSpec::default().max_len(12))
        .label("diameter", LabelSpec::default().max_len(12))
        .value("radius", ValueSpec::number(5.0).range(0.1, 1000.0).mark_required())
        .value("unit", ValueSpec::text("cm"))
        .flag("showCenter", true)
        .flag("showRadius", true)
        .flag("showDiameter", false);

    Template::new(ID, "Circle", "geometry", schema, render)
}

fn render(params: &DiagramParams, ctx: &RenderContext) -> Result<RenderResult, TemplateError> {
    let radius = positive_number(params, "radius")?;
    let unit = params.text("unit");

    let center = Point::new(SIZE / 2.0, SIZE / 2.0);
    let mut canvas = Canvas::new(ctx, SIZE, SIZE, "circle");

    canvas
        .builder()
        .add_circle(
            Some(&IdPrefix::Path.id("circle")),
            center,
            DRAWN_RADIUS,
            Some(class::LINE),
            "",
        );

    if params.visible("showDiameter") {
        let left = Point::new(center.x - DRAWN_RADIUS, center.y);
        let right = Point::new(center.x + DRAWN_RADIUS, center.y);
        canvas.segment("diameter", left, right);
        let text = label_or(params, "diameter", || measure(radius * 2.0, &unit));
        canvas.text(
            "diameter",
            &text,
            Point::new(center.x + DRAWN_RADIUS / 2.0, center.y + 18.0),
            TextAnchor::Middle,
            class::TEXT_SIDE,
        );
    }

    if params.visible("showRadius") {
        // Keep the radius clear of a drawn diameter
        let angle = if params.visible("showDiameter") {
            -FRAC_PI_4
        } else {
            0.0
        };
        let end = polar(center, DRAWN_RADIUS, angle);
        canvas.segment("radius", center, end);
        let text = label_or(params, "radius", || measure(radius, &unit));
        let mid = midpoint(center, end);
        canvas.text(
            "radius",
            &text,
            Point::new(mid.x, mid.y - 16.0),
            TextAnchor::Middle,
            class::TEXT_SIDE,
        );
    }

    if params.visible("showCenter") {
        canvas.point("O", center);
        canvas.label("O", params.label("O"), Point::new(center.x - 16.0, center.y + 18.0));
    }

    Ok(canvas.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::merge_with_defaults;

    fn render_with(params: DiagramParams) -> RenderResult {
        let merged = merge_with_defaults(&params, &template().schema);
        render(&merged, &RenderContext::default()).expect("renders")
    }

    #[test]
    fn test_default_circle() {
        let result = render_with(DiagramParams::new());
        assert_eq!((result.width, result.height), (420.0, 420.0));
        assert!(result.svg.contains(r#"id="path:circle""#));
        assert!(result.svg.contains(r#"id="ln:radius""#));
        assert!(result.svg.contains(">5 cm</text>"));
        assert!(!result.svg.contains("ln:diameter"));
    }

    #[test]
    fn test_diameter_is_twice_radius() {
        let params = DiagramParams::new()
            .with_value("radius", 3.5)
            .with_flag("showDiameter", true);
        let result = render_with(params);
        assert!(result.svg.contains(">7 cm</text>"));
        assert!(result.svg.contains(">3.5 cm</text>"));
    }

    #[test]
    fn test_non_positive_radius_is_rejected() {
        let merged = merge_with_defaults(
            &DiagramParams::new().with_value("radius", 0.0),
            &template().schema,
        );
        let err = render(&merged, &RenderContext::default()).expect_err("should fail");
        assert!(matches!(err, TemplateError::InvalidParameter { .. }));
    }

    #[test]
    fn test_hidden_center() {
        let result = render_with(DiagramParams::new().with_flag("showCenter", false));
        assert!(!result.svg.contains("pt:O"));
    }
}
