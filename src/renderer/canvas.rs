//! The shared diagram canvas every template draws on
//!
//! A canvas owns the markup skeleton (root element, inline palette styles,
//! one root group) and knows the element id conventions, so a template only
//! computes geometry and calls the primitive it needs.

use crate::params::Point;

use super::geometry::{self, AngleArc, PathData};
use super::svg::{SvgBuilder, TextAnchor};
use super::{RenderContext, RenderResult};

/// Element id prefixes understood by tooling that post-processes markup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdPrefix {
    Point,
    Line,
    Text,
    Group,
    Mark,
    Poly,
    Arc,
    Path,
    Face,
    Bar,
}

impl IdPrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdPrefix::Point => "pt",
            IdPrefix::Line => "ln",
            IdPrefix::Text => "txt",
            IdPrefix::Group => "grp",
            IdPrefix::Mark => "mk",
            IdPrefix::Poly => "poly",
            IdPrefix::Arc => "arc",
            IdPrefix::Path => "path",
            IdPrefix::Face => "face",
            IdPrefix::Bar => "bar",
        }
    }

    /// Full element id for `name`
    pub fn id(&self, name: &str) -> String {
        format!("{}:{}", self.as_str(), name)
    }
}

/// CSS classes defined by the palette style block
pub mod class {
    pub const LINE: &str = "diagram-line";
    pub const HIDDEN_LINE: &str = "diagram-line diagram-hidden";
    pub const POINT: &str = "diagram-point";
    pub const TEXT: &str = "diagram-text";
    pub const TEXT_SIDE: &str = "diagram-text-side";
    pub const TEXT_ANGLE: &str = "diagram-text-angle";
    pub const ARC: &str = "diagram-arc";
    pub const RIGHT_ANGLE: &str = "diagram-right-angle";
    pub const EQUAL_MARK: &str = "diagram-equal-mark";
    pub const FACE: &str = "diagram-face";
    pub const BAR: &str = "diagram-bar";
    pub const AXIS: &str = "diagram-axis";
    pub const GRID: &str = "diagram-grid";
}

/// A fixed-size drawing surface producing a [`RenderResult`]
pub struct Canvas {
    builder: SvgBuilder,
    width: f64,
    height: f64,
    point_radius: f64,
    warnings: Vec<String>,
}

impl Canvas {
    /// Start a canvas whose content lives under the group `grp:<root>`
    pub fn new(ctx: &RenderContext, width: f64, height: f64, root: &str) -> Self {
        let mut builder = SvgBuilder::new(ctx.svg.clone());
        builder.add_style(ctx.palette.style_block());
        builder.start_group(Some(&IdPrefix::Group.id(root)), None);
        Self {
            builder,
            width,
            height,
            point_radius: ctx.palette.number("point-radius"),
            warnings: vec![],
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Record an advisory warning for the caller
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Direct access for primitives the helpers do not cover
    pub fn builder(&mut self) -> &mut SvgBuilder {
        &mut self.builder
    }

    pub fn begin_group(&mut self, name: &str) {
        self.builder
            .start_group(Some(&IdPrefix::Group.id(name)), None);
    }

    pub fn end_group(&mut self) {
        self.builder.end_group();
    }

    /// Dot marking a named point
    pub fn point(&mut self, name: &str, at: Point) {
        let r = self.point_radius;
        self.builder.add_circle(
            Some(&IdPrefix::Point.id(name)),
            at,
            r,
            Some(class::POINT),
            "",
        );
    }

    /// Solid segment
    pub fn segment(&mut self, name: &str, from: Point, to: Point) {
        self.builder
            .add_line(Some(&IdPrefix::Line.id(name)), from, to, Some(class::LINE), "");
    }

    /// Dashed segment for hidden edges and construction lines
    pub fn hidden_segment(&mut self, name: &str, from: Point, to: Point) {
        self.builder.add_line(
            Some(&IdPrefix::Line.id(name)),
            from,
            to,
            Some(class::HIDDEN_LINE),
            "",
        );
    }

    /// Axis or grid line
    pub fn rule(&mut self, name: &str, from: Point, to: Point, class: &str) {
        self.builder
            .add_line(Some(&IdPrefix::Line.id(name)), from, to, Some(class), "");
    }

    pub fn text(&mut self, name: &str, text: &str, at: Point, anchor: TextAnchor, class: &str) {
        if text.is_empty() {
            return;
        }
        self.builder
            .add_text(Some(&IdPrefix::Text.id(name)), text, at, anchor, Some(class), "");
    }

    /// Vertex or title label
    pub fn label(&mut self, name: &str, text: &str, at: Point) {
        self.text(name, text, at, TextAnchor::Middle, class::TEXT);
    }

    /// Side length label placed beside the midpoint of `from -> to`
    ///
    /// The label sits on the side of the segment away from `inside`.
    pub fn side_label(&mut self, name: &str, text: &str, from: Point, to: Point, inside: Point) {
        let mid = geometry::midpoint(from, to);
        let n = geometry::normal(from, to);
        let shifted = Point::new(mid.x + n.x, mid.y + n.y);
        let sign = if geometry::distance(shifted, inside) < geometry::distance(mid, inside) {
            -1.0
        } else {
            1.0
        };
        let at = Point::new(mid.x + n.x * 18.0 * sign, mid.y + n.y * 18.0 * sign);
        self.text(name, text, at, TextAnchor::Middle, class::TEXT_SIDE);
    }

    /// Interior angle arc at `vertex`, returning its geometry for labelling
    pub fn angle_arc(
        &mut self,
        name: &str,
        vertex: Point,
        p1: Point,
        p2: Point,
        radius: f64,
    ) -> AngleArc {
        let arc = geometry::angle_arc(vertex, p1, p2, radius);
        self.builder.add_path(
            Some(&IdPrefix::Arc.id(name)),
            &arc.path(),
            Some(class::ARC),
            "",
        );
        arc
    }

    /// Angle measure text on the bisector of an arc
    pub fn angle_label(&mut self, name: &str, text: &str, vertex: Point, arc: &AngleArc) {
        let at = arc.label_position(vertex, arc.radius + 16.0);
        self.text(name, text, at, TextAnchor::Middle, class::TEXT_ANGLE);
    }

    /// Square corner mark at `vertex`
    pub fn right_angle(&mut self, name: &str, vertex: Point, p1: Point, p2: Point, size: f64) {
        let path = geometry::right_angle_mark(vertex, p1, p2, size);
        self.builder.add_path(
            Some(&IdPrefix::Mark.id(name)),
            &path,
            Some(class::RIGHT_ANGLE),
            "",
        );
    }

    /// Equal-length ticks across the middle of a segment
    pub fn equal_ticks(&mut self, name: &str, from: Point, to: Point, count: usize) {
        let path = geometry::tick_marks(from, to, 0.5, count, 10.0, 5.0);
        self.builder.add_path(
            Some(&IdPrefix::Mark.id(name)),
            &path,
            Some(class::EQUAL_MARK),
            "",
        );
    }

    pub fn polygon(&mut self, prefix: IdPrefix, name: &str, points: &[Point], class: &str) {
        self.builder
            .add_polygon(Some(&prefix.id(name)), points, Some(class), "");
    }

    pub fn path(&mut self, prefix: IdPrefix, name: &str, path: &PathData, class: &str) {
        self.builder
            .add_path(Some(&prefix.id(name)), path, Some(class), "");
    }

    /// Close the root group and produce the result
    pub fn finish(mut self) -> RenderResult {
        self.builder.end_group();
        RenderResult {
            svg: self.builder.build(self.width, self.height),
            width: self.width,
            height: self.height,
            warnings: self.warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_prefixes() {
        assert_eq!(IdPrefix::Point.id("A"), "pt:A");
        assert_eq!(IdPrefix::Mark.id("right-B"), "mk:right-B");
        assert_eq!(IdPrefix::Face.id("front"), "face:front");
    }

    #[test]
    fn test_canvas_skeleton() {
        let ctx = RenderContext::default();
        let mut canvas = Canvas::new(&ctx, 200.0, 100.0, "demo");
        canvas.point("A", Point::new(10.0, 10.0));
        canvas.segment("AB", Point::new(10.0, 10.0), Point::new(50.0, 10.0));
        canvas.label("A", "A", Point::new(10.0, 0.0));
        canvas.warn("check me");
        let result = canvas.finish();

        assert_eq!(result.width, 200.0);
        assert_eq!(result.warnings, vec!["check me"]);
        assert!(result.svg.contains(r#"viewBox="0 0 200 100""#));
        assert!(result.svg.contains(r#"<g id="grp:demo">"#));
        assert!(result.svg.contains(r#"id="pt:A""#));
        assert!(result.svg.contains(r#"id="ln:AB""#));
        assert!(result.svg.contains(r#"id="txt:A""#));
        assert!(result.svg.contains(".diagram-equal-mark"));
    }

    #[test]
    fn test_empty_text_is_skipped() {
        let ctx = RenderContext::default();
        let mut canvas = Canvas::new(&ctx, 10.0, 10.0, "demo");
        canvas.label("blank", "", Point::new(0.0, 0.0));
        let result = canvas.finish();
        assert!(!result.svg.contains("txt:blank"));
    }
}
