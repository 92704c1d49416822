//! SVG markup generation

use crate::params::Point;

use super::geometry::{fmt_num, PathData};
use super::SvgConfig;

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    Start,
    #[default]
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }

    /// Parse an SVG `text-anchor` value
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "start" => Some(TextAnchor::Start),
            "middle" => Some(TextAnchor::Middle),
            "end" => Some(TextAnchor::End),
            _ => None,
        }
    }
}

/// Build SVG elements incrementally
pub struct SvgBuilder {
    config: SvgConfig,
    styles: Vec<String>,
    elements: Vec<String>,
    indent: usize,
}

impl SvgBuilder {
    /// Create a new SVG builder
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            styles: vec![],
            elements: vec![],
            indent: 1,
        }
    }

    pub fn config(&self) -> &SvgConfig {
        &self.config
    }

    /// Add CSS rules to the inline style block
    pub fn add_style(&mut self, css: impl Into<String>) {
        self.styles.push(css.into());
    }

    /// Format a coordinate with the configured precision
    pub fn num(&self, value: f64) -> String {
        fmt_num(value, self.config.precision)
    }

    fn indent_str(&self) -> String {
        if self.config.pretty_print {
            "  ".repeat(self.indent)
        } else {
            String::new()
        }
    }

    fn newline(&self) -> &str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    fn attrs(id: Option<&str>, class: Option<&str>) -> String {
        let id_attr = id
            .map(|i| format!(r#" id="{}""#, escape_xml(i)))
            .unwrap_or_default();
        let class_attr = class
            .filter(|c| !c.is_empty())
            .map(|c| format!(r#" class="{}""#, escape_xml(c)))
            .unwrap_or_default();
        format!("{}{}", id_attr, class_attr)
    }

    fn push(&mut self, element: String) {
        let line = format!("{}{}", self.indent_str(), element);
        self.elements.push(line);
    }

    /// Add a line element
    pub fn add_line(
        &mut self,
        id: Option<&str>,
        from: Point,
        to: Point,
        class: Option<&str>,
        extra: &str,
    ) {
        let element = format!(
            r#"<line{} x1="{}" y1="{}" x2="{}" y2="{}"{}/>"#,
            Self::attrs(id, class),
            self.num(from.x),
            self.num(from.y),
            self.num(to.x),
            self.num(to.y),
            extra
        );
        self.push(element);
    }

    /// Add a rectangle element
    pub fn add_rect(
        &mut self,
        id: Option<&str>,
        origin: Point,
        width: f64,
        height: f64,
        class: Option<&str>,
        extra: &str,
    ) {
        let element = format!(
            r#"<rect{} x="{}" y="{}" width="{}" height="{}"{}/>"#,
            Self::attrs(id, class),
            self.num(origin.x),
            self.num(origin.y),
            self.num(width),
            self.num(height),
            extra
        );
        self.push(element);
    }

    /// Add a circle element
    pub fn add_circle(
        &mut self,
        id: Option<&str>,
        center: Point,
        r: f64,
        class: Option<&str>,
        extra: &str,
    ) {
        let element = format!(
            r#"<circle{} cx="{}" cy="{}" r="{}"{}/>"#,
            Self::attrs(id, class),
            self.num(center.x),
            self.num(center.y),
            self.num(r),
            extra
        );
        self.push(element);
    }

    /// Add an ellipse element
    pub fn add_ellipse(
        &mut self,
        id: Option<&str>,
        center: Point,
        rx: f64,
        ry: f64,
        class: Option<&str>,
        extra: &str,
    ) {
        let element = format!(
            r#"<ellipse{} cx="{}" cy="{}" rx="{}" ry="{}"{}/>"#,
            Self::attrs(id, class),
            self.num(center.x),
            self.num(center.y),
            self.num(rx),
            self.num(ry),
            extra
        );
        self.push(element);
    }

    fn points_attr(&self, points: &[Point]) -> String {
        points
            .iter()
            .map(|p| format!("{},{}", self.num(p.x), self.num(p.y)))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Add a polygon element
    pub fn add_polygon(
        &mut self,
        id: Option<&str>,
        points: &[Point],
        class: Option<&str>,
        extra: &str,
    ) {
        let element = format!(
            r#"<polygon{} points="{}"{}/>"#,
            Self::attrs(id, class),
            self.points_attr(points),
            extra
        );
        self.push(element);
    }

    /// Add a polyline element
    pub fn add_polyline(
        &mut self,
        id: Option<&str>,
        points: &[Point],
        class: Option<&str>,
        extra: &str,
    ) {
        let element = format!(
            r#"<polyline{} points="{}"{}/>"#,
            Self::attrs(id, class),
            self.points_attr(points),
            extra
        );
        self.push(element);
    }

    /// Add a path element
    pub fn add_path(
        &mut self,
        id: Option<&str>,
        path: &PathData,
        class: Option<&str>,
        extra: &str,
    ) {
        let element = format!(
            r#"<path{} d="{}"{}/>"#,
            Self::attrs(id, class),
            path.to_svg_d(self.config.precision),
            extra
        );
        self.push(element);
    }

    /// Add a text element, vertically centred on `at`
    pub fn add_text(
        &mut self,
        id: Option<&str>,
        text: &str,
        at: Point,
        anchor: TextAnchor,
        class: Option<&str>,
        extra: &str,
    ) {
        let element = format!(
            r#"<text{} x="{}" y="{}" text-anchor="{}" dominant-baseline="middle"{}>{}</text>"#,
            Self::attrs(id, class),
            self.num(at.x),
            self.num(at.y),
            anchor.as_str(),
            extra,
            escape_xml(text)
        );
        self.push(element);
    }

    /// Open a group element
    pub fn start_group(&mut self, id: Option<&str>, class: Option<&str>) {
        let element = format!("<g{}>", Self::attrs(id, class));
        self.push(element);
        self.indent += 1;
    }

    /// Close a group element
    pub fn end_group(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.push("</g>".to_string());
    }

    /// Number of elements emitted so far
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Build the final SVG string
    pub fn build(self, width: f64, height: f64) -> String {
        let nl = self.newline();
        let w = self.num(width);
        let h = self.num(height);

        let mut svg = String::new();

        if self.config.standalone {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(nl);
        }

        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        ));
        svg.push_str(nl);

        if !self.styles.is_empty() {
            let pad = if self.config.pretty_print { "  " } else { "" };
            svg.push_str(pad);
            svg.push_str("<style>");
            svg.push_str(nl);
            for style in &self.styles {
                for rule in style.lines() {
                    if self.config.pretty_print {
                        svg.push_str("    ");
                    }
                    svg.push_str(rule);
                    svg.push_str(nl);
                }
            }
            svg.push_str(pad);
            svg.push_str("</style>");
            svg.push_str(nl);
        }

        for elem in &self.elements {
            svg.push_str(elem);
            svg.push_str(nl);
        }

        svg.push_str("</svg>");

        svg
    }
}

/// Escape special XML characters
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
