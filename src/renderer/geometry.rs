//! Geometric helpers shared by templates and the blueprint renderer
//!
//! All coordinates are SVG user units with y pointing down.

use std::f64::consts::{FRAC_1_SQRT_2, PI};

use crate::params::Point;

/// Horizontal depth offset per unit of depth for oblique solids
pub const OBLIQUE_DX: f64 = 0.5 * FRAC_1_SQRT_2;
/// Vertical depth offset per unit of depth for oblique solids
pub const OBLIQUE_DY: f64 = 0.5 * FRAC_1_SQRT_2;

/// A segment in a path
#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    /// Circular arc to a point
    ArcTo {
        end: Point,
        radius: f64,
        large_arc: bool,
        sweep: bool, // true = positive-angle direction (clockwise on screen)
    },
    /// Elliptical arc with axis-aligned radii
    EllipseTo {
        end: Point,
        rx: f64,
        ry: f64,
        large_arc: bool,
        sweep: bool,
    },
    Close,
}

/// A path that can be written as an SVG `d` attribute
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathData {
    pub segments: Vec<PathSegment>,
}

impl PathData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(mut self, p: Point) -> Self {
        self.segments.push(PathSegment::MoveTo(p));
        self
    }

    pub fn line_to(mut self, p: Point) -> Self {
        self.segments.push(PathSegment::LineTo(p));
        self
    }

    pub fn arc_to(mut self, end: Point, radius: f64, large_arc: bool, sweep: bool) -> Self {
        self.segments.push(PathSegment::ArcTo {
            end,
            radius,
            large_arc,
            sweep,
        });
        self
    }

    pub fn ellipse_to(mut self, end: Point, rx: f64, ry: f64, large_arc: bool, sweep: bool) -> Self {
        self.segments.push(PathSegment::EllipseTo {
            end,
            rx,
            ry,
            large_arc,
            sweep,
        });
        self
    }

    pub fn close(mut self) -> Self {
        self.segments.push(PathSegment::Close);
        self
    }

    /// Convert to an SVG path `d` attribute string
    pub fn to_svg_d(&self, precision: usize) -> String {
        let n = |v: f64| fmt_num(v, precision);
        let mut parts = Vec::with_capacity(self.segments.len());

        for seg in &self.segments {
            match seg {
                PathSegment::MoveTo(p) => parts.push(format!("M{} {}", n(p.x), n(p.y))),
                PathSegment::LineTo(p) => parts.push(format!("L{} {}", n(p.x), n(p.y))),
                PathSegment::ArcTo {
                    end,
                    radius,
                    large_arc,
                    sweep,
                } => {
                    // A rx ry x-axis-rotation large-arc-flag sweep-flag x y
                    parts.push(format!(
                        "A{} {} 0 {} {} {} {}",
                        n(*radius),
                        n(*radius),
                        u8::from(*large_arc),
                        u8::from(*sweep),
                        n(end.x),
                        n(end.y)
                    ));
                }
                PathSegment::EllipseTo {
                    end,
                    rx,
                    ry,
                    large_arc,
                    sweep,
                } => {
                    parts.push(format!(
                        "A{} {} 0 {} {} {} {}",
                        n(*rx),
                        n(*ry),
                        u8::from(*large_arc),
                        u8::from(*sweep),
                        n(end.x),
                        n(end.y)
                    ));
                }
                PathSegment::Close => parts.push("Z".to_string()),
            }
        }

        parts.join(" ")
    }
}

/// Format a number for markup: fixed precision with trailing zeros removed
pub fn fmt_num(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let fixed = format!("{:.*}", precision, value);
    let trimmed = if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.')
    } else {
        fixed.as_str()
    };
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn distance(a: Point, b: Point) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

pub fn midpoint(a: Point, b: Point) -> Point {
    lerp(a, b, 0.5)
}

/// Point at parameter `t` along the segment from `a` to `b`
pub fn lerp(a: Point, b: Point, t: f64) -> Point {
    Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
}

/// Point at `radius` from `center` in direction `angle` (radians)
pub fn polar(center: Point, radius: f64, angle: f64) -> Point {
    Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
}

/// Direction of the ray from `from` towards `to`
pub fn direction(from: Point, to: Point) -> f64 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Wrap an angle into `[-π, π]`
pub fn normalize_angle(angle: f64) -> f64 {
    let mut a = angle % (2.0 * PI);
    if a > PI {
        a -= 2.0 * PI;
    } else if a < -PI {
        a += 2.0 * PI;
    }
    a
}

/// Unit normal (rotated +90°) of the segment `a -> b`
pub fn normal(a: Point, b: Point) -> Point {
    let len = distance(a, b);
    if len == 0.0 {
        return Point::new(0.0, 0.0);
    }
    Point::new(-(b.y - a.y) / len, (b.x - a.x) / len)
}

/// Point pushed `offset` away from `anchor` along the ray from `center`
///
/// Used to place vertex labels outside a figure.
pub fn outward(anchor: Point, center: Point, offset: f64) -> Point {
    let len = distance(center, anchor);
    if len == 0.0 {
        return Point::new(anchor.x, anchor.y - offset);
    }
    Point::new(
        anchor.x + (anchor.x - center.x) / len * offset,
        anchor.y + (anchor.y - center.y) / len * offset,
    )
}

pub fn centroid(points: &[Point]) -> Point {
    if points.is_empty() {
        return Point::new(0.0, 0.0);
    }
    let n = points.len() as f64;
    Point::new(
        points.iter().map(|p| p.x).sum::<f64>() / n,
        points.iter().map(|p| p.y).sum::<f64>() / n,
    )
}

/// Oblique "2.5D" offset standing in for depth
pub fn oblique(p: Point, depth: f64) -> Point {
    Point::new(p.x + depth * OBLIQUE_DX, p.y - depth * OBLIQUE_DY)
}

/// The interior arc between two rays leaving a vertex
#[derive(Debug, Clone, PartialEq)]
pub struct AngleArc {
    pub start: Point,
    pub end: Point,
    pub radius: f64,
    /// SVG sweep flag
    pub sweep: bool,
    /// Signed angle from the first ray to the second, in `[-π, π]`
    pub delta: f64,
    /// Direction of the bisector
    pub bisector: f64,
}

impl AngleArc {
    /// Unsigned size of the angle in radians
    pub fn span(&self) -> f64 {
        self.delta.abs()
    }

    /// Unsigned size of the angle in degrees
    pub fn degrees(&self) -> f64 {
        self.span().to_degrees()
    }

    pub fn path(&self) -> PathData {
        PathData::new()
            .move_to(self.start)
            .arc_to(self.end, self.radius, false, self.sweep)
    }

    /// Position for a label along the bisector at `distance` from the vertex
    pub fn label_position(&self, vertex: Point, distance: f64) -> Point {
        polar(vertex, distance, self.bisector)
    }
}

/// Arc between the rays `vertex -> p1` and `vertex -> p2`
///
/// Always the shorter (interior) arc: the signed difference of the two ray
/// directions is wrapped into `[-π, π]` and its sign picks the sweep.
pub fn angle_arc(vertex: Point, p1: Point, p2: Point, radius: f64) -> AngleArc {
    let a1 = direction(vertex, p1);
    let a2 = direction(vertex, p2);
    let delta = normalize_angle(a2 - a1);

    AngleArc {
        start: polar(vertex, radius, a1),
        end: polar(vertex, radius, a1 + delta),
        radius,
        sweep: delta > 0.0,
        delta,
        bisector: a1 + delta / 2.0,
    }
}

/// Square corner mark for a right angle at `vertex`
pub fn right_angle_mark(vertex: Point, p1: Point, p2: Point, size: f64) -> PathData {
    let u1 = polar(Point::new(0.0, 0.0), size, direction(vertex, p1));
    let u2 = polar(Point::new(0.0, 0.0), size, direction(vertex, p2));
    PathData::new()
        .move_to(Point::new(vertex.x + u1.x, vertex.y + u1.y))
        .line_to(Point::new(vertex.x + u1.x + u2.x, vertex.y + u1.y + u2.y))
        .line_to(Point::new(vertex.x + u2.x, vertex.y + u2.y))
}

/// Short strokes across a segment at parameter `t`
///
/// `count` parallel ticks are spaced `spacing` apart along the segment,
/// centred on the point at `t`.
pub fn tick_marks(a: Point, b: Point, t: f64, count: usize, size: f64, spacing: f64) -> PathData {
    let len = distance(a, b);
    let mut path = PathData::new();
    if len == 0.0 || count == 0 {
        return path;
    }

    let n = normal(a, b);
    let along = Point::new((b.x - a.x) / len, (b.y - a.y) / len);
    let center = lerp(a, b, t);
    let first = -(count as f64 - 1.0) / 2.0;

    for i in 0..count {
        let offset = (first + i as f64) * spacing;
        let c = Point::new(center.x + along.x * offset, center.y + along.y * offset);
        path = path
            .move_to(Point::new(c.x - n.x * size / 2.0, c.y - n.y * size / 2.0))
            .line_to(Point::new(c.x + n.x * size / 2.0, c.y + n.y * size / 2.0));
    }
    path
}

/// Triangular arrow head with its tip at `tip`, pointing away from `from`
pub fn arrow_head(from: Point, tip: Point, size: f64) -> [Point; 3] {
    let theta = direction(from, tip);
    let spread = PI / 6.0;
    [
        tip,
        Point::new(
            tip.x - size * (theta - spread).cos(),
            tip.y - size * (theta - spread).sin(),
        ),
        Point::new(
            tip.x - size * (theta + spread).cos(),
            tip.y - size * (theta + spread).sin(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(1.0, 2), "1");
        assert_eq!(fmt_num(1.5, 2), "1.5");
        assert_eq!(fmt_num(1.23456, 2), "1.23");
        assert_eq!(fmt_num(-0.001, 2), "0");
        assert_eq!(fmt_num(250.0, 0), "250");
        assert_eq!(fmt_num(f64::NAN, 2), "0");
    }

    #[test]
    fn test_angle_arc_quarter_turn() {
        let v = Point::new(0.0, 0.0);
        let arc = angle_arc(v, Point::new(1.0, 0.0), Point::new(0.0, 1.0), 10.0);
        assert!(close(arc.degrees(), 90.0));
        assert!(arc.sweep);
        assert!(close(arc.end.x, 0.0) && close(arc.end.y, 10.0));
        assert!(close(arc.bisector, PI / 4.0));
    }

    #[test]
    fn test_angle_arc_swapped_rays_flip_sweep() {
        let v = Point::new(0.0, 0.0);
        let forward = angle_arc(v, Point::new(1.0, 0.0), Point::new(0.0, 1.0), 10.0);
        let backward = angle_arc(v, Point::new(0.0, 1.0), Point::new(1.0, 0.0), 10.0);
        assert_ne!(forward.sweep, backward.sweep);
        assert!(close(forward.span(), backward.span()));
    }

    #[test]
    fn test_angle_arc_takes_shorter_side_across_pi() {
        // Rays at +170° and -170° enclose 20°, not 340°
        let v = Point::new(0.0, 0.0);
        let p1 = polar(v, 1.0, 170f64.to_radians());
        let p2 = polar(v, 1.0, -170f64.to_radians());
        let arc = angle_arc(v, p1, p2, 5.0);
        assert!(close(arc.degrees(), 20.0));
    }

    #[test]
    fn test_lerp_and_midpoint() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 20.0);
        assert_eq!(midpoint(a, b), Point::new(5.0, 10.0));
        assert_eq!(lerp(a, b, 0.25), Point::new(2.5, 5.0));
    }

    #[test]
    fn test_path_to_d() {
        let d = PathData::new()
            .move_to(Point::new(0.0, 0.0))
            .line_to(Point::new(100.0, 0.0))
            .arc_to(Point::new(0.0, 100.0), 100.0, false, true)
            .close()
            .to_svg_d(2);
        assert_eq!(d, "M0 0 L100 0 A100 100 0 0 1 0 100 Z");
    }

    #[test]
    fn test_tick_marks_cross_segment() {
        let d = tick_marks(Point::new(0.0, 0.0), Point::new(10.0, 0.0), 0.5, 1, 8.0, 4.0)
            .to_svg_d(2);
        assert_eq!(d, "M5 -4 L5 4");
    }

    #[test]
    fn test_oblique_offset_moves_up_and_right() {
        let p = oblique(Point::new(0.0, 0.0), 10.0);
        assert!(p.x > 0.0 && p.y < 0.0);
        assert!(close(p.x, -p.y));
    }

    #[test]
    fn test_arrow_head_points_along_line() {
        let [tip, left, right] = arrow_head(Point::new(0.0, 0.0), Point::new(10.0, 0.0), 4.0);
        assert_eq!(tip, Point::new(10.0, 0.0));
        assert!(left.x < 10.0 && right.x < 10.0);
        assert!(close(left.y, -right.y));
    }
}
