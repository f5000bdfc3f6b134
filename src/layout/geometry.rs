//! Geometry primitives shared by the diagram engines.
//!
//! Engines describe shapes as points, rectangles, vertex lists and quadratic
//! curves; SVG path text is only produced by the renderer.

use serde::Serialize;
use std::f32::consts::PI;

/// Shared diagram viewBox width.
pub const VB_W: f32 = 800.0;
/// Shared diagram viewBox height.
pub const VB_H: f32 = 480.0;

/// Gap between a node's rim and the end of an arc connector.
pub const CONNECTOR_GAP: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance(self, other: Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn lerp(self, other: Point, t: f32) -> Self {
        Self::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Shrinks the rectangle on every side, never below zero size.
    pub fn inset(&self, amount: f32) -> Self {
        let dx = amount.min(self.width / 2.0);
        let dy = amount.min(self.height / 2.0);
        Self::new(
            self.x + dx,
            self.y + dy,
            self.width - 2.0 * dx,
            self.height - 2.0 * dy,
        )
    }

    /// Sub-rectangle given in percent of this one.
    pub fn percent(&self, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(
            self.x + self.width * x / 100.0,
            self.y + self.height * y / 100.0,
            self.width * width / 100.0,
            self.height * height / 100.0,
        )
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x - 0.01
            && point.x <= self.right() + 0.01
            && point.y >= self.y - 0.01
            && point.y <= self.bottom() + 0.01
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Ellipse {
    pub center: Point,
    pub rx: f32,
    pub ry: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct QuadCurve {
    pub start: Point,
    pub control: Point,
    pub end: Point,
}

/// Char-based truncation with a trailing ellipsis; the result, ellipsis
/// included, never exceeds `max_chars` characters.
pub fn truncate_label(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Angle of slot `i` out of `n`, starting at twelve o'clock and running clockwise.
pub fn orbit_angle(i: usize, n: usize) -> f32 {
    -PI / 2.0 + 2.0 * PI * i as f32 / n.max(1) as f32
}

pub fn orbit_position(center: Point, rx: f32, ry: f32, i: usize, n: usize) -> Point {
    let angle = orbit_angle(i, n);
    Point::new(center.x + rx * angle.cos(), center.y + ry * angle.sin())
}

pub fn node_radius(n: usize, base: f32, per_node: f32, min: f32) -> f32 {
    (base - n as f32 * per_node).max(min)
}

/// Unit derivative of the parametric ellipse `(rx·cosθ, ry·sinθ)`.
pub fn ellipse_tangent(rx: f32, ry: f32, theta: f32) -> Point {
    let dx = -rx * theta.sin();
    let dy = ry * theta.cos();
    let len = (dx * dx + dy * dy).sqrt();
    if len <= f32::EPSILON {
        return Point::new(0.0, 0.0);
    }
    Point::new(dx / len, dy / len)
}

/// Curved connector from node `i` to node `(i+1) % n` following the ellipse.
pub fn arc_connector(
    i: usize,
    n: usize,
    positions: &[Point],
    center: Point,
    rx: f32,
    ry: f32,
    node_radius: f32,
) -> QuadCurve {
    let j = (i + 1) % n.max(1);
    let gap = node_radius + CONNECTOR_GAP;
    let theta_i = orbit_angle(i, n);
    let theta_j = orbit_angle(j, n);

    let from = positions.get(i).copied().unwrap_or(center);
    let to = positions.get(j).copied().unwrap_or(center);

    let forward = ellipse_tangent(rx, ry, theta_i);
    let backward = ellipse_tangent(rx, ry, theta_j);
    let start = from.offset(gap * forward.x, gap * forward.y);
    let end = to.offset(-gap * backward.x, -gap * backward.y);

    let mid = theta_i + PI / n.max(1) as f32;
    let control = Point::new(center.x + rx * mid.cos(), center.y + ry * mid.sin());

    QuadCurve {
        start,
        control,
        end,
    }
}

pub fn arc_connectors(
    positions: &[Point],
    center: Point,
    rx: f32,
    ry: f32,
    node_radius: f32,
) -> Vec<QuadCurve> {
    let n = positions.len();
    if n <= 1 {
        return Vec::new();
    }
    (0..n)
        .map(|i| arc_connector(i, n, positions, center, rx, ry, node_radius))
        .collect()
}

/// Vertex list of a rhombus inscribed in `rect`.
pub fn diamond_points(center: Point, half_width: f32, half_height: f32) -> Vec<Point> {
    vec![
        Point::new(center.x, center.y - half_height),
        Point::new(center.x + half_width, center.y),
        Point::new(center.x, center.y + half_height),
        Point::new(center.x - half_width, center.y),
    ]
}

/// Point on a circle for an angle measured clockwise from twelve o'clock.
pub fn polar(center: Point, radius: f32, angle: f32) -> Point {
    Point::new(
        center.x + radius * (angle - PI / 2.0).cos(),
        center.y + radius * (angle - PI / 2.0).sin(),
    )
}
