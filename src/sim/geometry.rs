//! Segment and axis-aligned rectangle geometry
//!
//! Everything the ball can strike is a rectangle, and a ball's movement in one
//! frame is a segment, so collision detection reduces to segment/segment
//! intersection against the four rectangle edges.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A point in screen space (y grows downward)
pub type Point = DVec2;

/// Tolerance for every edge and containment comparison
pub const EPSILON: f64 = 1e-7;

/// True when `a` and `b` differ by less than [`EPSILON`]
#[inline]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// `value` lies in the closed range spanned by `a` and `b`, widened by [`EPSILON`]
#[inline]
fn within(value: f64, a: f64, b: f64) -> bool {
    value <= a.max(b) + EPSILON && value >= a.min(b) - EPSILON
}

/// A directed segment from `start` to `end`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Line {
    start: Point,
    end: Point,
}

impl Line {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn from_coords(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(Point::new(x1, y1), Point::new(x2, y2))
    }

    #[inline]
    pub fn start(&self) -> Point {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Point {
        self.end
    }

    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    pub fn middle(&self) -> Point {
        (self.start + self.end) / 2.0
    }

    pub fn is_intersecting(&self, other: &Line) -> bool {
        self.intersection_with(other).is_some()
    }

    /// Intersection point of two segments
    ///
    /// Returns `None` for segments that do not meet and for parallel segments.
    /// Segments with equal slope never intersect, even when they overlap
    /// exactly; collinear overlap has no single intersection point and is
    /// reported as a miss.
    pub fn intersection_with(&self, other: &Line) -> Option<Point> {
        let d1 = self.start - self.end;
        let d2 = other.start - other.end;

        // Vertical segments have no slope; solve by substitution instead
        if d1.x == 0.0 || d2.x == 0.0 {
            return self.vertical_intersection(other, d1, d2);
        }

        let m1 = d1.y / d1.x;
        let b1 = self.start.y - m1 * self.start.x;
        let m2 = d2.y / d2.x;
        let b2 = other.start.y - m2 * other.start.x;

        if m1 == m2 {
            return None;
        }

        let x = (b2 - b1) / (m1 - m2);
        let y = (b1 * m2 - b2 * m1) / (m2 - m1);

        // Both lines are non-vertical, so x-containment on both puts the point on both
        if within(x, self.start.x, self.end.x) && within(x, other.start.x, other.end.x) {
            Some(Point::new(x, y))
        } else {
            None
        }
    }

    fn vertical_intersection(&self, other: &Line, d1: DVec2, d2: DVec2) -> Option<Point> {
        if d1.x == 0.0 && d2.x == 0.0 {
            return None;
        }

        let (vertical, sloped, d_sloped) = if d1.x == 0.0 {
            (self, other, d2)
        } else {
            (other, self, d1)
        };

        let x = vertical.start.x;
        if !within(x, sloped.start.x, sloped.end.x) {
            return None;
        }

        let m = d_sloped.y / d_sloped.x;
        let b = sloped.start.y - m * sloped.start.x;
        let y = m * x + b;

        within(y, vertical.start.y, vertical.end.y).then(|| Point::new(x, y))
    }

    /// Closest point to `start` where this segment crosses the rectangle's edges
    ///
    /// Ties go to the first edge in top, bottom, left, right order.
    pub fn closest_intersection_to_start_of_line(&self, rect: &Rectangle) -> Option<Point> {
        let mut closest: Option<(Point, f64)> = None;
        for point in rect.intersection_points(self) {
            let distance = self.start.distance(point);
            match closest {
                Some((_, best)) if distance >= best => {}
                _ => closest = Some((point, distance)),
            }
        }
        closest.map(|(point, _)| point)
    }
}

/// Undirected: a line equals its reverse
impl PartialEq for Line {
    fn eq(&self, other: &Self) -> bool {
        (self.start == other.start && self.end == other.end)
            || (self.start == other.end && self.end == other.start)
    }
}

/// Axis-aligned rectangle anchored at its upper-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    upper_left: Point,
    width: f64,
    height: f64,
}

impl Rectangle {
    pub fn new(upper_left: Point, width: f64, height: f64) -> Self {
        debug_assert!(
            width >= 0.0 && height >= 0.0,
            "rectangle dimensions must be non-negative ({width}x{height})"
        );
        Self {
            upper_left,
            width,
            height,
        }
    }

    pub fn from_coords(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(Point::new(x, y), width, height)
    }

    #[inline]
    pub fn upper_left(&self) -> Point {
        self.upper_left
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn set_upper_left(&mut self, upper_left: Point) {
        self.upper_left = upper_left;
    }

    pub fn left(&self) -> f64 {
        self.upper_left.x
    }

    pub fn right(&self) -> f64 {
        self.upper_left.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.upper_left.y
    }

    pub fn bottom(&self) -> f64 {
        self.upper_left.y + self.height
    }

    pub fn upper_right(&self) -> Point {
        Point::new(self.right(), self.top())
    }

    pub fn lower_left(&self) -> Point {
        Point::new(self.left(), self.bottom())
    }

    pub fn lower_right(&self) -> Point {
        Point::new(self.right(), self.bottom())
    }

    pub fn center(&self) -> Point {
        self.upper_left + DVec2::new(self.width, self.height) / 2.0
    }

    /// Edges in top, bottom, left, right order
    pub fn edges(&self) -> [Line; 4] {
        [
            Line::new(self.upper_left, self.upper_right()),
            Line::new(self.lower_left(), self.lower_right()),
            Line::new(self.upper_left, self.lower_left()),
            Line::new(self.upper_right(), self.lower_right()),
        ]
    }

    /// Every point where `line` crosses an edge, in edge order
    pub fn intersection_points(&self, line: &Line) -> Vec<Point> {
        self.edges()
            .iter()
            .filter_map(|edge| edge.intersection_with(line))
            .collect()
    }

    /// Point inside or on the boundary (within [`EPSILON`])
    pub fn contains(&self, point: Point) -> bool {
        within(point.x, self.left(), self.right()) && within(point.y, self.top(), self.bottom())
    }
}
