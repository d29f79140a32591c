//! Outlines for cells caught between two states.
//!
//! Both morphs walk the same 100 angles around the cell center and blend, at
//! each angle, a point on a circle with the point on the cell's square.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

/// Segments in a morph outline. The outline is closed, so it has one more
/// vertex than this.
pub const OUTLINE_SEGMENTS: usize = 100;

/// A point in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point `t` of the way from `self` to `other`.
    pub fn lerp(self, other: Point, t: f64) -> Point {
        Point {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// A birthing cell grows from a dot at progress 0 into its full square at
/// progress 1.
pub fn birthing_outline(center: Point, side: f64, progress: f64) -> Vec<Point> {
    outline(center, side, progress, progress)
}

/// A dying cell starts as its square and swells into a circle twice its
/// half-side at progress 1.
pub fn dying_outline(center: Point, side: f64, progress: f64) -> Vec<Point> {
    outline(center, side, 1.0 + progress, 1.0 - progress)
}

fn outline(center: Point, side: f64, radius_scale: f64, squareness: f64) -> Vec<Point> {
    let half = side / 2.0;
    let mut points: Vec<Point> = (0..OUTLINE_SEGMENTS)
        .map(|i| {
            let angle = i as f64 / OUTLINE_SEGMENTS as f64 * TAU;
            let (sin, cos) = angle.sin_cos();
            let circle = Point::new(
                center.x + half * radius_scale * cos,
                center.y + half * radius_scale * sin,
            );
            let square = Point::new(center.x + half * sign(cos), center.y + half * sign(sin));
            circle.lerp(square, squareness)
        })
        .collect();
    // Close on the exact first vertex; sin(TAU) is not exactly zero.
    if let Some(&first) = points.first() {
        points.push(first);
    }
    points
}

// Zero maps to zero, unlike f64::signum.
fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}
