use serde::{Deserialize, Serialize};

use super::{Bounds, PathGeometry, Point};
use crate::transform::LinearMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: Point,
    pub end: Point,
}

impl Line {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn reversed(&self) -> Self {
        Self::new(self.end, self.start)
    }

    pub fn midpoint(&self) -> Point {
        self.start.lerp(&self.end, 0.5)
    }

    pub fn transformed(&self, map: &LinearMap) -> Self {
        Self::new(map.apply(self.start), map.apply(self.end))
    }

    pub fn is_degenerate(&self) -> bool {
        self.length() <= super::POINT_EPSILON
    }
}

impl PathGeometry for Line {
    fn endpoints(&self) -> Option<(Point, Point)> {
        Some((self.start, self.end))
    }

    fn bounds(&self) -> Bounds {
        let mut b = Bounds::new(self.start, self.start);
        b.include(self.end);
        b
    }

    fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    fn point_at(&self, t: f64) -> Point {
        if t <= 0.0 {
            self.start
        } else if t >= 1.0 {
            self.end
        } else {
            self.start.lerp(&self.end, t)
        }
    }

    fn tangent_at(&self, _t: f64) -> Option<Point> {
        (self.end - self.start).normalized()
    }

    fn translated(&self, offset: Point) -> Self {
        Self::new(self.start + offset, self.end + offset)
    }

    fn is_finite(&self) -> bool {
        self.start.is_finite() && self.end.is_finite()
    }
}
