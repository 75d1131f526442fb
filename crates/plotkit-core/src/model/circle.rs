use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use super::{segment_count, Bounds, PathGeometry, Point};
use crate::transform::LinearMap;

/// Minimum number of chords used when a circle is flattened.
const MIN_CIRCLE_SEGMENTS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn transformed(&self, map: &LinearMap) -> Self {
        Self::new(map.apply(self.center), self.radius * map.scale_factor())
    }
}

impl PathGeometry for Circle {
    fn endpoints(&self) -> Option<(Point, Point)> {
        None
    }

    fn bounds(&self) -> Bounds {
        let r = Point::new(self.radius, self.radius);
        Bounds::new(self.center - r, self.center + r)
    }

    fn length(&self) -> f64 {
        TAU * self.radius
    }

    fn point_at(&self, t: f64) -> Point {
        let angle = TAU * t;
        self.center + Point::new(angle.cos(), angle.sin()) * self.radius
    }

    fn tangent_at(&self, t: f64) -> Option<Point> {
        let angle = TAU * t;
        Some(Point::new(-angle.sin(), angle.cos()))
    }

    fn translated(&self, offset: Point) -> Self {
        Self::new(self.center + offset, self.radius)
    }

    fn is_finite(&self) -> bool {
        self.center.is_finite() && self.radius.is_finite()
    }

    fn flatten(&self, detail: f64) -> Vec<Point> {
        let n = segment_count(self.length(), detail).max(MIN_CIRCLE_SEGMENTS);
        let mut pts: Vec<Point> = (0..n).map(|i| self.point_at(i as f64 / n as f64)).collect();
        pts.push(pts[0]);
        pts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_flatten_closes() {
        let c = Circle::new(Point::new(5.0, 5.0), 2.0);
        let pts = c.flatten(0.5);
        assert_eq!(pts.first(), pts.last());
        for w in pts.windows(2) {
            assert!(w[0].distance_to(&w[1]) <= 0.5 + 1e-9);
        }
    }
}
