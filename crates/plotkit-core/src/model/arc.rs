use lyon::geom::{point, vector, Angle, Arc as LyonArc};
use serde::{Deserialize, Serialize};

use super::{normalize_degrees, segment_count, Bounds, PathGeometry, Point};
use crate::transform::LinearMap;

/// Circular arc swept counter-clockwise (toward +Y) from `start_angle` to
/// `end_angle`, both in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub center: Point,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl Arc {
    pub fn new(center: Point, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Self {
            center,
            radius,
            start_angle,
            end_angle,
        }
    }

    /// Sweep in degrees, in `(0, 360]`. An arc whose end angle differs from
    /// its start angle by a whole turn is a full circle.
    pub fn sweep(&self) -> f64 {
        let raw = self.end_angle - self.start_angle;
        if raw >= 360.0 {
            return 360.0;
        }
        let sweep = normalize_degrees(raw);
        if sweep == 0.0 && raw != 0.0 {
            360.0
        } else {
            sweep
        }
    }

    /// The equivalent lyon arc, used for sampling and bounds.
    pub fn to_lyon(&self) -> LyonArc<f64> {
        LyonArc {
            center: point(self.center.x, self.center.y),
            radii: vector(self.radius, self.radius),
            start_angle: Angle::degrees(self.start_angle),
            sweep_angle: Angle::degrees(self.sweep()),
            x_rotation: Angle::zero(),
        }
    }

    pub fn start_point(&self) -> Point {
        self.point_at(0.0)
    }

    pub fn end_point(&self) -> Point {
        self.point_at(1.0)
    }

    /// Applies a conformal map. Reflections reverse the sweep direction, so
    /// the mapped end point becomes the new start.
    pub fn transformed(&self, map: &LinearMap) -> Self {
        let center = map.apply(self.center);
        let sweep = self.sweep();
        let anchor = if map.is_reflection() {
            self.end_point()
        } else {
            self.start_point()
        };
        let start_angle = (map.apply(anchor) - center).angle_deg();
        Self::new(
            center,
            self.radius * map.scale_factor(),
            start_angle,
            start_angle + sweep,
        )
    }
}

impl PathGeometry for Arc {
    fn endpoints(&self) -> Option<(Point, Point)> {
        Some((self.start_point(), self.end_point()))
    }

    fn bounds(&self) -> Bounds {
        let bb = self.to_lyon().bounding_box();
        Bounds::new(Point::new(bb.min.x, bb.min.y), Point::new(bb.max.x, bb.max.y))
    }

    fn length(&self) -> f64 {
        self.radius * self.sweep().to_radians()
    }

    fn point_at(&self, t: f64) -> Point {
        let p = self.to_lyon().sample(t.clamp(0.0, 1.0));
        Point::new(p.x, p.y)
    }

    fn tangent_at(&self, t: f64) -> Option<Point> {
        let angle = (self.start_angle + self.sweep() * t.clamp(0.0, 1.0)).to_radians();
        Some(Point::new(-angle.sin(), angle.cos()))
    }

    fn translated(&self, offset: Point) -> Self {
        Self::new(
            self.center + offset,
            self.radius,
            self.start_angle,
            self.end_angle,
        )
    }

    fn is_finite(&self) -> bool {
        self.center.is_finite()
            && self.radius.is_finite()
            && self.start_angle.is_finite()
            && self.end_angle.is_finite()
    }

    fn flatten(&self, detail: f64) -> Vec<Point> {
        // at most a quarter turn per chord so short arcs keep their bulge
        let min_segments = (self.sweep() / 90.0).ceil().max(1.0) as usize;
        let n = segment_count(self.length(), detail).max(min_segments);
        (0..=n).map(|i| self.point_at(i as f64 / n as f64)).collect()
    }
}
