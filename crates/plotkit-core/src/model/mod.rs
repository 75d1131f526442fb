use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use crate::transform::LinearMap;

mod arc;
mod circle;
mod geometry_model;
mod line;

pub use arc::Arc;
pub use circle::Circle;
pub use geometry_model::{
    to_absolute, to_local, AbsolutePath, GeometryModel, LayerStyle, WalkContext,
};
pub use line::Line;

/// Distance below which two points are treated as the same point.
pub const POINT_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector at `angle_deg` degrees, measured from +X toward +Y.
    pub fn from_angle(angle_deg: f64) -> Self {
        let rad = angle_deg.to_radians();
        Self::new(rad.cos(), rad.sin())
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn dot(&self, other: &Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn cross(&self, other: &Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Returns the unit vector in this direction, or `None` for a zero vector.
    pub fn normalized(&self) -> Option<Point> {
        let len = self.length();
        if len <= POINT_EPSILON || !len.is_finite() {
            None
        } else {
            Some(Point::new(self.x / len, self.y / len))
        }
    }

    pub fn lerp(&self, other: &Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    /// Rotates about the origin by `angle_deg` degrees.
    pub fn rotated(&self, angle_deg: f64) -> Point {
        let rad = angle_deg.to_radians();
        let (s, c) = rad.sin_cos();
        Point::new(self.x * c - self.y * s, self.x * s + self.y * c)
    }

    /// Rotates about `center` by `angle_deg` degrees.
    pub fn rotated_about(&self, center: Point, angle_deg: f64) -> Point {
        center + (*self - center).rotated(angle_deg)
    }

    /// Angle of this vector in degrees, in `(-180, 180]`.
    pub fn angle_deg(&self) -> f64 {
        self.y.atan2(self.x).to_degrees()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn approx_eq(&self, other: &Point, tolerance: f64) -> bool {
        self.distance_to(other) <= tolerance
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Point {
    type Output = Point;
    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Bounding box of a point set, `None` when empty.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut bounds = Bounds::new(first, first);
        for p in iter {
            bounds.include(*p);
        }
        Some(bounds)
    }

    pub fn include(&mut self, p: Point) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        let mut out = *self;
        out.include(other.min);
        out.include(other.max);
        out
    }

    pub fn translated(&self, offset: Point) -> Bounds {
        Bounds::new(self.min + offset, self.max + offset)
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        self.min.lerp(&self.max, 0.5)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Shared behaviour of every path kind.
///
/// All methods operate in whatever frame the path is stored in; none of them
/// know about model origins.
pub trait PathGeometry {
    /// Start and end point in traversal order, `None` for closed primitives.
    fn endpoints(&self) -> Option<(Point, Point)>;
    fn bounds(&self) -> Bounds;
    fn length(&self) -> f64;
    /// Point at parameter `t` in `[0, 1]` along the path.
    fn point_at(&self, t: f64) -> Point;
    /// Unit tangent at parameter `t`, in traversal direction.
    fn tangent_at(&self, t: f64) -> Option<Point>;
    fn translated(&self, offset: Point) -> Self;
    fn is_finite(&self) -> bool;

    /// Polyline approximation whose chords are no longer than `detail`.
    ///
    /// Closed primitives repeat their first point at the end.
    fn flatten(&self, detail: f64) -> Vec<Point> {
        let len = self.length();
        let segments = segment_count(len, detail);
        (0..=segments)
            .map(|i| self.point_at(i as f64 / segments as f64))
            .collect()
    }
}

/// Most chords a single primitive is ever flattened into.
pub const MAX_PATH_SEGMENTS: usize = 1 << 20;

/// Number of equal chords needed so none is longer than `detail`, capped at
/// [`MAX_PATH_SEGMENTS`].
///
/// A small slack keeps already-subdivided geometry from gaining a segment to
/// floating point noise.
pub fn segment_count(length: f64, detail: f64) -> usize {
    if !length.is_finite() || !detail.is_finite() || detail <= 0.0 || length <= 0.0 {
        return 1;
    }
    let raw = length / detail - 1e-6;
    if raw >= MAX_PATH_SEGMENTS as f64 {
        return MAX_PATH_SEGMENTS;
    }
    (raw.ceil() as usize).max(1)
}

/// A drawable primitive owned by exactly one [`GeometryModel`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Path {
    Line(Line),
    Arc(Arc),
    Circle(Circle),
}

impl PathGeometry for Path {
    fn endpoints(&self) -> Option<(Point, Point)> {
        match self {
            Path::Line(p) => p.endpoints(),
            Path::Arc(p) => p.endpoints(),
            Path::Circle(p) => p.endpoints(),
        }
    }

    fn bounds(&self) -> Bounds {
        match self {
            Path::Line(p) => p.bounds(),
            Path::Arc(p) => p.bounds(),
            Path::Circle(p) => p.bounds(),
        }
    }

    fn length(&self) -> f64 {
        match self {
            Path::Line(p) => p.length(),
            Path::Arc(p) => p.length(),
            Path::Circle(p) => p.length(),
        }
    }

    fn point_at(&self, t: f64) -> Point {
        match self {
            Path::Line(p) => p.point_at(t),
            Path::Arc(p) => p.point_at(t),
            Path::Circle(p) => p.point_at(t),
        }
    }

    fn tangent_at(&self, t: f64) -> Option<Point> {
        match self {
            Path::Line(p) => p.tangent_at(t),
            Path::Arc(p) => p.tangent_at(t),
            Path::Circle(p) => p.tangent_at(t),
        }
    }

    fn translated(&self, offset: Point) -> Self {
        match self {
            Path::Line(p) => Path::Line(p.translated(offset)),
            Path::Arc(p) => Path::Arc(p.translated(offset)),
            Path::Circle(p) => Path::Circle(p.translated(offset)),
        }
    }

    fn is_finite(&self) -> bool {
        match self {
            Path::Line(p) => p.is_finite(),
            Path::Arc(p) => p.is_finite(),
            Path::Circle(p) => p.is_finite(),
        }
    }

    fn flatten(&self, detail: f64) -> Vec<Point> {
        match self {
            Path::Line(p) => p.flatten(detail),
            Path::Arc(p) => p.flatten(detail),
            Path::Circle(p) => p.flatten(detail),
        }
    }
}

impl Path {
    pub fn line(start: Point, end: Point) -> Self {
        Path::Line(Line::new(start, end))
    }

    pub fn arc(center: Point, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Path::Arc(Arc::new(center, radius, start_angle, end_angle))
    }

    pub fn circle(center: Point, radius: f64) -> Self {
        Path::Circle(Circle::new(center, radius))
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Path::Line(_) => "line",
            Path::Arc(_) => "arc",
            Path::Circle(_) => "circle",
        }
    }

    pub fn is_curved(&self) -> bool {
        !matches!(self, Path::Line(_))
    }

    /// Splits the path into straight segments no longer than `detail`.
    pub fn to_lines(&self, detail: f64) -> Vec<Line> {
        self.flatten(detail)
            .windows(2)
            .map(|w| Line::new(w[0], w[1]))
            .collect()
    }

    /// Applies a linear map about the local origin.
    ///
    /// Lines always map to lines. Arcs and circles survive a conformal map
    /// (rotation, uniform scale, reflection); under any other map they are
    /// flattened at `detail` first, so the result may hold several lines.
    pub fn transformed(&self, map: &LinearMap, detail: f64) -> Vec<Path> {
        match self {
            Path::Line(line) => vec![Path::Line(line.transformed(map))],
            Path::Arc(arc) if map.is_conformal() => vec![Path::Arc(arc.transformed(map))],
            Path::Circle(circle) if map.is_conformal() => {
                vec![Path::Circle(circle.transformed(map))]
            }
            curved => curved
                .to_lines(detail)
                .into_iter()
                .map(|l| Path::Line(l.transformed(map)))
                .collect(),
        }
    }
}

/// Normalises an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(angle: f64) -> f64 {
    let a = angle % 360.0;
    if a < 0.0 {
        a + 360.0
    } else {
        a
    }
}
