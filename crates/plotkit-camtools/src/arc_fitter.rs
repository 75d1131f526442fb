//! Arc Fitter
//!
//! Replaces stretches of three or more polyline vertices that lie on a
//! common circle with a single arc move.

use plotkit_core::Point;

use crate::toolpath::{DrawMove, Run};

/// Arcs with a larger radius than this are left as lines.
const MAX_ARC_RADIUS: f64 = 10_000.0;

/// Arc fitting configuration
#[derive(Debug, Clone)]
pub struct ArcFitterConfig {
    /// Maximum distance between the arc and any vertex or chord midpoint of
    /// the polyline it replaces.
    pub tolerance: f64,
}

impl Default for ArcFitterConfig {
    fn default() -> Self {
        Self { tolerance: 0.05 }
    }
}

/// An arc through a stretch of vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
struct FittedArc {
    center: Point,
    ccw: bool,
}

/// Converts polyline stretches to arc moves
#[derive(Debug)]
pub struct ArcFitter {
    config: ArcFitterConfig,
}

impl ArcFitter {
    pub fn new(config: ArcFitterConfig) -> Self {
        Self { config }
    }

    /// Fits arcs over each maximal stretch of line moves in `run`. Existing
    /// arc moves are kept as they are.
    pub fn fit_run(&self, run: &Run) -> Run {
        let mut out = Run::new(run.start);
        let mut stretch = vec![run.start];
        for m in &run.moves {
            match m {
                DrawMove::Line(end) => stretch.push(*end),
                arc @ DrawMove::Arc { .. } => {
                    self.fit_stretch(&stretch, &mut out.moves);
                    out.moves.push(*arc);
                    stretch = vec![arc.end()];
                }
            }
        }
        self.fit_stretch(&stretch, &mut out.moves);
        out
    }

    /// Greedy left-to-right fit: from each vertex, take the longest stretch
    /// that fits one arc, or emit a single line.
    fn fit_stretch(&self, points: &[Point], moves: &mut Vec<DrawMove>) {
        let mut i = 0;
        while i + 1 < points.len() {
            let mut best: Option<(usize, FittedArc)> = None;
            let mut j = i + 2;
            while j < points.len() {
                match self.fit(&points[i..=j]) {
                    Some(arc) => best = Some((j, arc)),
                    None => break,
                }
                j += 1;
            }
            match best {
                Some((j, arc)) => {
                    moves.push(DrawMove::Arc {
                        end: points[j],
                        center: arc.center,
                        ccw: arc.ccw,
                    });
                    i = j;
                }
                None => {
                    moves.push(DrawMove::Line(points[i + 1]));
                    i += 1;
                }
            }
        }
    }

    fn fit(&self, points: &[Point]) -> Option<FittedArc> {
        let first = *points.first()?;
        let last = *points.last()?;
        let mid = points[points.len() / 2];
        let center = circumcenter(first, mid, last)?;
        let radius = first.distance_to(&center);
        if radius > MAX_ARC_RADIUS || first.approx_eq(&last, self.config.tolerance) {
            return None;
        }
        let tol = self.config.tolerance;

        let mut turn = 0.0;
        let mut swept = 0.0;
        for pair in points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if (b.distance_to(&center) - radius).abs() > tol {
                return None;
            }
            let chord_mid = a.lerp(&b, 0.5);
            if (chord_mid.distance_to(&center) - radius).abs() > tol {
                return None;
            }
            let (ra, rb) = (a - center, b - center);
            let cross = ra.cross(&rb);
            if cross.abs() <= f64::EPSILON {
                return None;
            }
            if turn != 0.0 && cross.signum() != turn {
                return None;
            }
            turn = cross.signum();
            swept += cross.atan2(ra.dot(&rb)).abs();
        }
        // a stretch wrapping the whole circle is left to lines
        if swept >= std::f64::consts::TAU - 1e-6 {
            return None;
        }
        Some(FittedArc {
            center,
            ccw: turn > 0.0,
        })
    }
}

impl Default for ArcFitter {
    fn default() -> Self {
        Self::new(ArcFitterConfig::default())
    }
}

/// Centre of the circle through three points, `None` when they are
/// collinear.
pub fn circumcenter(a: Point, b: Point, c: Point) -> Option<Point> {
    let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
    if d.abs() < 1e-12 {
        return None;
    }
    let a2 = a.x * a.x + a.y * a.y;
    let b2 = b.x * b.x + b.y * b.y;
    let c2 = c.x * c.x + c.y * c.y;
    let center = Point::new(
        (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d,
        (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d,
    );
    center.is_finite().then_some(center)
}
