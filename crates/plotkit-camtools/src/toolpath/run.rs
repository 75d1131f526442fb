use plotkit_core::Point;
use std::f64::consts::TAU;

/// Points closer than this are the same machine position.
pub const POSITION_EPSILON: f64 = 1e-9;

/// One pen-down move, in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawMove {
    Line(Point),
    /// Circular move about `center`. `ccw` means increasing angle, toward
    /// +Y. An arc ending where it starts is a full circle.
    Arc { end: Point, center: Point, ccw: bool },
}

impl DrawMove {
    pub fn end(&self) -> Point {
        match self {
            DrawMove::Line(end) => *end,
            DrawMove::Arc { end, .. } => *end,
        }
    }

    /// Length of the move when it starts at `from`.
    pub fn length_from(&self, from: Point) -> f64 {
        match self {
            DrawMove::Line(end) => from.distance_to(end),
            DrawMove::Arc { end, center, ccw } => {
                let radius = from.distance_to(center);
                radius * arc_sweep(from, *end, *center, *ccw)
            }
        }
    }
}

/// Swept angle in radians, in `(0, TAU]`.
pub fn arc_sweep(from: Point, to: Point, center: Point, ccw: bool) -> f64 {
    if from.approx_eq(&to, POSITION_EPSILON) {
        return TAU;
    }
    let a0 = (from - center).angle_deg().to_radians();
    let a1 = (to - center).angle_deg().to_radians();
    let raw = if ccw { a1 - a0 } else { a0 - a1 };
    let sweep = raw.rem_euclid(TAU);
    if sweep <= 0.0 {
        TAU
    } else {
        sweep
    }
}

/// A pen-down stretch: one rapid to `start`, then `moves` without lifting.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub start: Point,
    pub moves: Vec<DrawMove>,
}

impl Run {
    pub fn new(start: Point) -> Self {
        Self {
            start,
            moves: Vec::new(),
        }
    }

    pub fn end(&self) -> Point {
        self.moves.last().map_or(self.start, |m| m.end())
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn draw_length(&self) -> f64 {
        let mut at = self.start;
        let mut total = 0.0;
        for m in &self.moves {
            total += m.length_from(at);
            at = m.end();
        }
        total
    }

    /// Start point followed by the end of every move.
    pub fn vertices(&self) -> Vec<Point> {
        std::iter::once(self.start)
            .chain(self.moves.iter().map(|m| m.end()))
            .collect()
    }

    pub fn is_finite(&self) -> bool {
        self.start.is_finite()
            && self.moves.iter().all(|m| match m {
                DrawMove::Line(end) => end.is_finite(),
                DrawMove::Arc { end, center, .. } => end.is_finite() && center.is_finite(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_arc_sweep_directions() {
        let c = Point::ORIGIN;
        let a = Point::new(1.0, 0.0);
        let b = Point::new(0.0, 1.0);
        assert!((arc_sweep(a, b, c, true) - PI / 2.0).abs() < 1e-12);
        assert!((arc_sweep(a, b, c, false) - 3.0 * PI / 2.0).abs() < 1e-12);
        assert!((arc_sweep(a, a, c, true) - TAU).abs() < 1e-12);
    }

    #[test]
    fn test_run_length() {
        let mut run = Run::new(Point::ORIGIN);
        run.moves.push(DrawMove::Line(Point::new(3.0, 4.0)));
        run.moves.push(DrawMove::Line(Point::new(3.0, 0.0)));
        assert_eq!(run.draw_length(), 9.0);
        assert_eq!(run.end(), Point::new(3.0, 0.0));
        assert_eq!(run.vertices().len(), 3);
    }
}
