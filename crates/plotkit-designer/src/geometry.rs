//! Small geometric helpers shared by generators and modifiers.

use plotkit_core::model::POINT_EPSILON;
use plotkit_core::{Bounds, GeometryModel, ParameterError, ParameterResult, Path, Point};

/// Upper bound on sampled points or emitted segments per operation.
pub(crate) const MAX_SAMPLES: usize = 2_000_000;

/// Fails with a parameter error naming `name` when a sample count would
/// exceed [`MAX_SAMPLES`].
pub(crate) fn check_samples(name: &str, samples: f64) -> ParameterResult<usize> {
    if !samples.is_finite() || samples > MAX_SAMPLES as f64 {
        return Err(ParameterError::InvalidValue {
            name: name.to_string(),
            reason: format!("would produce {samples} samples (limit {MAX_SAMPLES})"),
        });
    }
    Ok(samples.max(0.0) as usize)
}

/// Liang-Barsky clip of the parametric segment `start + t * dir`, `t` in
/// `[t0, t1]`, against `bounds`. Returns the clipped parameter range.
pub fn clip_parametric(
    start: Point,
    dir: Point,
    t0: f64,
    t1: f64,
    bounds: &Bounds,
) -> Option<(f64, f64)> {
    let mut lo = t0;
    let mut hi = t1;
    let checks = [
        (-dir.x, start.x - bounds.min.x),
        (dir.x, bounds.max.x - start.x),
        (-dir.y, start.y - bounds.min.y),
        (dir.y, bounds.max.y - start.y),
    ];
    for (p, q) in checks {
        if p.abs() <= f64::EPSILON {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            lo = lo.max(r);
        } else {
            hi = hi.min(r);
        }
        if lo > hi {
            return None;
        }
    }
    Some((lo, hi))
}

/// Clips a segment to `bounds`, `None` when nothing of it is inside.
pub fn clip_segment(start: Point, end: Point, bounds: &Bounds) -> Option<(Point, Point)> {
    let dir = end - start;
    let (lo, hi) = clip_parametric(start, dir, 0.0, 1.0, bounds)?;
    Some((start + dir * lo, start + dir * hi))
}

/// Chord of the infinite line through `through` along `dir` inside `bounds`.
pub fn clip_infinite_line(through: Point, dir: Point, bounds: &Bounds) -> Option<(Point, Point)> {
    let (lo, hi) = clip_parametric(through, dir, f64::NEG_INFINITY, f64::INFINITY, bounds)?;
    if !lo.is_finite() || !hi.is_finite() {
        return None;
    }
    Some((through + dir * lo, through + dir * hi))
}

/// Parallel chords across `bounds` at `angle_deg`, `spacing` apart, with the
/// first chord through the bounds' extreme corner.
///
/// Fails when `spacing` is so small that the chord count would exceed
/// [`MAX_SAMPLES`].
pub fn parallel_chords(
    bounds: &Bounds,
    angle_deg: f64,
    spacing: f64,
) -> ParameterResult<Vec<(Point, Point)>> {
    let dir = Point::from_angle(angle_deg);
    let normal = Point::new(-dir.y, dir.x);
    let corners = [
        bounds.min,
        Point::new(bounds.max.x, bounds.min.y),
        bounds.max,
        Point::new(bounds.min.x, bounds.max.y),
    ];
    let projections: Vec<f64> = corners.iter().map(|c| c.dot(&normal)).collect();
    let lo = projections.iter().cloned().fold(f64::INFINITY, f64::min);
    let hi = projections.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    let steps = check_samples("spacing", ((hi - lo) / spacing + 1e-9).floor() + 1.0)?;
    let mut chords = Vec::with_capacity(steps);
    for i in 0..steps {
        let offset = lo + i as f64 * spacing;
        if let Some((a, b)) = clip_infinite_line(normal * offset, dir, bounds) {
            if a.distance_to(&b) > POINT_EPSILON {
                chords.push((a, b));
            }
        }
    }
    Ok(chords)
}

/// Adds one line per consecutive point pair as `<prefix>_<n>`, skipping
/// zero-length pairs. Returns the number of lines added.
pub fn add_polyline(model: &mut GeometryModel, prefix: &str, points: &[Point]) -> usize {
    let lines: Vec<(String, Path)> = points
        .windows(2)
        .filter(|pair| pair[0].distance_to(&pair[1]) > POINT_EPSILON)
        .enumerate()
        .map(|(n, pair)| (format!("{prefix}_{n}"), Path::line(pair[0], pair[1])))
        .collect();
    let added = lines.len();
    model.extend_paths(lines);
    added
}

/// Like [`add_polyline`] with a closing segment back to the first point.
pub fn add_polygon(model: &mut GeometryModel, prefix: &str, points: &[Point]) -> usize {
    match points.first() {
        Some(first) => {
            let mut closed = points.to_vec();
            closed.push(*first);
            add_polyline(model, prefix, &closed)
        }
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Bounds {
        Bounds::new(Point::ORIGIN, Point::new(10.0, 10.0))
    }

    #[test]
    fn test_clip_segment_crossing() {
        let (a, b) = clip_segment(Point::new(-5.0, 5.0), Point::new(15.0, 5.0), &unit_box()).unwrap();
        assert!(a.approx_eq(&Point::new(0.0, 5.0), 1e-12));
        assert!(b.approx_eq(&Point::new(10.0, 5.0), 1e-12));
    }

    #[test]
    fn test_clip_segment_outside() {
        assert!(clip_segment(Point::new(-5.0, -1.0), Point::new(15.0, -1.0), &unit_box()).is_none());
    }

    #[test]
    fn test_parallel_chords_horizontal() {
        let chords = parallel_chords(&unit_box(), 0.0, 2.5).unwrap();
        // y = 0, 2.5, 5, 7.5, 10
        assert_eq!(chords.len(), 5);
        for (a, b) in &chords {
            assert!((a.y - b.y).abs() < 1e-12);
            assert!((a.distance_to(b) - 10.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_parallel_chords_rejects_tiny_spacing() {
        let err = parallel_chords(&unit_box(), 30.0, 1e-12).unwrap_err();
        assert!(matches!(err, ParameterError::InvalidValue { ref name, .. } if name == "spacing"));
    }

    #[test]
    fn test_check_samples_limit() {
        assert_eq!(check_samples("n", 10.0).unwrap(), 10);
        assert!(check_samples("n", MAX_SAMPLES as f64).is_ok());
        assert!(check_samples("n", MAX_SAMPLES as f64 + 1.0).is_err());
        assert!(check_samples("n", f64::INFINITY).is_err());
    }

    #[test]
    fn test_add_polygon_closes() {
        let mut m = GeometryModel::new();
        let n = add_polygon(
            &mut m,
            "p",
            &[Point::ORIGIN, Point::new(1.0, 0.0), Point::new(1.0, 1.0)],
        );
        assert_eq!(n, 3);
        assert_eq!(m.path_count(), 3);
    }
}
