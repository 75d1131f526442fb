use plotkit_core::model::normalize_degrees;
use plotkit_core::{
    Arc, Bounds, Circle, GeometryModel, Params, Path, PathGeometry, PipelineResult, Point,
};
use tracing::debug;

use super::rewrite_paths;
use crate::context::StepContext;
use crate::geometry::clip_segment;

/// Angular spans shorter than this are dropped as clipping noise.
const MIN_SWEEP_DEG: f64 = 1e-7;

pub(super) fn apply(model: &mut GeometryModel, params: &Params, ctx: &StepContext) -> PipelineResult<()> {
    let margin = params.non_negative("margin", ctx.canvas.margin)?;
    let bounds = ctx.canvas.inset_bounds(margin);
    let before = model.total_path_count();
    clip_to_bounds(model, ctx.offset, &bounds)?;
    debug!(
        "clip: {before} -> {} paths inside margin {margin}",
        model.total_path_count()
    );
    Ok(())
}

/// Removes the parts of every path outside the absolute rectangle `bounds`.
/// Lines and arcs crossing the boundary are split at it; circles crossing it
/// become arcs. `parent_offset` is the absolute origin of `model`'s parent.
pub fn clip_to_bounds(model: &mut GeometryModel, parent_offset: Point, bounds: &Bounds) -> PipelineResult<()> {
    rewrite_paths(model, parent_offset, &mut |path, offset| {
        // clip in the local frame against the bounds moved into it
        let local = bounds.translated(-offset);
        Ok(clip_path(path, &local))
    })
}

fn clip_path(path: &Path, bounds: &Bounds) -> Vec<Path> {
    match path {
        Path::Line(line) => clip_segment(line.start, line.end, bounds)
            .filter(|(a, b)| a.distance_to(b) > 0.0 || line.is_degenerate())
            .map(|(a, b)| {
                if a == line.start && b == line.end {
                    path.clone()
                } else {
                    Path::line(a, b)
                }
            })
            .into_iter()
            .collect(),
        Path::Arc(arc) => clip_arc(arc, bounds),
        Path::Circle(circle) => clip_circle(circle, bounds),
    }
}

/// Angles (degrees) where the circle through `center` with `radius` meets
/// the sides of `bounds`.
fn boundary_angles(center: Point, radius: f64, bounds: &Bounds) -> Vec<f64> {
    let mut angles = Vec::new();
    for x in [bounds.min.x, bounds.max.x] {
        let dx = x - center.x;
        if dx.abs() <= radius {
            let dy = (radius * radius - dx * dx).sqrt();
            angles.push(dy.atan2(dx).to_degrees());
            angles.push((-dy).atan2(dx).to_degrees());
        }
    }
    for y in [bounds.min.y, bounds.max.y] {
        let dy = y - center.y;
        if dy.abs() <= radius {
            let dx = (radius * radius - dy * dy).sqrt();
            angles.push(dy.atan2(dx).to_degrees());
            angles.push(dy.atan2(-dx).to_degrees());
        }
    }
    angles
}

/// Sub-spans `(start, end)` of the angular range starting at `start` and
/// sweeping `sweep` degrees whose midpoints are inside `bounds`.
fn inside_spans(center: Point, radius: f64, start: f64, sweep: f64, bounds: &Bounds) -> Vec<(f64, f64)> {
    let mut cuts: Vec<f64> = boundary_angles(center, radius, bounds)
        .into_iter()
        .map(|a| normalize_degrees(a - start))
        .filter(|u| *u > MIN_SWEEP_DEG && *u < sweep - MIN_SWEEP_DEG)
        .collect();
    cuts.push(0.0);
    cuts.push(sweep);
    cuts.sort_by(|a, b| a.total_cmp(b));
    cuts.dedup_by(|a, b| (*a - *b).abs() <= MIN_SWEEP_DEG);

    let mut spans: Vec<(f64, f64)> = Vec::new();
    for w in cuts.windows(2) {
        let mid = start + (w[0] + w[1]) / 2.0;
        if !bounds.contains(center + Point::from_angle(mid) * radius) {
            continue;
        }
        // merge with the previous span when they touch
        match spans.last_mut() {
            Some(last) if (last.1 - w[0]).abs() <= MIN_SWEEP_DEG => last.1 = w[1],
            _ => spans.push((w[0], w[1])),
        }
    }
    spans
}

fn clip_arc(arc: &Arc, bounds: &Bounds) -> Vec<Path> {
    let sweep = arc.sweep();
    let spans = inside_spans(arc.center, arc.radius, arc.start_angle, sweep, bounds);
    if let [(a, b)] = spans.as_slice() {
        if *a == 0.0 && *b == sweep {
            return vec![Path::Arc(*arc)];
        }
    }
    spans
        .into_iter()
        .map(|(a, b)| Path::arc(arc.center, arc.radius, arc.start_angle + a, arc.start_angle + b))
        .collect()
}

fn clip_circle(circle: &Circle, bounds: &Bounds) -> Vec<Path> {
    let spans = inside_spans(circle.center, circle.radius, 0.0, 360.0, bounds);
    let arc = |a: f64, b: f64| Path::arc(circle.center, circle.radius, a, b);
    let n = spans.len();
    if n == 1 && spans[0] == (0.0, 360.0) {
        return vec![Path::Circle(*circle)];
    }
    if n > 1 && spans[0].0 == 0.0 && spans[n - 1].1 == 360.0 {
        // the spans touching 0 and 360 degrees are one arc through 0
        let mut out: Vec<Path> = spans[1..n - 1].iter().map(|&(a, b)| arc(a, b)).collect();
        out.push(arc(spans[n - 1].0, 360.0 + spans[0].1));
        return out;
    }
    spans.into_iter().map(|(a, b)| arc(a, b)).collect()
}
