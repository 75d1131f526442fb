use plotkit_core::{GeometryModel, Path, Params, PipelineResult, Point};
use std::collections::HashSet;
use tracing::debug;

use super::check_samples;
use crate::context::StepContext;

/// Grid key for an edge, independent of direction, so edges shared by two
/// hexagons are emitted once.
fn edge_key(a: Point, b: Point) -> ((i64, i64), (i64, i64)) {
    let q = |p: Point| ((p.x * 1e6).round() as i64, (p.y * 1e6).round() as i64);
    let (ka, kb) = (q(a), q(b));
    if ka <= kb {
        (ka, kb)
    } else {
        (kb, ka)
    }
}

/// Flat-topped hexagon tiling of the drawing area. `size` is the hexagon
/// circumradius; only whole hexagons are drawn.
pub fn generate(params: &Params, ctx: &StepContext) -> PipelineResult<GeometryModel> {
    let size = params.positive("size", 8.0)?;
    let bounds = ctx.canvas.drawing_bounds();
    let half_height = size * 3f64.sqrt() / 2.0;
    let dx = 1.5 * size;
    let dy = 2.0 * half_height;
    let cols = (bounds.width() / dx).ceil() + 1.0;
    let rows = (bounds.height() / dy).ceil() + 1.0;
    check_samples("size", cols * rows * 6.0)?;

    let mut seen = HashSet::new();
    let mut edges: Vec<(String, Path)> = Vec::new();
    for c in 0..cols as usize {
        for r in 0..rows as usize {
            let stagger = if c % 2 == 1 { half_height } else { 0.0 };
            let center = Point::new(
                bounds.min.x + size + c as f64 * dx,
                bounds.min.y + half_height + stagger + r as f64 * dy,
            );
            if center.x + size > bounds.max.x + 1e-9 || center.y + half_height > bounds.max.y + 1e-9 {
                continue;
            }
            let corners: Vec<Point> = (0..6)
                .map(|k| center + Point::from_angle(60.0 * k as f64) * size)
                .collect();
            for k in 0..6 {
                let (a, b) = (corners[k], corners[(k + 1) % 6]);
                if seen.insert(edge_key(a, b)) {
                    edges.push((format!("edge_{}", edges.len()), Path::line(a, b)));
                }
            }
        }
    }
    let mut model = GeometryModel::new();
    model.extend_paths(edges);
    debug!("honeycomb: {} edges", model.path_count());
    Ok(model)
}
