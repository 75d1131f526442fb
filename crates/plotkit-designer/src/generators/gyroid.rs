use plotkit_core::model::POINT_EPSILON;
use plotkit_core::{GeometryModel, Params, Path, PipelineResult, Point};
use tracing::debug;

use super::check_samples;
use crate::context::StepContext;

fn gyroid(x: f64, y: f64, z: f64) -> f64 {
    x.sin() * y.cos() + y.sin() * z.cos() + z.sin() * x.cos()
}

fn crossing(a: Point, b: Point, va: f64, vb: f64) -> Point {
    let t = va / (va - vb);
    a.lerp(&b, t)
}

/// Iso-line of a planar gyroid slice at height `z`, traced with marching
/// squares on a `resolution` mm grid.
pub fn generate(params: &Params, ctx: &StepContext) -> PipelineResult<GeometryModel> {
    let scale = params.positive("scale", 0.1)?;
    let z = params.number("z", 0.0)?;
    let threshold = params.ranged("threshold", 0.0, -1.5, 1.5)?;
    let resolution = params.positive("resolution", 2.0)?;

    let bounds = ctx.canvas.drawing_bounds();
    let nx = (bounds.width() / resolution).ceil().max(1.0);
    let ny = (bounds.height() / resolution).ceil().max(1.0);
    check_samples("resolution", nx * ny)?;
    let (nx, ny) = (nx as usize, ny as usize);

    let at = |i: usize, j: usize| {
        Point::new(
            (bounds.min.x + i as f64 * resolution).min(bounds.max.x),
            (bounds.min.y + j as f64 * resolution).min(bounds.max.y),
        )
    };
    let value = |p: Point| gyroid(p.x * scale, p.y * scale, z * scale) - threshold;

    let mut lines: Vec<(String, Path)> = Vec::new();
    let emit = |lines: &mut Vec<(String, Path)>, a: Point, b: Point| {
        if a.distance_to(&b) > POINT_EPSILON {
            lines.push((format!("iso_{}", lines.len()), Path::line(a, b)));
        }
    };

    for j in 0..ny {
        for i in 0..nx {
            let corners = [at(i, j), at(i + 1, j), at(i + 1, j + 1), at(i, j + 1)];
            let values = corners.map(value);
            // crossing point on each edge, edges in corner order
            let mut edges: [Option<Point>; 4] = [None; 4];
            for e in 0..4 {
                let (a, b) = (e, (e + 1) % 4);
                if (values[a] > 0.0) != (values[b] > 0.0) {
                    edges[e] = Some(crossing(corners[a], corners[b], values[a], values[b]));
                }
            }
            match edges {
                [Some(e0), Some(e1), Some(e2), Some(e3)] => {
                    let centre = values.iter().sum::<f64>() / 4.0;
                    if (centre > 0.0) == (values[0] > 0.0) {
                        emit(&mut lines, e0, e1);
                        emit(&mut lines, e2, e3);
                    } else {
                        emit(&mut lines, e3, e0);
                        emit(&mut lines, e1, e2);
                    }
                }
                _ => {
                    let found: Vec<Point> = edges.iter().flatten().copied().collect();
                    if let [a, b] = found.as_slice() {
                        emit(&mut lines, *a, *b);
                    }
                }
            }
        }
    }
    let mut model = GeometryModel::new();
    model.extend_paths(lines);
    debug!("gyroid: {} iso segments", model.path_count());
    Ok(model)
}
