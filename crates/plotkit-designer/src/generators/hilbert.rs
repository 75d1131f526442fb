use plotkit_core::{GeometryModel, Params, PipelineResult, Point};
use tracing::debug;

use crate::context::StepContext;
use crate::geometry::add_polyline;

/// Converts a distance along a Hilbert curve covering an `n` x `n` grid
/// (`n` a power of two) into grid coordinates.
fn d2xy(n: u32, d: u32) -> (u32, u32) {
    let (mut x, mut y) = (0u32, 0u32);
    let mut t = d;
    let mut s = 1;
    while s < n {
        let rx = 1 & (t / 2);
        let ry = 1 & (t ^ rx);
        if ry == 0 {
            if rx == 1 {
                x = s - 1 - x;
                y = s - 1 - y;
            }
            std::mem::swap(&mut x, &mut y);
        }
        x += s * rx;
        y += s * ry;
        t /= 4;
        s *= 2;
    }
    (x, y)
}

/// A single Hilbert polyline filling the largest centred square.
pub fn generate(params: &Params, ctx: &StepContext) -> PipelineResult<GeometryModel> {
    let order = params.count("order", 5, 1, 8)? as u32;
    let n = 1u32 << order;
    let side = ctx.canvas.min_side();
    let cell = side / n as f64;
    let center = ctx.canvas.center();
    let corner = Point::new(center.x - side / 2.0, center.y - side / 2.0);

    let points: Vec<Point> = (0..n * n)
        .map(|d| {
            let (x, y) = d2xy(n, d);
            corner + Point::new((x as f64 + 0.5) * cell, (y as f64 + 0.5) * cell)
        })
        .collect();

    let mut model = GeometryModel::new();
    let segments = add_polyline(&mut model, "hilbert", &points);
    debug!("hilbert: order {order}, {segments} segments");
    Ok(model)
}
