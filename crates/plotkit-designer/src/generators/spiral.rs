use plotkit_core::{GeometryModel, Params, PipelineResult, Point};
use tracing::debug;

use super::check_samples;
use crate::context::StepContext;
use crate::geometry::add_polyline;

/// Archimedean spiral from the canvas centre. `spacing` is the radial gap
/// between turns; by default the outermost turn touches the drawing area.
pub fn generate(params: &Params, ctx: &StepContext) -> PipelineResult<GeometryModel> {
    let turns = params.positive("turns", 10.0)?;
    let step = params.ranged("step", 2.0, 0.01, 90.0)?;
    let spacing = match params.optional_number("spacing")? {
        Some(_) => params.positive("spacing", 1.0)?,
        None => ctx.canvas.min_side() / 2.0 / turns,
    };

    let total = turns * 360.0;
    let samples = check_samples("step", (total / step).ceil())?;
    let center = ctx.canvas.center();
    let points: Vec<Point> = (0..=samples)
        .map(|i| {
            let theta = (i as f64 * step).min(total);
            center + Point::from_angle(theta) * (spacing * theta / 360.0)
        })
        .collect();

    let mut model = GeometryModel::new();
    let n = add_polyline(&mut model, "spiral", &points);
    debug!("spiral: {turns} turns, {n} segments");
    Ok(model)
}
