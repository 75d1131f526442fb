use plotkit_core::rng::{rand_range, seeded};
use plotkit_core::{GeometryModel, Params, PerlinNoise, PipelineResult, Point};
use std::f64::consts::TAU;
use tracing::debug;

use super::check_samples;
use crate::context::StepContext;
use crate::geometry::add_polyline;

/// Euler-integrated streamlines of a noise-driven angle field.
///
/// Seed points are drawn from the step seed; each streamline becomes a child
/// model `flow_<n>` holding its line chain. Integration stops early when a
/// line leaves the drawing area.
pub fn generate(params: &Params, ctx: &StepContext) -> PipelineResult<GeometryModel> {
    let count = params.count("count", 200, 1, 100_000)?;
    let steps = params.count("steps", 50, 1, 100_000)?;
    let step_length = params.positive("step_length", 1.0)?;
    let scale = params.positive("scale", 0.01)?;
    check_samples("steps", count as f64 * steps as f64)?;

    let bounds = ctx.canvas.drawing_bounds();
    let noise = PerlinNoise::new(ctx.seed);
    let mut rng = seeded(ctx.seed);

    let mut model = GeometryModel::new();
    for n in 0..count {
        let mut p = Point::new(
            rand_range(&mut rng, bounds.min.x, bounds.max.x),
            rand_range(&mut rng, bounds.min.y, bounds.max.y),
        );
        let mut points = vec![p];
        for _ in 0..steps {
            let angle = noise.noise2(p.x * scale, p.y * scale) * TAU;
            let next = p + Point::new(angle.cos(), angle.sin()) * step_length;
            if !bounds.contains(next) {
                break;
            }
            points.push(next);
            p = next;
        }
        let mut line = GeometryModel::new();
        if add_polyline(&mut line, "seg", &points) > 0 {
            model.add_model(format!("flow_{n}"), line);
        }
    }
    debug!("flowfield: {} streamlines", model.model_count());
    Ok(model)
}
