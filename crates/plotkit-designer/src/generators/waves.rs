use plotkit_core::{GeometryModel, Params, PipelineResult, Point};
use std::f64::consts::TAU;
use tracing::debug;

use super::check_samples;
use crate::context::StepContext;
use crate::geometry::add_polyline;

/// Horizontal sine lines evenly spread over the drawing height.
/// `phase_shift` advances the phase of each successive line, in degrees.
pub fn generate(params: &Params, ctx: &StepContext) -> PipelineResult<GeometryModel> {
    let count = params.count("count", 20, 1, 10_000)?;
    let amplitude = params.non_negative("amplitude", 5.0)?;
    let wavelength = params.positive("wavelength", 40.0)?;
    let step = params.positive("step", 1.0)?;
    let phase_shift = params.number("phase_shift", 0.0)?;

    let bounds = ctx.canvas.drawing_bounds();
    let samples = check_samples("step", (bounds.width() / step).ceil() * count as f64)? / count;
    let row_height = bounds.height() / count as f64;

    let mut model = GeometryModel::new();
    for i in 0..count {
        let baseline = bounds.min.y + (i as f64 + 0.5) * row_height;
        let phase = (i as f64 * phase_shift).to_radians();
        let points: Vec<Point> = (0..=samples)
            .map(|k| {
                let x = (bounds.min.x + k as f64 * step).min(bounds.max.x);
                let y = baseline + amplitude * (TAU * (x - bounds.min.x) / wavelength + phase).sin();
                Point::new(x, y)
            })
            .collect();
        add_polyline(&mut model, &format!("wave_{i}"), &points);
    }
    debug!("waves: {count} lines, {} segments", model.path_count());
    Ok(model)
}
