use plotkit_core::{GeometryModel, ParameterError, Path, Params, PipelineResult, Point};
use tracing::debug;

use crate::context::StepContext;

/// Rays from the canvas centre between the `inner` and `outer` radii.
pub fn generate(params: &Params, ctx: &StepContext) -> PipelineResult<GeometryModel> {
    let count = params.count("count", 36, 1, 100_000)?;
    let inner = params.non_negative("inner", 0.0)?;
    let outer = params.positive("outer", ctx.canvas.min_side() / 2.0)?;
    if inner >= outer {
        return Err(ParameterError::OutOfRange {
            name: "inner".to_string(),
            value: inner,
            min: 0.0,
            max: outer,
        }
        .into());
    }

    let center = ctx.canvas.center();
    let mut model = GeometryModel::new();
    model.extend_paths((0..count).map(|k| {
        let dir = Point::from_angle(k as f64 * 360.0 / count as f64);
        (format!("ray_{k}"), Path::line(center + dir * inner, center + dir * outer))
    }));
    debug!("radial: {count} rays");
    Ok(model)
}
