use plotkit_core::{GeometryModel, Path, Params, PipelineResult, Point};
use tracing::debug;

use crate::context::StepContext;

/// Vogel spiral of dots. Dots whose circle would leave the drawing area are
/// skipped.
pub fn generate(params: &Params, ctx: &StepContext) -> PipelineResult<GeometryModel> {
    let count = params.count("count", 400, 1, 200_000)?;
    let spacing = params.positive("spacing", 4.0)?;
    let dot_radius = params.positive("dot_radius", 1.0)?;
    let angle = params.number("angle", 137.508)?;

    let center = ctx.canvas.center();
    let area = ctx.canvas.inset_bounds(ctx.canvas.margin + dot_radius);
    let mut model = GeometryModel::new();
    model.extend_paths((0..count).filter_map(|i| {
        let r = spacing * (i as f64).sqrt();
        let p = center + Point::from_angle(i as f64 * angle) * r;
        area.contains(p).then(|| (format!("dot_{i}"), Path::circle(p, dot_radius)))
    }));
    debug!("phyllotaxis: {} of {count} dots inside", model.path_count());
    Ok(model)
}
