use plotkit_core::{GeometryModel, Path, Params, PipelineResult};
use tracing::debug;

use crate::context::StepContext;
use crate::geometry::parallel_chords;

/// Three families of parallel lines at 0, 60 and 120 degrees.
pub fn generate(params: &Params, ctx: &StepContext) -> PipelineResult<GeometryModel> {
    let spacing = params.positive("spacing", 10.0)?;
    let bounds = ctx.canvas.drawing_bounds();
    let mut model = GeometryModel::new();
    for (family, angle) in [0.0, 60.0, 120.0].into_iter().enumerate() {
        model.extend_paths(
            parallel_chords(&bounds, angle, spacing)?
                .into_iter()
                .enumerate()
                .map(|(i, (a, b))| (format!("iso_{family}_{i}"), Path::line(a, b))),
        );
    }
    debug!("isometric: {} lines", model.path_count());
    Ok(model)
}
