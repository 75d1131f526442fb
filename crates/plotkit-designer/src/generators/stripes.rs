use plotkit_core::{GeometryModel, Path, Params, PipelineResult};
use tracing::debug;

use crate::context::StepContext;
use crate::geometry::parallel_chords;

pub fn generate(params: &Params, ctx: &StepContext) -> PipelineResult<GeometryModel> {
    let spacing = params.positive("spacing", 5.0)?;
    let orientation = params.choice("orientation", "horizontal", &["horizontal", "vertical"])?;
    let angle = params.number("angle", 0.0)?;
    let angle = if orientation == "vertical" { angle + 90.0 } else { angle };

    let bounds = ctx.canvas.drawing_bounds();
    let mut model = GeometryModel::new();
    model.extend_paths(
        parallel_chords(&bounds, angle, spacing)?
            .into_iter()
            .enumerate()
            .map(|(i, (a, b))| (format!("stripe_{i}"), Path::line(a, b))),
    );
    debug!("stripes: {} lines at {angle} deg", model.path_count());
    Ok(model)
}
