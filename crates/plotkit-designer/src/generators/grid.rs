use plotkit_core::{GeometryModel, Params, PipelineResult, Point};
use tracing::debug;

use crate::context::StepContext;
use crate::geometry::add_polygon;

/// One child model per cell, `cell_<row>_<col>`, each a closed square in
/// local coordinates with its origin at the cell's top-left corner.
///
/// Neighbouring cells each carry their own copy of a shared edge so every
/// cell is an independently closed loop for filling.
pub fn generate(params: &Params, ctx: &StepContext) -> PipelineResult<GeometryModel> {
    let cols = params.count("cols", 4, 1, 1000)?;
    let rows = params.count("rows", 4, 1, 1000)?;
    let spacing = params.positive("spacing", 20.0)?;

    let center = ctx.canvas.center();
    let x0 = center.x - cols as f64 * spacing / 2.0;
    let y0 = center.y - rows as f64 * spacing / 2.0;

    let square = [
        Point::ORIGIN,
        Point::new(spacing, 0.0),
        Point::new(spacing, spacing),
        Point::new(0.0, spacing),
    ];

    let mut model = GeometryModel::new();
    for r in 0..rows {
        for c in 0..cols {
            let mut cell = GeometryModel::with_origin(Point::new(
                x0 + c as f64 * spacing,
                y0 + r as f64 * spacing,
            ));
            add_polygon(&mut cell, "edge", &square);
            model.add_model(format!("cell_{r}_{c}"), cell);
        }
    }
    debug!("grid: {rows}x{cols} cells of {spacing} mm");
    Ok(model)
}
