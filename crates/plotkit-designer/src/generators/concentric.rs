use plotkit_core::{GeometryModel, Path, Params, PipelineResult, Point};
use tracing::debug;

use crate::context::StepContext;
use crate::geometry::add_polygon;

pub fn generate(params: &Params, ctx: &StepContext) -> PipelineResult<GeometryModel> {
    let count = params.count("count", 10, 1, 10_000)?;
    let spacing = params.positive("spacing", 5.0)?;
    let shape = params.choice("shape", "circle", &["circle", "square", "polygon"])?;
    let sides = match shape.as_str() {
        "square" => 4,
        _ => params.count("sides", 6, 3, 360)?,
    };

    let center = ctx.canvas.center();
    let mut model = GeometryModel::new();
    for i in 0..count {
        let radius = spacing * (i + 1) as f64;
        if shape == "circle" {
            model.add_path(format!("ring_{i}"), Path::circle(center, radius));
            continue;
        }
        // squares sit axis-aligned, polygons point up
        let (start, circumradius) = if shape == "square" {
            (45.0, radius * std::f64::consts::SQRT_2)
        } else {
            (-90.0, radius)
        };
        let vertices: Vec<Point> = (0..sides)
            .map(|k| center + Point::from_angle(start + k as f64 * 360.0 / sides as f64) * circumradius)
            .collect();
        add_polygon(&mut model, &format!("ring_{i}"), &vertices);
    }
    debug!("concentric: {count} {shape} rings");
    Ok(model)
}
