use plotkit_core::{GeometryModel, ParameterError, Params, PipelineError, PipelineResult, Point};
use std::f64::consts::TAU;
use tracing::debug;

use crate::context::StepContext;
use crate::geometry::add_polygon;

/// Gielis superformula radius at polar angle `phi` (radians).
fn radius(phi: f64, m: f64, n1: f64, n2: f64, n3: f64, a: f64, b: f64) -> f64 {
    let t = m * phi / 4.0;
    let term1 = (t.cos() / a).abs().powf(n2);
    let term2 = (t.sin() / b).abs().powf(n3);
    (term1 + term2).powf(-1.0 / n1)
}

/// `count` nested closed curves, the outermost scaled to the drawing area.
pub fn generate(params: &Params, ctx: &StepContext) -> PipelineResult<GeometryModel> {
    let m = params.number("m", 6.0)?;
    let n1 = params.number("n1", 1.0)?;
    let n2 = params.number("n2", 1.0)?;
    let n3 = params.number("n3", 1.0)?;
    let a = params.positive("a", 1.0)?;
    let b = params.positive("b", 1.0)?;
    let count = params.count("count", 10, 1, 1000)?;
    let samples = params.count("samples", 360, 8, 100_000)?;
    if n1 == 0.0 {
        return Err(ParameterError::InvalidValue {
            name: "n1".to_string(),
            reason: "must be non-zero".to_string(),
        }
        .into());
    }

    let shape: Vec<Point> = (0..samples)
        .map(|i| {
            let phi = TAU * i as f64 / samples as f64;
            Point::new(phi.cos(), phi.sin()) * radius(phi, m, n1, n2, n3, a, b)
        })
        .collect();
    if shape.iter().any(|p| !p.is_finite()) {
        return Err(PipelineError::NumericInvalid {
            tool: "superformula".to_string(),
            reason: "radius is not finite for these exponents".to_string(),
        });
    }
    let r_max = shape.iter().map(|p| p.length()).fold(0.0, f64::max);
    if r_max <= 0.0 {
        return Err(PipelineError::NumericInvalid {
            tool: "superformula".to_string(),
            reason: "curve collapses to a point".to_string(),
        });
    }

    let center = ctx.canvas.center();
    let outer = ctx.canvas.min_side() / 2.0;
    let mut model = GeometryModel::new();
    for i in 0..count {
        let scale = outer * (i + 1) as f64 / count as f64 / r_max;
        let curve: Vec<Point> = shape.iter().map(|p| center + *p * scale).collect();
        add_polygon(&mut model, &format!("curve_{i}"), &curve);
    }
    debug!("superformula: m={m}, {count} curves");
    Ok(model)
}
