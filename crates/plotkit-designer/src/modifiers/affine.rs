use plotkit_core::{
    GeometryModel, LinearMap, ParameterError, Params, PipelineError, PipelineResult, Point,
};
use tracing::debug;

use super::{attach_copy, check_flatten_budget, for_each_node_mut, rewrite_paths};
use crate::context::StepContext;

/// Chord length used when a non-conformal map flattens curves.
const DEFAULT_FLATTEN_DETAIL: f64 = 1.0;

/// Applies `map` about the absolute point `pivot`.
///
/// The linear part goes into every path and every child origin, which are
/// all local quantities. The translation part only moves the model's own
/// origin: its absolute origin `O` becomes `pivot + M (O - pivot)`.
pub fn apply_linear(
    model: &mut GeometryModel,
    map: &LinearMap,
    pivot: Point,
    ctx: &StepContext,
    detail: f64,
) -> PipelineResult<()> {
    if !map.is_finite() || map.determinant() == 0.0 {
        return Err(PipelineError::Geometry("transform is singular".to_string()));
    }
    let absolute_origin = ctx.offset + model.origin;
    rewrite_paths(model, Point::ORIGIN, &mut |path, _| {
        Ok(path.transformed(map, detail))
    })?;
    for_each_node_mut(model, Point::ORIGIN, &mut |node, _| {
        for (_, child) in node.models_mut() {
            child.origin = map.apply(child.origin);
        }
        Ok(())
    })?;
    model.origin = pivot + map.apply(absolute_origin - pivot) - ctx.offset;
    Ok(())
}

pub fn scale_about(
    model: &mut GeometryModel,
    sx: f64,
    sy: f64,
    pivot: Point,
    ctx: &StepContext,
    detail: f64,
) -> PipelineResult<()> {
    apply_linear(model, &LinearMap::scale(sx, sy), pivot, ctx, detail)
}

fn pivot(params: &Params, ctx: &StepContext) -> PipelineResult<Point> {
    let center = ctx.canvas.center();
    Ok(Point::new(
        params.number("cx", center.x)?,
        params.number("cy", center.y)?,
    ))
}

pub(super) fn translate(model: &mut GeometryModel, params: &Params) -> PipelineResult<()> {
    let delta = Point::new(params.number("x", 0.0)?, params.number("y", 0.0)?);
    model.origin += delta;
    debug!("move: by ({}, {})", delta.x, delta.y);
    Ok(())
}

pub(super) fn rotate(model: &mut GeometryModel, params: &Params, ctx: &StepContext) -> PipelineResult<()> {
    let angle = params.number("angle", 0.0)?;
    let pivot = pivot(params, ctx)?;
    debug!("rotate: {angle} deg about ({}, {})", pivot.x, pivot.y);
    apply_linear(model, &LinearMap::rotation(angle), pivot, ctx, DEFAULT_FLATTEN_DETAIL)
}

/// `axis = "x"` flips X coordinates (a left-right mirror), `"y"` flips Y,
/// `"both"` flips both. With `copy` the mirrored model is added next to the
/// original instead of replacing it.
pub(super) fn mirror(model: &mut GeometryModel, params: &Params, ctx: &StepContext) -> PipelineResult<()> {
    let axis = params.choice("axis", "x", &["x", "y", "both"])?;
    let copy = params.flag("copy", false)?;
    let pivot = pivot(params, ctx)?;
    let map = LinearMap::mirror(axis != "y", axis != "x");

    if copy {
        let mut mirrored = model.clone();
        apply_linear(&mut mirrored, &map, pivot, ctx, DEFAULT_FLATTEN_DETAIL)?;
        let id = attach_copy(model, "mirror", mirrored);
        debug!("mirror: {axis} copy as {id}");
    } else {
        apply_linear(model, &map, pivot, ctx, DEFAULT_FLATTEN_DETAIL)?;
        debug!("mirror: {axis}");
    }
    Ok(())
}

/// Uniform `factor`, or per-axis `x`/`y` factors when given. Non-uniform
/// scaling flattens curves at `detail`.
pub(super) fn scale(model: &mut GeometryModel, params: &Params, ctx: &StepContext) -> PipelineResult<()> {
    let factor = params.positive("factor", 1.0)?;
    let sx = params.positive("x", factor)?;
    let sy = params.positive("y", factor)?;
    let detail = params.positive("detail", DEFAULT_FLATTEN_DETAIL)?;
    if !(sx * sy).is_finite() {
        return Err(ParameterError::InvalidValue {
            name: "factor".to_string(),
            reason: "scale overflows".to_string(),
        }
        .into());
    }
    if sx != sy {
        check_flatten_budget(model, detail, false)?;
    }
    let pivot = pivot(params, ctx)?;
    debug!("scale: ({sx}, {sy}) about ({}, {})", pivot.x, pivot.y);
    scale_about(model, sx, sy, pivot, ctx, detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotkit_core::{Canvas, Path};

    fn ctx() -> StepContext {
        StepContext::new(Canvas::new(100.0, 100.0, 0.0), 1)
    }

    #[test]
    fn test_rotate_moves_origin_and_children() {
        let mut child = GeometryModel::with_origin(Point::new(10.0, 0.0));
        child.add_path("l", Path::line(Point::ORIGIN, Point::new(1.0, 0.0)));
        let mut model = GeometryModel::new();
        model.add_model("c", child);

        let params = Params::new().with("angle", 90.0).with("cx", 0.0).with("cy", 0.0);
        rotate(&mut model, &params, &ctx()).unwrap();

        let abs = model.absolute_paths();
        let Path::Line(line) = &abs[0].path else {
            panic!("expected a line");
        };
        assert!(line.start.approx_eq(&Point::new(0.0, 10.0), 1e-9));
        assert!(line.end.approx_eq(&Point::new(0.0, 11.0), 1e-9));
    }

    #[test]
    fn test_rotate_about_canvas_centre_respects_origin() {
        let mut model = GeometryModel::with_origin(Point::new(60.0, 50.0));
        model.add_path("l", Path::line(Point::ORIGIN, Point::new(10.0, 0.0)));
        rotate(&mut model, &Params::new().with("angle", 180.0), &ctx()).unwrap();
        let abs = model.absolute_paths();
        let Path::Line(line) = &abs[0].path else {
            panic!("expected a line");
        };
        assert!(line.start.approx_eq(&Point::new(40.0, 50.0), 1e-9));
        assert!(line.end.approx_eq(&Point::new(30.0, 50.0), 1e-9));
    }

    #[test]
    fn test_mirror_copy_keeps_original() {
        let mut model = GeometryModel::new();
        model.add_path("l", Path::line(Point::new(10.0, 10.0), Point::new(20.0, 10.0)));
        let params = Params::new().with("axis", "x").with("copy", true);
        mirror(&mut model, &params, &ctx()).unwrap();
        let abs = model.absolute_paths();
        assert_eq!(abs.len(), 2);
        assert_eq!(abs[0].path, Path::line(Point::new(10.0, 10.0), Point::new(20.0, 10.0)));
        let Path::Line(copy) = &abs[1].path else {
            panic!("expected a line");
        };
        assert!(copy.start.approx_eq(&Point::new(90.0, 10.0), 1e-9));
        assert!(copy.end.approx_eq(&Point::new(80.0, 10.0), 1e-9));
    }

    #[test]
    fn test_non_uniform_scale_flattens_circle() {
        let mut model = GeometryModel::new();
        model.add_path("c", Path::circle(Point::new(50.0, 50.0), 10.0));
        let params = Params::new().with("x", 2.0).with("y", 1.0);
        scale(&mut model, &params, &ctx()).unwrap();
        assert!(model.path_count() > 8);
        let b = model.bounds().unwrap();
        assert!((b.width() - 40.0).abs() < 0.1);
        assert!((b.height() - 20.0).abs() < 0.5);
    }

    #[test]
    fn test_move_is_origin_only() {
        let mut model = GeometryModel::new();
        model.add_path("l", Path::line(Point::ORIGIN, Point::new(1.0, 0.0)));
        translate(&mut model, &Params::new().with("x", 5.0).with("y", -2.0)).unwrap();
        assert_eq!(model.origin, Point::new(5.0, -2.0));
        assert_eq!(model.path("l"), Some(&Path::line(Point::ORIGIN, Point::new(1.0, 0.0))));
    }
}
