use plotkit_core::{GeometryModel, LayerStyle, Params, PipelineResult, PipelineStep};
use tracing::debug;

use crate::context::StepContext;

/// Deep copy of `model` positioned to overlay it exactly when added as one of
/// its children.
pub fn snapshot(model: &GeometryModel) -> GeometryModel {
    let mut copy = model.clone();
    copy.origin = plotkit_core::Point::ORIGIN;
    copy
}

/// Adds `copy`, whose origin is expressed in the same frame as `model`'s
/// origin, as a new child `<prefix>_<n>` of `model`. Returns the child id.
pub fn attach_copy(model: &mut GeometryModel, prefix: &str, mut copy: GeometryModel) -> String {
    copy.origin = copy.origin - model.origin;
    let id = model.unique_child_id(prefix);
    model.add_model(id.clone(), copy);
    id
}

/// Reads the `color`, `stroke_width` and `visible` display params. Returns
/// `None` when none of them is set.
pub fn layer_style(params: &Params) -> PipelineResult<Option<LayerStyle>> {
    let stroke = params.raw_text("color").map(str::to_string);
    let stroke_width = match params.optional_number("stroke_width")? {
        Some(_) => Some(params.positive("stroke_width", 1.0)?),
        None => None,
    };
    let visible = params.flag("visible", true)?;
    if stroke.is_none() && stroke_width.is_none() && visible {
        return Ok(None);
    }
    Ok(Some(LayerStyle {
        stroke,
        stroke_width,
        visible,
    }))
}

pub fn apply_layer_style(model: &mut GeometryModel, params: &Params) -> PipelineResult<()> {
    if let Some(style) = layer_style(params)? {
        model.style = Some(style);
    }
    Ok(())
}

/// Runs a layering step: `run_nested` receives a snapshot of `model` and a
/// context whose offset is `model`'s absolute origin, and its result is
/// attached as a new child named after the step's tool.
pub fn apply_layer<F>(
    model: &mut GeometryModel,
    step: &PipelineStep,
    ctx: &StepContext,
    run_nested: F,
) -> PipelineResult<String>
where
    F: FnOnce(GeometryModel, &StepContext) -> GeometryModel,
{
    let style = layer_style(&step.params)?;
    let nested_ctx = ctx.with_offset(ctx.offset + model.origin);
    let mut layer = run_nested(snapshot(model), &nested_ctx);
    if style.is_some() {
        layer.style = style;
    }
    let prefix = step.tool.trim().to_lowercase();
    let id = model.unique_child_id(&prefix);
    debug!(
        "{prefix}: layer {id} with {} nested steps, {} paths",
        step.nested_steps.len(),
        layer.total_path_count()
    );
    model.add_model(id.clone(), layer);
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotkit_core::{Canvas, Path, Point};

    #[test]
    fn test_layer_overlays_then_diverges() {
        let mut model = GeometryModel::with_origin(Point::new(5.0, 5.0));
        model.add_path("l", Path::line(Point::ORIGIN, Point::new(1.0, 0.0)));
        let step = PipelineStep::new("duplicate").with_param("color", "#FF0000");
        let ctx = StepContext::new(Canvas::default(), 3);

        let id = apply_layer(&mut model, &step, &ctx, |mut copy, nested| {
            assert_eq!(nested.offset, Point::new(5.0, 5.0));
            copy.origin += Point::new(0.0, 1.0);
            copy
        })
        .unwrap();

        assert_eq!(id, "duplicate_1");
        let layer = model.model(&id).unwrap();
        assert_eq!(layer.style.as_ref().and_then(|s| s.stroke.as_deref()), Some("#FF0000"));
        let abs = model.absolute_paths();
        assert_eq!(abs.len(), 2);
        assert_eq!(abs[0].path, Path::line(Point::new(5.0, 5.0), Point::new(6.0, 5.0)));
        assert_eq!(abs[1].path, Path::line(Point::new(5.0, 6.0), Point::new(6.0, 6.0)));
    }

    #[test]
    fn test_invisible_style() {
        let style = layer_style(&Params::new().with("visible", false)).unwrap().unwrap();
        assert!(!style.visible);
        assert!(layer_style(&Params::new()).unwrap().is_none());
    }
}
