//! Modifiers: tree-to-tree transforms applied to the accumulated model.
//!
//! Modifiers mutate the model in place. The [`StepContext`] offset is the
//! absolute origin of the model's parent, which is zero for the pipeline
//! root and the parent's origin for the detached copy a layering step works
//! on.

mod affine;
pub mod arrays;
mod clip;
mod layering;
mod masked;
mod resample;

pub use affine::{apply_linear, scale_about};
pub use clip::clip_to_bounds;
pub use layering::{apply_layer, apply_layer_style, attach_copy, snapshot};
pub use resample::resample;

use plotkit_core::{
    GeometryModel, MaskField, Path, PathGeometry, PipelineResult, PipelineStep, Point,
};
use std::collections::HashSet;

use crate::context::StepContext;
use crate::fill::{apply_filling, FillOptions};
use crate::geometry::check_samples;

/// Available modifiers. Layering tools are listed here but executed by the
/// pipeline, since their nested steps need the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Move,
    Rotate,
    Mirror,
    Scale,
    Array,
    Clip,
    Resample,
    Trim,
    Warp,
    Noise,
    Fill,
    Layer,
}

impl Modifier {
    pub fn all() -> &'static [Modifier] {
        &[
            Modifier::Move,
            Modifier::Rotate,
            Modifier::Mirror,
            Modifier::Scale,
            Modifier::Array,
            Modifier::Clip,
            Modifier::Resample,
            Modifier::Trim,
            Modifier::Warp,
            Modifier::Noise,
            Modifier::Fill,
            Modifier::Layer,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Modifier::Move => "move",
            Modifier::Rotate => "rotate",
            Modifier::Mirror => "mirror",
            Modifier::Scale => "scale",
            Modifier::Array => "array",
            Modifier::Clip => "clip",
            Modifier::Resample => "resample",
            Modifier::Trim => "trim",
            Modifier::Warp => "warp",
            Modifier::Noise => "noise",
            Modifier::Fill => "fill",
            Modifier::Layer => "layer",
        }
    }

    /// Looks a modifier up by name. `hatch` is an alias of `fill`;
    /// `duplicate` and `clone` are aliases of `layer`.
    pub fn from_name(name: &str) -> Option<Modifier> {
        match name.trim().to_lowercase().as_str() {
            "hatch" => Some(Modifier::Fill),
            "duplicate" | "clone" => Some(Modifier::Layer),
            other => Self::all().iter().copied().find(|m| m.name() == other),
        }
    }

    /// Applies a non-layering modifier to `model`.
    pub fn apply(
        &self,
        model: &mut GeometryModel,
        step: &PipelineStep,
        ctx: &StepContext,
    ) -> PipelineResult<()> {
        let params = &step.params;
        match self {
            Modifier::Move => affine::translate(model, params),
            Modifier::Rotate => affine::rotate(model, params, ctx),
            Modifier::Mirror => affine::mirror(model, params, ctx),
            Modifier::Scale => affine::scale(model, params, ctx),
            Modifier::Array => arrays::apply(model, params, ctx),
            Modifier::Clip => clip::apply(model, params, ctx),
            Modifier::Resample => {
                let detail = params.positive("detail", 1.0)?;
                resample(model, detail)
            }
            Modifier::Trim => masked::trim(model, params, mask_field(step, ctx)?.as_ref(), ctx),
            Modifier::Warp => masked::warp(model, params, mask_field(step, ctx)?.as_ref(), ctx),
            Modifier::Noise => masked::jitter(model, params, mask_field(step, ctx)?.as_ref(), ctx),
            Modifier::Fill => {
                let options = FillOptions {
                    angle: params.number("angle", 45.0)?,
                    spacing: params.positive("spacing", 1.0)?,
                    tolerance: params.positive("tolerance", ctx.chain_tolerance)?,
                    cross: params.flag("cross", false)?,
                    detail: params.positive("detail", 0.5)?,
                };
                check_flatten_budget(model, options.detail, false)?;
                if let Some(bounds) = model.bounds() {
                    let span = bounds.width().hypot(bounds.height());
                    check_samples("spacing", span / options.spacing)?;
                }
                apply_filling(model, ctx.offset, &options);
                Ok(())
            }
            Modifier::Layer => Err(plotkit_core::PipelineError::Geometry(
                "layering steps are run by the pipeline executor".to_string(),
            )),
        }
    }
}

fn mask_field(step: &PipelineStep, ctx: &StepContext) -> PipelineResult<Option<MaskField>> {
    Ok(step
        .mask
        .as_ref()
        .map(|config| MaskField::new(config, ctx.seed, &ctx.canvas))
        .transpose()?)
}

/// Fails when flattening every curve under `model` at `detail` would exceed
/// the sample limit. Lines count as one piece unless `split_lines` is set.
pub(crate) fn check_flatten_budget(
    model: &GeometryModel,
    detail: f64,
    split_lines: bool,
) -> PipelineResult<()> {
    let mut total = 0.0;
    model.walk(Point::ORIGIN, &mut |_, node| {
        for (_, path) in node.paths() {
            total += match path {
                Path::Line(_) if !split_lines => 1.0,
                _ => (path.length() / detail).ceil().max(1.0),
            };
        }
    });
    check_samples("detail", total)?;
    Ok(())
}

/// Calls `visit` on every node with that node's absolute origin, parents
/// before children.
pub(crate) fn for_each_node_mut<F>(
    model: &mut GeometryModel,
    parent_offset: Point,
    visit: &mut F,
) -> PipelineResult<()>
where
    F: FnMut(&mut GeometryModel, Point) -> PipelineResult<()>,
{
    let offset = parent_offset + model.origin;
    visit(model, offset)?;
    for (_, child) in model.models_mut() {
        for_each_node_mut(child, offset, visit)?;
    }
    Ok(())
}

/// Rebuilds every path of every node through `rewrite`. A path mapped to a
/// single piece keeps its id; a split path becomes `<id>_<k>`; an empty
/// result removes the path. Ids stay unique within a node.
pub(crate) fn rewrite_paths<F>(
    model: &mut GeometryModel,
    parent_offset: Point,
    rewrite: &mut F,
) -> PipelineResult<()>
where
    F: FnMut(&Path, Point) -> PipelineResult<Vec<Path>>,
{
    for_each_node_mut(model, parent_offset, &mut |node, offset| {
        let old = node.take_paths();
        let mut used = HashSet::with_capacity(old.len());
        let mut rebuilt = Vec::with_capacity(old.len());
        for (id, path) in old {
            let pieces = rewrite(&path, offset)?;
            if pieces.len() == 1 {
                let id = unique_id(&mut used, id);
                rebuilt.extend(pieces.into_iter().map(|p| (id.clone(), p)));
            } else {
                for (k, piece) in pieces.into_iter().enumerate() {
                    rebuilt.push((unique_id(&mut used, format!("{id}_{k}")), piece));
                }
            }
        }
        node.set_paths(rebuilt);
        Ok(())
    })
}

fn unique_id(used: &mut HashSet<String>, base: String) -> String {
    if used.insert(base.clone()) {
        return base;
    }
    let mut n = 1;
    loop {
        let candidate = format!("{base}_{n}");
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
