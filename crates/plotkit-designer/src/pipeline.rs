//! Pipeline executor.
//!
//! Folds an ordered step list into one [`GeometryModel`]. The first
//! generator seeds the model, later generators are merged in as
//! `pattern_<n>` children, and every modifier transforms the accumulated
//! tree. A failing step is recorded as a [`Diagnostic`] and skipped; the
//! model is left exactly as it was before that step.

use plotkit_core::{Canvas, GeometryModel, PipelineError, PipelineResult, PipelineStep};
use tracing::{debug, info, warn};

use crate::context::StepContext;
use crate::generators::Generator;
use crate::modifiers::{apply_layer, apply_layer_style, attach_copy, Modifier};

/// Prefix of children created by generator steps after the first.
pub const PATTERN_PREFIX: &str = "pattern";

/// A step that was skipped.
#[derive(Debug)]
pub struct Diagnostic {
    /// Index of the top-level step. Failures inside a layering step's
    /// nested list report the index of the layering step.
    pub step_index: usize,
    /// Tool name of the failing step as written in the configuration.
    pub tool: String,
    pub error: PipelineError,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "step {} ({}): {}", self.step_index, self.tool, self.error)
    }
}

/// Result of a pipeline run.
#[derive(Debug, Default)]
pub struct PipelineOutput {
    pub model: GeometryModel,
    pub diagnostics: Vec<Diagnostic>,
}

impl PipelineOutput {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// A resolved tool name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Generator(Generator),
    Modifier(Modifier),
}

impl Tool {
    pub fn from_name(name: &str) -> Option<Tool> {
        let lower = name.trim().to_lowercase();
        Generator::from_name(&lower)
            .map(Tool::Generator)
            .or_else(|| Modifier::from_name(&lower).map(Tool::Modifier))
    }
}

/// Runs step lists against a fixed canvas and seed.
#[derive(Debug, Clone, Copy)]
pub struct Pipeline {
    ctx: StepContext,
}

impl Pipeline {
    pub fn new(canvas: Canvas, seed: u64) -> Self {
        Self {
            ctx: StepContext::new(canvas, seed),
        }
    }

    pub fn with_chain_tolerance(mut self, tolerance: f64) -> Self {
        self.ctx.chain_tolerance = tolerance;
        self
    }

    pub fn context(&self) -> &StepContext {
        &self.ctx
    }

    pub fn run(&self, steps: &[PipelineStep]) -> PipelineOutput {
        run(steps, &self.ctx)
    }
}

/// Runs `steps` from an empty model.
pub fn run(steps: &[PipelineStep], ctx: &StepContext) -> PipelineOutput {
    info!(
        "Running pipeline: {} steps, seed {}, canvas {}x{} mm",
        steps.len(),
        ctx.seed,
        ctx.canvas.width,
        ctx.canvas.height
    );
    let mut executor = Executor {
        diagnostics: Vec::new(),
    };
    let model = executor.run_list(steps, None, ctx, None);
    info!(
        "Pipeline finished: {} paths, {} skipped steps",
        model.total_path_count(),
        executor.diagnostics.len()
    );
    PipelineOutput {
        model,
        diagnostics: executor.diagnostics,
    }
}

struct Executor {
    diagnostics: Vec<Diagnostic>,
}

impl Executor {
    /// Folds `steps` into `seed_model`. `parent_index` is set for nested
    /// lists so their diagnostics point at the owning layering step.
    fn run_list(
        &mut self,
        steps: &[PipelineStep],
        seed_model: Option<GeometryModel>,
        ctx: &StepContext,
        parent_index: Option<usize>,
    ) -> GeometryModel {
        let mut seeded = seed_model.is_some();
        let mut model = seed_model.unwrap_or_default();

        for (index, step) in steps.iter().enumerate() {
            let step_ctx = ctx.with_seed(ctx.seed.wrapping_add(index as u64));
            let report_index = parent_index.unwrap_or(index);
            if let Err(error) = self.run_step(&mut model, &mut seeded, step, &step_ctx, report_index)
            {
                warn!("Skipping step {report_index} ({}): {error}", step.tool);
                self.diagnostics.push(Diagnostic {
                    step_index: report_index,
                    tool: step.tool.clone(),
                    error,
                });
            }
        }
        model
    }

    fn run_step(
        &mut self,
        model: &mut GeometryModel,
        seeded: &mut bool,
        step: &PipelineStep,
        ctx: &StepContext,
        report_index: usize,
    ) -> PipelineResult<()> {
        let tool = Tool::from_name(&step.tool)
            .ok_or_else(|| PipelineError::UnknownTool(step.tool.clone()))?;

        match tool {
            Tool::Generator(generator) => {
                let mut generated = generator.generate(&step.params, ctx)?;
                ensure_finite(generator.name(), &generated)?;
                apply_layer_style(&mut generated, &step.params)?;
                debug!(
                    "{}: generated {} paths",
                    generator.name(),
                    generated.total_path_count()
                );
                // generated paths are absolute; re-express them in the frame
                // of the accumulated model's parent
                generated.origin = generated.origin - ctx.offset;
                if *seeded {
                    let id = attach_copy(model, PATTERN_PREFIX, generated);
                    debug!("{}: merged as {id}", generator.name());
                } else {
                    *model = generated;
                    *seeded = true;
                }
            }
            Tool::Modifier(Modifier::Layer) => {
                let id = apply_layer(model, step, ctx, |copy, nested_ctx| {
                    self.run_list(&step.nested_steps, Some(copy), nested_ctx, Some(report_index))
                })?;
                debug!("{}: attached {id}", step.tool);
            }
            Tool::Modifier(modifier) => {
                let mut candidate = model.clone();
                modifier.apply(&mut candidate, step, ctx)?;
                ensure_finite(modifier.name(), &candidate)?;
                debug!(
                    "{}: {} -> {} paths",
                    modifier.name(),
                    model.total_path_count(),
                    candidate.total_path_count()
                );
                *model = candidate;
            }
        }
        Ok(())
    }
}

fn ensure_finite(tool: &str, model: &GeometryModel) -> PipelineResult<()> {
    if model.is_finite() {
        Ok(())
    } else {
        Err(PipelineError::NumericInvalid {
            tool: tool.to_string(),
            reason: "model contains non-finite coordinates".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotkit_core::Point;

    fn ctx() -> StepContext {
        StepContext::new(Canvas::new(100.0, 100.0, 10.0), 5)
    }

    #[test]
    fn test_empty_pipeline() {
        let out = run(&[], &ctx());
        assert!(out.model.is_empty());
        assert!(out.is_clean());
    }

    #[test]
    fn test_modifiers_without_generator() {
        let steps = vec![PipelineStep::new("rotate").with_param("angle", 30.0)];
        let out = run(&steps, &ctx());
        assert!(out.model.is_empty());
        assert!(out.is_clean());
    }

    #[test]
    fn test_unknown_tool_is_skipped() {
        let steps = vec![
            PipelineStep::new("stripes").with_param("spacing", 10.0),
            PipelineStep::new("explode"),
            PipelineStep::new("move").with_param("x", 1.0),
        ];
        let out = run(&steps, &ctx());
        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(out.diagnostics[0].step_index, 1);
        assert!(matches!(out.diagnostics[0].error, PipelineError::UnknownTool(_)));
        assert_eq!(out.model.origin, Point::new(1.0, 0.0));
        assert!(out.model.path_count() > 0);
    }

    #[test]
    fn test_bad_parameter_leaves_model_untouched() {
        let base = vec![PipelineStep::new("stripes").with_param("spacing", 10.0)];
        let mut with_bad = base.clone();
        with_bad.push(PipelineStep::new("resample").with_param("detail", -1.0));
        let a = run(&base, &ctx());
        let b = run(&with_bad, &ctx());
        assert_eq!(b.diagnostics.len(), 1);
        assert_eq!(a.model, b.model);
    }

    #[test]
    fn test_second_generator_becomes_pattern_child() {
        let steps = vec![
            PipelineStep::new("stripes").with_param("spacing", 10.0),
            PipelineStep::new("concentric").with_param("count", 3),
        ];
        let out = run(&steps, &ctx());
        assert!(out.is_clean());
        let child = out.model.model("pattern_1").unwrap();
        assert_eq!(child.path_count(), 3);
    }

    #[test]
    fn test_layer_attaches_nested_result() {
        let steps = vec![
            PipelineStep::new("stripes").with_param("spacing", 10.0),
            PipelineStep::new("duplicate")
                .with_param("color", "red")
                .with_nested(PipelineStep::new("move").with_param("y", 2.0)),
        ];
        let out = run(&steps, &ctx());
        assert!(out.is_clean());
        let own = out.model.path_count();
        let layer = out.model.model("duplicate_1").unwrap();
        assert_eq!(layer.path_count(), own);
        assert_eq!(layer.origin, Point::new(0.0, 2.0));
        assert_eq!(out.model.total_path_count(), own * 2);
    }

    #[test]
    fn test_nested_failure_reports_parent_index() {
        let steps = vec![
            PipelineStep::new("stripes"),
            PipelineStep::new("layer").with_nested(PipelineStep::new("nope")),
        ];
        let out = run(&steps, &ctx());
        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(out.diagnostics[0].step_index, 1);
        assert_eq!(out.diagnostics[0].tool, "nope");
        assert!(out.model.model("layer_1").is_some());
    }

    #[test]
    fn test_same_seed_same_model() {
        let steps = vec![
            PipelineStep::new("flowfield").with_param("count", 10),
            PipelineStep::new("warp").with_param("kind", "noise"),
        ];
        assert_eq!(run(&steps, &ctx()).model, run(&steps, &ctx()).model);
    }
}
