use plotkit_core::{Canvas, PipelineError, PipelineStep};
use plotkit_designer::{render_svg, Pipeline};

fn pipeline() -> Pipeline {
    Pipeline::new(Canvas::new(150.0, 100.0, 10.0), 2024)
}

#[test]
fn test_step_list_from_json() {
    let json = r#"[
        {"tool": "concentric", "params": {"count": 4, "spacing": "6"}},
        {"tool": "warp", "params": {"kind": "twist", "strength": 20}, "mask": {"kind": "radial"}},
        {"tool": "duplicate", "params": {"color": "blue"}, "nestedSteps": [
            {"tool": "scale", "params": {"factor": 0.5}}
        ]}
    ]"#;
    let steps: Vec<PipelineStep> = serde_json::from_str(json).unwrap();
    let output = pipeline().run(&steps);
    assert!(output.is_clean(), "{:?}", output.diagnostics);
    assert!(output.model.model("duplicate_1").is_some());
    assert_eq!(
        output.model.total_path_count(),
        2 * output.model.path_count()
    );
}

#[test]
fn test_fail_soft_keeps_rendering() {
    let steps = vec![
        PipelineStep::new("stripes").with_param("spacing", 10.0),
        PipelineStep::new("sparkle"),
        PipelineStep::new("stripes").with_param("spacing", -1.0),
        PipelineStep::new("rotate").with_param("angle", 90.0),
    ];
    let output = pipeline().run(&steps);
    assert_eq!(output.diagnostics.len(), 2);
    assert!(matches!(output.diagnostics[0].error, PipelineError::UnknownTool(_)));
    assert!(matches!(output.diagnostics[1].error, PipelineError::Parameter(_)));
    assert_eq!(output.diagnostics[1].step_index, 2);
    assert!(output.model.path_count() > 0);
}

#[test]
fn test_seed_changes_random_output() {
    let steps = vec![PipelineStep::new("flowfield").with_param("count", 15)];
    let a = Pipeline::new(Canvas::default(), 1).run(&steps);
    let b = Pipeline::new(Canvas::default(), 2).run(&steps);
    let c = Pipeline::new(Canvas::default(), 1).run(&steps);
    assert_ne!(a.model, b.model);
    assert_eq!(a.model, c.model);
}

#[test]
fn test_rendered_document_has_every_path() {
    let steps = vec![
        PipelineStep::new("grid").with_param("cols", 2).with_param("rows", 2),
        PipelineStep::new("phyllotaxis").with_param("count", 10),
    ];
    let output = pipeline().run(&steps);
    let svg = render_svg(&output.model, &Canvas::new(150.0, 100.0, 10.0));
    assert_eq!(svg.matches("<line ").count(), 16);
    assert_eq!(svg.matches("<circle ").count(), 10);
}
