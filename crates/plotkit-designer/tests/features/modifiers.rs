use plotkit_core::{Canvas, GeometryModel, Path, PathGeometry, PipelineError, PipelineStep, Point};
use plotkit_designer::modifiers::resample;
use plotkit_designer::{Modifier, StepContext};

fn ctx() -> StepContext {
    StepContext::new(Canvas::new(100.0, 100.0, 10.0), 11)
}

fn apply(model: &mut GeometryModel, step: PipelineStep) {
    let modifier = Modifier::from_name(&step.tool).expect("known modifier");
    modifier.apply(model, &step, &ctx()).expect("modifier succeeds");
}

fn sample_model() -> GeometryModel {
    let mut model = GeometryModel::new();
    model.add_path("line", Path::line(Point::new(20.0, 20.0), Point::new(80.0, 20.0)));
    model.add_path("arc", Path::arc(Point::new(50.0, 50.0), 10.0, 0.0, 120.0));
    model.add_path("circle", Path::circle(Point::new(30.0, 70.0), 5.0));
    model
}

#[test]
fn test_resample_is_idempotent() {
    let mut once = sample_model();
    resample(&mut once, 1.5).unwrap();
    let mut twice = once.clone();
    resample(&mut twice, 1.5).unwrap();
    assert_eq!(once, twice);
    assert!(once.paths().all(|(_, p)| matches!(p, Path::Line(_))));
}

#[test]
fn test_resample_preserves_length_of_lines() {
    let mut model = GeometryModel::new();
    model.add_path("l", Path::line(Point::new(0.0, 0.0), Point::new(10.0, 0.0)));
    resample(&mut model, 1.0).unwrap();
    assert_eq!(model.path_count(), 10);
    let total: f64 = model.paths().map(|(_, p)| p.length()).sum();
    assert!((total - 10.0).abs() < 1e-9);
}

#[test]
fn test_move_then_rotate_keeps_absolute_geometry_consistent() {
    let mut model = sample_model();
    apply(&mut model, PipelineStep::new("move").with_param("x", 5.0));
    apply(
        &mut model,
        PipelineStep::new("rotate")
            .with_param("angle", 180.0)
            .with_param("cx", 50.0)
            .with_param("cy", 50.0),
    );
    let line = model
        .absolute_paths()
        .into_iter()
        .find(|p| p.id == "line")
        .expect("line survives");
    let b = line.path.bounds();
    // (25..85, 20) rotated half a turn about (50, 50)
    assert!((b.min.x - 15.0).abs() < 1e-9 && (b.max.x - 75.0).abs() < 1e-9);
    assert!((b.min.y - 80.0).abs() < 1e-9);
}

#[test]
fn test_mirror_copy_keeps_original() {
    let mut model = sample_model();
    apply(
        &mut model,
        PipelineStep::new("mirror").with_param("axis", "x").with_param("copy", true),
    );
    assert_eq!(model.total_path_count(), 6);
    assert!(model.model("mirror_1").is_some());
}

#[test]
fn test_clip_drops_outside_paths() {
    let mut model = GeometryModel::new();
    model.add_path("inside", Path::line(Point::new(20.0, 20.0), Point::new(30.0, 30.0)));
    model.add_path("outside", Path::line(Point::new(0.0, 0.0), Point::new(5.0, 5.0)));
    model.add_path("crossing", Path::line(Point::new(0.0, 50.0), Point::new(50.0, 50.0)));
    apply(&mut model, PipelineStep::new("clip"));
    assert!(model.path("outside").is_none());
    assert_eq!(model.path("inside"), Some(&Path::line(Point::new(20.0, 20.0), Point::new(30.0, 30.0))));
    let crossing = model.path("crossing").expect("clipped, not removed");
    assert!((crossing.bounds().min.x - 10.0).abs() < 1e-9);
}

#[test]
fn test_linear_array() {
    let mut model = sample_model();
    apply(
        &mut model,
        PipelineStep::new("array")
            .with_param("mode", "linear")
            .with_param("count", 3)
            .with_param("dx", 10.0)
            .with_param("dy", 0.0),
    );
    assert_eq!(model.total_path_count(), 9);
    let bounds = model.bounds().unwrap();
    assert!((bounds.max.x - 100.0).abs() < 1e-9);
}

#[test]
fn test_trim_with_constant_mask_keeps_everything() {
    let mut model = sample_model();
    let mut step = PipelineStep::new("trim").with_param("threshold", 0.9);
    step.mask = Some(plotkit_core::MaskConfig::new(plotkit_core::MaskKind::Constant));
    apply(&mut model, step);
    assert_eq!(model.path_count(), 3);
}

#[test]
fn test_flattening_steps_reject_microscopic_detail() {
    let steps = [
        PipelineStep::new("resample").with_param("detail", 1e-9),
        PipelineStep::new("warp").with_param("detail", 1e-9),
        PipelineStep::new("noise").with_param("detail", 1e-9),
        PipelineStep::new("scale")
            .with_param("x", 2.0)
            .with_param("y", 0.5)
            .with_param("detail", 1e-9),
        PipelineStep::new("fill").with_param("detail", 1e-9),
        PipelineStep::new("fill").with_param("spacing", 1e-12),
    ];
    for step in steps {
        let mut model = sample_model();
        let modifier = Modifier::from_name(&step.tool).expect("known modifier");
        let err = modifier.apply(&mut model, &step, &ctx()).unwrap_err();
        assert!(
            matches!(err, PipelineError::Parameter(_)),
            "{}: {err}",
            step.tool
        );
        assert_eq!(model, sample_model(), "{} changed the model", step.tool);
    }
}

#[test]
fn test_uniform_scale_ignores_detail() {
    let mut model = sample_model();
    apply(
        &mut model,
        PipelineStep::new("scale").with_param("factor", 2.0).with_param("detail", 1e-9),
    );
    assert!(matches!(model.path("circle"), Some(Path::Circle(_))));
}
