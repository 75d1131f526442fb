use plotkit_camtools::{emit, MachineConfig, PostProcessor, ToolpathError};
use plotkit_core::{GeometryModel, Path, Point};

fn model() -> GeometryModel {
    let mut model = GeometryModel::new();
    model.add_path("a", Path::line(Point::new(0.0, 0.0), Point::new(10.0, 0.0)));
    model.add_path("b", Path::line(Point::new(0.0, 5.0), Point::new(10.0, 5.0)));
    model
}

fn emit_as(post: &str) -> String {
    let config = MachineConfig {
        post_processor: post.to_string(),
        ..MachineConfig::default()
    };
    emit(&model(), &config).unwrap()
}

fn moves(gcode: &str) -> Vec<String> {
    gcode
        .lines()
        .filter(|l| l.starts_with("G0 X") || l.starts_with("G1 X"))
        .map(str::to_string)
        .collect()
}

#[test]
fn test_dialects_share_geometry() {
    let reference = moves(&emit_as("standard"));
    assert_eq!(reference.len(), 4);
    for post in PostProcessor::all() {
        assert_eq!(moves(&emit_as(post.name())), reference, "{}", post.name());
    }
}

#[test]
fn test_standard_header_and_footer() {
    let gcode = emit_as("standard");
    assert!(gcode.starts_with("; plotkit "));
    assert!(gcode.contains("; Post-processor: standard\n"));
    assert!(gcode.contains("; Pen lifts: 2\n"));
    assert!(gcode.contains("G21 "));
    assert!(gcode.contains("G90 "));
    assert!(!gcode.contains("G28"));
    assert!(gcode.trim_end().ends_with("M2          ; End program"));
}

#[test]
fn test_grbl_ends_with_m30() {
    assert!(emit_as("grbl").trim_end().ends_with("M30          ; End program"));
}

#[test]
fn test_marlin_homes_and_disables_steppers() {
    let gcode = emit_as("marlin");
    assert!(gcode.contains("G28         ; Home all axes\n"));
    assert!(gcode.trim_end().ends_with("M84          ; End program"));
}

#[test]
fn test_servo_pen() {
    let gcode = emit_as("servo");
    assert_eq!(gcode.matches("M3 S0\n").count(), 2);
    assert!(gcode.contains("M3 S5\n"));
    assert!(!gcode.contains(" Z"));
}

#[test]
fn test_laser_power() {
    let gcode = emit_as("laser");
    assert_eq!(gcode.matches("M3 S1000\n").count(), 2);
    assert!(gcode.contains("M5\n"));
    assert!(!gcode.contains(" Z"));
}

#[test]
fn test_unknown_post_processor() {
    let config = MachineConfig {
        post_processor: "haas".to_string(),
        ..MachineConfig::default()
    };
    match emit(&model(), &config) {
        Err(ToolpathError::UnknownPostProcessor(name)) => assert_eq!(name, "haas"),
        other => panic!("expected UnknownPostProcessor, got {other:?}"),
    }
}

#[test]
fn test_machine_config_from_camel_case_json() {
    let config: MachineConfig = serde_json::from_str(
        r#"{"feedRate": 800, "invertY": true, "postProcessor": "grbl", "unknown": 1}"#,
    )
    .unwrap();
    assert_eq!(config.feed_rate, 800.0);
    assert!(config.invert_y);
    assert_eq!(config.post_processor().unwrap(), PostProcessor::Grbl);
    assert_eq!(config.travel_rate, 3000.0);
}
