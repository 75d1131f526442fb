use plotkit_core::{GeometryModel, Path, Point};
use plotkit_designer::{find_chains, find_chains_at, ChainOptions};

fn rectangle(model: &mut GeometryModel, w: f64, h: f64) {
    let c = [
        Point::new(0.0, 0.0),
        Point::new(w, 0.0),
        Point::new(w, h),
        Point::new(0.0, h),
    ];
    for i in 0..4 {
        model.add_path(format!("side_{i}"), Path::line(c[i], c[(i + 1) % 4]));
    }
}

#[test]
fn test_single_line_is_one_open_chain() {
    let mut model = GeometryModel::new();
    model.add_path("l", Path::line(Point::new(0.0, 0.0), Point::new(5.0, 0.0)));
    let chains = find_chains(&model, 0.01);
    assert_eq!(chains.len(), 1);
    assert_eq!(chains[0].len(), 1);
    assert!(!chains[0].closed);
}

#[test]
fn test_disjoint_lines_are_separate_chains() {
    let mut model = GeometryModel::new();
    model.add_path("a", Path::line(Point::new(0.0, 0.0), Point::new(5.0, 0.0)));
    model.add_path("b", Path::line(Point::new(0.0, 10.0), Point::new(5.0, 10.0)));
    let chains = find_chains(&model, 0.01);
    assert_eq!(chains.len(), 2);
    assert!(chains.iter().all(|c| c.len() == 1 && !c.closed));
}

#[test]
fn test_rectangle_is_one_closed_chain() {
    let mut model = GeometryModel::new();
    rectangle(&mut model, 10.0, 5.0);
    let chains = find_chains(&model, 0.01);
    assert_eq!(chains.len(), 1);
    assert_eq!(chains[0].len(), 4);
    assert!(chains[0].closed);
    assert!((chains[0].length() - 30.0).abs() < 1e-9);
}

#[test]
fn test_rectangle_with_gaps_inside_tolerance_closes() {
    let mut model = GeometryModel::new();
    model.add_path("a", Path::line(Point::new(0.0, 0.0), Point::new(10.0, 0.0)));
    model.add_path("b", Path::line(Point::new(10.005, 0.0), Point::new(10.0, 10.0)));
    model.add_path("c", Path::line(Point::new(10.0, 10.0), Point::new(0.0, 10.004)));
    model.add_path("d", Path::line(Point::new(0.0, 10.0), Point::new(0.0, 0.003)));
    let chains = find_chains(&model, 0.01);
    assert_eq!(chains.len(), 1);
    assert!(chains[0].closed);

    let strict = find_chains(&model, 0.001);
    assert!(strict.len() > 1);
}

#[test]
fn test_circle_is_closed_single_link() {
    let mut model = GeometryModel::new();
    model.add_path("c", Path::circle(Point::new(5.0, 5.0), 2.0));
    let chains = find_chains(&model, 0.01);
    assert_eq!(chains.len(), 1);
    assert_eq!(chains[0].len(), 1);
    assert!(chains[0].closed);
}

#[test]
fn test_chains_span_nested_models_in_absolute_space() {
    let mut root = GeometryModel::new();
    root.add_path("a", Path::line(Point::new(0.0, 0.0), Point::new(10.0, 0.0)));
    let mut child = GeometryModel::with_origin(Point::new(10.0, 0.0));
    child.add_path("b", Path::line(Point::new(0.0, 0.0), Point::new(0.0, 10.0)));
    root.add_model("child", child);

    let chains = find_chains(&root, 0.01);
    assert_eq!(chains.len(), 1);
    assert_eq!(chains[0].len(), 2);
    let ends = [chains[0].start_point().unwrap(), chains[0].end_point().unwrap()];
    assert!(ends.iter().any(|p| p.approx_eq(&Point::new(0.0, 0.0), 1e-9)));
    assert!(ends.iter().any(|p| p.approx_eq(&Point::new(10.0, 10.0), 1e-9)));
    let pts = chains[0].to_polyline(1.0);
    assert_eq!(pts.len(), 3);
}

#[test]
fn test_chains_below_route() {
    let mut root = GeometryModel::new();
    root.add_path("stray", Path::line(Point::new(50.0, 50.0), Point::new(60.0, 50.0)));
    let mut child = GeometryModel::with_origin(Point::new(5.0, 5.0));
    rectangle(&mut child, 4.0, 4.0);
    root.add_model("box", child);

    let chains = find_chains_at(&root, &["box".to_string()], &ChainOptions::default());
    assert_eq!(chains.len(), 1);
    assert!(chains[0].closed);
    let poly = chains[0].to_polyline(1.0);
    assert!(poly.iter().all(|p| p.x >= 5.0 - 1e-9 && p.x <= 9.0 + 1e-9));
}
