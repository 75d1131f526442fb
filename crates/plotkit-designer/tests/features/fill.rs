use plotkit_core::{Canvas, GeometryModel, Path, PathGeometry, Point, PipelineStep};
use plotkit_designer::fill::is_fill_id;
use plotkit_designer::{apply_filling, hatch_polygon, FillOptions, Pipeline};

fn unit_square() -> GeometryModel {
    let mut model = GeometryModel::new();
    let c = [
        Point::new(0.0, 0.0),
        Point::new(1.0, 0.0),
        Point::new(1.0, 1.0),
        Point::new(0.0, 1.0),
    ];
    for i in 0..4 {
        model.add_path(format!("e{i}"), Path::line(c[i], c[(i + 1) % 4]));
    }
    model
}

#[test]
fn test_unit_square_segment_counts() {
    for (spacing, expected) in [(0.25, 4), (0.1, 10), (0.3, 3)] {
        let mut model = unit_square();
        let report = apply_filling(
            &mut model,
            Point::ORIGIN,
            &FillOptions {
                angle: 0.0,
                spacing,
                ..FillOptions::default()
            },
        );
        assert_eq!(report.chains_filled, 1, "spacing {spacing}");
        assert_eq!(report.segments, expected, "spacing {spacing}");
        assert_eq!(model.model("fill_1").map(|f| f.path_count()), Some(expected));
    }
}

#[test]
fn test_fill_lines_stay_inside_polygon() {
    let mut model = unit_square();
    apply_filling(
        &mut model,
        Point::ORIGIN,
        &FillOptions {
            angle: 30.0,
            spacing: 0.05,
            ..FillOptions::default()
        },
    );
    for abs in model.absolute_paths().iter().filter(|p| p.route.iter().any(|r| is_fill_id(r))) {
        let b = abs.path.bounds();
        assert!(b.min.x >= -1e-9 && b.max.x <= 1.0 + 1e-9);
        assert!(b.min.y >= -1e-9 && b.max.y <= 1.0 + 1e-9);
    }
}

#[test]
fn test_open_chain_is_not_filled() {
    let mut model = GeometryModel::new();
    model.add_path("a", Path::line(Point::new(0.0, 0.0), Point::new(10.0, 0.0)));
    model.add_path("b", Path::line(Point::new(10.0, 0.0), Point::new(10.0, 10.0)));
    let report = apply_filling(&mut model, Point::ORIGIN, &FillOptions::default());
    assert_eq!(report.segments, 0);
    assert_eq!(model.model_count(), 0);
}

#[test]
fn test_concave_polygon_spans() {
    // U shape opening upward (y down): two prongs joined at the bottom
    let u = [
        Point::new(0.0, 0.0),
        Point::new(1.0, 0.0),
        Point::new(1.0, 2.0),
        Point::new(2.0, 2.0),
        Point::new(2.0, 0.0),
        Point::new(3.0, 0.0),
        Point::new(3.0, 3.0),
        Point::new(0.0, 3.0),
    ];
    let spans = hatch_polygon(&u, 0.0, 1.0);
    // rows at y = 0.5 and 1.5 cross both prongs, y = 2.5 crosses the base
    assert_eq!(spans.len(), 5);
}

#[test]
fn test_cross_hatch_doubles_square() {
    let mut model = unit_square();
    let report = apply_filling(
        &mut model,
        Point::ORIGIN,
        &FillOptions {
            angle: 0.0,
            spacing: 0.25,
            cross: true,
            ..FillOptions::default()
        },
    );
    assert_eq!(report.segments, 8);
}

#[test]
fn test_grid_scenario() {
    let steps = vec![
        PipelineStep::new("grid")
            .with_param("cols", 2)
            .with_param("rows", 2)
            .with_param("spacing", 40.0),
        PipelineStep::new("resample").with_param("detail", 2.0),
        PipelineStep::new("fill")
            .with_param("angle", 0.0)
            .with_param("spacing", 1.0),
    ];
    let output = Pipeline::new(Canvas::default(), 1).run(&steps);
    assert!(output.is_clean(), "{:?}", output.diagnostics);

    let mut total = 0;
    for (cell_id, cell) in output.model.models() {
        assert!(cell_id.starts_with("cell_"));
        let fill = cell.model("fill_1").expect("every cell is filled");
        assert_eq!(fill.path_count(), 40);
        total += fill.path_count();
        for (_, path) in fill.paths() {
            // local to the cell: strictly inside its 40 mm square
            let b = path.bounds();
            assert!(b.min.y > 0.0 && b.max.y < 40.0);
            assert!(b.min.x >= -1e-6 && b.max.x <= 40.0 + 1e-6);
        }
    }
    assert_eq!(total, 160);
}
