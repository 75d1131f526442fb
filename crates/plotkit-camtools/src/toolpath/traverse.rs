use plotkit_core::{to_absolute, GeometryModel, Path, PathGeometry, Point};

use super::run::{DrawMove, Run, POSITION_EPSILON};

/// Options that change how paths become runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraverseOptions {
    /// Keep arcs and circles as native arc moves.
    pub native_arcs: bool,
    /// Chord length for flattening curves otherwise.
    pub curve_detail: f64,
}

/// One run per drawable path, depth-first over the tree with a node's own
/// paths before its children. Coordinates are absolute canvas millimetres.
///
/// Zero-length lines draw nothing and are skipped, as are the paths of
/// nodes whose style (or an ancestor's) is invisible.
pub fn collect_runs(model: &GeometryModel, options: &TraverseOptions) -> Vec<Run> {
    let mut runs = Vec::with_capacity(model.total_path_count());
    collect_node(model, Point::ORIGIN, options, &mut runs);
    runs
}

fn collect_node(node: &GeometryModel, parent_offset: Point, options: &TraverseOptions, runs: &mut Vec<Run>) {
    if node.style.as_ref().is_some_and(|s| !s.visible) {
        return;
    }
    let offset = parent_offset + node.origin;
    for (_, path) in node.paths() {
        if let Some(run) = path_run(&to_absolute(offset, path), options) {
            runs.push(run);
        }
    }
    for (_, child) in node.models() {
        collect_node(child, offset, options, runs);
    }
}

/// The run drawing a single absolute path.
pub fn path_run(path: &Path, options: &TraverseOptions) -> Option<Run> {
    match path {
        Path::Line(line) => {
            if line.start.approx_eq(&line.end, POSITION_EPSILON) {
                return None;
            }
            let mut run = Run::new(line.start);
            run.moves.push(DrawMove::Line(line.end));
            Some(run)
        }
        Path::Arc(arc) if options.native_arcs && arc.radius > 0.0 => {
            let mut run = Run::new(arc.start_point());
            run.moves.push(DrawMove::Arc {
                end: arc.end_point(),
                center: arc.center,
                ccw: true,
            });
            Some(run)
        }
        Path::Circle(circle) if options.native_arcs && circle.radius > 0.0 => {
            let start = circle.center + Point::new(circle.radius, 0.0);
            let mut run = Run::new(start);
            run.moves.push(DrawMove::Arc {
                end: start,
                center: circle.center,
                ccw: true,
            });
            Some(run)
        }
        curved => polyline_run(&curved.flatten(options.curve_detail)),
    }
}

fn polyline_run(points: &[Point]) -> Option<Run> {
    let (first, rest) = points.split_first()?;
    let mut run = Run::new(*first);
    let mut last = *first;
    for p in rest {
        if !p.approx_eq(&last, POSITION_EPSILON) {
            run.moves.push(DrawMove::Line(*p));
            last = *p;
        }
    }
    (!run.is_empty()).then_some(run)
}
