//! Hatch fill engine.
//!
//! For every closed chain formed by a node's own paths, parallel scanlines
//! are intersected with the chain's polygon and the interior spans become
//! line paths in a new `fill_<n>` child of that same node. Scanlines are
//! placed half a spacing in from the polygon's extent, so a fill never lands
//! on the boundary it fills.

use plotkit_core::{GeometryModel, Path, Point};
use tracing::debug;

use crate::chains::{find_chains_with, ChainOptions};
use crate::context::DEFAULT_CHAIN_TOLERANCE;

/// Children whose id starts with this prefix are fills and are never filled
/// again.
pub const FILL_PREFIX: &str = "fill";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillOptions {
    /// Hatch direction in degrees.
    pub angle: f64,
    /// Distance between hatch lines in mm.
    pub spacing: f64,
    /// Endpoint tolerance used to find closed chains.
    pub tolerance: f64,
    /// Adds a second pass at `angle + 90`.
    pub cross: bool,
    /// Chord length used to flatten curved chain links.
    pub detail: f64,
}

impl Default for FillOptions {
    fn default() -> Self {
        Self {
            angle: 45.0,
            spacing: 1.0,
            tolerance: DEFAULT_CHAIN_TOLERANCE,
            cross: false,
            detail: 0.5,
        }
    }
}

/// Result of [`apply_filling`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillReport {
    pub chains_filled: usize,
    pub segments: usize,
}

/// Signed area of a closed polygon (shoelace).
pub fn polygon_area(polygon: &[Point]) -> f64 {
    let n = polygon.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f64 = (0..n)
        .map(|i| polygon[i].cross(&polygon[(i + 1) % n]))
        .sum();
    twice / 2.0
}

/// Interior spans of `polygon` along scanlines at `angle` degrees, `spacing`
/// apart. The polygon is implicitly closed. Uses the even-odd rule with a
/// half-open crossing test so vertices on a scanline count once.
pub fn hatch_polygon(polygon: &[Point], angle: f64, spacing: f64) -> Vec<(Point, Point)> {
    if polygon.len() < 3
        || spacing <= 0.0
        || !spacing.is_finite()
        || polygon_area(polygon).abs() <= 1e-12
    {
        return Vec::new();
    }

    let rotated: Vec<Point> = polygon.iter().map(|p| p.rotated(-angle)).collect();
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for p in &rotated {
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }

    let mut segments = Vec::new();
    let mut y = min_y + spacing / 2.0;
    let mut row = 0usize;
    while y < max_y {
        let mut xs = Vec::new();
        for i in 0..rotated.len() {
            let p1 = rotated[i];
            let p2 = rotated[(i + 1) % rotated.len()];
            if ((p1.y <= y && p2.y > y) || (p2.y <= y && p1.y > y)) && (p2.y - p1.y).abs() > 1e-12 {
                xs.push(p1.x + (y - p1.y) * (p2.x - p1.x) / (p2.y - p1.y));
            }
        }
        xs.sort_by(|a, b| a.total_cmp(b));
        for pair in xs.chunks_exact(2) {
            if pair[1] - pair[0] > 1e-9 {
                segments.push((
                    Point::new(pair[0], y).rotated(angle),
                    Point::new(pair[1], y).rotated(angle),
                ));
            }
        }
        row += 1;
        y = min_y + spacing / 2.0 + row as f64 * spacing;
    }
    segments
}

/// Fills every closed chain in `model` and its descendants.
///
/// `base` is the absolute origin of `model`'s parent (zero for a root).
/// Chains are found per node from that node's own paths; fill lines are
/// stored in local coordinates of the node the chain came from.
pub fn apply_filling(model: &mut GeometryModel, base: Point, options: &FillOptions) -> FillReport {
    let mut report = FillReport::default();
    fill_node(model, base, options, &mut report);
    debug!(
        "fill: {} chains, {} segments at {} deg",
        report.chains_filled, report.segments, options.angle
    );
    report
}

fn fill_node(node: &mut GeometryModel, base: Point, options: &FillOptions, report: &mut FillReport) {
    let origin = base + node.origin;

    let fills: Vec<Vec<(Point, Point)>> = {
        let chain_options = ChainOptions {
            endpoint_tolerance: options.tolerance,
            shallow: true,
            base_offset: base,
        };
        find_chains_with(node, &chain_options)
            .iter()
            .filter(|c| c.closed)
            .map(|chain| {
                let polygon = chain.to_polyline(options.detail);
                let mut spans = hatch_polygon(&polygon, options.angle, options.spacing);
                if options.cross {
                    spans.extend(hatch_polygon(&polygon, options.angle + 90.0, options.spacing));
                }
                spans
            })
            .filter(|spans| !spans.is_empty())
            .collect()
    };

    for spans in fills {
        let mut fill = GeometryModel::new();
        fill.extend_paths(
            spans
                .iter()
                .enumerate()
                .map(|(i, (a, b))| (format!("hatch_{i}"), Path::line(*a - origin, *b - origin))),
        );
        report.chains_filled += 1;
        report.segments += spans.len();
        let id = node.unique_child_id(FILL_PREFIX);
        node.add_model(id, fill);
    }

    for (id, child) in node.models_mut() {
        if is_fill_id(id) {
            continue;
        }
        fill_node(child, origin, options, report);
    }
}

pub fn is_fill_id(id: &str) -> bool {
    id.strip_prefix(FILL_PREFIX)
        .is_some_and(|rest| rest.starts_with('_'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: f64) -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(size, 0.0),
            Point::new(size, size),
            Point::new(0.0, size),
        ]
    }

    #[test]
    fn test_polygon_area() {
        assert_eq!(polygon_area(&square(2.0)), 4.0);
        assert_eq!(polygon_area(&[Point::ORIGIN, Point::new(1.0, 0.0)]), 0.0);
    }

    #[test]
    fn test_unit_square_segment_count() {
        assert_eq!(hatch_polygon(&square(1.0), 0.0, 0.25).len(), 4);
        assert_eq!(hatch_polygon(&square(1.0), 0.0, 0.1).len(), 10);
    }

    #[test]
    fn test_concave_polygon_splits_spans() {
        // U shape: two prongs above y = 1
        let u = vec![
            Point::new(0.0, 0.0),
            Point::new(3.0, 0.0),
            Point::new(3.0, 3.0),
            Point::new(2.0, 3.0),
            Point::new(2.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 3.0),
            Point::new(0.0, 3.0),
        ];
        let spans = hatch_polygon(&u, 0.0, 1.0);
        // y = 0.5 crosses the base once, y = 1.5 and 2.5 cross both prongs
        assert_eq!(spans.len(), 5);
    }

    #[test]
    fn test_degenerate_polygon_gives_nothing() {
        let flat = vec![Point::ORIGIN, Point::new(5.0, 0.0), Point::new(10.0, 0.0)];
        assert!(hatch_polygon(&flat, 0.0, 1.0).is_empty());
        assert!(hatch_polygon(&square(1.0), 0.0, 0.0).is_empty());
    }

    #[test]
    fn test_fill_id() {
        assert!(is_fill_id("fill_1"));
        assert!(!is_fill_id("fillet"));
        assert!(!is_fill_id("cell_0_0"));
    }
}
