//! Toolpaths: pen-down runs in canvas space and the machine-space segment
//! list the emitter formats.

mod run;
mod segment;
mod traverse;

pub use run::{arc_sweep, DrawMove, Run, POSITION_EPSILON};
pub use segment::{ToolpathSegment, ToolpathSegmentType};
pub use traverse::{collect_runs, path_run, TraverseOptions};

use plotkit_core::Point;

use crate::machine::MachineTransform;

/// A complete toolpath: rapids to each run start followed by its draws.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Toolpath {
    pub segments: Vec<ToolpathSegment>,
}

impl Toolpath {
    /// Creates a new empty toolpath.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a segment to the toolpath.
    pub fn add_segment(&mut self, segment: ToolpathSegment) {
        self.segments.push(segment);
    }

    /// Maps canvas runs to machine coordinates. Travel starts at the machine
    /// origin. Arc direction flips when the mapping mirrors the plane.
    pub fn from_runs(runs: &[Run], transform: &MachineTransform) -> Self {
        let mut toolpath = Toolpath::new();
        let mut at = Point::ORIGIN;
        let flip = transform.is_reflection();
        for run in runs {
            let start = transform.apply(run.start);
            toolpath.add_segment(ToolpathSegment::new(ToolpathSegmentType::RapidMove, at, start));
            at = start;
            for m in &run.moves {
                let segment = match *m {
                    DrawMove::Line(end) => ToolpathSegment::new(
                        ToolpathSegmentType::LinearMove,
                        at,
                        transform.apply(end),
                    ),
                    DrawMove::Arc { end, center, ccw } => ToolpathSegment::new_arc(
                        ccw == flip,
                        at,
                        transform.apply(end),
                        transform.apply(center),
                    ),
                };
                at = segment.end;
                toolpath.add_segment(segment);
            }
        }
        toolpath
    }

    /// Number of pen lifts, one per rapid.
    pub fn rapid_count(&self) -> usize {
        self.segments.iter().filter(|s| !s.segment_type.is_draw()).count()
    }

    pub fn draw_count(&self) -> usize {
        self.segments.iter().filter(|s| s.segment_type.is_draw()).count()
    }

    /// Gets the total pen-down length of the toolpath.
    pub fn draw_length(&self) -> f64 {
        self.segments
            .iter()
            .filter(|s| s.segment_type.is_draw())
            .map(|s| s.length())
            .sum()
    }

    pub fn travel_length(&self) -> f64 {
        self.segments
            .iter()
            .filter(|s| !s.segment_type.is_draw())
            .map(|s| s.length())
            .sum()
    }
}
