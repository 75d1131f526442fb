//! Toolpath segment types and data structures.

use plotkit_core::Point;

/// Types of toolpath segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolpathSegmentType {
    /// Pen-up travel.
    RapidMove,
    LinearMove,
    ArcCW,
    ArcCCW,
}

impl ToolpathSegmentType {
    pub fn is_draw(&self) -> bool {
        !matches!(self, ToolpathSegmentType::RapidMove)
    }
}

/// A single segment of a toolpath, in machine coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolpathSegment {
    pub segment_type: ToolpathSegmentType,
    pub start: Point,
    pub end: Point,
    /// Arc centre; `None` for rapids and lines.
    pub center: Option<Point>,
}

impl ToolpathSegment {
    pub fn new(segment_type: ToolpathSegmentType, start: Point, end: Point) -> Self {
        Self {
            segment_type,
            start,
            end,
            center: None,
        }
    }

    pub fn new_arc(clockwise: bool, start: Point, end: Point, center: Point) -> Self {
        Self {
            segment_type: if clockwise {
                ToolpathSegmentType::ArcCW
            } else {
                ToolpathSegmentType::ArcCCW
            },
            start,
            end,
            center: Some(center),
        }
    }

    /// Arc centre relative to the segment start, the `I`/`J` words.
    pub fn center_offset(&self) -> Option<Point> {
        self.center.map(|c| c - self.start)
    }

    pub fn length(&self) -> f64 {
        match (self.segment_type, self.center) {
            (ToolpathSegmentType::ArcCW, Some(center)) => {
                self.start.distance_to(&center)
                    * super::run::arc_sweep(self.start, self.end, center, false)
            }
            (ToolpathSegmentType::ArcCCW, Some(center)) => {
                self.start.distance_to(&center)
                    * super::run::arc_sweep(self.start, self.end, center, true)
            }
            _ => self.start.distance_to(&self.end),
        }
    }
}
