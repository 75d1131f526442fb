use plotkit_core::{Canvas, Point};

/// Default endpoint matching tolerance in millimetres.
pub const DEFAULT_CHAIN_TOLERANCE: f64 = 0.01;

/// Everything a generator or modifier knows about where it runs.
///
/// Nested steps of a layering tool run on a detached copy of a subtree;
/// `offset` is the absolute origin of that subtree's parent so mask sampling
/// and clipping still happen in absolute canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepContext {
    pub canvas: Canvas,
    pub seed: u64,
    pub offset: Point,
    pub chain_tolerance: f64,
}

impl StepContext {
    pub fn new(canvas: Canvas, seed: u64) -> Self {
        Self {
            canvas,
            seed,
            offset: Point::ORIGIN,
            chain_tolerance: DEFAULT_CHAIN_TOLERANCE,
        }
    }

    pub fn with_seed(&self, seed: u64) -> Self {
        Self { seed, ..*self }
    }

    pub fn with_offset(&self, offset: Point) -> Self {
        Self { offset, ..*self }
    }
}
