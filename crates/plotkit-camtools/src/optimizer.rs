//! Path-order optimization.
//!
//! Reorders runs greedily by nearest start point and draws through short
//! gaps instead of lifting the pen.

use plotkit_core::Point;
use tracing::debug;

use crate::toolpath::{DrawMove, Run};

/// Run ordering and joining strategies.
#[derive(Debug)]
pub struct RunOptimizer;

impl RunOptimizer {
    /// Greedy nearest-neighbour order: starting at `from`, repeatedly picks
    /// the remaining run whose start is closest to the current position.
    /// Ties keep input order.
    pub fn order_by_nearest_start(runs: Vec<Run>, from: Point) -> Vec<Run> {
        let mut remaining: Vec<Option<Run>> = runs.into_iter().map(Some).collect();
        let mut ordered = Vec::with_capacity(remaining.len());
        let mut at = from;

        loop {
            let mut best: Option<(usize, f64)> = None;
            for (i, run) in remaining.iter().enumerate() {
                let Some(run) = run else { continue };
                let d = at.distance_to(&run.start);
                if best.is_none_or(|(_, bd)| d < bd) {
                    best = Some((i, d));
                }
            }
            let Some((i, _)) = best else { break };
            if let Some(run) = remaining[i].take() {
                at = run.end();
                ordered.push(run);
            }
        }
        ordered
    }

    /// Appends each run to the previous one when the gap between them is
    /// shorter than `tolerance`, bridging with a straight draw.
    pub fn join_close_runs(runs: Vec<Run>, tolerance: f64) -> Vec<Run> {
        let mut joined: Vec<Run> = Vec::with_capacity(runs.len());
        for run in runs {
            if let Some(prev) = joined.last_mut() {
                let gap = prev.end().distance_to(&run.start);
                if gap < tolerance {
                    if gap > 0.0 {
                        prev.moves.push(DrawMove::Line(run.start));
                    }
                    prev.moves.extend(run.moves);
                    continue;
                }
            }
            joined.push(run);
        }
        joined
    }

    /// Orders from the machine origin, then joins.
    pub fn optimize(runs: Vec<Run>, join_tolerance: f64) -> Vec<Run> {
        let before = runs.len();
        let ordered = Self::order_by_nearest_start(runs, Point::ORIGIN);
        let joined = Self::join_close_runs(ordered, join_tolerance);
        debug!("optimizer: {before} runs -> {} pen lifts", joined.len());
        joined
    }
}
