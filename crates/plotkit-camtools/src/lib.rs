//! # plotkit CAM Tools
//!
//! Turns a finished geometry model into machine instructions for a pen
//! plotter, servo pen or laser.
//!
//! ## Stages
//!
//! - **Traversal**: depth-first walk in absolute canvas coordinates, one run
//!   per drawable path
//! - **Optimizer**: nearest-start ordering and pen-down joins across short
//!   gaps
//! - **Arc Fitter**: collapses polyline stretches that lie on a circle into
//!   single arc moves
//! - **Machine mapping**: axis flips, X/Y swap and origin offset
//! - **G-code**: post-processor specific header, pen control and footer
//!
//! ```rust,ignore
//! use plotkit_camtools::{emit, MachineConfig};
//!
//! let gcode = emit(&model, &MachineConfig::default())?;
//! ```

pub mod arc_fitter;
pub mod error;
pub mod gcode;
pub mod machine;
pub mod optimizer;
pub mod toolpath;

pub use arc_fitter::{ArcFitter, ArcFitterConfig};
pub use error::{ToolpathError, ToolpathResult};
pub use gcode::{build_toolpath, emit, emit_with_stats, GcodeGenerator, ToolpathStats};
pub use machine::{MachineConfig, MachineTransform, PostProcessor};
pub use optimizer::RunOptimizer;
pub use toolpath::{
    collect_runs, DrawMove, Run, Toolpath, ToolpathSegment, ToolpathSegmentType, TraverseOptions,
};
