//! # plotkit Designer
//!
//! Procedural drawing tools that build and reshape a [`GeometryModel`]:
//!
//! - **Generators**: stripes, grids, spirals, space-filling curves, flow
//!   fields and other seeded patterns laid out inside the canvas margin
//! - **Modifiers**: affine moves, arrays, clipping, resampling, mask-driven
//!   trimming and warping, hatch fills, and layered copies
//! - **Chain finder**: connects paths whose endpoints meet into open and
//!   closed chains
//! - **Fill engine**: even-odd parallel hatching of closed chains
//! - **Pipeline**: runs an ordered list of steps into one model, skipping
//!   steps that fail
//! - **SVG renderer**: millimetre-sized preview of the finished tree
//!
//! ## Architecture
//!
//! ```text
//! PipelineStep list
//!   └── Pipeline
//!         ├── Generator   (seeds the model, later ones become pattern_<n>)
//!         ├── Modifier    (transforms the accumulated model)
//!         │     └── Fill engine ── Chain finder
//!         └── Layer       (nested steps on a snapshot, attached as a child)
//!
//! GeometryModel ──► svg_renderer / toolpath emission
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use plotkit_core::{Canvas, PipelineStep};
//! use plotkit_designer::Pipeline;
//!
//! let steps = vec![
//!     PipelineStep::new("grid").with_param("cols", 3),
//!     PipelineStep::new("fill").with_param("spacing", 2.0),
//! ];
//! let output = Pipeline::new(Canvas::default(), 42).run(&steps);
//! let svg = plotkit_designer::render_svg(&output.model, &Canvas::default());
//! ```

pub mod chains;
pub mod context;
pub mod fill;
pub mod generators;
pub mod geometry;
pub mod modifiers;
pub mod pipeline;
pub mod svg_renderer;

pub use chains::{find_chains, find_chains_at, find_chains_with, Chain, ChainOptions, Link};
pub use context::{StepContext, DEFAULT_CHAIN_TOLERANCE};
pub use fill::{apply_filling, hatch_polygon, FillOptions, FillReport};
pub use generators::Generator;
pub use modifiers::Modifier;
pub use pipeline::{run, Diagnostic, Pipeline, PipelineOutput, Tool};
pub use svg_renderer::render_svg;
