//! # plotkit Core
//!
//! Core types shared by every plotkit crate:
//!
//! - **Geometry model**: the nested [`GeometryModel`] tree, the closed [`Path`]
//!   union (line, arc, circle), and the canonical local/absolute conversions
//! - **Transforms**: conformal and non-conformal linear maps applied to paths
//! - **Canvas**: drawing size and margin in millimetres
//! - **Pipeline steps**: [`PipelineStep`] and its [`Params`] map
//! - **Mask field**: seeded procedural scalar fields sampled per point
//! - **Errors**: configuration and numeric error types
//!
//! ## Coordinate frames
//!
//! Every path and child origin stored in a [`GeometryModel`] is expressed in
//! that model's local frame. A point's absolute position is its local position
//! plus the origin of its own model and of every ancestor up to the root.
//! Consumers that need absolute coordinates go through [`to_absolute`] or
//! [`GeometryModel::absolute_paths`] rather than summing offsets themselves.

pub mod canvas;
pub mod error;
pub mod mask;
pub mod model;
pub mod params;
pub mod rng;
pub mod step;
pub mod transform;

pub use canvas::Canvas;
pub use error::{ParameterError, ParameterResult, PipelineError, PipelineResult};
pub use mask::{MaskConfig, MaskField, MaskKind, PerlinNoise};
pub use model::{
    to_absolute, to_local, AbsolutePath, Arc, Bounds, Circle, GeometryModel, LayerStyle, Line,
    Path, PathGeometry, Point, WalkContext,
};
pub use params::{ParamValue, Params};
pub use step::PipelineStep;
pub use transform::LinearMap;
