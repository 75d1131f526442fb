//! Pattern generators.
//!
//! Each generator is a pure function of its parameters, the canvas and the
//! step seed. Paths are laid out in absolute canvas millimetres inside the
//! margin rectangle; generators that build sub-models (grid cells, flow
//! lines) store the children's paths in local coordinates.

mod concentric;
mod flowfield;
mod grid;
mod gyroid;
mod hilbert;
mod honeycomb;
mod isometric;
mod phyllotaxis;
mod radial;
mod spiral;
mod stripes;
mod superformula;
mod waves;

use plotkit_core::{GeometryModel, Params, PipelineResult};

use crate::context::StepContext;
pub(crate) use crate::geometry::check_samples;

/// Available generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generator {
    Stripes,
    Grid,
    Spiral,
    Concentric,
    Radial,
    Waves,
    Superformula,
    Hilbert,
    Gyroid,
    Phyllotaxis,
    Honeycomb,
    Isometric,
    Flowfield,
}

impl Generator {
    pub fn all() -> &'static [Generator] {
        &[
            Generator::Stripes,
            Generator::Grid,
            Generator::Spiral,
            Generator::Concentric,
            Generator::Radial,
            Generator::Waves,
            Generator::Superformula,
            Generator::Hilbert,
            Generator::Gyroid,
            Generator::Phyllotaxis,
            Generator::Honeycomb,
            Generator::Isometric,
            Generator::Flowfield,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Generator::Stripes => "stripes",
            Generator::Grid => "grid",
            Generator::Spiral => "spiral",
            Generator::Concentric => "concentric",
            Generator::Radial => "radial",
            Generator::Waves => "waves",
            Generator::Superformula => "superformula",
            Generator::Hilbert => "hilbert",
            Generator::Gyroid => "gyroid",
            Generator::Phyllotaxis => "phyllotaxis",
            Generator::Honeycomb => "honeycomb",
            Generator::Isometric => "isometric",
            Generator::Flowfield => "flowfield",
        }
    }

    /// Looks a generator up by name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Generator> {
        let lower = name.trim().to_lowercase();
        Self::all().iter().copied().find(|g| g.name() == lower)
    }

    pub fn generate(&self, params: &Params, ctx: &StepContext) -> PipelineResult<GeometryModel> {
        match self {
            Generator::Stripes => stripes::generate(params, ctx),
            Generator::Grid => grid::generate(params, ctx),
            Generator::Spiral => spiral::generate(params, ctx),
            Generator::Concentric => concentric::generate(params, ctx),
            Generator::Radial => radial::generate(params, ctx),
            Generator::Waves => waves::generate(params, ctx),
            Generator::Superformula => superformula::generate(params, ctx),
            Generator::Hilbert => hilbert::generate(params, ctx),
            Generator::Gyroid => gyroid::generate(params, ctx),
            Generator::Phyllotaxis => phyllotaxis::generate(params, ctx),
            Generator::Honeycomb => honeycomb::generate(params, ctx),
            Generator::Isometric => isometric::generate(params, ctx),
            Generator::Flowfield => flowfield::generate(params, ctx),
        }
    }
}
