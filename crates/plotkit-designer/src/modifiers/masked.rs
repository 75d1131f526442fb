//! Mask-driven modifiers.
//!
//! Masks and noise are always sampled at absolute canvas positions, so a
//! pattern moved by an earlier step still sees the same field at the same
//! spot on the paper.

use plotkit_core::rng::{rand01, seeded};
use plotkit_core::{
    GeometryModel, MaskField, Params, Path, PathGeometry, PerlinNoise, PipelineError,
    PipelineResult, Point,
};
use std::f64::consts::TAU;
use tracing::debug;

use super::{check_flatten_budget, for_each_node_mut, rewrite_paths};
use crate::context::StepContext;
use crate::geometry::add_polyline;

/// Offsets decorrelating the Y displacement noise from the X one.
const NOISE_Y_OFFSET: Point = Point { x: 31.7, y: 47.3 };

fn weight(mask: Option<&MaskField>, p: Point) -> f64 {
    mask.map_or(1.0, |m| m.sample(p))
}

/// Point used to decide whether a whole path survives a trim.
fn sample_point(path: &Path) -> Point {
    match path {
        Path::Circle(c) => c.center,
        other => other.point_at(0.5),
    }
}

/// Removes paths whose mask value at the path midpoint is below
/// `threshold`, or below a fresh random draw per path when `random` is set.
/// Without a mask every path passes a fixed threshold and survives a random
/// one with probability equal to its weight of 1.
pub(super) fn trim(
    model: &mut GeometryModel,
    params: &Params,
    mask: Option<&MaskField>,
    ctx: &StepContext,
) -> PipelineResult<()> {
    let threshold = params.ranged("threshold", 0.5, 0.0, 1.0)?;
    let random = params.flag("random", false)?;
    let mut rng = seeded(ctx.seed);
    let before = model.total_path_count();

    for_each_node_mut(model, ctx.offset, &mut |node, offset| {
        node.retain_paths(|_, path| {
            let value = weight(mask, sample_point(path) + offset);
            let cut = if random { rand01(&mut rng) } else { threshold };
            value >= cut
        });
        Ok(())
    })?;
    debug!("trim: {before} -> {} paths", model.total_path_count());
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WarpKind {
    Bulge,
    Pinch,
    Twist,
    Wave,
    Noise,
    Fbm,
    Ridged,
    Turbulence,
}

impl WarpKind {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "bulge" => WarpKind::Bulge,
            "pinch" => WarpKind::Pinch,
            "twist" => WarpKind::Twist,
            "wave" => WarpKind::Wave,
            "noise" => WarpKind::Noise,
            "fbm" => WarpKind::Fbm,
            "ridged" => WarpKind::Ridged,
            "turbulence" => WarpKind::Turbulence,
            _ => return None,
        })
    }
}

struct Warp {
    kind: WarpKind,
    strength: f64,
    radius: f64,
    frequency: f64,
    center: Point,
    noise: PerlinNoise,
}

impl Warp {
    /// Displacement of the absolute point `p` at full weight.
    fn displace(&self, p: Point, w: f64) -> Point {
        let d = p - self.center;
        let dist = d.length();
        let falloff = if dist < self.radius {
            1.0 - dist / self.radius
        } else {
            0.0
        };
        match self.kind {
            WarpKind::Bulge | WarpKind::Pinch => {
                let Some(dir) = d.normalized() else {
                    return p;
                };
                let sign = if self.kind == WarpKind::Bulge { 1.0 } else { -1.0 };
                // never pull a point across the centre
                let amount = (sign * self.strength * w * falloff * falloff).max(-dist);
                p + dir * amount
            }
            WarpKind::Twist => p.rotated_about(self.center, self.strength * w * falloff),
            WarpKind::Wave => {
                let f = TAU * self.frequency;
                p + Point::new((f * p.y).sin(), (f * p.x).sin()) * (self.strength * w)
            }
            WarpKind::Noise | WarpKind::Fbm | WarpKind::Ridged | WarpKind::Turbulence => {
                let (sx, sy) = (p.x * self.frequency, p.y * self.frequency);
                let q = Point::new(sx, sy) + NOISE_Y_OFFSET;
                let (nx, ny) = match self.kind {
                    WarpKind::Noise => (self.noise.noise2(sx, sy), self.noise.noise2(q.x, q.y)),
                    WarpKind::Fbm => (
                        self.noise.fbm(sx, sy, 4) * 2.0 - 1.0,
                        self.noise.fbm(q.x, q.y, 4) * 2.0 - 1.0,
                    ),
                    WarpKind::Ridged => (
                        self.noise.ridged(sx, sy, 4) * 2.0 - 1.0,
                        self.noise.ridged(q.x, q.y, 4) * 2.0 - 1.0,
                    ),
                    _ => (
                        self.noise.turbulence(sx, sy, 4) * 2.0 - 1.0,
                        self.noise.turbulence(q.x, q.y, 4) * 2.0 - 1.0,
                    ),
                };
                p + Point::new(nx, ny) * (self.strength * w)
            }
        }
    }
}

/// Flattens every path at `detail` and displaces each vertex. The
/// displacement depends only on absolute position, so shared endpoints stay
/// shared and chains survive the warp.
pub(super) fn warp(
    model: &mut GeometryModel,
    params: &Params,
    mask: Option<&MaskField>,
    ctx: &StepContext,
) -> PipelineResult<()> {
    let kind_name = params.text("kind", "bulge")?;
    let kind = WarpKind::from_name(&kind_name).ok_or_else(|| {
        PipelineError::from(plotkit_core::ParameterError::InvalidValue {
            name: "kind".to_string(),
            reason: format!("unknown warp kind '{kind_name}'"),
        })
    })?;
    let center = ctx.canvas.center();
    let warp = Warp {
        kind,
        strength: params.number("strength", 10.0)?,
        radius: params.positive("radius", ctx.canvas.min_side() / 2.0)?,
        frequency: params.positive("frequency", 0.05)?,
        center: Point::new(params.number("cx", center.x)?, params.number("cy", center.y)?),
        noise: PerlinNoise::new(ctx.seed),
    };
    let detail = params.positive("detail", 1.0)?;

    displace_vertices(model, ctx.offset, detail, "warp", &mut |p| {
        warp.displace(p, weight(mask, p))
    })?;
    debug!("warp: {kind_name}, {} paths", model.total_path_count());
    Ok(())
}

/// Per-vertex Perlin jitter. Lines keep their identity and only move their
/// endpoints; curves are flattened at `detail` first.
pub(super) fn jitter(
    model: &mut GeometryModel,
    params: &Params,
    mask: Option<&MaskField>,
    ctx: &StepContext,
) -> PipelineResult<()> {
    let amplitude = params.number("amplitude", 2.0)?;
    let scale = params.positive("scale", 0.05)?;
    let detail = params.positive("detail", 1.0)?;
    let noise = PerlinNoise::new(ctx.seed);

    displace_vertices(model, ctx.offset, detail, "noise", &mut |p| {
        let (sx, sy) = (p.x * scale, p.y * scale);
        let q = Point::new(sx, sy) + NOISE_Y_OFFSET;
        let offset = Point::new(noise.noise2(sx, sy), noise.noise2(q.x, q.y));
        p + offset * (amplitude * weight(mask, p))
    })?;
    debug!("noise: amplitude {amplitude}");
    Ok(())
}

/// Rebuilds every path as a displaced polyline. `displace` maps absolute
/// points to absolute points. Lines are moved whole; curves are flattened
/// at `detail` first.
fn displace_vertices<F>(
    model: &mut GeometryModel,
    parent_offset: Point,
    detail: f64,
    tool: &str,
    displace: &mut F,
) -> PipelineResult<()>
where
    F: FnMut(Point) -> Point,
{
    check_flatten_budget(model, detail, false)?;
    rewrite_paths(model, parent_offset, &mut |path, offset| {
        let points: Vec<Point> = match path {
            Path::Line(line) => vec![line.start, line.end],
            curved => curved.flatten(detail),
        };
        let moved: Vec<Point> = points
            .into_iter()
            .map(|p| displace(p + offset) - offset)
            .collect();
        if moved.iter().any(|p| !p.is_finite()) {
            return Err(PipelineError::NumericInvalid {
                tool: tool.to_string(),
                reason: "displacement produced a non-finite point".to_string(),
            });
        }
        let mut scratch = GeometryModel::new();
        add_polyline(&mut scratch, "p", &moved);
        let pieces: Vec<Path> = scratch.take_paths().into_iter().map(|(_, p)| p).collect();
        // a line that collapsed to a point is kept as such
        if pieces.is_empty() {
            return Ok(vec![Path::line(moved[0], moved[moved.len() - 1])]);
        }
        Ok(pieces)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotkit_core::{Canvas, MaskConfig, MaskKind};

    fn ctx() -> StepContext {
        StepContext::new(Canvas::new(100.0, 100.0, 0.0), 9)
    }

    fn lines() -> GeometryModel {
        let mut m = GeometryModel::new();
        m.add_path("left", Path::line(Point::new(10.0, 50.0), Point::new(20.0, 50.0)));
        m.add_path("right", Path::line(Point::new(80.0, 50.0), Point::new(90.0, 50.0)));
        m
    }

    #[test]
    fn test_trim_by_mask_threshold() {
        let mut m = lines();
        let mask = MaskField::new(&MaskConfig::new(MaskKind::Linear), 0, &ctx().canvas).unwrap();
        trim(&mut m, &Params::new().with("threshold", 0.5), Some(&mask), &ctx()).unwrap();
        let ids: Vec<&str> = m.paths().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["right"]);
    }

    #[test]
    fn test_trim_samples_absolute_position() {
        let mut m = lines();
        m.origin = Point::new(60.0, 0.0);
        let mask = MaskField::new(&MaskConfig::new(MaskKind::Linear), 0, &ctx().canvas).unwrap();
        trim(&mut m, &Params::new().with("threshold", 0.5), Some(&mask), &ctx()).unwrap();
        // left now sits at x = 70..80, right leaves the canvas
        assert_eq!(m.path_count(), 2);
    }

    #[test]
    fn test_warp_keeps_shared_endpoints() {
        let mut m = GeometryModel::new();
        m.add_path("a", Path::line(Point::new(40.0, 40.0), Point::new(60.0, 40.0)));
        m.add_path("b", Path::line(Point::new(60.0, 40.0), Point::new(60.0, 60.0)));
        warp(&mut m, &Params::new().with("kind", "twist").with("strength", 30.0), None, &ctx()).unwrap();
        let chains = crate::chains::find_chains(&m, 1e-6);
        assert_eq!(chains.len(), 1);
    }

    #[test]
    fn test_unknown_warp_kind() {
        let mut m = lines();
        let err = warp(&mut m, &Params::new().with("kind", "melt"), None, &ctx()).unwrap_err();
        assert!(matches!(err, PipelineError::Parameter(_)));
    }

    #[test]
    fn test_jitter_is_deterministic() {
        let mut a = lines();
        let mut b = lines();
        jitter(&mut a, &Params::new(), None, &ctx()).unwrap();
        jitter(&mut b, &Params::new(), None, &ctx()).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, lines());
    }
}
