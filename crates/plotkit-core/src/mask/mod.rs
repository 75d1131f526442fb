//! Procedural scalar fields sampled by mask-driven modifiers.
//!
//! A [`MaskField`] is a pure function from an absolute canvas position to a
//! value in `[0, 1]`. It is built once per step from a [`MaskConfig`] and
//! holds no state beyond its seeded noise table.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use tracing::debug;

use crate::canvas::Canvas;
use crate::error::{ParameterError, ParameterResult};
use crate::model::Point;

mod noise;

pub use noise::PerlinNoise;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskKind {
    #[default]
    Perlin,
    Fbm,
    Ridged,
    Turbulence,
    /// Falls off from 1 at the centre to 0 at `radius`.
    Radial,
    /// Ramps from 0 to 1 across the canvas along `angle`.
    Linear,
    /// 0 at the paper edge rising to 1 at `size` millimetres inside.
    Border,
    Checker,
    Waves,
    Constant,
}

/// Mask settings attached to a pipeline step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskConfig {
    pub kind: MaskKind,
    /// Noise frequency in cycles per millimetre.
    pub scale: f64,
    /// Overrides the step seed when set.
    pub seed: Option<u64>,
    pub octaves: u32,
    /// Cell size of `checker` and falloff width of `border`, in mm.
    pub size: f64,
    /// Direction of `linear` and `waves`, in degrees.
    pub angle: f64,
    /// Wave frequency in cycles per millimetre.
    pub frequency: f64,
    pub center_x: Option<f64>,
    pub center_y: Option<f64>,
    pub radius: Option<f64>,
    pub contrast: f64,
    pub brightness: f64,
    /// Hard cut-off: values at or above become 1, below become 0.
    pub threshold: Option<f64>,
    pub invert: bool,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            kind: MaskKind::Perlin,
            scale: 0.02,
            seed: None,
            octaves: 4,
            size: 20.0,
            angle: 0.0,
            frequency: 0.05,
            center_x: None,
            center_y: None,
            radius: None,
            contrast: 1.0,
            brightness: 0.0,
            threshold: None,
            invert: false,
        }
    }
}

impl MaskConfig {
    pub fn new(kind: MaskKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> ParameterResult<()> {
        let positive = [
            ("mask.scale", self.scale),
            ("mask.size", self.size),
            ("mask.frequency", self.frequency),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ParameterError::OutOfRange {
                    name: name.to_string(),
                    value,
                    min: 0.0,
                    max: f64::INFINITY,
                });
            }
        }
        if !self.contrast.is_finite() || !self.brightness.is_finite() || !self.angle.is_finite() {
            return Err(ParameterError::InvalidValue {
                name: "mask".to_string(),
                reason: "contrast, brightness and angle must be finite".to_string(),
            });
        }
        if let Some(r) = self.radius {
            if !r.is_finite() || r <= 0.0 {
                return Err(ParameterError::OutOfRange {
                    name: "mask.radius".to_string(),
                    value: r,
                    min: 0.0,
                    max: f64::INFINITY,
                });
            }
        }
        if let Some(t) = self.threshold {
            if !(0.0..=1.0).contains(&t) {
                return Err(ParameterError::OutOfRange {
                    name: "mask.threshold".to_string(),
                    value: t,
                    min: 0.0,
                    max: 1.0,
                });
            }
        }
        Ok(())
    }
}

/// A sampled scalar field in `[0, 1]`.
#[derive(Debug, Clone)]
pub struct MaskField {
    config: MaskConfig,
    noise: PerlinNoise,
    canvas: Canvas,
}

impl MaskField {
    /// Builds the field. `step_seed` is used unless the config carries its
    /// own seed.
    pub fn new(config: &MaskConfig, step_seed: u64, canvas: &Canvas) -> ParameterResult<Self> {
        config.validate()?;
        let seed = config.seed.unwrap_or(step_seed);
        debug!("mask: {:?} field, seed {seed}", config.kind);
        Ok(Self {
            noise: PerlinNoise::new(seed),
            config: config.clone(),
            canvas: *canvas,
        })
    }

    pub fn config(&self) -> &MaskConfig {
        &self.config
    }

    /// Samples the field at an absolute canvas position.
    pub fn sample(&self, p: Point) -> f64 {
        let raw = self.raw(p);
        let c = &self.config;
        let mut v = ((raw - 0.5) * c.contrast + 0.5 + c.brightness).clamp(0.0, 1.0);
        if let Some(t) = c.threshold {
            v = if v >= t { 1.0 } else { 0.0 };
        }
        if c.invert {
            v = 1.0 - v;
        }
        if v.is_finite() {
            v
        } else {
            0.0
        }
    }

    fn raw(&self, p: Point) -> f64 {
        let c = &self.config;
        let (sx, sy) = (p.x * c.scale, p.y * c.scale);
        match c.kind {
            MaskKind::Perlin => self.noise.noise2(sx, sy) * 0.5 + 0.5,
            MaskKind::Fbm => self.noise.fbm(sx, sy, c.octaves),
            MaskKind::Ridged => self.noise.ridged(sx, sy, c.octaves),
            MaskKind::Turbulence => self.noise.turbulence(sx, sy, c.octaves),
            MaskKind::Radial => {
                let center = self.center();
                let radius = c.radius.unwrap_or(self.canvas.min_side() / 2.0);
                (1.0 - p.distance_to(&center) / radius).clamp(0.0, 1.0)
            }
            MaskKind::Linear => {
                let dir = Point::from_angle(c.angle);
                let corners = [
                    Point::ORIGIN,
                    Point::new(self.canvas.width, 0.0),
                    Point::new(0.0, self.canvas.height),
                    Point::new(self.canvas.width, self.canvas.height),
                ];
                let proj: Vec<f64> = corners.iter().map(|q| q.dot(&dir)).collect();
                let min = proj.iter().cloned().fold(f64::INFINITY, f64::min);
                let max = proj.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                if max - min <= f64::EPSILON {
                    0.5
                } else {
                    ((p.dot(&dir) - min) / (max - min)).clamp(0.0, 1.0)
                }
            }
            MaskKind::Border => {
                let d = p
                    .x
                    .min(p.y)
                    .min(self.canvas.width - p.x)
                    .min(self.canvas.height - p.y);
                (d / c.size).clamp(0.0, 1.0)
            }
            MaskKind::Checker => {
                let cell = (p.x / c.size).floor() + (p.y / c.size).floor();
                if cell.rem_euclid(2.0) < 1.0 {
                    1.0
                } else {
                    0.0
                }
            }
            MaskKind::Waves => {
                let along = p.dot(&Point::from_angle(c.angle));
                0.5 + 0.5 * (TAU * c.frequency * along).sin()
            }
            MaskKind::Constant => 1.0,
        }
    }

    fn center(&self) -> Point {
        let canvas_center = self.canvas.center();
        Point::new(
            self.config.center_x.unwrap_or(canvas_center.x),
            self.config.center_y.unwrap_or(canvas_center.y),
        )
    }
}
