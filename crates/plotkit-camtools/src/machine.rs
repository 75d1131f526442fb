//! Machine configuration and the canvas-to-machine axis mapping.

use plotkit_core::Point;
use serde::{Deserialize, Serialize};

use crate::error::{ToolpathError, ToolpathResult};

/// Output dialect. Changes instruction vocabulary and the header/footer,
/// never which moves are made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostProcessor {
    /// Z-axis pen, `M2` program end.
    #[default]
    Standard,
    /// Z-axis pen, dwell in seconds, `M30` program end.
    Grbl,
    /// Z-axis pen, `G28` homing before the first move, `M84` at the end.
    Marlin,
    /// Servo pen driven by `M3 S<value>`.
    Servo,
    /// Laser head switched with `M3 S<power>` / `M5`.
    Laser,
}

impl PostProcessor {
    pub fn all() -> &'static [PostProcessor] {
        &[
            PostProcessor::Standard,
            PostProcessor::Grbl,
            PostProcessor::Marlin,
            PostProcessor::Servo,
            PostProcessor::Laser,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            PostProcessor::Standard => "standard",
            PostProcessor::Grbl => "grbl",
            PostProcessor::Marlin => "marlin",
            PostProcessor::Servo => "servo",
            PostProcessor::Laser => "laser",
        }
    }

    pub fn from_name(name: &str) -> ToolpathResult<PostProcessor> {
        let lower = name.trim().to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|p| p.name() == lower)
            .ok_or_else(|| ToolpathError::UnknownPostProcessor(name.to_string()))
    }

    /// True when the pen is raised and lowered on the Z axis.
    pub fn uses_z_pen(&self) -> bool {
        matches!(
            self,
            PostProcessor::Standard | PostProcessor::Grbl | PostProcessor::Marlin
        )
    }
}

/// Machine settings consumed by the toolpath emitter. Field names accept the
/// camelCase spelling used by the drawing application's configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Drawing feed rate in mm/min.
    #[serde(alias = "feedRate")]
    pub feed_rate: f64,
    /// Pen-up travel rate in mm/min.
    #[serde(alias = "travelRate")]
    pub travel_rate: f64,
    #[serde(alias = "zUp")]
    pub z_up: f64,
    #[serde(alias = "zDown")]
    pub z_down: f64,
    /// Height used at program start and end.
    #[serde(alias = "zSafe")]
    pub z_safe: f64,
    /// Pause after each pen-down, in seconds.
    #[serde(alias = "dwellTime")]
    pub dwell_time: f64,
    #[serde(alias = "invertX")]
    pub invert_x: bool,
    #[serde(alias = "invertY")]
    pub invert_y: bool,
    #[serde(alias = "swapAxes")]
    pub swap_axes: bool,
    #[serde(alias = "originX")]
    pub origin_x: f64,
    #[serde(alias = "originY")]
    pub origin_y: f64,
    /// Emit native arcs and fit arcs to polylines.
    #[serde(alias = "useArcs")]
    pub use_arcs: bool,
    /// Reorder runs by nearest start and join small gaps.
    #[serde(alias = "optimizePaths")]
    pub optimize_paths: bool,
    /// Gaps shorter than this are drawn through instead of lifting the pen.
    #[serde(alias = "joinTolerance")]
    pub join_tolerance: f64,
    /// Maximum distance between a fitted arc and the polyline it replaces.
    #[serde(alias = "arcTolerance")]
    pub arc_tolerance: f64,
    /// Chord length used to flatten curves drawn as lines.
    #[serde(alias = "curveDetail")]
    pub curve_detail: f64,
    /// `S` value for the laser dialect.
    #[serde(alias = "laserPower")]
    pub laser_power: f64,
    #[serde(alias = "postProcessor")]
    pub post_processor: String,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            feed_rate: 1500.0,
            travel_rate: 3000.0,
            z_up: 5.0,
            z_down: 0.0,
            z_safe: 10.0,
            dwell_time: 0.0,
            invert_x: false,
            invert_y: false,
            swap_axes: false,
            origin_x: 0.0,
            origin_y: 0.0,
            use_arcs: false,
            optimize_paths: false,
            join_tolerance: 0.1,
            arc_tolerance: 0.05,
            curve_detail: 0.5,
            laser_power: 1000.0,
            post_processor: PostProcessor::Standard.name().to_string(),
        }
    }
}

impl MachineConfig {
    /// Checks every numeric setting and the post-processor name.
    pub fn validate(&self) -> ToolpathResult<()> {
        let finite = [
            ("feed_rate", self.feed_rate),
            ("travel_rate", self.travel_rate),
            ("z_up", self.z_up),
            ("z_down", self.z_down),
            ("z_safe", self.z_safe),
            ("dwell_time", self.dwell_time),
            ("origin_x", self.origin_x),
            ("origin_y", self.origin_y),
            ("join_tolerance", self.join_tolerance),
            ("arc_tolerance", self.arc_tolerance),
            ("curve_detail", self.curve_detail),
            ("laser_power", self.laser_power),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(ToolpathError::InvalidMachineConfig(format!(
                    "{name} must be finite"
                )));
            }
        }
        for (name, value) in [
            ("feed_rate", self.feed_rate),
            ("travel_rate", self.travel_rate),
            ("curve_detail", self.curve_detail),
        ] {
            if value <= 0.0 {
                return Err(ToolpathError::InvalidMachineConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        for (name, value) in [
            ("dwell_time", self.dwell_time),
            ("join_tolerance", self.join_tolerance),
            ("arc_tolerance", self.arc_tolerance),
            ("laser_power", self.laser_power),
        ] {
            if value < 0.0 {
                return Err(ToolpathError::InvalidMachineConfig(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }
        self.post_processor()?;
        Ok(())
    }

    pub fn post_processor(&self) -> ToolpathResult<PostProcessor> {
        PostProcessor::from_name(&self.post_processor)
    }

    pub fn transform(&self) -> MachineTransform {
        MachineTransform {
            invert_x: self.invert_x,
            invert_y: self.invert_y,
            swap_axes: self.swap_axes,
            origin: Point::new(self.origin_x, self.origin_y),
        }
    }
}

/// Canvas to machine coordinates: sign flips, then the optional X/Y swap,
/// then the origin offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MachineTransform {
    pub invert_x: bool,
    pub invert_y: bool,
    pub swap_axes: bool,
    pub origin: Point,
}

impl MachineTransform {
    pub fn apply(&self, p: Point) -> Point {
        self.apply_vector(p) - self.origin
    }

    /// Maps a displacement; the origin offset does not apply.
    pub fn apply_vector(&self, v: Point) -> Point {
        let x = if self.invert_x { -v.x } else { v.x };
        let y = if self.invert_y { -v.y } else { v.y };
        if self.swap_axes {
            Point::new(y, x)
        } else {
            Point::new(x, y)
        }
    }

    /// True when the mapping mirrors the plane, which reverses arc direction.
    pub fn is_reflection(&self) -> bool {
        self.invert_x ^ self.invert_y ^ self.swap_axes
    }
}
