//! G-code generation.
//!
//! Turns a [`GeometryModel`] into a line-oriented instruction stream. The
//! geometric decisions (run order, joins, arc fitting, axis mapping) are
//! made once in [`build_toolpath`]; the post-processor only picks the
//! vocabulary used to write them.

use plotkit_core::GeometryModel;
use tracing::debug;

use crate::arc_fitter::{ArcFitter, ArcFitterConfig};
use crate::error::{ToolpathError, ToolpathResult};
use crate::machine::{MachineConfig, PostProcessor};
use crate::optimizer::RunOptimizer;
use crate::toolpath::{collect_runs, Toolpath, ToolpathSegment, ToolpathSegmentType, TraverseOptions};

/// Summary of an emitted program.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ToolpathStats {
    /// Pen-down runs, one rapid each.
    pub runs: usize,
    pub pen_lifts: usize,
    pub draw_moves: usize,
    /// Pen-down distance in mm.
    pub draw_length: f64,
    /// Pen-up distance in mm, from the machine origin.
    pub travel_length: f64,
    /// Feed-rate estimate including dwells, ignoring acceleration.
    pub estimated_seconds: f64,
}

impl ToolpathStats {
    pub fn from_toolpath(toolpath: &Toolpath, config: &MachineConfig) -> Self {
        let runs = toolpath.rapid_count();
        let draw_length = toolpath.draw_length();
        let travel_length = toolpath.travel_length();
        let minutes = draw_length / config.feed_rate + travel_length / config.travel_rate;
        Self {
            runs,
            pen_lifts: runs,
            draw_moves: toolpath.draw_count(),
            draw_length,
            travel_length,
            estimated_seconds: minutes * 60.0 + config.dwell_time * runs as f64,
        }
    }
}

/// Traverses, optimizes and arc-fits `model` into a machine-space toolpath.
pub fn build_toolpath(model: &GeometryModel, config: &MachineConfig) -> ToolpathResult<Toolpath> {
    config.validate()?;
    if !model.is_finite() {
        return Err(ToolpathError::NumericInvalid(
            "model contains NaN or infinite coordinates".to_string(),
        ));
    }

    let options = TraverseOptions {
        native_arcs: config.use_arcs,
        curve_detail: config.curve_detail,
    };
    let mut runs = collect_runs(model, &options);
    debug!("toolpath: {} runs collected", runs.len());

    if config.optimize_paths {
        runs = RunOptimizer::optimize(runs, config.join_tolerance);
    }
    if config.use_arcs {
        let fitter = ArcFitter::new(ArcFitterConfig {
            tolerance: config.arc_tolerance,
        });
        runs = runs.iter().map(|run| fitter.fit_run(run)).collect();
    }

    let toolpath = Toolpath::from_runs(&runs, &config.transform());
    if toolpath.segments.iter().any(|s| !s.end.is_finite()) {
        return Err(ToolpathError::NumericInvalid(
            "machine transform produced a non-finite coordinate".to_string(),
        ));
    }
    Ok(toolpath)
}

/// Emits the program text for `model`.
pub fn emit(model: &GeometryModel, config: &MachineConfig) -> ToolpathResult<String> {
    emit_with_stats(model, config).map(|(gcode, _)| gcode)
}

/// Emits the program text together with its statistics.
pub fn emit_with_stats(
    model: &GeometryModel,
    config: &MachineConfig,
) -> ToolpathResult<(String, ToolpathStats)> {
    let toolpath = build_toolpath(model, config)?;
    let generator = GcodeGenerator::new(config)?;
    let stats = ToolpathStats::from_toolpath(&toolpath, config);
    let gcode = generator.generate(&toolpath, &stats);
    debug!(
        "gcode: {} pen lifts, {} draw moves, {:.1} mm drawn, {} bytes",
        stats.pen_lifts,
        stats.draw_moves,
        stats.draw_length,
        gcode.len()
    );
    Ok((gcode, stats))
}

/// Writes a toolpath in one post-processor dialect.
#[derive(Debug)]
pub struct GcodeGenerator<'a> {
    config: &'a MachineConfig,
    post: PostProcessor,
}

impl<'a> GcodeGenerator<'a> {
    pub fn new(config: &'a MachineConfig) -> ToolpathResult<Self> {
        Ok(Self {
            post: config.post_processor()?,
            config,
        })
    }

    /// Generates the complete program.
    pub fn generate(&self, toolpath: &Toolpath, stats: &ToolpathStats) -> String {
        let mut gcode = self.generate_header(stats);
        gcode.push_str(&self.generate_body(toolpath));
        gcode.push_str(&self.generate_footer());
        gcode
    }

    /// Comment block, units and modes, and the initial pen state.
    pub fn generate_header(&self, stats: &ToolpathStats) -> String {
        let mut gcode = String::new();
        gcode.push_str(&format!("; plotkit {}\n", env!("CARGO_PKG_VERSION")));
        gcode.push_str(&format!("; Post-processor: {}\n", self.post.name()));
        gcode.push_str(&format!("; Paths: {}\n", stats.runs));
        gcode.push_str(&format!("; Pen lifts: {}\n", stats.pen_lifts));
        gcode.push_str(&format!("; Draw length: {:.3}mm\n", stats.draw_length));
        gcode.push_str(&format!("; Travel length: {:.3}mm\n", stats.travel_length));
        gcode.push_str(&format!("; Estimated time: {:.0}s\n", stats.estimated_seconds));
        gcode.push('\n');

        gcode.push_str("G21         ; Millimeter units\n");
        gcode.push_str("G90         ; Absolute positioning\n");
        gcode.push_str("G17         ; XY plane\n");
        if self.post == PostProcessor::Marlin {
            gcode.push_str("G28         ; Home all axes\n");
        }
        match self.post {
            PostProcessor::Standard | PostProcessor::Grbl | PostProcessor::Marlin => {
                gcode.push_str(&format!("G0 Z{}\n", num(self.config.z_safe)));
            }
            PostProcessor::Servo => gcode.push_str(&format!("{}\n", self.servo(self.config.z_up))),
            PostProcessor::Laser => gcode.push_str("M5\n"),
        }
        gcode.push('\n');
        gcode
    }

    /// One rapid per run, framed by pen-up and pen-down commands, then the
    /// run's draws.
    pub fn generate_body(&self, toolpath: &Toolpath) -> String {
        let mut gcode = String::new();
        let mut pen_down = false;

        for segment in &toolpath.segments {
            match segment.segment_type {
                ToolpathSegmentType::RapidMove => {
                    if pen_down {
                        gcode.push_str(&self.pen_up());
                        pen_down = false;
                    }
                    gcode.push_str(&format!(
                        "G0 X{} Y{}\n",
                        num(segment.end.x),
                        num(segment.end.y)
                    ));
                }
                _ => {
                    if !pen_down {
                        gcode.push_str(&self.pen_down());
                        pen_down = true;
                    }
                    gcode.push_str(&self.draw(segment));
                }
            }
        }
        if pen_down {
            gcode.push_str(&self.pen_up());
        }
        gcode
    }

    /// Parks the pen and ends the program.
    pub fn generate_footer(&self) -> String {
        let mut gcode = String::from("\n");
        match self.post {
            PostProcessor::Standard | PostProcessor::Grbl | PostProcessor::Marlin => {
                gcode.push_str(&format!("G0 Z{}   ; Raise pen to safe height\n", num(self.config.z_safe)));
            }
            PostProcessor::Servo => gcode.push_str(&format!("{}\n", self.servo(self.config.z_up))),
            PostProcessor::Laser => gcode.push_str("M5          ; Laser off\n"),
        }
        let end = match self.post {
            PostProcessor::Grbl => "M30",
            PostProcessor::Marlin => "M84",
            _ => "M2",
        };
        gcode.push_str(&format!("{end}          ; End program\n"));
        gcode
    }

    fn draw(&self, segment: &ToolpathSegment) -> String {
        let feed = format!("{:.0}", self.config.feed_rate);
        match (segment.segment_type, segment.center_offset()) {
            (ToolpathSegmentType::ArcCW | ToolpathSegmentType::ArcCCW, Some(ij)) => {
                let cmd = if segment.segment_type == ToolpathSegmentType::ArcCW {
                    "G2"
                } else {
                    "G3"
                };
                format!(
                    "{cmd} X{} Y{} I{} J{} F{feed}\n",
                    num(segment.end.x),
                    num(segment.end.y),
                    num(ij.x),
                    num(ij.y)
                )
            }
            _ => format!(
                "G1 X{} Y{} F{feed}\n",
                num(segment.end.x),
                num(segment.end.y)
            ),
        }
    }

    fn pen_up(&self) -> String {
        match self.post {
            PostProcessor::Standard | PostProcessor::Grbl | PostProcessor::Marlin => {
                format!("G0 Z{}\n", num(self.config.z_up))
            }
            PostProcessor::Servo => format!("{}\n", self.servo(self.config.z_up)),
            PostProcessor::Laser => "M5\n".to_string(),
        }
    }

    fn pen_down(&self) -> String {
        let mut gcode = match self.post {
            PostProcessor::Standard | PostProcessor::Grbl | PostProcessor::Marlin => format!(
                "G1 Z{} F{:.0}\n",
                num(self.config.z_down),
                self.config.feed_rate
            ),
            PostProcessor::Servo => format!("{}\n", self.servo(self.config.z_down)),
            PostProcessor::Laser => format!("M3 S{:.0}\n", self.config.laser_power),
        };
        if self.config.dwell_time > 0.0 {
            gcode.push_str(&self.dwell());
        }
        gcode
    }

    fn dwell(&self) -> String {
        match self.post {
            PostProcessor::Grbl | PostProcessor::Laser => {
                format!("G4 P{:.3}\n", self.config.dwell_time)
            }
            _ => format!("G4 P{:.0}\n", self.config.dwell_time * 1000.0),
        }
    }

    fn servo(&self, value: f64) -> String {
        format!("M3 S{value:.0}")
    }
}

/// Three decimals, with negative zero written as zero.
fn num(value: f64) -> String {
    let s = format!("{value:.3}");
    if s == "-0.000" {
        "0.000".to_string()
    } else {
        s
    }
}
