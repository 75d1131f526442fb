//! # Array Modifier
//!
//! Replicates the accumulated model in linear, grid, and circular layouts.
//! The original stays where it is; every further copy becomes a child
//! `copy_<n>` of the model.

use plotkit_core::{
    GeometryModel, LinearMap, ParameterError, Params, PipelineResult, Point,
};
use tracing::debug;

use super::{apply_linear, attach_copy};
use crate::context::StepContext;

/// Represents different types of array layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayType {
    /// Copies stepped by a constant offset
    Linear,
    /// Copies rotated about a centre point
    Circular,
    /// Rows and columns of copies
    Grid,
}

/// Parameters for linear arrays
#[derive(Debug, Clone, PartialEq)]
pub struct LinearArrayParams {
    /// Number of instances, the original included
    pub count: usize,
    /// Offset between neighbouring instances (mm)
    pub step: Point,
}

impl LinearArrayParams {
    /// Create new linear array parameters
    pub fn new(count: usize, step: Point) -> Self {
        debug_assert!(step.is_finite(), "step must be finite, got {step:?}");
        Self { count, step }
    }

    /// Validate parameters
    pub fn is_valid(&self) -> bool {
        self.count > 0 && self.step.is_finite()
    }

    /// Offset of the instance at `index` from the original
    pub fn get_offset(&self, index: usize) -> Point {
        self.step * index as f64
    }
}

/// Parameters for grid arrays
#[derive(Debug, Clone, PartialEq)]
pub struct GridArrayParams {
    /// Number of columns
    pub columns: usize,
    /// Number of rows
    pub rows: usize,
    /// Horizontal spacing between columns (mm)
    pub column_spacing: f64,
    /// Vertical spacing between rows (mm)
    pub row_spacing: f64,
}

impl GridArrayParams {
    /// Create new grid array parameters
    pub fn new(columns: usize, rows: usize, column_spacing: f64, row_spacing: f64) -> Self {
        debug_assert!(
            column_spacing.is_finite(),
            "column_spacing must be finite, got {column_spacing}"
        );
        debug_assert!(
            row_spacing.is_finite(),
            "row_spacing must be finite, got {row_spacing}"
        );
        Self {
            columns,
            rows,
            column_spacing,
            row_spacing,
        }
    }

    /// Validate parameters
    pub fn is_valid(&self) -> bool {
        self.columns > 0 && self.rows > 0 && self.column_spacing.is_finite() && self.row_spacing.is_finite()
    }

    /// Get total number of instances, the original included
    pub fn total_copies(&self) -> usize {
        self.columns * self.rows
    }

    /// Offset of the cell at `column`, `row`, or `None` outside the grid.
    pub fn get_offset(&self, column: usize, row: usize) -> Option<Point> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        Some(Point::new(
            column as f64 * self.column_spacing,
            row as f64 * self.row_spacing,
        ))
    }
}

/// Parameters for circular arrays
#[derive(Debug, Clone, PartialEq)]
pub struct CircularArrayParams {
    /// Number of instances, the original included
    pub count: usize,
    /// Absolute centre of rotation
    pub center: Point,
    /// Angle covered by the array in degrees. A full turn spaces copies
    /// evenly without repeating the original; anything else places the last
    /// copy exactly at this angle.
    pub total_angle: f64,
}

impl CircularArrayParams {
    /// Create new circular array parameters
    pub fn new(count: usize, center: Point, total_angle: f64) -> Self {
        debug_assert!(
            total_angle.is_finite(),
            "total_angle must be finite, got {total_angle}"
        );
        Self {
            count,
            center,
            total_angle,
        }
    }

    /// Validate parameters
    pub fn is_valid(&self) -> bool {
        self.count > 0 && self.center.is_finite() && self.total_angle.is_finite()
    }

    /// Calculate angle step between instances
    pub fn angle_step(&self) -> f64 {
        if (self.total_angle.abs() - 360.0).abs() < 1e-9 {
            self.total_angle / self.count as f64
        } else if self.count > 1 {
            self.total_angle / (self.count - 1) as f64
        } else {
            0.0
        }
    }

    /// Rotation of the instance at `index` in degrees
    pub fn get_angle(&self, index: usize) -> f64 {
        self.angle_step() * index as f64
    }
}

/// Array operation combining type and parameters
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayOperation {
    Linear(LinearArrayParams),
    Circular(CircularArrayParams),
    Grid(GridArrayParams),
}

/// Where one instance goes: rotated about the circular centre, then
/// translated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub offset: Point,
    pub rotation: f64,
}

impl ArrayOperation {
    /// Get the array type
    pub fn array_type(&self) -> ArrayType {
        match self {
            ArrayOperation::Linear(_) => ArrayType::Linear,
            ArrayOperation::Circular(_) => ArrayType::Circular,
            ArrayOperation::Grid(_) => ArrayType::Grid,
        }
    }

    /// Validate the wrapped parameters
    pub fn is_valid(&self) -> bool {
        match self {
            ArrayOperation::Linear(params) => params.is_valid(),
            ArrayOperation::Circular(params) => params.is_valid(),
            ArrayOperation::Grid(params) => params.is_valid(),
        }
    }

    /// Get total number of instances, the original included
    pub fn total_copies(&self) -> usize {
        match self {
            ArrayOperation::Linear(params) => params.count,
            ArrayOperation::Circular(params) => params.count,
            ArrayOperation::Grid(params) => params.total_copies(),
        }
    }

    /// One placement per instance; the first is always the original.
    pub fn placements(&self) -> Vec<Placement> {
        match self {
            ArrayOperation::Linear(params) => (0..params.count)
                .map(|i| Placement {
                    offset: params.get_offset(i),
                    rotation: 0.0,
                })
                .collect(),
            ArrayOperation::Circular(params) => (0..params.count)
                .map(|i| Placement {
                    offset: Point::ORIGIN,
                    rotation: params.get_angle(i),
                })
                .collect(),
            ArrayOperation::Grid(params) => (0..params.rows)
                .flat_map(|row| (0..params.columns).map(move |col| (col, row)))
                .filter_map(|(col, row)| params.get_offset(col, row))
                .map(|offset| Placement {
                    offset,
                    rotation: 0.0,
                })
                .collect(),
        }
    }

    /// Reads the array operation from step params.
    pub fn from_params(params: &Params, ctx: &StepContext) -> PipelineResult<Self> {
        let mode = params.choice("mode", "linear", &["linear", "grid", "circular"])?;
        let op = match mode.as_str() {
            "grid" => ArrayOperation::Grid(GridArrayParams::new(
                params.count("cols", 2, 1, 1000)?,
                params.count("rows", 2, 1, 1000)?,
                params.number("dx", 10.0)?,
                params.number("dy", 10.0)?,
            )),
            "circular" => {
                let center = ctx.canvas.center();
                ArrayOperation::Circular(CircularArrayParams::new(
                    params.count("count", 6, 1, 10_000)?,
                    Point::new(params.number("cx", center.x)?, params.number("cy", center.y)?),
                    params.number("angle", 360.0)?,
                ))
            }
            _ => ArrayOperation::Linear(LinearArrayParams::new(
                params.count("count", 2, 1, 10_000)?,
                Point::new(params.number("dx", 10.0)?, params.number("dy", 0.0)?),
            )),
        };
        if !op.is_valid() {
            return Err(ParameterError::InvalidValue {
                name: "mode".to_string(),
                reason: format!("invalid {mode} array"),
            }
            .into());
        }
        Ok(op)
    }
}

/// Adds every instance after the first as a `copy_<n>` child.
pub(super) fn apply(model: &mut GeometryModel, params: &Params, ctx: &StepContext) -> PipelineResult<()> {
    let op = ArrayOperation::from_params(params, ctx)?;
    let center = match &op {
        ArrayOperation::Circular(c) => c.center,
        _ => Point::ORIGIN,
    };
    let base = model.clone();
    for placement in op.placements().into_iter().skip(1) {
        let mut copy = base.clone();
        if placement.rotation != 0.0 {
            apply_linear(&mut copy, &LinearMap::rotation(placement.rotation), center, ctx, 1.0)?;
        }
        copy.origin += placement.offset;
        attach_copy(model, "copy", copy);
    }
    debug!("array: {:?} x{}", op.array_type(), op.total_copies());
    Ok(())
}
