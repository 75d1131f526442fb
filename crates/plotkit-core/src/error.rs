//! Error types for the geometry pipeline.
//!
//! Configuration problems (unknown tools, parameters outside their domain) and
//! numeric invalidity are errors scoped to a single pipeline step. Geometric
//! degeneracies such as zero-area chains are not errors at all: they produce
//! empty results.

use thiserror::Error;

/// Errors raised while executing a single pipeline step.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// The step names a generator or modifier that does not exist.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// A step parameter failed validation.
    #[error("Parameter error: {0}")]
    Parameter(#[from] ParameterError),

    /// A generator or modifier produced NaN or infinite coordinates.
    #[error("Numeric invalidity in '{tool}': {reason}")]
    NumericInvalid {
        /// The tool that produced the invalid geometry.
        tool: String,
        /// What went wrong.
        reason: String,
    },

    /// A geometry operation could not be completed.
    #[error("Geometry error: {0}")]
    Geometry(String),
}

/// Errors related to step parameter validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    /// A required parameter is missing.
    #[error("Missing required parameter: {0}")]
    Missing(String),

    /// A parameter value is out of the valid range.
    #[error("Parameter '{name}' out of range: {value} (valid: {min}..{max})")]
    OutOfRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A parameter value is invalid.
    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue { name: String, reason: String },
}

/// Result type alias for pipeline step operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result type alias for parameter validation.
pub type ParameterResult<T> = Result<T, ParameterError>;
