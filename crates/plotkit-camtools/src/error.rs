//! Error types for toolpath emission.

use thiserror::Error;

/// Errors that can occur while turning a model into machine instructions.
#[derive(Error, Debug)]
pub enum ToolpathError {
    /// A machine setting is outside its valid domain.
    #[error("Invalid machine configuration: {0}")]
    InvalidMachineConfig(String),

    /// The configured post-processor name is not known.
    #[error("Unknown post-processor: {0}")]
    UnknownPostProcessor(String),

    /// The model or a derived coordinate is NaN or infinite.
    #[error("Non-finite coordinate: {0}")]
    NumericInvalid(String),
}

/// Result type alias for toolpath operations.
pub type ToolpathResult<T> = Result<T, ToolpathError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toolpath_error_display() {
        let err = ToolpathError::InvalidMachineConfig("feed_rate must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid machine configuration: feed_rate must be positive"
        );

        let err = ToolpathError::UnknownPostProcessor("fanuc".to_string());
        assert_eq!(err.to_string(), "Unknown post-processor: fanuc");

        let err = ToolpathError::NumericInvalid("path 3".to_string());
        assert_eq!(err.to_string(), "Non-finite coordinate: path 3");
    }
}
