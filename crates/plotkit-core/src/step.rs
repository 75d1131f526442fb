use serde::{Deserialize, Serialize};

use crate::mask::MaskConfig;
use crate::params::{ParamValue, Params};

/// One generator or modifier invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineStep {
    pub tool: String,
    #[serde(default)]
    pub params: Params,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<MaskConfig>,
    /// Steps applied to a snapshot of the model by layering tools.
    #[serde(
        default,
        alias = "nestedSteps",
        alias = "steps",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub nested_steps: Vec<PipelineStep>,
}

impl PipelineStep {
    pub fn new(tool: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            params: Params::new(),
            mask: None,
            nested_steps: Vec::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key, value);
        self
    }

    pub fn with_mask(mut self, mask: MaskConfig) -> Self {
        self.mask = Some(mask);
        self
    }

    pub fn with_nested(mut self, step: PipelineStep) -> Self {
        self.nested_steps.push(step);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_from_json() {
        let json = r#"{
            "tool": "duplicate",
            "nestedSteps": [{"tool": "rotate", "params": {"angle": 3}}]
        }"#;
        let step: PipelineStep = serde_json::from_str(json).unwrap();
        assert_eq!(step.tool, "duplicate");
        assert!(step.params.is_empty());
        assert_eq!(step.nested_steps.len(), 1);
        assert_eq!(step.nested_steps[0].params.number("angle", 0.0), Ok(3.0));
    }
}
