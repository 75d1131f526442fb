//! Step parameter maps.
//!
//! Parameters arrive as loosely typed JSON/TOML values. Every accessor takes
//! the tool's documented default, so a missing key is never an error, and
//! validates the value's domain before the tool sees it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{ParameterError, ParameterResult};

/// A single parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Number(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Number(v as f64)
    }
}

impl From<usize> for ParamValue {
    fn from(v: usize) -> Self {
        ParamValue::Number(v as f64)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Text(v)
    }
}

/// Key to value map of one step's parameters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, ParamValue>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Params::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A number, or `None` when absent. Numeric strings are accepted.
    pub fn optional_number(&self, key: &str) -> ParameterResult<Option<f64>> {
        let value = match self.0.get(key) {
            None => return Ok(None),
            Some(ParamValue::Number(n)) => *n,
            Some(ParamValue::Text(s)) => {
                s.trim()
                    .parse::<f64>()
                    .map_err(|_| ParameterError::InvalidValue {
                        name: key.to_string(),
                        reason: format!("expected a number, got '{s}'"),
                    })?
            }
            Some(ParamValue::Bool(_)) => {
                return Err(ParameterError::InvalidValue {
                    name: key.to_string(),
                    reason: "expected a number, got a boolean".to_string(),
                })
            }
        };
        if !value.is_finite() {
            return Err(ParameterError::InvalidValue {
                name: key.to_string(),
                reason: "must be finite".to_string(),
            });
        }
        Ok(Some(value))
    }

    pub fn number(&self, key: &str, default: f64) -> ParameterResult<f64> {
        Ok(self.optional_number(key)?.unwrap_or(default))
    }

    /// A number strictly greater than zero.
    pub fn positive(&self, key: &str, default: f64) -> ParameterResult<f64> {
        let value = self.number(key, default)?;
        if value <= 0.0 {
            return Err(ParameterError::OutOfRange {
                name: key.to_string(),
                value,
                min: 0.0,
                max: f64::INFINITY,
            });
        }
        Ok(value)
    }

    pub fn non_negative(&self, key: &str, default: f64) -> ParameterResult<f64> {
        self.ranged(key, default, 0.0, f64::INFINITY)
    }

    /// A number inside `[min, max]`.
    pub fn ranged(&self, key: &str, default: f64, min: f64, max: f64) -> ParameterResult<f64> {
        let value = self.number(key, default)?;
        if value < min || value > max {
            return Err(ParameterError::OutOfRange {
                name: key.to_string(),
                value,
                min,
                max,
            });
        }
        Ok(value)
    }

    /// A whole number inside `[min, max]`. Fractional input is rounded.
    pub fn count(&self, key: &str, default: usize, min: usize, max: usize) -> ParameterResult<usize> {
        let value = self.number(key, default as f64)?.round();
        if value < min as f64 || value > max as f64 {
            return Err(ParameterError::OutOfRange {
                name: key.to_string(),
                value,
                min: min as f64,
                max: max as f64,
            });
        }
        Ok(value as usize)
    }

    pub fn text(&self, key: &str, default: &str) -> ParameterResult<String> {
        match self.0.get(key) {
            None => Ok(default.to_string()),
            Some(ParamValue::Text(s)) => Ok(s.trim().to_lowercase()),
            Some(other) => Err(ParameterError::InvalidValue {
                name: key.to_string(),
                reason: format!("expected text, got {other:?}"),
            }),
        }
    }

    /// Like [`Params::text`] but keeps the value's case, for colours and ids.
    pub fn raw_text(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(ParamValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// A boolean. Numbers are true when non-zero; the strings "true"/"false"
    /// are accepted.
    pub fn flag(&self, key: &str, default: bool) -> ParameterResult<bool> {
        match self.0.get(key) {
            None => Ok(default),
            Some(ParamValue::Bool(b)) => Ok(*b),
            Some(ParamValue::Number(n)) => Ok(*n != 0.0),
            Some(ParamValue::Text(s)) => match s.trim().to_lowercase().as_str() {
                "true" | "yes" | "on" => Ok(true),
                "false" | "no" | "off" => Ok(false),
                _ => Err(ParameterError::InvalidValue {
                    name: key.to_string(),
                    reason: format!("expected a boolean, got '{s}'"),
                }),
            },
        }
    }

    /// Fails unless `value` is one of `allowed`.
    pub fn choice(&self, key: &str, default: &str, allowed: &[&str]) -> ParameterResult<String> {
        let value = self.text(key, default)?;
        if allowed.contains(&value.as_str()) {
            Ok(value)
        } else {
            Err(ParameterError::InvalidValue {
                name: key.to_string(),
                reason: format!("'{value}' is not one of {}", allowed.join(", ")),
            })
        }
    }
}
