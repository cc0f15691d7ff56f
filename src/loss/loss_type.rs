use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::loss::{cross_entropy::CrossEntropyLoss, sse::SseLoss};

type PairFn = Arc<dyn Fn(f64, f64) -> f64 + Send + Sync>;

/// A caller-supplied error function `e(x, y)` with its derivative in `x`.
#[derive(Clone)]
pub struct CustomError {
    name: String,
    function: PairFn,
    derivative: PairFn,
}

impl CustomError {
    pub fn new<F, D>(name: impl Into<String>, function: F, derivative: D) -> Self
    where
        F: Fn(f64, f64) -> f64 + Send + Sync + 'static,
        D: Fn(f64, f64) -> f64 + Send + Sync + 'static,
    {
        CustomError {
            name: name.into(),
            function: Arc::new(function),
            derivative: Arc::new(derivative),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for CustomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomError").field("name", &self.name).finish()
    }
}

/// Selects the error function minimised during training.
///
/// - `Sse`         : sum of squared errors; `"sse"` in configs.
/// - `CrossEntropy`: binary cross-entropy; `"ce"` in configs. Needs a 0/1 response.
/// - `Custom`      : caller-supplied pair, not serializable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum ErrorFunction {
    #[default]
    #[serde(rename = "sse")]
    Sse,
    #[serde(rename = "ce")]
    CrossEntropy,
    #[serde(skip)]
    Custom(CustomError),
}

impl ErrorFunction {
    pub fn custom<F, D>(name: impl Into<String>, function: F, derivative: D) -> Self
    where
        F: Fn(f64, f64) -> f64 + Send + Sync + 'static,
        D: Fn(f64, f64) -> f64 + Send + Sync + 'static,
    {
        ErrorFunction::Custom(CustomError::new(name, function, derivative))
    }

    /// Error of one prediction `x` against its target `y`.
    pub fn value(&self, x: f64, y: f64) -> f64 {
        match self {
            ErrorFunction::Sse => SseLoss::loss(x, y),
            ErrorFunction::CrossEntropy => CrossEntropyLoss::loss(x, y),
            ErrorFunction::Custom(c) => (c.function)(x, y),
        }
    }

    pub fn derivative(&self, x: f64, y: f64) -> f64 {
        match self {
            ErrorFunction::Sse => SseLoss::derivative(x, y),
            ErrorFunction::CrossEntropy => CrossEntropyLoss::derivative(x, y),
            ErrorFunction::Custom(c) => (c.derivative)(x, y),
        }
    }

    pub fn is_cross_entropy(&self) -> bool {
        matches!(self, ErrorFunction::CrossEntropy)
    }

    pub fn name(&self) -> &str {
        match self {
            ErrorFunction::Sse => "sse",
            ErrorFunction::CrossEntropy => "ce",
            ErrorFunction::Custom(c) => c.name(),
        }
    }
}

impl FromStr for ErrorFunction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sse" => Ok(ErrorFunction::Sse),
            "ce" => Ok(ErrorFunction::CrossEntropy),
            other => Err(Error::InvalidConfig(format!(
                "unknown error function '{other}', expected 'sse' or 'ce'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sse_value_and_derivative() {
        let sse = ErrorFunction::Sse;
        assert_eq!(sse.value(3.0, 1.0), 2.0);
        assert_eq!(sse.derivative(3.0, 1.0), 2.0);
    }

    #[test]
    fn names_round_trip_through_serde() {
        let json = serde_json::to_string(&ErrorFunction::CrossEntropy).unwrap();
        assert_eq!(json, "\"ce\"");
        let back: ErrorFunction = serde_json::from_str("\"sse\"").unwrap();
        assert!(matches!(back, ErrorFunction::Sse));
    }

    #[test]
    fn unknown_selector_is_a_config_error() {
        assert!(matches!("mae".parse::<ErrorFunction>(), Err(Error::InvalidConfig(_))));
    }
}
