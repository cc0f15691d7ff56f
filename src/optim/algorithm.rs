use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::optim::backprop::Backprop;
use crate::optim::rprop::{RpropMinus, RpropPlus, RpropVariant};

/// One weight-update step over the free weights.
///
/// Implementors keep whatever per-weight state they need (rates, the previous
/// gradient) between calls; one instance serves exactly one repetition.
pub trait UpdateRule: Send {
    fn update_params(&mut self, params: &mut [f64], grad: &[f64]);

    /// Current per-weight learning rates, or the single fixed rate.
    fn learning_rates(&self) -> &[f64];
}

/// Bounds every adaptive learning rate is clamped into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LearningRateLimit {
    pub min: f64,
    pub max: f64,
}

impl Default for LearningRateLimit {
    fn default() -> Self {
        LearningRateLimit { min: 1e-10, max: 0.1 }
    }
}

/// Multipliers applied to a learning rate when the gradient sign flips
/// (`minus`) or holds (`plus`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LearningRateFactor {
    pub minus: f64,
    pub plus: f64,
}

impl Default for LearningRateFactor {
    fn default() -> Self {
        LearningRateFactor { minus: 0.5, plus: 1.2 }
    }
}

/// Training algorithm selector.
///
/// - `Backprop`: plain gradient descent; `"backprop"`. Needs a learning rate.
/// - `RpropPlus`: resilient backprop with weight backtracking; `"rprop+"`.
/// - `RpropMinus`: resilient backprop without backtracking; `"rprop-"`.
/// - `Sag`: globally convergent rprop, smallest absolute gradient adjusted; `"sag"`.
/// - `Slr`: globally convergent rprop, smallest learning rate adjusted; `"slr"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Algorithm {
    #[serde(rename = "backprop")]
    Backprop,
    #[default]
    #[serde(rename = "rprop+")]
    RpropPlus,
    #[serde(rename = "rprop-")]
    RpropMinus,
    #[serde(rename = "sag")]
    Sag,
    #[serde(rename = "slr")]
    Slr,
}

impl Algorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Backprop => "backprop",
            Algorithm::RpropPlus => "rprop+",
            Algorithm::RpropMinus => "rprop-",
            Algorithm::Sag => "sag",
            Algorithm::Slr => "slr",
        }
    }

    /// Builds a fresh rule for `len` free weights.
    pub fn update_rule(
        &self,
        len: usize,
        learning_rate: Option<f64>,
        limit: LearningRateLimit,
        factor: LearningRateFactor,
    ) -> Result<Box<dyn UpdateRule>> {
        let rule: Box<dyn UpdateRule> = match self {
            Algorithm::Backprop => {
                let lr = learning_rate.ok_or_else(|| {
                    Error::InvalidConfig("'learning_rate' is required for backprop".to_owned())
                })?;
                Box::new(Backprop::new(lr))
            }
            Algorithm::RpropPlus => Box::new(RpropPlus::new(len, limit, factor)),
            Algorithm::RpropMinus => Box::new(RpropMinus::new(len, limit, factor, RpropVariant::Plain)),
            Algorithm::Sag => Box::new(RpropMinus::new(len, limit, factor, RpropVariant::Sag)),
            Algorithm::Slr => Box::new(RpropMinus::new(len, limit, factor, RpropVariant::Slr)),
        };
        Ok(rule)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "backprop" => Ok(Algorithm::Backprop),
            "rprop+" => Ok(Algorithm::RpropPlus),
            "rprop-" => Ok(Algorithm::RpropMinus),
            "sag" => Ok(Algorithm::Sag),
            "slr" => Ok(Algorithm::Slr),
            other => Err(Error::InvalidConfig(format!(
                "unknown algorithm '{other}', expected one of backprop, rprop+, rprop-, sag, slr"
            ))),
        }
    }
}
