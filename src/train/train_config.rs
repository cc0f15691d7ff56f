use serde::{Deserialize, Serialize};
use std::sync::mpsc;

use crate::activation::ActivationFunction;
use crate::error::{Error, Result};
use crate::loss::ErrorFunction;
use crate::network::ExclusionSpec;
use crate::optim::{Algorithm, LearningRateFactor, LearningRateLimit};
use crate::train::step_stats::StepStats;

/// Configuration for a `train_network` run.
///
/// # Fields
/// - `hidden`         : neurons per hidden layer; `[0]` for none
/// - `threshold`      : stop once the largest absolute partial derivative is at or below this
/// - `stepmax`        : step cap per repetition
/// - `repetitions`    : independent runs, each from fresh starting weights
/// - `algorithm`      : `backprop`, `rprop+`, `rprop-`, `sag` or `slr`
/// - `activation`     : hidden (and, unless `linear_output`, output) activation
/// - `error`          : `sse` or `ce`
/// - `linear_output`  : identity activation on the output layer
/// - `learning_rate`  : fixed rate, required by `backprop` only
/// - `exclude`        : weights held out of training
/// - `constant_weights`: values of the excluded weights, in exclusion order
/// - `start_weights`  : free weights to start from, one slot per repetition
/// - `likelihood`     : also report AIC and BIC
/// - `seed`           : repetition `r` draws from `seed + r`; entropy when unset
/// - `lifesign_step`  : a `StepStats` is sent every this many steps
/// - `progress_tx`    : optional channel sender; a closed receiver is ignored
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub hidden: Vec<usize>,
    pub threshold: f64,
    pub stepmax: usize,
    pub repetitions: usize,
    pub algorithm: Algorithm,
    pub activation: ActivationFunction,
    pub error: ErrorFunction,
    pub linear_output: bool,
    pub learning_rate: Option<f64>,
    pub learning_rate_limit: LearningRateLimit,
    pub learning_rate_factor: LearningRateFactor,
    pub exclude: Option<ExclusionSpec>,
    pub constant_weights: Vec<f64>,
    pub start_weights: Option<Vec<f64>>,
    pub likelihood: bool,
    pub seed: Option<u64>,
    pub lifesign_step: usize,
    #[serde(skip)]
    pub progress_tx: Option<mpsc::Sender<StepStats>>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            hidden: vec![1],
            threshold: 0.01,
            stepmax: 100_000,
            repetitions: 1,
            algorithm: Algorithm::RpropPlus,
            activation: ActivationFunction::Logistic,
            error: ErrorFunction::Sse,
            linear_output: true,
            learning_rate: None,
            learning_rate_limit: LearningRateLimit::default(),
            learning_rate_factor: LearningRateFactor::default(),
            exclude: None,
            constant_weights: Vec::new(),
            start_weights: None,
            likelihood: false,
            seed: None,
            lifesign_step: 1000,
            progress_tx: None,
        }
    }
}

impl TrainConfig {
    /// Creates a `TrainConfig` with the given hidden layers and defaults elsewhere.
    pub fn new(hidden: Vec<usize>) -> Self {
        TrainConfig {
            hidden,
            ..TrainConfig::default()
        }
    }

    /// Checks every value that does not depend on the data.
    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(invalid(format!("threshold must be finite and >= 0, got {}", self.threshold)));
        }
        if self.stepmax == 0 {
            return Err(invalid("stepmax must be at least 1".to_owned()));
        }
        if self.repetitions == 0 {
            return Err(invalid("repetitions must be at least 1".to_owned()));
        }
        if self.lifesign_step == 0 {
            return Err(invalid("lifesign_step must be at least 1".to_owned()));
        }

        let LearningRateLimit { min, max } = self.learning_rate_limit;
        if !(min.is_finite() && max.is_finite() && min > 0.0 && min <= max) {
            return Err(invalid(format!(
                "learning_rate_limit needs 0 < min <= max, got min {min}, max {max}"
            )));
        }
        let LearningRateFactor { minus, plus } = self.learning_rate_factor;
        if !(minus.is_finite() && plus.is_finite() && minus > 0.0 && plus > 0.0) {
            return Err(invalid(format!(
                "learning_rate_factor must be positive, got minus {minus}, plus {plus}"
            )));
        }

        match (self.algorithm, self.learning_rate) {
            (Algorithm::Backprop, None) => {
                return Err(invalid("'learning_rate' is required for backprop".to_owned()))
            }
            (_, Some(lr)) if !(lr.is_finite() && lr > 0.0) => {
                return Err(invalid(format!("learning_rate must be finite and > 0, got {lr}")))
            }
            _ => {}
        }

        if let Some(start) = &self.start_weights {
            if start.iter().any(|w| !w.is_finite()) {
                return Err(invalid("start_weights contain a non-finite value".to_owned()));
            }
        }
        Ok(())
    }

    /// Serializes the config to a pretty-printed JSON file. The progress
    /// sender is not written.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Reads a config written by `save_json`; missing fields take their defaults.
    pub fn load_json(path: &str) -> Result<TrainConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config: TrainConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}

fn invalid(msg: String) -> Error {
    Error::InvalidConfig(msg)
}
