use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{Error, Result};

type ScalarFn = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// A caller-supplied differentiable activation.
///
/// Both closures receive the neuron's pre-activation input. Obtaining the
/// derivative (symbolically or numerically) is the caller's job.
#[derive(Clone)]
pub struct CustomActivation {
    name: String,
    function: ScalarFn,
    derivative: ScalarFn,
}

impl CustomActivation {
    pub fn new<F, D>(name: impl Into<String>, function: F, derivative: D) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
        D: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        CustomActivation {
            name: name.into(),
            function: Arc::new(function),
            derivative: Arc::new(derivative),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for CustomActivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomActivation").field("name", &self.name).finish()
    }
}

/// Activation applied by every hidden neuron (and by the output neurons
/// unless the output is linear).
///
/// The built-ins are "special": their derivative is written in terms of the
/// activation's *output*, `f'(a)`, which saves recomputing `f` during the
/// backward pass. Custom activations differentiate the pre-activation input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationFunction {
    #[default]
    Logistic,
    Tanh,
    #[serde(skip)]
    Custom(CustomActivation),
}

impl ActivationFunction {
    pub fn custom<F, D>(name: impl Into<String>, function: F, derivative: D) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
        D: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        ActivationFunction::Custom(CustomActivation::new(name, function, derivative))
    }

    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Logistic => 1.0 / (1.0 + (-x).exp()),
            ActivationFunction::Tanh => x.tanh(),
            ActivationFunction::Custom(c) => (c.function)(x),
        }
    }

    /// Derivative of the activation for one neuron.
    ///
    /// `pre` is the weighted input and `out` the activation value `f(pre)`;
    /// built-ins read `out`, custom functions read `pre`.
    pub fn derivative(&self, pre: f64, out: f64) -> f64 {
        match self {
            ActivationFunction::Logistic => out * (1.0 - out),
            ActivationFunction::Tanh => 1.0 - out * out,
            ActivationFunction::Custom(c) => (c.derivative)(pre),
        }
    }

    /// Whether the derivative is expressed in terms of the output.
    pub fn is_output_based(&self) -> bool {
        !matches!(self, ActivationFunction::Custom(_))
    }

    pub fn is_logistic(&self) -> bool {
        matches!(self, ActivationFunction::Logistic)
    }

    pub fn name(&self) -> &str {
        match self {
            ActivationFunction::Logistic => "logistic",
            ActivationFunction::Tanh => "tanh",
            ActivationFunction::Custom(c) => c.name(),
        }
    }
}

impl FromStr for ActivationFunction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "logistic" => Ok(ActivationFunction::Logistic),
            "tanh" => Ok(ActivationFunction::Tanh),
            other => Err(Error::InvalidConfig(format!(
                "unknown activation function '{other}', expected 'logistic' or 'tanh'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_based_derivatives_match_closed_forms() {
        let logistic = ActivationFunction::Logistic;
        let a = logistic.function(0.3);
        assert!((logistic.derivative(0.3, a) - a * (1.0 - a)).abs() < 1e-15);

        let tanh = ActivationFunction::Tanh;
        let t = tanh.function(-0.7);
        assert!((tanh.derivative(-0.7, t) - (1.0 - t * t)).abs() < 1e-15);
    }

    #[test]
    fn custom_derivative_reads_the_input() {
        let softplus = ActivationFunction::custom(
            "softplus",
            |x: f64| (1.0 + x.exp()).ln(),
            |x: f64| 1.0 / (1.0 + (-x).exp()),
        );
        assert!(!softplus.is_output_based());
        assert_eq!(softplus.derivative(0.0, 123.0), 0.5);
    }

    #[test]
    fn selectors_resolve_by_name() {
        assert!("logistic".parse::<ActivationFunction>().unwrap().is_logistic());
        assert!(matches!(
            "relu".parse::<ActivationFunction>(),
            Err(Error::InvalidConfig(_))
        ));
    }
}
