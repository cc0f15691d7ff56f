use crate::activation::activation::ActivationFunction;
use crate::loss::{cross_entropy::CrossEntropyLoss, loss_type::ErrorFunction};

/// The activation/error pair a network is trained with, resolved once per run.
///
/// Resolution folds in the cross-entropy + logistic shortcut: when both are
/// selected and the output is not linear, the error derivative is taken
/// w.r.t. the output's weighted input (`x(1-y) - y(1-x)`) and the output delta
/// skips the logistic derivative so it is not applied twice.
#[derive(Debug, Clone)]
pub struct NetFunctions {
    pub activation: ActivationFunction,
    pub error: ErrorFunction,
    pub linear_output: bool,
    logistic_cross_entropy: bool,
}

impl NetFunctions {
    pub fn new(activation: ActivationFunction, error: ErrorFunction, linear_output: bool) -> Self {
        let logistic_cross_entropy =
            !linear_output && error.is_cross_entropy() && activation.is_logistic();
        NetFunctions {
            activation,
            error,
            linear_output,
            logistic_cross_entropy,
        }
    }

    pub fn hidden_value(&self, pre: f64) -> f64 {
        self.activation.function(pre)
    }

    pub fn hidden_derivative(&self, pre: f64, out: f64) -> f64 {
        self.activation.derivative(pre, out)
    }

    pub fn output_value(&self, pre: f64) -> f64 {
        if self.linear_output {
            pre
        } else {
            self.activation.function(pre)
        }
    }

    pub fn output_derivative(&self, pre: f64, out: f64) -> f64 {
        if self.linear_output {
            1.0
        } else {
            self.activation.derivative(pre, out)
        }
    }

    pub fn error_derivative(&self, predicted: f64, expected: f64) -> f64 {
        if self.logistic_cross_entropy {
            CrossEntropyLoss::logistic_derivative(predicted, expected)
        } else {
            self.error.derivative(predicted, expected)
        }
    }

    /// Whether the output delta is the bare error derivative.
    pub fn linear_delta(&self) -> bool {
        self.linear_output || self.logistic_cross_entropy
    }

    /// Whether output neurons apply the logistic function.
    pub fn output_is_logistic(&self) -> bool {
        !self.linear_output && self.activation.is_logistic()
    }
}
