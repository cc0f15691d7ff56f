use crate::activation::NetFunctions;
use crate::error::{Error, Result};
use crate::math::matrix::Matrix;
use crate::network::network::Network;

/// Everything one forward sweep leaves behind for the gradient step.
#[derive(Debug, Clone)]
pub struct ForwardPass {
    /// `[1 | activation]` of every hidden layer, i.e. the input of the next matrix.
    pub neurons: Vec<Matrix>,
    /// Activation derivative per neuron, one matrix per layer boundary.
    pub derivatives: Vec<Matrix>,
    pub output: Matrix,
}

impl ForwardPass {
    /// Input fed into weight matrix `layer`.
    pub fn input<'a>(&'a self, layer: usize, covariate: &'a Matrix) -> &'a Matrix {
        if layer == 0 {
            covariate
        } else {
            &self.neurons[layer - 1]
        }
    }
}

/// Runs `covariate` (intercept column included) through the network,
/// caching derivatives for backpropagation.
pub fn forward(network: &Network, covariate: &Matrix, functions: &NetFunctions) -> Result<ForwardPass> {
    let last = network.layers.len() - 1;
    let mut neurons = Vec::with_capacity(last);
    let mut derivatives = Vec::with_capacity(last + 1);
    let mut output = Matrix::default();

    for (layer, weights) in network.layers.iter().enumerate() {
        let input = if layer == 0 { covariate } else { &neurons[layer - 1] };
        let pre = input * weights;

        let (act, deriv) = if layer == last {
            let act = pre.map(|x| functions.output_value(x));
            let deriv = pre.zip_map(&act, |p, a| functions.output_derivative(p, a));
            (act, deriv)
        } else {
            let act = pre.map(|x| functions.hidden_value(x));
            let deriv = pre.zip_map(&act, |p, a| functions.hidden_derivative(p, a));
            (act, deriv)
        };

        if !deriv.is_finite() {
            return Err(Error::NonFiniteNeuronDerivative { layer: layer + 1 });
        }
        derivatives.push(deriv);

        if layer == last {
            output = act;
        } else {
            neurons.push(act.with_bias_column());
        }
    }

    Ok(ForwardPass {
        neurons,
        derivatives,
        output,
    })
}

/// Neuron values of a trained network for new data.
#[derive(Debug, Clone)]
pub struct Prediction {
    /// Input with intercept column, then `[1 | activation]` of each hidden layer.
    pub neurons: Vec<Matrix>,
    pub net_result: Matrix,
}

/// Forward sweep without derivatives.
pub fn predict(network: &Network, covariate: &Matrix, functions: &NetFunctions) -> Prediction {
    let last = network.layers.len() - 1;
    let mut neurons = vec![covariate.clone()];
    let mut net_result = Matrix::default();

    for (layer, weights) in network.layers.iter().enumerate() {
        let pre = &neurons[layer] * weights;
        if layer == last {
            net_result = pre.map(|x| functions.output_value(x));
        } else {
            neurons.push(pre.map(|x| functions.hidden_value(x)).with_bias_column());
        }
    }

    Prediction { neurons, net_result }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::ActivationFunction;
    use crate::loss::ErrorFunction;
    use crate::network::topology::Topology;

    fn logistic(x: f64) -> f64 {
        1.0 / (1.0 + (-x).exp())
    }

    #[test]
    fn output_matches_a_hand_computation() {
        let t = Topology::new(1, &[1], 1).unwrap();
        let net = Network::from_flat(&t, &[0.5, -1.0, 0.25, 2.0]).unwrap();
        let f = NetFunctions::new(ActivationFunction::Logistic, ErrorFunction::Sse, true);
        let x = Matrix::from_column(&[2.0]).with_bias_column();

        let pass = forward(&net, &x, &f).unwrap();
        let h = logistic(0.5 - 2.0);
        assert!((pass.output.get(0, 0) - (0.25 + 2.0 * h)).abs() < 1e-12);
        assert!((pass.derivatives[0].get(0, 0) - h * (1.0 - h)).abs() < 1e-12);
        assert_eq!(pass.derivatives[1].get(0, 0), 1.0);
        assert_eq!(pass.neurons[0].get(0, 0), 1.0);
    }

    #[test]
    fn forward_is_deterministic() {
        let t = Topology::new(2, &[3, 2], 1).unwrap();
        let values: Vec<f64> = (0..t.weight_count()).map(|i| (i as f64 * 0.37).sin()).collect();
        let net = Network::from_flat(&t, &values).unwrap();
        let f = NetFunctions::new(ActivationFunction::Tanh, ErrorFunction::Sse, false);
        let x = Matrix::from_data(vec![vec![0.1, 0.2], vec![-1.0, 3.0]]).with_bias_column();

        let a = forward(&net, &x, &f).unwrap();
        let b = forward(&net, &x, &f).unwrap();
        assert_eq!(a.output, b.output);
        assert_eq!(predict(&net, &x, &f).net_result, a.output);
    }

    #[test]
    fn non_finite_derivative_names_the_layer() {
        let t = Topology::new(1, &[1], 1).unwrap();
        let net = Network::from_flat(&t, &[0.0, 1.0, 0.0, 1.0]).unwrap();
        let act = ActivationFunction::custom("inv", |x| x, |x| 1.0 / x);
        let f = NetFunctions::new(act, ErrorFunction::Sse, true);
        let x = Matrix::from_column(&[0.0]).with_bias_column();

        assert!(matches!(
            forward(&net, &x, &f),
            Err(Error::NonFiniteNeuronDerivative { layer: 1 })
        ));
    }
}
