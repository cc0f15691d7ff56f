use crate::math::matrix::Matrix;
use crate::network::forward::ForwardPass;
use crate::network::network::Network;

/// Generalized weights: the contribution of each covariate to the log-odds
/// of each output, per observation.
///
/// Returns `n_obs x (input_count * output_count)`, the block for output `k`
/// spanning columns `k*input_count .. (k+1)*input_count`. Only meaningful when
/// the output neurons are logistic.
pub fn generalized_weights(network: &Network, pass: &ForwardPass) -> Matrix {
    let last = network.layers.len() - 1;
    let stripped: Vec<Matrix> = network.layers.iter().map(Matrix::without_bias_row).collect();
    let n_obs = pass.output.rows;
    let outputs = pass.output.cols;
    let inputs = network.layers[0].rows - 1;

    let mut result = Matrix::zeros(n_obs, inputs * outputs);

    for k in 0..outputs {
        let w_out = stripped[last].column(k);
        let mut delta = Matrix::zeros(n_obs, w_out.len());
        for i in 0..n_obs {
            let out = pass.output.get(i, k);
            // a saturated logistic output has both terms at 0; their ratio is 1
            let slope = out * (1.0 - out);
            let scale = if slope == 0.0 {
                1.0
            } else {
                pass.derivatives[last].get(i, k) / slope
            };
            for (j, &w) in w_out.iter().enumerate() {
                delta.set(i, j, scale * w);
            }
        }

        for layer in (0..last).rev() {
            delta = &delta.hadamard(&pass.derivatives[layer]) * &stripped[layer].transpose();
        }

        for i in 0..n_obs {
            for j in 0..inputs {
                result.set(i, k * inputs + j, delta.get(i, j));
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::{ActivationFunction, NetFunctions};
    use crate::loss::ErrorFunction;
    use crate::network::forward::forward;
    use crate::network::topology::Topology;

    fn logit(p: f64) -> f64 {
        (p / (1.0 - p)).ln()
    }

    #[test]
    fn without_hidden_layers_the_slopes_are_the_weights() {
        let t = Topology::new(2, &[0], 1).unwrap();
        let net = Network::from_flat(&t, &[0.1, -0.7, 1.3]).unwrap();
        let f = NetFunctions::new(ActivationFunction::Logistic, ErrorFunction::Sse, false);
        let x = Matrix::from_data(vec![vec![0.5, 0.5], vec![2.0, -1.0]]).with_bias_column();

        let gw = generalized_weights(&net, &forward(&net, &x, &f).unwrap());
        for i in 0..2 {
            assert!((gw.get(i, 0) + 0.7).abs() < 1e-9);
            assert!((gw.get(i, 1) - 1.3).abs() < 1e-9);
        }
    }

    #[test]
    fn matches_the_numeric_log_odds_slope() {
        let t = Topology::new(2, &[2], 2).unwrap();
        let values: Vec<f64> = (0..t.weight_count()).map(|i| 0.5 * ((i * 3 + 1) as f64).sin()).collect();
        let net = Network::from_flat(&t, &values).unwrap();
        let f = NetFunctions::new(ActivationFunction::Logistic, ErrorFunction::Sse, false);
        let raw = vec![vec![0.3, -0.2]];
        let x = Matrix::from_data(raw.clone()).with_bias_column();

        let gw = generalized_weights(&net, &forward(&net, &x, &f).unwrap());
        assert_eq!((gw.rows, gw.cols), (1, 4));

        let eps = 1e-6;
        for k in 0..2 {
            for j in 0..2 {
                let mut up = raw.clone();
                up[0][j] += eps;
                let mut down = raw.clone();
                down[0][j] -= eps;
                let out_up = forward(&net, &Matrix::from_data(up).with_bias_column(), &f).unwrap().output;
                let out_down = forward(&net, &Matrix::from_data(down).with_bias_column(), &f).unwrap().output;
                let numeric = (logit(out_up.get(0, k)) - logit(out_down.get(0, k))) / (2.0 * eps);
                assert!((gw.get(0, k * 2 + j) - numeric).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn saturated_output_keeps_the_slopes_finite() {
        let t = Topology::new(1, &[0], 1).unwrap();
        let net = Network::from_flat(&t, &[0.0, 100.0]).unwrap();
        let f = NetFunctions::new(ActivationFunction::Logistic, ErrorFunction::Sse, false);
        let x = Matrix::from_column(&[1.0]).with_bias_column();

        let pass = forward(&net, &x, &f).unwrap();
        assert_eq!(pass.output.get(0, 0), 1.0);
        let gw = generalized_weights(&net, &pass);
        assert_eq!(gw.get(0, 0), 100.0);
    }
}
