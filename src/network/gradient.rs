use crate::activation::NetFunctions;
use crate::error::{Error, Result};
use crate::math::matrix::Matrix;
use crate::network::forward::ForwardPass;
use crate::network::network::{gather, Network, WeightPos};

/// Gradient of the summed error with respect to every weight listed in
/// `free`, in the same order.
pub fn calculate_gradients(
    network: &Network,
    covariate: &Matrix,
    response: &Matrix,
    pass: &ForwardPass,
    functions: &NetFunctions,
    free: &[WeightPos],
) -> Result<Vec<f64>> {
    let err_deriv = pass
        .output
        .zip_map(response, |x, y| functions.error_derivative(x, y));
    if !err_deriv.is_finite() {
        return Err(Error::NonFiniteErrorDerivative);
    }

    let last = network.layers.len() - 1;
    let mut delta = if functions.linear_delta() {
        err_deriv
    } else {
        pass.derivatives[last].hadamard(&err_deriv)
    };

    let mut grads = vec![Matrix::default(); network.layers.len()];
    grads[last] = &pass.input(last, covariate).transpose() * &delta;

    for layer in (0..last).rev() {
        let back = &delta * &network.layers[layer + 1].without_bias_row().transpose();
        delta = pass.derivatives[layer].hadamard(&back);
        grads[layer] = &pass.input(layer, covariate).transpose() * &delta;
    }

    let gradient = gather(&grads, free);
    if gradient.iter().any(|g| !g.is_finite()) {
        return Err(Error::NonFiniteGradient);
    }
    Ok(gradient)
}

/// Largest absolute partial derivative; training stops once this is at or
/// below the threshold.
pub fn reached_threshold(gradient: &[f64]) -> f64 {
    gradient.iter().fold(0.0, |acc, g| acc.max(g.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::ActivationFunction;
    use crate::loss::ErrorFunction;
    use crate::network::forward::forward;
    use crate::network::topology::Topology;

    fn total_error(net: &Network, x: &Matrix, y: &Matrix, f: &NetFunctions) -> f64 {
        let out = forward(net, x, f).unwrap().output;
        out.iter().zip(y.iter()).map(|(&o, &t)| f.error.value(o, t)).sum()
    }

    fn check_against_finite_differences(f: NetFunctions, hidden: &[usize]) {
        let t = Topology::new(2, hidden, 1).unwrap();
        let values: Vec<f64> = (0..t.weight_count()).map(|i| 0.3 * ((i + 1) as f64).cos()).collect();
        let net = Network::from_flat(&t, &values).unwrap();
        let x = Matrix::from_data(vec![vec![0.2, -0.4], vec![0.9, 0.1], vec![-0.5, 0.7]])
            .with_bias_column();
        let y = Matrix::from_column(&[0.0, 1.0, 1.0]);
        let free: Vec<WeightPos> = net.positions().collect();

        let pass = forward(&net, &x, &f).unwrap();
        let analytic = calculate_gradients(&net, &x, &y, &pass, &f, &free).unwrap();

        let eps = 1e-6;
        for (i, &pos) in free.iter().enumerate() {
            let mut plus = net.clone();
            plus.set(pos, net.get(pos) + eps);
            let mut minus = net.clone();
            minus.set(pos, net.get(pos) - eps);
            let numeric = (total_error(&plus, &x, &y, &f) - total_error(&minus, &x, &y, &f)) / (2.0 * eps);
            assert!(
                (numeric - analytic[i]).abs() < 1e-6,
                "weight {i}: numeric {numeric} vs analytic {}",
                analytic[i]
            );
        }
    }

    #[test]
    fn sse_logistic_gradient_matches_finite_differences() {
        check_against_finite_differences(
            NetFunctions::new(ActivationFunction::Logistic, ErrorFunction::Sse, false),
            &[3, 2],
        );
    }

    #[test]
    fn ce_logistic_gradient_matches_finite_differences() {
        check_against_finite_differences(
            NetFunctions::new(ActivationFunction::Logistic, ErrorFunction::CrossEntropy, false),
            &[2],
        );
    }

    #[test]
    fn tanh_linear_output_gradient_matches_finite_differences() {
        check_against_finite_differences(
            NetFunctions::new(ActivationFunction::Tanh, ErrorFunction::Sse, true),
            &[0],
        );
    }

    #[test]
    fn excluded_positions_are_left_out() {
        let t = Topology::new(1, &[0], 1).unwrap();
        let net = Network::from_flat(&t, &[0.1, 0.2]).unwrap();
        let f = NetFunctions::new(ActivationFunction::Logistic, ErrorFunction::Sse, true);
        let x = Matrix::from_column(&[1.0]).with_bias_column();
        let y = Matrix::from_column(&[1.0]);
        let pass = forward(&net, &x, &f).unwrap();

        let only_slope = calculate_gradients(&net, &x, &y, &pass, &f, &[WeightPos::new(0, 1, 0)]).unwrap();
        assert_eq!(only_slope.len(), 1);
        assert!((only_slope[0] - (0.3 - 1.0)).abs() < 1e-12);
    }

    #[test]
    fn non_finite_error_derivative_is_reported() {
        let t = Topology::new(1, &[0], 1).unwrap();
        let net = Network::from_flat(&t, &[0.0, 0.0]).unwrap();
        let f = NetFunctions::new(ActivationFunction::Logistic, ErrorFunction::CrossEntropy, true);
        let x = Matrix::from_column(&[1.0]).with_bias_column();
        let y = Matrix::from_column(&[1.0]);
        let pass = forward(&net, &x, &f).unwrap();
        let free: Vec<WeightPos> = net.positions().collect();

        // linear output 0 makes -y/x blow up
        assert!(matches!(
            calculate_gradients(&net, &x, &y, &pass, &f, &free),
            Err(Error::NonFiniteErrorDerivative)
        ));
    }

    #[test]
    fn overflowing_gradient_is_reported() {
        let t = Topology::new(1, &[0], 1).unwrap();
        let net = Network::from_flat(&t, &[0.0, 1.0]).unwrap();
        let f = NetFunctions::new(ActivationFunction::Logistic, ErrorFunction::Sse, true);
        let x = Matrix::from_column(&[1e200, 1e200]).with_bias_column();
        let y = Matrix::from_column(&[1e300, -1e300]);
        let pass = forward(&net, &x, &f).unwrap();
        let free: Vec<WeightPos> = net.positions().collect();

        // slope partials are -inf and +inf, their sum NaN
        assert!(matches!(
            calculate_gradients(&net, &x, &y, &pass, &f, &free),
            Err(Error::NonFiniteGradient)
        ));
    }
}
