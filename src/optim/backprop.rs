use crate::optim::algorithm::UpdateRule;

/// Plain gradient descent with a fixed learning rate.
pub struct Backprop {
    learning_rate: f64,
}

impl Backprop {
    pub fn new(learning_rate: f64) -> Backprop {
        Backprop { learning_rate }
    }
}

impl UpdateRule for Backprop {
    fn update_params(&mut self, params: &mut [f64], grad: &[f64]) {
        let lr = self.learning_rate;

        for (w, g) in params.iter_mut().zip(grad) {
            *w -= lr * g;
        }
    }

    fn learning_rates(&self) -> &[f64] {
        std::slice::from_ref(&self.learning_rate)
    }
}
